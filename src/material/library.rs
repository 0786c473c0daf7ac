use super::{new_nd, new_uniaxial, InitialStateNd, StressStrainTrait, UniaxialTrait};
use super::{Encapsulated, InitStrain, InitStress, Inverted, Parallel, PathIndependent, Series};
use crate::base::{Idealization, MatError, MaterialKind, ParamNd, ParamUniaxial, Settings};
use crate::base::{PY_DEFAULT_C_ELASTIC, PY_DEFAULT_C_YIELD};
use std::collections::HashMap;

/// Lists the kinds that can be allocated by [new_uniaxial_by_name]
const UNIAXIAL_KINDS: [MaterialKind; 14] = [
    MaterialKind::Elastic,
    MaterialKind::TensionOnly,
    MaterialKind::PerfectPlastic,
    MaterialKind::LinearHardening,
    MaterialKind::VoceHardening,
    MaterialKind::LinearSoftening,
    MaterialKind::PyHyperbolic,
    MaterialKind::Encapsulated,
    MaterialKind::Inverted,
    MaterialKind::PathIndependent,
    MaterialKind::InitStrain,
    MaterialKind::InitStress,
    MaterialKind::Parallel,
    MaterialKind::Series,
];

/// Lists the kinds that can be allocated by [new_nd_by_name]
const ND_KINDS: [MaterialKind; 4] = [
    MaterialKind::LinearElasticNd,
    MaterialKind::VonMises,
    MaterialKind::DruckerPrager,
    MaterialKind::InitialStateNd,
];

/// Holds the materials defined so far, indexed by tag
///
/// Wrappers allocated by name reference previously defined materials by tag and
/// own deep copies of them.
pub struct MaterialLibrary {
    /// Holds the settings given to every allocated material
    pub settings: Settings,

    uniaxial: HashMap<usize, Box<dyn UniaxialTrait>>,
    nd: HashMap<usize, Box<dyn StressStrainTrait>>,
}

impl MaterialLibrary {
    /// Allocates an empty library with default settings
    pub fn new() -> Self {
        MaterialLibrary {
            settings: Settings::new(),
            uniaxial: HashMap::new(),
            nd: HashMap::new(),
        }
    }

    /// Adds a uniaxial material (replacing any previous material with the same tag)
    pub fn add_uniaxial(&mut self, material: Box<dyn UniaxialTrait>) {
        self.uniaxial.insert(material.tag(), material);
    }

    /// Adds an n-dimensional material (replacing any previous material with the same tag)
    pub fn add_nd(&mut self, material: Box<dyn StressStrainTrait>) {
        self.nd.insert(material.tag(), material);
    }

    /// Allocates a uniaxial material from parameters and adds it to the library
    pub fn define_uniaxial(&mut self, tag: usize, param: &ParamUniaxial) -> Result<(), MatError> {
        let material = new_uniaxial(tag, param, &self.settings)?;
        self.add_uniaxial(material);
        Ok(())
    }

    /// Allocates an n-dimensional material from parameters and adds it to the library
    pub fn define_nd(&mut self, tag: usize, ideal: &Idealization, param: &ParamNd) -> Result<(), MatError> {
        let material = new_nd(tag, ideal, param, &self.settings)?;
        self.add_nd(material);
        Ok(())
    }

    /// Returns a uniaxial material
    pub fn uniaxial(&self, tag: usize) -> Result<&dyn UniaxialTrait, MatError> {
        match self.uniaxial.get(&tag) {
            Some(material) => Ok(material.as_ref()),
            None => Err(MatError::NotFound { tag }),
        }
    }

    /// Returns an n-dimensional material
    pub fn nd(&self, tag: usize) -> Result<&dyn StressStrainTrait, MatError> {
        match self.nd.get(&tag) {
            Some(material) => Ok(material.as_ref()),
            None => Err(MatError::NotFound { tag }),
        }
    }

    /// Returns a deep copy of a uniaxial material
    pub fn copy_uniaxial(&self, tag: usize) -> Result<Box<dyn UniaxialTrait>, MatError> {
        Ok(self.uniaxial(tag)?.get_copy())
    }

    /// Returns a deep copy of an n-dimensional material
    pub fn copy_nd(&self, tag: usize) -> Result<Box<dyn StressStrainTrait>, MatError> {
        Ok(self.nd(tag)?.get_copy())
    }

    /// Returns the number of materials in the library
    pub fn len(&self) -> usize {
        self.uniaxial.len() + self.nd.len()
    }

    /// Indicates that no material has been defined
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

/// Allocates a uniaxial material by name with a flat list of values
///
/// | name              | values                                        |
/// |-------------------|-----------------------------------------------|
/// | `Elastic`         | `E` or `E, eta`                               |
/// | `TensionOnly`     | `E, capacity`                                 |
/// | `ElasticPP`       | `E, fy` or `E, fy_pos, fy_neg`                |
/// | `Hardening`       | `E, sigma_y, h_iso, h_kin`                    |
/// | `Voce`            | `E, sigma_y, sigma_inf, delta, h_iso, h_kin`  |
/// | `Softening`       | `E, sigma_y, h_soft, sigma_res`               |
/// | `PySoil`          | `p_ult, y50` or `p_ult, y50, c_elastic, c_yield` |
/// | `Encapsulated`    | `inner_tag`                                   |
/// | `Inverted`        | `inner_tag`                                   |
/// | `PathIndependent` | `inner_tag`                                   |
/// | `InitStrain`      | `inner_tag, eps0`                             |
/// | `InitStress`      | `inner_tag, sig0`                             |
/// | `Parallel`        | `member_tag, member_tag, ...`                 |
/// | `Series`          | `member_tag, member_tag, ...`                 |
///
/// Referenced materials are deep-copied from the library.
pub fn new_uniaxial_by_name(
    library: &MaterialLibrary,
    name: &str,
    tag: usize,
    values: &[f64],
) -> Result<Box<dyn UniaxialTrait>, MatError> {
    let kind = match UNIAXIAL_KINDS.iter().find(|kind| kind.name() == name) {
        Some(kind) => *kind,
        None => return Err(MatError::UnknownType(name.to_string())),
    };
    let settings = &library.settings;
    let v = values;
    let n = v.len();
    let wrong = Err(MatError::Config {
        tag,
        reason: "wrong number of values",
    });
    let param = match (kind, n) {
        (MaterialKind::Elastic, 1) => ParamUniaxial::Elastic { young: v[0], eta: 0.0 },
        (MaterialKind::Elastic, 2) => ParamUniaxial::Elastic { young: v[0], eta: v[1] },
        (MaterialKind::TensionOnly, 2) => ParamUniaxial::TensionOnly {
            young: v[0],
            capacity: v[1],
        },
        (MaterialKind::PerfectPlastic, 2) => ParamUniaxial::ElasticPerfectlyPlastic {
            young: v[0],
            fy_pos: v[1],
            fy_neg: v[1],
        },
        (MaterialKind::PerfectPlastic, 3) => ParamUniaxial::ElasticPerfectlyPlastic {
            young: v[0],
            fy_pos: v[1],
            fy_neg: v[2],
        },
        (MaterialKind::LinearHardening, 4) => ParamUniaxial::LinearHardening {
            young: v[0],
            sigma_y: v[1],
            h_iso: v[2],
            h_kin: v[3],
        },
        (MaterialKind::VoceHardening, 6) => ParamUniaxial::VoceHardening {
            young: v[0],
            sigma_y: v[1],
            sigma_inf: v[2],
            delta: v[3],
            h_iso: v[4],
            h_kin: v[5],
        },
        (MaterialKind::LinearSoftening, 4) => ParamUniaxial::LinearSoftening {
            young: v[0],
            sigma_y: v[1],
            h_soft: v[2],
            sigma_res: v[3],
        },
        (MaterialKind::PyHyperbolic, 2) => ParamUniaxial::PySoil {
            p_ult: v[0],
            y50: v[1],
            c_elastic: PY_DEFAULT_C_ELASTIC,
            c_yield: PY_DEFAULT_C_YIELD,
        },
        (MaterialKind::PyHyperbolic, 4) => ParamUniaxial::PySoil {
            p_ult: v[0],
            y50: v[1],
            c_elastic: v[2],
            c_yield: v[3],
        },
        (MaterialKind::Encapsulated, 1) => {
            let inner = library.copy_uniaxial(to_tag(tag, v[0])?)?;
            return Ok(Box::new(Encapsulated::new(tag, inner)));
        }
        (MaterialKind::Inverted, 1) => {
            let inner = library.copy_uniaxial(to_tag(tag, v[0])?)?;
            return Ok(Box::new(Inverted::new(tag, inner)));
        }
        (MaterialKind::PathIndependent, 1) => {
            let inner = library.copy_uniaxial(to_tag(tag, v[0])?)?;
            return Ok(Box::new(PathIndependent::new(tag, inner)));
        }
        (MaterialKind::InitStrain, 2) => {
            let inner = library.copy_uniaxial(to_tag(tag, v[0])?)?;
            return Ok(Box::new(InitStrain::new(tag, inner, v[1])?));
        }
        (MaterialKind::InitStress, 2) => {
            let inner = library.copy_uniaxial(to_tag(tag, v[0])?)?;
            return Ok(Box::new(InitStress::new(tag, inner, v[1], settings)?));
        }
        (MaterialKind::Parallel, _) => {
            let members = copy_members(library, tag, v)?;
            return Ok(Box::new(Parallel::new(tag, members, None)?));
        }
        (MaterialKind::Series, _) => {
            let members = copy_members(library, tag, v)?;
            return Ok(Box::new(Series::new(tag, members, settings)?));
        }
        _ => return wrong,
    };
    new_uniaxial(tag, &param, settings)
}

/// Allocates an n-dimensional material by name with a flat list of values
///
/// | name                  | values                                        |
/// |-----------------------|-----------------------------------------------|
/// | `ElasticIsotropic`    | `E, nu`                                       |
/// | `VonMises`            | `E, nu, z0, hh` or `E, nu, z0, hh, hk, z_inf, delta` |
/// | `DruckerPrager`       | `E, nu, c, phi, psi, hh`                      |
/// | `InitialStateWrapper` | `inner_tag`                                   |
pub fn new_nd_by_name(
    library: &MaterialLibrary,
    name: &str,
    tag: usize,
    ideal: &Idealization,
    values: &[f64],
) -> Result<Box<dyn StressStrainTrait>, MatError> {
    let kind = match ND_KINDS.iter().find(|kind| kind.name() == name) {
        Some(kind) => *kind,
        None => return Err(MatError::UnknownType(name.to_string())),
    };
    let v = values;
    let param = match (kind, v.len()) {
        (MaterialKind::LinearElasticNd, 2) => ParamNd::LinearElastic {
            young: v[0],
            poisson: v[1],
        },
        (MaterialKind::VonMises, 4) => ParamNd::VonMises {
            young: v[0],
            poisson: v[1],
            z0: v[2],
            hh: v[3],
            hk: 0.0,
            z_inf: 0.0,
            delta: 0.0,
        },
        (MaterialKind::VonMises, 7) => ParamNd::VonMises {
            young: v[0],
            poisson: v[1],
            z0: v[2],
            hh: v[3],
            hk: v[4],
            z_inf: v[5],
            delta: v[6],
        },
        (MaterialKind::DruckerPrager, 6) => ParamNd::DruckerPrager {
            young: v[0],
            poisson: v[1],
            c: v[2],
            phi: v[3],
            psi: v[4],
            hh: v[5],
        },
        (MaterialKind::InitialStateNd, 1) => {
            let inner = library.copy_nd(to_tag(tag, v[0])?)?;
            return Ok(Box::new(InitialStateNd::new(tag, inner)));
        }
        _ => {
            return Err(MatError::Config {
                tag,
                reason: "wrong number of values",
            })
        }
    };
    new_nd(tag, ideal, &param, &library.settings)
}

/// Converts a value into a material tag
fn to_tag(tag: usize, value: f64) -> Result<usize, MatError> {
    if value < 0.0 || value.fract() != 0.0 || !value.is_finite() {
        return Err(MatError::Config {
            tag,
            reason: "material tags must be non-negative integers",
        });
    }
    Ok(value as usize)
}

fn copy_members(library: &MaterialLibrary, tag: usize, values: &[f64]) -> Result<Vec<Box<dyn UniaxialTrait>>, MatError> {
    values
        .iter()
        .map(|value| library.copy_uniaxial(to_tag(tag, *value)?))
        .collect()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
