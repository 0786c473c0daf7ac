use crate::base::{Buffer, MaterialKind, PY_DEFAULT_P_ULT, PY_DEFAULT_Y50};
use crate::StrError;
use std::fmt::Debug;

/// Specifies the hardening law of the uniaxial return-mapping integrator
///
/// The yield function reads:
///
/// ```text
/// f(σ, q, α) = |σ - q| - κ(α)
/// ```
///
/// where `q` is the back stress (linear kinematic hardening with modulus `Hk`) and
/// `κ(α)` is the yield stress as a function of the accumulated plastic strain `α`.
/// The sign of the relative stress (`dir = ±1`) is passed along so that asymmetric
/// laws can use different yield stresses in tension and compression.
pub trait Hardening: Clone + Debug + Send + 'static {
    /// Holds the stable type tag of the resulting material
    const KIND: MaterialKind;

    /// Calculates the yield stress κ(α)
    fn yield_stress(&self, alpha: f64, dir: f64) -> f64;

    /// Calculates the derivative of the yield stress dκ/dα
    fn yield_slope(&self, alpha: f64, dir: f64) -> f64;

    /// Returns the kinematic hardening modulus Hk
    fn kinematic_modulus(&self) -> f64 {
        0.0
    }

    /// Checks the parameters against the elastic modulus
    fn validate(&self, young: f64) -> Result<(), StrError>;

    /// Appends the parameters to a marshaling buffer
    fn write(&self, buffer: &mut Buffer);

    /// Reads the parameters from a marshaling buffer
    fn read(buffer: &mut Buffer) -> Result<Self, StrError>;
}

/// Implements the (possibly asymmetric) perfectly-plastic law
#[derive(Clone, Debug)]
pub struct PerfectPlastic {
    /// Yield stress in tension
    pub fy_pos: f64,

    /// Yield stress (magnitude) in compression
    pub fy_neg: f64,
}

impl Hardening for PerfectPlastic {
    const KIND: MaterialKind = MaterialKind::PerfectPlastic;

    fn yield_stress(&self, _alpha: f64, dir: f64) -> f64 {
        if dir >= 0.0 {
            self.fy_pos
        } else {
            self.fy_neg
        }
    }

    fn yield_slope(&self, _alpha: f64, _dir: f64) -> f64 {
        0.0
    }

    fn validate(&self, _young: f64) -> Result<(), StrError> {
        if self.fy_pos <= 0.0 {
            return Err("fy_pos must be > 0.0");
        }
        if self.fy_neg <= 0.0 {
            return Err("fy_neg must be > 0.0");
        }
        Ok(())
    }

    fn write(&self, buffer: &mut Buffer) {
        buffer.push(self.fy_pos);
        buffer.push(self.fy_neg);
    }

    fn read(buffer: &mut Buffer) -> Result<Self, StrError> {
        Ok(PerfectPlastic {
            fy_pos: buffer.pull()?,
            fy_neg: buffer.pull()?,
        })
    }
}

/// Implements the linear isotropic and kinematic hardening law
///
/// ```text
/// κ(α) = σy + H α
/// ```
#[derive(Clone, Debug)]
pub struct LinearHardening {
    /// Initial yield stress
    pub sigma_y: f64,

    /// Isotropic hardening modulus
    pub h_iso: f64,

    /// Kinematic hardening modulus
    pub h_kin: f64,
}

impl Hardening for LinearHardening {
    const KIND: MaterialKind = MaterialKind::LinearHardening;

    fn yield_stress(&self, alpha: f64, _dir: f64) -> f64 {
        self.sigma_y + self.h_iso * alpha
    }

    fn yield_slope(&self, _alpha: f64, _dir: f64) -> f64 {
        self.h_iso
    }

    fn kinematic_modulus(&self) -> f64 {
        self.h_kin
    }

    fn validate(&self, _young: f64) -> Result<(), StrError> {
        if self.sigma_y <= 0.0 {
            return Err("sigma_y must be > 0.0");
        }
        if self.h_iso < 0.0 {
            return Err("h_iso must be ≥ 0.0");
        }
        if self.h_kin < 0.0 {
            return Err("h_kin must be ≥ 0.0");
        }
        Ok(())
    }

    fn write(&self, buffer: &mut Buffer) {
        buffer.push(self.sigma_y);
        buffer.push(self.h_iso);
        buffer.push(self.h_kin);
    }

    fn read(buffer: &mut Buffer) -> Result<Self, StrError> {
        Ok(LinearHardening {
            sigma_y: buffer.pull()?,
            h_iso: buffer.pull()?,
            h_kin: buffer.pull()?,
        })
    }
}

/// Implements the saturating (Voce) isotropic hardening law
///
/// ```text
/// κ(α) = σy + (σ∞ - σy) (1 - exp(-δ α)) + H α
/// ```
#[derive(Clone, Debug)]
pub struct VoceHardening {
    /// Initial yield stress
    pub sigma_y: f64,

    /// Saturation yield stress
    pub sigma_inf: f64,

    /// Saturation exponent
    pub delta: f64,

    /// Linear isotropic hardening modulus added to the saturating term
    pub h_iso: f64,

    /// Kinematic hardening modulus
    pub h_kin: f64,
}

impl Hardening for VoceHardening {
    const KIND: MaterialKind = MaterialKind::VoceHardening;

    fn yield_stress(&self, alpha: f64, _dir: f64) -> f64 {
        self.sigma_y + (self.sigma_inf - self.sigma_y) * (1.0 - f64::exp(-self.delta * alpha)) + self.h_iso * alpha
    }

    fn yield_slope(&self, alpha: f64, _dir: f64) -> f64 {
        (self.sigma_inf - self.sigma_y) * self.delta * f64::exp(-self.delta * alpha) + self.h_iso
    }

    fn kinematic_modulus(&self) -> f64 {
        self.h_kin
    }

    fn validate(&self, _young: f64) -> Result<(), StrError> {
        if self.sigma_y <= 0.0 {
            return Err("sigma_y must be > 0.0");
        }
        if self.sigma_inf < self.sigma_y {
            return Err("sigma_inf must be ≥ sigma_y");
        }
        if self.delta < 0.0 {
            return Err("delta must be ≥ 0.0");
        }
        if self.h_iso < 0.0 {
            return Err("h_iso must be ≥ 0.0");
        }
        if self.h_kin < 0.0 {
            return Err("h_kin must be ≥ 0.0");
        }
        Ok(())
    }

    fn write(&self, buffer: &mut Buffer) {
        buffer.push(self.sigma_y);
        buffer.push(self.sigma_inf);
        buffer.push(self.delta);
        buffer.push(self.h_iso);
        buffer.push(self.h_kin);
    }

    fn read(buffer: &mut Buffer) -> Result<Self, StrError> {
        Ok(VoceHardening {
            sigma_y: buffer.pull()?,
            sigma_inf: buffer.pull()?,
            delta: buffer.pull()?,
            h_iso: buffer.pull()?,
            h_kin: buffer.pull()?,
        })
    }
}

/// Implements linear softening down to a residual yield stress
///
/// ```text
/// κ(α) = max(σr, σy - Hs α)
/// ```
#[derive(Clone, Debug)]
pub struct LinearSoftening {
    /// Initial yield stress σy
    pub sigma_y: f64,

    /// Softening modulus Hs (positive)
    pub h_soft: f64,

    /// Residual yield stress σr
    pub sigma_res: f64,
}

impl Hardening for LinearSoftening {
    const KIND: MaterialKind = MaterialKind::LinearSoftening;

    fn yield_stress(&self, alpha: f64, _dir: f64) -> f64 {
        f64::max(self.sigma_res, self.sigma_y - self.h_soft * alpha)
    }

    fn yield_slope(&self, alpha: f64, _dir: f64) -> f64 {
        if self.sigma_y - self.h_soft * alpha > self.sigma_res {
            -self.h_soft
        } else {
            0.0
        }
    }

    /// Requires `E - Hs > 0` so that the consistency equation has a unique root
    fn validate(&self, young: f64) -> Result<(), StrError> {
        if self.sigma_y <= 0.0 {
            return Err("sigma_y must be > 0.0");
        }
        if self.h_soft < 0.0 {
            return Err("h_soft must be ≥ 0.0");
        }
        if self.sigma_res < 0.0 || self.sigma_res > self.sigma_y {
            return Err("sigma_res must be in [0.0, sigma_y]");
        }
        if young - self.h_soft <= 0.0 {
            return Err("h_soft must be smaller than young");
        }
        Ok(())
    }

    fn write(&self, buffer: &mut Buffer) {
        buffer.push(self.sigma_y);
        buffer.push(self.h_soft);
        buffer.push(self.sigma_res);
    }

    fn read(buffer: &mut Buffer) -> Result<Self, StrError> {
        Ok(LinearSoftening {
            sigma_y: buffer.pull()?,
            h_soft: buffer.pull()?,
            sigma_res: buffer.pull()?,
        })
    }
}

/// Implements the hyperbolic p-y soil reaction law
///
/// ```text
/// κ(α) = pu - (pu - cy pu) y50 / (y50 + α)
/// ```
///
/// The spring yields at `cy pu` and approaches the ultimate capacity `pu` asymptotically.
#[derive(Clone, Debug)]
pub struct PyHyperbolic {
    /// Ultimate lateral capacity
    pub p_ult: f64,

    /// Displacement at which half of the capacity is mobilized
    pub y50: f64,

    /// Initial yield coefficient
    pub c_yield: f64,
}

impl PyHyperbolic {
    /// Allocates a new instance and returns the elastic stiffness `c_elastic · p_ult / y50`
    ///
    /// A zero `p_ult` or `y50` is replaced by [PY_DEFAULT_P_ULT] or [PY_DEFAULT_Y50] to keep
    /// the denominators non-singular. Negative values are rejected.
    pub fn new(p_ult: f64, y50: f64, c_elastic: f64, c_yield: f64) -> Result<(Self, f64), StrError> {
        if p_ult < 0.0 {
            return Err("p_ult must be ≥ 0.0");
        }
        if y50 < 0.0 {
            return Err("y50 must be ≥ 0.0");
        }
        if c_elastic <= 0.0 {
            return Err("c_elastic must be > 0.0");
        }
        let p_ult = if p_ult == 0.0 { PY_DEFAULT_P_ULT } else { p_ult };
        let y50 = if y50 == 0.0 { PY_DEFAULT_Y50 } else { y50 };
        let law = PyHyperbolic { p_ult, y50, c_yield };
        Ok((law, c_elastic * p_ult / y50))
    }
}

impl Hardening for PyHyperbolic {
    const KIND: MaterialKind = MaterialKind::PyHyperbolic;

    fn yield_stress(&self, alpha: f64, _dir: f64) -> f64 {
        self.p_ult - (self.p_ult - self.c_yield * self.p_ult) * self.y50 / (self.y50 + alpha)
    }

    fn yield_slope(&self, alpha: f64, _dir: f64) -> f64 {
        let den = self.y50 + alpha;
        (self.p_ult - self.c_yield * self.p_ult) * self.y50 / (den * den)
    }

    fn validate(&self, _young: f64) -> Result<(), StrError> {
        if self.p_ult <= 0.0 {
            return Err("p_ult must be > 0.0");
        }
        if self.y50 <= 0.0 {
            return Err("y50 must be > 0.0");
        }
        if self.c_yield <= 0.0 || self.c_yield >= 1.0 {
            return Err("c_yield must be in (0.0, 1.0)");
        }
        Ok(())
    }

    fn write(&self, buffer: &mut Buffer) {
        buffer.push(self.p_ult);
        buffer.push(self.y50);
        buffer.push(self.c_yield);
    }

    fn read(buffer: &mut Buffer) -> Result<Self, StrError> {
        Ok(PyHyperbolic {
            p_ult: buffer.pull()?,
            y50: buffer.pull()?,
            c_yield: buffer.pull()?,
        })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Hardening, LinearHardening, LinearSoftening, PerfectPlastic, PyHyperbolic, VoceHardening};
    use crate::base::{Buffer, PY_DEFAULT_P_ULT, PY_DEFAULT_Y50};
    use russell_lab::approx_eq;

    #[test]
    fn perfect_plastic_works() {
        let law = PerfectPlastic {
            fy_pos: 400.0,
            fy_neg: 300.0,
        };
        assert_eq!(law.yield_stress(0.1, 1.0), 400.0);
        assert_eq!(law.yield_stress(0.1, -1.0), 300.0);
        assert_eq!(law.yield_slope(0.1, -1.0), 0.0);
        assert_eq!(law.validate(1.0), Ok(()));
        let bad = PerfectPlastic {
            fy_pos: 400.0,
            fy_neg: 0.0,
        };
        assert_eq!(bad.validate(1.0).err(), Some("fy_neg must be > 0.0"));
    }

    #[test]
    fn voce_slope_matches_numerical_derivative() {
        let law = VoceHardening {
            sigma_y: 250.0,
            sigma_inf: 400.0,
            delta: 50.0,
            h_iso: 100.0,
            h_kin: 0.0,
        };
        assert_eq!(law.yield_stress(0.0, 1.0), 250.0);
        let (alpha, h) = (0.01, 1e-7);
        let num = (law.yield_stress(alpha + h, 1.0) - law.yield_stress(alpha - h, 1.0)) / (2.0 * h);
        approx_eq(law.yield_slope(alpha, 1.0), num, 1e-5);
    }

    #[test]
    fn linear_laws_work() {
        let law = LinearHardening {
            sigma_y: 100.0,
            h_iso: 10.0,
            h_kin: 5.0,
        };
        assert_eq!(law.yield_stress(2.0, 1.0), 120.0);
        assert_eq!(law.kinematic_modulus(), 5.0);
        let law = LinearSoftening {
            sigma_y: 100.0,
            h_soft: 1000.0,
            sigma_res: 20.0,
        };
        approx_eq(law.yield_stress(0.05, 1.0), 50.0, 1e-13);
        assert_eq!(law.yield_slope(0.05, 1.0), -1000.0);
        assert_eq!(law.yield_stress(0.2, 1.0), 20.0);
        assert_eq!(law.yield_slope(0.2, 1.0), 0.0);
        assert_eq!(law.validate(500.0).err(), Some("h_soft must be smaller than young"));
        assert_eq!(law.validate(5000.0), Ok(()));
    }

    #[test]
    fn py_hyperbolic_works() {
        let (law, young) = PyHyperbolic::new(100.0, 0.01, 10.0, 0.2).unwrap();
        approx_eq(young, 1e5, 1e-9);
        approx_eq(law.yield_stress(0.0, 1.0), 20.0, 1e-12);
        approx_eq(law.yield_stress(0.01, 1.0), 60.0, 1e-12);
        assert!(law.yield_stress(1e6, 1.0) < 100.0);

        let (law, young) = PyHyperbolic::new(0.0, 0.0, 10.0, 0.2).unwrap();
        assert_eq!(law.p_ult, PY_DEFAULT_P_ULT);
        assert_eq!(law.y50, PY_DEFAULT_Y50);
        assert_eq!(young, 10.0 * PY_DEFAULT_P_ULT / PY_DEFAULT_Y50);

        assert_eq!(PyHyperbolic::new(-1.0, 0.01, 10.0, 0.2).err(), Some("p_ult must be ≥ 0.0"));
        assert_eq!(PyHyperbolic::new(1.0, -0.01, 10.0, 0.2).err(), Some("y50 must be ≥ 0.0"));
    }

    #[test]
    fn write_and_read_work() {
        let law = VoceHardening {
            sigma_y: 250.0,
            sigma_inf: 400.0,
            delta: 50.0,
            h_iso: 100.0,
            h_kin: 7.0,
        };
        let mut buffer = Buffer::new();
        law.write(&mut buffer);
        let read = VoceHardening::read(&mut buffer).unwrap();
        assert_eq!(format!("{:?}", read), format!("{:?}", law));
        assert_eq!(VoceHardening::read(&mut buffer).err(), Some("buffer is exhausted"));
    }
}
