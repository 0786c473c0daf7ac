use super::{ParamNd, ParamUniaxial};

/// Holds samples of material parameters
pub struct SampleParams {}

impl SampleParams {
    /// Returns sample parameters for an elastic perfectly-plastic steel (MPa)
    pub fn param_steel_epp() -> ParamUniaxial {
        ParamUniaxial::ElasticPerfectlyPlastic {
            young: 200_000.0, // MPa
            fy_pos: 400.0,    // MPa
            fy_neg: 400.0,    // MPa
        }
    }

    /// Returns sample parameters for a steel with linear hardening (MPa)
    pub fn param_steel_hardening() -> ParamUniaxial {
        ParamUniaxial::LinearHardening {
            young: 200_000.0, // MPa
            sigma_y: 400.0,   // MPa
            h_iso: 2_000.0,   // MPa
            h_kin: 1_000.0,   // MPa
        }
    }

    /// Returns sample parameters for a steel with saturating hardening (MPa)
    pub fn param_steel_voce() -> ParamUniaxial {
        ParamUniaxial::VoceHardening {
            young: 200_000.0, // MPa
            sigma_y: 400.0,   // MPa
            sigma_inf: 600.0, // MPa
            delta: 50.0,      // [-]
            h_iso: 500.0,     // MPa
            h_kin: 0.0,       // MPa
        }
    }

    /// Returns sample parameters for a softening material (MPa)
    pub fn param_concrete_softening() -> ParamUniaxial {
        ParamUniaxial::LinearSoftening {
            young: 30_000.0,  // MPa
            sigma_y: 30.0,    // MPa
            h_soft: 3_000.0,  // MPa
            sigma_res: 6.0,   // MPa
        }
    }

    /// Returns sample parameters for a tension-only cable (kN and m)
    pub fn param_cable() -> ParamUniaxial {
        ParamUniaxial::TensionOnly {
            young: 10_000.0, // kN
            capacity: 100.0, // kN
        }
    }

    /// Returns sample parameters for a soft clay p-y spring (kN/m and m)
    pub fn param_py_clay() -> ParamUniaxial {
        ParamUniaxial::PySoil {
            p_ult: 50.0,     // kN/m
            y50: 0.02,       // m
            c_elastic: 10.0, // [-]
            c_yield: 0.2,    // [-]
        }
    }

    /// Returns sample parameters for an elastic material with viscous damping
    pub fn param_viscoelastic() -> ParamUniaxial {
        ParamUniaxial::Elastic {
            young: 1_000.0, // kPa
            eta: 10.0,      // kPa·s
        }
    }

    /// Returns one sample of every uniaxial law and wrapper
    ///
    /// Each entry holds a short description and the parameters.
    pub fn uniaxial_catalogue() -> Vec<(&'static str, ParamUniaxial)> {
        let steel = SampleParams::param_steel_hardening();
        vec![
            ("viscoelastic", SampleParams::param_viscoelastic()),
            ("cable", SampleParams::param_cable()),
            ("steel EPP", SampleParams::param_steel_epp()),
            ("steel hardening", steel.clone()),
            ("steel Voce", SampleParams::param_steel_voce()),
            ("concrete softening", SampleParams::param_concrete_softening()),
            ("p-y clay", SampleParams::param_py_clay()),
            (
                "encapsulated steel",
                ParamUniaxial::Encapsulated {
                    inner: Box::new(steel.clone()),
                },
            ),
            (
                "compression cable",
                ParamUniaxial::Inverted {
                    inner: Box::new(SampleParams::param_cable()),
                },
            ),
            (
                "path-independent steel",
                ParamUniaxial::PathIndependent {
                    inner: Box::new(steel.clone()),
                },
            ),
            (
                "prestrained steel",
                ParamUniaxial::InitStrain {
                    inner: Box::new(steel.clone()),
                    eps0: 0.0005,
                },
            ),
            (
                "prestressed steel",
                ParamUniaxial::InitStress {
                    inner: Box::new(steel.clone()),
                    sig0: 100.0,
                },
            ),
            (
                "steel and cable in parallel",
                ParamUniaxial::Parallel {
                    members: vec![steel.clone(), SampleParams::param_cable()],
                    factors: Some(vec![1.0, 0.5]),
                },
            ),
            (
                "steel and viscoelastic in series",
                ParamUniaxial::Series {
                    members: vec![steel, SampleParams::param_viscoelastic()],
                },
            ),
        ]
    }

    /// Returns sample parameters for the von Mises model
    pub fn param_von_mises() -> ParamNd {
        ParamNd::VonMises {
            young: 1500.0, // kPa
            poisson: 0.25, // [-]
            z0: 9.0,       // kPa
            hh: 800.0,     // kPa
            hk: 0.0,       // kPa
            z_inf: 0.0,    // kPa
            delta: 0.0,    // [-]
        }
    }

    /// Returns sample parameters for the Drucker-Prager model
    pub fn param_drucker_prager() -> ParamNd {
        ParamNd::DruckerPrager {
            young: 10_000.0, // kPa
            poisson: 0.25,   // [-]
            c: 10.0,         // kPa
            phi: 30.0,       // degrees
            psi: 20.0,       // degrees
            hh: 100.0,       // kPa
        }
    }

    /// Returns one sample of every n-dimensional law and wrapper
    pub fn nd_catalogue() -> Vec<(&'static str, ParamNd)> {
        vec![
            (
                "linear elastic",
                ParamNd::LinearElastic {
                    young: 10_000.0,
                    poisson: 0.2,
                },
            ),
            ("von Mises", SampleParams::param_von_mises()),
            ("Drucker-Prager", SampleParams::param_drucker_prager()),
            (
                "initial-state von Mises",
                ParamNd::InitialState {
                    inner: Box::new(SampleParams::param_von_mises()),
                },
            ),
        ]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
