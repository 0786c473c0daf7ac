use serde::{Deserialize, Serialize};

/// Holds parameters for uniaxial (scalar) materials
///
/// The composite variants hold the parameters of their members; the factory allocates
/// one independent member instance per entry.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum ParamUniaxial {
    /// Linear (visco) elastic model: σ = E ε + η dε/dt
    Elastic {
        /// Young's modulus
        young: f64,

        /// Viscous damping coefficient (zero renders a rate-independent law)
        eta: f64,
    },

    /// Elastic model that only carries tension, capped at a capacity
    TensionOnly {
        /// Young's modulus
        young: f64,

        /// Maximum tensile stress
        capacity: f64,
    },

    /// Elastic perfectly-plastic model
    ElasticPerfectlyPlastic {
        /// Young's modulus
        young: f64,

        /// Yield stress in tension (positive)
        fy_pos: f64,

        /// Yield stress in compression (positive value representing a compressive magnitude)
        fy_neg: f64,
    },

    /// Plasticity with linear isotropic and kinematic hardening
    LinearHardening {
        /// Young's modulus
        young: f64,

        /// Initial yield stress
        sigma_y: f64,

        /// Isotropic hardening modulus
        h_iso: f64,

        /// Kinematic hardening modulus
        h_kin: f64,
    },

    /// Plasticity with saturating (Voce) isotropic hardening plus linear terms
    ///
    /// ```text
    /// κ(α) = σy + (σ∞ - σy) (1 - exp(-δ α)) + h_iso α
    /// ```
    VoceHardening {
        /// Young's modulus
        young: f64,

        /// Initial yield stress σy
        sigma_y: f64,

        /// Saturation yield stress σ∞
        sigma_inf: f64,

        /// Saturation rate δ
        delta: f64,

        /// Linear isotropic hardening modulus
        h_iso: f64,

        /// Kinematic hardening modulus
        h_kin: f64,
    },

    /// Plasticity with linear softening down to a residual capacity
    ///
    /// ```text
    /// κ(α) = max(σr, σy - h_soft α)
    /// ```
    LinearSoftening {
        /// Young's modulus
        young: f64,

        /// Initial yield stress σy
        sigma_y: f64,

        /// Softening modulus (positive value; the yield stress decreases)
        h_soft: f64,

        /// Residual yield stress σr
        sigma_res: f64,
    },

    /// Hyperbolic p-y soil spring (lateral soil reaction versus displacement)
    PySoil {
        /// Ultimate lateral capacity
        p_ult: f64,

        /// Displacement at which half of the capacity is mobilized
        y50: f64,

        /// Elastic stiffness coefficient: k = c_elastic · p_ult / y50
        c_elastic: f64,

        /// Initial yield coefficient: p_yield = c_yield · p_ult
        c_yield: f64,
    },

    /// Uniform handle forwarding to one owned material
    Encapsulated {
        /// Parameters of the owned material
        inner: Box<ParamUniaxial>,
    },

    /// Sign inversion of one owned material
    Inverted {
        /// Parameters of the owned material
        inner: Box<ParamUniaxial>,
    },

    /// Path-independent (history-free) response of one owned material
    PathIndependent {
        /// Parameters of the owned material
        inner: Box<ParamUniaxial>,
    },

    /// Initial strain offset added to the strain of one owned material
    InitStrain {
        /// Parameters of the owned material
        inner: Box<ParamUniaxial>,

        /// Initial strain ε0
        eps0: f64,
    },

    /// Initial stress imposed on one owned material
    InitStress {
        /// Parameters of the owned material
        inner: Box<ParamUniaxial>,

        /// Initial stress σ0
        sig0: f64,
    },

    /// Members sharing one common strain (stresses add)
    Parallel {
        /// Parameters of the members
        members: Vec<ParamUniaxial>,

        /// Optional stress multipliers (one per member)
        factors: Option<Vec<f64>>,
    },

    /// Members sharing one common stress (strains add)
    Series {
        /// Parameters of the members
        members: Vec<ParamUniaxial>,
    },
}

/// Holds parameters for n-dimensional (tensor) stress-strain relations
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum ParamNd {
    /// Linear elastic model
    LinearElastic {
        /// Young's modulus
        young: f64,

        /// Poisson's coefficient
        poisson: f64,
    },

    /// von Mises plasticity model
    VonMises {
        /// Young's modulus
        young: f64,

        /// Poisson's coefficient
        poisson: f64,

        /// Initial size of the yield surface
        ///
        /// This value corresponds to the von Mises stress:
        ///
        /// ```text
        /// f = σd - z
        /// ```
        z0: f64,

        /// Linear isotropic hardening coefficient
        hh: f64,

        /// Linear kinematic hardening coefficient
        hk: f64,

        /// Saturation size of the yield surface (used if delta > 0)
        z_inf: f64,

        /// Saturation rate (zero disables the saturating term)
        delta: f64,
    },

    /// Drucker-Prager plasticity model
    DruckerPrager {
        /// Young's modulus
        young: f64,

        /// Poisson's coefficient
        poisson: f64,

        /// Apparent cohesion
        c: f64,

        /// Friction angle (degrees)
        phi: f64,

        /// Dilatancy angle (degrees); equal to phi renders an associated flow
        psi: f64,

        /// Linear hardening of the cohesion
        hh: f64,
    },

    /// Initial-state analysis wrapper
    InitialState {
        /// Parameters of the owned material
        inner: Box<ParamNd>,
    },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
