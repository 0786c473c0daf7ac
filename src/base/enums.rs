use serde::{Deserialize, Serialize};

/// Defines the analysis phase seen by materials that behave differently during initial-state analyses
///
/// The enclosing analysis pushes this value into the materials via `set_analysis_phase`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum AnalysisPhase {
    /// Initial-state (e.g., gravity or in-situ stress) analysis
    InitialState,

    /// Regular analysis
    Regular,
}

/// Defines the lifecycle stage of a material state record
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum Stage {
    /// Freshly constructed or reset to start
    Virgin,

    /// A trial strain has been set but not committed
    Trial,

    /// The last trial has been committed (or the trial has been reverted)
    Committed,
}

/// Defines the stable type tags of all materials
///
/// Note: The fixed numbering scheme is part of the marshaling format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub enum MaterialKind {
    /// Linear (visco) elastic uniaxial material
    Elastic = 1,

    /// Tension-only capped elastic uniaxial material
    TensionOnly = 2,

    /// Elastic perfectly-plastic uniaxial material
    PerfectPlastic = 3,

    /// Uniaxial plasticity with linear isotropic and kinematic hardening
    LinearHardening = 4,

    /// Uniaxial plasticity with saturating (Voce) isotropic hardening
    VoceHardening = 5,

    /// Uniaxial plasticity with linear softening towards a residual capacity
    LinearSoftening = 6,

    /// Uniaxial hyperbolic p-y soil spring
    PyHyperbolic = 7,

    /// Encapsulation wrapper
    Encapsulated = 20,

    /// Sign-inversion wrapper
    Inverted = 21,

    /// Path-independent wrapper
    PathIndependent = 22,

    /// Initial-strain wrapper
    InitStrain = 23,

    /// Initial-stress wrapper
    InitStress = 24,

    /// Parallel composition
    Parallel = 25,

    /// Series composition
    Series = 26,

    /// Linear elastic n-dimensional material
    LinearElasticNd = 40,

    /// von Mises n-dimensional plasticity
    VonMises = 41,

    /// Drucker-Prager n-dimensional plasticity
    DruckerPrager = 42,

    /// Initial-state analysis wrapper for n-dimensional materials
    InitialStateNd = 43,
}

impl MaterialKind {
    /// Returns the integer code written into marshaling buffers
    pub fn code(&self) -> usize {
        *self as usize
    }

    /// Returns the kind corresponding to an integer code
    pub fn from_code(code: usize) -> Option<Self> {
        let kind = match code {
            1 => MaterialKind::Elastic,
            2 => MaterialKind::TensionOnly,
            3 => MaterialKind::PerfectPlastic,
            4 => MaterialKind::LinearHardening,
            5 => MaterialKind::VoceHardening,
            6 => MaterialKind::LinearSoftening,
            7 => MaterialKind::PyHyperbolic,
            20 => MaterialKind::Encapsulated,
            21 => MaterialKind::Inverted,
            22 => MaterialKind::PathIndependent,
            23 => MaterialKind::InitStrain,
            24 => MaterialKind::InitStress,
            25 => MaterialKind::Parallel,
            26 => MaterialKind::Series,
            40 => MaterialKind::LinearElasticNd,
            41 => MaterialKind::VonMises,
            42 => MaterialKind::DruckerPrager,
            43 => MaterialKind::InitialStateNd,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the name used by the by-name factory
    pub fn name(&self) -> &'static str {
        match self {
            MaterialKind::Elastic => "Elastic",
            MaterialKind::TensionOnly => "TensionOnly",
            MaterialKind::PerfectPlastic => "ElasticPP",
            MaterialKind::LinearHardening => "Hardening",
            MaterialKind::VoceHardening => "Voce",
            MaterialKind::LinearSoftening => "Softening",
            MaterialKind::PyHyperbolic => "PySoil",
            MaterialKind::Encapsulated => "Encapsulated",
            MaterialKind::Inverted => "Inverted",
            MaterialKind::PathIndependent => "PathIndependent",
            MaterialKind::InitStrain => "InitStrain",
            MaterialKind::InitStress => "InitStress",
            MaterialKind::Parallel => "Parallel",
            MaterialKind::Series => "Series",
            MaterialKind::LinearElasticNd => "ElasticIsotropic",
            MaterialKind::VonMises => "VonMises",
            MaterialKind::DruckerPrager => "DruckerPrager",
            MaterialKind::InitialStateNd => "InitialStateWrapper",
        }
    }

    /// Indicates an n-dimensional material
    pub fn is_nd(&self) -> bool {
        self.code() >= 40
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
