/// Holds the minimum tangent ratio (w.r.t the initial tangent) accepted by the series compliance solver
///
/// Member tangents smaller than `MIN_TANGENT_RATIO · |initial tangent|` are replaced by this bound
/// so that the compliances remain finite (e.g., on a perfectly-plastic plateau).
pub const MIN_TANGENT_RATIO: f64 = 1e-9;

/// Holds the absolute minimum tangent used when the initial tangent is zero
pub const MIN_TANGENT_ABS: f64 = 1e-12;

/// Holds the lateral capacity substituted into p-y springs when zero is given
pub const PY_DEFAULT_P_ULT: f64 = 1e-12;

/// Holds the y50 displacement substituted into p-y springs when zero is given
pub const PY_DEFAULT_Y50: f64 = 1e-12;

/// Holds the default elastic-stiffness coefficient of p-y springs (k = c_elastic · p_ult / y50)
pub const PY_DEFAULT_C_ELASTIC: f64 = 10.0;

/// Holds the default initial-yield coefficient of p-y springs (p_yield = c_yield · p_ult)
pub const PY_DEFAULT_C_YIELD: f64 = 0.2;

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/matsim/test";
