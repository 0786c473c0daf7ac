use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds the tolerances and iteration bounds of the local (material-level) algorithms
///
/// **Note:** The bounds are fixed caps; the engine never retries with a smaller step.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Return mapping (RM): tolerance on the residual of the consistency condition (relative to the yield stress)
    pub yield_tol: f64,

    /// Return mapping (RM): maximum number of Newton iterations
    pub max_iterations: usize,

    /// Series composition (SC): tolerance on the stress mismatch between members (relative)
    pub series_tol: f64,

    /// Series composition (SC): maximum number of compliance iterations
    pub series_max_iterations: usize,

    /// Initial stress (IS): tolerance used to find the strain that produces the initial stress (relative)
    pub init_stress_tol: f64,

    /// Initial stress (IS): maximum number of iterations used to find the initial strain
    pub init_stress_max_iterations: usize,
}

impl Settings {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Settings {
            yield_tol: 1e-10,
            max_iterations: 50,
            series_tol: 1e-10,
            series_max_iterations: 50,
            init_stress_tol: 1e-10,
            init_stress_max_iterations: 50,
        }
    }

    /// Sets the tolerance on the residual of the consistency condition
    pub fn set_yield_tol(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("yield_tol must be > 0.0");
        }
        self.yield_tol = value;
        Ok(self)
    }

    /// Sets the maximum number of return-mapping iterations
    pub fn set_max_iterations(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("max_iterations must be ≥ 1");
        }
        self.max_iterations = value;
        Ok(self)
    }

    /// Sets the tolerance on the stress mismatch of series compositions
    pub fn set_series_tol(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("series_tol must be > 0.0");
        }
        self.series_tol = value;
        Ok(self)
    }

    /// Sets the maximum number of compliance iterations of series compositions
    pub fn set_series_max_iterations(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("series_max_iterations must be ≥ 1");
        }
        self.series_max_iterations = value;
        Ok(self)
    }

    /// Sets the tolerance used to find the initial strain of initial-stress wrappers
    pub fn set_init_stress_tol(&mut self, value: f64) -> Result<&mut Self, StrError> {
        if value <= 0.0 {
            return Err("init_stress_tol must be > 0.0");
        }
        self.init_stress_tol = value;
        Ok(self)
    }

    /// Sets the maximum number of iterations used to find the initial strain of initial-stress wrappers
    pub fn set_init_stress_max_iterations(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("init_stress_max_iterations must be ≥ 1");
        }
        self.init_stress_max_iterations = value;
        Ok(self)
    }

    /// Checks the values (e.g., after deserialization)
    pub fn validate(&self) -> Result<(), StrError> {
        if self.yield_tol <= 0.0 {
            return Err("yield_tol must be > 0.0");
        }
        if self.series_tol <= 0.0 {
            return Err("series_tol must be > 0.0");
        }
        if self.init_stress_tol <= 0.0 {
            return Err("init_stress_tol must be > 0.0");
        }
        if self.max_iterations < 1 || self.series_max_iterations < 1 || self.init_stress_max_iterations < 1 {
            return Err("the maximum number of iterations must be ≥ 1");
        }
        Ok(())
    }

    /// Appends the settings to a marshaling buffer
    pub(crate) fn write(&self, buffer: &mut crate::base::Buffer) {
        buffer.push(self.yield_tol);
        buffer.push_usize(self.max_iterations);
        buffer.push(self.series_tol);
        buffer.push_usize(self.series_max_iterations);
        buffer.push(self.init_stress_tol);
        buffer.push_usize(self.init_stress_max_iterations);
    }

    /// Reads the settings from a marshaling buffer
    pub(crate) fn read(buffer: &mut crate::base::Buffer) -> Result<Self, StrError> {
        let settings = Settings {
            yield_tol: buffer.pull()?,
            max_iterations: buffer.pull_usize()?,
            series_tol: buffer.pull()?,
            series_max_iterations: buffer.pull_usize()?,
            init_stress_tol: buffer.pull()?,
            init_stress_max_iterations: buffer.pull_usize()?,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
