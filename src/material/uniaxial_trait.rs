use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind};
use russell_lab::Vector;

/// Specifies the essential functions of uniaxial (scalar) materials
///
/// # Lifecycle
///
/// 1. `set_trial_strain` computes the trial stress and tangent against the **committed** history
/// 2. `stress` and `tangent` read the trial values (the committed ones before any trial)
/// 3. `commit_state` makes the trial durable; `revert_to_last_commit` discards it
/// 4. `revert_to_start` restores the virgin state derived from the configuration
pub trait UniaxialTrait: Send {
    /// Returns the (unique) tag of this instance
    fn tag(&self) -> usize;

    /// Returns the stable type tag
    fn kind(&self) -> MaterialKind;

    /// Sets the trial strain and strain rate and computes the trial stress and tangent
    fn set_trial_strain(&mut self, strain: f64, strain_rate: f64) -> Result<(), MatError>;

    /// Returns the trial strain
    fn strain(&self) -> f64;

    /// Returns the trial strain rate
    fn strain_rate(&self) -> f64 {
        0.0
    }

    /// Returns the trial stress
    fn stress(&self) -> f64;

    /// Returns the trial tangent modulus
    fn tangent(&self) -> f64;

    /// Returns the tangent at zero strain of the virgin material
    fn initial_tangent(&self) -> f64;

    /// Checks whether the trial state can be committed
    fn check_commit(&self) -> Result<(), MatError> {
        Ok(())
    }

    /// Copies the trial state into the committed state
    fn commit_state(&mut self) -> Result<(), MatError>;

    /// Discards the trial state
    fn revert_to_last_commit(&mut self) -> Result<(), MatError>;

    /// Resets the material to its virgin state
    fn revert_to_start(&mut self) -> Result<(), MatError>;

    /// Returns a new, independently owned instance with the same configuration and committed state
    fn get_copy(&self) -> Box<dyn UniaxialTrait>;

    /// Writes the configuration and the committed state into the buffer
    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError>;

    /// Informs the material about the current analysis phase
    fn set_analysis_phase(&mut self, _phase: AnalysisPhase) {}

    /// Returns the order of the strain vector (always 1)
    fn order(&self) -> usize {
        1
    }

    /// Sets the trial strain given as a vector of order 1
    fn set_trial_strain_vector(&mut self, strain: &Vector) -> Result<(), MatError> {
        if strain.dim() != 1 {
            return Err(MatError::Dimension {
                tag: self.tag(),
                operation: "set_trial_strain",
                expected: 1,
                given: strain.dim(),
            });
        }
        self.set_trial_strain(strain[0], 0.0)
    }
}

impl Clone for Box<dyn UniaxialTrait> {
    fn clone(&self) -> Self {
        self.get_copy()
    }
}
