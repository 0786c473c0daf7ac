use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind};
use russell_lab::Vector;
use russell_tensor::{Mandel, Tensor2, Tensor4};

/// Specifies the essential functions of n-dimensional stress-strain materials
///
/// Strain vectors hold the Mandel components of the strain tensor; hence, the order is
/// 4 in 2D ([Mandel::Symmetric2D]) and 6 in 3D ([Mandel::Symmetric]).
pub trait StressStrainTrait: Send {
    /// Returns the (unique) tag of this instance
    fn tag(&self) -> usize;

    /// Returns the stable type tag
    fn kind(&self) -> MaterialKind;

    /// Returns the Mandel representation of strain and stress
    fn mandel(&self) -> Mandel;

    /// Returns the order of the strain vector
    fn order(&self) -> usize {
        self.mandel().dim()
    }

    /// Indicates that the tangent stiffness is symmetric
    fn symmetric_stiffness(&self) -> bool;

    /// Sets the trial strain (Mandel components) and computes the trial stress and tangent
    fn set_trial_strain(&mut self, strain: &Vector) -> Result<(), MatError>;

    /// Returns the trial strain
    fn strain(&self) -> &Tensor2;

    /// Returns the trial stress
    fn stress(&self) -> &Tensor2;

    /// Returns the trial (consistent) tangent modulus
    fn tangent(&self) -> &Tensor4;

    /// Returns the tangent at zero strain of the virgin material
    fn initial_tangent(&self) -> &Tensor4;

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
    fn get_copy(&self) -> Box<dyn StressStrainTrait>;

    /// Writes the configuration and the committed state into the buffer
    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError>;

    /// Informs the material about the current analysis phase
    fn set_analysis_phase(&mut self, _phase: AnalysisPhase) {}
}

impl Clone for Box<dyn StressStrainTrait> {
    fn clone(&self) -> Self {
        self.get_copy()
    }
}

/// Checks the order of a strain vector against the Mandel representation of a material
pub(crate) fn check_order(tag: usize, mandel: Mandel, strain: &Vector) -> Result<(), MatError> {
    if strain.dim() != mandel.dim() {
        return Err(MatError::Dimension {
            tag,
            operation: "set_trial_strain",
            expected: mandel.dim(),
            given: strain.dim(),
        });
    }
    Ok(())
}
