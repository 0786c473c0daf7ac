use super::{pack_uniaxial, receive_uniaxial, UniaxialTrait};
use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind};

/// Implements an initial strain offset applied to one owned uniaxial material
///
/// ```text
/// σ(ε) = σ_inner(ε + ε0)
/// ```
///
/// The owned material is set to ε0 and committed at construction (and at revert-to-start);
/// hence, its history starts from the initial strain.
#[derive(Clone)]
pub struct InitStrain {
    tag: usize,
    eps0: f64,
    inner: Box<dyn UniaxialTrait>,
}

impl InitStrain {
    /// Allocates a new instance taking ownership of `inner`
    pub fn new(tag: usize, inner: Box<dyn UniaxialTrait>, eps0: f64) -> Result<Self, MatError> {
        if !eps0.is_finite() {
            return Err(MatError::Config {
                tag,
                reason: "eps0 must be finite",
            });
        }
        let mut material = InitStrain { tag, eps0, inner };
        material.apply_offset()?;
        Ok(material)
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let eps0 = buffer.pull().map_err(MatError::marshal(tag, "receive_data"))?;
        let inner = receive_uniaxial(buffer)?;
        Ok(InitStrain { tag, eps0, inner })
    }

    /// Returns the initial strain
    pub fn eps0(&self) -> f64 {
        self.eps0
    }

    /// Sets the owned material to the initial strain and commits it
    fn apply_offset(&mut self) -> Result<(), MatError> {
        self.inner.set_trial_strain(self.eps0, 0.0)?;
        self.inner.commit_state()
    }
}

impl UniaxialTrait for InitStrain {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::InitStrain
    }

    fn set_trial_strain(&mut self, strain: f64, strain_rate: f64) -> Result<(), MatError> {
        self.inner.set_trial_strain(strain + self.eps0, strain_rate)
    }

    fn strain(&self) -> f64 {
        self.inner.strain() - self.eps0
    }

    fn strain_rate(&self) -> f64 {
        self.inner.strain_rate()
    }

    fn stress(&self) -> f64 {
        self.inner.stress()
    }

    fn tangent(&self) -> f64 {
        self.inner.tangent()
    }

    fn initial_tangent(&self) -> f64 {
        self.inner.initial_tangent()
    }

    fn check_commit(&self) -> Result<(), MatError> {
        self.inner.check_commit()
    }

    fn commit_state(&mut self) -> Result<(), MatError> {
        self.inner.commit_state()
    }

    fn revert_to_last_commit(&mut self) -> Result<(), MatError> {
        self.inner.revert_to_last_commit()
    }

    fn revert_to_start(&mut self) -> Result<(), MatError> {
        self.inner.revert_to_start()?;
        self.apply_offset()
    }

    fn get_copy(&self) -> Box<dyn UniaxialTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        buffer.push(self.eps0);
        pack_uniaxial(self.inner.as_ref(), buffer)
    }

    fn set_analysis_phase(&mut self, phase: AnalysisPhase) {
        self.inner.set_analysis_phase(phase);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
