use super::{pack_uniaxial, receive_uniaxial, UniaxialTrait};
use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind};

/// Implements a uniform handle owning exactly one uniaxial material
///
/// Every operation is forwarded unchanged to the owned material.
#[derive(Clone)]
pub struct Encapsulated {
    tag: usize,
    inner: Box<dyn UniaxialTrait>,
}

impl Encapsulated {
    /// Allocates a new instance taking ownership of `inner`
    pub fn new(tag: usize, inner: Box<dyn UniaxialTrait>) -> Self {
        Encapsulated { tag, inner }
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let inner = receive_uniaxial(buffer)?;
        Ok(Encapsulated { tag, inner })
    }

    /// Returns the owned material
    pub fn inner(&self) -> &dyn UniaxialTrait {
        self.inner.as_ref()
    }
}

impl UniaxialTrait for Encapsulated {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::Encapsulated
    }

    fn set_trial_strain(&mut self, strain: f64, strain_rate: f64) -> Result<(), MatError> {
        self.inner.set_trial_strain(strain, strain_rate)
    }

    fn strain(&self) -> f64 {
        self.inner.strain()
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
        self.inner.revert_to_start()
    }

    fn get_copy(&self) -> Box<dyn UniaxialTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        pack_uniaxial(self.inner.as_ref(), buffer)
    }

    fn set_analysis_phase(&mut self, phase: AnalysisPhase) {
        self.inner.set_analysis_phase(phase);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
