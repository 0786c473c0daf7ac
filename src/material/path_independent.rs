use super::{pack_uniaxial, receive_uniaxial, UniaxialTrait};
use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind};

/// Implements the path-independent response of one owned uniaxial material
///
/// The owned material is never committed; thus, every trial is evaluated against the
/// virgin history and the response depends on the current strain only.
#[derive(Clone)]
pub struct PathIndependent {
    tag: usize,
    inner: Box<dyn UniaxialTrait>,
}

impl PathIndependent {
    /// Allocates a new instance taking ownership of `inner`
    pub fn new(tag: usize, inner: Box<dyn UniaxialTrait>) -> Self {
        PathIndependent { tag, inner }
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let inner = receive_uniaxial(buffer)?;
        Ok(PathIndependent { tag, inner })
    }
}

impl UniaxialTrait for PathIndependent {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::PathIndependent
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

    fn commit_state(&mut self) -> Result<(), MatError> {
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> Result<(), MatError> {
        Ok(())
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
