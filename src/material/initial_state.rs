use super::nd_state::{copy_strain, read_tensor2, write_tensor2};
use super::{check_order, pack_nd, receive_nd, StateRecord, StressStrainTrait};
use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind};
use russell_lab::Vector;
use russell_tensor::{Mandel, Tensor2, Tensor4};

#[derive(Clone, Debug)]
struct OffsetState {
    /// Strain given by the enclosing element
    strain: Tensor2,

    /// Strain reached at the end of the initial-state phase
    offset: Tensor2,
}

/// Implements the initial-state analysis wrapper of n-dimensional materials
///
/// During [AnalysisPhase::InitialState], the strain is forwarded unchanged and recorded as
/// the offset. During [AnalysisPhase::Regular], the owned material receives `ε + ε_init`;
/// hence, the stresses developed in the initial-state phase remain while the enclosing
/// analysis restarts from zero strain. The offset is part of the committed state.
#[derive(Clone)]
pub struct InitialStateNd {
    tag: usize,
    phase: AnalysisPhase,
    inner: Box<dyn StressStrainTrait>,
    state: StateRecord<OffsetState>,
}

impl InitialStateNd {
    /// Allocates a new instance taking ownership of `inner`
    ///
    /// The wrapper starts in the regular phase with a zero offset.
    pub fn new(tag: usize, inner: Box<dyn StressStrainTrait>) -> Self {
        let virgin = InitialStateNd::virgin(inner.mandel());
        InitialStateNd {
            tag,
            phase: AnalysisPhase::Regular,
            inner,
            state: StateRecord::new(virgin),
        }
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, mandel: Mandel, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let initial = buffer.pull_bool().map_err(&to_err)?;
        let mut committed = InitialStateNd::virgin(mandel);
        read_tensor2(&mut committed.strain, buffer).map_err(&to_err)?;
        read_tensor2(&mut committed.offset, buffer).map_err(&to_err)?;
        let inner = receive_nd(buffer)?;
        Ok(InitialStateNd {
            tag,
            phase: if initial {
                AnalysisPhase::InitialState
            } else {
                AnalysisPhase::Regular
            },
            inner,
            state: StateRecord::from_committed(committed),
        })
    }

    /// Returns the trial offset
    pub fn offset(&self) -> &Tensor2 {
        &self.state.trial().offset
    }

    /// Returns the current analysis phase
    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    /// Returns the owned material
    pub fn inner(&self) -> &dyn StressStrainTrait {
        self.inner.as_ref()
    }

    fn virgin(mandel: Mandel) -> OffsetState {
        OffsetState {
            strain: Tensor2::new(mandel),
            offset: Tensor2::new(mandel),
        }
    }
}

impl StressStrainTrait for InitialStateNd {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::InitialStateNd
    }

    fn mandel(&self) -> Mandel {
        self.inner.mandel()
    }

    fn symmetric_stiffness(&self) -> bool {
        self.inner.symmetric_stiffness()
    }

    fn set_trial_strain(&mut self, strain: &Vector) -> Result<(), MatError> {
        check_order(self.tag, self.inner.mandel(), strain)?;
        let phase = self.phase;
        self.state.begin_trial();
        let (committed, trial) = self.state.split();
        copy_strain(&mut trial.strain, strain);
        let mut effective = strain.clone();
        match phase {
            AnalysisPhase::InitialState => copy_strain(&mut trial.offset, strain),
            AnalysisPhase::Regular => {
                let offset = committed.offset.vector();
                for i in 0..effective.dim() {
                    effective[i] += offset[i];
                }
            }
        }
        self.inner.set_trial_strain(&effective)
    }

    fn strain(&self) -> &Tensor2 {
        &self.state.trial().strain
    }

    fn stress(&self) -> &Tensor2 {
        self.inner.stress()
    }

    fn tangent(&self) -> &Tensor4 {
        self.inner.tangent()
    }

    fn initial_tangent(&self) -> &Tensor4 {
        self.inner.initial_tangent()
    }

    fn check_commit(&self) -> Result<(), MatError> {
        self.inner.check_commit()
    }

    fn commit_state(&mut self) -> Result<(), MatError> {
        self.inner.commit_state()?;
        self.state.commit();
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> Result<(), MatError> {
        self.inner.revert_to_last_commit()?;
        self.state.revert();
        Ok(())
    }

    fn revert_to_start(&mut self) -> Result<(), MatError> {
        self.inner.revert_to_start()?;
        self.state.reset(InitialStateNd::virgin(self.inner.mandel()));
        Ok(())
    }

    fn get_copy(&self) -> Box<dyn StressStrainTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        let committed = self.state.committed();
        buffer.push_bool(self.phase == AnalysisPhase::InitialState);
        write_tensor2(&committed.strain, buffer);
        write_tensor2(&committed.offset, buffer);
        pack_nd(self.inner.as_ref(), buffer)
    }

    fn set_analysis_phase(&mut self, phase: AnalysisPhase) {
        self.phase = phase;
        self.inner.set_analysis_phase(phase);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::InitialStateNd;
    use crate::base::{AnalysisPhase, Buffer, Idealization, MatError, MaterialKind};
    use crate::material::{pack_nd, receive_nd, LinearElasticNd, StressStrainTrait};
    use russell_lab::{approx_eq, Vector};

    fn new_wrapper() -> InitialStateNd {
        let ideal = Idealization::new(2);
        let inner = LinearElasticNd::new(2, &ideal, 1500.0, 0.25).unwrap();
        InitialStateNd::new(1, Box::new(inner))
    }

    #[test]
    fn initial_state_offset_works() {
        let mut model = new_wrapper();
        assert_eq!(model.phase(), AnalysisPhase::Regular);
        assert_eq!(model.kind(), MaterialKind::InitialStateNd);

        // initial-state phase: the strain is forwarded and recorded
        model.set_analysis_phase(AnalysisPhase::InitialState);
        model.set_trial_strain(&Vector::from(&[0.001, 0.0, 0.0, 0.0])).unwrap();
        approx_eq(model.stress().vector()[0], 1.8, 1e-13);
        approx_eq(model.offset().vector()[0], 0.001, 1e-15);
        model.commit_state().unwrap();

        // regular phase: zero strain keeps the initial stress
        model.set_analysis_phase(AnalysisPhase::Regular);
        model.set_trial_strain(&Vector::new(4)).unwrap();
        assert_eq!(model.strain().vector()[0], 0.0);
        approx_eq(model.stress().vector()[0], 1.8, 1e-13);
        approx_eq(model.inner().strain().vector()[0], 0.001, 1e-15);

        // additional strain adds to the offset
        model.set_trial_strain(&Vector::from(&[0.001, 0.0, 0.0, 0.0])).unwrap();
        approx_eq(model.stress().vector()[0], 3.6, 1e-13);
        approx_eq(model.offset().vector()[0], 0.001, 1e-15);
    }

    #[test]
    fn offset_follows_commit_and_revert() {
        let mut model = new_wrapper();
        model.set_analysis_phase(AnalysisPhase::InitialState);
        model.set_trial_strain(&Vector::from(&[0.002, 0.0, 0.0, 0.0])).unwrap();
        model.revert_to_last_commit().unwrap();
        assert_eq!(model.offset().vector()[0], 0.0);
        model.set_trial_strain(&Vector::from(&[0.002, 0.0, 0.0, 0.0])).unwrap();
        model.commit_state().unwrap();
        assert_eq!(model.offset().vector()[0], 0.002);
        model.revert_to_start().unwrap();
        assert_eq!(model.offset().vector()[0], 0.0);
        assert_eq!(model.stress().vector()[0], 0.0);
    }

    #[test]
    fn set_trial_strain_captures_errors() {
        let mut model = new_wrapper();
        assert_eq!(
            model.set_trial_strain(&Vector::new(6)).err(),
            Some(MatError::Dimension {
                tag: 1,
                operation: "set_trial_strain",
                expected: 4,
                given: 6,
            })
        );
    }

    #[test]
    fn send_and_receive_work() {
        let mut model = new_wrapper();
        model.set_analysis_phase(AnalysisPhase::InitialState);
        model.set_trial_strain(&Vector::from(&[0.001, 0.0, 0.0, 0.0])).unwrap();
        model.commit_state().unwrap();
        model.set_analysis_phase(AnalysisPhase::Regular);
        let mut buffer = Buffer::new();
        pack_nd(&model, &mut buffer).unwrap();
        let mut received = receive_nd(&mut buffer).unwrap();
        assert_eq!(received.kind(), MaterialKind::InitialStateNd);
        assert_eq!(received.tag(), 1);
        received.set_trial_strain(&Vector::new(4)).unwrap();
        approx_eq(received.stress().vector()[0], 1.8, 1e-13);
    }
}
