use super::{pack_uniaxial, receive_uniaxial, UniaxialTrait};
use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind};
use tracing::warn;

/// Implements the parallel composition of uniaxial materials sharing one common strain
///
/// ```text
/// σ = Σ fᵢ σᵢ(ε)      D = Σ fᵢ Dᵢ(ε)
/// ```
///
/// where the factors `fᵢ` default to one.
///
/// The commit is all-or-nothing: every member is checked with `check_commit` before any
/// member commits; thus, a rejected member leaves all members at their previous committed state.
#[derive(Clone)]
pub struct Parallel {
    tag: usize,
    members: Vec<Box<dyn UniaxialTrait>>,
    factors: Vec<f64>,
}

impl Parallel {
    /// Allocates a new instance taking ownership of the members
    pub fn new(tag: usize, members: Vec<Box<dyn UniaxialTrait>>, factors: Option<Vec<f64>>) -> Result<Self, MatError> {
        if members.is_empty() {
            return Err(MatError::Config {
                tag,
                reason: "at least one member is required",
            });
        }
        let factors = match factors {
            Some(values) => {
                if values.len() != members.len() {
                    return Err(MatError::Config {
                        tag,
                        reason: "the number of factors must equal the number of members",
                    });
                }
                if values.iter().any(|f| !f.is_finite()) {
                    return Err(MatError::Config {
                        tag,
                        reason: "factors must be finite",
                    });
                }
                values
            }
            None => vec![1.0; members.len()],
        };
        Ok(Parallel { tag, members, factors })
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let n_members = buffer.pull_usize().map_err(&to_err)?;
        let factors = buffer.pull_vec_sized(n_members).map_err(&to_err)?;
        let mut members = Vec::with_capacity(n_members);
        for _ in 0..n_members {
            members.push(receive_uniaxial(buffer)?);
        }
        Parallel::new(tag, members, Some(factors))
    }

    /// Returns the members
    pub fn members(&self) -> &[Box<dyn UniaxialTrait>] {
        &self.members
    }
}

impl UniaxialTrait for Parallel {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::Parallel
    }

    fn set_trial_strain(&mut self, strain: f64, strain_rate: f64) -> Result<(), MatError> {
        for member in &mut self.members {
            member.set_trial_strain(strain, strain_rate)?;
        }
        Ok(())
    }

    fn strain(&self) -> f64 {
        self.members[0].strain()
    }

    fn strain_rate(&self) -> f64 {
        self.members[0].strain_rate()
    }

    fn stress(&self) -> f64 {
        self.members.iter().zip(&self.factors).map(|(m, f)| f * m.stress()).sum()
    }

    fn tangent(&self) -> f64 {
        self.members.iter().zip(&self.factors).map(|(m, f)| f * m.tangent()).sum()
    }

    fn initial_tangent(&self) -> f64 {
        self.members
            .iter()
            .zip(&self.factors)
            .map(|(m, f)| f * m.initial_tangent())
            .sum()
    }

    fn check_commit(&self) -> Result<(), MatError> {
        for member in &self.members {
            member.check_commit()?;
        }
        Ok(())
    }

    fn commit_state(&mut self) -> Result<(), MatError> {
        if let Err(err) = self.check_commit() {
            warn!(tag = self.tag, member = err.tag(), "parallel commit rejected");
            return Err(err);
        }
        for member in &mut self.members {
            member.commit_state()?;
        }
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> Result<(), MatError> {
        broadcast(&mut self.members, |m| m.revert_to_last_commit())
    }

    fn revert_to_start(&mut self) -> Result<(), MatError> {
        broadcast(&mut self.members, |m| m.revert_to_start())
    }

    fn get_copy(&self) -> Box<dyn UniaxialTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        buffer.push_usize(self.members.len());
        buffer.push_slice(&self.factors);
        for member in &self.members {
            pack_uniaxial(member.as_ref(), buffer)?;
        }
        Ok(())
    }

    fn set_analysis_phase(&mut self, phase: AnalysisPhase) {
        for member in &mut self.members {
            member.set_analysis_phase(phase);
        }
    }
}

/// Applies an operation to all members and returns the first failure (if any)
///
/// All members receive the operation even if an earlier one fails.
pub(crate) fn broadcast<F>(members: &mut [Box<dyn UniaxialTrait>], mut operation: F) -> Result<(), MatError>
where
    F: FnMut(&mut Box<dyn UniaxialTrait>) -> Result<(), MatError>,
{
    let mut first_error = None;
    for member in members.iter_mut() {
        if let Err(err) = operation(member) {
            first_error.get_or_insert(err);
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Parallel;
    use crate::base::{Buffer, MatError, Settings};
    use crate::material::{pack_uniaxial, receive_uniaxial};
    use crate::material::{Elastic, PerfectPlastic, Plastic1d, UniaxialTrait};
    use russell_lab::approx_eq;

    fn members() -> Vec<Box<dyn UniaxialTrait>> {
        let hardening = PerfectPlastic {
            fy_pos: 400.0,
            fy_neg: 400.0,
        };
        vec![
            Box::new(Elastic::new(1, 1000.0, 0.0).unwrap()),
            Box::new(Plastic1d::new(2, 200000.0, hardening, &Settings::new()).unwrap()),
        ]
    }

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            Parallel::new(3, Vec::new(), None).err(),
            Some(MatError::Config {
                tag: 3,
                reason: "at least one member is required"
            })
        );
        assert_eq!(
            Parallel::new(3, members(), Some(vec![1.0])).err(),
            Some(MatError::Config {
                tag: 3,
                reason: "the number of factors must equal the number of members"
            })
        );
    }

    #[test]
    fn stresses_and_tangents_add() {
        let mut model = Parallel::new(3, members(), None).unwrap();
        assert_eq!(model.initial_tangent(), 201000.0);
        let mut reference = members();
        for strain in [0.001, 0.003, -0.004] {
            model.set_trial_strain(strain, 0.0).unwrap();
            let mut stress = 0.0;
            let mut tangent = 0.0;
            for member in &mut reference {
                member.set_trial_strain(strain, 0.0).unwrap();
                stress += member.stress();
                tangent += member.tangent();
            }
            assert_eq!(model.stress(), stress);
            assert_eq!(model.tangent(), tangent);
        }
    }

    #[test]
    fn factors_work() {
        let mut model = Parallel::new(3, members(), Some(vec![2.0, 0.5])).unwrap();
        model.set_trial_strain(0.003, 0.0).unwrap();
        approx_eq(model.stress(), 2.0 * 3.0 + 0.5 * 400.0, 1e-10);
        approx_eq(model.tangent(), 2.0 * 1000.0, 1e-10);
    }

    #[test]
    fn rejected_commit_leaves_all_members_untouched() {
        let mut model = Parallel::new(3, members(), None).unwrap();
        model.set_trial_strain(0.001, 0.0).unwrap();
        model.commit_state().unwrap();
        model.set_trial_strain(f64::INFINITY, 0.0).unwrap();
        assert_eq!(model.check_commit().err().and_then(|e| e.tag()), Some(2));
        assert!(model.commit_state().is_err());
        model.revert_to_last_commit().unwrap();
        approx_eq(model.members()[0].stress(), 1.0, 1e-15);
        approx_eq(model.members()[1].stress(), 200.0, 1e-10);
    }

    #[test]
    fn marshaling_works() {
        let mut model = Parallel::new(3, members(), Some(vec![2.0, 1.0])).unwrap();
        model.set_trial_strain(0.003, 0.0).unwrap();
        model.commit_state().unwrap();
        let mut buffer = Buffer::new();
        pack_uniaxial(&model, &mut buffer).unwrap();
        let mut received = receive_uniaxial(&mut buffer).unwrap();
        assert_eq!(buffer.remaining(), 0);
        approx_eq(received.stress(), model.stress(), 1e-12);
        received.set_trial_strain(0.0025, 0.0).unwrap();
        model.set_trial_strain(0.0025, 0.0).unwrap();
        approx_eq(received.stress(), model.stress(), 1e-12);
    }

    #[test]
    fn marshaling_keeps_the_factors() {
        let model = Parallel::new(3, members(), Some(vec![1.0, 0.5])).unwrap();
        let mut buffer = Buffer::new();
        model.send_data(&mut buffer).unwrap();
        // number of members followed by the length-prefixed factors
        assert_eq!(&buffer.as_data()[..4], &[2.0, 2.0, 1.0, 0.5]);
        let mut received = Parallel::receive_data(3, &mut buffer).unwrap();
        assert_eq!(buffer.remaining(), 0);
        approx_eq(received.initial_tangent(), 1000.0 + 0.5 * 200000.0, 1e-10);
        received.set_trial_strain(0.003, 0.0).unwrap();
        approx_eq(received.stress(), 3.0 + 0.5 * 400.0, 1e-10);
    }
}
