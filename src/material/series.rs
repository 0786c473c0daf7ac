use super::parallel::broadcast;
use super::{pack_uniaxial, receive_uniaxial, StateRecord, UniaxialTrait};
use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind, Settings, MIN_TANGENT_ABS, MIN_TANGENT_RATIO};
use tracing::{debug, warn};

#[derive(Clone, Debug)]
struct SeriesState {
    strain: f64,
    stress: f64,
    tangent: f64,
    member_strains: Vec<f64>,
    // false if the last compliance solve failed
    converged: bool,
}

/// Implements the series composition of uniaxial materials sharing one common stress
///
/// Given the assembly strain ε, the member strains εᵢ are found such that
///
/// ```text
/// σ₁(ε₁) = σ₂(ε₂) = ... = σ      and      Σ εᵢ = ε
/// ```
///
/// by a local iteration on the compliances `fᵢ = 1 / Dᵢ`, starting from the committed member
/// strains. The tangent is the harmonic sum `D = 1 / Σ fᵢ`. Member tangents smaller than
/// `max(MIN_TANGENT_RATIO · |D0ᵢ|, MIN_TANGENT_ABS)` are replaced by that bound.
#[derive(Clone)]
pub struct Series {
    tag: usize,
    settings: Settings,
    members: Vec<Box<dyn UniaxialTrait>>,
    state: StateRecord<SeriesState>,
}

impl Series {
    /// Allocates a new instance taking ownership of the members
    pub fn new(tag: usize, members: Vec<Box<dyn UniaxialTrait>>, settings: &Settings) -> Result<Self, MatError> {
        if members.is_empty() {
            return Err(MatError::Config {
                tag,
                reason: "at least one member is required",
            });
        }
        settings.validate().map_err(MatError::config(tag))?;
        let virgin = Series::virgin(&members);
        Ok(Series {
            tag,
            settings: *settings,
            members,
            state: StateRecord::new(virgin),
        })
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let n_members = buffer.pull_usize().map_err(&to_err)?;
        let settings = Settings::read(buffer).map_err(&to_err)?;
        let committed = SeriesState {
            strain: buffer.pull().map_err(&to_err)?,
            stress: buffer.pull().map_err(&to_err)?,
            tangent: buffer.pull().map_err(&to_err)?,
            member_strains: buffer.pull_vec_sized(n_members).map_err(&to_err)?,
            converged: true,
        };
        let mut members = Vec::with_capacity(n_members);
        for _ in 0..n_members {
            members.push(receive_uniaxial(buffer)?);
        }
        let mut material = Series::new(tag, members, &settings)?;
        material.state = StateRecord::from_committed(committed);
        Ok(material)
    }

    /// Returns the members
    pub fn members(&self) -> &[Box<dyn UniaxialTrait>] {
        &self.members
    }

    /// Returns the trial member strains
    pub fn member_strains(&self) -> &[f64] {
        &self.state.trial().member_strains
    }

    fn virgin(members: &[Box<dyn UniaxialTrait>]) -> SeriesState {
        SeriesState {
            strain: 0.0,
            stress: 0.0,
            tangent: harmonic_sum(members.iter().map(|m| m.initial_tangent())),
            member_strains: vec![0.0; members.len()],
            converged: true,
        }
    }
}

/// Returns the smallest tangent accepted for a member
fn min_tangent(member: &dyn UniaxialTrait) -> f64 {
    f64::max(MIN_TANGENT_RATIO * f64::abs(member.initial_tangent()), MIN_TANGENT_ABS)
}

/// Returns the tangent with its magnitude bounded from below
fn bounded_tangent(member: &dyn UniaxialTrait) -> f64 {
    let tangent = member.tangent();
    let k_min = min_tangent(member);
    if f64::abs(tangent) < k_min {
        k_min
    } else {
        tangent
    }
}

/// Computes 1 / Σ (1 / kᵢ)
fn harmonic_sum<I: Iterator<Item = f64>>(tangents: I) -> f64 {
    let compliance: f64 = tangents.map(|k| 1.0 / f64::max(k, MIN_TANGENT_ABS)).sum();
    1.0 / compliance
}

impl UniaxialTrait for Series {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::Series
    }

    fn set_trial_strain(&mut self, strain: f64, strain_rate: f64) -> Result<(), MatError> {
        let n = self.members.len();
        let tol = self.settings.series_tol;
        let trial = self.state.begin_trial();
        trial.strain = strain;
        trial.converged = true;
        let mut stresses = vec![0.0; n];
        let mut compliances = vec![0.0; n];
        let mut residual = 0.0;
        for it in 0..self.settings.series_max_iterations {
            // evaluate the members (the strain rate is split evenly)
            for (i, member) in self.members.iter_mut().enumerate() {
                if let Err(err) = member.set_trial_strain(trial.member_strains[i], strain_rate / n as f64) {
                    trial.converged = false;
                    return Err(err);
                }
                stresses[i] = member.stress();
                compliances[i] = 1.0 / bounded_tangent(member.as_ref());
            }
            let sum_compliance: f64 = compliances.iter().sum();
            let strain_gap = strain - trial.member_strains.iter().sum::<f64>();
            let weighted: f64 = stresses.iter().zip(&compliances).map(|(s, f)| s * f).sum();
            let stress = (strain_gap + weighted) / sum_compliance;

            // check convergence (equal stresses and compatible strains)
            let s_max = stresses.iter().fold(f64::MIN, |acc, s| f64::max(acc, *s));
            let s_min = stresses.iter().fold(f64::MAX, |acc, s| f64::min(acc, *s));
            let s_abs = stresses.iter().fold(0.0, |acc: f64, s| f64::max(acc, f64::abs(*s)));
            residual = f64::max(s_max - s_min, f64::abs(strain_gap) / sum_compliance);
            if !residual.is_finite() {
                break;
            }
            if residual <= tol * (1.0 + s_abs) {
                trial.stress = stress;
                trial.tangent = 1.0 / sum_compliance;
                debug!(tag = self.tag, iterations = it, "series compliance solve converged");
                return Ok(());
            }

            // update the member strains
            for i in 0..n {
                trial.member_strains[i] += (stress - stresses[i]) * compliances[i];
            }
        }
        trial.converged = false;
        warn!(tag = self.tag, residual, "series compliance solve failed");
        Err(MatError::NonConvergence {
            tag: self.tag,
            operation: "series compliance solve",
            iterations: self.settings.series_max_iterations,
            residual,
        })
    }

    fn strain(&self) -> f64 {
        self.state.trial().strain
    }

    fn stress(&self) -> f64 {
        self.state.trial().stress
    }

    fn tangent(&self) -> f64 {
        self.state.trial().tangent
    }

    fn initial_tangent(&self) -> f64 {
        harmonic_sum(self.members.iter().map(|m| m.initial_tangent()))
    }

    fn check_commit(&self) -> Result<(), MatError> {
        if !self.state.trial().converged {
            return Err(MatError::CommitRejected {
                tag: self.tag,
                reason: "series compliance solve did not converge",
            });
        }
        for member in &self.members {
            member.check_commit()?;
        }
        Ok(())
    }

    fn commit_state(&mut self) -> Result<(), MatError> {
        if let Err(err) = self.check_commit() {
            warn!(tag = self.tag, member = err.tag(), "series commit rejected");
            return Err(err);
        }
        for member in &mut self.members {
            member.commit_state()?;
        }
        self.state.commit();
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> Result<(), MatError> {
        self.state.revert();
        broadcast(&mut self.members, |m| m.revert_to_last_commit())
    }

    fn revert_to_start(&mut self) -> Result<(), MatError> {
        let res = broadcast(&mut self.members, |m| m.revert_to_start());
        self.state.reset(Series::virgin(&self.members));
        res
    }

    fn get_copy(&self) -> Box<dyn UniaxialTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        let committed = self.state.committed();
        buffer.push_usize(self.members.len());
        self.settings.write(buffer);
        buffer.push(committed.strain);
        buffer.push(committed.stress);
        buffer.push(committed.tangent);
        buffer.push_slice(&committed.member_strains);
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

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Series;
    use crate::base::{Buffer, MatError, Settings};
    use crate::material::{pack_uniaxial, receive_uniaxial};
    use crate::material::{Elastic, LinearHardening, PerfectPlastic, Plastic1d, UniaxialTrait};
    use russell_lab::approx_eq;

    fn elastic_pair() -> Vec<Box<dyn UniaxialTrait>> {
        vec![
            Box::new(Elastic::new(1, 1000.0, 0.0).unwrap()),
            Box::new(Elastic::new(2, 3000.0, 0.0).unwrap()),
        ]
    }

    fn elastoplastic_pair() -> Vec<Box<dyn UniaxialTrait>> {
        let hardening = LinearHardening {
            sigma_y: 100.0,
            h_iso: 500.0,
            h_kin: 0.0,
        };
        let perfect = PerfectPlastic {
            fy_pos: 150.0,
            fy_neg: 150.0,
        };
        vec![
            Box::new(Plastic1d::new(1, 1000.0, hardening, &Settings::new()).unwrap()),
            Box::new(Plastic1d::new(2, 2000.0, perfect, &Settings::new()).unwrap()),
        ]
    }

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            Series::new(3, Vec::new(), &Settings::new()).err(),
            Some(MatError::Config {
                tag: 3,
                reason: "at least one member is required"
            })
        );
    }

    #[test]
    fn elastic_members_work() {
        let mut model = Series::new(3, elastic_pair(), &Settings::new()).unwrap();
        approx_eq(model.initial_tangent(), 750.0, 1e-12);
        approx_eq(model.tangent(), 750.0, 1e-12);
        model.set_trial_strain(0.004, 0.0).unwrap();
        approx_eq(model.stress(), 3.0, 1e-10);
        approx_eq(model.tangent(), 750.0, 1e-12);
        approx_eq(model.member_strains()[0], 0.003, 1e-12);
        approx_eq(model.member_strains()[1], 0.001, 1e-12);
    }

    #[test]
    fn members_share_the_stress_and_strains_add() {
        let settings = Settings::new();
        let mut model = Series::new(3, elastoplastic_pair(), &settings).unwrap();
        for strain in [0.05, 0.12, 0.2, 0.08] {
            model.set_trial_strain(strain, 0.0).unwrap();
            let s0 = model.members()[0].stress();
            let s1 = model.members()[1].stress();
            assert!(f64::abs(s0 - s1) <= settings.series_tol * (1.0 + f64::abs(s0)));
            approx_eq(model.stress(), s0, 1e-8);
            let sum: f64 = model.member_strains().iter().sum();
            approx_eq(sum, strain, 1e-12);
            model.commit_state().unwrap();
        }
    }

    #[test]
    fn plastic_plateau_uses_the_minimum_tangent() {
        let perfect = PerfectPlastic {
            fy_pos: 150.0,
            fy_neg: 150.0,
        };
        let members: Vec<Box<dyn UniaxialTrait>> = vec![
            Box::new(Elastic::new(1, 1000.0, 0.0).unwrap()),
            Box::new(Plastic1d::new(2, 2000.0, perfect, &Settings::new()).unwrap()),
        ];
        let mut model = Series::new(3, members, &Settings::new()).unwrap();
        model.set_trial_strain(0.5, 0.0).unwrap();
        approx_eq(model.stress(), 150.0, 1e-8);
        assert!(model.tangent() > 0.0);
        assert!(model.tangent() < 1e-5);
    }

    #[test]
    fn idempotence_and_revert_work() {
        let mut model = Series::new(3, elastoplastic_pair(), &Settings::new()).unwrap();
        model.set_trial_strain(0.12, 0.0).unwrap();
        let (s, d) = (model.stress(), model.tangent());
        model.set_trial_strain(0.12, 0.0).unwrap();
        assert_eq!(model.stress(), s);
        assert_eq!(model.tangent(), d);
        model.revert_to_last_commit().unwrap();
        assert_eq!(model.stress(), 0.0);
        assert_eq!(model.member_strains(), &[0.0, 0.0]);
    }

    #[test]
    fn non_convergence_is_reported() {
        let mut settings = Settings::new();
        settings.set_series_max_iterations(1).unwrap();
        let mut model = Series::new(5, elastoplastic_pair(), &settings).unwrap();
        match model.set_trial_strain(0.2, 0.0).err() {
            Some(MatError::NonConvergence { tag, operation, .. }) => {
                assert_eq!(tag, 5);
                assert_eq!(operation, "series compliance solve");
            }
            _ => panic!("non-convergence must be reported"),
        }
        assert_eq!(
            model.check_commit().err(),
            Some(MatError::CommitRejected {
                tag: 5,
                reason: "series compliance solve did not converge"
            })
        );
        assert!(model.commit_state().is_err());
        assert_eq!(model.state.committed().strain, 0.0);

        // the committed state is recovered and accepted again
        model.revert_to_last_commit().unwrap();
        assert!(model.check_commit().is_ok());
        model.commit_state().unwrap();
    }

    #[test]
    fn marshaling_works() {
        let mut model = Series::new(3, elastoplastic_pair(), &Settings::new()).unwrap();
        model.set_trial_strain(0.12, 0.0).unwrap();
        model.commit_state().unwrap();
        let mut buffer = Buffer::new();
        pack_uniaxial(&model, &mut buffer).unwrap();
        let mut received = receive_uniaxial(&mut buffer).unwrap();
        assert_eq!(buffer.remaining(), 0);
        assert_eq!(received.stress(), model.stress());
        received.set_trial_strain(0.15, 0.0).unwrap();
        model.set_trial_strain(0.15, 0.0).unwrap();
        approx_eq(received.stress(), model.stress(), 1e-12);
    }

    #[test]
    fn marshaling_keeps_the_member_strains() {
        let mut model = Series::new(3, elastic_pair(), &Settings::new()).unwrap();
        model.set_trial_strain(0.004, 0.0).unwrap();
        model.commit_state().unwrap();
        let mut buffer = Buffer::new();
        model.send_data(&mut buffer).unwrap();
        let received = Series::receive_data(3, &mut buffer).unwrap();
        assert_eq!(buffer.remaining(), 0);
        approx_eq(received.stress(), 3.0, 1e-10);
        approx_eq(received.member_strains()[0], 0.003, 1e-12);
        approx_eq(received.member_strains()[1], 0.001, 1e-12);
    }
}
