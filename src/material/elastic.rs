use super::{StateRecord, UniaxialTrait};
use crate::base::{Buffer, MatError, MaterialKind};

#[derive(Clone, Debug, PartialEq)]
struct ElasticState {
    strain: f64,
    strain_rate: f64,
    stress: f64,
}

/// Implements a linear (visco) elastic uniaxial material
///
/// ```text
/// σ = E ε + η dε/dt
/// ```
#[derive(Clone, Debug)]
pub struct Elastic {
    tag: usize,

    /// Young's modulus
    young: f64,

    /// Viscous damping coefficient
    eta: f64,

    state: StateRecord<ElasticState>,
}

impl Elastic {
    /// Allocates a new instance
    pub fn new(tag: usize, young: f64, eta: f64) -> Result<Self, MatError> {
        if young <= 0.0 {
            return Err(MatError::Config {
                tag,
                reason: "young must be > 0.0",
            });
        }
        if eta < 0.0 {
            return Err(MatError::Config {
                tag,
                reason: "eta must be ≥ 0.0",
            });
        }
        Ok(Elastic {
            tag,
            young,
            eta,
            state: StateRecord::new(Elastic::virgin()),
        })
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let young = buffer.pull().map_err(&to_err)?;
        let eta = buffer.pull().map_err(&to_err)?;
        let committed = ElasticState {
            strain: buffer.pull().map_err(&to_err)?,
            strain_rate: buffer.pull().map_err(&to_err)?,
            stress: buffer.pull().map_err(&to_err)?,
        };
        let mut material = Elastic::new(tag, young, eta)?;
        material.state = StateRecord::from_committed(committed);
        Ok(material)
    }

    fn virgin() -> ElasticState {
        ElasticState {
            strain: 0.0,
            strain_rate: 0.0,
            stress: 0.0,
        }
    }
}

impl UniaxialTrait for Elastic {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::Elastic
    }

    fn set_trial_strain(&mut self, strain: f64, strain_rate: f64) -> Result<(), MatError> {
        let (young, eta) = (self.young, self.eta);
        let trial = self.state.begin_trial();
        trial.strain = strain;
        trial.strain_rate = strain_rate;
        trial.stress = young * strain + eta * strain_rate;
        Ok(())
    }

    fn strain(&self) -> f64 {
        self.state.trial().strain
    }

    fn strain_rate(&self) -> f64 {
        self.state.trial().strain_rate
    }

    fn stress(&self) -> f64 {
        self.state.trial().stress
    }

    fn tangent(&self) -> f64 {
        self.young
    }

    fn initial_tangent(&self) -> f64 {
        self.young
    }

    fn commit_state(&mut self) -> Result<(), MatError> {
        self.state.commit();
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> Result<(), MatError> {
        self.state.revert();
        Ok(())
    }

    fn revert_to_start(&mut self) -> Result<(), MatError> {
        self.state.reset(Elastic::virgin());
        Ok(())
    }

    fn get_copy(&self) -> Box<dyn UniaxialTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        let committed = self.state.committed();
        buffer.push(self.young);
        buffer.push(self.eta);
        buffer.push(committed.strain);
        buffer.push(committed.strain_rate);
        buffer.push(committed.stress);
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::Elastic;
    use crate::base::{Buffer, MatError};
    use crate::material::UniaxialTrait;
    use russell_lab::{approx_eq, Vector};

    #[test]
    fn new_captures_errors() {
        assert_eq!(
            Elastic::new(1, 0.0, 0.0).err(),
            Some(MatError::Config {
                tag: 1,
                reason: "young must be > 0.0"
            })
        );
        assert_eq!(
            Elastic::new(1, 100.0, -1.0).err(),
            Some(MatError::Config {
                tag: 1,
                reason: "eta must be ≥ 0.0"
            })
        );
    }

    #[test]
    fn set_trial_strain_works() {
        let mut model = Elastic::new(1, 1000.0, 10.0).unwrap();
        assert_eq!(model.stress(), 0.0);
        assert_eq!(model.tangent(), 1000.0);
        model.set_trial_strain(0.002, 0.1).unwrap();
        assert_eq!(model.strain(), 0.002);
        assert_eq!(model.strain_rate(), 0.1);
        assert_eq!(model.stress(), 1000.0 * 0.002 + 10.0 * 0.1);
        assert_eq!(model.tangent(), 1000.0);
        model.revert_to_last_commit().unwrap();
        assert_eq!(model.stress(), 0.0);
    }

    #[test]
    fn set_trial_strain_vector_captures_errors() {
        let mut model = Elastic::new(4, 1000.0, 0.0).unwrap();
        let strain = Vector::from(&[0.001, 0.002]);
        assert_eq!(
            model.set_trial_strain_vector(&strain).err(),
            Some(MatError::Dimension {
                tag: 4,
                operation: "set_trial_strain",
                expected: 1,
                given: 2,
            })
        );
        let strain = Vector::from(&[0.001]);
        model.set_trial_strain_vector(&strain).unwrap();
        approx_eq(model.stress(), 1.0, 1e-15);
    }

    #[test]
    fn send_and_receive_work() {
        let mut model = Elastic::new(2, 1000.0, 5.0).unwrap();
        model.set_trial_strain(0.003, 0.0).unwrap();
        model.commit_state().unwrap();
        model.set_trial_strain(0.004, 0.0).unwrap(); // trial only, not sent
        let mut buffer = Buffer::new();
        model.send_data(&mut buffer).unwrap();
        let received = Elastic::receive_data(2, &mut buffer).unwrap();
        assert_eq!(received.strain(), 0.003);
        approx_eq(received.stress(), 3.0, 1e-15);
        assert_eq!(received.eta, 5.0);
    }
}
