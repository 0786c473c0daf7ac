use super::{StateRecord, UniaxialTrait};
use crate::base::{Buffer, MatError, MaterialKind};

#[derive(Clone, Debug)]
struct TensionOnlyState {
    strain: f64,
    stress: f64,
    tangent: f64,
}

/// Implements a nonlinear elastic material that only carries tension, capped at a capacity
///
/// ```text
///        ⎧ 0         if ε ≤ 0
/// σ(ε) = ⎨ E ε       if 0 < E ε < capacity
///        ⎩ capacity  otherwise
/// ```
///
/// The response has no history. Wrap it with [super::Inverted] to obtain a compression-only law.
#[derive(Clone, Debug)]
pub struct TensionOnly {
    tag: usize,
    young: f64,
    capacity: f64,
    state: StateRecord<TensionOnlyState>,
}

impl TensionOnly {
    /// Allocates a new instance
    pub fn new(tag: usize, young: f64, capacity: f64) -> Result<Self, MatError> {
        if young <= 0.0 {
            return Err(MatError::Config {
                tag,
                reason: "young must be > 0.0",
            });
        }
        if capacity <= 0.0 {
            return Err(MatError::Config {
                tag,
                reason: "capacity must be > 0.0",
            });
        }
        let virgin = TensionOnly::evaluate(young, capacity, 0.0);
        Ok(TensionOnly {
            tag,
            young,
            capacity,
            state: StateRecord::new(virgin),
        })
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let young = buffer.pull().map_err(&to_err)?;
        let capacity = buffer.pull().map_err(&to_err)?;
        let strain = buffer.pull().map_err(&to_err)?;
        let mut material = TensionOnly::new(tag, young, capacity)?;
        material.state = StateRecord::from_committed(TensionOnly::evaluate(young, capacity, strain));
        Ok(material)
    }

    /// Evaluates the response at a given strain
    ///
    /// At ε = 0 the tension branch is taken so that the initial tangent is E.
    fn evaluate(young: f64, capacity: f64, strain: f64) -> TensionOnlyState {
        let (stress, tangent) = if strain < 0.0 {
            (0.0, 0.0)
        } else if young * strain < capacity {
            (young * strain, young)
        } else {
            (capacity, 0.0)
        };
        TensionOnlyState {
            strain,
            stress,
            tangent,
        }
    }
}

impl UniaxialTrait for TensionOnly {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::TensionOnly
    }

    fn set_trial_strain(&mut self, strain: f64, _strain_rate: f64) -> Result<(), MatError> {
        let updated = TensionOnly::evaluate(self.young, self.capacity, strain);
        *self.state.begin_trial() = updated;
        Ok(())
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
        self.state.reset(TensionOnly::evaluate(self.young, self.capacity, 0.0));
        Ok(())
    }

    fn get_copy(&self) -> Box<dyn UniaxialTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        buffer.push(self.young);
        buffer.push(self.capacity);
        buffer.push(self.state.committed().strain);
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
