use super::nd_state::{copy_strain, read_tensor2, write_tensor2};
use super::{check_order, StateRecord, StressStrainTrait};
use crate::base::{Buffer, Idealization, MatError, MaterialKind};
use russell_lab::Vector;
use russell_tensor::{t4_ddot_t2, LinElasticity, Mandel, Tensor2, Tensor4};

#[derive(Clone, Debug)]
struct ElasticNdState {
    strain: Tensor2,
    stress: Tensor2,
}

/// Implements the isotropic linear elastic model
///
/// ```text
/// σ = D : ε
/// ```
///
/// The modulus follows the idealization (plane-strain, plane-stress or 3D).
#[derive(Clone, Debug)]
pub struct LinearElasticNd {
    tag: usize,
    ideal: Idealization,
    young: f64,
    poisson: f64,
    modulus: Tensor4,
    state: StateRecord<ElasticNdState>,
}

impl LinearElasticNd {
    /// Allocates a new instance
    pub fn new(tag: usize, ideal: &Idealization, young: f64, poisson: f64) -> Result<Self, MatError> {
        if young <= 0.0 {
            return Err(MatError::Config {
                tag,
                reason: "young must be > 0.0",
            });
        }
        if poisson <= -1.0 || poisson >= 0.5 {
            return Err(MatError::Config {
                tag,
                reason: "poisson must be in (-1.0, 0.5)",
            });
        }
        let lin = LinElasticity::new(young, poisson, ideal.two_dim, ideal.plane_stress);
        let mut modulus = Tensor4::new(ideal.mandel());
        modulus.set_tensor(1.0, lin.get_modulus());
        Ok(LinearElasticNd {
            tag,
            ideal: *ideal,
            young,
            poisson,
            modulus,
            state: StateRecord::new(LinearElasticNd::virgin(ideal.mandel())),
        })
    }

    /// Reconstructs an instance from a marshaling buffer
    ///
    /// The plane-stress flag is read from the buffer and overrides the one in `ideal`.
    pub fn receive_data(tag: usize, ideal: &Idealization, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let mut ideal = *ideal;
        let plane_stress = buffer.pull_bool().map_err(&to_err)?;
        ideal.set_plane_stress(plane_stress).map_err(&to_err)?;
        let ideal = &ideal;
        let young = buffer.pull().map_err(&to_err)?;
        let poisson = buffer.pull().map_err(&to_err)?;
        let mut committed = LinearElasticNd::virgin(ideal.mandel());
        read_tensor2(&mut committed.strain, buffer).map_err(&to_err)?;
        read_tensor2(&mut committed.stress, buffer).map_err(&to_err)?;
        let mut material = LinearElasticNd::new(tag, ideal, young, poisson)?;
        material.state = StateRecord::from_committed(committed);
        Ok(material)
    }

    fn virgin(mandel: Mandel) -> ElasticNdState {
        ElasticNdState {
            strain: Tensor2::new(mandel),
            stress: Tensor2::new(mandel),
        }
    }
}

impl StressStrainTrait for LinearElasticNd {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::LinearElasticNd
    }

    fn mandel(&self) -> Mandel {
        self.ideal.mandel()
    }

    /// Indicates that the stiffness matrix is symmetric and constant
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    fn set_trial_strain(&mut self, strain: &Vector) -> Result<(), MatError> {
        check_order(self.tag, self.ideal.mandel(), strain)?;
        let trial = self.state.begin_trial();
        copy_strain(&mut trial.strain, strain);
        t4_ddot_t2(&mut trial.stress, 1.0, &self.modulus, &trial.strain); // σ = D : ε
        Ok(())
    }

    fn strain(&self) -> &Tensor2 {
        &self.state.trial().strain
    }

    fn stress(&self) -> &Tensor2 {
        &self.state.trial().stress
    }

    fn tangent(&self) -> &Tensor4 {
        &self.modulus
    }

    fn initial_tangent(&self) -> &Tensor4 {
        &self.modulus
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
        self.state.reset(LinearElasticNd::virgin(self.ideal.mandel()));
        Ok(())
    }

    fn get_copy(&self) -> Box<dyn StressStrainTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        let committed = self.state.committed();
        buffer.push_bool(self.ideal.plane_stress);
        buffer.push(self.young);
        buffer.push(self.poisson);
        write_tensor2(&committed.strain, buffer);
        write_tensor2(&committed.stress, buffer);
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
