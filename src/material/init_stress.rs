use super::{pack_uniaxial, receive_uniaxial, UniaxialTrait};
use crate::base::{AnalysisPhase, Buffer, MatError, MaterialKind, Settings};
use tracing::debug;

/// Implements an initial stress imposed on one owned uniaxial material
///
/// At construction (and at revert-to-start), the strain ε0 producing `σ_inner(ε0) = σ0` is
/// found by the Newton method and the owned material is committed at ε0. Afterwards,
///
/// ```text
/// σ(ε) = σ_inner(ε + ε0)
/// ```
#[derive(Clone)]
pub struct InitStress {
    tag: usize,
    sig0: f64,
    eps0: f64,
    settings: Settings,
    inner: Box<dyn UniaxialTrait>,
}

impl InitStress {
    /// Allocates a new instance taking ownership of `inner`
    pub fn new(tag: usize, inner: Box<dyn UniaxialTrait>, sig0: f64, settings: &Settings) -> Result<Self, MatError> {
        if !sig0.is_finite() {
            return Err(MatError::Config {
                tag,
                reason: "sig0 must be finite",
            });
        }
        settings.validate().map_err(MatError::config(tag))?;
        let mut material = InitStress {
            tag,
            sig0,
            eps0: 0.0,
            settings: *settings,
            inner,
        };
        material.find_initial_strain()?;
        Ok(material)
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let sig0 = buffer.pull().map_err(&to_err)?;
        let eps0 = buffer.pull().map_err(&to_err)?;
        let settings = Settings::read(buffer).map_err(&to_err)?;
        let inner = receive_uniaxial(buffer)?;
        Ok(InitStress {
            tag,
            sig0,
            eps0,
            settings,
            inner,
        })
    }

    /// Returns the strain producing the initial stress
    pub fn eps0(&self) -> f64 {
        self.eps0
    }

    /// Solves σ_inner(ε0) = σ0 and commits the owned material at ε0
    fn find_initial_strain(&mut self) -> Result<(), MatError> {
        let tol = self.settings.init_stress_tol * (1.0 + f64::abs(self.sig0));
        let mut eps = 0.0;
        for it in 0..self.settings.init_stress_max_iterations {
            self.inner.set_trial_strain(eps, 0.0).map_err(|_| MatError::Config {
                tag: self.tag,
                reason: "the owned material failed while searching for the initial strain",
            })?;
            let residual = self.sig0 - self.inner.stress();
            if f64::abs(residual) <= tol {
                debug!(tag = self.tag, eps0 = eps, iterations = it, "initial strain found");
                self.eps0 = eps;
                return self.inner.commit_state();
            }
            let tangent = self.inner.tangent();
            if tangent == 0.0 || !tangent.is_finite() {
                break;
            }
            eps += residual / tangent;
        }
        Err(MatError::Config {
            tag: self.tag,
            reason: "cannot find the strain producing the initial stress",
        })
    }
}

impl UniaxialTrait for InitStress {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::InitStress
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
        self.find_initial_strain()
    }

    fn get_copy(&self) -> Box<dyn UniaxialTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        buffer.push(self.sig0);
        buffer.push(self.eps0);
        self.settings.write(buffer);
        pack_uniaxial(self.inner.as_ref(), buffer)
    }

    fn set_analysis_phase(&mut self, phase: AnalysisPhase) {
        self.inner.set_analysis_phase(phase);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::InitStress;
    use crate::base::{MatError, Settings};
    use crate::material::{Elastic, PerfectPlastic, Plastic1d, UniaxialTrait};
    use russell_lab::approx_eq;

    #[test]
    fn initial_stress_is_found() {
        let inner = Box::new(Elastic::new(1, 1000.0, 0.0).unwrap());
        let mut model = InitStress::new(2, inner, 5.0, &Settings::new()).unwrap();
        approx_eq(model.eps0(), 0.005, 1e-15);
        approx_eq(model.stress(), 5.0, 1e-12);
        assert_eq!(model.strain(), 0.0);
        model.set_trial_strain(0.001, 0.0).unwrap();
        approx_eq(model.stress(), 6.0, 1e-12);
    }

    #[test]
    fn unreachable_stress_is_a_configuration_error() {
        let hardening = PerfectPlastic {
            fy_pos: 400.0,
            fy_neg: 400.0,
        };
        let inner = Box::new(Plastic1d::new(1, 200000.0, hardening, &Settings::new()).unwrap());
        assert_eq!(
            InitStress::new(2, inner, 500.0, &Settings::new()).err(),
            Some(MatError::Config {
                tag: 2,
                reason: "cannot find the strain producing the initial stress"
            })
        );
    }
}
