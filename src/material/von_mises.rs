use super::nd_state::{all_finite, copy_strain, NdState};
use super::{check_order, newton_non_negative, PlasticityTrait, StateRecord, StressStrainTrait};
use crate::base::{Buffer, Idealization, MatError, MaterialKind, Settings};
use russell_lab::Vector;
use russell_tensor::{t2_add, t4_ddot_t2, LinElasticity, Mandel, Tensor2, Tensor4};
use russell_tensor::{IDENTITY2, P_SYMDEV, SQRT_2_BY_3, SQRT_3_BY_2};
use tracing::{debug, warn};

/// Defines an alias to IDENTITY2
const I: &[f64; 9] = &IDENTITY2;

/// Defines an alias to P_SYMDEV
const PSD: &[[f64; 9]; 9] = &P_SYMDEV;

/// Holds the parameters of the (saturating) isotropic hardening law
#[derive(Clone, Copy, Debug)]
struct IsoHardening {
    /// Initial size of the yield surface (von Mises stress)
    z0: f64,

    /// Linear isotropic hardening coefficient
    hh: f64,

    /// Saturation size of the yield surface
    z_inf: f64,

    /// Saturation rate
    delta: f64,
}

impl IsoHardening {
    /// Calculates the size of the yield surface κ(α)
    fn kappa(&self, alpha: f64) -> f64 {
        let mut kappa = self.z0 + self.hh * alpha;
        if self.delta > 0.0 {
            kappa += (self.z_inf - self.z0) * (1.0 - f64::exp(-self.delta * alpha));
        }
        kappa
    }

    /// Calculates dκ/dα
    fn kappa_slope(&self, alpha: f64) -> f64 {
        let mut slope = self.hh;
        if self.delta > 0.0 {
            slope += (self.z_inf - self.z0) * self.delta * f64::exp(-self.delta * alpha);
        }
        slope
    }
}

/// Implements the von Mises plasticity model with isotropic and kinematic hardening
///
/// The yield function is written in terms of the von Mises stress of the relative stress η = s - β:
///
/// ```text
/// f = √(3/2) ‖η‖ - κ(α)
/// κ(α) = z0 + H α + (z∞ - z0) (1 - exp(-δ α))
/// ```
///
/// The saturation term is only used if δ > 0. The back stress β evolves linearly with modulus Hk.
///
/// **Note:** This model works in 2D (plane-strain only) or 3D.
#[derive(Clone, Debug)]
pub struct VonMises {
    tag: usize,
    ideal: Idealization,
    young: f64,
    poisson: f64,

    /// Elastic modulus
    modulus: Tensor4,

    /// Bulk modulus K
    kk: f64,

    /// Shear modulus G
    gg: f64,

    /// Isotropic hardening law
    iso: IsoHardening,

    /// Linear kinematic hardening coefficient
    hk: f64,

    settings: Settings,
    state: StateRecord<NdState>,

    /// Elastic strain: εe = ε - εp
    eps_e: Tensor2,

    /// Deviatoric stress s = dev(σ) or the flow direction n
    s: Tensor2,

    /// Relative stress: η = s - β
    eta: Tensor2,
}

impl VonMises {
    /// Allocates a new instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tag: usize,
        ideal: &Idealization,
        young: f64,
        poisson: f64,
        z0: f64,
        hh: f64,
        hk: f64,
        z_inf: f64,
        delta: f64,
        settings: &Settings,
    ) -> Result<Self, MatError> {
        let to_err = MatError::config(tag);
        if ideal.plane_stress {
            return Err(to_err("von Mises model does not work in plane-stress"));
        }
        if young <= 0.0 {
            return Err(to_err("young must be > 0.0"));
        }
        if poisson <= -1.0 || poisson >= 0.5 {
            return Err(to_err("poisson must be in (-1.0, 0.5)"));
        }
        if z0 <= 0.0 {
            return Err(to_err("z0 must be > 0.0"));
        }
        if hh < 0.0 {
            return Err(to_err("hh must be ≥ 0.0"));
        }
        if hk < 0.0 {
            return Err(to_err("hk must be ≥ 0.0"));
        }
        if delta < 0.0 {
            return Err(to_err("delta must be ≥ 0.0"));
        }
        if delta > 0.0 && z_inf < z0 {
            return Err(to_err("z_inf must be ≥ z0"));
        }
        settings.validate().map_err(&to_err)?;
        let lin = LinElasticity::new(young, poisson, ideal.two_dim, false);
        let (kk, gg) = lin.get_bulk_shear();
        let mandel = ideal.mandel();
        let mut modulus = Tensor4::new(mandel);
        modulus.set_tensor(1.0, lin.get_modulus());
        let virgin = NdState::new(mandel, &modulus);
        Ok(VonMises {
            tag,
            ideal: *ideal,
            young,
            poisson,
            modulus,
            kk,
            gg,
            iso: IsoHardening { z0, hh, z_inf, delta },
            hk,
            settings: *settings,
            state: StateRecord::new(virgin),
            eps_e: Tensor2::new(mandel),
            s: Tensor2::new(mandel),
            eta: Tensor2::new(mandel),
        })
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, ideal: &Idealization, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let mut values = [0.0; 7];
        for value in values.iter_mut() {
            *value = buffer.pull().map_err(&to_err)?;
        }
        let settings = Settings::read(buffer).map_err(&to_err)?;
        let committed = NdState::read(ideal.mandel(), buffer).map_err(&to_err)?;
        let [young, poisson, z0, hh, hk, z_inf, delta] = values;
        let mut material = VonMises::new(tag, ideal, young, poisson, z0, hh, hk, z_inf, delta, &settings)?;
        material.state = StateRecord::from_committed(committed);
        Ok(material)
    }

    /// Returns the relative stress η = dev(σ) - β of the trial state
    fn relative_stress(&self) -> Tensor2 {
        let trial = self.state.trial();
        let mut eta = Tensor2::new(self.ideal.mandel());
        trial.stress.deviator(&mut eta);
        eta.update(-1.0, &trial.back);
        eta
    }
}

impl StressStrainTrait for VonMises {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::VonMises
    }

    fn mandel(&self) -> Mandel {
        self.ideal.mandel()
    }

    /// Indicates that the stiffness matrix is symmetric
    fn symmetric_stiffness(&self) -> bool {
        true
    }

    fn set_trial_strain(&mut self, strain: &Vector) -> Result<(), MatError> {
        check_order(self.tag, self.ideal.mandel(), strain)?;
        let (kk, gg, hk) = (self.kk, self.gg, self.hk);
        let (tol, max_iterations) = (self.settings.yield_tol, self.settings.max_iterations);
        let iso = self.iso;
        self.state.begin_trial();
        let (committed, trial) = self.state.split();

        // trial stress: σ_tr = D : (ε - εp)
        copy_strain(&mut trial.strain, strain);
        t2_add(&mut self.eps_e, 1.0, &trial.strain, -1.0, &committed.eps_p);
        t4_ddot_t2(&mut trial.stress, 1.0, &self.modulus, &self.eps_e);
        trial.tangent.set_tensor(1.0, &self.modulus);
        trial.dgamma = 0.0;
        trial.loading = false;
        trial.finite = all_finite(&trial.stress);
        if !trial.finite {
            return Ok(());
        }

        // relative stress: η = s_tr - β
        trial.stress.deviator(&mut self.s);
        t2_add(&mut self.eta, 1.0, &self.s, -1.0, &committed.back);
        let norm_eta = self.eta.norm();
        let q_tr = SQRT_3_BY_2 * norm_eta;

        // elastic update
        let alpha_n = committed.alpha;
        let f_trial = q_tr - iso.kappa(alpha_n);
        if f_trial <= 0.0 {
            return Ok(());
        }

        // consistency: q_tr - (3G + Hk) Δλ - κ(α + Δλ) = 0
        let res = newton_non_negative(0.0, tol * (1.0 + q_tr), max_iterations, |dl| {
            let r = q_tr - (3.0 * gg + hk) * dl - iso.kappa(alpha_n + dl);
            let drdx = -(3.0 * gg + hk) - iso.kappa_slope(alpha_n + dl);
            (r, drdx)
        });
        let lambda = match res {
            Ok(solution) => solution.x,
            Err(failure) => {
                trial.finite = false;
                warn!(tag = self.tag, residual = failure.residual, "von Mises return mapping failed");
                return Err(MatError::NonConvergence {
                    tag: self.tag,
                    operation: "von Mises return mapping",
                    iterations: failure.iterations,
                    residual: failure.residual,
                });
            }
        };

        // flow direction n = η / ‖η‖ (stored in s)
        self.s.set_tensor(1.0 / norm_eta, &self.eta);
        let c = SQRT_3_BY_2 * lambda;
        trial.stress.update(-2.0 * gg * c, &self.s); // σ = σ_tr - 2G Δεp
        trial.eps_p.update(c, &self.s);
        trial.back.update(SQRT_2_BY_3 * hk * lambda, &self.s);
        trial.alpha = alpha_n + lambda;
        trial.dgamma = lambda;
        trial.loading = true;

        // consistent tangent: D = K 1⊗1 + 2G θ Psd - 2G θb n⊗n
        let theta = 1.0 - 3.0 * gg * lambda / q_tr;
        let theta_bar = 3.0 * gg / (3.0 * gg + hk + iso.kappa_slope(trial.alpha)) - (1.0 - theta);
        let n = strain.dim();
        let unit = self.s.vector();
        let mat = trial.tangent.matrix_mut();
        for i in 0..n {
            for j in 0..n {
                mat.set(
                    i,
                    j,
                    kk * I[i] * I[j] + 2.0 * gg * theta * PSD[i][j] - 2.0 * gg * theta_bar * unit[i] * unit[j],
                );
            }
        }
        trial.finite = all_finite(&trial.stress) && all_finite(&trial.eps_p);
        debug!(tag = self.tag, lambda, "von Mises plastic correction");
        Ok(())
    }

    fn strain(&self) -> &Tensor2 {
        &self.state.trial().strain
    }

    fn stress(&self) -> &Tensor2 {
        &self.state.trial().stress
    }

    fn tangent(&self) -> &Tensor4 {
        &self.state.trial().tangent
    }

    fn initial_tangent(&self) -> &Tensor4 {
        &self.modulus
    }

    fn check_commit(&self) -> Result<(), MatError> {
        if !self.state.trial().finite {
            return Err(MatError::CommitRejected {
                tag: self.tag,
                reason: "the trial history is not finite",
            });
        }
        Ok(())
    }

    fn commit_state(&mut self) -> Result<(), MatError> {
        self.check_commit()?;
        self.state.commit();
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> Result<(), MatError> {
        self.state.revert();
        Ok(())
    }

    fn revert_to_start(&mut self) -> Result<(), MatError> {
        self.state.reset(NdState::new(self.ideal.mandel(), &self.modulus));
        Ok(())
    }

    fn get_copy(&self) -> Box<dyn StressStrainTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        for value in [
            self.young,
            self.poisson,
            self.iso.z0,
            self.iso.hh,
            self.hk,
            self.iso.z_inf,
            self.iso.delta,
        ] {
            buffer.push(value);
        }
        self.settings.write(buffer);
        self.state.committed().write(buffer);
        Ok(())
    }
}

impl PlasticityTrait for VonMises {
    /// Returns whether this model is associated or not
    fn associated(&self) -> bool {
        true
    }

    /// Calculates the yield function f
    fn yield_function(&self) -> f64 {
        let eta = self.relative_stress();
        SQRT_3_BY_2 * eta.norm() - self.iso.kappa(self.state.trial().alpha)
    }

    fn loading(&self) -> bool {
        self.state.trial().loading
    }

    fn algo_lambda(&self) -> f64 {
        self.state.trial().dgamma
    }

    /// Returns `[α, κ(α)]`
    fn internal_values(&self) -> Vec<f64> {
        let alpha = self.state.trial().alpha;
        vec![alpha, self.iso.kappa(alpha)]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::VonMises;
    use crate::base::{Buffer, Idealization, MatError, Settings};
    use crate::material::{PlasticityTrait, StressStrainTrait};
    use russell_lab::{approx_eq, Vector};

    // strains that bring the plane-strain model exactly to the yield surface (uniaxial-like path)
    fn yield_strains(young: f64, poisson: f64, z0: f64) -> (f64, f64) {
        let dy = z0 * (1.0 - poisson * poisson) / (young * f64::sqrt(1.0 - poisson + poisson * poisson));
        (dy * poisson / (1.0 - poisson), -dy)
    }

    // compares the (xx, yy, xy) block of the tangent; Mandel xy is scaled by 2
    fn check_spo(model: &VonMises, correct: &[[f64; 3]; 3], tol: f64) {
        let map = [0, 1, 3];
        let dd = model.tangent().matrix();
        for i in 0..3 {
            for j in 0..3 {
                let factor = if i == 2 && j == 2 { 2.0 } else { 1.0 };
                approx_eq(dd.get(map[i], map[j]) / factor, correct[i][j], tol);
            }
        }
    }

    #[test]
    fn new_captures_errors() {
        let settings = Settings::new();
        let mut ideal = Idealization::new(2);
        ideal.set_plane_stress(true).unwrap();
        assert_eq!(
            VonMises::new(1, &ideal, 1500.0, 0.25, 9.0, 800.0, 0.0, 0.0, 0.0, &settings).err(),
            Some(MatError::Config {
                tag: 1,
                reason: "von Mises model does not work in plane-stress"
            })
        );
        let ideal = Idealization::new(2);
        assert_eq!(
            VonMises::new(1, &ideal, 1500.0, 0.25, 0.0, 800.0, 0.0, 0.0, 0.0, &settings).err(),
            Some(MatError::Config {
                tag: 1,
                reason: "z0 must be > 0.0"
            })
        );
        assert_eq!(
            VonMises::new(1, &ideal, 1500.0, 0.25, 9.0, 800.0, 0.0, 5.0, 1.0, &settings).err(),
            Some(MatError::Config {
                tag: 1,
                reason: "z_inf must be ≥ z0"
            })
        );
    }

    #[test]
    fn consistent_tangent_works() {
        let settings = Settings::new();
        let ideal = Idealization::new(2);
        let (young, poisson, z0, hh) = (1500.0, 0.25, 9.0, 800.0);
        let mut model = VonMises::new(1, &ideal, young, poisson, z0, hh, 0.0, 0.0, 0.0, &settings).unwrap();
        let (eps_x, eps_y) = yield_strains(young, poisson, z0);

        // elastic update (just below the yield surface)
        let strain = Vector::from(&[0.9999 * eps_x, 0.9999 * eps_y, 0.0, 0.0]);
        model.set_trial_strain(&strain).unwrap();
        assert!(!model.loading());
        assert!(model.yield_function() < 0.0);
        model.commit_state().unwrap();
        let correct = [[1800.0, 600.0, 0.0], [600.0, 1800.0, 0.0], [0.0, 0.0, 600.0]];
        check_spo(&model, &correct, 1e-12);

        // elastoplastic update
        let strain = Vector::from(&[2.0 * eps_x, 2.0 * eps_y, 0.0, 0.0]);
        model.set_trial_strain(&strain).unwrap();
        assert!(model.loading());
        approx_eq(model.algo_lambda(), 3.461538461538463e-3, 1e-12);
        approx_eq(model.yield_function(), 0.0, 1e-10);
        let correct = [
            [1389.940828402367, 924.8520710059172, 0.0],
            [924.8520710059172, 1262.130177514793, 0.0],
            [0.0, 0.0, 392.3076923076923],
        ];
        check_spo(&model, &correct, 1e-10);
        let alpha = model.internal_values()[0];
        approx_eq(model.internal_values()[1], z0 + hh * alpha, 1e-12);
    }

    #[test]
    fn repeated_trials_give_the_same_result() {
        let settings = Settings::new();
        let ideal = Idealization::new(3);
        let mut model = VonMises::new(1, &ideal, 1500.0, 0.25, 9.0, 800.0, 0.0, 0.0, 0.0, &settings).unwrap();
        let strain = Vector::from(&[0.02, -0.01, -0.01, 0.0, 0.0, 0.0]);
        model.set_trial_strain(&strain).unwrap();
        let first = model.stress().vector()[0];
        model.set_trial_strain(&strain).unwrap();
        assert_eq!(model.stress().vector()[0], first);
        model.revert_to_last_commit().unwrap();
        assert_eq!(model.stress().vector()[0], 0.0);
    }

    #[test]
    fn saturation_works() {
        let settings = Settings::new();
        let ideal = Idealization::new(3);
        let (z0, z_inf) = (9.0, 12.0);
        let mut model = VonMises::new(1, &ideal, 1500.0, 0.25, z0, 0.0, 0.0, z_inf, 50.0, &settings).unwrap();
        let strain = Vector::from(&[0.5, -0.25, -0.25, 0.0, 0.0, 0.0]);
        model.set_trial_strain(&strain).unwrap();
        approx_eq(model.yield_function(), 0.0, 1e-6);
        // far beyond yielding, the yield surface has saturated
        approx_eq(model.internal_values()[1], z_inf, 1e-8);
    }

    #[test]
    fn kinematic_hardening_works() {
        let settings = Settings::new();
        let ideal = Idealization::new(3);
        let (z0, hk) = (9.0, 600.0);
        let mut model = VonMises::new(1, &ideal, 1500.0, 0.25, z0, 0.0, hk, 0.0, 0.0, &settings).unwrap();
        let strain = Vector::from(&[0.02, -0.01, -0.01, 0.0, 0.0, 0.0]);
        model.set_trial_strain(&strain).unwrap();
        assert!(model.loading());
        approx_eq(model.yield_function(), 0.0, 1e-9);
        // isotropic size is unchanged
        approx_eq(model.internal_values()[1], z0, 1e-15);
        model.commit_state().unwrap();

        // unloading to zero strain leaves a compressive residual stress
        model.set_trial_strain(&Vector::new(6)).unwrap();
        assert!(model.yield_function() <= 1e-6);
        assert!(model.stress().vector()[0] < 0.0);
    }

    #[test]
    fn commit_rejects_non_finite_states() {
        let settings = Settings::new();
        let ideal = Idealization::new(3);
        let mut model = VonMises::new(1, &ideal, 1500.0, 0.25, 9.0, 800.0, 0.0, 0.0, 0.0, &settings).unwrap();
        model.set_trial_strain(&Vector::from(&[f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0])).unwrap();
        assert_eq!(
            model.commit_state().err(),
            Some(MatError::CommitRejected {
                tag: 1,
                reason: "the trial history is not finite"
            })
        );
    }

    #[test]
    fn send_and_receive_work() {
        let settings = Settings::new();
        let ideal = Idealization::new(2);
        let mut model = VonMises::new(3, &ideal, 1500.0, 0.25, 9.0, 800.0, 100.0, 0.0, 0.0, &settings).unwrap();
        let strain = Vector::from(&[0.02, -0.01, 0.0, 0.005]);
        model.set_trial_strain(&strain).unwrap();
        model.commit_state().unwrap();
        let mut buffer = Buffer::new();
        model.send_data(&mut buffer).unwrap();
        let mut received = VonMises::receive_data(3, &ideal, &mut buffer).unwrap();
        assert_eq!(buffer.remaining(), 0);
        for i in 0..4 {
            assert_eq!(received.stress().vector()[i], model.stress().vector()[i]);
        }
        let next = Vector::from(&[0.03, -0.01, 0.0, 0.0]);
        model.set_trial_strain(&next).unwrap();
        received.set_trial_strain(&next).unwrap();
        for i in 0..4 {
            assert_eq!(received.stress().vector()[i], model.stress().vector()[i]);
        }
    }
}
