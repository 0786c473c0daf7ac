use super::nd_state::{all_finite, copy_strain, NdState};
use super::{check_order, newton_non_negative, PlasticityTrait, StateRecord, StressStrainTrait};
use crate::base::{Buffer, Idealization, MatError, MaterialKind, Settings};
use russell_lab::Vector;
use russell_tensor::{t2_add, t4_ddot_t2, LinElasticity, Mandel, Tensor2, Tensor4, IDENTITY2, P_SYMDEV};
use std::f64::consts::SQRT_2;
use tracing::{debug, warn};

/// Defines an alias to IDENTITY2
const I: &[f64; 9] = &IDENTITY2;

/// Defines an alias to P_SYMDEV
const PSD: &[[f64; 9]; 9] = &P_SYMDEV;

/// Implements the Drucker-Prager plasticity model with linear hardening of the cohesion
///
/// The cone matches the outer edges of the Mohr-Coulomb surface:
///
/// ```text
/// f = √J2 + η p - ξ (c + H ᾱ)
/// g = √J2 + η̄ p
///
///       6 sin φ                6 cos φ                6 sin ψ
/// η = ───────────────    ξ = ───────────────    η̄ = ───────────────
///     √3 (3 - sin φ)         √3 (3 - sin φ)         √3 (3 - sin ψ)
/// ```
///
/// where p = tr(σ)/3 is the mean stress (positive in tension) and ᾱ is the accumulated
/// equivalent plastic strain. The return mapping first projects onto the smooth part of the
/// cone and falls back to the apex when the projected deviator would reverse.
///
/// **Note:** This model works in 2D (plane-strain only) or 3D.
#[derive(Clone, Debug)]
pub struct DruckerPrager {
    tag: usize,
    ideal: Idealization,
    young: f64,
    poisson: f64,

    /// Apparent cohesion
    c: f64,

    /// Friction angle (degrees)
    phi: f64,

    /// Dilatancy angle (degrees)
    psi: f64,

    /// Hardening of the cohesion
    hh: f64,

    modulus: Tensor4,
    kk: f64,
    gg: f64,
    eta: f64,
    xi: f64,
    eta_bar: f64,
    settings: Settings,
    state: StateRecord<NdState>,

    /// Elastic strain: εe = ε - εp
    eps_e: Tensor2,

    /// Deviatoric stress: s = dev(σ)
    s: Tensor2,
}

impl DruckerPrager {
    /// Allocates a new instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tag: usize,
        ideal: &Idealization,
        young: f64,
        poisson: f64,
        c: f64,
        phi: f64,
        psi: f64,
        hh: f64,
        settings: &Settings,
    ) -> Result<Self, MatError> {
        let to_err = MatError::config(tag);
        if ideal.plane_stress {
            return Err(to_err("Drucker-Prager model does not work in plane-stress"));
        }
        if young <= 0.0 {
            return Err(to_err("young must be > 0.0"));
        }
        if poisson <= -1.0 || poisson >= 0.5 {
            return Err(to_err("poisson must be in (-1.0, 0.5)"));
        }
        if c <= 0.0 {
            return Err(to_err("c must be > 0.0"));
        }
        if phi <= 0.0 || phi >= 90.0 {
            return Err(to_err("phi must be in (0.0, 90.0)"));
        }
        if psi <= 0.0 || psi > phi {
            return Err(to_err("psi must be in (0.0, phi]"));
        }
        if hh < 0.0 {
            return Err(to_err("hh must be ≥ 0.0"));
        }
        settings.validate().map_err(&to_err)?;
        let lin = LinElasticity::new(young, poisson, ideal.two_dim, false);
        let (kk, gg) = lin.get_bulk_shear();
        let mandel = ideal.mandel();
        let mut modulus = Tensor4::new(mandel);
        modulus.set_tensor(1.0, lin.get_modulus());
        let (sin_phi, cos_phi) = f64::sin_cos(phi.to_radians());
        let sin_psi = f64::sin(psi.to_radians());
        let sq3 = f64::sqrt(3.0);
        let virgin = NdState::new(mandel, &modulus);
        Ok(DruckerPrager {
            tag,
            ideal: *ideal,
            young,
            poisson,
            c,
            phi,
            psi,
            hh,
            modulus,
            kk,
            gg,
            eta: 6.0 * sin_phi / (sq3 * (3.0 - sin_phi)),
            xi: 6.0 * cos_phi / (sq3 * (3.0 - sin_phi)),
            eta_bar: 6.0 * sin_psi / (sq3 * (3.0 - sin_psi)),
            settings: *settings,
            state: StateRecord::new(virgin),
            eps_e: Tensor2::new(mandel),
            s: Tensor2::new(mandel),
        })
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, ideal: &Idealization, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let mut values = [0.0; 6];
        for value in values.iter_mut() {
            *value = buffer.pull().map_err(&to_err)?;
        }
        let settings = Settings::read(buffer).map_err(&to_err)?;
        let committed = NdState::read(ideal.mandel(), buffer).map_err(&to_err)?;
        let [young, poisson, c, phi, psi, hh] = values;
        let mut material = DruckerPrager::new(tag, ideal, young, poisson, c, phi, psi, hh, &settings)?;
        material.state = StateRecord::from_committed(committed);
        Ok(material)
    }

    /// Returns the mean stress at the apex of the current cone
    pub fn apex_pressure(&self) -> f64 {
        self.xi * self.cohesion(self.state.trial().alpha) / self.eta
    }

    /// Returns the hardened cohesion c + H ᾱ
    fn cohesion(&self, alpha: f64) -> f64 {
        self.c + self.hh * alpha
    }

    /// Indicates that the last update returned to the apex
    pub fn apex(&self) -> bool {
        self.state.trial().apex
    }
}

impl StressStrainTrait for DruckerPrager {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        MaterialKind::DruckerPrager
    }

    fn mandel(&self) -> Mandel {
        self.ideal.mandel()
    }

    /// Indicates that the stiffness matrix is symmetric (associated flow only)
    fn symmetric_stiffness(&self) -> bool {
        self.phi == self.psi
    }

    fn set_trial_strain(&mut self, strain: &Vector) -> Result<(), MatError> {
        check_order(self.tag, self.ideal.mandel(), strain)?;
        let (kk, gg, hh, c) = (self.kk, self.gg, self.hh, self.c);
        let (eta, xi, eta_bar) = (self.eta, self.xi, self.eta_bar);
        let (tol, max_iterations) = (self.settings.yield_tol, self.settings.max_iterations);
        let tag = self.tag;
        self.state.begin_trial();
        let (committed, trial) = self.state.split();

        // trial stress
        copy_strain(&mut trial.strain, strain);
        t2_add(&mut self.eps_e, 1.0, &trial.strain, -1.0, &committed.eps_p);
        t4_ddot_t2(&mut trial.stress, 1.0, &self.modulus, &self.eps_e); // σ_tr = D : (ε - εp)
        trial.tangent.set_tensor(1.0, &self.modulus);
        trial.dgamma = 0.0;
        trial.loading = false;
        trial.apex = false;
        trial.finite = all_finite(&trial.stress);
        if !trial.finite {
            return Ok(());
        }

        // invariants
        let n = strain.dim();
        let p_tr = trial.stress.invariant_sigma_m();
        trial.stress.deviator(&mut self.s); // s ← s_tr
        let norm_s = self.s.norm();
        let sq_j2 = norm_s / SQRT_2;
        let alpha_n = committed.alpha;
        let f_trial = sq_j2 + eta * p_tr - xi * (c + hh * alpha_n);
        if f_trial <= 0.0 {
            return Ok(());
        }
        let to_err = |failure: super::NewtonFailure, operation: &'static str| {
            warn!(tag, residual = failure.residual, "{} failed", operation);
            MatError::NonConvergence {
                tag,
                operation,
                iterations: failure.iterations,
                residual: failure.residual,
            }
        };

        // return to the smooth part of the cone
        let scale = tol * (1.0 + f_trial.abs());
        let res = newton_non_negative(0.0, scale, max_iterations, |dg| {
            let r = sq_j2 - gg * dg + eta * (p_tr - kk * eta_bar * dg) - xi * (c + hh * (alpha_n + xi * dg));
            let drdx = -gg - kk * eta * eta_bar - xi * xi * hh;
            (r, drdx)
        });
        let dgamma = match res {
            Ok(solution) => solution.x,
            Err(failure) => {
                trial.finite = false;
                return Err(to_err(failure, "Drucker-Prager cone return"));
            }
        };

        let mat = trial.tangent.matrix_mut();
        if sq_j2 - gg * dgamma >= 0.0 {
            let ratio = gg * dgamma / sq_j2;
            let p = p_tr - kk * eta_bar * dgamma;
            let s_tr = self.s.vector();
            let sig = trial.stress.vector_mut();
            for i in 0..n {
                sig[i] = (1.0 - ratio) * s_tr[i] + p * I[i];
            }
            trial.alpha = alpha_n + xi * dgamma;
            trial.dgamma = dgamma;

            // consistent tangent
            let aa = 1.0 / (gg + kk * eta * eta_bar + xi * xi * hh);
            let sq2 = SQRT_2;
            for i in 0..n {
                for j in 0..n {
                    let (ni, nj) = (s_tr[i] / norm_s, s_tr[j] / norm_s);
                    mat.set(
                        i,
                        j,
                        2.0 * gg * (1.0 - ratio) * PSD[i][j]
                            + 2.0 * gg * (ratio - gg * aa) * ni * nj
                            - sq2 * gg * aa * kk * (eta * ni * I[j] + eta_bar * I[i] * nj)
                            + kk * (1.0 - kk * eta * eta_bar * aa) * I[i] * I[j],
                    );
                }
            }
        } else {
            // return to the apex: β (c + H (ᾱ + α Δεv)) - p_tr + K Δεv = 0
            let alp = xi / eta_bar;
            let bet = xi / eta;
            let scale = tol * (1.0 + p_tr.abs());
            let res = newton_non_negative(0.0, scale, max_iterations, |dev| {
                let r = bet * (c + hh * (alpha_n + alp * dev)) - p_tr + kk * dev;
                (r, kk + alp * bet * hh)
            });
            let dev = match res {
                Ok(solution) => solution.x,
                Err(failure) => {
                    trial.finite = false;
                    return Err(to_err(failure, "Drucker-Prager apex return"));
                }
            };
            let p = p_tr - kk * dev;
            let sig = trial.stress.vector_mut();
            for i in 0..n {
                sig[i] = p * I[i];
            }
            trial.alpha = alpha_n + alp * dev;
            trial.dgamma = dev;
            trial.apex = true;
            let factor = kk * (1.0 - kk / (kk + alp * bet * hh));
            for i in 0..n {
                for j in 0..n {
                    mat.set(i, j, factor * I[i] * I[j]);
                }
            }
        }
        trial.loading = true;

        // plastic strain: εp = ε - (s/(2G) + p/(3K) I)
        let p = trial.stress.invariant_sigma_m();
        trial.stress.deviator(&mut self.s);
        t2_add(&mut trial.eps_p, 1.0, &trial.strain, -1.0 / (2.0 * gg), &self.s);
        let eps_p = trial.eps_p.vector_mut();
        for i in 0..n {
            eps_p[i] -= p / (3.0 * kk) * I[i];
        }
        trial.finite = all_finite(&trial.stress) && all_finite(&trial.eps_p);
        debug!(tag, dgamma = trial.dgamma, apex = trial.apex, "Drucker-Prager plastic correction");
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
        for value in [self.young, self.poisson, self.c, self.phi, self.psi, self.hh] {
            buffer.push(value);
        }
        self.settings.write(buffer);
        self.state.committed().write(buffer);
        Ok(())
    }
}

impl PlasticityTrait for DruckerPrager {
    fn associated(&self) -> bool {
        self.phi == self.psi
    }

    fn yield_function(&self) -> f64 {
        let trial = self.state.trial();
        let p = trial.stress.invariant_sigma_m();
        trial.stress.deviator_norm() / SQRT_2 + self.eta * p - self.xi * self.cohesion(trial.alpha)
    }

    fn loading(&self) -> bool {
        self.state.trial().loading
    }

    fn algo_lambda(&self) -> f64 {
        self.state.trial().dgamma
    }

    /// Returns `[ᾱ, c + H ᾱ]`
    fn internal_values(&self) -> Vec<f64> {
        let alpha = self.state.trial().alpha;
        vec![alpha, self.cohesion(alpha)]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
