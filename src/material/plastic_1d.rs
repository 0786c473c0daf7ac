use super::{newton_non_negative, Hardening, PlasticityTrait, StateRecord, UniaxialTrait};
use super::{LinearHardening, LinearSoftening, PerfectPlastic, PyHyperbolic, VoceHardening};
use crate::base::{Buffer, MatError, MaterialKind, Settings};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq)]
struct Plastic1dState {
    strain: f64,
    stress: f64,
    tangent: f64,

    /// Plastic strain εp
    eps_p: f64,

    /// Accumulated plastic strain α
    alpha: f64,

    /// Back stress q
    back: f64,

    /// Plastic multiplier Δγ of the last update
    dgamma: f64,

    /// Indicates that the last update involved plastic flow
    loading: bool,

    /// Indicates that all values are finite
    finite: bool,
}

/// Implements the uniaxial elastoplastic return-mapping integrator
///
/// The elastic predictor `σ_tr = E (ε - εp)` is corrected by the backward-Euler update
///
/// ```text
/// σ = σ_tr - E Δγ dir      εp = εp + Δγ dir
/// α = α + Δγ               q  = q + Hk Δγ dir
/// ```
///
/// where `dir = sign(σ_tr - q)` and Δγ ≥ 0 solves
///
/// ```text
/// g(Δγ) = |σ_tr - q| - (E + Hk) Δγ - κ(α + Δγ) = 0
/// ```
///
/// by the Newton method. The consistent tangent is `E (Hk + κ') / (E + Hk + κ')`.
#[derive(Clone, Debug)]
pub struct Plastic1d<H: Hardening> {
    tag: usize,

    /// Young's modulus
    young: f64,

    /// Hardening law
    hardening: H,

    /// Iteration settings
    settings: Settings,

    state: StateRecord<Plastic1dState>,
}

impl<H: Hardening> Plastic1d<H> {
    /// Allocates a new instance
    pub fn new(tag: usize, young: f64, hardening: H, settings: &Settings) -> Result<Self, MatError> {
        if young <= 0.0 {
            return Err(MatError::Config {
                tag,
                reason: "young must be > 0.0",
            });
        }
        hardening.validate(young).map_err(MatError::config(tag))?;
        settings.validate().map_err(MatError::config(tag))?;
        Ok(Plastic1d {
            tag,
            young,
            hardening,
            settings: *settings,
            state: StateRecord::new(Plastic1d::<H>::virgin(young)),
        })
    }

    /// Reconstructs an instance from a marshaling buffer
    pub fn receive_data(tag: usize, buffer: &mut Buffer) -> Result<Self, MatError> {
        let to_err = MatError::marshal(tag, "receive_data");
        let young = buffer.pull().map_err(&to_err)?;
        let hardening = H::read(buffer).map_err(&to_err)?;
        let settings = Settings::read(buffer).map_err(&to_err)?;
        let committed = Plastic1dState {
            strain: buffer.pull().map_err(&to_err)?,
            stress: buffer.pull().map_err(&to_err)?,
            tangent: buffer.pull().map_err(&to_err)?,
            eps_p: buffer.pull().map_err(&to_err)?,
            alpha: buffer.pull().map_err(&to_err)?,
            back: buffer.pull().map_err(&to_err)?,
            dgamma: buffer.pull().map_err(&to_err)?,
            loading: buffer.pull_bool().map_err(&to_err)?,
            finite: true,
        };
        let mut material = Plastic1d::new(tag, young, hardening, &settings)?;
        material.state = StateRecord::from_committed(committed);
        Ok(material)
    }

    /// Returns the hardening law
    pub fn hardening(&self) -> &H {
        &self.hardening
    }

    fn virgin(young: f64) -> Plastic1dState {
        Plastic1dState {
            strain: 0.0,
            stress: 0.0,
            tangent: young,
            eps_p: 0.0,
            alpha: 0.0,
            back: 0.0,
            dgamma: 0.0,
            loading: false,
            finite: true,
        }
    }
}

impl Plastic1d<PyHyperbolic> {
    /// Allocates a new p-y soil spring with elastic stiffness `c_elastic · p_ult / y50`
    pub fn py_soil(
        tag: usize,
        p_ult: f64,
        y50: f64,
        c_elastic: f64,
        c_yield: f64,
        settings: &Settings,
    ) -> Result<Self, MatError> {
        let (hardening, young) = PyHyperbolic::new(p_ult, y50, c_elastic, c_yield).map_err(MatError::config(tag))?;
        Plastic1d::new(tag, young, hardening, settings)
    }
}

/// Elastic perfectly-plastic uniaxial material
pub type ElasticPerfectlyPlastic = Plastic1d<PerfectPlastic>;

/// Uniaxial material with linear isotropic and kinematic hardening
pub type LinearHardeningMaterial = Plastic1d<LinearHardening>;

/// Uniaxial material with saturating isotropic hardening
pub type VoceHardeningMaterial = Plastic1d<VoceHardening>;

/// Uniaxial material with linear softening
pub type LinearSofteningMaterial = Plastic1d<LinearSoftening>;

/// Hyperbolic p-y soil spring
pub type PySoil = Plastic1d<PyHyperbolic>;

impl<H: Hardening> UniaxialTrait for Plastic1d<H> {
    fn tag(&self) -> usize {
        self.tag
    }

    fn kind(&self) -> MaterialKind {
        H::KIND
    }

    fn set_trial_strain(&mut self, strain: f64, _strain_rate: f64) -> Result<(), MatError> {
        let young = self.young;
        let hk = self.hardening.kinematic_modulus();
        let hardening = &self.hardening;
        let settings = &self.settings;
        self.state.begin_trial();
        let (committed, trial) = self.state.split();

        // elastic predictor
        let sigma_tr = young * (strain - committed.eps_p);
        let xi_tr = sigma_tr - committed.back;
        let dir = if xi_tr >= 0.0 { 1.0 } else { -1.0 };
        trial.strain = strain;
        trial.stress = sigma_tr;
        trial.tangent = young;
        trial.dgamma = 0.0;
        trial.loading = false;
        trial.finite = sigma_tr.is_finite();
        if !trial.finite {
            return Ok(());
        }

        // yield check
        let f_tr = f64::abs(xi_tr) - hardening.yield_stress(committed.alpha, dir);
        if f_tr <= 0.0 {
            return Ok(());
        }

        // plastic corrector
        let alpha_n = committed.alpha;
        let tol = settings.yield_tol * (1.0 + f64::abs(xi_tr));
        let res = newton_non_negative(0.0, tol, settings.max_iterations, |dgamma| {
            let alpha = alpha_n + dgamma;
            let g = f64::abs(xi_tr) - (young + hk) * dgamma - hardening.yield_stress(alpha, dir);
            let dg = -(young + hk) - hardening.yield_slope(alpha, dir);
            (g, dg)
        });
        let solution = match res {
            Ok(solution) => solution,
            Err(failure) => {
                trial.finite = false;
                warn!(tag = self.tag, residual = failure.residual, "uniaxial return mapping failed");
                return Err(MatError::NonConvergence {
                    tag: self.tag,
                    operation: "return mapping",
                    iterations: failure.iterations,
                    residual: failure.residual,
                });
            }
        };
        let dgamma = solution.x;
        trial.stress = sigma_tr - young * dgamma * dir;
        trial.eps_p = committed.eps_p + dgamma * dir;
        trial.alpha = alpha_n + dgamma;
        trial.back = committed.back + hk * dgamma * dir;
        trial.dgamma = dgamma;
        trial.loading = dgamma > 0.0;
        let hh = hardening.yield_slope(trial.alpha, dir) + hk;
        trial.tangent = young * hh / (young + hh);
        trial.finite = trial.stress.is_finite() && trial.eps_p.is_finite() && trial.back.is_finite();
        debug!(
            tag = self.tag,
            dgamma,
            iterations = solution.iterations,
            "uniaxial plastic correction"
        );
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
        if let Err(err) = self.check_commit() {
            warn!(tag = self.tag, "commit rejected");
            return Err(err);
        }
        self.state.commit();
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> Result<(), MatError> {
        self.state.revert();
        Ok(())
    }

    fn revert_to_start(&mut self) -> Result<(), MatError> {
        self.state.reset(Plastic1d::<H>::virgin(self.young));
        Ok(())
    }

    fn get_copy(&self) -> Box<dyn UniaxialTrait> {
        Box::new(self.clone())
    }

    fn send_data(&self, buffer: &mut Buffer) -> Result<(), MatError> {
        let committed = self.state.committed();
        buffer.push(self.young);
        self.hardening.write(buffer);
        self.settings.write(buffer);
        buffer.push(committed.strain);
        buffer.push(committed.stress);
        buffer.push(committed.tangent);
        buffer.push(committed.eps_p);
        buffer.push(committed.alpha);
        buffer.push(committed.back);
        buffer.push(committed.dgamma);
        buffer.push_bool(committed.loading);
        Ok(())
    }
}

impl<H: Hardening> PlasticityTrait for Plastic1d<H> {
    fn associated(&self) -> bool {
        true
    }

    fn yield_function(&self) -> f64 {
        let trial = self.state.trial();
        let xi = trial.stress - trial.back;
        let dir = if xi >= 0.0 { 1.0 } else { -1.0 };
        f64::abs(xi) - self.hardening.yield_stress(trial.alpha, dir)
    }

    fn loading(&self) -> bool {
        self.state.trial().loading
    }

    fn algo_lambda(&self) -> f64 {
        self.state.trial().dgamma
    }

    /// Returns `[εp, α, q]`
    fn internal_values(&self) -> Vec<f64> {
        let trial = self.state.trial();
        vec![trial.eps_p, trial.alpha, trial.back]
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
