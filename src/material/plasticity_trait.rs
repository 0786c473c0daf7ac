/// Specifies functions exposing the plasticity variables of the trial state
///
/// Implemented by all materials based on the return-mapping integrators.
pub trait PlasticityTrait {
    /// Returns whether the flow rule is associated or not
    fn associated(&self) -> bool;

    /// Calculates the yield function f at the trial state
    fn yield_function(&self) -> f64;

    /// Indicates that the last trial involved plastic flow (elastoplastic loading)
    fn loading(&self) -> bool;

    /// Returns the plastic multiplier (Δγ) of the last trial
    fn algo_lambda(&self) -> f64;

    /// Returns the internal values of the trial state (e.g., accumulated plastic strain)
    fn internal_values(&self) -> Vec<f64>;
}
