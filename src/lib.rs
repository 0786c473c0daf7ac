//! Matsim implements the nonlinear constitutive-material engine of a finite element program
//!
//! A material receives a trial strain from the enclosing element, computes the trial stress and
//! tangent, and keeps its history until the analysis requests a commit or a revert.
//!
//! The [base] module holds parameters, settings, errors and the marshaling buffer.
//! The [material] module holds the trial/commit state machine, the material laws,
//! the composition wrappers, the return-mapping integrators and the factory.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod material;
pub mod prelude;
