use crate::StrError;
use thiserror::Error;

/// Defines the failures reported by material operations
///
/// Every message names the material tag and, when applicable, the operation that failed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MatError {
    /// Invalid or non-physical parameters given at construction
    #[error("material {tag}: invalid configuration: {reason}")]
    Config { tag: usize, reason: StrError },

    /// The order of the strain vector does not match the order of the material
    #[error("material {tag}: {operation} requires a strain vector of order {expected} but got {given}")]
    Dimension {
        tag: usize,
        operation: &'static str,
        expected: usize,
        given: usize,
    },

    /// An internal iteration (return mapping, series solve) exceeded its bound
    #[error("material {tag}: {operation} did not converge after {iterations} iterations (residual = {residual:e})")]
    NonConvergence {
        tag: usize,
        operation: &'static str,
        iterations: usize,
        residual: f64,
    },

    /// The last trial state cannot be persisted
    #[error("material {tag}: commit rejected: {reason}")]
    CommitRejected { tag: usize, reason: StrError },

    /// Sending or receiving the material data failed
    #[error("material {tag}: {operation} failed: {reason}")]
    Marshal {
        tag: usize,
        operation: &'static str,
        reason: StrError,
    },

    /// The factory does not recognize the material name or type code
    #[error("unknown material type: {0}")]
    UnknownType(String),

    /// The material library does not contain the requested tag
    #[error("material {tag} is not defined")]
    NotFound { tag: usize },
}

impl MatError {
    /// Returns the tag of the material that failed (if any)
    pub fn tag(&self) -> Option<usize> {
        match self {
            MatError::Config { tag, .. } => Some(*tag),
            MatError::Dimension { tag, .. } => Some(*tag),
            MatError::NonConvergence { tag, .. } => Some(*tag),
            MatError::CommitRejected { tag, .. } => Some(*tag),
            MatError::Marshal { tag, .. } => Some(*tag),
            MatError::UnknownType(..) => None,
            MatError::NotFound { tag } => Some(*tag),
        }
    }

    /// Returns a closure converting a [StrError] into a configuration error
    pub(crate) fn config(tag: usize) -> impl Fn(StrError) -> MatError {
        move |reason| MatError::Config { tag, reason }
    }

    /// Returns a closure converting a [StrError] into a marshaling error
    pub(crate) fn marshal(tag: usize, operation: &'static str) -> impl Fn(StrError) -> MatError {
        move |reason| MatError::Marshal { tag, operation, reason }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
