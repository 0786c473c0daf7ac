use crate::StrError;
use russell_tensor::Mandel;
use serde::{Deserialize, Serialize};

/// Defines the geometry idealization (plane-strain, plane-stress, 3D) of n-dimensional materials
///
/// # Default values
///
/// * In 2D, the default choice is **plane-strain**
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Idealization {
    /// Indicates 2D instead of 3D
    pub two_dim: bool,

    /// Indicates a plane-stress idealization in 2D
    pub plane_stress: bool,
}

impl Idealization {
    /// Allocates a new instance
    ///
    /// # Default values
    ///
    /// * `2D`: plane-strain
    /// * `3D`: no idealization
    pub fn new(ndim: usize) -> Self {
        Idealization {
            two_dim: ndim == 2,
            plane_stress: false,
        }
    }

    /// Sets a 2D plane-stress idealization
    pub fn set_plane_stress(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        if flag && !self.two_dim {
            return Err("plane-stress requires a 2D idealization");
        }
        self.plane_stress = flag;
        Ok(self)
    }

    /// Returns the symmetric Mandel representation associated with the idealization
    ///
    /// # Results
    ///
    /// * `2D`: [Mandel::Symmetric2D]
    /// * `3D`: [Mandel::Symmetric]
    pub fn mandel(&self) -> Mandel {
        if self.two_dim {
            Mandel::Symmetric2D
        } else {
            Mandel::Symmetric
        }
    }

    /// Returns the order (number of Mandel components) of strain and stress vectors
    pub fn order(&self) -> usize {
        self.mandel().dim()
    }

    /// Returns the idealization corresponding to an order (4 → 2D or 6 → 3D)
    pub(crate) fn from_order(order: usize) -> Result<Self, StrError> {
        match order {
            4 => Ok(Idealization::new(2)),
            6 => Ok(Idealization::new(3)),
            _ => Err("order must be 4 (2D) or 6 (3D)"),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
