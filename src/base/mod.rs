//! Implements the base structures for the material engine

mod buffer;
mod constants;
mod enums;
mod error;
mod idealization;
mod parameters;
mod sample_params;
mod settings;
pub use crate::base::buffer::*;
pub use crate::base::constants::*;
pub use crate::base::enums::*;
pub use crate::base::error::*;
pub use crate::base::idealization::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_params::*;
pub use crate::base::settings::*;
