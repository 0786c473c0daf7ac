//! Implements the material state machine, laws, wrappers and factory

mod drucker_prager;
mod elastic;
mod encapsulated;
mod factory;
mod hardening;
mod init_strain;
mod init_stress;
mod initial_state;
mod inverted;
mod library;
mod linear_elastic;
mod loading_path;
mod local_newton;
mod nd_state;
mod parallel;
mod path_independent;
mod plastic_1d;
mod plasticity_trait;
mod series;
mod state_record;
mod stress_strain_trait;
mod tension_only;
mod uniaxial_trait;
mod von_mises;
pub use crate::material::drucker_prager::*;
pub use crate::material::elastic::*;
pub use crate::material::encapsulated::*;
pub use crate::material::factory::*;
pub use crate::material::hardening::*;
pub use crate::material::init_strain::*;
pub use crate::material::init_stress::*;
pub use crate::material::initial_state::*;
pub use crate::material::inverted::*;
pub use crate::material::library::*;
pub use crate::material::linear_elastic::*;
pub use crate::material::loading_path::*;
pub use crate::material::local_newton::*;
pub use crate::material::parallel::*;
pub use crate::material::path_independent::*;
pub use crate::material::plastic_1d::*;
pub use crate::material::plasticity_trait::*;
pub use crate::material::series::*;
pub use crate::material::state_record::*;
pub use crate::material::stress_strain_trait::*;
pub use crate::material::tension_only::*;
pub use crate::material::uniaxial_trait::*;
pub use crate::material::von_mises::*;
