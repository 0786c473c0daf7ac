//! Makes available common structures needed to drive materials
//!
//! You may write `use matsim::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{AnalysisPhase, Buffer, Channel, Idealization, MatError, MaterialKind, MemoryChannel};
pub use crate::base::{ParamNd, ParamUniaxial, SampleParams, Settings};
pub use crate::material::{new_nd, new_nd_by_name, new_uniaxial, new_uniaxial_by_name, MaterialLibrary};
pub use crate::material::{pack_nd, pack_uniaxial, receive_nd, receive_uniaxial};
pub use crate::material::{recv_nd, recv_uniaxial, send_nd, send_uniaxial};
pub use crate::material::{PathRecord, StrainPath};
pub use crate::material::{PlasticityTrait, StressStrainTrait, UniaxialTrait};
