//! Engine data structures: models, instances, point clouds and textures.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `batch` is an instanced model (one mesh, many transforms, one draw call)
//! - `instance` holds per-instance transformation data
//! - `point_cloud` holds sprite point clouds
//! - `texture` contains the depth texture

pub mod batch;
pub mod instance;
pub mod model;
pub mod point_cloud;
pub mod texture;
