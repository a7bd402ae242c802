//! Render pipelines.
//!
//! - `basic` draws shaded, instanced meshes (spheres, pyramids, labels)
//! - `points` draws point clouds as depth-ignoring, alpha blended sprites
//! - `light` owns the single scene light shared by the mesh shader

pub mod basic;
pub mod light;
pub mod points;

/// All pipelines the engine batches renders into.
#[derive(Debug)]
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub points: wgpu::RenderPipeline,
}
