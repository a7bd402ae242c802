//! particle-ocean
//!
//! An animated particle ocean rendered with wgpu, running natively and on WASM.
//! A grid of spheres rides a dual-sine wave, a handful of gold spheres float on
//! top, tropical fish drift below as point clouds, pyramids hang in the sky and
//! user-typed labels are extruded into 3D text that survives a reload.
//!
//! High-level modules
//! - `camera`: look-at camera, projection and the pointer-follow controller
//! - `config`: scene constants with optional `assets/scene.json` overrides
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, materials, instances and point clouds
//! - `flow`: the event loop and the `GraphicsFlow` lifecycle
//! - `geometry`: CPU-side mesh generation (spheres, pyramids, extruded text)
//! - `pipelines`: render pipelines for shaded meshes and point sprites
//! - `render`: render composition for efficient pipeline reuse
//! - `resources`: asset loading (OBJ, typeface fonts, raw files)
//! - `scene`: the ocean scene itself
//! - `storage`: persistence of user labels
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod geometry;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod storage;

pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

use crate::{
    flow::{FlowConstructor, GraphicsFlow},
    scene::{OceanScene, SceneState},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Build the ocean scene and hand it to the event loop. Blocks until the window closes.
pub fn run() -> anyhow::Result<()> {
    let ocean: FlowConstructor<SceneState> = Box::new(|ctx| {
        Box::pin(async move {
            Box::new(OceanScene::new(ctx).await) as Box<dyn GraphicsFlow<_>>
        })
    });
    flow::run(vec![ocean])
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    run().map_err(|e| wasm_bindgen::JsValue::from_str(&e.to_string()))
}
