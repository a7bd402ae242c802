//! Render composition and pipeline batching.
//!
//! This module defines the [`Render`] enum, which flows use to describe what
//! they want drawn this frame. The engine sorts the parts into batches per
//! pipeline so every pipeline is bound once per frame.
//!
//! # Key types
//!
//! - [`Render<'a>`] is the primary enum describing render operations
//! - [`Instanced<'a>`] contains data for instanced rendering (model + instance buffer)
//! - [`Sprites<'a>`] contains data for point cloud rendering (point buffer + material)
//!

use crate::data_structures::model::{Material, Model};

/// Data for instanced object rendering: a model and its instance buffer.
#[derive(Clone)]
pub struct Instanced<'a> {
    pub instance: &'a wgpu::Buffer,
    pub model: &'a Model,
    pub amount: usize,
}

/// Data for point sprite rendering: one instance per point, coloured by the material.
#[derive(Clone)]
pub struct Sprites<'a> {
    pub points: &'a wgpu::Buffer,
    pub material: &'a Material,
    pub amount: usize,
}

/// Specifies how a scene object should be rendered.
///
/// # Variants
///
/// - `None` renders nothing
/// - `Default(Instanced)` renders a single opaque instanced object
/// - `Defaults(Vec<Instanced>)` renders a batch of opaque instanced objects
/// - `Points(Vec<Sprites>)` renders point clouds on top of the opaque pass
/// - `Composed(Vec<Render>)` recursively renders composition of multiple renders
///
pub enum Render<'a> {
    None,
    Default(Instanced<'a>),
    Defaults(Vec<Instanced<'a>>),
    Points(Vec<Sprites<'a>>),
    Composed(Vec<Render<'a>>),
}

impl<'a> Render<'a> {
    pub(crate) fn set_pipelines(
        self,
        basics: &mut Vec<Instanced<'a>>,
        points: &mut Vec<Sprites<'a>>,
    ) {
        match self {
            Render::Default(instanced) => basics.push(instanced),
            Render::Defaults(mut vec) => basics.append(&mut vec),
            Render::Points(mut vec) => points.append(&mut vec),
            Render::Composed(renders) => renders
                .into_iter()
                .for_each(|render| render.set_pipelines(basics, points)),
            Render::None => (),
        }
    }
}
