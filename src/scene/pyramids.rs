//! Pyramids hanging above the ocean.

use std::f32::consts::PI;

use cgmath::Rotation3;
use rand::Rng;

use crate::{
    config::{PyramidConfig, WaveConfig},
    data_structures::instance::Instance,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Pyramid {
    pub position: [f32; 3],
    /// Rotation about the x axis in radians, within `(-PI, 0]`.
    pub rotation_x: f32,
    pub palette_index: usize,
}

impl Pyramid {
    pub fn random<R: Rng + ?Sized>(
        pyramids: &PyramidConfig,
        wave: &WaveConfig,
        rng: &mut R,
    ) -> Self {
        let palette_index = if pyramids.palette.is_empty() {
            0
        } else {
            rng.gen_range(0..pyramids.palette.len())
        };
        let rotation_x = -rng.gen_range(0.0..1.0) * PI;
        let [x, z] = wave.scatter(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0));
        Self {
            position: [x, pyramids.y, z],
            rotation_x,
            palette_index,
        }
    }

    pub fn instance(&self) -> Instance {
        Instance {
            position: self.position.into(),
            rotation: cgmath::Quaternion::from_angle_x(cgmath::Rad(self.rotation_x)),
            ..Default::default()
        }
    }
}

pub fn scatter<R: Rng + ?Sized>(
    pyramids: &PyramidConfig,
    wave: &WaveConfig,
    rng: &mut R,
) -> Vec<Pyramid> {
    (0..pyramids.count)
        .map(|_| Pyramid::random(pyramids, wave, rng))
        .collect()
}

/// Group pyramids by colour so each distinct colour becomes one instance batch.
///
/// Palette entries that repeat a colour share a group. Groups keep the order of
/// first appearance in the palette.
pub fn group_by_color<'a>(
    palette: &'a [String],
    pyramids: &[Pyramid],
) -> Vec<(&'a str, Vec<Instance>)> {
    let mut groups: Vec<(&'a str, Vec<Instance>)> = Vec::new();
    for color in palette {
        if !groups.iter().any(|(c, _)| c.eq_ignore_ascii_case(color)) {
            groups.push((color.as_str(), Vec::new()));
        }
    }
    for pyramid in pyramids {
        let Some(color) = palette.get(pyramid.palette_index) else {
            continue;
        };
        if let Some((_, instances)) = groups
            .iter_mut()
            .find(|(c, _)| c.eq_ignore_ascii_case(color))
        {
            instances.push(pyramid.instance());
        }
    }
    groups.retain(|(_, instances)| !instances.is_empty());
    groups
}
