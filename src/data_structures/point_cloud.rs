//! Point clouds rendered as camera-facing sprites.
//!
//! Every point becomes one instance of a screen-aligned quad that the point
//! shader expands in view space, so sprites shrink with distance the same way
//! sized points do in a typical WebGL points material.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::model::{Material, Vertex},
    render::{Render, Sprites},
};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointRaw {
    pub position: [f32; 3],
}

impl Vertex for PointRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 5,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

pub struct PointCloud {
    pub name: String,
    pub material: Material,
    pub points: wgpu::Buffer,
    pub amount: usize,
}

impl PointCloud {
    /// Upload world-space points. Returns `None` when there is nothing to draw.
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        positions: &[[f32; 3]],
        material: Material,
    ) -> Option<Self> {
        if positions.is_empty() {
            log::warn!("Point cloud {} has no vertices.", name);
            return None;
        }
        let raw: Vec<PointRaw> = positions
            .iter()
            .map(|position| PointRaw {
                position: *position,
            })
            .collect();
        let points = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Point Buffer", name)),
            contents: bytemuck::cast_slice(&raw),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Some(Self {
            name: name.to_string(),
            material,
            points,
            amount: raw.len(),
        })
    }
}

impl<'a> From<&'a PointCloud> for Sprites<'a> {
    fn from(cloud: &'a PointCloud) -> Self {
        Sprites {
            points: &cloud.points,
            material: &cloud.material,
            amount: cloud.amount,
        }
    }
}

impl<'a> From<&'a PointCloud> for Render<'a> {
    fn from(cloud: &'a PointCloud) -> Self {
        Render::Points(vec![cloud.into()])
    }
}
