//! CPU-side mesh generation.
//!
//! Everything here produces a [`Geometry`], an indexed triangle list with
//! per-vertex normals, that [`crate::data_structures::model::Mesh::from_geometry`]
//! uploads to the GPU. Nothing in this module touches wgpu, so it is tested
//! directly from `tests/`.
//!
//! - [`shapes`]: UV spheres and n-sided cones (the pyramids)
//! - [`triangulate`]: ear clipping for polygons with holes
//! - [`extrude`]: turns 2D shapes into closed solids (the 3D text)

pub mod extrude;
pub mod shapes;
pub mod triangulate;

use crate::data_structures::model::ModelVertex;

/// An indexed triangle list. Triangles are counter-clockwise when seen from
/// the side their normals point to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn vertices(&self) -> Vec<ModelVertex> {
        self.positions
            .iter()
            .zip(self.normals.iter())
            .map(|(position, normal)| ModelVertex {
                position: *position,
                normal: *normal,
            })
            .collect()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub(crate) fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3]) -> u32 {
        self.positions.push(position);
        self.normals.push(normal);
        (self.positions.len() - 1) as u32
    }

    /// Move every vertex by `offset`.
    pub fn translate(&mut self, offset: [f32; 3]) {
        for p in self.positions.iter_mut() {
            p[0] += offset[0];
            p[1] += offset[1];
            p[2] += offset[2];
        }
    }

    /// Append `other`, keeping its triangles intact.
    pub fn merge(&mut self, other: &Geometry) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

/// A planar region: one outer contour and any number of holes cut out of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub outline: Vec<[f32; 2]>,
    pub holes: Vec<Vec<[f32; 2]>>,
}

impl Shape {
    pub fn new(outline: Vec<[f32; 2]>) -> Self {
        Self {
            outline,
            holes: Vec::new(),
        }
    }
}

/// Signed shoelace area, positive for counter-clockwise contours in a y-up plane.
pub fn signed_area(contour: &[[f32; 2]]) -> f32 {
    let n = contour.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let p = contour[i];
        let q = contour[(i + 1) % n];
        sum += p[0] * q[1] - q[0] * p[1];
    }
    sum * 0.5
}

/// Even-odd point in polygon test.
pub fn point_in_polygon(point: [f32; 2], polygon: &[[f32; 2]]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a[1] > point[1]) != (b[1] > point[1]) {
            let x = (b[0] - a[0]) * (point[1] - a[1]) / (b[1] - a[1]) + a[0];
            if point[0] < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Drop a repeated closing point and consecutive duplicates.
pub fn clean_contour(contour: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let mut out: Vec<[f32; 2]> = Vec::with_capacity(contour.len());
    for p in contour {
        if out.last().is_some_and(|last| points_equal(*last, *p)) {
            continue;
        }
        out.push(*p);
    }
    while out.len() > 1 && points_equal(out[0], out[out.len() - 1]) {
        out.pop();
    }
    out
}

pub(crate) fn points_equal(a: [f32; 2], b: [f32; 2]) -> bool {
    (a[0] - b[0]).abs() <= f32::EPSILON && (a[1] - b[1]).abs() <= f32::EPSILON
}
