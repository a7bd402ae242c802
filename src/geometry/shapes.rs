use std::f32::consts::PI;

use super::Geometry;

/// A UV sphere centred on the origin.
///
/// Rows run from the north pole (+y) to the south pole, columns wrap around y.
/// The poles collapse into single triangles per column.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let mut geometry = Geometry::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;
            let normal = [
                -phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            ];
            let position = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
            row.push(geometry.push_vertex(position, normal));
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            if iy != 0 {
                geometry.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                geometry.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    geometry
}

/// A closed cone standing on the xz-plane, centred on the origin.
///
/// With four radial segments this is a square pyramid whose base corners sit on
/// the x and z axes. The base is capped, the apex is a point.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Geometry {
    let radial_segments = radial_segments.max(3);
    let half_height = height / 2.0;
    let slope = if height == 0.0 { 0.0 } else { radius / height };
    let mut geometry = Geometry::default();

    // Mantle: one apex vertex per column so every side keeps its own normal
    let mut apex = Vec::with_capacity(radial_segments as usize + 1);
    let mut base = Vec::with_capacity(radial_segments as usize + 1);
    for x in 0..=radial_segments {
        let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
        let (sin, cos) = theta.sin_cos();
        let normal = normalize([sin, slope, cos]);
        apex.push(geometry.push_vertex([0.0, half_height, 0.0], normal));
        base.push(geometry.push_vertex([radius * sin, -half_height, radius * cos], normal));
    }
    for x in 0..radial_segments as usize {
        geometry
            .indices
            .extend_from_slice(&[base[x], base[x + 1], apex[x + 1]]);
    }

    // Base cap, facing down
    let down = [0.0, -1.0, 0.0];
    let centre = geometry.push_vertex([0.0, -half_height, 0.0], down);
    let rim: Vec<u32> = (0..=radial_segments)
        .map(|x| {
            let theta = x as f32 / radial_segments as f32 * 2.0 * PI;
            let (sin, cos) = theta.sin_cos();
            geometry.push_vertex([radius * sin, -half_height, radius * cos], down)
        })
        .collect();
    for x in 0..radial_segments as usize {
        geometry
            .indices
            .extend_from_slice(&[centre, rim[x + 1], rim[x]]);
    }
    geometry
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len == 0.0 {
        return v;
    }
    [v[0] / len, v[1] / len, v[2] / len]
}
