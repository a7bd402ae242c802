use super::{Geometry, Shape, clean_contour, signed_area, triangulate::triangulate};

/// Extrude planar shapes along +z into closed solids.
///
/// The back cap lies in z = 0 and faces -z, the front cap lies in z = `depth`
/// and faces +z. Side walls get one flat normal per edge.
pub fn extrude(shapes: &[Shape], depth: f32) -> Geometry {
    let mut geometry = Geometry::default();
    for shape in shapes {
        extrude_shape(&mut geometry, shape, depth);
    }
    geometry
}

fn extrude_shape(geometry: &mut Geometry, shape: &Shape, depth: f32) {
    let mut outline = clean_contour(&shape.outline);
    if outline.len() < 3 {
        return;
    }
    if signed_area(&outline) < 0.0 {
        outline.reverse();
    }
    let holes: Vec<Vec<[f32; 2]>> = shape
        .holes
        .iter()
        .map(|hole| {
            let mut hole = clean_contour(hole);
            if signed_area(&hole) > 0.0 {
                hole.reverse();
            }
            hole
        })
        .filter(|hole| hole.len() >= 3)
        .collect();

    let triangles = triangulate(&outline, &holes);
    let flat: Vec<[f32; 2]> = outline
        .iter()
        .chain(holes.iter().flatten())
        .copied()
        .collect();

    // Caps
    let front_base = geometry.positions.len() as u32;
    for p in &flat {
        geometry.push_vertex([p[0], p[1], depth], [0.0, 0.0, 1.0]);
    }
    let back_base = geometry.positions.len() as u32;
    for p in &flat {
        geometry.push_vertex([p[0], p[1], 0.0], [0.0, 0.0, -1.0]);
    }
    for [a, b, c] in &triangles {
        geometry
            .indices
            .extend_from_slice(&[front_base + a, front_base + b, front_base + c]);
        geometry
            .indices
            .extend_from_slice(&[back_base + a, back_base + c, back_base + b]);
    }

    // Walls
    for contour in std::iter::once(&outline).chain(holes.iter()) {
        side_walls(geometry, contour, depth);
    }
}

fn side_walls(geometry: &mut Geometry, contour: &[[f32; 2]], depth: f32) {
    let n = contour.len();
    for i in 0..n {
        let p0 = contour[i];
        let p1 = contour[(i + 1) % n];
        let dx = p1[0] - p0[0];
        let dy = p1[1] - p0[1];
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            continue;
        }
        let normal = [dy / len, -dx / len, 0.0];
        let a = geometry.push_vertex([p0[0], p0[1], 0.0], normal);
        let b = geometry.push_vertex([p1[0], p1[1], 0.0], normal);
        let c = geometry.push_vertex([p1[0], p1[1], depth], normal);
        let d = geometry.push_vertex([p0[0], p0[1], depth], normal);
        geometry.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }
}
