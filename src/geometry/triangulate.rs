//! Ear clipping for simple polygons with holes.
//!
//! Holes are merged into the outline through bridge edges (outline vertex to
//! hole vertex and back), which turns the region into a single weakly simple
//! polygon that plain ear clipping can consume. Returned indices address the
//! concatenation `outline ++ holes[0] ++ holes[1] ++ ...` so callers can reuse
//! their own vertex list.

use super::{points_equal, signed_area};

/// Triangulate `outline` minus `holes`.
///
/// Orientation of the inputs does not matter. Every returned triangle is
/// counter-clockwise in a y-up plane.
pub fn triangulate(outline: &[[f32; 2]], holes: &[Vec<[f32; 2]>]) -> Vec<[u32; 3]> {
    if outline.len() < 3 {
        return Vec::new();
    }
    let mut points: Vec<[f32; 2]> = outline.to_vec();
    let mut polygon: Vec<usize> = (0..outline.len()).collect();
    if signed_area(outline) < 0.0 {
        polygon.reverse();
    }

    let mut hole_rings: Vec<Vec<usize>> = Vec::with_capacity(holes.len());
    for hole in holes {
        let start = points.len();
        points.extend_from_slice(hole);
        if hole.len() < 3 {
            continue;
        }
        let mut ring: Vec<usize> = (start..start + hole.len()).collect();
        // holes run clockwise against the counter-clockwise outline
        if signed_area(hole) > 0.0 {
            ring.reverse();
        }
        hole_rings.push(ring);
    }

    // Rightmost holes first, so later bridges never cross earlier ones
    hole_rings.sort_by(|a, b| max_x(&points, b).total_cmp(&max_x(&points, a)));
    for (i, ring) in hole_rings.iter().enumerate() {
        bridge_hole(&points, &mut polygon, ring, &hole_rings[i + 1..]);
    }

    clip_ears(&points, polygon)
}

fn max_x(points: &[[f32; 2]], ring: &[usize]) -> f32 {
    ring.iter()
        .map(|i| points[*i][0])
        .fold(f32::NEG_INFINITY, f32::max)
}

fn bridge_hole(
    points: &[[f32; 2]],
    polygon: &mut Vec<usize>,
    ring: &[usize],
    pending: &[Vec<usize>],
) {
    let Some(m_pos) = (0..ring.len()).max_by(|a, b| {
        points[ring[*a]][0].total_cmp(&points[ring[*b]][0])
    }) else {
        return;
    };
    let m = points[ring[m_pos]];

    let mut best: Option<(usize, f32)> = None;
    for (pos, idx) in polygon.iter().enumerate() {
        let p = points[*idx];
        let dist = (p[0] - m[0]).powi(2) + (p[1] - m[1]).powi(2);
        if best.is_some_and(|(_, d)| d <= dist) {
            continue;
        }
        let visible = !crosses_ring(points, polygon, m, p)
            && !crosses_ring(points, ring, m, p)
            && pending.iter().all(|other| !crosses_ring(points, other, m, p));
        if visible {
            best = Some((pos, dist));
        }
    }
    // Nothing visible means the hole lies outside; fall back to the nearest vertex
    let p_pos = match best {
        Some((pos, _)) => pos,
        None => match nearest(points, polygon, m) {
            Some(pos) => pos,
            None => return,
        },
    };

    let mut spliced = Vec::with_capacity(ring.len() + 2);
    spliced.extend(ring[m_pos..].iter().copied());
    spliced.extend(ring[..=m_pos].iter().copied());
    spliced.push(polygon[p_pos]);
    polygon.splice(p_pos + 1..p_pos + 1, spliced);
}

fn nearest(points: &[[f32; 2]], polygon: &[usize], m: [f32; 2]) -> Option<usize> {
    (0..polygon.len()).min_by(|a, b| {
        let pa = points[polygon[*a]];
        let pb = points[polygon[*b]];
        let da = (pa[0] - m[0]).powi(2) + (pa[1] - m[1]).powi(2);
        let db = (pb[0] - m[0]).powi(2) + (pb[1] - m[1]).powi(2);
        da.total_cmp(&db)
    })
}

/// Whether segment `a-b` properly crosses an edge of the closed `ring`.
fn crosses_ring(points: &[[f32; 2]], ring: &[usize], a: [f32; 2], b: [f32; 2]) -> bool {
    let n = ring.len();
    (0..n).any(|i| {
        let c = points[ring[i]];
        let d = points[ring[(i + 1) % n]];
        if points_equal(c, a) || points_equal(c, b) || points_equal(d, a) || points_equal(d, b) {
            return false;
        }
        segments_cross(a, b, c, d)
    })
}

fn cross(o: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn segments_cross(a: [f32; 2], b: [f32; 2], c: [f32; 2], d: [f32; 2]) -> bool {
    let d1 = cross(a, b, c);
    let d2 = cross(a, b, d);
    let d3 = cross(c, d, a);
    let d4 = cross(c, d, b);
    (d1 > 0.0) != (d2 > 0.0) && (d3 > 0.0) != (d4 > 0.0) && d1 != 0.0 && d2 != 0.0
}

fn in_triangle(p: [f32; 2], a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> bool {
    cross(a, b, p) >= 0.0 && cross(b, c, p) >= 0.0 && cross(c, a, p) >= 0.0
}

fn is_ear(points: &[[f32; 2]], polygon: &[usize], prev: usize, cur: usize, next: usize) -> bool {
    let a = points[polygon[prev]];
    let b = points[polygon[cur]];
    let c = points[polygon[next]];
    if cross(a, b, c) <= 0.0 {
        return false;
    }
    let n = polygon.len();
    (0..n).all(|i| {
        if i == prev || i == cur || i == next {
            return true;
        }
        let p = points[polygon[i]];
        // bridge duplicates share coordinates with the corners
        if points_equal(p, a) || points_equal(p, b) || points_equal(p, c) {
            return true;
        }
        // only reflex vertices can poke into a convex corner
        let before = points[polygon[(i + n - 1) % n]];
        let after = points[polygon[(i + 1) % n]];
        if cross(before, p, after) > 0.0 {
            return true;
        }
        !in_triangle(p, a, b, c)
    })
}

fn clip_ears(points: &[[f32; 2]], mut polygon: Vec<usize>) -> Vec<[u32; 3]> {
    let mut triangles = Vec::with_capacity(polygon.len().saturating_sub(2));
    let mut cursor = 0;
    let mut misses = 0;

    while polygon.len() > 3 {
        let n = polygon.len();
        let cur = cursor % n;
        let prev = (cur + n - 1) % n;
        let next = (cur + 1) % n;

        if is_ear(points, &polygon, prev, cur, next) {
            triangles.push([
                polygon[prev] as u32,
                polygon[cur] as u32,
                polygon[next] as u32,
            ]);
            polygon.remove(cur);
            misses = 0;
            cursor = prev;
            continue;
        }

        cursor = next;
        misses += 1;
        if misses < n {
            continue;
        }

        // A full lap without an ear: drop a degenerate corner if there is one,
        // otherwise clip the most convex corner to make progress.
        misses = 0;
        let corner = |i: usize| {
            let a = points[polygon[(i + n - 1) % n]];
            let b = points[polygon[i]];
            let c = points[polygon[(i + 1) % n]];
            cross(a, b, c)
        };
        if let Some(flat) = (0..n).find(|i| corner(*i).abs() <= f32::EPSILON) {
            polygon.remove(flat);
            cursor = flat;
            continue;
        }
        let forced = (0..n).max_by(|a, b| corner(*a).total_cmp(&corner(*b))).unwrap_or(0);
        if corner(forced) > 0.0 {
            triangles.push([
                polygon[(forced + n - 1) % n] as u32,
                polygon[forced] as u32,
                polygon[(forced + 1) % n] as u32,
            ]);
        }
        polygon.remove(forced);
        cursor = forced;
    }

    if polygon.len() == 3 {
        let [a, b, c] = [polygon[0], polygon[1], polygon[2]];
        if cross(points[a], points[b], points[c]) > 0.0 {
            triangles.push([a as u32, b as u32, c as u32]);
        }
    }
    triangles
}
