use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::{Mesh, Topology};

/// Torus around the Z axis.
///
/// `outer_radius` is the distance from the centre to the middle of the tube
/// and `inner_radius` the tube radius. `rings` vertex rows run around the Z
/// axis with the last one repeating the first; each row has `sides` vertices
/// around the tube, closed by index wrap-around.
pub fn torus(outer_radius: f32, inner_radius: f32, sides: u32, rings: u32) -> Mesh {
    if sides < 3 || rings < 3 {
        log::warn!("torus needs at least 3 sides and 3 rings, got {sides}x{rings}; clamping");
    }
    let sides = sides.max(3);
    let rings = rings.max(3);

    let ring_step = TAU / rings as f32;
    let side_step = TAU / sides as f32;

    let vertex_count = ((rings + 1) * sides) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut texcoords = Vec::with_capacity(vertex_count);

    for ring in 0..=rings {
        let u = ring as f32 * ring_step;
        let (sin_u, cos_u) = u.sin_cos();

        for side in 0..sides {
            let v = side as f32 * side_step;
            let (sin_v, cos_v) = v.sin_cos();
            let r = outer_radius + inner_radius * cos_v;

            positions.push(Vec3::new(r * cos_u, r * sin_u, inner_radius * sin_v));
            normals.push(Vec3::new(cos_v * cos_u, cos_v * sin_u, sin_v).normalize());
            texcoords.push(Vec2::new(u / TAU, v / TAU));
        }
    }

    let mut indices = Vec::with_capacity((rings * sides * 6) as usize);
    for ring in 0..rings {
        let start = ring * sides;
        let next_start = (ring + 1) * sides;
        for side in 0..sides {
            let next_side = (side + 1) % sides;
            indices.extend_from_slice(&[
                start + side,
                next_start + side,
                next_start + next_side,
                start + side,
                next_start + next_side,
                start + next_side,
            ]);
        }
    }

    Mesh::generated(positions, normals, texcoords, indices, Topology::TriangleList)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::triangles;

    #[test]
    fn default_torus_counts() {
        let mesh = torus(0.5, 0.25, 20, 40);
        assert_eq!(mesh.vertex_count(), 41 * 20);
        assert_eq!(mesh.index_count(), 40 * 20 * 6);
    }

    #[test]
    fn last_ring_repeats_first() {
        let sides = 12;
        let mesh = torus(1.0, 0.3, sides, 16);
        let last = mesh.vertex_count() - sides as usize;
        for side in 0..sides as usize {
            assert!(mesh.positions()[side].abs_diff_eq(mesh.positions()[last + side], 1e-5));
        }
    }

    #[test]
    fn normals_point_away_from_tube_centre() {
        let (outer, inner) = (0.5, 0.25);
        let mesh = torus(outer, inner, 8, 10);
        for (p, n) in mesh.positions().iter().zip(mesh.normals()) {
            let around = Vec3::new(p.x, p.y, 0.0).normalize() * outer;
            let radial = *p - around;
            assert!((radial.length() - inner).abs() < 1e-5);
            assert!(radial.normalize().abs_diff_eq(*n, 1e-4));
        }
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = torus(0.5, 0.25, 10, 14);
        let p = mesh.positions();
        let n = mesh.normals();
        for [a, b, c] in triangles(mesh.indices()) {
            let face = (p[b as usize] - p[a as usize]).cross(p[c as usize] - p[a as usize]);
            assert!(face.dot(n[a as usize] + n[b as usize] + n[c as usize]) > 0.0);
        }
    }
}
