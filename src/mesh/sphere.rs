use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use super::{Mesh, Topology};

pub const MIN_COUNT: u32 = 3;

/// UV sphere centred on the origin, as a quad list.
///
/// `rings` vertex rows run from the south pole (`r = 0`) to the north pole
/// and `sectors` vertex columns run once around the Y axis; the last column
/// duplicates the first so texture coordinates reach 1.0 at the seam. One quad
/// is emitted per cell between adjacent rows and columns, so the seam is
/// closed without any index wrap-around. The cells touching a pole collapse
/// into triangles; [`Mesh::triangulated`] drops the zero-area halves.
///
/// Both counts are clamped to at least 3; below that every cell collapses
/// onto a pole or the seam and nothing survives triangulation.
pub fn sphere(radius: f32, rings: u32, sectors: u32) -> Mesh {
    if rings < MIN_COUNT || sectors < MIN_COUNT {
        log::warn!(
            "sphere needs at least {MIN_COUNT} rings and {MIN_COUNT} sectors, got {rings}x{sectors}; clamping"
        );
    }
    let rings = rings.max(MIN_COUNT);
    let sectors = sectors.max(MIN_COUNT);

    let ring_step = 1.0 / (rings - 1) as f32;
    let sector_step = 1.0 / (sectors - 1) as f32;

    let vertex_count = (rings * sectors) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut texcoords = Vec::with_capacity(vertex_count);

    for r in 0..rings {
        let polar = PI * r as f32 * ring_step;
        let y = (-PI / 2.0 + polar).sin();
        let ring_radius = polar.sin();

        for s in 0..sectors {
            let azimuth = 2.0 * PI * s as f32 * sector_step;
            let unit = Vec3::new(azimuth.cos() * ring_radius, y, azimuth.sin() * ring_radius);

            positions.push(unit * radius);
            normals.push(unit);
            texcoords.push(Vec2::new(s as f32 * sector_step, r as f32 * ring_step));
        }
    }

    let mut indices = Vec::with_capacity(((rings - 1) * (sectors - 1) * 4) as usize);
    for r in 0..rings - 1 {
        for s in 0..sectors - 1 {
            let here = r * sectors + s;
            let above = (r + 1) * sectors + s;
            indices.extend_from_slice(&[here, above, above + 1, here + 1]);
        }
    }

    Mesh::generated(positions, normals, texcoords, indices, Topology::QuadList)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::triangles;

    #[test]
    fn default_sphere_counts() {
        let mesh = sphere(1.0, 20, 30);
        assert_eq!(mesh.vertex_count(), 600);
        assert_eq!(mesh.topology(), Topology::QuadList);
        assert_eq!(mesh.primitive_count(), 19 * 29);
    }

    #[test]
    fn seam_indices_stay_in_range() {
        let mesh = sphere(2.0, 5, 7);
        let max = mesh.indices().iter().copied().max().unwrap();
        assert_eq!(max as usize, mesh.vertex_count() - 1);
    }

    #[test]
    fn seam_column_duplicates_first_column() {
        let sectors = 9;
        let mesh = sphere(1.0, 6, sectors);
        for r in 0..6 {
            let first = mesh.positions()[(r * sectors) as usize];
            let last = mesh.positions()[(r * sectors + sectors - 1) as usize];
            assert!(first.abs_diff_eq(last, 1e-5), "{first:?} vs {last:?}");
        }
    }

    #[test]
    fn pole_rows_lose_their_collapsed_halves() {
        let rings = 6;
        let sectors = 8;
        let tris = sphere(1.0, rings, sectors).triangulated();
        let cells = ((rings - 1) * (sectors - 1)) as usize;
        let pole_cells = 2 * (sectors - 1) as usize;
        assert_eq!(tris.primitive_count(), cells * 2 - pole_cells);
    }

    #[test]
    fn triangles_face_outward() {
        let tris = sphere(1.5, 12, 16).triangulated();
        let p = tris.positions();
        for [a, b, c] in triangles(tris.indices()) {
            let (a, b, c) = (p[a as usize], p[b as usize], p[c as usize]);
            let face = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn tiny_counts_are_clamped() {
        let mesh = sphere(1.0, 0, 2);
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.primitive_count(), 4);
    }

    #[test]
    fn minimum_counts_survive_triangulation() {
        let tris = sphere(1.0, MIN_COUNT, MIN_COUNT).triangulated();
        assert!(!tris.is_empty());
        // Pole cells keep one half each.
        assert_eq!(tris.primitive_count(), 4);
    }
}
