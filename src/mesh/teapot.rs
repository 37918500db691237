use std::ops::Range;

use glam::{Mat3, Mat4, Vec2, Vec3};

use super::teapot_data::{CONTROL_POINTS, PATCHES};
use super::{Mesh, Topology};

pub const PATCH_COUNT: usize = 32;

/// Patch indices covering the lid (knob and cap).
pub const LID_PATCHES: Range<usize> = 20..28;

/// Squared normal length below which a lattice point sits on a collapsed
/// patch edge.
const DEGENERATE_NORMAL: f32 = 1e-10;
const NORMAL_NUDGE: f32 = 1e-3;

type Patch = [[Vec3; 4]; 4];

struct SurfacePoint {
    position: Vec3,
    d_u: Vec3,
    d_v: Vec3,
}

/// Tessellates the classic bicubic teapot.
///
/// Each of the 32 patches is sampled on a `(grid + 1) x (grid + 1)` lattice
/// and split into `grid * grid` cells of two triangles. Normals come from the
/// patch partial derivatives. Vertices of the lid patches are then moved by
/// `lid_transform` (normals by its inverse transpose), which is how callers
/// close the gap between lid and rim.
///
/// The model is Z-up with its base on `z = 0`.
pub fn teapot(grid: u32, lid_transform: Mat4) -> Mesh {
    if grid == 0 {
        log::warn!("teapot grid must be at least 1; clamping");
    }
    let grid = grid.max(1);
    let side = grid + 1;
    let per_patch = (side * side) as usize;

    let mut positions = Vec::with_capacity(PATCH_COUNT * per_patch);
    let mut normals = Vec::with_capacity(PATCH_COUNT * per_patch);
    let mut texcoords = Vec::with_capacity(PATCH_COUNT * per_patch);
    let mut indices = Vec::with_capacity(PATCH_COUNT * (grid * grid * 6) as usize);

    for index in 0..PATCH_COUNT {
        let patch = control_patch(index);
        let base = positions.len() as u32;

        for i in 0..side {
            let u = i as f32 / grid as f32;
            for j in 0..side {
                let v = j as f32 / grid as f32;
                let point = evaluate(&patch, u, v);
                normals.push(surface_normal(&patch, u, v, &point));
                positions.push(point.position);
                texcoords.push(Vec2::new(u, v));
            }
        }

        for i in 0..grid {
            let row = base + i * side;
            let next = row + side;
            for j in 0..grid {
                indices.extend_from_slice(&[
                    row + j,
                    row + j + 1,
                    next + j + 1,
                    row + j,
                    next + j + 1,
                    next + j,
                ]);
            }
        }
    }

    let lid = LID_PATCHES.start * per_patch..LID_PATCHES.end * per_patch;
    move_lid(&mut positions[lid.clone()], &mut normals[lid], lid_transform);

    Mesh::generated(positions, normals, texcoords, indices, Topology::TriangleList)
}

fn control_patch(index: usize) -> Patch {
    let mut patch = [[Vec3::ZERO; 4]; 4];
    for (slot, &point) in PATCHES[index].iter().enumerate() {
        patch[slot / 4][slot % 4] = Vec3::from(CONTROL_POINTS[point as usize - 1]);
    }
    patch
}

fn bernstein(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [s * s * s, 3.0 * t * s * s, 3.0 * t * t * s, t * t * t]
}

fn bernstein_derivative(t: f32) -> [f32; 4] {
    let s = 1.0 - t;
    [
        -3.0 * s * s,
        3.0 * s * s - 6.0 * t * s,
        6.0 * t * s - 3.0 * t * t,
        3.0 * t * t,
    ]
}

fn evaluate(patch: &Patch, u: f32, v: f32) -> SurfacePoint {
    let (bu, bv) = (bernstein(u), bernstein(v));
    let (du, dv) = (bernstein_derivative(u), bernstein_derivative(v));

    let mut point = SurfacePoint {
        position: Vec3::ZERO,
        d_u: Vec3::ZERO,
        d_v: Vec3::ZERO,
    };
    for (i, row) in patch.iter().enumerate() {
        for (j, &control) in row.iter().enumerate() {
            point.position += control * bu[i] * bv[j];
            point.d_u += control * du[i] * bv[j];
            point.d_v += control * bu[i] * dv[j];
        }
    }
    point
}

/// Outward unit normal. The table's patches all orient `dP/dv x dP/du`
/// outward. Where a patch row collapses to a point (lid knob, bottom
/// centre) the derivatives vanish, so the normal is taken slightly inside
/// the patch instead.
fn surface_normal(patch: &Patch, u: f32, v: f32, point: &SurfacePoint) -> Vec3 {
    let normal = point.d_v.cross(point.d_u);
    if normal.length_squared() > DEGENERATE_NORMAL {
        return normal.normalize();
    }

    let toward_centre = |t: f32| if t < 0.5 { t + NORMAL_NUDGE } else { t - NORMAL_NUDGE };
    let nudged = evaluate(patch, toward_centre(u), toward_centre(v));
    nudged.d_v.cross(nudged.d_u).normalize_or_zero()
}

fn move_lid(positions: &mut [Vec3], normals: &mut [Vec3], transform: Mat4) {
    if transform == Mat4::IDENTITY {
        return;
    }

    for position in positions.iter_mut() {
        *position = transform.transform_point3(*position);
    }

    // Translation alone leaves normals as they are.
    let linear = Mat3::from_mat4(transform);
    if linear == Mat3::IDENTITY {
        return;
    }
    if linear.determinant().abs() <= f32::EPSILON {
        log::warn!("lid transform is singular; lid normals left untouched");
        return;
    }

    let normal_matrix = linear.inverse().transpose();
    for normal in normals.iter_mut() {
        *normal = (normal_matrix * *normal).normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::triangles;

    #[test]
    fn counts_follow_grid() {
        for grid in [1, 2, 5] {
            let mesh = teapot(grid, Mat4::IDENTITY);
            let side = (grid + 1) as usize;
            assert_eq!(mesh.vertex_count(), 32 * side * side);
            assert_eq!(mesh.index_count(), 6 * 32 * (grid * grid) as usize);
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = teapot(4, Mat4::IDENTITY);
        for n in mesh.normals() {
            assert!((n.length() - 1.0).abs() < 1e-3, "normal {n:?}");
        }
    }

    #[test]
    fn bernstein_weights_partition_unity() {
        for t in [0.0, 0.25, 0.5, 0.9, 1.0] {
            let sum: f32 = bernstein(t).iter().sum();
            let dsum: f32 = bernstein_derivative(t).iter().sum();
            assert!((sum - 1.0).abs() < 1e-6);
            assert!(dsum.abs() < 1e-5);
        }
    }

    #[test]
    fn patch_corners_interpolate_control_points() {
        let patch = control_patch(0);
        assert!(evaluate(&patch, 0.0, 0.0).position.abs_diff_eq(patch[0][0], 1e-6));
        assert!(evaluate(&patch, 1.0, 1.0).position.abs_diff_eq(patch[3][3], 1e-6));
    }

    #[test]
    fn sits_on_z_zero_and_fits_known_bounds() {
        let mesh = teapot(3, Mat4::IDENTITY);
        let (min, max) = mesh
            .positions()
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(lo, hi), p| {
                (lo.min(*p), hi.max(*p))
            });
        assert!(min.z.abs() < 1e-5);
        assert!((max.z - 3.15).abs() < 1e-4);
        assert!(min.x >= -3.0 - 1e-4 && max.x <= 3.525 + 1e-4);
    }

    #[test]
    fn knob_top_points_up() {
        let grid = 4;
        let mesh = teapot(grid, Mat4::IDENTITY);
        let per_patch = ((grid + 1) * (grid + 1)) as usize;
        let first_lid_vertex = LID_PATCHES.start * per_patch;
        assert!(mesh.normals()[first_lid_vertex].z > 0.9);
    }

    #[test]
    fn triangles_face_along_vertex_normals() {
        let mesh = teapot(6, Mat4::IDENTITY);
        let (p, n) = (mesh.positions(), mesh.normals());
        let mut agreeing = 0;
        let mut total = 0;
        for [a, b, c] in triangles(mesh.indices()) {
            let face = (p[b as usize] - p[a as usize]).cross(p[c as usize] - p[a as usize]);
            if face.length_squared() < 1e-12 {
                continue;
            }
            let vertex_normals = n[a as usize] + n[b as usize] + n[c as usize];
            total += 1;
            if face.dot(vertex_normals) > 0.0 {
                agreeing += 1;
            }
        }
        assert_eq!(agreeing, total);
    }

    #[test]
    fn lid_transform_only_moves_lid() {
        let grid = 2;
        let lift = Mat4::from_translation(Vec3::new(0.0, 0.0, 0.5));
        let plain = teapot(grid, Mat4::IDENTITY);
        let lifted = teapot(grid, lift);
        let per_patch = ((grid + 1) * (grid + 1)) as usize;

        for (index, (a, b)) in plain.positions().iter().zip(lifted.positions()).enumerate() {
            let patch = index / per_patch;
            if LID_PATCHES.contains(&patch) {
                assert!((*b - *a).abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), 1e-5));
            } else {
                assert_eq!(a, b);
            }
        }
        for (a, b) in plain.normals().iter().zip(lifted.normals()) {
            assert!(a.abs_diff_eq(*b, 1e-6), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn tilted_lid_rotates_its_normals() {
        let grid = 3;
        let tilt = Mat4::from_rotation_y(0.25);
        let plain = teapot(grid, Mat4::IDENTITY);
        let tilted = teapot(grid, tilt);
        let per_patch = ((grid + 1) * (grid + 1)) as usize;
        let lid = LID_PATCHES.start * per_patch..LID_PATCHES.end * per_patch;

        for (a, b) in plain.normals()[lid.clone()].iter().zip(&tilted.normals()[lid.clone()]) {
            assert!(tilt.transform_vector3(*a).abs_diff_eq(*b, 1e-5), "{a:?} vs {b:?}");
        }
        assert_eq!(plain.normals()[..lid.start], tilted.normals()[..lid.start]);
    }
}
