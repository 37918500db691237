use glam::{Vec2, Vec3};

use super::{Mesh, Topology};

/// Flat grid in the XZ plane at `y = 0`, centred on the origin, facing +Y.
///
/// Texture coordinates run from 0 to 1 along each axis: `s` follows X and
/// `t` follows Z.
pub fn plane(x_size: f32, z_size: f32, x_divs: u32, z_divs: u32) -> Mesh {
    if x_divs == 0 || z_divs == 0 {
        log::warn!("plane needs at least one division per axis, got {x_divs}x{z_divs}; clamping");
    }
    let x_divs = x_divs.max(1);
    let z_divs = z_divs.max(1);

    let x_half = x_size / 2.0;
    let z_half = z_size / 2.0;
    let x_step = x_size / x_divs as f32;
    let z_step = z_size / z_divs as f32;

    let vertex_count = ((x_divs + 1) * (z_divs + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut texcoords = Vec::with_capacity(vertex_count);

    for i in 0..=z_divs {
        let z = i as f32 * z_step - z_half;
        for j in 0..=x_divs {
            let x = j as f32 * x_step - x_half;
            positions.push(Vec3::new(x, 0.0, z));
            texcoords.push(Vec2::new(
                j as f32 / x_divs as f32,
                i as f32 / z_divs as f32,
            ));
        }
    }
    let normals = vec![Vec3::Y; vertex_count];

    let row_len = x_divs + 1;
    let mut indices = Vec::with_capacity((x_divs * z_divs * 6) as usize);
    for i in 0..z_divs {
        let row = i * row_len;
        let next = (i + 1) * row_len;
        for j in 0..x_divs {
            indices.extend_from_slice(&[
                row + j,
                next + j,
                next + j + 1,
                row + j,
                next + j + 1,
                row + j + 1,
            ]);
        }
    }

    Mesh::generated(positions, normals, texcoords, indices, Topology::TriangleList)
}
