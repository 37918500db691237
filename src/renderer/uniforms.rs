// renderer/uniforms.rs
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3, Vec4};

use crate::renderer::material::{Material, MaterialData};

/// Per-draw block, bound at group 0 with a dynamic offset.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct DrawUniform {
    pub model_view_proj: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    /// mat3x3 columns, each padded to 16 bytes.
    pub normal_matrix: [[f32; 4]; 3],
    pub shadow_matrix: [[f32; 4]; 4],
    pub material: MaterialData,
    pub drawing_shadow_map: u32,
    pub _padding: [u32; 3],
}

impl DrawUniform {
    pub fn scene(
        model: Mat4,
        view: Mat4,
        projection: Mat4,
        shadow_matrix: Mat4,
        material: &Material,
    ) -> Self {
        let model_view = view * model;
        let normal = Mat3::from_mat4(model_view).inverse().transpose();
        Self {
            model_view_proj: (projection * model_view).to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            normal_matrix: padded_mat3(normal),
            shadow_matrix: shadow_matrix.to_cols_array_2d(),
            material: MaterialData::from_material(material),
            drawing_shadow_map: 0,
            _padding: [0; 3],
        }
    }

    /// Light-space draw: only the MVP is read by the depth-only pipelines.
    pub fn shadow_caster(model: Mat4, light_view_proj: Mat4) -> Self {
        Self {
            model_view_proj: (light_view_proj * model).to_cols_array_2d(),
            model_view: Mat4::IDENTITY.to_cols_array_2d(),
            normal_matrix: padded_mat3(Mat3::IDENTITY),
            shadow_matrix: Mat4::IDENTITY.to_cols_array_2d(),
            material: MaterialData::zeroed(),
            drawing_shadow_map: 1,
            _padding: [0; 3],
        }
    }

    pub fn model_view_proj(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model_view_proj)
    }

    pub fn shadow_matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.shadow_matrix)
    }
}

fn padded_mat3(m: Mat3) -> [[f32; 4]; 3] {
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}

/// Per-frame light and shadow sampling parameters, bound at group 1.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct LightUniform {
    /// Light position in eye space.
    pub position: [f32; 4],
    pub intensity: [f32; 3],
    pub pcf_mode: u32,
    pub shadow_texel_size: f32,
    pub _padding: [f32; 3],
}

impl LightUniform {
    pub fn new(position_eye: Vec4, intensity: Vec3, pcf_mode: u32, shadow_map_size: u32) -> Self {
        Self {
            position: position_eye.to_array(),
            intensity: intensity.to_array(),
            pcf_mode,
            shadow_texel_size: 1.0 / shadow_map_size.max(1) as f32,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_uniform_is_304_bytes() {
        // 3 * mat4x4 + mat3x3 (48) + material (48) + flag rounded up to 16
        assert_eq!(std::mem::size_of::<DrawUniform>(), 304);
        assert_eq!(std::mem::size_of::<DrawUniform>() % 16, 0);
    }

    #[test]
    fn light_uniform_is_48_bytes() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let uniform = DrawUniform::scene(
            model,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            &Material::GOLD,
        );
        assert_eq!(uniform.normal_matrix[0], [0.5, 0.0, 0.0, 0.0]);
        assert_eq!(uniform.normal_matrix[1], [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(uniform.drawing_shadow_map, 0);
    }

    #[test]
    fn shadow_caster_sets_flag() {
        let uniform = DrawUniform::shadow_caster(Mat4::IDENTITY, Mat4::IDENTITY);
        assert_eq!(uniform.drawing_shadow_map, 1);
        assert_eq!(uniform.model_view_proj(), Mat4::IDENTITY);
    }
}
