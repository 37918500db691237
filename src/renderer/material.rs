// renderer/material.rs (Phong presets)
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Material {
    pub const GOLD: Self = Self::new(
        Vec3::new(0.24725, 0.1995, 0.0745),
        Vec3::new(0.75164, 0.60648, 0.22648),
        Vec3::new(0.628281, 0.555802, 0.366065),
        52.0,
    );

    pub const PEARL: Self = Self::new(
        Vec3::new(0.25, 0.20725, 0.20725),
        Vec3::new(1.0, 0.829, 0.829),
        Vec3::new(0.296648, 0.296648, 0.296648),
        12.0,
    );

    pub const BRONZE: Self = Self::new(
        Vec3::new(0.2125, 0.1275, 0.054),
        Vec3::new(0.714, 0.4284, 0.18144),
        Vec3::new(0.393548, 0.271906, 0.166721),
        25.0,
    );

    pub const BRASS: Self = Self::new(
        Vec3::new(0.329412, 0.223529, 0.027451),
        Vec3::new(0.780392, 0.568627, 0.113725),
        Vec3::new(0.992157, 0.941176, 0.807843),
        28.0,
    );

    pub const EMERALD: Self = Self::new(
        Vec3::new(0.0215, 0.1745, 0.0215),
        Vec3::new(0.07568, 0.61424, 0.07568),
        Vec3::new(0.633, 0.727811, 0.633),
        28.0,
    );

    pub const fn new(ambient: Vec3, diffuse: Vec3, specular: Vec3, shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }
}

/// std140 image of [`Material`]: each colour padded to a vec4 slot, the
/// shininess riding in the last one.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct MaterialData {
    pub ambient: [f32; 3],
    pub _pad0: f32,
    pub diffuse: [f32; 3],
    pub _pad1: f32,
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl MaterialData {
    pub fn from_material(material: &Material) -> Self {
        Self {
            ambient: material.ambient.to_array(),
            _pad0: 0.0,
            diffuse: material.diffuse.to_array(),
            _pad1: 0.0,
            specular: material.specular.to_array(),
            shininess: material.shininess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_data_is_48_bytes() {
        assert_eq!(std::mem::size_of::<MaterialData>(), 48);
    }

    #[test]
    fn shininess_lands_after_specular() {
        let data = MaterialData::from_material(&Material::BRASS);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&data));
        assert_eq!(floats[8..11], Material::BRASS.specular.to_array());
        assert_eq!(floats[11], 28.0);
    }
}
