//! The four demo objects: what they are, where they sit, and the GPU
//! geometry that backs them.

use glam::{Mat4, Vec3};

use crate::error::InitError;
use crate::mesh::{self, Mesh};
use crate::renderer::geometry::GeometryHandle;
use crate::renderer::material::Material;
use crate::settings::Tessellation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Sphere,
    Teapot,
    Torus,
    Plane,
}

/// Which faces a caster drops while rendering into the shadow map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CullFace {
    Back,
    Front,
}

impl Primitive {
    /// Draw order for both passes.
    pub const ALL: [Primitive; 4] = [
        Primitive::Sphere,
        Primitive::Teapot,
        Primitive::Torus,
        Primitive::Plane,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Sphere => "sphere",
            Primitive::Teapot => "teapot",
            Primitive::Torus => "torus",
            Primitive::Plane => "plane",
        }
    }

    pub fn model_matrix(self) -> Mat4 {
        match self {
            Primitive::Sphere => {
                Mat4::from_scale(Vec3::splat(0.5)) * Mat4::from_translation(Vec3::new(-2.0, 1.0, 2.0))
            }
            Primitive::Teapot => {
                Mat4::from_scale(Vec3::splat(0.25)) * Mat4::from_rotation_x((-90f32).to_radians())
            }
            Primitive::Torus => {
                Mat4::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), (-45f32).to_radians())
                    * Mat4::from_translation(Vec3::new(0.0, 0.0, 1.5))
            }
            Primitive::Plane => Mat4::IDENTITY,
        }
    }

    pub fn material(self) -> Material {
        match self {
            Primitive::Sphere => Material::GOLD,
            Primitive::Teapot => Material::BRASS,
            Primitive::Torus => Material::EMERALD,
            Primitive::Plane => Material::PEARL,
        }
    }

    /// `None` for receivers that never cast. Teapot and torus cull front
    /// faces so their lit side does not shadow itself.
    pub fn shadow_cull(self) -> Option<CullFace> {
        match self {
            Primitive::Sphere => Some(CullFace::Back),
            Primitive::Teapot | Primitive::Torus => Some(CullFace::Front),
            Primitive::Plane => None,
        }
    }

    pub fn casts_shadow(self) -> bool {
        self.shadow_cull().is_some()
    }

    pub fn generate(self, tessellation: &Tessellation) -> Mesh {
        match self {
            Primitive::Sphere => mesh::sphere(
                1.0,
                tessellation.sphere_rings,
                tessellation.sphere_sectors,
            ),
            Primitive::Teapot => mesh::teapot(tessellation.teapot_grid, Mat4::IDENTITY),
            Primitive::Torus => mesh::torus(
                0.5,
                0.25,
                tessellation.torus_sides,
                tessellation.torus_rings,
            ),
            Primitive::Plane => mesh::plane(
                10.0,
                10.0,
                tessellation.plane_divisions,
                tessellation.plane_divisions,
            ),
        }
    }
}

/// Owns one uploaded geometry per primitive for the life of the device.
pub struct Scene {
    geometry: [GeometryHandle; 4],
}

impl Scene {
    pub fn new(device: &wgpu::Device, tessellation: &Tessellation) -> Result<Self, InitError> {
        let upload = |primitive: Primitive| {
            let mesh = primitive.generate(tessellation);
            log::info!(
                "Generated {}: {} vertices, {} indices",
                primitive.name(),
                mesh.vertex_count(),
                mesh.index_count()
            );
            GeometryHandle::upload(device, &mesh, primitive.name()).map_err(|source| {
                InitError::Geometry {
                    primitive: primitive.name(),
                    source,
                }
            })
        };

        let [sphere, teapot, torus, plane] = Primitive::ALL;
        Ok(Self {
            geometry: [
                upload(sphere)?,
                upload(teapot)?,
                upload(torus)?,
                upload(plane)?,
            ],
        })
    }

    pub fn geometry(&self, primitive: Primitive) -> &GeometryHandle {
        // ALL lists the variants in declaration order.
        &self.geometry[primitive as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn only_plane_is_not_a_caster() {
        let casters: Vec<_> = Primitive::ALL
            .into_iter()
            .filter(|p| p.casts_shadow())
            .collect();
        assert_eq!(
            casters,
            [Primitive::Sphere, Primitive::Teapot, Primitive::Torus]
        );
    }

    #[test]
    fn shadow_cull_faces_per_primitive() {
        assert_eq!(Primitive::Sphere.shadow_cull(), Some(CullFace::Back));
        assert_eq!(Primitive::Teapot.shadow_cull(), Some(CullFace::Front));
        assert_eq!(Primitive::Torus.shadow_cull(), Some(CullFace::Front));
        assert_eq!(Primitive::Plane.shadow_cull(), None);
    }

    #[test]
    fn sphere_sits_above_the_floor() {
        let centre = Primitive::Sphere.model_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(centre.truncate().abs_diff_eq(Vec3::new(-1.0, 0.5, 1.0), 1e-6));
    }

    #[test]
    fn teapot_stands_upright() {
        let up = Primitive::Teapot.model_matrix().transform_vector3(Vec3::Z);
        assert!(up.normalize().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn generated_meshes_follow_tessellation() {
        let tessellation = Tessellation::default();
        assert_eq!(Primitive::Sphere.generate(&tessellation).vertex_count(), 600);
        assert_eq!(Primitive::Teapot.generate(&tessellation).vertex_count(), 32 * 36);
        assert_eq!(Primitive::Torus.generate(&tessellation).vertex_count(), 41 * 20);
        assert_eq!(Primitive::Plane.generate(&tessellation).vertex_count(), 9);
    }
}
