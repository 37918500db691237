//! Per-frame transform derivation. Everything here is a pure function of
//! [`RenderState`], so two calls with the same state produce the same bytes.

use glam::{Mat4, Vec4};

use crate::camera::{Camera, PointLight};
use crate::renderer::uniforms::{DrawUniform, LightUniform};
use crate::scene::Primitive;
use crate::state::RenderState;

/// Light clip space to shadow-map texture space. x and y go from [-1, 1] to
/// [0, 1] with v pointing down; depth is already in [0, 1].
pub const SHADOW_BIAS: Mat4 = Mat4::from_cols(
    Vec4::new(0.5, 0.0, 0.0, 0.0),
    Vec4::new(0.0, -0.5, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 0.0),
    Vec4::new(0.5, 0.5, 0.0, 1.0),
);

pub fn shadow_matrix(light_view_proj: Mat4, model: Mat4) -> Mat4 {
    SHADOW_BIAS * light_view_proj * model
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub primitive: Primitive,
    pub uniform: DrawUniform,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub light_view_proj: Mat4,
    pub light: LightUniform,
    /// Casters only, in draw order.
    pub shadow_draws: Vec<DrawCommand>,
    pub scene_draws: Vec<DrawCommand>,
}

impl FrameUniforms {
    pub fn prepare(state: &RenderState, shadow_map_size: u32) -> Self {
        let camera = Camera::orbit(state.xrot, state.yrot);
        let view = camera.view();
        let projection = camera.proj(state.aspect_ratio());

        let light = PointLight::orbiting(state.light_angle);
        let light_view_proj = light.view_proj();

        let shadow_draws = Primitive::ALL
            .into_iter()
            .filter(|primitive| primitive.casts_shadow())
            .map(|primitive| DrawCommand {
                primitive,
                uniform: DrawUniform::shadow_caster(primitive.model_matrix(), light_view_proj),
            })
            .collect();

        let scene_draws = Primitive::ALL
            .into_iter()
            .map(|primitive| {
                let model = primitive.model_matrix();
                DrawCommand {
                    primitive,
                    uniform: DrawUniform::scene(
                        model,
                        view,
                        projection,
                        shadow_matrix(light_view_proj, model),
                        &primitive.material(),
                    ),
                }
            })
            .collect();

        Self {
            view,
            projection,
            light_view_proj,
            light: LightUniform::new(
                view * light.position,
                light.intensity,
                state.pcf.index(),
                shadow_map_size,
            ),
            shadow_draws,
            scene_draws,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DemoSettings;
    use glam::Vec3;

    #[test]
    fn bias_maps_clip_corners_to_texture_corners() {
        let top_left = SHADOW_BIAS * Vec4::new(-1.0, 1.0, 0.25, 1.0);
        let bottom_right = SHADOW_BIAS * Vec4::new(1.0, -1.0, 0.75, 1.0);
        assert_eq!(top_left, Vec4::new(0.0, 0.0, 0.25, 1.0));
        assert_eq!(bottom_right, Vec4::new(1.0, 1.0, 0.75, 1.0));
    }

    #[test]
    fn one_shadow_draw_per_caster() {
        let frame = FrameUniforms::prepare(&RenderState::new(&DemoSettings::default()), 512);
        assert_eq!(frame.shadow_draws.len(), 3);
        assert_eq!(frame.scene_draws.len(), 4);
        assert!(frame
            .shadow_draws
            .iter()
            .all(|draw| draw.uniform.drawing_shadow_map == 1));
    }

    #[test]
    fn light_is_sent_in_eye_space() {
        let state = RenderState::new(&DemoSettings::default());
        let frame = FrameUniforms::prepare(&state, 512);
        let world = PointLight::orbiting(state.light_angle).position;
        let eye = Vec4::from_array(frame.light.position);
        assert!(eye.abs_diff_eq(frame.view * world, 1e-6));
        assert_eq!(frame.light.intensity, Vec3::ONE.to_array());
    }
}
