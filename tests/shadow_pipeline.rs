use glam::{Mat4, Vec2, Vec3};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use winit::keyboard::Key;

use shadow_demo::camera::PointLight;
use shadow_demo::frame::{shadow_matrix, FrameUniforms, SHADOW_BIAS};
use shadow_demo::input::{action_for_key, InputAction};
use shadow_demo::scene::Primitive;
use shadow_demo::settings::DemoSettings;
use shadow_demo::state::{PcfMode, RenderState};

const EPSILON: f32 = 1e-5;
/// Depth tolerance matching the slope of one shadow texel.
const DEPTH_BIAS: f32 = 5e-3;
const MAP_SIZE: usize = 256;

fn project_shadow_cpu(matrix: Mat4, world_pos: Vec3) -> Vec3 {
    let clip = matrix * world_pos.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    Vec3::new(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5, ndc.z)
}

fn approx_eq(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn state_with_light(angle: f32) -> RenderState {
    let mut state = RenderState::new(&DemoSettings::default());
    state.light_angle = angle;
    state
}

/// Ground plane and demo sphere, the only geometry the tests below rasterise.
struct Occluders {
    sphere_centre: Vec3,
    sphere_radius: f32,
    floor_half_extent: f32,
}

impl Occluders {
    fn demo() -> Self {
        let model = Primitive::Sphere.model_matrix();
        Self {
            sphere_centre: model.transform_point3(Vec3::ZERO),
            sphere_radius: model.transform_vector3(Vec3::X).length(),
            floor_half_extent: 5.0,
        }
    }

    /// Nearest hit along a ray with unit direction.
    fn trace(&self, origin: Vec3, dir: Vec3) -> Option<Vec3> {
        let mut best: Option<f32> = None;

        let oc = origin - self.sphere_centre;
        let b = oc.dot(dir);
        let c = oc.length_squared() - self.sphere_radius * self.sphere_radius;
        let disc = b * b - c;
        if disc >= 0.0 {
            let t = -b - disc.sqrt();
            if t > 0.0 {
                best = Some(t);
            }
        }

        if dir.y < 0.0 {
            let t = -origin.y / dir.y;
            let hit = origin + dir * t;
            if hit.x.abs() <= self.floor_half_extent
                && hit.z.abs() <= self.floor_half_extent
                && best.map_or(true, |b| t < b)
            {
                best = Some(t);
            }
        }

        best.map(|t| origin + dir * t)
    }

    /// Distance from the sphere centre to the segment `from -> to`.
    fn clearance(&self, from: Vec3, to: Vec3) -> f32 {
        let seg = to - from;
        let t = ((self.sphere_centre - from).dot(seg) / seg.length_squared()).clamp(0.0, 1.0);
        (from + seg * t - self.sphere_centre).length() - self.sphere_radius
    }
}

/// CPU stand-in for the shadow pass: one ray per texel centre through the
/// light frustum, storing the nearest light-space depth.
fn render_shadow_map(light_view_proj: Mat4, occluders: &Occluders) -> Vec<f32> {
    let inverse = light_view_proj.inverse();
    let to_ndc = SHADOW_BIAS.inverse();
    let mut depth = vec![1.0f32; MAP_SIZE * MAP_SIZE];

    for row in 0..MAP_SIZE {
        for col in 0..MAP_SIZE {
            let uv = Vec2::new(
                (col as f32 + 0.5) / MAP_SIZE as f32,
                (row as f32 + 0.5) / MAP_SIZE as f32,
            );
            let ndc = to_ndc.transform_point3(uv.extend(0.0));
            let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
            let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

            if let Some(hit) = occluders.trace(near, (far - near).normalize()) {
                depth[row * MAP_SIZE + col] = light_view_proj.project_point3(hit).z;
            }
        }
    }
    depth
}

fn sample(map: &[f32], uv: Vec2) -> f32 {
    let col = ((uv.x * MAP_SIZE as f32) as usize).min(MAP_SIZE - 1);
    let row = ((uv.y * MAP_SIZE as f32) as usize).min(MAP_SIZE - 1);
    map[row * MAP_SIZE + col]
}

#[test]
fn shadow_matrix_matches_cpu_projection() {
    let light = PointLight::orbiting(0.7);
    let light_view_proj = light.view_proj();
    let model = Primitive::Torus.model_matrix();

    for local in [Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), Vec3::new(0.0, 0.7, 0.25)] {
        let world = model.transform_point3(local);
        let expected = project_shadow_cpu(light_view_proj, world);
        let s = shadow_matrix(light_view_proj, model) * local.extend(1.0);
        let actual = s.truncate() / s.w;
        assert!(approx_eq(actual, expected), "{actual:?} vs {expected:?}");
    }
}

#[test]
fn uploaded_shadow_matrix_is_bias_light_model() {
    let state = state_with_light(1.3);
    let frame = FrameUniforms::prepare(&state, 512);

    for draw in &frame.scene_draws {
        let expected = SHADOW_BIAS * frame.light_view_proj * draw.primitive.model_matrix();
        assert!(draw.uniform.shadow_matrix().abs_diff_eq(expected, EPSILON));
    }
}

#[test]
fn floor_points_round_trip_through_shadow_map() {
    let occluders = Occluders::demo();
    let mut rng = SmallRng::seed_from_u64(7);

    for angle in [0.0, 0.8, 2.0, 3.5] {
        let state = state_with_light(angle);
        let frame = FrameUniforms::prepare(&state, MAP_SIZE as u32);
        let light = PointLight::orbiting(angle).position.truncate();
        let map = render_shadow_map(frame.light_view_proj, &occluders);

        let floor = frame
            .scene_draws
            .iter()
            .find(|draw| draw.primitive == Primitive::Plane)
            .map(|draw| draw.uniform.shadow_matrix())
            .expect("plane is drawn");

        let (mut lit, mut shadowed) = (0, 0);
        for _ in 0..2000 {
            let point = Vec3::new(rng.gen_range(-5.0..5.0), 0.0, rng.gen_range(-5.0..5.0));
            let s = floor * point.extend(1.0);
            let coord = s.truncate() / s.w;
            let inside = (0.01..0.99).contains(&coord.x)
                && (0.01..0.99).contains(&coord.y)
                && (0.0..1.0).contains(&coord.z);
            if !inside {
                continue;
            }

            let stored = sample(&map, Vec2::new(coord.x, coord.y));
            let clearance = occluders.clearance(point, light);
            if clearance > 0.05 {
                lit += 1;
                assert!(
                    stored >= coord.z - DEPTH_BIAS,
                    "lit point {point:?} self-shadowed: stored {stored}, own {}",
                    coord.z
                );
            } else if clearance < -0.05 {
                shadowed += 1;
                assert!(
                    stored < coord.z - DEPTH_BIAS,
                    "occluded point {point:?} not shadowed: stored {stored}, own {}",
                    coord.z
                );
            }
        }
        assert!(lit > 100, "too few lit samples at angle {angle}");
        assert!(shadowed > 0, "sphere casts no shadow at angle {angle}");
    }
}

#[test]
fn prepare_is_bit_identical_for_identical_state() {
    let mut state = RenderState::new(&DemoSettings::default());
    for _ in 0..37 {
        state.advance(1.0 / 60.0);
    }
    state.cycle_pcf();

    let first = FrameUniforms::prepare(&state, 512);
    let second = FrameUniforms::prepare(&state, 512);

    assert_eq!(bytemuck::bytes_of(&first.light), bytemuck::bytes_of(&second.light));
    for (a, b) in first
        .scene_draws
        .iter()
        .chain(&first.shadow_draws)
        .zip(second.scene_draws.iter().chain(&second.shadow_draws))
    {
        assert_eq!(a.primitive, b.primitive);
        assert_eq!(bytemuck::bytes_of(&a.uniform), bytemuck::bytes_of(&b.uniform));
    }
}

#[test]
fn resize_changes_projection_aspect() {
    let mut state = RenderState::new(&DemoSettings::default());
    state.resize(800, 600);
    let frame = FrameUniforms::prepare(&state, 512);

    let expected = Mat4::perspective_rh(45f32.to_radians(), 800.0 / 600.0, 1.0, 100.0);
    assert!(frame.projection.abs_diff_eq(expected, EPSILON));
    // x scale over y scale is the inverse aspect
    let ratio = frame.projection.x_axis.x / frame.projection.y_axis.y;
    assert!((ratio - 600.0 / 800.0).abs() < EPSILON);
}

#[test]
fn plus_key_cycles_pcf_modes() {
    let mut state = RenderState::new(&DemoSettings::default());
    let plus = Key::Character("+".into());
    let mut seen = vec![state.pcf];

    for _ in 0..3 {
        assert_eq!(action_for_key(&plus), Some(InputAction::CyclePcf));
        state.cycle_pcf();
        seen.push(state.pcf);
    }

    assert_eq!(
        seen,
        [
            PcfMode::Single,
            PcfMode::Kernel3,
            PcfMode::Kernel5,
            PcfMode::Single
        ]
    );
    let frame = FrameUniforms::prepare(&state, 512);
    assert_eq!(frame.light.pcf_mode, 0);
}

#[test]
fn light_position_stays_on_its_orbit() {
    for angle in [0.0, 0.5, 3.0] {
        let position = PointLight::orbiting(angle).position;
        assert!((position.y - 3.0).abs() < EPSILON);
        assert!((Vec2::new(position.x, position.z).length() - 3.0).abs() < EPSILON);
        assert_eq!(position.w, 1.0);
    }
}
