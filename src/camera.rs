use glam::{Mat4, Vec3, Vec4};

/// Orbit angles are accumulated in these units per radian.
pub const ORBIT_ANGLE_SCALE: f32 = 150.0;
const ORBIT_RADIUS: f32 = 5.0;
const ORBIT_HEIGHT: f32 = 3.0;
const ORBIT_BOB: f32 = 2.0;

const LIGHT_ORBIT_RADIUS: f32 = 3.0;
const LIGHT_HEIGHT: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Viewer circling the origin, driven by the two orbit angles.
    pub fn orbit(xrot: f32, yrot: f32) -> Self {
        let yaw = yrot / ORBIT_ANGLE_SCALE;
        let pitch = xrot / ORBIT_ANGLE_SCALE;
        Self {
            eye: Vec3::new(
                ORBIT_RADIUS * yaw.cos(),
                ORBIT_BOB * pitch.sin() + ORBIT_HEIGHT,
                ORBIT_RADIUS * yaw.sin() * pitch.cos(),
            ),
            ..Self::default()
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_radians, aspect, self.near, self.far)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(ORBIT_RADIUS, ORBIT_HEIGHT, 0.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_radians: 45f32.to_radians(),
            near: 1.0,
            far: 100.0,
        }
    }
}

/// The single point light, circling above the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec4,
    pub intensity: Vec3,
}

impl PointLight {
    pub fn orbiting(angle: f32) -> Self {
        Self {
            position: Vec4::new(
                LIGHT_ORBIT_RADIUS * angle.cos(),
                LIGHT_HEIGHT,
                LIGHT_ORBIT_RADIUS * angle.sin(),
                1.0,
            ),
            intensity: Vec3::ONE,
        }
    }

    /// Square frustum the shadow map is rendered through. Its near and far
    /// planes are tight around the scene.
    pub fn shadow_camera(&self) -> Camera {
        Camera {
            eye: self.position.truncate(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_radians: 65f32.to_radians(),
            near: 2.0,
            far: 6.0,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        self.shadow_camera().view_proj(1.0)
    }
}
