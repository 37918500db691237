//! Mutable demo state and the per-redraw animation step.

use crate::settings::{DemoSettings, StepMode};

pub const IDLE_X_STEP: f32 = 0.3;
pub const IDLE_Y_STEP: f32 = 0.4;
pub const LIGHT_ANGLE_STEP: f32 = 0.0005;

/// Shadow-map filtering kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PcfMode {
    /// One comparison tap.
    #[default]
    Single,
    /// 3x3 taps.
    Kernel3,
    /// 5x5 taps.
    Kernel5,
}

impl PcfMode {
    pub fn next(self) -> Self {
        match self {
            PcfMode::Single => PcfMode::Kernel3,
            PcfMode::Kernel3 => PcfMode::Kernel5,
            PcfMode::Kernel5 => PcfMode::Single,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        match index {
            0 => Some(PcfMode::Single),
            1 => Some(PcfMode::Kernel3),
            2 => Some(PcfMode::Kernel5),
            _ => None,
        }
    }

    /// Value handed to the shader.
    pub fn index(self) -> u32 {
        self as u32
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragAnchor {
    xdiff: f32,
    ydiff: f32,
}

/// Everything the passes read each frame. Written only by input handling
/// and [`RenderState::advance`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    pub xrot: f32,
    pub yrot: f32,
    pub light_angle: f32,
    pub animation: bool,
    pub pcf: PcfMode,
    pub fullscreen: bool,
    width: u32,
    height: u32,
    drag: Option<DragAnchor>,
    step_mode: StepMode,
    reference_rate: f32,
}

impl RenderState {
    pub fn new(settings: &DemoSettings) -> Self {
        Self {
            xrot: 0.0,
            yrot: 0.0,
            light_angle: 0.0,
            animation: true,
            pcf: PcfMode::from_index(settings.pcf_mode).unwrap_or_default(),
            fullscreen: false,
            width: settings.resolution.width.max(1),
            height: settings.resolution.height.max(1),
            drag: None,
            step_mode: settings.animation.step_mode,
            reference_rate: settings.animation.reference_rate,
        }
    }

    /// Moves the light and, unless the user is dragging or has paused the
    /// animation, spins the camera. `dt` is the time since the previous
    /// call in seconds; it is ignored in per-frame mode.
    pub fn advance(&mut self, dt: f32) {
        let steps = match self.step_mode {
            StepMode::PerFrame => 1.0,
            StepMode::TimeScaled => dt.max(0.0) * self.reference_rate,
        };

        self.light_angle += LIGHT_ANGLE_STEP * steps;
        if self.animation && !self.is_dragging() {
            self.xrot += IDLE_X_STEP * steps;
            self.yrot += IDLE_Y_STEP * steps;
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized resize to {width}x{height}");
            return;
        }
        self.width = width;
        self.height = height;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.drag = Some(DragAnchor {
            xdiff: x - self.yrot,
            ydiff: -y + self.xrot,
        });
    }

    pub fn drag_to(&mut self, x: f32, y: f32) {
        if let Some(anchor) = self.drag {
            self.yrot = x - anchor.xdiff;
            self.xrot = y + anchor.ydiff;
        }
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Any button event other than a left press ends the drag, including
    /// presses of other buttons while the left one is held.
    pub fn mouse_button(&mut self, left_pressed: bool, x: f32, y: f32) {
        if left_pressed {
            self.begin_drag(x, y);
        } else {
            self.end_drag();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn toggle_animation(&mut self) -> bool {
        self.animation = !self.animation;
        self.animation
    }

    pub fn cycle_pcf(&mut self) -> PcfMode {
        self.pcf = self.pcf.next();
        self.pcf
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }
}
