// app.rs
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::*,
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window, WindowId},
};

use crate::error::InitError;
use crate::frame::FrameUniforms;
use crate::input::{action_for_key, InputAction};
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::settings::DemoSettings;
use crate::state::RenderState;

struct Gpu {
    window: Arc<Window>,
    renderer: Renderer,
    scene: Scene,
}

pub struct App {
    settings: DemoSettings,
    state: RenderState,
    gpu: Option<Gpu>,
    cursor: PhysicalPosition<f64>,
    last_frame: Instant,
    failed: bool,
}

impl App {
    pub fn new(settings: DemoSettings) -> Self {
        Self {
            state: RenderState::new(&settings),
            settings,
            gpu: None,
            cursor: PhysicalPosition::new(0.0, 0.0),
            last_frame: Instant::now(),
            failed: false,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    fn init(&self, event_loop: &ActiveEventLoop) -> Result<Gpu, InitError> {
        let resolution = self.settings.resolution;
        let attributes = Window::default_attributes()
            .with_title("Shadow mapping")
            .with_inner_size(PhysicalSize::new(resolution.width, resolution.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let renderer = pollster::block_on(Renderer::new(window.clone(), &self.settings))?;
        let scene = Scene::new(renderer.device(), &self.settings.tessellation)?;

        Ok(Gpu {
            window,
            renderer,
            scene,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: &dyn std::error::Error) {
        log::error!("{err}");
        let mut source = err.source();
        while let Some(cause) = source {
            log::error!("  caused by: {cause}");
            source = cause.source();
        }
        self.failed = true;
        event_loop.exit();
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Quit => event_loop.exit(),
            InputAction::ToggleAnimation => {
                let on = self.state.toggle_animation();
                log::info!("Animation {}", if on { "on" } else { "off" });
            }
            InputAction::CyclePcf => {
                let mode = self.state.cycle_pcf();
                log::info!("PCF mode {} ({:?})", mode.index(), mode);
            }
            InputAction::ToggleFullscreen => {
                let fullscreen = self.state.toggle_fullscreen();
                if let Some(gpu) = &self.gpu {
                    gpu.window
                        .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.state.advance(dt);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let frame = FrameUniforms::prepare(&self.state, gpu.renderer.shadow_map_size());

        match gpu.renderer.render(&gpu.scene, &frame) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated; reconfiguring");
                gpu.renderer.reconfigure();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface acquisition timed out; skipping frame");
            }
            Err(err) => {
                self.fail(event_loop, &err);
                return;
            }
        }

        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match self.init(event_loop) {
            Ok(gpu) => {
                let size = gpu.renderer.size();
                self.state.resize(size.width, size.height);
                self.last_frame = Instant::now();
                gpu.window.request_redraw();
                self.gpu = Some(gpu);
            }
            Err(err) => self.fail(event_loop, &err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if self.gpu.as_ref().map(|gpu| gpu.window.id()) != Some(id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.renderer.resize(size);
                }
                self.state.resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => match action_for_key(&logical_key) {
                Some(action) => self.apply(event_loop, action),
                None => log::debug!("Unbound key {:?}", logical_key),
            },
            WindowEvent::MouseInput { state, button, .. } => {
                let left_pressed = button == MouseButton::Left && state == ElementState::Pressed;
                self.state
                    .mouse_button(left_pressed, self.cursor.x as f32, self.cursor.y as f32);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                self.state.drag_to(position.x as f32, position.y as f32);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}
