// renderer/renderer.rs
use std::sync::Arc;

use winit::{dpi::PhysicalSize, window::Window};

use crate::error::InitError;
use crate::frame::FrameUniforms;
use crate::renderer::buffers::{DrawBuffer, LightBuffer};
use crate::renderer::context::RenderContext;
use crate::renderer::scene_pass::ScenePass;
use crate::renderer::shader::ShaderSource;
use crate::renderer::shadow::{ShadowMapTarget, ShadowPass};
use crate::scene::{Primitive, Scene};
use crate::settings::DemoSettings;

/// Shadow draws for every caster plus one main draw per primitive.
const DRAW_SLOTS: usize = Primitive::ALL.len() * 2;

pub struct Renderer {
    context: RenderContext,
    draws: DrawBuffer,
    light: LightBuffer,
    shadow: ShadowPass,
    scene_pass: ScenePass,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, settings: &DemoSettings) -> Result<Self, InitError> {
        let context = RenderContext::new(window, settings).await?;
        let device = &context.device;

        let source = ShaderSource::load(settings.shader_path.as_deref())?;
        let inputs = source
            .vertex_inputs()
            .map_err(|err| InitError::Geometry {
                primitive: "vertex layout",
                source: err,
            })?;
        let module = source.compile(device)?;

        let draws = DrawBuffer::new(device, DRAW_SLOTS);
        let target = ShadowMapTarget::new(device, settings.shadow_map_size)?;
        let light = LightBuffer::new(device, &target);
        let shadow = ShadowPass::new(device, &module, &inputs, &draws, target)?;
        let scene_pass = ScenePass::new(
            device,
            &module,
            &inputs,
            &draws,
            &light,
            context.config.format,
        )?;

        Ok(Self {
            context,
            draws,
            light,
            shadow,
            scene_pass,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn shadow_map_size(&self) -> u32 {
        self.shadow.target().size()
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Records the shadow pass and then the main pass into one submission.
    pub fn render(&mut self, scene: &Scene, frame: &FrameUniforms) -> Result<(), wgpu::SurfaceError> {
        let output = self.context.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let queue = &self.context.queue;
        self.draws.write(queue, 0, frame.shadow_draws.iter().map(|d| d.uniform));
        self.draws.write(
            queue,
            frame.shadow_draws.len(),
            frame.scene_draws.iter().map(|d| d.uniform),
        );
        self.light.update(queue, &frame.light);

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("Encoder"),
                });

        self.shadow.encode(&mut encoder, scene, &self.draws, frame);
        self.scene_pass.encode(
            &mut encoder,
            &view,
            &self.context.depth,
            scene,
            &self.draws,
            &self.light,
            frame,
        );

        queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
