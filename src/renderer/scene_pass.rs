use crate::error::InitError;
use crate::frame::FrameUniforms;
use crate::renderer::buffers::{DrawBuffer, LightBuffer};
use crate::renderer::shader::{validated, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::renderer::vertex::{self, VertexInputs};
use crate::renderer::Depth;
use crate::scene::Scene;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.93,
    g: 0.93,
    b: 0.93,
    a: 0.0,
};

/// Lit pass into the swapchain image, sampling the shadow map.
pub(crate) struct ScenePass {
    pipeline: wgpu::RenderPipeline,
}

impl ScenePass {
    pub(crate) fn new(
        device: &wgpu::Device,
        module: &wgpu::ShaderModule,
        inputs: &VertexInputs,
        draws: &DrawBuffer,
        light: &LightBuffer,
        color_format: wgpu::TextureFormat,
    ) -> Result<Self, InitError> {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ScenePipelineLayout"),
            bind_group_layouts: &[&draws.bind_layout, &light.bind_layout],
            push_constant_ranges: &[],
        });
        let attributes = inputs.attributes();

        let pipeline = validated(device, "ScenePipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("ScenePipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some(VERTEX_ENTRY),
                    buffers: &[vertex::layout(&attributes)],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(FRAGMENT_ENTRY),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: color_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: Depth::FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        })?;

        Ok(Self { pipeline })
    }

    /// Scene draws occupy the slots right after the shadow draws.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        color: &wgpu::TextureView,
        depth: &Depth,
        scene: &Scene,
        draws: &DrawBuffer,
        light: &LightBuffer,
        frame: &FrameUniforms,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("MainPass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(1, &light.bind_group, &[]);

        let first_slot = frame.shadow_draws.len();
        for (index, draw) in frame.scene_draws.iter().enumerate() {
            let slot = first_slot + index;
            if slot >= draws.capacity() {
                break;
            }
            pass.set_bind_group(0, &draws.bind_group, &[draws.offset(slot)]);
            scene.geometry(draw.primitive).draw(&mut pass);
        }
    }
}
