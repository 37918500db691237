use crate::error::InitError;
use crate::frame::FrameUniforms;
use crate::renderer::buffers::DrawBuffer;
use crate::renderer::shader::{validated, VERTEX_ENTRY};
use crate::renderer::vertex::{self, VertexInputs};
use crate::scene::{CullFace, Scene};

pub const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Depth texture the light's view is rendered into, sampled by the main
/// pass through a comparison sampler.
pub struct ShadowMapTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    size: u32,
}

impl ShadowMapTarget {
    pub fn new(device: &wgpu::Device, size: u32) -> Result<Self, InitError> {
        let max = device.limits().max_texture_dimension_2d;
        if size == 0 || size > max {
            return Err(InitError::ShadowTarget(format!(
                "size {size} is outside 1..={max}"
            )));
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("ShadowMap"),
            size: wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("ShadowMapView"),
            ..Default::default()
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(InitError::ShadowTarget(err.to_string()));
        }

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("ShadowSampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        log::info!("Shadow map: {size}x{size} {:?}", SHADOW_FORMAT);

        Ok(Self {
            _texture: texture,
            view,
            sampler,
            size,
        })
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

/// Depth-only pass from the light. Casters are split over two pipelines
/// that differ only in which faces they cull.
pub(crate) struct ShadowPass {
    target: ShadowMapTarget,
    cull_back: wgpu::RenderPipeline,
    cull_front: wgpu::RenderPipeline,
}

impl ShadowPass {
    pub(crate) fn new(
        device: &wgpu::Device,
        module: &wgpu::ShaderModule,
        inputs: &VertexInputs,
        draws: &DrawBuffer,
        target: ShadowMapTarget,
    ) -> Result<Self, InitError> {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ShadowPipelineLayout"),
            bind_group_layouts: &[&draws.bind_layout],
            push_constant_ranges: &[],
        });

        let cull_back = caster_pipeline(device, module, inputs, &layout, CullFace::Back)?;
        let cull_front = caster_pipeline(device, module, inputs, &layout, CullFace::Front)?;

        Ok(Self {
            target,
            cull_back,
            cull_front,
        })
    }

    pub(crate) fn target(&self) -> &ShadowMapTarget {
        &self.target
    }

    /// Draw slots `0..frame.shadow_draws.len()` must already hold the
    /// caster uniforms.
    pub(crate) fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        draws: &DrawBuffer,
        frame: &FrameUniforms,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ShadowPass"),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.target.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        for (slot, draw) in frame.shadow_draws.iter().enumerate() {
            let pipeline = match draw.primitive.shadow_cull() {
                Some(CullFace::Back) => &self.cull_back,
                Some(CullFace::Front) => &self.cull_front,
                None => continue,
            };
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, &draws.bind_group, &[draws.offset(slot)]);
            scene.geometry(draw.primitive).draw(&mut pass);
        }
    }
}

fn caster_pipeline(
    device: &wgpu::Device,
    module: &wgpu::ShaderModule,
    inputs: &VertexInputs,
    layout: &wgpu::PipelineLayout,
    cull: CullFace,
) -> Result<wgpu::RenderPipeline, InitError> {
    let (label, face) = match cull {
        CullFace::Back => ("ShadowPipelineCullBack", wgpu::Face::Back),
        CullFace::Front => ("ShadowPipelineCullFront", wgpu::Face::Front),
    };
    let attributes = inputs.attributes();

    validated(device, label, || {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[vertex::layout(&attributes)],
                compilation_options: Default::default(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(face),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: SHADOW_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    })
}
