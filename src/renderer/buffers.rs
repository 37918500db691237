use std::mem;
use std::num::NonZeroU64;

use crate::renderer::shadow::ShadowMapTarget;
use crate::renderer::uniforms::{DrawUniform, LightUniform};

const DRAW_UNIFORM_SIZE: u64 = mem::size_of::<DrawUniform>() as u64;
const LIGHT_UNIFORM_SIZE: u64 = mem::size_of::<LightUniform>() as u64;

/// One [`DrawUniform`] slot per draw call of a frame, addressed through a
/// dynamic offset at group 0.
pub(crate) struct DrawBuffer {
    buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) bind_layout: wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
}

impl DrawBuffer {
    pub(crate) fn new(device: &wgpu::Device, capacity: usize) -> Self {
        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("DrawBindLayout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(DRAW_UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = slot_stride(DRAW_UNIFORM_SIZE, alignment);
        let capacity = capacity.max(1);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("DrawBuffer"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("DrawBindGroup"),
            layout: &bind_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(DRAW_UNIFORM_SIZE),
                }),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_layout,
            stride,
            capacity,
        }
    }

    /// Writes `uniforms` into consecutive slots starting at `first_slot`.
    pub(crate) fn write(
        &self,
        queue: &wgpu::Queue,
        first_slot: usize,
        uniforms: impl IntoIterator<Item = DrawUniform>,
    ) {
        for (slot, uniform) in (first_slot..).zip(uniforms) {
            if slot >= self.capacity {
                log::warn!(
                    "Draw slot {} exceeds capacity {}; draw skipped",
                    slot,
                    self.capacity
                );
                break;
            }
            queue.write_buffer(&self.buffer, self.stride * slot as u64, bytemuck::bytes_of(&uniform));
        }
    }

    pub(crate) fn offset(&self, slot: usize) -> u32 {
        (self.stride * slot as u64) as u32
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Group 1 of the main pass: light block plus the shadow map and its
/// comparison sampler.
pub(crate) struct LightBuffer {
    buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) bind_layout: wgpu::BindGroupLayout,
}

impl LightBuffer {
    pub(crate) fn new(device: &wgpu::Device, shadow: &ShadowMapTarget) -> Self {
        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("LightBindLayout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: NonZeroU64::new(LIGHT_UNIFORM_SIZE),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("LightBuffer"),
            size: LIGHT_UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("LightBindGroup"),
            layout: &bind_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(shadow.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(shadow.sampler()),
                },
            ],
        });

        Self {
            buffer,
            bind_group,
            bind_layout,
        }
    }

    pub(crate) fn update(&self, queue: &wgpu::Queue, light: &LightUniform) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(light));
    }
}

/// Size of one dynamic-offset slot: `size` rounded up to `alignment`.
pub(crate) fn slot_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}
