use wgpu::util::DeviceExt;

use crate::error::GeometryError;
use crate::mesh::Mesh;
use crate::renderer::Vertex;

/// Device-resident copy of a [`Mesh`], always as a triangle list.
#[derive(Debug)]
pub struct GeometryHandle {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    index_format: wgpu::IndexFormat,
}

impl GeometryHandle {
    pub fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Result<Self, GeometryError> {
        let mesh = mesh.triangulated();
        if mesh.is_empty() {
            return Err(GeometryError::EmptyMesh);
        }

        let vertices = Vertex::from_mesh(&mesh);
        let index_format = index_format_for(mesh.vertex_count());

        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}VertexBuffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_label = format!("{label}IndexBuffer");
        let index_buffer = match index_format {
            wgpu::IndexFormat::Uint16 => {
                let narrow: Vec<u16> = mesh.indices().iter().map(|&i| i as u16).collect();
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&index_label),
                    contents: bytemuck::cast_slice(&narrow),
                    usage: wgpu::BufferUsages::INDEX,
                })
            }
            wgpu::IndexFormat::Uint32 => {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&index_label),
                    contents: bytemuck::cast_slice(mesh.indices()),
                    usage: wgpu::BufferUsages::INDEX,
                })
            }
        };
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GeometryError::Allocation(err.to_string()));
        }

        Ok(Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
            index_format,
        })
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), self.index_format);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// 16-bit indices whenever every vertex is addressable by them.
pub fn index_format_for(vertex_count: usize) -> wgpu::IndexFormat {
    if vertex_count <= u16::MAX as usize + 1 {
        wgpu::IndexFormat::Uint16
    } else {
        wgpu::IndexFormat::Uint32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_meshes_use_16_bit_indices() {
        assert_eq!(index_format_for(600), wgpu::IndexFormat::Uint16);
        assert_eq!(index_format_for(65_536), wgpu::IndexFormat::Uint16);
        assert_eq!(index_format_for(65_537), wgpu::IndexFormat::Uint32);
    }
}
