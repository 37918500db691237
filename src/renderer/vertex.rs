use std::mem;

use bytemuck::{Pod, Zeroable};

use crate::error::GeometryError;
use crate::mesh::Mesh;
use crate::renderer::shader::VERTEX_ENTRY;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn from_mesh(mesh: &Mesh) -> Vec<Vertex> {
        mesh.positions()
            .iter()
            .zip(mesh.normals())
            .zip(mesh.texcoords())
            .map(|((pos, normal), uv)| Vertex {
                pos: pos.to_array(),
                normal: normal.to_array(),
                uv: uv.to_array(),
            })
            .collect()
    }
}

/// Shader locations of the three vertex inputs, looked up by name on the
/// vertex entry point of the parsed shader instead of being assumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexInputs {
    pub position: u32,
    pub normal: u32,
    pub texcoord: u32,
}

impl VertexInputs {
    pub const POSITION: &'static str = "a_position";
    pub const NORMAL: &'static str = "a_normal";
    pub const TEXCOORD: &'static str = "a_texcoord";

    pub fn resolve(source: &str) -> Result<Self, GeometryError> {
        let module = naga::front::wgsl::parse_str(source)
            .map_err(|err| GeometryError::ShaderParse(err.emit_to_string(source)))?;
        let declared = vertex_locations(&module, VERTEX_ENTRY)?;

        let find = |name: &'static str| {
            declared
                .iter()
                .find(|(declared_name, _)| declared_name == name)
                .map(|&(_, location)| location)
                .ok_or(GeometryError::MissingAttribute(name))
        };
        Ok(Self {
            position: find(Self::POSITION)?,
            normal: find(Self::NORMAL)?,
            texcoord: find(Self::TEXCOORD)?,
        })
    }

    pub fn attributes(&self) -> [wgpu::VertexAttribute; 3] {
        [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: mem::offset_of!(Vertex, pos) as wgpu::BufferAddress,
                shader_location: self.position,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: mem::offset_of!(Vertex, normal) as wgpu::BufferAddress,
                shader_location: self.normal,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: mem::offset_of!(Vertex, uv) as wgpu::BufferAddress,
                shader_location: self.texcoord,
            },
        ]
    }
}

pub fn layout(attributes: &[wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'_> {
    wgpu::VertexBufferLayout {
        array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes,
    }
}

/// Named `@location` inputs of a vertex entry point, whether declared as
/// plain arguments or as members of an input struct.
fn vertex_locations(
    module: &naga::Module,
    entry: &'static str,
) -> Result<Vec<(String, u32)>, GeometryError> {
    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga::ShaderStage::Vertex && ep.name == entry)
        .ok_or(GeometryError::MissingEntryPoint(entry))?;

    let mut locations = Vec::new();
    let mut push = |name: Option<&String>, binding: Option<&naga::Binding>| {
        if let (Some(name), Some(naga::Binding::Location { location, .. })) = (name, binding) {
            locations.push((name.clone(), *location));
        }
    };

    for argument in &entry_point.function.arguments {
        match &module.types[argument.ty].inner {
            naga::TypeInner::Struct { members, .. } if argument.binding.is_none() => {
                for member in members {
                    push(member.name.as_ref(), member.binding.as_ref());
                }
            }
            _ => push(argument.name.as_ref(), argument.binding.as_ref()),
        }
    }
    Ok(locations)
}
