use std::borrow::Cow;
use std::path::Path;

use crate::error::{GeometryError, InitError};
use crate::renderer::vertex::VertexInputs;

pub const BUILTIN_SHADER: &str = include_str!("../shader/demo.wgsl");

/// Entry points every shader, built in or not, has to provide.
pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// WGSL for both passes, either built in or read from disk.
pub struct ShaderSource {
    label: String,
    code: Cow<'static, str>,
}

impl ShaderSource {
    pub fn builtin() -> Self {
        Self {
            label: "demo.wgsl".to_owned(),
            code: Cow::Borrowed(BUILTIN_SHADER),
        }
    }

    pub fn load(path: Option<&Path>) -> Result<Self, InitError> {
        let Some(path) = path else {
            return Ok(Self::builtin());
        };

        let code = std::fs::read_to_string(path).map_err(|source| InitError::ShaderSource {
            path: path.to_owned(),
            source,
        })?;
        log::info!("Loaded shader override from {:?}", path);
        Ok(Self {
            label: path.display().to_string(),
            code: Cow::Owned(code),
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn vertex_inputs(&self) -> Result<VertexInputs, GeometryError> {
        VertexInputs::resolve(&self.code)
    }

    pub fn compile(&self, device: &wgpu::Device) -> Result<wgpu::ShaderModule, InitError> {
        let module = validated(device, &self.label, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&self.label),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(self.code.as_ref())),
            })
        })?;
        log::info!("Compiled shader {}", self.label);
        Ok(module)
    }
}

/// Runs `create` inside a validation error scope so that bad WGSL or a
/// mismatched pipeline surfaces as an error instead of a device panic.
pub(crate) fn validated<T>(
    device: &wgpu::Device,
    label: &str,
    create: impl FnOnce() -> T,
) -> Result<T, InitError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        Some(err) => Err(InitError::ShaderValidation {
            label: label.to_owned(),
            message: err.to_string(),
        }),
        None => Ok(value),
    }
}
