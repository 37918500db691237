use std::path::PathBuf;

/// Failures while bringing the demo up. All of them are fatal: the driver
/// logs the error and exits with a non-zero status.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("failed to read shader source {path:?}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("shader or pipeline `{label}` failed validation: {message}")]
    ShaderValidation { label: String, message: String },

    #[error("shadow map target is incomplete: {0}")]
    ShadowTarget(String),

    #[error("failed to create event loop")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible adapter")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to request device")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,

    #[error("failed to upload {primitive} geometry")]
    Geometry {
        primitive: &'static str,
        #[source]
        source: GeometryError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("shader declares no vertex input named `{0}`")]
    MissingAttribute(&'static str),

    #[error("shader has no vertex entry point `{0}`")]
    MissingEntryPoint(&'static str),

    #[error("failed to parse shader for vertex inputs:\n{0}")]
    ShaderParse(String),

    #[error("mesh has no indices")]
    EmptyMesh,

    #[error("device rejected buffer allocation: {0}")]
    Allocation(String),
}
