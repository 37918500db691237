pub mod buffers;
pub(crate) mod context;
pub mod depth;
pub mod geometry;
pub mod material;
#[allow(clippy::module_inception)]
pub mod renderer;
pub(crate) mod scene_pass;
pub mod shader;
pub mod shadow;
pub mod uniforms;
pub mod vertex;

pub use depth::Depth;
pub use geometry::GeometryHandle;
pub use material::Material;
pub use renderer::Renderer;
pub use vertex::Vertex;
