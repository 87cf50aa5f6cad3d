//! Thin RAII wrappers over the OpenGL objects the renderer needs:
//! application window and context, shaders, meshes and textures.

pub mod app;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
