//! Thin wrappers over the graphics driver: the context boundary, shaders and
//! programs, uniforms, vertex buffers and vertex arrays.

pub mod buffer;
pub mod context;
#[cfg(test)]
pub mod recording;
pub mod shader;
pub mod uniform;
pub mod vertex_array;

pub use buffer::*;
pub use context::*;
#[cfg(test)]
pub use recording::*;
pub use shader::*;
pub use uniform::*;
pub use vertex_array::*;
