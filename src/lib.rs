//! Shader program setup for OpenGL models.
//!
//! A model is built from a vertex and a fragment [`ShaderBundle`] and a
//! vertex [`Buffer`](abs::Buffer). [`ModelBuilder`] compiles both stages,
//! links them, resolves every attribute and uniform the bundles name,
//! configures a vertex array for the attributes the program actually uses
//! and leaves the result ready for [`Model::draw`].
//!
//! All driver calls go through [`RenderContext`](abs::RenderContext), which
//! is implemented for [`glow::Context`].

pub mod abs;
pub mod bundle;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use bundle::*;
pub use config::{ModelConfig, WindowConfig};
pub use error::{GlError, ModelError, Result, check_error};
pub use model::*;
