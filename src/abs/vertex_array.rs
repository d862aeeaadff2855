//! Vertex array setup.
//!
//! [`setup_vertex_array`] ties the resolved attribute locations of a vertex
//! bundle to the layout of a vertex buffer. Attributes the program does not
//! expose are skipped; enabling such an index is undefined in OpenGL.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    abs::{Buffer, RenderContext},
    bundle::{Resolution, ShaderBundle},
    error::{ModelError, Result},
};

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Points = glow::POINTS as isize,
    Lines = glow::LINES as isize,
    LineLoop = glow::LINE_LOOP as isize,
    LineStrip = glow::LINE_STRIP as isize,
    #[default]
    Triangles = glow::TRIANGLES as isize,
    TriangleStrip = glow::TRIANGLE_STRIP as isize,
    TriangleFan = glow::TRIANGLE_FAN as isize,
}

/// A configured vertex array object.
pub struct VertexArray<C: RenderContext> {
    ctx: Arc<C>,
    id: C::VertexArray,
    enabled: Vec<u32>,
}

impl<C: RenderContext> VertexArray<C> {
    pub fn id(&self) -> C::VertexArray {
        self.id
    }

    /// Attribute indices enabled on this vertex array, in setup order.
    pub fn enabled_attributes(&self) -> &[u32] {
        &self.enabled
    }

    pub fn bind(&self) {
        self.ctx.bind_vertex_array(Some(self.id));
    }

    /// Issues one draw call. The vertex array and its program must already be bound.
    pub fn draw(&self, primitive: Primitive, first: i32, count: i32) {
        self.ctx.draw_arrays(primitive, first, count);
    }
}

impl<C: RenderContext> Drop for VertexArray<C> {
    fn drop(&mut self) {
        self.ctx.delete_vertex_array(self.id);
    }
}

/// Creates a vertex array and describes every active attribute of `bundle`
/// inside `buffer`.
///
/// The vertex array is left bound. Driver errors raised while configuring
/// attributes are not checked here.
pub fn setup_vertex_array<C: RenderContext>(
    ctx: &Arc<C>,
    buffer: &Buffer<C>,
    bundle: &ShaderBundle,
    resolution: &Resolution<C::UniformLocation>,
) -> Result<VertexArray<C>> {
    if let Some((name, layout)) = bundle
        .attributes
        .iter()
        .find(|(_, layout)| !(1..=4).contains(&layout.size))
    {
        return Err(ModelError::InvalidAttribute {
            name: name.clone(),
            size: layout.size,
        });
    }
    if let Some((name, layout)) = bundle
        .attributes
        .iter()
        .find(|(_, layout)| layout.stride != 0 && layout.end() > layout.stride)
    {
        return Err(ModelError::AttributeOverflow {
            name: name.clone(),
            end: layout.end(),
            stride: layout.stride,
        });
    }

    let id = ctx
        .create_vertex_array()
        .map_err(|message| ModelError::Creation {
            object: "vertex array",
            message,
        })?;
    ctx.bind_vertex_array(Some(id));
    buffer.bind();

    let mut enabled = Vec::new();
    for (name, layout) in &bundle.attributes {
        let Some(index) = resolution.attribute(name).index() else {
            log::warn!("Attribute {name} is not active in the program, skipping");
            continue;
        };
        ctx.enable_vertex_attrib_array(index);
        ctx.vertex_attrib_pointer(index, layout);
        enabled.push(index);
    }

    Ok(VertexArray {
        ctx: Arc::clone(ctx),
        id,
        enabled,
    })
}
