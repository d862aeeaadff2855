//! Vertex buffers.

use std::sync::Arc;

use crate::{
    abs::RenderContext,
    error::{ModelError, Result},
};

/// How often the contents of a buffer are expected to change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    #[default]
    Static = glow::STATIC_DRAW as isize,
    Dynamic = glow::DYNAMIC_DRAW as isize,
    Stream = glow::STREAM_DRAW as isize,
}

/// An array buffer uploaded once at creation.
pub struct Buffer<C: RenderContext> {
    ctx: Arc<C>,
    id: C::Buffer,
    size_bytes: usize,
    usage: BufferUsage,
}

impl<C: RenderContext> Buffer<C> {
    /// Creates a buffer and uploads `data` to it. The buffer is left bound to `ARRAY_BUFFER`.
    pub fn new<T: bytemuck::Pod>(ctx: &Arc<C>, data: &[T], usage: BufferUsage) -> Result<Self> {
        let id = ctx.create_buffer().map_err(|message| ModelError::Creation {
            object: "buffer",
            message,
        })?;
        let bytes: &[u8] = bytemuck::cast_slice(data);
        ctx.bind_array_buffer(Some(id));
        ctx.array_buffer_data(bytes, usage);

        Ok(Self {
            ctx: Arc::clone(ctx),
            id,
            size_bytes: bytes.len(),
            usage,
        })
    }

    pub fn id(&self) -> C::Buffer {
        self.id
    }

    /// Binds the buffer to `ARRAY_BUFFER`.
    pub fn bind(&self) {
        self.ctx.bind_array_buffer(Some(self.id));
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }
}

impl<C: RenderContext> Drop for Buffer<C> {
    fn drop(&mut self) {
        self.ctx.delete_buffer(self.id);
    }
}
