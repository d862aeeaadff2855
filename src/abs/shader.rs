//! OpenGL Shaders
//!
//! This module defines the [`CompiledShader`] and [`Program`] structs. Both
//! own a driver object and release it when dropped.

use std::{fmt, sync::Arc};

use crate::{
    abs::RenderContext,
    error::{ModelError, Result},
};

/// The pipeline stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex = glow::VERTEX_SHADER as isize,
    Fragment = glow::FRAGMENT_SHADER as isize,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// A shader that compiled successfully.
pub struct CompiledShader<C: RenderContext> {
    ctx: Arc<C>,
    id: C::Shader,
    stage: ShaderStage,
}

impl<C: RenderContext> CompiledShader<C> {
    /// Returns the stage this shader was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn id(&self) -> C::Shader {
        self.id
    }
}

impl<C: RenderContext> Drop for CompiledShader<C> {
    fn drop(&mut self) {
        self.ctx.delete_shader(self.id);
    }
}

/// Compiles `source` for `stage`.
///
/// A compile failure is not an error here: the driver log is written out,
/// the shader object is deleted and `None` is returned. The caller decides
/// whether a missing stage is fatal.
pub fn compile<C: RenderContext>(
    ctx: &Arc<C>,
    stage: ShaderStage,
    source: &str,
) -> Option<CompiledShader<C>> {
    if source.trim().is_empty() {
        log::error!("Refusing to compile empty {stage} shader source");
        return None;
    }

    let shader = match ctx.create_shader(stage) {
        Ok(shader) => shader,
        Err(e) => {
            log::error!("Failed to create {stage} shader: {e}");
            return None;
        }
    };
    ctx.shader_source(shader, source);
    ctx.compile_shader(shader);

    if !ctx.shader_compile_status(shader) {
        log::error!(
            "{stage} shader failed to compile (gl error {:#06x}): {}",
            ctx.get_error(),
            ctx.shader_info_log(shader)
        );
        ctx.delete_shader(shader);
        return None;
    }

    Some(CompiledShader {
        ctx: Arc::clone(ctx),
        id: shader,
        stage,
    })
}

/// A linked shader program.
pub struct Program<C: RenderContext> {
    ctx: Arc<C>,
    id: C::Program,
}

impl<C: RenderContext> Program<C> {
    pub fn id(&self) -> C::Program {
        self.id
    }

    /// Binds the program for use.
    pub fn use_program(&self) {
        self.ctx.use_program(Some(self.id));
    }
}

impl<C: RenderContext> Drop for Program<C> {
    fn drop(&mut self) {
        self.ctx.delete_program(self.id);
    }
}

/// Links a vertex and a fragment shader into a program.
///
/// A missing stage means that stage failed to compile and is fatal for the
/// model named `model`. A link failure writes out the program log, deletes the
/// program and yields `Ok(None)`.
pub fn link<C: RenderContext>(
    ctx: &Arc<C>,
    model: &str,
    vertex: Option<&CompiledShader<C>>,
    fragment: Option<&CompiledShader<C>>,
) -> Result<Option<Program<C>>> {
    let vertex = require_stage(model, ShaderStage::Vertex, vertex)?;
    let fragment = require_stage(model, ShaderStage::Fragment, fragment)?;

    let program = ctx.create_program().map_err(|message| ModelError::Creation {
        object: "program",
        message,
    })?;

    ctx.attach_shader(program, vertex.id);
    ctx.attach_shader(program, fragment.id);
    ctx.link_program(program);

    if !ctx.program_link_status(program) {
        log::error!(
            "Program for {model} failed to link: {}",
            ctx.program_info_log(program)
        );
        ctx.delete_program(program);
        return Ok(None);
    }

    ctx.detach_shader(program, vertex.id);
    ctx.detach_shader(program, fragment.id);

    Ok(Some(Program {
        ctx: Arc::clone(ctx),
        id: program,
    }))
}

fn require_stage<'a, C: RenderContext>(
    model: &str,
    expected: ShaderStage,
    shader: Option<&'a CompiledShader<C>>,
) -> Result<&'a CompiledShader<C>> {
    let shader = shader.ok_or_else(|| ModelError::MissingShader {
        model: model.to_string(),
        stage: expected,
    })?;
    if shader.stage != expected {
        return Err(ModelError::StageMismatch {
            model: model.to_string(),
            expected,
            found: shader.stage,
        });
    }
    Ok(shader)
}
