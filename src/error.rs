//! Error types and driver error checking.
//!
//! Every fatal condition in the crate is a [`ModelError`]. Driver errors are
//! reported by the context as raw codes and are mapped to [`GlError`] by
//! [`check_error`], which lets the caller decide whether an error aborts
//! setup or is only logged.

use thiserror::Error;

use crate::abs::{RenderContext, ShaderStage};

/// Errors that abort the setup of a model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A shader stage did not compile, so the program cannot be linked.
    #[error("Failed to compile {stage} shader for {model}")]
    MissingShader { model: String, stage: ShaderStage },

    /// A compiled shader was handed to the wrong program slot.
    #[error("{found} shader passed as the {expected} shader for {model}")]
    StageMismatch {
        model: String,
        expected: ShaderStage,
        found: ShaderStage,
    },

    /// The program failed to link. The driver log has already been written out.
    #[error("Failed to link program for {0}")]
    LinkFailed(String),

    /// A required part was never handed to the builder.
    #[error("Model {model} is missing its {part}")]
    Incomplete { model: String, part: &'static str },

    /// An attribute layout the driver would reject.
    #[error("Attribute {name} has {size} components, expected 1 to 4")]
    InvalidAttribute { name: String, size: u8 },

    /// An attribute reads past the end of its vertex.
    #[error("Attribute {name} ends at byte {end}, past its stride of {stride}")]
    AttributeOverflow { name: String, end: u32, stride: u32 },

    /// A driver error found by a hard [`check_error`].
    #[error("{error} {context}")]
    Driver { error: GlError, context: String },

    /// The driver reported an error code outside the known set.
    #[error("Unsupported gl error enum found: {0:#06x}")]
    UnsupportedErrorCode(u32),

    /// The driver refused to create an object.
    #[error("Failed to create {object}: {message}")]
    Creation {
        object: &'static str,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ModelError>;

/// The error codes an OpenGL driver may report through `glGetError`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlError {
    #[error(
        "An unacceptable value has been specified for an enumerated argument. \
         The command is ignored and the error flag is set."
    )]
    InvalidEnum,
    #[error(
        "A numeric argument is out of range. \
         The command is ignored and the error flag is set."
    )]
    InvalidValue,
    #[error(
        "The specified command is not allowed for the current state. \
         The command is ignored and the error flag is set."
    )]
    InvalidOperation,
    #[error(
        "The currently bound framebuffer is not framebuffer complete \
         when trying to render to or to read from it."
    )]
    InvalidFramebufferOperation,
    #[error("Not enough memory is left to execute the command.")]
    OutOfMemory,
}

impl GlError {
    /// Maps a raw driver code. `Ok(None)` means `NO_ERROR`.
    pub fn from_code(code: u32) -> Result<Option<Self>> {
        match code {
            glow::NO_ERROR => Ok(None),
            glow::INVALID_ENUM => Ok(Some(Self::InvalidEnum)),
            glow::INVALID_VALUE => Ok(Some(Self::InvalidValue)),
            glow::INVALID_OPERATION => Ok(Some(Self::InvalidOperation)),
            glow::INVALID_FRAMEBUFFER_OPERATION => Ok(Some(Self::InvalidFramebufferOperation)),
            glow::OUT_OF_MEMORY => Ok(Some(Self::OutOfMemory)),
            other => Err(ModelError::UnsupportedErrorCode(other)),
        }
    }

    /// The raw driver code for this error.
    pub fn code(self) -> u32 {
        match self {
            Self::InvalidEnum => glow::INVALID_ENUM,
            Self::InvalidValue => glow::INVALID_VALUE,
            Self::InvalidOperation => glow::INVALID_OPERATION,
            Self::InvalidFramebufferOperation => glow::INVALID_FRAMEBUFFER_OPERATION,
            Self::OutOfMemory => glow::OUT_OF_MEMORY,
        }
    }
}

/// Queries the driver's last error.
///
/// With `hard_fail` set, a pending error becomes [`ModelError::Driver`];
/// otherwise it is logged as a warning and returned. An unknown code is
/// always an error.
pub fn check_error<C: RenderContext + ?Sized>(
    ctx: &C,
    hard_fail: bool,
    context: &str,
) -> Result<Option<GlError>> {
    match GlError::from_code(ctx.get_error())? {
        None => {
            if !context.is_empty() {
                log::debug!("No error detected. {context}");
            }
            Ok(None)
        }
        Some(error) if hard_fail => Err(ModelError::Driver {
            error,
            context: context.to_string(),
        }),
        Some(error) => {
            log::warn!("{error} {context}");
            Ok(Some(error))
        }
    }
}
