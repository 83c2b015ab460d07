use thiserror::Error;

use crate::driver::GlError;
use crate::handles::ResourceKind;
use crate::program::ShaderStage;

pub type GfxResult<T> = Result<T, GfxError>;

/// Errors surfaced by [`crate::Gfx`].
///
/// With error checking on, `Driver`, `InvalidHandle` and `NoActiveProgram` never reach
/// the caller: they take the fatal path instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GfxError {
    #[error("invalid {kind} handle {handle}")]
    InvalidHandle { kind: ResourceKind, handle: u32 },

    #[error("no program is active")]
    NoActiveProgram,

    #[error("failed to create {kind}: {reason}")]
    CreateFailed { kind: ResourceKind, reason: String },

    #[error("{0}")]
    Driver(#[from] GlError),

    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program failed to link: {log}")]
    Link { log: String },

    #[error("graphics context unavailable: {0}")]
    ContextUnavailable(String),
}
