//! glint: a state-caching, handle-virtualizing façade over OpenGL-style drivers.
//!
//! - [`driver`]: the raw [`driver::Binding`] command set, and a `glow` implementation
//! - [`Gfx`]: the façade; drops redundant state changes, maps handles to driver
//!   objects, checks driver errors
//! - [`Uniform`]: per-uniform location cache keyed by the active program
//! - [`ProgramBuilder`]: compile and link helper

pub mod consts;
pub mod driver;
pub mod handles;
pub mod logging;
pub mod program;
pub mod state;
pub mod stats;
pub mod uniform;

mod gfx;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use gfx::{
    ContextInfo, Gfx, GfxConfig, GfxError, GfxResult, NativeGfx, ProgramKey, VirtualGfx,
};
pub use handles::{
    BufferId, FramebufferId, ProgramId, RenderbufferId, ShaderId, Slot, TextureId, VertexArrayId,
};
pub use program::{ProgramBuilder, ShaderStage};
pub use state::Viewport;
pub use stats::Stats;
pub use uniform::Uniform;
