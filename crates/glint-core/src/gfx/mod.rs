//! The GPU state and resource façade.
//!
//! [`Gfx`] is the command surface the renderer talks to. It owns:
//! - the driver [`Binding`]
//! - a handle model ([`Direct`] or [`HandleTables`]) mapping caller handles to driver
//!   objects
//! - a [`StateCache`] used to drop redundant state changes
//! - [`Stats`]
//!
//! Every driver call can be followed by an error query (see [`GfxConfig::check_errors`]).
//! A reported error is fatal: it is logged and the calling thread panics with the
//! command name in the message.

use std::collections::HashMap;
use std::sync::atomic::AtomicU64;

use anyhow::{Context, Result};

use crate::consts;
use crate::driver::{Binding, GlError};
use crate::handles::{
    Category, Direct, HandleId, HandleModel, HandleTables, ProgramId, Registry,
};
use crate::state::{Cached, StateCache, Viewport};
use crate::stats::Stats;

mod config;
mod draw;
mod error;
mod info;
mod resources;
mod shaders;
mod state;
mod uniforms;

#[cfg(test)]
mod tests;

pub use config::GfxConfig;
pub use error::{GfxError, GfxResult};
pub use info::ContextInfo;

/// Façade over a binding whose objects are integer names.
pub type NativeGfx<B> = Gfx<B, Direct>;

/// Façade over a binding whose objects are references, with handle tables.
pub type VirtualGfx<B> = Gfx<B, HandleTables<B>>;

/// Identity of a linked program as seen by uniform caches.
///
/// The serial is assigned at creation and never repeats within the process, so neither
/// a handle recycled by the driver nor the same handle in another [`Gfx`] matches a
/// cache entry made for a different program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ProgramKey {
    pub id: ProgramId,
    pub serial: u64,
}

/// Shared by every façade so serials stay unique across contexts.
static NEXT_PROGRAM_SERIAL: AtomicU64 = AtomicU64::new(1);

pub struct Gfx<B: Binding, H: HandleModel<B>> {
    binding: B,
    handles: H,
    state: StateCache,
    stats: Stats,
    check_errors: bool,

    /// Live program handle -> creation serial.
    programs: HashMap<u32, u64>,

    info: ContextInfo,
}

impl<B: Binding> Gfx<B, Direct>
where
    Direct: HandleModel<B>,
{
    /// Builds a façade that passes the driver's integer names through as handles.
    pub fn native(binding: B, config: GfxConfig) -> Result<Self> {
        Self::with_handles(binding, Direct::new(), config)
    }
}

impl<B: Binding> Gfx<B, HandleTables<B>> {
    /// Builds a façade that hands out synthetic handles for the driver's objects.
    pub fn virtualized(binding: B, config: GfxConfig) -> Result<Self> {
        Self::with_handles(binding, HandleTables::new(), config)
    }
}

impl<B: Binding, H: HandleModel<B>> Gfx<B, H> {
    pub fn with_handles(mut binding: B, handles: H, config: GfxConfig) -> Result<Self> {
        let info = ContextInfo::query(&mut binding).context("failed to query the graphics context")?;
        log::info!(
            "context: {} / {} / {} (shading language {})",
            info.vendor,
            info.renderer,
            info.version,
            info.shading_language_version
        );

        // Errors left over from context creation are not ours to report.
        drain_errors(&mut binding);

        let mut gfx = Self {
            binding,
            handles,
            state: StateCache::new(),
            stats: Stats::default(),
            check_errors: config.check_errors,
            programs: HashMap::new(),
            info,
        };

        if config.default_state {
            gfx.apply_default_state(config.clear_color);
        }
        Ok(gfx)
    }

    fn apply_default_state(&mut self, clear_color: [f32; 4]) {
        let [r, g, b, a] = clear_color;
        self.clear_color(r, g, b, a);

        self.enable(consts::DEPTH_TEST);
        self.depth_func(consts::LEQUAL);

        self.front_face(consts::CCW);
        self.cull_face(consts::BACK);
        self.enable(consts::CULL_FACE);

        self.enable(consts::BLEND);
        self.blend_equation(consts::FUNC_ADD);
        self.blend_func(consts::SRC_ALPHA, consts::ONE_MINUS_SRC_ALPHA);
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Direct access to the binding. Calls made through it bypass the state cache; call
    /// [`Gfx::invalidate_state`] afterwards if they changed cached state.
    #[inline]
    pub fn binding_mut(&mut self) -> &mut B {
        &mut self.binding
    }

    #[inline]
    pub fn handles(&self) -> &H {
        &self.handles
    }

    #[inline]
    pub fn context_info(&self) -> &ContextInfo {
        &self.info
    }

    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Clears the statistics counters; live-resource gauges are kept.
    pub fn reset_stats(&mut self) {
        self.stats.reset_counters();
    }

    #[inline]
    pub fn check_errors(&self) -> bool {
        self.check_errors
    }

    pub fn set_check_errors(&mut self, enabled: bool) {
        self.check_errors = enabled;
    }

    /// Cached state snapshot.
    #[inline]
    pub fn state(&self) -> &StateCache {
        &self.state
    }

    /// Forgets all cached state, so every following setter reaches the driver.
    pub fn invalidate_state(&mut self) {
        log::debug!("state cache invalidated");
        self.state.invalidate_all();
    }

    /// Last viewport set through the façade.
    #[inline]
    pub fn viewport(&self) -> Option<Viewport> {
        self.state.viewport.get().copied()
    }

    /// The bound program, if one was bound through the façade and is still alive.
    pub fn active_program(&self) -> Option<ProgramKey> {
        let raw = (*self.state.program.get()?)?;
        let serial = *self.programs.get(&raw)?;
        Some(ProgramKey {
            id: ProgramId::from_raw(raw)?,
            serial,
        })
    }

    pub(crate) fn count_uniform_lookup(&mut self, hit: bool) {
        if hit {
            self.stats.uniform_hits += 1;
        } else {
            self.stats.uniform_misses += 1;
        }
    }

    // ── error paths ───────────────────────────────────────────────────────

    /// Runs the error query after `command` when checks are on.
    #[inline]
    fn check(&mut self, command: &'static str) {
        if !self.check_errors {
            return;
        }
        if let Some(err) = GlError::from_code(self.binding.get_error()) {
            self.fatal(command, GfxError::Driver(err));
        }
    }

    fn fatal(&self, command: &str, err: GfxError) -> ! {
        log::error!("{command}: {err}");
        panic!("{command}: {err}");
    }

    /// Programmer errors: fatal with checks on, logged and returned otherwise.
    pub(crate) fn reject<T>(&self, command: &str, err: GfxError) -> GfxResult<T> {
        if self.check_errors {
            self.fatal(command, err);
        }
        log::error!("{command}: {err}");
        Err(err)
    }

    // ── handle plumbing ───────────────────────────────────────────────────

    fn resolve<C: Category<B>>(&self, command: &str, id: C::Id) -> GfxResult<C::Object>
    where
        H: Registry<B, C>,
    {
        match <H as Registry<B, C>>::resolve(&self.handles, id.raw()) {
            Some(object) => Ok(object),
            None => self.reject(
                command,
                GfxError::InvalidHandle {
                    kind: C::KIND,
                    handle: id.raw(),
                },
            ),
        }
    }

    fn resolve_opt<C: Category<B>>(
        &self,
        command: &str,
        id: Option<C::Id>,
    ) -> GfxResult<Option<C::Object>>
    where
        H: Registry<B, C>,
    {
        id.map(|id| self.resolve::<C>(command, id)).transpose()
    }

    /// Resolves a whole batch, collapsing duplicates. Any miss rejects the batch.
    fn resolve_all<C: Category<B>>(
        &self,
        command: &str,
        ids: &[C::Id],
    ) -> GfxResult<(Vec<C::Id>, Vec<C::Object>)>
    where
        H: Registry<B, C>,
    {
        let mut unique: Vec<C::Id> = Vec::with_capacity(ids.len());
        for &id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        let objects = unique
            .iter()
            .map(|&id| self.resolve::<C>(command, id))
            .collect::<GfxResult<Vec<_>>>()?;
        Ok((unique, objects))
    }

    /// Stores a freshly created object and returns its handle. The object is destroyed
    /// again when no handle can be assigned.
    fn register<C: Category<B>>(
        &mut self,
        object: C::Object,
        destroy: fn(&mut B, C::Object),
    ) -> GfxResult<C::Id>
    where
        H: Registry<B, C>,
    {
        let raw = match <H as Registry<B, C>>::register(&mut self.handles, object) {
            Ok(raw) => raw,
            Err(object) => {
                destroy(&mut self.binding, object);
                return Err(GfxError::CreateFailed {
                    kind: C::KIND,
                    reason: "handle space exhausted".to_owned(),
                });
            }
        };

        match C::Id::from_raw(raw) {
            Some(id) => Ok(id),
            None => {
                if let Some(object) = <H as Registry<B, C>>::release(&mut self.handles, raw) {
                    destroy(&mut self.binding, object);
                }
                Err(GfxError::CreateFailed {
                    kind: C::KIND,
                    reason: format!("driver returned unusable name {raw}"),
                })
            }
        }
    }

    fn release<C: Category<B>>(&mut self, id: C::Id)
    where
        H: Registry<B, C>,
    {
        <H as Registry<B, C>>::release(&mut self.handles, id.raw());
    }

    // ── state plumbing ────────────────────────────────────────────────────

    /// Issues `value` on one cached axis unless the driver already holds it. The cache
    /// is updated only after the call went through its error check.
    fn set_state<T: PartialEq + Copy>(
        &mut self,
        command: &'static str,
        select: fn(&mut StateCache) -> &mut Cached<T>,
        value: T,
        issue: impl FnOnce(&mut B, T),
    ) {
        if select(&mut self.state).is(&value) {
            return;
        }
        issue(&mut self.binding, value);
        self.check(command);
        select(&mut self.state).store(value);
    }
}

fn drain_errors<B: Binding>(binding: &mut B) {
    // Bounded: a lost context may report CONTEXT_LOST forever.
    for _ in 0..32 {
        match GlError::from_code(binding.get_error()) {
            Some(err) => log::warn!("discarding stale driver error {err}"),
            None => break,
        }
    }
}
