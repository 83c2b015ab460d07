//! Per-uniform location cache.

use std::fmt::Write;

use crate::driver::Binding;
use crate::gfx::{Gfx, GfxError, GfxResult, ProgramKey};
use crate::handles::{HandleModel, Slot};

/// A uniform declared by name, remembering where it lives in the last program it was
/// looked up in.
///
/// The cached slot is only trusted while the same program (same [`ProgramKey`]) is
/// active. A uniform the program does not declare resolves to [`Slot::NOT_FOUND`],
/// which is cached as well; uploads to it are skipped by the façade.
#[derive(Debug, Clone)]
pub struct Uniform {
    name: String,
    /// Reused buffer for `name[index]`.
    indexed: String,
    index: Option<usize>,

    program: Option<ProgramKey>,
    slot: Slot,
}

impl Uniform {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indexed: String::new(),
            index: None,
            program: None,
            slot: Slot::NOT_FOUND,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Slot of this uniform in the active program.
    pub fn location<B: Binding, H: HandleModel<B>>(&mut self, gfx: &mut Gfx<B, H>) -> GfxResult<Slot> {
        if self.index.take().is_some() {
            self.program = None;
        }
        self.lookup(gfx)
    }

    /// Slot of element `index` of this array uniform in the active program.
    pub fn location_indexed<B: Binding, H: HandleModel<B>>(
        &mut self,
        gfx: &mut Gfx<B, H>,
        index: usize,
    ) -> GfxResult<Slot> {
        if self.index != Some(index) {
            self.indexed.clear();
            // Writing into a String cannot fail.
            let _ = write!(self.indexed, "{}[{index}]", self.name);
            self.index = Some(index);
            self.program = None;
        }
        self.lookup(gfx)
    }

    /// Forgets the cached resolution.
    pub fn invalidate(&mut self) {
        self.program = None;
        self.slot = Slot::NOT_FOUND;
    }

    fn lookup<B: Binding, H: HandleModel<B>>(&mut self, gfx: &mut Gfx<B, H>) -> GfxResult<Slot> {
        let Some(active) = gfx.active_program() else {
            return gfx.reject("uniform lookup", GfxError::NoActiveProgram);
        };

        if self.program == Some(active) {
            gfx.count_uniform_lookup(true);
            return Ok(self.slot);
        }

        let name = if self.index.is_some() { &self.indexed } else { &self.name };
        let slot = gfx.uniform_location(active.id, name)?;
        gfx.count_uniform_lookup(false);

        self.program = Some(active);
        self.slot = slot;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::GfxConfig;
    use crate::handles::ProgramId;
    use crate::testing::Recorder;

    fn config() -> GfxConfig {
        GfxConfig {
            default_state: false,
            ..GfxConfig::default()
        }
    }

    fn linked<B: Binding, H: HandleModel<B>>(gfx: &mut Gfx<B, H>) -> ProgramId {
        crate::program::ProgramBuilder::new()
            .vertex("void main() {}")
            .fragment("void main() {}")
            .build(gfx)
            .unwrap()
    }

    // ── caching ───────────────────────────────────────────────────────────

    #[test]
    fn rebinding_same_program_hits_cache() {
        let mut rec = Recorder::new();
        rec.set_uniform("Color", 4);
        let mut gfx = Gfx::native(rec, config()).unwrap();
        let p1 = linked(&mut gfx);

        let mut color = Uniform::new("Color");
        gfx.use_program(Some(p1)).unwrap();
        let first = color.location(&mut gfx).unwrap();

        gfx.use_program(None).unwrap();
        gfx.use_program(Some(p1)).unwrap();
        let second = color.location(&mut gfx).unwrap();

        assert_eq!(first, Slot::new(4));
        assert_eq!(first, second);
        assert_eq!(gfx.binding().count("uniform_location"), 1);
        assert_eq!(gfx.stats().uniform_hits, 1);
        assert_eq!(gfx.stats().uniform_misses, 1);
    }

    #[test]
    fn switching_program_re_resolves() {
        let mut rec = Recorder::new();
        rec.set_uniform("Color", 2);
        let mut gfx = Gfx::native(rec, config()).unwrap();
        let a = linked(&mut gfx);
        let b = linked(&mut gfx);

        let mut color = Uniform::new("Color");
        gfx.use_program(Some(a)).unwrap();
        let in_a = color.location(&mut gfx).unwrap();
        gfx.use_program(Some(b)).unwrap();
        let in_b = color.location(&mut gfx).unwrap();

        // Equal slots, but B's came from its own query.
        assert_eq!(in_a, in_b);
        assert_eq!(gfx.binding().count("uniform_location"), 2);
        assert_eq!(gfx.stats().uniform_hits, 0);
    }

    #[test]
    fn recycled_program_name_is_not_trusted() {
        let mut rec = Recorder::new().with_name_recycling();
        rec.set_uniform("Color", 1);
        let mut gfx = Gfx::native(rec, config()).unwrap();

        let mut color = Uniform::new("Color");
        let old = linked(&mut gfx);
        gfx.use_program(Some(old)).unwrap();
        color.location(&mut gfx).unwrap();
        gfx.delete_program(old).unwrap();

        let new = linked(&mut gfx);
        assert_eq!(new, old);
        gfx.use_program(Some(new)).unwrap();
        color.location(&mut gfx).unwrap();

        assert_eq!(gfx.binding().count("uniform_location"), 2);
    }

    #[test]
    fn missing_uniform_is_cached_as_not_found() {
        let mut gfx = Gfx::virtualized(Recorder::new(), config()).unwrap();
        let p = linked(&mut gfx);
        gfx.use_program(Some(p)).unwrap();

        let mut ghost = Uniform::new("Ghost");
        assert_eq!(ghost.location(&mut gfx).unwrap(), Slot::NOT_FOUND);
        assert_eq!(ghost.location(&mut gfx).unwrap(), Slot::NOT_FOUND);
        assert_eq!(gfx.binding().count("uniform_location"), 1);

        gfx.uniform_1f(Slot::NOT_FOUND, 1.0).unwrap();
        assert_eq!(gfx.binding().count("uniform_1f"), 0);
    }

    #[test]
    fn invalidate_forces_lookup() {
        let mut rec = Recorder::new();
        rec.set_uniform("Time", 0);
        let mut gfx = Gfx::native(rec, config()).unwrap();
        let p = linked(&mut gfx);
        gfx.use_program(Some(p)).unwrap();

        let mut time = Uniform::new("Time");
        assert_eq!(time.location(&mut gfx).unwrap(), Slot::new(0));
        time.invalidate();
        time.location(&mut gfx).unwrap();
        assert_eq!(gfx.binding().count("uniform_location"), 2);
    }

    #[test]
    fn same_program_handle_in_another_context_re_resolves() {
        let mut first = Recorder::new();
        first.set_uniform("Color", 4);
        let mut second = Recorder::new();
        second.set_uniform("Color", 9);
        let mut g1 = Gfx::native(first, config()).unwrap();
        let mut g2 = Gfx::native(second, config()).unwrap();

        let p1 = linked(&mut g1);
        let p2 = linked(&mut g2);
        assert_eq!(p1, p2);
        g1.use_program(Some(p1)).unwrap();
        g2.use_program(Some(p2)).unwrap();

        let mut color = Uniform::new("Color");
        assert_eq!(color.location(&mut g1).unwrap(), Slot::new(4));
        assert_eq!(color.location(&mut g2).unwrap(), Slot::new(9));
        assert_eq!(g2.binding().count("uniform_location"), 1);
    }

    // ── arrays ────────────────────────────────────────────────────────────

    #[test]
    fn indexed_names_are_rebuilt_on_index_change() {
        let mut rec = Recorder::new();
        rec.set_uniform("Lights[0]", 10);
        rec.set_uniform("Lights[1]", 11);
        rec.set_uniform("Lights", 10);
        let mut gfx = Gfx::native(rec, config()).unwrap();
        let p = linked(&mut gfx);
        gfx.use_program(Some(p)).unwrap();

        let mut lights = Uniform::new("Lights");
        assert_eq!(lights.location_indexed(&mut gfx, 0).unwrap(), Slot::new(10));
        assert_eq!(lights.location_indexed(&mut gfx, 0).unwrap(), Slot::new(10));
        assert_eq!(lights.location_indexed(&mut gfx, 1).unwrap(), Slot::new(11));
        assert_eq!(lights.location(&mut gfx).unwrap(), Slot::new(10));

        let queried: Vec<String> = gfx
            .binding()
            .calls()
            .iter()
            .filter(|c| c.command == "uniform_location")
            .map(|c| c.args.clone())
            .collect();
        assert_eq!(queried.len(), 3);
        assert!(queried[0].ends_with("Lights[0]"));
        assert!(queried[1].ends_with("Lights[1]"));
        assert!(queried[2].ends_with("Lights"));
    }

    // ── errors ────────────────────────────────────────────────────────────

    #[test]
    #[should_panic(expected = "no program is active")]
    fn lookup_without_program_is_fatal() {
        let mut gfx = Gfx::native(Recorder::new(), config()).unwrap();
        Uniform::new("Color").location(&mut gfx).unwrap();
    }

    #[test]
    fn lookup_without_program_errors_when_unchecked() {
        let mut gfx = Gfx::native(
            Recorder::new(),
            GfxConfig {
                check_errors: false,
                ..config()
            },
        )
        .unwrap();
        let err = Uniform::new("Color").location(&mut gfx).unwrap_err();
        assert_eq!(err, GfxError::NoActiveProgram);
    }
}
