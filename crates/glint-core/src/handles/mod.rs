//! Resource identity.
//!
//! Callers only ever see small integer handles ([`BufferId`], [`TextureId`], ...). How a
//! handle maps to the driver's object is decided by the handle model [`crate::Gfx`] was
//! built with:
//! - [`Direct`]: the driver's objects already are integer names; handles are those names
//! - [`HandleTables`]: the driver hands out object references; handles index a
//!   [`HandleTable`] per category
//!
//! Both models implement [`HandleModel`], so the façade's caching logic is written once.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::driver::{Binding, Named};

mod ids;
mod table;
mod virtualized;

pub use ids::{
    BufferId, FramebufferId, HandleId, ProgramId, RenderbufferId, ShaderId, Slot, TextureId,
    VertexArrayId,
};
pub use table::HandleTable;
pub use virtualized::HandleTables;

/// Resource category.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    Program,
    Shader,
    Buffer,
    Texture,
    VertexArray,
    Framebuffer,
    Renderbuffer,
    Uniform,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Shader => "shader",
            Self::Buffer => "buffer",
            Self::Texture => "texture",
            Self::VertexArray => "vertex array",
            Self::Framebuffer => "framebuffer",
            Self::Renderbuffer => "renderbuffer",
            Self::Uniform => "uniform location",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── categories ────────────────────────────────────────────────────────────

/// Type-level resource category: ties a handle type to the binding's object type and
/// to its table in [`HandleTables`].
pub trait Category<B: Binding> {
    type Object: Clone + fmt::Debug;
    type Id: HandleId;
    const KIND: ResourceKind;

    fn table(tables: &HandleTables<B>) -> &HandleTable<Self::Object>;
    fn table_mut(tables: &mut HandleTables<B>) -> &mut HandleTable<Self::Object>;
}

macro_rules! category {
    ($marker:ident, $object:ident, $id:ty, $kind:ident, $field:ident) => {
        #[derive(Debug, Copy, Clone)]
        pub struct $marker;

        impl<B: Binding> Category<B> for $marker {
            type Object = B::$object;
            type Id = $id;
            const KIND: ResourceKind = ResourceKind::$kind;

            #[inline]
            fn table(tables: &HandleTables<B>) -> &HandleTable<Self::Object> {
                &tables.$field
            }

            #[inline]
            fn table_mut(tables: &mut HandleTables<B>) -> &mut HandleTable<Self::Object> {
                &mut tables.$field
            }
        }
    };
}

category!(Programs, Program, ProgramId, Program, programs);
category!(Shaders, Shader, ShaderId, Shader, shaders);
category!(Buffers, Buffer, BufferId, Buffer, buffers);
category!(Textures, Texture, TextureId, Texture, textures);
category!(VertexArrays, VertexArray, VertexArrayId, VertexArray, vertex_arrays);
category!(Framebuffers, Framebuffer, FramebufferId, Framebuffer, framebuffers);
category!(Renderbuffers, Renderbuffer, RenderbufferId, Renderbuffer, renderbuffers);
category!(Uniforms, UniformLocation, Slot, Uniform, uniforms);

// ── handle models ─────────────────────────────────────────────────────────

/// Maps raw handles of one category to driver objects.
pub trait Registry<B: Binding, C: Category<B>> {
    /// Assigns a handle to a freshly created object. Hands the object back when no
    /// handle is available.
    fn register(&mut self, object: C::Object) -> Result<u32, C::Object>;

    /// Looks up the object behind `handle`.
    fn resolve(&self, handle: u32) -> Option<C::Object>;

    /// Forgets `handle`, returning the object it mapped to.
    fn release(&mut self, handle: u32) -> Option<C::Object>;
}

/// Complete handle model for a binding: a [`Registry`] for every category.
pub trait HandleModel<B: Binding>:
    Registry<B, Programs>
    + Registry<B, Shaders>
    + Registry<B, Buffers>
    + Registry<B, Textures>
    + Registry<B, VertexArrays>
    + Registry<B, Framebuffers>
    + Registry<B, Renderbuffers>
    + Registry<B, Uniforms>
{
    /// Whether batch deletions are handed to the binding as one call.
    const COALESCES_DELETES: bool;

    /// Slot previously resolved for `name` in `program`, when the model keeps them.
    fn remembered_uniform(&self, program: u32, name: &str) -> Option<Slot> {
        let _ = (program, name);
        None
    }

    fn remember_uniform(&mut self, program: u32, name: &str, slot: Slot) {
        let _ = (program, name, slot);
    }

    /// Drops every uniform slot owned by `program`.
    fn forget_program(&mut self, program: u32) {
        let _ = program;
    }
}

/// Handle model for bindings whose objects are integer names.
///
/// Handles are the driver's names. Only the set of live names per category is kept, so
/// a deleted or never-created handle misses here instead of reaching the driver, which
/// ignores unknown names on delete. Uniform locations are per-program integers and are
/// passed through untracked.
#[derive(Debug, Default, Clone)]
pub struct Direct {
    live: HashMap<ResourceKind, HashSet<u32>>,
}

impl Direct {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `handle` of `kind` was created through the façade and not yet deleted.
    pub fn is_live(&self, kind: ResourceKind, handle: u32) -> bool {
        self.live.get(&kind).is_some_and(|names| names.contains(&handle))
    }

    #[inline]
    fn tracks(kind: ResourceKind) -> bool {
        kind != ResourceKind::Uniform
    }
}

impl<B, C> Registry<B, C> for Direct
where
    B: Binding,
    C: Category<B>,
    C::Object: Named,
{
    fn register(&mut self, object: C::Object) -> Result<u32, C::Object> {
        let name = object.name();
        if Self::tracks(C::KIND) {
            self.live.entry(C::KIND).or_default().insert(name);
        }
        Ok(name)
    }

    fn resolve(&self, handle: u32) -> Option<C::Object> {
        if Self::tracks(C::KIND) && !self.is_live(C::KIND, handle) {
            return None;
        }
        C::Object::from_name(handle)
    }

    fn release(&mut self, handle: u32) -> Option<C::Object> {
        if Self::tracks(C::KIND) {
            let removed = self
                .live
                .get_mut(&C::KIND)
                .is_some_and(|names| names.remove(&handle));
            if !removed {
                return None;
            }
        }
        C::Object::from_name(handle)
    }
}

impl<B> HandleModel<B> for Direct
where
    B: Binding<
            Shader: Named,
            Program: Named,
            Buffer: Named,
            Texture: Named,
            VertexArray: Named,
            Framebuffer: Named,
            Renderbuffer: Named,
            UniformLocation: Named,
        >,
{
    const COALESCES_DELETES: bool = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockLocation, MockObject, Recorder};

    #[test]
    fn direct_passes_names_through() {
        let mut direct = Direct::new();
        let object = MockObject::from_name(42).unwrap();
        assert_eq!(Registry::<Recorder, Buffers>::register(&mut direct, object), Ok(42));
        assert_eq!(Registry::<Recorder, Buffers>::resolve(&direct, 42), Some(object));
        assert_eq!(Registry::<Recorder, Buffers>::resolve(&direct, 0), None);
    }

    #[test]
    fn direct_misses_names_it_did_not_create() {
        let mut direct = Direct::new();
        let object = MockObject::from_name(42).unwrap();
        assert_eq!(Registry::<Recorder, Buffers>::resolve(&direct, 42), None);

        Registry::<Recorder, Buffers>::register(&mut direct, object).unwrap();
        assert_eq!(Registry::<Recorder, Textures>::resolve(&direct, 42), None);
        assert!(direct.is_live(ResourceKind::Buffer, 42));

        assert_eq!(Registry::<Recorder, Buffers>::release(&mut direct, 42), Some(object));
        assert_eq!(Registry::<Recorder, Buffers>::release(&mut direct, 42), None);
        assert_eq!(Registry::<Recorder, Buffers>::resolve(&direct, 42), None);
    }

    #[test]
    fn direct_uniform_location_zero_is_valid() {
        let direct = Direct::new();
        assert_eq!(
            Registry::<Recorder, Uniforms>::resolve(&direct, 0),
            Some(MockLocation(0))
        );
    }

    #[test]
    fn tables_are_per_category() {
        let mut tables: HandleTables<Recorder> = HandleTables::new();
        let obj = MockObject::from_name(9).unwrap();
        assert_eq!(Registry::<Recorder, Buffers>::register(&mut tables, obj), Ok(1));
        assert_eq!(Registry::<Recorder, Textures>::register(&mut tables, obj), Ok(1));
        assert_eq!(Registry::<Recorder, Buffers>::release(&mut tables, 1), Some(obj));
        assert_eq!(Registry::<Recorder, Buffers>::resolve(&tables, 1), None);
        assert_eq!(Registry::<Recorder, Textures>::resolve(&tables, 1), Some(obj));
        assert_eq!(tables.table::<Textures>().kind(), ResourceKind::Texture);
    }

    #[test]
    fn forgetting_a_program_releases_found_slots_only() {
        let mut tables: HandleTables<Recorder> = HandleTables::new();
        let slot = Registry::<Recorder, Uniforms>::register(&mut tables, MockLocation(3)).unwrap();
        let slot = Slot::new(slot as i32);
        tables.remember_uniform(7, "Color", slot);
        tables.remember_uniform(7, "Missing", Slot::NOT_FOUND);
        assert_eq!(tables.remembered_uniform(7, "Missing"), Some(Slot::NOT_FOUND));

        tables.forget_program(7);
        assert_eq!(tables.remembered_uniform(7, "Color"), None);
        assert!(tables.table::<Uniforms>().is_empty());
    }

    #[test]
    fn kinds_display() {
        assert_eq!(ResourceKind::VertexArray.to_string(), "vertex array");
        assert_eq!(ResourceKind::Uniform.to_string(), "uniform location");
    }
}
