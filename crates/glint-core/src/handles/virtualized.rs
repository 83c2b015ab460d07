use std::collections::HashMap;
use std::fmt;

use crate::driver::Binding;

use super::{Category, HandleModel, HandleTable, Registry, ResourceKind, Slot, Uniforms};

/// Handle model for bindings that hand out object references (WebGL and friends).
///
/// One [`HandleTable`] per category. Uniform locations are objects too; a resolved
/// location is stored once per (program, name) and released with its program.
pub struct HandleTables<B: Binding> {
    pub(super) programs: HandleTable<B::Program>,
    pub(super) shaders: HandleTable<B::Shader>,
    pub(super) buffers: HandleTable<B::Buffer>,
    pub(super) textures: HandleTable<B::Texture>,
    pub(super) vertex_arrays: HandleTable<B::VertexArray>,
    pub(super) framebuffers: HandleTable<B::Framebuffer>,
    pub(super) renderbuffers: HandleTable<B::Renderbuffer>,
    pub(super) uniforms: HandleTable<B::UniformLocation>,

    /// program handle -> uniform name -> slot (including `NOT_FOUND`).
    uniform_slots: HashMap<u32, HashMap<String, Slot>>,
}

impl<B: Binding> HandleTables<B> {
    pub fn new() -> Self {
        Self {
            programs: HandleTable::new(ResourceKind::Program),
            shaders: HandleTable::new(ResourceKind::Shader),
            buffers: HandleTable::new(ResourceKind::Buffer),
            textures: HandleTable::new(ResourceKind::Texture),
            vertex_arrays: HandleTable::new(ResourceKind::VertexArray),
            framebuffers: HandleTable::new(ResourceKind::Framebuffer),
            renderbuffers: HandleTable::new(ResourceKind::Renderbuffer),
            uniforms: HandleTable::new(ResourceKind::Uniform),
            uniform_slots: HashMap::new(),
        }
    }

    /// Table for category `C`.
    pub fn table<C: Category<B>>(&self) -> &HandleTable<C::Object> {
        C::table(self)
    }
}

impl<B: Binding> Default for HandleTables<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Binding> fmt::Debug for HandleTables<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandleTables")
            .field("programs", &self.programs.len())
            .field("shaders", &self.shaders.len())
            .field("buffers", &self.buffers.len())
            .field("textures", &self.textures.len())
            .field("vertex_arrays", &self.vertex_arrays.len())
            .field("framebuffers", &self.framebuffers.len())
            .field("renderbuffers", &self.renderbuffers.len())
            .field("uniforms", &self.uniforms.len())
            .finish()
    }
}

impl<B: Binding, C: Category<B>> Registry<B, C> for HandleTables<B> {
    #[inline]
    fn register(&mut self, object: C::Object) -> Result<u32, C::Object> {
        C::table_mut(self).insert(object)
    }

    #[inline]
    fn resolve(&self, handle: u32) -> Option<C::Object> {
        C::table(self).resolve(handle).cloned()
    }

    #[inline]
    fn release(&mut self, handle: u32) -> Option<C::Object> {
        C::table_mut(self).release(handle)
    }
}

impl<B: Binding> HandleModel<B> for HandleTables<B> {
    const COALESCES_DELETES: bool = false;

    fn remembered_uniform(&self, program: u32, name: &str) -> Option<Slot> {
        self.uniform_slots.get(&program)?.get(name).copied()
    }

    fn remember_uniform(&mut self, program: u32, name: &str, slot: Slot) {
        self.uniform_slots
            .entry(program)
            .or_default()
            .insert(name.to_owned(), slot);
    }

    fn forget_program(&mut self, program: u32) {
        let Some(slots) = self.uniform_slots.remove(&program) else {
            return;
        };
        for slot in slots.into_values().filter(|s| s.is_found()) {
            Registry::<B, Uniforms>::release(self, slot.get() as u32);
        }
    }
}
