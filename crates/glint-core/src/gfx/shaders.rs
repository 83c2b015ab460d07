use crate::driver::Binding;
use crate::handles::{
    HandleModel, ProgramId, Programs, ResourceKind, ShaderId, Shaders, Slot, Uniforms,
};
use crate::program::ShaderStage;

use std::sync::atomic::Ordering;

use super::{Gfx, GfxError, GfxResult, NEXT_PROGRAM_SERIAL};

impl<B: Binding, H: HandleModel<B>> Gfx<B, H> {
    // ── shaders ───────────────────────────────────────────────────────────

    pub fn create_shader(&mut self, stage: ShaderStage) -> GfxResult<ShaderId> {
        let object = self
            .binding
            .create_shader(stage.gl_enum())
            .map_err(|reason| GfxError::CreateFailed {
                kind: ResourceKind::Shader,
                reason,
            })?;
        self.check("create_shader");
        self.register::<Shaders>(object, B::delete_shader)
    }

    pub fn shader_source(&mut self, shader: ShaderId, source: &str) -> GfxResult<()> {
        let object = self.resolve::<Shaders>("shader_source", shader)?;
        self.binding.shader_source(&object, source);
        self.check("shader_source");
        Ok(())
    }

    pub fn compile_shader(&mut self, shader: ShaderId) -> GfxResult<()> {
        let object = self.resolve::<Shaders>("compile_shader", shader)?;
        self.binding.compile_shader(&object);
        self.check("compile_shader");
        Ok(())
    }

    pub fn shader_compile_status(&mut self, shader: ShaderId) -> GfxResult<bool> {
        let object = self.resolve::<Shaders>("shader_compile_status", shader)?;
        let ok = self.binding.shader_compile_status(&object);
        self.check("shader_compile_status");
        Ok(ok)
    }

    pub fn shader_info_log(&mut self, shader: ShaderId) -> GfxResult<String> {
        let object = self.resolve::<Shaders>("shader_info_log", shader)?;
        let log = self.binding.shader_info_log(&object);
        self.check("shader_info_log");
        Ok(log)
    }

    pub fn delete_shader(&mut self, shader: ShaderId) -> GfxResult<()> {
        let object = self.resolve::<Shaders>("delete_shader", shader)?;
        self.binding.delete_shader(object);
        self.check("delete_shader");
        self.release::<Shaders>(shader);
        Ok(())
    }

    /// Creates and compiles a shader. On failure the shader is deleted and the
    /// compiler log returned in [`GfxError::Compile`].
    pub fn compile(&mut self, stage: ShaderStage, source: &str) -> GfxResult<ShaderId> {
        let shader = self.create_shader(stage)?;
        self.shader_source(shader, source)?;
        self.compile_shader(shader)?;
        if self.shader_compile_status(shader)? {
            return Ok(shader);
        }

        let log = self.shader_info_log(shader)?;
        self.delete_shader(shader)?;
        Err(GfxError::Compile { stage, log })
    }

    // ── programs ──────────────────────────────────────────────────────────

    pub fn create_program(&mut self) -> GfxResult<ProgramId> {
        let object = self
            .binding
            .create_program()
            .map_err(|reason| GfxError::CreateFailed {
                kind: ResourceKind::Program,
                reason,
            })?;
        self.check("create_program");
        let id = self.register::<Programs>(object, B::delete_program)?;

        let serial = NEXT_PROGRAM_SERIAL.fetch_add(1, Ordering::Relaxed);
        self.programs.insert(id.raw(), serial);
        self.stats.programs += 1;
        log::trace!("create_program: program {id} (serial {serial})");
        Ok(id)
    }

    pub fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) -> GfxResult<()> {
        let p = self.resolve::<Programs>("attach_shader", program)?;
        let s = self.resolve::<Shaders>("attach_shader", shader)?;
        self.binding.attach_shader(&p, &s);
        self.check("attach_shader");
        Ok(())
    }

    pub fn detach_shader(&mut self, program: ProgramId, shader: ShaderId) -> GfxResult<()> {
        let p = self.resolve::<Programs>("detach_shader", program)?;
        let s = self.resolve::<Shaders>("detach_shader", shader)?;
        self.binding.detach_shader(&p, &s);
        self.check("detach_shader");
        Ok(())
    }

    pub fn link_program(&mut self, program: ProgramId) -> GfxResult<()> {
        let object = self.resolve::<Programs>("link_program", program)?;
        self.binding.link_program(&object);
        self.check("link_program");
        Ok(())
    }

    pub fn program_link_status(&mut self, program: ProgramId) -> GfxResult<bool> {
        let object = self.resolve::<Programs>("program_link_status", program)?;
        let ok = self.binding.program_link_status(&object);
        self.check("program_link_status");
        Ok(ok)
    }

    pub fn program_info_log(&mut self, program: ProgramId) -> GfxResult<String> {
        let object = self.resolve::<Programs>("program_info_log", program)?;
        let log = self.binding.program_info_log(&object);
        self.check("program_info_log");
        Ok(log)
    }

    /// Binds `program` (or none). Skipped when it is already bound.
    pub fn use_program(&mut self, program: Option<ProgramId>) -> GfxResult<()> {
        let raw = program.map(ProgramId::raw);
        if self.state.program.is(&raw) {
            return Ok(());
        }

        let object = self.resolve_opt::<Programs>("use_program", program)?;
        self.binding.use_program(object.as_ref());
        self.check("use_program");
        self.state.program.store(raw);
        Ok(())
    }

    /// Deletes `program` along with every uniform slot resolved against it.
    pub fn delete_program(&mut self, program: ProgramId) -> GfxResult<()> {
        let object = self.resolve::<Programs>("delete_program", program)?;
        self.binding.delete_program(object);
        self.check("delete_program");

        let raw = program.raw();
        self.release::<Programs>(program);
        self.handles.forget_program(raw);
        self.programs.remove(&raw);
        if self.state.program.is(&Some(raw)) {
            self.state.program.invalidate();
        }
        self.stats.programs = self.stats.programs.saturating_sub(1);
        log::trace!("delete_program: program {program}");
        Ok(())
    }

    pub fn attrib_location(&mut self, program: ProgramId, name: &str) -> GfxResult<Option<u32>> {
        let object = self.resolve::<Programs>("attrib_location", program)?;
        let location = self.binding.attrib_location(&object, name);
        self.check("attrib_location");
        Ok(location)
    }

    /// Slot of uniform `name` in `program`; [`Slot::NOT_FOUND`] when the program does
    /// not declare it.
    pub fn uniform_location(&mut self, program: ProgramId, name: &str) -> GfxResult<Slot> {
        if let Some(slot) = self.handles.remembered_uniform(program.raw(), name) {
            return Ok(slot);
        }

        let object = self.resolve::<Programs>("uniform_location", program)?;
        let location = self.binding.uniform_location(&object, name);
        self.check("uniform_location");

        let slot = match location {
            Some(location) => self.register::<Uniforms>(location, |_, _| {})?,
            None => Slot::NOT_FOUND,
        };
        self.handles.remember_uniform(program.raw(), name, slot);
        Ok(slot)
    }
}
