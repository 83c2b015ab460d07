use crate::driver::Binding;
use crate::handles::{HandleModel, Slot, Uniforms};

use super::{Gfx, GfxError, GfxResult};

impl<B: Binding, H: HandleModel<B>> Gfx<B, H> {
    /// Common path of every upload: a program must be bound, and slot -1 is skipped.
    fn upload(
        &mut self,
        command: &'static str,
        slot: Slot,
        issue: impl FnOnce(&mut B, &B::UniformLocation),
    ) -> GfxResult<()> {
        if !matches!(self.state.program.get(), Some(Some(_))) {
            return self.reject(command, GfxError::NoActiveProgram);
        }
        if !slot.is_found() {
            return Ok(());
        }

        let location = self.resolve::<Uniforms>(command, slot)?;
        issue(&mut self.binding, &location);
        self.check(command);
        self.stats.uniform_sets += 1;
        Ok(())
    }

    pub fn uniform_1i(&mut self, slot: Slot, x: i32) -> GfxResult<()> {
        self.upload("uniform_1i", slot, |b, l| b.uniform_1i(l, x))
    }

    pub fn uniform_1f(&mut self, slot: Slot, x: f32) -> GfxResult<()> {
        self.upload("uniform_1f", slot, |b, l| b.uniform_1f(l, x))
    }

    pub fn uniform_2f(&mut self, slot: Slot, x: f32, y: f32) -> GfxResult<()> {
        self.upload("uniform_2f", slot, |b, l| b.uniform_2f(l, x, y))
    }

    pub fn uniform_3f(&mut self, slot: Slot, x: f32, y: f32, z: f32) -> GfxResult<()> {
        self.upload("uniform_3f", slot, |b, l| b.uniform_3f(l, x, y, z))
    }

    pub fn uniform_4f(&mut self, slot: Slot, x: f32, y: f32, z: f32, w: f32) -> GfxResult<()> {
        self.upload("uniform_4f", slot, |b, l| b.uniform_4f(l, x, y, z, w))
    }

    pub fn uniform_1fv(&mut self, slot: Slot, values: &[f32]) -> GfxResult<()> {
        self.upload("uniform_1fv", slot, |b, l| b.uniform_1fv(l, values))
    }

    pub fn uniform_2fv(&mut self, slot: Slot, values: &[[f32; 2]]) -> GfxResult<()> {
        self.upload("uniform_2fv", slot, |b, l| {
            b.uniform_2fv(l, bytemuck::cast_slice(values))
        })
    }

    pub fn uniform_3fv(&mut self, slot: Slot, values: &[[f32; 3]]) -> GfxResult<()> {
        self.upload("uniform_3fv", slot, |b, l| {
            b.uniform_3fv(l, bytemuck::cast_slice(values))
        })
    }

    pub fn uniform_4fv(&mut self, slot: Slot, values: &[[f32; 4]]) -> GfxResult<()> {
        self.upload("uniform_4fv", slot, |b, l| {
            b.uniform_4fv(l, bytemuck::cast_slice(values))
        })
    }

    /// Column-major 3x3 matrices unless `transpose` is set.
    pub fn uniform_matrix_3fv(
        &mut self,
        slot: Slot,
        transpose: bool,
        values: &[[f32; 9]],
    ) -> GfxResult<()> {
        self.upload("uniform_matrix_3fv", slot, |b, l| {
            b.uniform_matrix_3fv(l, transpose, bytemuck::cast_slice(values))
        })
    }

    /// Column-major 4x4 matrices unless `transpose` is set.
    pub fn uniform_matrix_4fv(
        &mut self,
        slot: Slot,
        transpose: bool,
        values: &[[f32; 16]],
    ) -> GfxResult<()> {
        self.upload("uniform_matrix_4fv", slot, |b, l| {
            b.uniform_matrix_4fv(l, transpose, bytemuck::cast_slice(values))
        })
    }
}
