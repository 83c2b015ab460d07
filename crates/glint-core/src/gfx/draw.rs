use crate::driver::Binding;
use crate::handles::HandleModel;

use super::Gfx;

impl<B: Binding, H: HandleModel<B>> Gfx<B, H> {
    pub fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.binding.draw_arrays(mode, first, count);
        self.check("draw_arrays");
        self.stats.draw_calls += 1;
    }

    /// `offset` is a byte offset into the bound `ELEMENT_ARRAY_BUFFER`.
    pub fn draw_elements(&mut self, mode: u32, count: i32, element_type: u32, offset: i32) {
        self.binding.draw_elements(mode, count, element_type, offset);
        self.check("draw_elements");
        self.stats.draw_calls += 1;
    }

    pub fn draw_arrays_instanced(&mut self, mode: u32, first: i32, count: i32, instances: i32) {
        self.binding
            .draw_arrays_instanced(mode, first, count, instances);
        self.check("draw_arrays_instanced");
        self.stats.draw_calls += 1;
    }

    pub fn draw_elements_instanced(
        &mut self,
        mode: u32,
        count: i32,
        element_type: u32,
        offset: i32,
        instances: i32,
    ) {
        self.binding
            .draw_elements_instanced(mode, count, element_type, offset, instances);
        self.check("draw_elements_instanced");
        self.stats.draw_calls += 1;
    }
}
