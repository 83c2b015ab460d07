use crate::driver::Binding;
use crate::handles::HandleModel;
use crate::state::Viewport;

use super::Gfx;

impl<B: Binding, H: HandleModel<B>> Gfx<B, H> {
    // ── capabilities ──────────────────────────────────────────────────────

    pub fn enable(&mut self, cap: u32) {
        self.set_capability("enable", cap, true);
    }

    pub fn disable(&mut self, cap: u32) {
        self.set_capability("disable", cap, false);
    }

    /// Cached state of `cap`; `None` until the façade has set it.
    #[inline]
    pub fn is_enabled(&self, cap: u32) -> Option<bool> {
        self.state.capability(cap)
    }

    fn set_capability(&mut self, command: &'static str, cap: u32, enabled: bool) {
        if self.state.capability(cap) == Some(enabled) {
            self.stats.capability_hits += 1;
            return;
        }
        if enabled {
            self.binding.enable(cap);
        } else {
            self.binding.disable(cap);
        }
        self.check(command);
        self.state.store_capability(cap, enabled);
    }

    // ── cached axes ───────────────────────────────────────────────────────

    /// Selects the texture unit (`TEXTURE0 + n`).
    pub fn active_texture(&mut self, unit: u32) {
        self.set_state("active_texture", |s| &mut s.active_texture, unit, |b, unit| {
            b.active_texture(unit)
        });
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.set_state("viewport", |s| &mut s.viewport, viewport, |b, v| {
            b.viewport(v.x, v.y, v.width, v.height)
        });
    }

    pub fn line_width(&mut self, width: f32) {
        self.set_state("line_width", |s| &mut s.line_width, width, |b, w| b.line_width(w));
    }

    pub fn front_face(&mut self, mode: u32) {
        self.set_state("front_face", |s| &mut s.front_face, mode, |b, m| b.front_face(m));
    }

    pub fn cull_face(&mut self, mode: u32) {
        self.set_state("cull_face", |s| &mut s.cull_face, mode, |b, m| b.cull_face(m));
    }

    pub fn depth_func(&mut self, func: u32) {
        self.set_state("depth_func", |s| &mut s.depth_func, func, |b, f| b.depth_func(f));
    }

    pub fn depth_mask(&mut self, flag: bool) {
        self.set_state("depth_mask", |s| &mut s.depth_mask, flag, |b, f| b.depth_mask(f));
    }

    /// Same blend equation for color and alpha.
    pub fn blend_equation(&mut self, mode: u32) {
        self.set_state("blend_equation", |s| &mut s.blend_equation, (mode, mode), |b, _| {
            b.blend_equation(mode)
        });
    }

    pub fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32) {
        self.set_state(
            "blend_equation_separate",
            |s| &mut s.blend_equation,
            (mode_rgb, mode_alpha),
            |b, (rgb, alpha)| b.blend_equation_separate(rgb, alpha),
        );
    }

    /// Same blend factors for color and alpha.
    pub fn blend_func(&mut self, src: u32, dst: u32) {
        self.set_state("blend_func", |s| &mut s.blend_func, (src, dst, src, dst), |b, _| {
            b.blend_func(src, dst)
        });
    }

    pub fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.set_state(
            "blend_func_separate",
            |s| &mut s.blend_func,
            (src_rgb, dst_rgb, src_alpha, dst_alpha),
            |b, (sr, dr, sa, da)| b.blend_func_separate(sr, dr, sa, da),
        );
    }

    pub fn polygon_mode(&mut self, face: u32, mode: u32) {
        self.set_state("polygon_mode", |s| &mut s.polygon_mode, (face, mode), |b, (f, m)| {
            b.polygon_mode(f, m)
        });
    }

    pub fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.set_state(
            "polygon_offset",
            |s| &mut s.polygon_offset,
            (factor, units),
            |b, (f, u)| b.polygon_offset(f, u),
        );
    }

    // ── uncached ──────────────────────────────────────────────────────────

    pub fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.binding.scissor(x, y, width, height);
        self.check("scissor");
    }

    pub fn color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.binding.color_mask(red, green, blue, alpha);
        self.check("color_mask");
    }

    pub fn clear_color(&mut self, red: f32, green: f32, blue: f32, alpha: f32) {
        self.binding.clear_color(red, green, blue, alpha);
        self.check("clear_color");
    }

    pub fn clear_depth(&mut self, depth: f32) {
        self.binding.clear_depth(depth);
        self.check("clear_depth");
    }

    pub fn clear_stencil(&mut self, stencil: i32) {
        self.binding.clear_stencil(stencil);
        self.check("clear_stencil");
    }

    pub fn clear(&mut self, mask: u32) {
        self.binding.clear(mask);
        self.check("clear");
    }
}
