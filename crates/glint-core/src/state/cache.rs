use std::collections::HashMap;

/// Last value submitted on one state axis.
///
/// Starts unset; an unset value never compares equal, so the first submission always
/// reaches the driver.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cached<T>(Option<T>);

impl<T> Default for Cached<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T: PartialEq> Cached<T> {
    /// True when `value` is what the driver already holds.
    #[inline]
    pub fn is(&self, value: &T) -> bool {
        self.0.as_ref() == Some(value)
    }

    #[inline]
    pub fn store(&mut self, value: T) {
        self.0 = Some(value);
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    #[inline]
    pub fn invalidate(&mut self) {
        self.0 = None;
    }
}

/// Viewport rectangle in framebuffer pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Mirror of the driver state the façade has set.
///
/// Grouped axes (blend equation, blend function, polygon mode, polygon offset,
/// viewport) compare and store as a whole.
#[derive(Debug, Default)]
pub struct StateCache {
    pub active_texture: Cached<u32>,
    pub viewport: Cached<Viewport>,
    pub line_width: Cached<f32>,
    pub front_face: Cached<u32>,
    pub cull_face: Cached<u32>,
    pub depth_func: Cached<u32>,
    pub depth_mask: Cached<bool>,
    /// (rgb, alpha)
    pub blend_equation: Cached<(u32, u32)>,
    /// (src rgb, dst rgb, src alpha, dst alpha)
    pub blend_func: Cached<(u32, u32, u32, u32)>,
    /// (face, mode)
    pub polygon_mode: Cached<(u32, u32)>,
    /// (factor, units)
    pub polygon_offset: Cached<(f32, f32)>,
    /// Raw handle of the bound program; `Some(None)` means "no program" was set.
    pub program: Cached<Option<u32>>,

    capabilities: HashMap<u32, bool>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached on/off state of `cap`; `None` when never set.
    #[inline]
    pub fn capability(&self, cap: u32) -> Option<bool> {
        self.capabilities.get(&cap).copied()
    }

    #[inline]
    pub fn store_capability(&mut self, cap: u32, enabled: bool) {
        self.capabilities.insert(cap, enabled);
    }

    /// Returns every axis to unset.
    pub fn invalidate_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn unset_never_matches() {
        let c: Cached<u32> = Cached::default();
        assert!(!c.is(&0));
        assert!(c.get().is_none());
    }

    #[test]
    fn store_then_match() {
        let mut c = Cached::default();
        c.store(LEQUAL);
        assert!(c.is(&LEQUAL));
        assert!(!c.is(&LESS));

        c.invalidate();
        assert!(!c.is(&LEQUAL));
    }

    #[test]
    fn groups_compare_whole() {
        let mut c = Cached::default();
        c.store((SRC_ALPHA, ONE_MINUS_SRC_ALPHA, SRC_ALPHA, ONE_MINUS_SRC_ALPHA));
        assert!(!c.is(&(SRC_ALPHA, ONE, SRC_ALPHA, ONE_MINUS_SRC_ALPHA)));
    }

    #[test]
    fn capabilities_are_tri_state() {
        let mut s = StateCache::new();
        assert_eq!(s.capability(BLEND), None);
        s.store_capability(BLEND, false);
        assert_eq!(s.capability(BLEND), Some(false));
        s.store_capability(BLEND, true);
        assert_eq!(s.capability(BLEND), Some(true));
    }

    #[test]
    fn invalidate_all_clears_every_axis() {
        let mut s = StateCache::new();
        s.viewport.store(Viewport::new(0, 0, 640, 480));
        s.program.store(Some(3));
        s.store_capability(DEPTH_TEST, true);

        s.invalidate_all();
        assert!(s.viewport.get().is_none());
        assert!(s.program.get().is_none());
        assert_eq!(s.capability(DEPTH_TEST), None);
    }
}
