/// Façade statistics.
///
/// Gauges follow live resources and are never reset. Counters accumulate until
/// [`Stats::reset_counters`]; use [`Stats::since`] for per-frame deltas.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    // gauges
    pub programs: usize,
    pub buffers: usize,
    pub textures: usize,
    pub vertex_arrays: usize,

    // counters
    pub draw_calls: u64,
    pub uniform_sets: u64,
    /// Capability toggles skipped because the cached state already matched.
    pub capability_hits: u64,
    pub uniform_hits: u64,
    pub uniform_misses: u64,
}

impl Stats {
    /// Clears the counters. Gauges are left alone.
    pub fn reset_counters(&mut self) {
        self.draw_calls = 0;
        self.uniform_sets = 0;
        self.capability_hits = 0;
        self.uniform_hits = 0;
        self.uniform_misses = 0;
    }

    /// Counter deltas since `earlier`; gauges are taken from `self`.
    pub fn since(&self, earlier: &Stats) -> Stats {
        Stats {
            draw_calls: self.draw_calls.saturating_sub(earlier.draw_calls),
            uniform_sets: self.uniform_sets.saturating_sub(earlier.uniform_sets),
            capability_hits: self.capability_hits.saturating_sub(earlier.capability_hits),
            uniform_hits: self.uniform_hits.saturating_sub(earlier.uniform_hits),
            uniform_misses: self.uniform_misses.saturating_sub(earlier.uniform_misses),
            ..*self
        }
    }

    /// Share of uniform lookups answered from the cache, in `0.0..=1.0`.
    pub fn uniform_hit_rate(&self) -> f64 {
        let total = self.uniform_hits + self.uniform_misses;
        if total == 0 {
            return 0.0;
        }
        self.uniform_hits as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy() -> Stats {
        Stats {
            programs: 2,
            buffers: 5,
            textures: 3,
            vertex_arrays: 1,
            draw_calls: 40,
            uniform_sets: 120,
            capability_hits: 7,
            uniform_hits: 30,
            uniform_misses: 10,
        }
    }

    #[test]
    fn reset_keeps_gauges() {
        let mut s = busy();
        s.reset_counters();
        assert_eq!(s.draw_calls, 0);
        assert_eq!(s.uniform_sets, 0);
        assert_eq!(s.capability_hits, 0);
        assert_eq!(s.uniform_hits + s.uniform_misses, 0);
        assert_eq!((s.programs, s.buffers, s.textures, s.vertex_arrays), (2, 5, 3, 1));
    }

    #[test]
    fn since_subtracts_counters_only() {
        let earlier = busy();
        let mut now = busy();
        now.draw_calls += 12;
        now.uniform_sets += 4;
        now.buffers = 6;

        let d = now.since(&earlier);
        assert_eq!(d.draw_calls, 12);
        assert_eq!(d.uniform_sets, 4);
        assert_eq!(d.capability_hits, 0);
        assert_eq!(d.buffers, 6);
    }

    #[test]
    fn hit_rate() {
        assert_eq!(Stats::default().uniform_hit_rate(), 0.0);
        assert!((busy().uniform_hit_rate() - 0.75).abs() < 1e-9);
    }
}
