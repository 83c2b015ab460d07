use std::collections::HashMap;

use super::ResourceKind;

/// Sequential handle allocator for one resource category.
///
/// Handles start at 1 and only ever grow; a released handle is never handed out again,
/// so a stale handle always misses instead of aliasing a newer object.
#[derive(Debug)]
pub struct HandleTable<T> {
    kind: ResourceKind,
    entries: HashMap<u32, T>,
    next: u32,
}

impl<T> HandleTable<T> {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            next: 1,
        }
    }

    #[inline]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Stores `object` under the next free handle.
    ///
    /// Hands `object` back once the handle space is exhausted.
    pub fn insert(&mut self, object: T) -> Result<u32, T> {
        if self.next == 0 {
            return Err(object);
        }

        let handle = self.next;
        // Wraps to 0 after u32::MAX, which marks the table as exhausted.
        self.next = self.next.wrapping_add(1);
        self.entries.insert(handle, object);
        Ok(handle)
    }

    #[inline]
    pub fn resolve(&self, handle: u32) -> Option<&T> {
        self.entries.get(&handle)
    }

    /// Removes the entry for `handle`, returning the object it mapped to.
    #[inline]
    pub fn release(&mut self, handle: u32) -> Option<T> {
        self.entries.remove(&handle)
    }

    #[inline]
    pub fn contains(&self, handle: u32) -> bool {
        self.entries.contains_key(&handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> HandleTable<&'static str> {
        HandleTable::new(ResourceKind::Buffer)
    }

    // ── allocation ────────────────────────────────────────────────────────

    #[test]
    fn handles_start_at_one_and_increase() {
        let mut t = table();
        let handles: Vec<u32> = (0..5).map(|_| t.insert("obj").unwrap()).collect();
        assert_eq!(handles, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn released_handles_are_not_reused() {
        let mut t = table();
        let a = t.insert("a").unwrap();
        let b = t.insert("b").unwrap();
        let c = t.insert("c").unwrap();
        assert_eq!((a, b, c), (1, 2, 3));

        assert_eq!(t.release(b), Some("b"));
        assert_eq!(t.insert("d"), Ok(4));
        assert!(t.resolve(2).is_none());
    }

    #[test]
    fn exhausted_table_refuses_new_handles() {
        let mut t = table();
        t.next = u32::MAX;
        assert_eq!(t.insert("last"), Ok(u32::MAX));
        assert_eq!(t.insert("overflow"), Err("overflow"));
        assert_eq!(t.len(), 1);
    }

    // ── lookup ────────────────────────────────────────────────────────────

    #[test]
    fn resolve_after_release_misses() {
        let mut t = table();
        let h = t.insert("texture").unwrap();
        assert_eq!(t.resolve(h), Some(&"texture"));
        t.release(h);
        assert_eq!(t.resolve(h), None);
        assert_eq!(t.release(h), None);
    }

    #[test]
    fn zero_never_resolves() {
        let mut t = table();
        t.insert("a").unwrap();
        assert!(!t.contains(0));
    }
}
