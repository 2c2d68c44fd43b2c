//! Id generation capability
//!
//! The tree engine and block factory never invent ids themselves; they ask an
//! injected [`IdGenerator`]. Production code uses [`UuidIdGenerator`], tests
//! use [`SequentialIdGenerator`] for predictable output.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of document-unique ids
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUID v4 ids
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Monotonic `prefix-N` ids, starting at 1
///
/// ```rust
/// use resource_builder_core::ids::{IdGenerator, SequentialIdGenerator};
///
/// let ids = SequentialIdGenerator::new("blk");
/// assert_eq!(ids.next_id(), "blk-1");
/// assert_eq!(ids.next_id(), "blk-2");
/// ```
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sequential_ids_are_monotonic() {
        let ids = SequentialIdGenerator::new("t");
        assert_eq!(ids.next_id(), "t-1");
        assert_eq!(ids.next_id(), "t-2");
        assert_eq!(ids.next_id(), "t-3");
    }

    #[test]
    fn test_uuid_ids_are_distinct() {
        let ids = UuidIdGenerator;
        let generated: HashSet<String> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 100);
    }

    #[test]
    fn test_generator_is_object_safe() {
        let ids: Box<dyn IdGenerator> = Box::new(SequentialIdGenerator::default());
        assert_eq!(ids.next_id(), "id-1");
    }
}
