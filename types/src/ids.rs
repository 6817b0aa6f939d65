use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PROMISE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a promise instance, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PromiseId(u64);

impl PromiseId {
    /// Allocate the next identifier. Identifiers are never reused.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_PROMISE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PromiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}
