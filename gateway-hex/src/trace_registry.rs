//! Bounded record of processed trace numbers.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::info;

pub const DEFAULT_TRACE_CAPACITY: usize = 10_000;

/// Remembers trace numbers so a replayed transaction is refused.
///
/// Once `capacity` traces are held the whole set is cleared, so protection
/// is best-effort across that boundary.
#[derive(Debug)]
pub struct TraceRegistry {
    seen: Mutex<HashSet<String>>,
    capacity: usize,
}

impl Default for TraceRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_CAPACITY)
    }
}

impl TraceRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            capacity: capacity.max(1),
        }
    }

    /// Records `trace`; returns `false` if it had already been seen.
    pub fn check_and_insert(&self, trace: &str) -> bool {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(trace) {
            return false;
        }
        if seen.len() >= self.capacity {
            info!(cleared = seen.len(), "Trace registry full, clearing");
            seen.clear();
        }
        seen.insert(trace.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
