//! Monotonic identifier generation

use core::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe generator handing out strictly increasing raw ids.
///
/// Ids are never reused for the lifetime of the generator.
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a generator whose first id is `first`
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Generate the next unique id
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id that the next call to [`IdGenerator::next`] will return
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::starting_at(0)
    }
}
