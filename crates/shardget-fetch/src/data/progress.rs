use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running total of bytes received across all shard fetchers.
///
/// Clones share the same total. Increments are lock-free and never lost under
/// concurrent writers; reads never block a writer. The total never decreases.
#[derive(Debug, Clone, Default)]
pub struct ProgressCounter {
    bytes: Arc<AtomicU64>,
}

impl ProgressCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `n` more received bytes.
    pub fn add(&self, n: u64) {
        self.bytes.fetch_add(n, Ordering::Relaxed);
    }

    /// Bytes received so far.
    #[must_use]
    pub fn get(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }
}
