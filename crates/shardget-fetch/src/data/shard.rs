use std::fmt;
use std::sync::Arc;

use bytes::Bytes;

/// A half-open byte span `[start, end)` of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    /// First byte offset (inclusive).
    pub start: u64,
    /// One past the last byte offset (exclusive).
    pub end: u64,
}

impl ByteRange {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "range start {start} past end {end}");
        Self { start, end }
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Offset of the last byte, as used by the inclusive `Range` header.
    ///
    /// Returns `None` for an empty range, which has no last byte.
    #[must_use]
    pub fn last(&self) -> Option<u64> {
        self.end.checked_sub(1).filter(|last| *last >= self.start)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bytes [{}, {})", self.start, self.end)
    }
}

/// One contiguous piece of a resource, fetched independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shard {
    /// Resource URL, shared between all shards of a plan.
    pub url: Arc<str>,
    /// Position in the plan; equals the order the bytes are emitted in.
    pub index: usize,
    /// Byte span covered by this shard.
    pub range: ByteRange,
}

impl Shard {
    #[must_use]
    pub fn len(&self) -> u64 {
        self.range.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }
}

/// The bytes of one completed shard, handed from its fetcher to the reassembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardResult {
    pub index: usize,
    pub content: Bytes,
}

impl ShardResult {
    pub fn new(index: usize, content: impl Into<Bytes>) -> Self {
        Self {
            index,
            content: content.into(),
        }
    }
}
