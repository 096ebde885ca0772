use bytes::Bytes;

use crate::data::ShardResult;
use crate::error::{Error, Result};

/// Restores index order over shard completions that arrive in any order.
///
/// Holds one slot per shard. A result is parked in its slot until every
/// lower index has been flushed; then the whole contiguous run starting at
/// `flush_next` is handed back in order and the slots are released.
///
/// Invariant: every index below `flush_next` has been flushed and its slot is
/// empty; every slot at or above `flush_next` is empty or holds a completed,
/// unflushed result.
#[derive(Debug)]
pub struct Reassembler {
    slots: Vec<Option<Bytes>>,
    flush_next: usize,
    pending: usize,
}

impl Reassembler {
    pub fn new(shards: usize) -> Self {
        Self {
            slots: vec![None; shards],
            flush_next: 0,
            pending: 0,
        }
    }

    /// Accept one completed shard and return the results that are now ready
    /// to be written, in ascending index order.
    ///
    /// The returned run is empty when `result` arrived ahead of a gap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidState`] for an index outside the plan or one
    /// that was already accepted.
    pub fn accept(&mut self, result: ShardResult) -> Result<Vec<ShardResult>> {
        let ShardResult { index, content } = result;

        if index >= self.slots.len() {
            return Err(Error::InvalidState(format!(
                "shard {index} is outside a plan of {} shards",
                self.slots.len()
            )));
        }
        if index < self.flush_next || self.slots[index].is_some() {
            return Err(Error::InvalidState(format!("shard {index} completed twice")));
        }

        self.slots[index] = Some(content);
        self.pending += 1;

        if index != self.flush_next {
            return Ok(Vec::new());
        }

        let mut ready = Vec::new();
        while let Some(content) = self.slots.get_mut(self.flush_next).and_then(Option::take) {
            ready.push(ShardResult {
                index: self.flush_next,
                content,
            });
            self.pending -= 1;
            self.flush_next += 1;
        }

        Ok(ready)
    }

    /// Lowest index not yet flushed.
    #[must_use]
    pub fn flush_next(&self) -> usize {
        self.flush_next
    }

    /// Completed shards parked behind a gap.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Whether the slot for `index` currently holds an unflushed result.
    #[must_use]
    pub fn is_pending(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(Option::is_some)
    }

    /// True once every shard has been flushed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.flush_next == self.slots.len()
    }
}
