//! In-memory [`HttpClient`] used by the unit tests of this layer.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures_util::stream;

use super::http::{HttpClient, ProbeResponse, RangeResponse};
use crate::data::ByteRange;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct MemoryError(pub String);

/// Serves ranges of a byte buffer, with per-range delays and failures keyed
/// by the range's start offset.
pub(crate) struct MemoryClient {
    data: Bytes,
    accept_ranges: Option<String>,
    delays: HashMap<u64, Duration>,
    failures: HashSet<u64>,
    truncated: HashSet<u64>,
    ignore_ranges: bool,
    chunk: usize,
    range_requests: AtomicUsize,
}

impl MemoryClient {
    pub(crate) fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            accept_ranges: Some("bytes".to_string()),
            delays: HashMap::new(),
            failures: HashSet::new(),
            truncated: HashSet::new(),
            ignore_ranges: false,
            chunk: 7,
            range_requests: AtomicUsize::new(0),
        }
    }

    pub(crate) fn accept_ranges(mut self, value: Option<&str>) -> Self {
        self.accept_ranges = value.map(str::to_owned);
        self
    }

    pub(crate) fn delay(mut self, start: u64, millis: u64) -> Self {
        self.delays.insert(start, Duration::from_millis(millis));
        self
    }

    pub(crate) fn fail_at(mut self, start: u64) -> Self {
        self.failures.insert(start);
        self
    }

    pub(crate) fn truncate_at(mut self, start: u64) -> Self {
        self.truncated.insert(start);
        self
    }

    /// Answer every range request with `200 OK` and the whole buffer.
    pub(crate) fn ignore_ranges(mut self) -> Self {
        self.ignore_ranges = true;
        self
    }

    pub(crate) fn range_requests(&self) -> usize {
        self.range_requests.load(Ordering::SeqCst)
    }
}

impl HttpClient for MemoryClient {
    type Error = MemoryError;

    async fn head(
        &self,
        _url: &str,
        _headers: &[(String, String)],
    ) -> Result<ProbeResponse, Self::Error> {
        Ok(ProbeResponse {
            status: 200,
            content_length: Some(self.data.len() as u64),
            accept_ranges: self.accept_ranges.clone(),
        })
    }

    async fn get_range(
        &self,
        _url: &str,
        range: ByteRange,
        _headers: &[(String, String)],
    ) -> Result<RangeResponse<Self::Error>, Self::Error> {
        self.range_requests.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&range.start) {
            tokio::time::sleep(*delay).await;
        }
        if self.failures.contains(&range.start) {
            return Err(MemoryError(format!("connection reset at {range}")));
        }

        let (status, mut body) = if self.ignore_ranges {
            (200, self.data.clone())
        } else {
            (206, self.data.slice(range.start as usize..range.end as usize))
        };
        if self.truncated.contains(&range.start) {
            body.truncate(body.len().saturating_sub(1));
        }

        let chunks: Vec<Result<Bytes, MemoryError>> = body
            .chunks(self.chunk)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();

        Ok(RangeResponse {
            status,
            body: Box::pin(stream::iter(chunks)),
        })
    }
}

/// `len` bytes where each byte differs from its neighbours.
pub(crate) fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
