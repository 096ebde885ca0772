use std::io;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tracing::debug;

use super::http::HttpClient;
use crate::core::check_range_status;
use crate::data::{ProgressCounter, Shard, ShardResult};
use crate::error::{Error, ResponseError, Result};

/// In-memory receive buffer for one shard that reports every byte it takes
/// to the shared [`ProgressCounter`].
#[derive(Debug)]
pub struct CountingSink {
    buffer: BytesMut,
    counter: ProgressCounter,
}

impl CountingSink {
    pub fn new(capacity: usize, counter: ProgressCounter) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            counter,
        }
    }

    /// Bytes received so far.
    pub fn received(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }
}

impl io::Write for CountingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.counter.add(buf.len() as u64);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Retrieves exactly the bytes of one shard into memory.
///
/// Fetchers share nothing with each other except the progress counter.
pub struct ShardFetcher<C: HttpClient> {
    client: Arc<C>,
    resource_length: u64,
    headers: Arc<[(String, String)]>,
    counter: ProgressCounter,
}

impl<C: HttpClient> ShardFetcher<C> {
    pub fn new(
        client: Arc<C>,
        resource_length: u64,
        headers: Arc<[(String, String)]>,
        counter: ProgressCounter,
    ) -> Self {
        Self {
            client,
            resource_length,
            headers,
            counter,
        }
    }

    /// Fetch `shard` and return its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchFailure`] carrying the transport error, or a
    /// [`ResponseError`] for an unexpected status or a body whose length does
    /// not match the shard.
    pub async fn fetch(&self, shard: &Shard) -> Result<ShardResult> {
        let expected = shard.len();
        let capacity = usize::try_from(expected).unwrap_or(0);
        let mut sink = CountingSink::new(capacity, self.counter.clone());

        if shard.is_empty() {
            return Ok(ShardResult::new(shard.index, sink.into_bytes()));
        }

        debug!(index = shard.index, range = %shard.range, "fetching shard");

        let response = self
            .client
            .get_range(&shard.url, shard.range, &self.headers)
            .await
            .map_err(|e| self.failure(shard, e))?;

        check_range_status(response.status, shard.range, self.resource_length)
            .map_err(|e| self.failure(shard, e))?;

        let mut body = response.body;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| self.failure(shard, e))?;

            if sink.received() + chunk.len() as u64 > expected {
                return Err(self.failure(
                    shard,
                    ResponseError::LengthMismatch {
                        expected,
                        actual: sink.received() + chunk.len() as u64,
                    },
                ));
            }
            io::Write::write_all(&mut sink, &chunk).map_err(|e| self.failure(shard, e))?;
        }

        if sink.received() != expected {
            return Err(self.failure(
                shard,
                ResponseError::LengthMismatch {
                    expected,
                    actual: sink.received(),
                },
            ));
        }

        debug!(index = shard.index, bytes = expected, "shard complete");
        Ok(ShardResult::new(shard.index, sink.into_bytes()))
    }

    fn failure<E>(&self, shard: &Shard, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::FetchFailure {
            index: shard.index,
            range: shard.range,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan_shards;
    use crate::data::Resource;
    use crate::effects::testing::{MemoryClient, sample};

    const URL: &str = "http://example.test/blob";

    fn fetcher(client: MemoryClient, length: u64, counter: &ProgressCounter) -> ShardFetcher<MemoryClient> {
        ShardFetcher::new(Arc::new(client), length, Arc::from(Vec::new()), counter.clone())
    }

    #[test]
    fn counting_sink_reports_every_byte() {
        let counter = ProgressCounter::new();
        let mut sink = CountingSink::new(16, counter.clone());

        io::Write::write_all(&mut sink, b"hello ").unwrap();
        io::Write::write_all(&mut sink, b"world").unwrap();

        assert_eq!(counter.get(), 11);
        assert_eq!(sink.into_bytes(), Bytes::from_static(b"hello world"));
    }

    #[tokio::test]
    async fn fetches_exactly_the_shard_bytes() {
        let data = sample(1000);
        let counter = ProgressCounter::new();
        let fetcher = fetcher(MemoryClient::new(data.clone()), 1000, &counter);
        let shards = plan_shards(&Resource::new(URL, 1000), 4).unwrap();

        let result = fetcher.fetch(&shards[2]).await.unwrap();

        assert_eq!(result.index, 2);
        assert_eq!(&result.content[..], &data[500..750]);
        assert_eq!(counter.get(), 250);
    }

    #[tokio::test]
    async fn transport_error_is_a_fetch_failure() {
        let counter = ProgressCounter::new();
        let fetcher = fetcher(MemoryClient::new(sample(100)).fail_at(50), 100, &counter);
        let shards = plan_shards(&Resource::new(URL, 100), 2).unwrap();

        let err = fetcher.fetch(&shards[1]).await.unwrap_err();

        assert!(matches!(err, Error::FetchFailure { index: 1, .. }));
    }

    #[tokio::test]
    async fn truncated_body_is_a_length_mismatch() {
        let counter = ProgressCounter::new();
        let fetcher = fetcher(MemoryClient::new(sample(100)).truncate_at(0), 100, &counter);
        let shards = plan_shards(&Resource::new(URL, 100), 2).unwrap();

        let err = fetcher.fetch(&shards[0]).await.unwrap_err();

        let Error::FetchFailure { source, .. } = err else {
            panic!("expected FetchFailure, got {err:?}");
        };
        assert_eq!(
            source.downcast_ref::<ResponseError>(),
            Some(&ResponseError::LengthMismatch { expected: 50, actual: 49 })
        );
    }

    #[tokio::test]
    async fn ignored_range_header_is_rejected() {
        let counter = ProgressCounter::new();
        let fetcher = fetcher(MemoryClient::new(sample(100)).ignore_ranges(), 100, &counter);
        let shards = plan_shards(&Resource::new(URL, 100), 2).unwrap();

        let err = fetcher.fetch(&shards[1]).await.unwrap_err();

        let Error::FetchFailure { source, .. } = err else {
            panic!("expected FetchFailure, got {err:?}");
        };
        assert!(matches!(
            source.downcast_ref::<ResponseError>(),
            Some(ResponseError::UnexpectedStatus { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn whole_resource_shard_accepts_plain_ok() {
        let data = sample(64);
        let counter = ProgressCounter::new();
        let fetcher = fetcher(MemoryClient::new(data.clone()).ignore_ranges(), 64, &counter);
        let shards = plan_shards(&Resource::new(URL, 64), 1).unwrap();

        let result = fetcher.fetch(&shards[0]).await.unwrap();

        assert_eq!(&result.content[..], &data[..]);
    }
}
