use std::sync::Arc;
use std::time::Duration;

/// Shard count used when the caller does not choose one.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Configuration for a sharded download.
///
/// # Examples
///
/// ```
/// use shardget_fetch::DownloadOptions;
///
/// let options = DownloadOptions::default()
///     .concurrency(8)
///     .header("Authorization", "Bearer token");
/// assert_eq!(options.concurrency, 8);
/// ```
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    /// Number of shards, and therefore of concurrent range requests.
    ///
    /// Must be at least 1. Values larger than the resource length are
    /// clamped so no shard is empty.
    ///
    /// Default: 16
    pub concurrency: usize,

    /// Extra headers sent with the probe and with every range request.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            headers: Arc::from(Vec::new()),
        }
    }
}

impl DownloadOptions {
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers = self.headers.to_vec();
        headers.push((name.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    pub fn headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut all = self.headers.to_vec();
        all.extend(headers);
        self.headers = Arc::from(all);
        self
    }
}

/// Summary of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    /// Bytes written to the output stream.
    pub bytes: u64,
    /// Number of shards the resource was split into.
    pub shards: usize,
    /// Wall time from dispatching the first shard to the final flush.
    pub elapsed: Duration,
}
