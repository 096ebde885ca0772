use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::fetcher::ShardFetcher;
use super::http::HttpClient;
use super::probe::probe;
use crate::core::{Reassembler, effective_concurrency, plan_shards};
use crate::data::{DownloadOptions, DownloadReport, ProgressCounter, Resource, Shard, ShardResult};
use crate::error::{Error, Result};

/// Downloads a resource as concurrent range requests and writes it out in order.
///
/// The control flow is probe, plan, fan out one task per shard, then fan in
/// through a [`Reassembler`] that writes each shard the moment every earlier
/// shard has been written.
///
/// A downloader holds no per-run state and can be reused; each run counts
/// into the [`ProgressCounter`] its caller passes in.
pub struct Downloader<C: HttpClient> {
    client: Arc<C>,
    options: DownloadOptions,
}

impl<C: HttpClient + 'static> Downloader<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
            options: DownloadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }

    /// Establish the size and range capability of `url`.
    pub async fn probe(&self, url: &str) -> Result<Resource> {
        probe(&*self.client, url, &self.options.headers).await
    }

    /// Number of shards a download of `resource` is split into: the configured
    /// concurrency, clamped to the resource length so no shard is empty.
    pub fn shard_count(&self, resource: &Resource) -> usize {
        effective_concurrency(resource.length, self.options.concurrency)
    }

    /// Plan the shards for `resource` under the configured concurrency.
    pub fn plan(&self, resource: &Resource) -> Result<Vec<Shard>> {
        let requested = self.options.concurrency;
        let concurrency = self.shard_count(resource);
        if concurrency != requested {
            warn!(
                requested,
                concurrency,
                length = resource.length,
                "more shards requested than bytes available"
            );
        }

        plan_shards(resource, concurrency)
    }

    /// Probe `url`, then download it into `output`.
    pub async fn fetch<W>(
        &self,
        url: &str,
        output: &mut W,
        progress: &ProgressCounter,
    ) -> Result<DownloadReport>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let resource = self.probe(url).await?;
        self.download(&resource, output, progress).await
    }

    /// Download an already probed `resource` into `output`.
    ///
    /// Bytes reach `output` in resource order. The first failure of any shard
    /// aborts the remaining fetches and is returned; whatever was written
    /// before it stays written.
    ///
    /// Every byte received is added to `progress`. Pass a fresh counter per
    /// run; after a successful run it holds exactly `resource.length` more.
    pub async fn download<W>(
        &self,
        resource: &Resource,
        output: &mut W,
        progress: &ProgressCounter,
    ) -> Result<DownloadReport>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let shards = self.plan(resource)?;
        let total = shards.len();
        let started = Instant::now();

        let fetcher = Arc::new(ShardFetcher::new(
            Arc::clone(&self.client),
            resource.length,
            Arc::clone(&self.options.headers),
            progress.clone(),
        ));

        // Sized to the shard count so no fetcher waits to hand off its result.
        let (tx, mut rx) = mpsc::channel::<Result<ShardResult>>(total);
        // Dropping the set on an early return aborts every fetch still in flight.
        let mut tasks = JoinSet::new();

        for shard in shards {
            let fetcher = Arc::clone(&fetcher);
            let tx = tx.clone();
            tasks.spawn(async move {
                let result = fetcher.fetch(&shard).await;
                // The receiver is gone only when the run has already failed.
                let _ = tx.send(result).await;
            });
        }
        // The channel closes once the last task has sent and dropped its sender.
        drop(tx);

        debug!(url = %resource.url, shards = total, "dispatched shard fetches");

        let mut reassembler = Reassembler::new(total);
        let mut written = 0u64;

        while let Some(completion) = rx.recv().await {
            let result = completion?;
            let index = result.index;

            let ready = reassembler.accept(result)?;
            if ready.is_empty() {
                debug!(index, waiting_for = reassembler.flush_next(), "holding shard");
            }

            for shard in ready {
                output
                    .write_all(&shard.content)
                    .await
                    .map_err(|source| Error::WriteFailure {
                        index: shard.index,
                        source,
                    })?;
                written += shard.content.len() as u64;
                debug!(index = shard.index, bytes = shard.content.len(), "flushed shard");
            }
        }

        if !reassembler.is_complete() {
            return Err(Error::InvalidState(format!(
                "completion channel closed after {} of {total} shards",
                reassembler.flush_next()
            )));
        }

        output.flush().await.map_err(|source| Error::WriteFailure {
            index: total.saturating_sub(1),
            source,
        })?;

        let report = DownloadReport {
            bytes: written,
            shards: total,
            elapsed: started.elapsed(),
        };
        info!(
            url = %resource.url,
            bytes = report.bytes,
            shards = report.shards,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "download complete"
        );

        Ok(report)
    }
}
