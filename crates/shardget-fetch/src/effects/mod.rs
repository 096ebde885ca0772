//! I/O operations for sharded fetching.
//!
//! Network access goes through the [`HttpClient`] trait so the prober, the
//! shard fetcher and the [`Downloader`] can be driven by an in-memory client
//! in tests and by [`ReqwestClient`] in production.

mod download;
mod fetcher;
mod http;
mod probe;

#[cfg(test)]
pub(crate) mod testing;

pub use download::Downloader;
pub use fetcher::{CountingSink, ShardFetcher};
pub use http::{BoxStream, HttpClient, ProbeResponse, RangeResponse};
pub use probe::probe;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
