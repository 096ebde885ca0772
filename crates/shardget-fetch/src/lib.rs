//! Concurrent byte-range downloading with in-order reassembly.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable resource, shard and option types
//! - [`core`] - Pure transformations: shard planning, header parsing, reassembly
//! - [`effects`] - Network and output I/O behind the [`HttpClient`] trait
//!
//! # Key Features
//!
//! - **Sharded**: The resource is split into N contiguous half-open ranges fetched in parallel
//! - **Ordered Output**: Completions arrive in any order, bytes leave in resource order
//! - **Bounded Buffering**: A shard's buffer is released the moment it is flushed
//! - **Mechanism-Only**: No retries and no UI; the caller renders progress from [`ProgressCounter`]

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{Reassembler, plan_shards};
pub use self::data::{
    ByteRange, DownloadOptions, DownloadReport, ProgressCounter, Resource, Shard, ShardResult,
};
pub use self::effects::{BoxStream, Downloader, HttpClient, ProbeResponse, RangeResponse};

#[cfg(feature = "reqwest")]
pub use self::effects::ReqwestClient;

pub use self::error::{BoxError, Error, ResponseError, Result};
