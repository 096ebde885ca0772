//! Error types for shardget-fetch.

use std::io;

use thiserror::Error;

use crate::data::ByteRange;

/// Boxed transport error carried unmodified as the cause of a failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every variant is fatal to the run; nothing is retried.
#[derive(Debug, Error)]
pub enum Error {
    #[error("probe request to {url} failed")]
    ProbeFailure {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("{url} does not report a positive content length")]
    SizeUnknown { url: String },

    #[error("{url} does not support byte ranges (Accept-Ranges: {})", .advertised.as_deref().unwrap_or("<absent>"))]
    RangeUnsupported {
        url: String,
        advertised: Option<String>,
    },

    #[error("fetching shard {index} ({range}) failed")]
    FetchFailure {
        index: usize,
        range: ByteRange,
        #[source]
        source: BoxError,
    },

    #[error("writing shard {index} to output failed")]
    WriteFailure {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("invalid concurrency {0}: must be at least 1")]
    InvalidConcurrency(usize),

    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Protocol-level reasons a range response is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("probe answered with status {status}")]
    ProbeStatus { status: u16 },

    #[error("unexpected status {status} for {range}")]
    UnexpectedStatus { status: u16, range: ByteRange },

    #[error("expected {expected} bytes, received {actual}")]
    LengthMismatch { expected: u64, actual: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
