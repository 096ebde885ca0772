//! Immutable data types for sharded fetching.
//!
//! A [`Resource`] is established once by the prober, split into [`Shard`]s by
//! the planner, and every shard yields exactly one [`ShardResult`]. None of
//! these are mutated after construction; the [`ProgressCounter`] is the only
//! shared mutable value and it only ever grows.

pub mod options;
pub mod progress;
pub mod resource;
pub mod shard;

pub use options::{DEFAULT_CONCURRENCY, DownloadOptions, DownloadReport};
pub use progress::ProgressCounter;
pub use resource::Resource;
pub use shard::{ByteRange, Shard, ShardResult};
