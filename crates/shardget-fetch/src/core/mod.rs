//! Pure transformations for sharded fetching.
//!
//! Nothing in this module performs I/O. Planning and header validation are
//! plain functions; the [`Reassembler`] is a state machine driven by the
//! effects layer.

mod plan;
mod reassembly;
mod validation;

pub use plan::{effective_concurrency, plan_shards};
pub use reassembly::Reassembler;
pub use validation::{
    accepts_byte_ranges, check_range_status, is_reserved_header, parse_content_length,
    range_header,
};
