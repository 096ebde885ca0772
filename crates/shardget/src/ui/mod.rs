pub mod tracker;

pub use tracker::ProgressReporter;
