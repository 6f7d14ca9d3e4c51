pub mod liveness_check;
pub mod metric_feed;
pub mod resource_reader;

pub use liveness_check::{LivenessCheck, ProbeFailure};
pub use metric_feed::{FeedError, MetricFeed, SnapshotStream};
pub use resource_reader::{ResourceReader, Unavailable};
