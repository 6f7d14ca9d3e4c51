use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::domain::MetricSnapshot;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("connect failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed event: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type SnapshotStream = BoxStream<'static, Result<MetricSnapshot, FeedError>>;

/// Port for subscribing to the metric pushes of one agent
#[async_trait]
pub trait MetricFeed: Send + Sync {
    /// Open a subscription; the stream ends when the agent disconnects
    async fn connect(&self, endpoint: &str) -> Result<SnapshotStream, FeedError>;
}
