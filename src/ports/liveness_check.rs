use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ProbeOutcome;

#[derive(Debug, Error)]
pub enum ProbeFailure {
    #[error("probe timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status {0}")]
    Status(u16),
}

/// Port for checking whether a host answers on its base endpoint
#[async_trait]
pub trait LivenessCheck: Send + Sync {
    async fn probe(&self, endpoint: &str) -> Result<ProbeOutcome, ProbeFailure>;
}
