use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{CpuReading, MemoryReading};

/// Why a resource reading could not be produced
#[derive(Debug, Error)]
pub enum Unavailable {
    #[error("no resource-control interface found under {0}")]
    NoInterface(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Missing field: {0}")]
    MissingField(String),
}

/// Port for reading raw counters of the resource-control group we run in
#[async_trait]
pub trait ResourceReader: Send + Sync {
    /// Current memory usage and effective limit
    async fn read_memory(&self) -> Result<MemoryReading, Unavailable>;

    /// Cumulative CPU time, normalized to microseconds
    async fn read_cpu_cumulative(&self) -> Result<CpuReading, Unavailable>;
}
