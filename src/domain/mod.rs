pub mod health;
pub mod host;
pub mod metrics;
pub mod probe;
pub mod resource;

pub use health::{HealthScore, StatusColor};
pub use host::{HostRecord, DEFAULT_TREND_CAP};
pub use metrics::{round2, MetricSnapshot, UNAVAILABLE};
pub use probe::ProbeOutcome;
pub use resource::{CpuReading, MemoryReading};
