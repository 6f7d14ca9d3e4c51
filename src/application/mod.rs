pub mod broadcaster;
pub mod estimator;
pub mod prober;
pub mod registry;
pub mod sampler;
pub mod subscriber;

#[cfg(test)]
mod testing;

pub use broadcaster::{BroadcastSubscription, DashboardBroadcaster, Heartbeat, DEFAULT_HEARTBEAT_INTERVAL};
pub use estimator::{estimate_cpu_load, estimate_memory_load, CpuEstimatorState, LoadEstimator};
pub use prober::{LivenessProber, DEFAULT_PROBE_INTERVAL};
pub use registry::{HostRegistry, HostTarget};
pub use sampler::{AgentSampler, SnapshotHub, DEFAULT_SAMPLE_INTERVAL};
pub use subscriber::{AgentSubscriber, DEFAULT_RECONNECT_DELAY};
