use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::domain::MetricSnapshot;

use super::LoadEstimator;

/// Default sampling period of an agent
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_secs(1);

/// Fan-out point between the sampler and every connected aggregator
#[derive(Clone)]
pub struct SnapshotHub {
    sender: broadcast::Sender<MetricSnapshot>,
    latest: Arc<RwLock<Option<MetricSnapshot>>>,
}

impl SnapshotHub {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            latest: Arc::new(RwLock::new(None)),
        }
    }

    /// Store and push a snapshot; returns how many aggregators it reached
    pub fn publish(&self, snapshot: MetricSnapshot) -> usize {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
        // no receivers is not an error, the tick is simply not delivered
        self.sender.send(snapshot).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricSnapshot> {
        self.sender.subscribe()
    }

    pub fn latest(&self) -> Option<MetricSnapshot> {
        *self.latest.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Periodically samples the estimator and publishes to the hub
pub struct AgentSampler {
    estimator: LoadEstimator,
    hub: SnapshotHub,
    period: Duration,
}

impl AgentSampler {
    pub fn new(estimator: LoadEstimator, hub: SnapshotHub, period: Duration) -> Self {
        Self {
            estimator,
            hub,
            period,
        }
    }

    pub async fn tick(&mut self) -> MetricSnapshot {
        let snapshot = self.estimator.sample().await;
        let delivered = self.hub.publish(snapshot);
        debug!(
            memory_load = snapshot.memory_load,
            cpu_load = snapshot.cpu_load,
            delivered,
            "Sampled"
        );
        snapshot
    }

    pub async fn run(mut self) {
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            self.tick().await;
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
