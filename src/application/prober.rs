use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use crate::domain::ProbeOutcome;
use crate::ports::LivenessCheck;

use super::{HostRegistry, HostTarget};

/// Default period between two probes of the same host
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(3);

/// Periodically checks every registered host and records latency and status
pub struct LivenessProber {
    registry: Arc<HostRegistry>,
    check: Arc<dyn LivenessCheck>,
    period: Duration,
}

impl LivenessProber {
    pub fn new(registry: Arc<HostRegistry>, check: Arc<dyn LivenessCheck>, period: Duration) -> Self {
        Self {
            registry,
            check,
            period,
        }
    }

    /// Probe one host and record the outcome; failures are recorded as 500 / -1
    pub async fn probe_once(&self, target: &HostTarget) -> ProbeOutcome {
        let outcome = match self.check.probe(&target.endpoint).await {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(host = %target.name, "Probe failed: {}", e);
                ProbeOutcome::failed()
            }
        };

        self.registry.record_probe(&target.name, outcome);
        outcome
    }

    pub async fn run(self: Arc<Self>, target: HostTarget) {
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.probe_once(&target).await;
        }
    }

    /// One probing task per registered host
    pub fn spawn_all(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        self.registry
            .targets()
            .into_iter()
            .map(|target| tokio::spawn(Arc::clone(&self).run(target)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::FixedLivenessCheck;
    use crate::config::HostConfig;
    use crate::domain::DEFAULT_TREND_CAP;

    fn prober(check: FixedLivenessCheck) -> (Arc<HostRegistry>, Arc<LivenessProber>) {
        let registry = Arc::new(HostRegistry::from_config(&HostConfig::defaults(), DEFAULT_TREND_CAP));
        let prober = LivenessProber::new(Arc::clone(&registry), Arc::new(check), DEFAULT_PROBE_INTERVAL);
        (registry, Arc::new(prober))
    }

    #[tokio::test]
    async fn test_successful_probe_is_recorded() {
        let check = FixedLivenessCheck::default()
            .with("http://localhost:5001", ProbeOutcome::reachable(200, 42));
        let (registry, prober) = prober(check);

        let target = &registry.targets()[0];
        let outcome = prober.probe_once(target).await;
        assert_eq!(outcome, ProbeOutcome::reachable(200, 42));

        let record = registry.get("server-01").unwrap();
        assert_eq!(record.status_code, Some(200));
        assert_eq!(record.latency_millis, Some(42));
    }

    #[tokio::test]
    async fn test_timeout_is_recorded_as_failure() {
        let (registry, prober) = prober(FixedLivenessCheck::default());
        registry.record_metrics("server-02", crate::domain::MetricSnapshot::new(10.0, 10.0));

        let target = &registry.targets()[1];
        let outcome = prober.probe_once(target).await;
        assert_eq!(outcome, ProbeOutcome::failed());

        let record = registry.get("server-02").unwrap();
        assert_eq!(record.status_code, Some(500));
        assert_eq!(record.latency_millis, Some(-1));
        // unreachable latency and bad status each add one
        assert_eq!(record.score_trend.back(), Some(&2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_probes_repeat_on_fixed_period() {
        let (registry, prober) = prober(FixedLivenessCheck::default());
        let handles = prober.spawn_all();
        assert_eq!(handles.len(), 3);

        // first probe fires immediately, then at 3s and 6s
        time::sleep(Duration::from_millis(6_500)).await;
        for handle in &handles {
            handle.abort();
        }

        for record in registry.snapshot() {
            assert_eq!(record.score_trend.len(), 1 + 3, "{}", record.name);
        }
    }
}
