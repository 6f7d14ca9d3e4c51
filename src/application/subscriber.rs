use std::sync::Arc;
use std::time::Duration;

use futures::stream::StreamExt;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{info, warn};

use crate::ports::{FeedError, MetricFeed};

use super::{HostRegistry, HostTarget};

/// Default wait before reconnecting to an agent that went away
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Keeps one metric subscription per registered agent and feeds the registry
pub struct AgentSubscriber {
    registry: Arc<HostRegistry>,
    feed: Arc<dyn MetricFeed>,
    reconnect_delay: Duration,
}

impl AgentSubscriber {
    pub fn new(registry: Arc<HostRegistry>, feed: Arc<dyn MetricFeed>, reconnect_delay: Duration) -> Self {
        Self {
            registry,
            feed,
            reconnect_delay,
        }
    }

    /// Consume one connection until the agent disconnects.
    ///
    /// Returns the number of snapshots applied. Malformed events are skipped;
    /// a transport error ends the session.
    pub async fn consume_session(&self, target: &HostTarget) -> Result<usize, FeedError> {
        let mut stream = self.feed.connect(&target.endpoint).await?;
        info!("Server connected: {}", target.name);

        let mut applied = 0;
        while let Some(event) = stream.next().await {
            match event {
                Ok(snapshot) => {
                    self.registry.record_metrics(&target.name, snapshot);
                    applied += 1;
                }
                Err(FeedError::Decode(e)) => {
                    warn!(host = %target.name, "Skipping malformed event: {}", e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(applied)
    }

    pub async fn run(self: Arc<Self>, target: HostTarget) {
        loop {
            match self.consume_session(&target).await {
                Ok(applied) => info!("Server disconnected: {} ({} events)", target.name, applied),
                Err(e) => warn!("Server {} unavailable: {}", target.name, e),
            }
            time::sleep(self.reconnect_delay).await;
        }
    }

    /// One subscription task per registered host
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
    use crate::application::testing::ScriptedFeed;
    use crate::config::HostConfig;
    use crate::domain::{MetricSnapshot, DEFAULT_TREND_CAP};

    fn decode_error() -> FeedError {
        FeedError::Decode(serde_json::from_str::<MetricSnapshot>("garbage").unwrap_err())
    }

    fn subscriber(feed: Arc<ScriptedFeed>) -> (Arc<HostRegistry>, Arc<AgentSubscriber>) {
        let registry = Arc::new(HostRegistry::from_config(&HostConfig::defaults(), DEFAULT_TREND_CAP));
        let subscriber = AgentSubscriber::new(Arc::clone(&registry), feed, DEFAULT_RECONNECT_DELAY);
        (registry, Arc::new(subscriber))
    }

    #[tokio::test]
    async fn test_session_applies_snapshots_and_skips_garbage() {
        let feed = Arc::new(ScriptedFeed::default().with_session(vec![
            Ok(MetricSnapshot::new(20.0, 5.0)),
            Err(decode_error()),
            Ok(MetricSnapshot::new(80.0, 95.0)),
        ]));
        let (registry, subscriber) = subscriber(feed);

        let target = registry.targets()[0].clone();
        assert_eq!(subscriber.consume_session(&target).await.unwrap(), 2);

        let record = registry.get("server-01").unwrap();
        assert_eq!(record.memory_load, Some(80.0));
        assert_eq!(record.cpu_load, Some(95.0));
        assert_eq!(record.score_trend.len(), 3);
    }

    #[tokio::test]
    async fn test_transport_error_ends_session() {
        let feed = Arc::new(ScriptedFeed::default().with_session(vec![
            Ok(MetricSnapshot::new(20.0, 5.0)),
            Err(FeedError::Transport("reset".to_string())),
            Ok(MetricSnapshot::new(80.0, 95.0)),
        ]));
        let (registry, subscriber) = subscriber(feed);

        let target = registry.targets()[0].clone();
        assert!(matches!(
            subscriber.consume_session(&target).await,
            Err(FeedError::Transport(_))
        ));
        assert_eq!(registry.get("server-01").unwrap().memory_load, Some(20.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnects_after_fixed_delay() {
        let feed = Arc::new(
            ScriptedFeed::default()
                .with_session(vec![Ok(MetricSnapshot::new(20.0, 5.0))])
                .with_session(vec![Ok(MetricSnapshot::new(30.0, 5.0))]),
        );
        let (registry, subscriber) = subscriber(Arc::clone(&feed));

        let target = registry.targets()[0].clone();
        let handle = tokio::spawn(Arc::clone(&subscriber).run(target));

        // connects at 0s and 2s succeed, 4s is refused, next attempt at 6s
        time::sleep(Duration::from_millis(5_000)).await;
        handle.abort();

        assert_eq!(feed.connects(), 3);
        assert_eq!(registry.get("server-01").unwrap().memory_load, Some(30.0));
    }
}
