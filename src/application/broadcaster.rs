use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::HostRecord;

use super::HostRegistry;

/// Default period between two heartbeats to the same dashboard
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Payload of the `heartbeat` event
#[derive(Debug, Clone, Serialize)]
pub struct Heartbeat {
    pub servers: Vec<HostRecord>,
}

/// Emits registry snapshots to each connected dashboard on a fixed period
pub struct DashboardBroadcaster {
    registry: Arc<HostRegistry>,
    period: Duration,
    active: Arc<AtomicUsize>,
}

impl DashboardBroadcaster {
    pub fn new(registry: Arc<HostRegistry>, period: Duration) -> Self {
        Self {
            registry,
            period,
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn heartbeat(&self) -> Heartbeat {
        Heartbeat {
            servers: self.registry.snapshot(),
        }
    }

    /// Number of dashboards with a running heartbeat task
    pub fn active_clients(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Start a heartbeat task for one dashboard client.
    ///
    /// The first heartbeat is sent right away. A heartbeat the client has not
    /// picked up yet is superseded, never queued behind.
    pub fn subscribe(&self) -> BroadcastSubscription {
        let (sender, receiver) = mpsc::channel(1);
        let registry = Arc::clone(&self.registry);
        let period = self.period;
        let guard = ActiveClient::enter(Arc::clone(&self.active));

        let task = tokio::spawn(async move {
            let _guard = guard;
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let heartbeat = Heartbeat {
                    servers: registry.snapshot(),
                };
                match sender.try_send(heartbeat) {
                    Ok(()) | Err(TrySendError::Full(_)) => {}
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });

        BroadcastSubscription { task, receiver }
    }
}

/// Counts a client while its heartbeat task is alive
struct ActiveClient(Arc<AtomicUsize>);

impl ActiveClient {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ActiveClient {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One dashboard's heartbeat stream; dropping it cancels the periodic task
pub struct BroadcastSubscription {
    task: JoinHandle<()>,
    receiver: mpsc::Receiver<Heartbeat>,
}

impl BroadcastSubscription {
    pub async fn next(&mut self) -> Option<Heartbeat> {
        self.receiver.recv().await
    }

    /// Consume the handle, aborting the heartbeat task
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for BroadcastSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
