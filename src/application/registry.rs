use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use crate::config::HostConfig;
use crate::domain::{HealthScore, HostRecord, MetricSnapshot, ProbeOutcome};

/// Host name and base endpoint, as handed to per-host tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTarget {
    pub name: String,
    pub endpoint: String,
}

/// Fixed set of monitored hosts, each behind its own lock
///
/// Metric pushes, probe results and dashboard reads all go through here. A
/// record is only locked for the duration of a synchronous update, so writers
/// for one host never interleave and other hosts are never blocked.
pub struct HostRegistry {
    hosts: Vec<Mutex<HostRecord>>,
    index: HashMap<String, usize>,
}

impl HostRegistry {
    pub fn new(records: Vec<HostRecord>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(i, record)| (record.name.clone(), i))
            .collect();

        Self {
            hosts: records.into_iter().map(Mutex::new).collect(),
            index,
        }
    }

    pub fn from_config(hosts: &[HostConfig], trend_cap: usize) -> Self {
        Self::new(
            hosts
                .iter()
                .map(|h| HostRecord::new(h.name.clone(), h.url.clone(), h.port, trend_cap))
                .collect(),
        )
    }

    fn lock(host: &Mutex<HostRecord>) -> MutexGuard<'_, HostRecord> {
        host.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn host(&self, name: &str) -> Option<&Mutex<HostRecord>> {
        self.index.get(name).map(|&i| &self.hosts[i])
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn targets(&self) -> Vec<HostTarget> {
        self.hosts
            .iter()
            .map(|host| {
                let record = Self::lock(host);
                HostTarget {
                    name: record.name.clone(),
                    endpoint: record.endpoint(),
                }
            })
            .collect()
    }

    /// Apply a metric push; `None` if the host is not registered
    pub fn record_metrics(&self, name: &str, snapshot: MetricSnapshot) -> Option<HealthScore> {
        let Some(host) = self.host(name) else {
            warn!("Metrics for unknown host {}", name);
            return None;
        };

        if !snapshot.is_memory_available() || !snapshot.is_cpu_available() {
            debug!(host = name, "Agent reported an unmeasured load");
        }

        let score = Self::lock(host).apply_metrics(snapshot);
        debug!(
            host = name,
            score = score.value(),
            status = score.color().as_hex(),
            "monitoring-stats {:?}",
            snapshot
        );
        Some(score)
    }

    /// Apply a probe result; `None` if the host is not registered
    pub fn record_probe(&self, name: &str, outcome: ProbeOutcome) -> Option<HealthScore> {
        let Some(host) = self.host(name) else {
            warn!("Probe result for unknown host {}", name);
            return None;
        };

        let score = Self::lock(host).apply_probe(outcome);
        debug!(
            host = name,
            score = score.value(),
            status = score.color().as_hex(),
            "probe {:?}",
            outcome
        );
        Some(score)
    }

    pub fn get(&self, name: &str) -> Option<HostRecord> {
        self.host(name).map(|host| Self::lock(host).clone())
    }

    /// Copy of every record in configuration order
    pub fn snapshot(&self) -> Vec<HostRecord> {
        self.hosts.iter().map(|host| Self::lock(host).clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::{StatusColor, DEFAULT_TREND_CAP};

    fn registry() -> HostRegistry {
        HostRegistry::from_config(&HostConfig::defaults(), DEFAULT_TREND_CAP)
    }

    #[test]
    fn test_records_created_up_front() {
        let registry = registry();
        assert_eq!(registry.len(), 3);

        let names: Vec<String> = registry.snapshot().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["server-01", "server-02", "server-03"]);

        let targets = registry.targets();
        assert_eq!(targets[1].endpoint, "http://localhost:5002");
    }

    #[test]
    fn test_both_inputs_feed_one_record() {
        let registry = registry();

        registry.record_probe("server-01", ProbeOutcome::reachable(200, 20));
        let score = registry
            .record_metrics("server-01", MetricSnapshot::new(80.0, 90.0))
            .unwrap();
        assert_eq!(score.value(), 2);

        let score = registry
            .record_probe("server-01", ProbeOutcome::failed())
            .unwrap();
        assert_eq!(score.value(), 4);

        let record = registry.get("server-01").unwrap();
        assert_eq!(record.memory_load, Some(80.0));
        assert_eq!(record.cpu_load, Some(90.0));
        assert_eq!(record.latency_millis, Some(-1));
        assert_eq!(record.status, StatusColor::BrightGreen);
        assert_eq!(Vec::from(record.score_trend), vec![0, 4, 2, 0]);

        // other hosts untouched
        assert_eq!(registry.get("server-02").unwrap().status, StatusColor::Unknown);
    }

    #[test]
    fn test_unknown_host_is_ignored() {
        let registry = registry();
        assert!(registry.record_metrics("nope", MetricSnapshot::new(1.0, 1.0)).is_none());
        assert!(registry.record_probe("nope", ProbeOutcome::failed()).is_none());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let registry = Arc::new(HostRegistry::new(vec![HostRecord::new(
            "server-01",
            "http://localhost",
            5001,
            10_000,
        )]));

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        if i % 2 == 0 {
                            registry.record_metrics("server-01", MetricSnapshot::new(10.0, 10.0));
                        } else {
                            registry.record_probe("server-01", ProbeOutcome::reachable(200, 5));
                        }
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let record = registry.get("server-01").unwrap();
        assert_eq!(record.score_trend.len(), 1 + 4 * 500);
    }
}
