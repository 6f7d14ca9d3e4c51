use std::collections::VecDeque;

use serde::Serialize;

use super::{HealthScore, MetricSnapshot, ProbeOutcome, StatusColor};

/// Default number of scores kept per host
pub const DEFAULT_TREND_CAP: usize = 100;

/// Monitor-side view of one observed host
///
/// Field names on the wire follow what the dashboard reads: `status` is the
/// color and `scoreTrend` holds `4 - score` for every evaluation, oldest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    pub name: String,
    pub url: String,
    pub port: u16,
    pub memory_load: Option<f64>,
    pub cpu_load: Option<f64>,
    #[serde(rename = "latency")]
    pub latency_millis: Option<i64>,
    pub status_code: Option<u16>,
    pub status: StatusColor,
    pub score_trend: VecDeque<u8>,
    #[serde(skip)]
    trend_cap: usize,
}

impl HostRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>, port: u16, trend_cap: usize) -> Self {
        let trend_cap = trend_cap.max(1);
        let mut score_trend = VecDeque::with_capacity(trend_cap);
        score_trend.push_back(0);

        Self {
            name: name.into(),
            url: url.into(),
            port,
            memory_load: None,
            cpu_load: None,
            latency_millis: None,
            status_code: None,
            status: StatusColor::Unknown,
            score_trend,
            trend_cap,
        }
    }

    /// Base URL the host is probed and subscribed on, e.g. `http://localhost:5001`
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.url.trim_end_matches('/'), self.port)
    }

    /// Record a metric push and re-score against the last known probe.
    pub fn apply_metrics(&mut self, snapshot: MetricSnapshot) -> HealthScore {
        self.memory_load = Some(snapshot.memory_load);
        self.cpu_load = Some(snapshot.cpu_load);
        self.recompute_health()
    }

    /// Record a probe result and re-score against the last known metrics.
    pub fn apply_probe(&mut self, outcome: ProbeOutcome) -> HealthScore {
        self.latency_millis = Some(outcome.latency_millis);
        self.status_code = Some(outcome.status_code);
        self.recompute_health()
    }

    fn recompute_health(&mut self) -> HealthScore {
        let score = HealthScore::evaluate(
            self.cpu_load,
            self.memory_load,
            self.latency_millis,
            self.status_code,
        );

        self.status = score.color();
        if self.score_trend.len() >= self.trend_cap {
            self.score_trend.pop_front();
        }
        self.score_trend.push_back(score.trend_value());

        score
    }
}
