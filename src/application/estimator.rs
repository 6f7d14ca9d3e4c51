use std::sync::Arc;

use tracing::warn;

use crate::domain::{round2, CpuReading, MemoryReading, MetricSnapshot, UNAVAILABLE};
use crate::ports::ResourceReader;

/// Previous CPU reading of one monitored target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuEstimatorState {
    pub last_usage_micros: u64,
    pub last_check_millis: i64,
}

impl From<CpuReading> for CpuEstimatorState {
    fn from(reading: CpuReading) -> Self {
        Self {
            last_usage_micros: reading.usage_micros,
            last_check_millis: reading.as_of_millis,
        }
    }
}

/// Memory usage as a percentage of the effective limit
pub fn estimate_memory_load(reading: MemoryReading) -> f64 {
    if reading.limit_bytes == 0 {
        return UNAVAILABLE;
    }
    round2(reading.used_bytes as f64 / reading.limit_bytes as f64 * 100.0)
}

/// CPU usage since the previous reading, where 100 is one fully used core.
///
/// The first reading only sets the baseline and yields 0. The state always
/// moves to the newest reading, including when the elapsed time is not
/// positive or the counter went backwards; both of those yield 0.
pub fn estimate_cpu_load(state: &mut Option<CpuEstimatorState>, reading: CpuReading) -> f64 {
    let Some(previous) = state.replace(CpuEstimatorState::from(reading)) else {
        return 0.0;
    };

    let elapsed_secs = (reading.as_of_millis - previous.last_check_millis) as f64 / 1000.0;
    if elapsed_secs <= 0.0 {
        return 0.0;
    }

    // counter restarted, e.g. the cgroup was recreated
    let Some(delta_micros) = reading.usage_micros.checked_sub(previous.last_usage_micros) else {
        return 0.0;
    };

    let used_secs = delta_micros as f64 / 1_000_000.0;
    round2(used_secs / elapsed_secs * 100.0)
}

/// Turns raw readings into load percentages for one monitored target
pub struct LoadEstimator {
    reader: Arc<dyn ResourceReader>,
    cpu_state: Option<CpuEstimatorState>,
}

impl LoadEstimator {
    pub fn new(reader: Arc<dyn ResourceReader>) -> Self {
        Self {
            reader,
            cpu_state: None,
        }
    }

    /// Memory load in percent, or the `-1` sentinel
    pub async fn memory_load(&self) -> f64 {
        match self.reader.read_memory().await {
            Ok(reading) => estimate_memory_load(reading),
            Err(e) => {
                warn!("Failed to read memory info: {}", e);
                UNAVAILABLE
            }
        }
    }

    /// CPU load in percent since the previous call, or the `-1` sentinel
    pub async fn cpu_load(&mut self) -> f64 {
        match self.reader.read_cpu_cumulative().await {
            Ok(reading) => estimate_cpu_load(&mut self.cpu_state, reading),
            Err(e) => {
                warn!("Failed to read CPU info: {}", e);
                UNAVAILABLE
            }
        }
    }

    pub async fn sample(&mut self) -> MetricSnapshot {
        let memory_load = self.memory_load().await;
        let cpu_load = self.cpu_load().await;
        MetricSnapshot::new(memory_load, cpu_load)
    }
}
