use serde::{Deserialize, Serialize};

/// Sentinel reported in place of a load that could not be measured.
pub const UNAVAILABLE: f64 = -1.0;

/// Round a percentage to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One sampling tick as pushed from an agent to the monitor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub memory_load: f64,
    pub cpu_load: f64,
}

impl MetricSnapshot {
    pub fn new(memory_load: f64, cpu_load: f64) -> Self {
        Self {
            memory_load,
            cpu_load,
        }
    }

    pub fn is_memory_available(&self) -> bool {
        self.memory_load != UNAVAILABLE
    }

    pub fn is_cpu_available(&self) -> bool {
        self.cpu_load != UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(50.0), 50.0);
        assert_eq!(round2(33.333_333), 33.33);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.004), 0.0);
    }

    #[test]
    fn test_snapshot_wire_format() {
        let snapshot = MetricSnapshot::new(42.5, UNAVAILABLE);
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json, serde_json::json!({ "memoryLoad": 42.5, "cpuLoad": -1.0 }));
        assert!(snapshot.is_memory_available());
        assert!(!snapshot.is_cpu_available());
    }
}
