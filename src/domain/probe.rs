use serde::{Deserialize, Serialize};

/// Status code recorded when a host could not be reached
pub const FAILED_STATUS_CODE: u16 = 500;

/// Latency recorded when a host could not be reached
pub const UNREACHABLE_LATENCY: i64 = -1;

/// Result of one liveness check against a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeOutcome {
    pub status_code: u16,
    pub latency_millis: i64,
}

impl ProbeOutcome {
    pub fn reachable(status_code: u16, latency_millis: i64) -> Self {
        Self {
            status_code,
            latency_millis,
        }
    }

    pub fn failed() -> Self {
        Self {
            status_code: FAILED_STATUS_CODE,
            latency_millis: UNREACHABLE_LATENCY,
        }
    }
}
