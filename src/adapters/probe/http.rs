use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::ProbeOutcome;
use crate::ports::{LivenessCheck, ProbeFailure};

/// Liveness check issuing a plain GET against the host's base URL
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LivenessCheck for HttpProber {
    async fn probe(&self, endpoint: &str) -> Result<ProbeOutcome, ProbeFailure> {
        let start = Instant::now();

        let response = self.client.get(endpoint).send().await.map_err(|e| {
            if e.is_timeout() {
                ProbeFailure::Timeout
            } else {
                ProbeFailure::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeFailure::Status(status.as_u16()));
        }

        let latency_millis = i64::try_from(start.elapsed().as_millis()).unwrap_or(i64::MAX);
        Ok(ProbeOutcome::reachable(status.as_u16(), latency_millis))
    }
}
