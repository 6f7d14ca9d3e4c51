use serde::{Deserialize, Serialize};

pub const CPU_THRESHOLD_PERCENT: f64 = 75.0;
pub const MEMORY_THRESHOLD_PERCENT: f64 = 75.0;
pub const LATENCY_THRESHOLD_MILLIS: i64 = 500;
pub const HEALTHY_STATUS_CODE: u16 = 200;

/// Number of conditions that can degrade a host
pub const MAX_SCORE: u8 = 4;

/// Dashboard color for a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusColor {
    #[serde(rename = "#cccccc")]
    Unknown,
    #[serde(rename = "#ff0000")]
    Red,
    #[serde(rename = "#ffcc00")]
    Amber,
    #[serde(rename = "#00cc00")]
    Green,
    #[serde(rename = "#00ff00")]
    BrightGreen,
}

impl StatusColor {
    /// Map a normalized score (0.0 healthy, 1.0 fully degraded) to a color.
    ///
    /// Upper bounds are inclusive. A fully degraded host (1.0) lands in the
    /// last bucket, which the dashboard renders bright green; existing
    /// dashboards depend on this mapping so it is kept as is.
    pub fn for_score(normalized: f64) -> Self {
        if normalized <= 0.25 {
            Self::Red
        } else if normalized <= 0.50 {
            Self::Amber
        } else if normalized <= 0.75 {
            Self::Green
        } else {
            Self::BrightGreen
        }
    }

    pub fn as_hex(&self) -> &'static str {
        match self {
            Self::Unknown => "#cccccc",
            Self::Red => "#ff0000",
            Self::Amber => "#ffcc00",
            Self::Green => "#00cc00",
            Self::BrightGreen => "#00ff00",
        }
    }
}

/// Count of tripped degradation conditions for one host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HealthScore(u8);

impl HealthScore {
    /// Score the latest known values of a host. Unknown loads and latency
    /// never trip their condition; an unknown status code does.
    pub fn evaluate(
        cpu_load: Option<f64>,
        memory_load: Option<f64>,
        latency_millis: Option<i64>,
        status_code: Option<u16>,
    ) -> Self {
        let mut score = 0;

        if cpu_load.is_some_and(|load| load > CPU_THRESHOLD_PERCENT) {
            score += 1;
        }
        if memory_load.is_some_and(|load| load > MEMORY_THRESHOLD_PERCENT) {
            score += 1;
        }
        if latency_millis.is_some_and(|latency| latency > LATENCY_THRESHOLD_MILLIS || latency == -1) {
            score += 1;
        }
        if status_code != Some(HEALTHY_STATUS_CODE) {
            score += 1;
        }

        Self(score)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn normalized(&self) -> f64 {
        f64::from(self.0) / f64::from(MAX_SCORE)
    }

    /// Complement stored in the trend, so higher means healthier
    pub fn trend_value(&self) -> u8 {
        MAX_SCORE - self.0
    }

    pub fn color(&self) -> StatusColor {
        StatusColor::for_score(self.normalized())
    }
}
