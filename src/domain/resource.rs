/// Memory usage of a control group, with an effective limit that is always > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryReading {
    pub used_bytes: u64,
    pub limit_bytes: u64,
}

impl MemoryReading {
    pub fn new(used_bytes: u64, limit_bytes: u64) -> Self {
        Self {
            used_bytes,
            limit_bytes,
        }
    }
}

/// Cumulative CPU time of a control group, in microseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuReading {
    pub usage_micros: u64,
    pub as_of_millis: i64,
}

impl CpuReading {
    pub fn new(usage_micros: u64, as_of_millis: i64) -> Self {
        Self {
            usage_micros,
            as_of_millis,
        }
    }
}
