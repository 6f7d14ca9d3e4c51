use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;

use crate::domain::{CpuReading, MemoryReading};
use crate::ports::{ResourceReader, Unavailable};

use super::parser::{self, Limit};
use super::{CgroupConfig, CgroupVersion};

const V1_MEMORY_USAGE: &str = "memory/memory.usage_in_bytes";
const V1_MEMORY_LIMIT: &str = "memory/memory.limit_in_bytes";
const V1_CPU_USAGE: [&str; 2] = ["cpuacct/cpuacct.usage", "cpu,cpuacct/cpuacct.usage"];
const V2_MEMORY_CURRENT: &str = "memory.current";
const V2_MEMORY_MAX: &str = "memory.max";
const V2_CPU_STAT: &str = "cpu.stat";

/// Resource reader over the cgroup filesystem, v1 layout first, then v2
pub struct CgroupReader {
    config: CgroupConfig,
}

impl CgroupReader {
    pub fn new(config: CgroupConfig) -> Self {
        Self { config }
    }

    /// Read a file, treating "does not exist" as `None`
    async fn read_optional(path: &Path) -> Result<Option<String>, Unavailable> {
        match fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Which interface layout is mounted, if any
    pub async fn detect_version(&self) -> Option<CgroupVersion> {
        let root = &self.config.cgroup_path;
        if fs::try_exists(root.join(V1_MEMORY_USAGE)).await.unwrap_or(false) {
            return Some(CgroupVersion::V1);
        }
        if fs::try_exists(root.join(V2_MEMORY_CURRENT)).await.unwrap_or(false) {
            return Some(CgroupVersion::V2);
        }
        None
    }

    async fn host_memory_total(&self) -> Result<u64, Unavailable> {
        let content = fs::read_to_string(self.config.proc_path.join("meminfo")).await?;
        parser::parse_mem_total(&content)
    }

    async fn effective_limit(&self, limit: Limit) -> Result<u64, Unavailable> {
        match limit {
            Limit::Bounded(bytes) => Ok(bytes),
            Limit::Unbounded => self.host_memory_total().await,
        }
    }
}

#[async_trait]
impl ResourceReader for CgroupReader {
    async fn read_memory(&self) -> Result<MemoryReading, Unavailable> {
        let root = &self.config.cgroup_path;

        if let Some(usage) = Self::read_optional(&root.join(V1_MEMORY_USAGE)).await? {
            let used = parser::parse_counter(&usage, "memory.usage_in_bytes")?;
            let limit_content = fs::read_to_string(root.join(V1_MEMORY_LIMIT)).await?;
            let limit = parser::parse_v1_limit(&limit_content)?;
            return Ok(MemoryReading::new(used, self.effective_limit(limit).await?));
        }

        if let Some(current) = Self::read_optional(&root.join(V2_MEMORY_CURRENT)).await? {
            let used = parser::parse_counter(&current, "memory.current")?;
            let max_content = fs::read_to_string(root.join(V2_MEMORY_MAX)).await?;
            let limit = parser::parse_v2_limit(&max_content)?;
            return Ok(MemoryReading::new(used, self.effective_limit(limit).await?));
        }

        Err(Unavailable::NoInterface(root.clone()))
    }

    async fn read_cpu_cumulative(&self) -> Result<CpuReading, Unavailable> {
        let root = &self.config.cgroup_path;

        for candidate in V1_CPU_USAGE {
            if let Some(content) = Self::read_optional(&root.join(candidate)).await? {
                let nanos = parser::parse_counter(&content, "cpuacct.usage")?;
                return Ok(CpuReading::new(nanos / 1_000, Utc::now().timestamp_millis()));
            }
        }

        if let Some(content) = Self::read_optional(&root.join(V2_CPU_STAT)).await? {
            let micros = parser::parse_cpu_stat_usage(&content)?;
            return Ok(CpuReading::new(micros, Utc::now().timestamp_millis()));
        }

        Err(Unavailable::NoInterface(root.clone()))
    }
}
