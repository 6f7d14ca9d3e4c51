mod parser;
mod reader;

use std::fmt;
use std::path::PathBuf;

pub use reader::CgroupReader;

/// Resource-control interface layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgroupVersion {
    V1,
    V2,
}

impl fmt::Display for CgroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "cgroup v1"),
            Self::V2 => write!(f, "cgroup v2"),
        }
    }
}

/// Configuration for cgroup and procfs paths (useful for Docker mounts)
#[derive(Debug, Clone)]
pub struct CgroupConfig {
    pub cgroup_path: PathBuf,
    pub proc_path: PathBuf,
}

impl CgroupConfig {
    pub fn new(cgroup_path: impl Into<PathBuf>, proc_path: impl Into<PathBuf>) -> Self {
        Self {
            cgroup_path: cgroup_path.into(),
            proc_path: proc_path.into(),
        }
    }
}
