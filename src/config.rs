use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::DEFAULT_TREND_CAP;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read hosts file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid hosts file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no hosts configured")]
    NoHosts,

    #[error("duplicate host name: {0}")]
    DuplicateHost(String),
}

/// One monitored host as listed in the hosts file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostConfig {
    pub name: String,
    pub url: String,
    pub port: u16,
}

impl HostConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            port,
        }
    }

    /// Three local agents on ports 5001..=5003
    pub fn defaults() -> Vec<Self> {
        (1..=3)
            .map(|i| Self::new(format!("server-0{}", i), "http://localhost", 5000 + i))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct HostsFile {
    #[serde(default)]
    hosts: Vec<HostConfig>,
}

fn validate_hosts(hosts: Vec<HostConfig>) -> Result<Vec<HostConfig>, ConfigError> {
    if hosts.is_empty() {
        return Err(ConfigError::NoHosts);
    }

    let mut seen = HashSet::new();
    for host in &hosts {
        if !seen.insert(host.name.as_str()) {
            return Err(ConfigError::DuplicateHost(host.name.clone()));
        }
    }

    Ok(hosts)
}

/// Load the `[[hosts]]` table from a TOML file
pub fn load_hosts(path: &Path) -> Result<Vec<HostConfig>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file: HostsFile = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_hosts(file.hosts)
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key).and_then(|s| s.parse().ok()).unwrap_or(default)
}

fn millis_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    lookup(key)
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}

fn log_level(lookup: &impl Fn(&str) -> Option<String>) -> String {
    lookup("PULSEMON_LOG_LEVEL").unwrap_or_else(|| "info".to_string())
}

/// Agent configuration
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub port: u16,
    pub sample_interval: Duration,
    pub cgroup_path: PathBuf,
    pub proc_path: PathBuf,
    pub log_level: String,
}

impl AgentConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: parse_or(&lookup, "AGENT_PORT", 5001),
            sample_interval: millis_or(&lookup, "AGENT_SAMPLE_INTERVAL_MS", Duration::from_secs(1)),
            cgroup_path: lookup("AGENT_CGROUP_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/sys/fs/cgroup")),
            proc_path: lookup("AGENT_PROC_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/proc")),
            log_level: log_level(&lookup),
        }
    }
}

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub port: u16,
    pub hosts: Vec<HostConfig>,
    pub probe_interval: Duration,
    pub probe_timeout: Duration,
    pub heartbeat_interval: Duration,
    pub reconnect_delay: Duration,
    pub trend_cap: usize,
    pub static_dir: PathBuf,
    pub log_level: String,
}

impl MonitorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let hosts = match lookup("MONITOR_HOSTS_FILE") {
            Some(path) => load_hosts(Path::new(&path))?,
            None => HostConfig::defaults(),
        };

        Ok(Self {
            port: parse_or(&lookup, "MONITOR_PORT", 3000),
            hosts,
            probe_interval: millis_or(&lookup, "MONITOR_PROBE_INTERVAL_MS", Duration::from_secs(3)),
            probe_timeout: millis_or(&lookup, "MONITOR_PROBE_TIMEOUT_MS", Duration::from_secs(2)),
            heartbeat_interval: millis_or(&lookup, "MONITOR_HEARTBEAT_INTERVAL_MS", Duration::from_secs(1)),
            reconnect_delay: millis_or(&lookup, "MONITOR_RECONNECT_DELAY_MS", Duration::from_secs(2)),
            trend_cap: parse_or(&lookup, "MONITOR_TREND_CAP", DEFAULT_TREND_CAP),
            static_dir: lookup("MONITOR_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("www")),
            log_level: log_level(&lookup),
        })
    }
}
