//! Container resource agent and health-scoring monitor.
//!
//! The agent samples cgroup memory and CPU counters and pushes a
//! `monitoring-stats` event every tick. The monitor subscribes to every agent,
//! probes their liveness, scores each host and pushes a `heartbeat` with all
//! hosts to connected dashboards.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod interface;
pub mod logging;
pub mod ports;
