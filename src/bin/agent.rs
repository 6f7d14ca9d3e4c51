use std::sync::Arc;

use tracing::{info, warn};

use pulsemon::adapters::{CgroupConfig, CgroupReader};
use pulsemon::application::{AgentSampler, LoadEstimator, SnapshotHub};
use pulsemon::config::AgentConfig;
use pulsemon::interface::http::create_agent_router;
use pulsemon::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = AgentConfig::from_env();

    // Initialize logging
    logging::init(&config.log_level);

    info!("🚀 Starting pulsemon agent v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    // Initialize the cgroup reader
    let reader = CgroupReader::new(CgroupConfig::new(
        config.cgroup_path.clone(),
        config.proc_path.clone(),
    ));
    match reader.detect_version().await {
        Some(version) => info!("✓ Reading {} under {}", version, config.cgroup_path.display()),
        None => warn!(
            "⚠ No cgroup interface under {}. Loads will be reported as -1.",
            config.cgroup_path.display()
        ),
    }

    // Start sampling
    let hub = SnapshotHub::new(16);
    AgentSampler::new(LoadEstimator::new(Arc::new(reader)), hub.clone(), config.sample_interval).spawn();

    info!("✓ Sampling every {:?}", config.sample_interval);

    // Create HTTP server
    let app = create_agent_router(hub);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ Agent listening on {}", addr);
    info!("  → Stats stream: ws://localhost:{}/ws", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
