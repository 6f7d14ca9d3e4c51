use std::sync::Arc;

use tracing::info;

use pulsemon::adapters::{HttpProber, WsMetricFeed};
use pulsemon::application::{AgentSubscriber, DashboardBroadcaster, HostRegistry, LivenessProber};
use pulsemon::config::MonitorConfig;
use pulsemon::interface::http::create_monitor_router;
use pulsemon::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = MonitorConfig::from_env()?;

    // Initialize logging
    logging::init(&config.log_level);

    info!("🚀 Starting pulsemon monitor v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    let registry = Arc::new(HostRegistry::from_config(&config.hosts, config.trend_cap));
    for host in &config.hosts {
        info!("  → {} at {}:{}", host.name, host.url, host.port);
    }

    // Agent subscriptions
    let subscriber = AgentSubscriber::new(
        Arc::clone(&registry),
        Arc::new(WsMetricFeed::new()),
        config.reconnect_delay,
    );
    Arc::new(subscriber).spawn_all();

    // Liveness probes
    let prober = LivenessProber::new(
        Arc::clone(&registry),
        Arc::new(HttpProber::new(config.probe_timeout)?),
        config.probe_interval,
    );
    Arc::new(prober).spawn_all();

    info!("✓ Watching {} hosts", registry.len());

    // Create HTTP server
    let broadcaster = Arc::new(DashboardBroadcaster::new(registry, config.heartbeat_interval));
    let app = create_monitor_router(broadcaster, &config.static_dir);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ Monitor listening on {}", addr);
    info!("  → Dashboard: http://localhost:{}", config.port);
    info!("  → API: http://localhost:{}/api/servers", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
