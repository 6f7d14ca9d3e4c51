use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::application::{DashboardBroadcaster, SnapshotHub};

use super::handlers::{
    agent_root_handler, agent_ws_handler, dashboard_ws_handler, health_handler, servers_handler,
    stats_handler, AgentState, MonitorState,
};

pub fn create_agent_router(hub: SnapshotHub) -> Router {
    let state = AgentState { hub };

    Router::new()
        .route("/", get(agent_root_handler))
        .route("/api/health", get(health_handler))
        .route("/api/stats", get(stats_handler))
        .route("/ws", get(agent_ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub fn create_monitor_router(broadcaster: Arc<DashboardBroadcaster>, static_dir: &Path) -> Router {
    let state = MonitorState { broadcaster };

    Router::new()
        // API routes
        .route("/api/health", get(health_handler))
        .route("/api/servers", get(servers_handler))
        .route("/ws", get(dashboard_ws_handler))
        // Dashboard front-end
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
