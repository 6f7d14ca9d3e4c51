use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::adapters::transport::{EventFrame, HEARTBEAT_EVENT, MONITORING_STATS_EVENT};
use crate::application::{BroadcastSubscription, DashboardBroadcaster, SnapshotHub};
use crate::domain::MetricSnapshot;

/// Shared agent state
#[derive(Clone)]
pub struct AgentState {
    pub hub: SnapshotHub,
}

/// Shared monitor state
#[derive(Clone)]
pub struct MonitorState {
    pub broadcaster: Arc<DashboardBroadcaster>,
}

/// Handler for GET /api/health
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "pulsemon",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Handler for GET / on the agent, the target of liveness probes
pub async fn agent_root_handler() -> &'static str {
    "pulsemon agent"
}

/// Handler for GET /api/stats
pub async fn stats_handler(State(state): State<AgentState>) -> Response {
    match state.hub.latest() {
        Some(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "error": "no sample taken yet" })),
        )
            .into_response(),
    }
}

/// Handler for GET /ws on the agent: pushes `monitoring-stats` every tick
pub async fn agent_ws_handler(ws: WebSocketUpgrade, State(state): State<AgentState>) -> Response {
    ws.on_upgrade(move |socket| push_stats(socket, state.hub.subscribe()))
}

/// Returns false once the peer is gone
async fn send_event<T: serde::Serialize>(socket: &mut WebSocket, event: &str, data: T) -> bool {
    let text = match EventFrame::new(event, data).encode() {
        Ok(text) => text,
        Err(e) => {
            warn!("Failed to encode {}: {}", event, e);
            return true;
        }
    };
    socket.send(Message::Text(text.into())).await.is_ok()
}

/// True if an inbound frame ends the session
fn is_disconnect(incoming: Option<Result<Message, axum::Error>>) -> bool {
    matches!(incoming, None | Some(Err(_)) | Some(Ok(Message::Close(_))))
}

async fn push_stats(mut socket: WebSocket, mut stats: broadcast::Receiver<MetricSnapshot>) {
    info!("Agent connected to monitor");

    loop {
        tokio::select! {
            received = stats.recv() => match received {
                Ok(snapshot) => {
                    if !send_event(&mut socket, MONITORING_STATS_EVENT, snapshot).await {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    debug!("Monitor lagging, skipped {} samples", skipped);
                }
                Err(RecvError::Closed) => break,
            },
            incoming = socket.recv() => {
                if is_disconnect(incoming) {
                    break;
                }
            }
        }
    }

    info!("Monitor disconnected");
}

/// Handler for GET /api/servers
pub async fn servers_handler(State(state): State<MonitorState>) -> impl IntoResponse {
    Json(state.broadcaster.heartbeat())
}

/// Handler for GET /ws on the monitor: pushes `heartbeat` to one dashboard
pub async fn dashboard_ws_handler(ws: WebSocketUpgrade, State(state): State<MonitorState>) -> Response {
    ws.on_upgrade(move |socket| async move {
        let subscription = state.broadcaster.subscribe();
        info!(
            "Monitoring dashboard connected ({} active)",
            state.broadcaster.active_clients()
        );
        push_heartbeats(socket, subscription).await;
        info!("Monitoring dashboard disconnected");
    })
}

async fn push_heartbeats(mut socket: WebSocket, mut subscription: BroadcastSubscription) {
    loop {
        tokio::select! {
            heartbeat = subscription.next() => match heartbeat {
                Some(heartbeat) => {
                    if !send_event(&mut socket, HEARTBEAT_EVENT, heartbeat).await {
                        break;
                    }
                }
                None => break,
            },
            incoming = socket.recv() => {
                if is_disconnect(incoming) {
                    break;
                }
            }
        }
    }

    subscription.cancel();
}
