use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::domain::MetricSnapshot;
use crate::ports::{FeedError, MetricFeed, SnapshotStream};

use super::frame::{decode_event, MONITORING_STATS_EVENT};

/// Metric feed over the agent's `/ws` endpoint
#[derive(Debug, Clone, Default)]
pub struct WsMetricFeed;

impl WsMetricFeed {
    pub fn new() -> Self {
        Self
    }
}

/// Map an `http(s)://host:port` endpoint to the agent's WebSocket URL
pub fn websocket_url(endpoint: &str) -> String {
    let base = endpoint.trim_end_matches('/');
    let base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!("{}/ws", base)
}

fn decode_message(message: Result<Message, tokio_tungstenite::tungstenite::Error>) -> Option<Result<MetricSnapshot, FeedError>> {
    match message {
        Ok(Message::Text(text)) => match decode_event::<MetricSnapshot>(text.as_str(), MONITORING_STATS_EVENT) {
            Ok(Some(snapshot)) => Some(Ok(snapshot)),
            Ok(None) => None,
            Err(e) => Some(Err(FeedError::Decode(e))),
        },
        // pings are answered by tungstenite; close ends the stream
        Ok(_) => None,
        Err(e) => Some(Err(FeedError::Transport(e.to_string()))),
    }
}

#[async_trait]
impl MetricFeed for WsMetricFeed {
    async fn connect(&self, endpoint: &str) -> Result<SnapshotStream, FeedError> {
        let url = websocket_url(endpoint);
        let (socket, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| FeedError::Connect(format!("{}: {}", url, e)))?;

        let stream = socket.filter_map(|message| async move { decode_message(message) });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_url() {
        assert_eq!(websocket_url("http://localhost:5001"), "ws://localhost:5001/ws");
        assert_eq!(websocket_url("https://agent.internal:443/"), "wss://agent.internal:443/ws");
        assert_eq!(websocket_url("ws://10.0.0.2:5001"), "ws://10.0.0.2:5001/ws");
    }

    #[test]
    fn test_decode_message() {
        let text = r#"{"event":"monitoring-stats","data":{"memoryLoad":40.0,"cpuLoad":2.5}}"#;
        let decoded = decode_message(Ok(Message::text(text)));
        assert_eq!(decoded.unwrap().unwrap(), MetricSnapshot::new(40.0, 2.5));

        assert!(decode_message(Ok(Message::Ping(Default::default()))).is_none());
        assert!(matches!(
            decode_message(Ok(Message::text("{}"))),
            Some(Err(FeedError::Decode(_)))
        ));
    }
}
