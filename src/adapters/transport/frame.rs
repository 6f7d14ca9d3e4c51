use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Event an agent pushes once per sampling tick
pub const MONITORING_STATS_EVENT: &str = "monitoring-stats";

/// Event the monitor pushes to dashboards once per broadcast tick
pub const HEARTBEAT_EVENT: &str = "heartbeat";

/// Named event as carried in one WebSocket text frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventFrame<T> {
    pub event: String,
    pub data: T,
}

impl<T: Serialize> EventFrame<T> {
    pub fn new(event: &str, data: T) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Decode the payload of `text` if it carries `event`; other events yield `None`
pub fn decode_event<T: DeserializeOwned>(text: &str, event: &str) -> Result<Option<T>, serde_json::Error> {
    let frame: EventFrame<serde_json::Value> = serde_json::from_str(text)?;
    if frame.event != event {
        return Ok(None);
    }
    serde_json::from_value(frame.data).map(Some)
}
