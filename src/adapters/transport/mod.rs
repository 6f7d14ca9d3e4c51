pub mod frame;
mod ws_feed;

pub use frame::{decode_event, EventFrame, HEARTBEAT_EVENT, MONITORING_STATS_EVENT};
pub use ws_feed::{websocket_url, WsMetricFeed};
