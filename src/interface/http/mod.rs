pub mod handlers;
pub mod routes;

pub use routes::{create_agent_router, create_monitor_router};
