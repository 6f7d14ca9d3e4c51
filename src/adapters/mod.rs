pub mod cgroup;
pub mod probe;
pub mod transport;

pub use cgroup::{CgroupConfig, CgroupReader, CgroupVersion};
pub use probe::HttpProber;
pub use transport::WsMetricFeed;
