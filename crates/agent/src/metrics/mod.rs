/// 负载均值采集

pub mod collector;
pub mod source;

pub use collector::{LoadAvgCollector, PROC_LOADAVG_FILE};
pub use source::SourceMode;
