/// Loadavg Collector - 公共库
///
/// 提供负载均值记录、统一错误类型等共享定义

pub mod errors;
pub mod models;

// 重新导出常用类型
pub use errors::{Error, Result};
pub use models::{LoadAvg, LoadAvgFields};
