/// 错误处理

use thiserror::Error;

/// 统一错误类型
#[derive(Error, Debug)]
pub enum Error {
    #[error("本地数据源不可用: {0}")]
    LocalSource(String),

    #[error("本地数据格式错误: {0}")]
    LocalFormat(String),

    #[error("远程查询失败: {0}")]
    RemoteQuery(String),

    #[error("配置错误: {0}")]
    Config(String),
}

impl Error {
    /// 错误类别标签，用于指标和日志
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LocalSource(_) => "local_source",
            Self::LocalFormat(_) => "local_format",
            Self::RemoteQuery(_) => "remote_query",
            Self::Config(_) => "config",
        }
    }
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, Error>;
