/// 数据源选择

use serde::Serialize;
use std::fmt;

/// 负载均值数据源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// 本机 procfs
    Local,
    /// 远程 PostgreSQL 上的 pgcenter 视图
    Remote,
    /// 无可用数据源，不做任何修改
    Unavailable,
}

impl SourceMode {
    /// 按优先级选择数据源：本地优先，其次远程，否则不可用
    pub fn select(is_local: bool, remote_available: bool) -> Self {
        if is_local {
            Self::Local
        } else if remote_available {
            Self::Remote
        } else {
            Self::Unavailable
        }
    }

    /// 指标标签
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::Unavailable => "none",
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_priority() {
        assert_eq!(SourceMode::select(true, true), SourceMode::Local);
        assert_eq!(SourceMode::select(true, false), SourceMode::Local);
        assert_eq!(SourceMode::select(false, true), SourceMode::Remote);
        assert_eq!(SourceMode::select(false, false), SourceMode::Unavailable);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(SourceMode::Local.to_string(), "local");
        assert_eq!(SourceMode::Remote.to_string(), "remote");
        assert_eq!(SourceMode::Unavailable.to_string(), "none");
    }
}
