/// 配置管理

use common::Error;
use std::path::PathBuf;
use std::str::FromStr;

use crate::metrics::PROC_LOADAVG_FILE;

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Prometheus,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "prometheus" => Ok(Self::Prometheus),
            other => Err(Error::Config(format!("unknown OUTPUT format: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub is_local: bool,
    pub proc_loadavg_path: PathBuf,
    pub output: OutputFormat,
    pub log_level: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        // 未配置远程数据库时默认采集本机
        let is_local = match lookup("LOADAVG_LOCAL") {
            Some(v) => v
                .parse()
                .map_err(|_| Error::Config(format!("LOADAVG_LOCAL must be true or false, got {}", v)))?,
            None => database_url.is_none(),
        };

        let proc_loadavg_path = lookup("PROC_LOADAVG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(PROC_LOADAVG_FILE));

        let output = lookup("OUTPUT")
            .unwrap_or_else(|| "text".to_string())
            .parse()?;

        let log_level = lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string());

        Ok(Self {
            database_url,
            is_local,
            proc_loadavg_path,
            output,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = load(&[]).unwrap();
        assert!(cfg.database_url.is_none());
        assert!(cfg.is_local);
        assert_eq!(cfg.proc_loadavg_path, PathBuf::from("/proc/loadavg"));
        assert_eq!(cfg.output, OutputFormat::Text);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn test_remote_defaults_to_not_local() {
        let cfg = load(&[("DATABASE_URL", "postgres://postgres@db/postgres")]).unwrap();
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://postgres@db/postgres"));
        assert!(!cfg.is_local);

        let cfg = load(&[
            ("DATABASE_URL", "postgres://postgres@db/postgres"),
            ("LOADAVG_LOCAL", "true"),
        ])
        .unwrap();
        assert!(cfg.is_local);
    }

    #[test]
    fn test_blank_database_url() {
        let cfg = load(&[("DATABASE_URL", "  ")]).unwrap();
        assert!(cfg.database_url.is_none());
        assert!(cfg.is_local);
    }

    #[test]
    fn test_overrides() {
        let cfg = load(&[
            ("PROC_LOADAVG_PATH", "/tmp/loadavg"),
            ("OUTPUT", "JSON"),
            ("LOG_LEVEL", "debug"),
        ])
        .unwrap();
        assert_eq!(cfg.proc_loadavg_path, PathBuf::from("/tmp/loadavg"));
        assert_eq!(cfg.output, OutputFormat::Json);
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("LOADAVG_LOCAL", "yes")]).is_err());
        assert!(load(&[("OUTPUT", "xml")]).is_err());
    }
}
