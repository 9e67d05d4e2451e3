/// 负载均值收集器
///
/// 从本机 procfs 或远程 PostgreSQL（pgcenter 扩展）读取 1/5/15 分钟负载均值。
/// 所有失败都在本模块内吸收：字段保持调用前的值，只通过 debug 日志和
/// 失败计数器暴露出来。

use common::{Error, LoadAvg, LoadAvgFields, Result};
use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};
use sea_orm::{ConnectionTrait, DbBackend, FromQueryResult, Statement};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use super::source::SourceMode;

/// 本机负载均值文件
pub const PROC_LOADAVG_FILE: &str = "/proc/loadavg";

/// pgcenter 负载均值查询
pub const PG_PROC_LOADAVG_QUERY: &str = "SELECT min1, min5, min15 FROM pgcenter.sys_proc_loadavg";

#[derive(Debug, FromQueryResult)]
struct LoadAvgRow {
    min1: f64,
    min5: f64,
    min15: f64,
}

pub struct LoadAvgCollector {
    /// 本地数据源路径
    procfs_path: PathBuf,
    /// 指标注册表
    registry: Registry,
    /// 按数据源和错误类别统计的失败次数
    failures: IntCounterVec,
    /// 最近一次发布的负载均值
    load: GaugeVec,
}

impl LoadAvgCollector {
    /// 创建读取指定路径的收集器
    pub fn new(procfs_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let registry = Registry::new();

        let failures = IntCounterVec::new(
            Opts::new(
                "loadavg_source_failures_total",
                "Load average reads absorbed as failures, by source and kind",
            ),
            &["source", "kind"],
        )?;
        registry.register(Box::new(failures.clone()))?;

        let load = GaugeVec::new(
            Opts::new("loadavg", "Last published load average, by window in minutes"),
            &["window"],
        )?;
        registry.register(Box::new(load.clone()))?;

        Ok(Self {
            procfs_path: procfs_path.into(),
            registry,
            failures,
            load,
        })
    }

    /// 按模式标志读取负载均值
    ///
    /// 本地优先；非本地且远程可用时查询远程；否则不修改记录。
    pub async fn read<C: ConnectionTrait>(
        &self,
        la: &mut LoadAvg,
        conn: &C,
        is_local: bool,
        remote_available: bool,
    ) {
        self.read_mode(la, conn, SourceMode::select(is_local, remote_available))
            .await
    }

    /// 按已选定的数据源读取
    pub async fn read_mode<C: ConnectionTrait>(
        &self,
        la: &mut LoadAvg,
        conn: &C,
        mode: SourceMode,
    ) {
        match mode {
            SourceMode::Local => self.read_local(la).await,
            SourceMode::Remote => self.read_remote(la, conn).await,
            SourceMode::Unavailable => {
                debug!("没有可用的负载均值数据源，跳过采集");
                self.record_failure(mode, "no_source");
            }
        }
    }

    /// 从本地文件读取；失败时字段保持原值
    pub async fn read_local(&self, la: &mut LoadAvg) {
        let fields = match self.fetch_local().await {
            Ok(fields) => fields,
            Err(e) => {
                debug!("读取本地负载均值失败: {}", e);
                self.record_failure(SourceMode::Local, e.kind());
                return;
            }
        };

        if fields.missing() > 0 {
            debug!(
                "本地负载均值有 {} 个字段缺失或无法解析: {:?}",
                fields.missing(),
                fields.values
            );
            self.record_failure(SourceMode::Local, "local_format");
        }

        la.apply(&fields);
    }

    /// 读取本地文件的第一行并逐字段解析
    ///
    /// 只解码第一行，非 UTF-8 字节只影响其所在字段。
    pub async fn fetch_local(&self) -> Result<LoadAvgFields> {
        let content = fs::read(&self.procfs_path)
            .await
            .map_err(|e| Error::LocalSource(format!("{}: {}", self.procfs_path.display(), e)))?;

        if content.is_empty() {
            return Err(Error::LocalFormat(format!("{} is empty", self.procfs_path.display())));
        }

        let line = content.split(|b| *b == b'\n').next().unwrap_or_default();

        Ok(LoadAvgFields::parse(&String::from_utf8_lossy(line)))
    }

    /// 从远程连接读取；失败时字段保持原值
    ///
    /// 不检查 pgcenter 是否可用，由调用方负责。
    pub async fn read_remote<C: ConnectionTrait>(&self, la: &mut LoadAvg, conn: &C) {
        match self.fetch_remote(conn).await {
            Ok(remote) => *la = remote,
            Err(e) => {
                debug!("读取远程负载均值失败: {}", e);
                self.record_failure(SourceMode::Remote, e.kind());
            }
        }
    }

    /// 执行 pgcenter 查询，读取单行三列
    pub async fn fetch_remote<C: ConnectionTrait>(&self, conn: &C) -> Result<LoadAvg> {
        let row = LoadAvgRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            PG_PROC_LOADAVG_QUERY,
            vec![],
        ))
        .one(conn)
        .await
        .map_err(|e| Error::RemoteQuery(e.to_string()))?
        .ok_or_else(|| Error::RemoteQuery("no rows returned".to_string()))?;

        Ok(LoadAvg::new(row.min1, row.min5, row.min15))
    }

    /// 将记录写入 gauge
    pub fn publish(&self, la: &LoadAvg) {
        self.load.with_label_values(&["1"]).set(la.one);
        self.load.with_label_values(&["5"]).set(la.five);
        self.load.with_label_values(&["15"]).set(la.fifteen);
    }

    /// 以 Prometheus 文本格式导出所有指标
    pub fn encode_metrics(&self) -> anyhow::Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn record_failure(&self, mode: SourceMode, kind: &str) {
        self.failures.with_label_values(&[mode.as_str(), kind]).inc();
    }
}

#[cfg(test)]
impl LoadAvgCollector {
    /// 某数据源、某类错误的累计失败次数
    fn failure_count(&self, mode: SourceMode, kind: &str) -> u64 {
        self.failures.with_label_values(&[mode.as_str(), kind]).get()
    }
}
