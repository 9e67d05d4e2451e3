/// Loadavg Agent
///
/// 单次采集负载均值：本机读取 /proc/loadavg，或通过 pgcenter 扩展查询远程 PostgreSQL

use common::LoadAvg;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{debug, info};

mod config;
mod db;
mod metrics;

use config::OutputFormat;
use metrics::{LoadAvgCollector, SourceMode};

/// JSON 输出
#[derive(Debug, Serialize)]
struct Report {
    source: SourceMode,
    #[serde(flatten)]
    load: LoadAvg,
    timestamp: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置
    dotenvy::dotenv().ok();
    let cfg = config::Config::from_env()?;

    // 初始化日志
    // RUST_LOG 优先，其次 LOG_LEVEL，例如：
    // RUST_LOG=loadavg_agent=debug cargo run
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level))
        )
        .init();

    info!("🚀 启动 Loadavg Agent...");

    let collector = LoadAvgCollector::new(&cfg.proc_loadavg_path)?;

    // 没有配置远程数据库时使用未连接的句柄，本地模式不会使用它
    let conn = match &cfg.database_url {
        Some(url) => db::establish_connection(url).await?,
        None => DatabaseConnection::Disconnected,
    };

    let remote_available = if !cfg.is_local && cfg.database_url.is_some() {
        let available = db::probe_remote_schema(&conn).await;
        info!("🔍 pgcenter 可用: {}", available);
        available
    } else {
        false
    };

    let mode = SourceMode::select(cfg.is_local, remote_available);
    info!("📊 数据源: {}", mode);

    let mut la = LoadAvg::default();
    collector.read(&mut la, &conn, cfg.is_local, remote_available).await;
    debug!("采集结果: {:?}", la);

    match cfg.output {
        OutputFormat::Text => println!("{}", la),
        OutputFormat::Json => {
            let report = Report {
                source: mode,
                load: la,
                timestamp: chrono::Utc::now().timestamp(),
            };
            println!("{}", serde_json::to_string(&report)?);
        }
        OutputFormat::Prometheus => {
            collector.publish(&la);
            print!("{}", collector.encode_metrics()?);
        }
    }

    Ok(())
}
