/// 数据库访问层
///
/// 连接池的生命周期由 SeaORM 管理，收集器只借用连接执行单次查询

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use tracing::{debug, info};

/// 检查 pgcenter 负载均值视图是否存在
const PGCENTER_PROBE_QUERY: &str = "SELECT EXISTS (\
    SELECT 1 FROM information_schema.views \
    WHERE table_schema = 'pgcenter' AND table_name = 'sys_proc_loadavg'\
) AS available";

/// 建立数据库连接 (SeaORM)
pub async fn establish_connection(database_url: &str) -> Result<DatabaseConnection, anyhow::Error> {
    info!("正在连接数据库...");

    let db = Database::connect(database_url).await?;
    info!("数据库连接成功");

    Ok(db)
}

/// 探测远程是否安装了 pgcenter 扩展，任何错误都视为不可用
pub async fn probe_remote_schema<C: ConnectionTrait>(conn: &C) -> bool {
    #[derive(FromQueryResult)]
    struct Probe {
        available: bool,
    }

    let result = Probe::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        PGCENTER_PROBE_QUERY,
        vec![],
    ))
    .one(conn)
    .await;

    match result {
        Ok(Some(probe)) => probe.available,
        Ok(None) => false,
        Err(e) => {
            debug!("探测 pgcenter 失败: {}", e);
            false
        }
    }
}
