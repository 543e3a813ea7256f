// ==========================================
// 酒类库存销售分析 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享资源和 API 实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{AnalyticsApi, ExportApi, ImportApi};
use crate::config::{AnalyticsConfigReader, ConfigManager};
use crate::db::{ensure_schema, open_sqlite_connection, read_schema_version};
use crate::repository::{
    InMemoryProductRepository, ProductRepository, RepositoryResult, SqliteProductRepository,
};
use rusqlite::Connection;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "LIQUOR_STOCK_ANALYTICS_DB_PATH";

/// 应用状态
///
/// 上传与查询共享同一个仓储实例
pub struct AppState {
    /// 数据库路径（内存模式为 ":memory:"）
    pub db_path: String,

    pub config: Arc<ConfigManager>,

    pub import_api: Arc<ImportApi>,

    pub analytics_api: Arc<AnalyticsApi>,

    pub export_api: Arc<ExportApi>,
}

impl AppState {
    /// 基于 SQLite 文件创建应用状态
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path)?;
        ensure_schema(&conn)?;
        let schema_version = read_schema_version(&conn)?;
        tracing::info!(schema_version = ?schema_version, "数据库 schema 就绪");
        let conn = Arc::new(Mutex::new(conn));

        let repo: Arc<dyn ProductRepository> =
            Arc::new(SqliteProductRepository::from_connection(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn)?);

        Ok(Self::assemble(db_path, repo, config))
    }

    /// 内存模式：批次保存在进程内快照，配置使用内存 SQLite
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        let config = Arc::new(ConfigManager::from_connection(Arc::new(Mutex::new(conn)))?);
        let repo: Arc<dyn ProductRepository> = Arc::new(InMemoryProductRepository::new());

        Ok(Self::assemble(":memory:".to_string(), repo, config))
    }

    fn assemble(
        db_path: String,
        repo: Arc<dyn ProductRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        let config_reader: Arc<dyn AnalyticsConfigReader> = config.clone();

        Self {
            db_path,
            import_api: Arc::new(ImportApi::new(repo.clone())),
            analytics_api: Arc::new(AnalyticsApi::new(repo.clone(), config_reader)),
            export_api: Arc::new(ExportApi::new(repo)),
            config,
        }
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./analytics.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("liquor-stock-analytics");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("analytics.db");
        }
    }

    path.to_string_lossy().to_string()
}
