// ==========================================
// 酒类库存销售分析 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope, 仅使用 'global')
// ==========================================

use crate::config::analytics_config_trait::AnalyticsConfigReader;
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::engine::analytics::{DEFAULT_CHART_LABEL_MAX_CHARS, DEFAULT_LEADERBOARD_SIZE};
use crate::engine::overstock::DEFAULT_OVERSTOCK_MULTIPLIER;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA 并建表（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT），写入前校验
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        validate_config_value(key, value)?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// 读取并解析配置，缺失或非法时回退默认值
    fn get_parsed_or_default<T, F>(&self, key: &str, default: T, is_valid: F) -> RepositoryResult<T>
    where
        T: std::str::FromStr + Copy,
        F: Fn(&T) -> bool,
    {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(v) if is_valid(&v) => Ok(v),
            _ => {
                warn!(config_key = key, raw_value = %raw, "配置值非法，使用默认值");
                Ok(default)
            }
        }
    }
}

/// 积压倍数需为有限正数
pub fn is_valid_multiplier(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// 校验配置写入值
fn validate_config_value(key: &str, value: &str) -> RepositoryResult<()> {
    let invalid = |message: &str| RepositoryError::FieldValueError {
        field: key.to_string(),
        message: message.to_string(),
    };

    match key {
        config_keys::OVERSTOCK_MULTIPLIER => {
            let v: f64 = value
                .trim()
                .parse()
                .map_err(|_| invalid("必须为数值"))?;
            if !is_valid_multiplier(v) {
                return Err(invalid("必须为大于 0 的有限数值"));
            }
        }
        config_keys::LEADERBOARD_SIZE | config_keys::CHART_LABEL_MAX_CHARS => {
            let v: usize = value
                .trim()
                .parse()
                .map_err(|_| invalid("必须为正整数"))?;
            if v == 0 {
                return Err(invalid("必须为正整数"));
            }
        }
        _ => return Err(invalid("未知配置项")),
    }
    Ok(())
}

// ==========================================
// AnalyticsConfigReader Trait 实现
// ==========================================
#[async_trait]
impl AnalyticsConfigReader for ConfigManager {
    async fn get_overstock_multiplier(&self) -> RepositoryResult<f64> {
        self.get_parsed_or_default(
            config_keys::OVERSTOCK_MULTIPLIER,
            DEFAULT_OVERSTOCK_MULTIPLIER,
            |v| is_valid_multiplier(*v),
        )
    }

    async fn get_leaderboard_size(&self) -> RepositoryResult<usize> {
        self.get_parsed_or_default(
            config_keys::LEADERBOARD_SIZE,
            DEFAULT_LEADERBOARD_SIZE,
            |v| *v > 0,
        )
    }

    async fn get_chart_label_max_chars(&self) -> RepositoryResult<usize> {
        self.get_parsed_or_default(
            config_keys::CHART_LABEL_MAX_CHARS,
            DEFAULT_CHART_LABEL_MAX_CHARS,
            |v| *v > 0,
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const OVERSTOCK_MULTIPLIER: &str = "overstock_multiplier";
    pub const LEADERBOARD_SIZE: &str = "leaderboard_size";
    pub const CHART_LABEL_MAX_CHARS: &str = "chart_label_max_chars";
}
