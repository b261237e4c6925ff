// ==========================================
// 配送/库存管理系统 - 配置管理器
// ==========================================
// 职责: 导入配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{config_keys, ImportConfigReader, ImportSettings};
use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::importer::error::{ImportError, ImportResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明: 会对传入连接再次应用统一 PRAGMA (幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ImportResult<Self> {
        {
            let guard = conn.lock().map_err(lock_error)?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值 (scope_id='global')
    pub fn get_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self.conn.lock().map_err(lock_error)?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入配置值 (UPSERT)
    pub fn set_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self.conn.lock().map_err(lock_error)?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取并解析配置值, 缺失时使用默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ImportResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|e| ImportError::ConfigError {
                key: key.to_string(),
                value: raw.clone(),
                message: e.to_string(),
            }),
        }
    }
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> ImportError {
    ImportError::DatabaseError(format!("lock poisoned: {}", e))
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_batch_size(&self) -> ImportResult<usize> {
        let default = ImportSettings::default().batch_size;
        let value = self.get_parsed_or_default(config_keys::BATCH_SIZE, default)?;
        if value == 0 {
            return Err(ImportError::ConfigError {
                key: config_keys::BATCH_SIZE.to_string(),
                value: value.to_string(),
                message: "batch size must be at least 1".to_string(),
            });
        }
        Ok(value)
    }

    async fn get_preview_rows(&self) -> ImportResult<usize> {
        self.get_parsed_or_default(
            config_keys::PREVIEW_ROWS,
            ImportSettings::default().preview_rows,
        )
    }

    async fn get_failure_preview_limit(&self) -> ImportResult<usize> {
        self.get_parsed_or_default(
            config_keys::FAILURE_PREVIEW_LIMIT,
            ImportSettings::default().failure_preview_limit,
        )
    }

    async fn get_standard_daily_hours(&self) -> ImportResult<f64> {
        let value = self.get_parsed_or_default(
            config_keys::STANDARD_DAILY_HOURS,
            ImportSettings::default().standard_daily_hours,
        )?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ImportError::ConfigError {
                key: config_keys::STANDARD_DAILY_HOURS.to_string(),
                value: value.to_string(),
                message: "standard daily hours must be positive".to_string(),
            });
        }
        Ok(value)
    }

    async fn get_row_timeout_ms(&self) -> ImportResult<u64> {
        self.get_parsed_or_default(
            config_keys::ROW_TIMEOUT_MS,
            ImportSettings::default().row_timeout_ms,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let config = memory_config();
        let settings = config.load_settings().await.unwrap();
        assert_eq!(settings, ImportSettings::default());
        assert_eq!(settings.row_timeout(), None);
    }

    #[tokio::test]
    async fn test_overrides_are_read() {
        let config = memory_config();
        config.set_config_value(config_keys::BATCH_SIZE, "25").unwrap();
        config.set_config_value(config_keys::ROW_TIMEOUT_MS, "1500").unwrap();

        let settings = config.load_settings().await.unwrap();
        assert_eq!(settings.batch_size, 25);
        assert_eq!(settings.row_timeout_ms, 1500);
    }

    #[tokio::test]
    async fn test_invalid_values_are_config_errors() {
        let config = memory_config();
        config.set_config_value(config_keys::BATCH_SIZE, "0").unwrap();
        assert!(matches!(
            config.get_batch_size().await,
            Err(ImportError::ConfigError { .. })
        ));

        config.set_config_value(config_keys::PREVIEW_ROWS, "five").unwrap();
        assert!(matches!(
            config.get_preview_rows().await,
            Err(ImportError::ConfigError { .. })
        ));
    }
}
