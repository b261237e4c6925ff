// ==========================================
// 配送/库存管理系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口 (不包含实现)
// 红线: 不包含配置写入, 不包含业务逻辑
// ==========================================

use crate::domain::import::DEFAULT_FAILURE_PREVIEW_LIMIT;
use crate::importer::batch_executor::DEFAULT_BATCH_SIZE;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const BATCH_SIZE: &str = "import_batch_size";
    pub const PREVIEW_ROWS: &str = "import_preview_rows";
    pub const FAILURE_PREVIEW_LIMIT: &str = "import_failure_preview_limit";
    pub const STANDARD_DAILY_HOURS: &str = "import_standard_daily_hours";
    pub const ROW_TIMEOUT_MS: &str = "import_row_timeout_ms";
}

// ==========================================
// ImportSettings - 一次导入使用的配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSettings {
    /// 批大小 (批内并发上限)
    pub batch_size: usize,
    /// 预览行数
    pub preview_rows: usize,
    /// 报告中失败明细上限
    pub failure_preview_limit: usize,
    /// 标准日工时 (超出部分计为加班)
    pub standard_daily_hours: f64,
    /// 单行超时 (0 = 不限)
    pub row_timeout_ms: u64,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            preview_rows: 5,
            failure_preview_limit: DEFAULT_FAILURE_PREVIEW_LIMIT,
            standard_daily_hours: 8.0,
            row_timeout_ms: 0,
        }
    }
}

impl ImportSettings {
    pub fn row_timeout(&self) -> Option<Duration> {
        if self.row_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.row_timeout_ms))
        }
    }
}

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入管道所需的配置读取接口
// 实现者: ConfigManager (从 config_kv 表读取)
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取批大小
    ///
    /// # 默认值
    /// - DEFAULT_BATCH_SIZE (100; 0 视为配置错误)
    async fn get_batch_size(&self) -> ImportResult<usize>;

    /// 获取预览行数
    ///
    /// # 默认值
    /// - 5
    async fn get_preview_rows(&self) -> ImportResult<usize>;

    /// 获取报告失败明细上限
    ///
    /// # 默认值
    /// - DEFAULT_FAILURE_PREVIEW_LIMIT (10)
    async fn get_failure_preview_limit(&self) -> ImportResult<usize>;

    /// 获取标准日工时
    ///
    /// # 默认值
    /// - 8.0
    async fn get_standard_daily_hours(&self) -> ImportResult<f64>;

    /// 获取单行超时 (毫秒)
    ///
    /// # 默认值
    /// - 0 (不限)
    async fn get_row_timeout_ms(&self) -> ImportResult<u64>;

    /// 读取完整配置快照
    async fn load_settings(&self) -> ImportResult<ImportSettings> {
        Ok(ImportSettings {
            batch_size: self.get_batch_size().await?,
            preview_rows: self.get_preview_rows().await?,
            failure_preview_limit: self.get_failure_preview_limit().await?,
            standard_daily_hours: self.get_standard_daily_hours().await?,
            row_timeout_ms: self.get_row_timeout_ms().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_pipeline_constants() {
        let settings = ImportSettings::default();
        assert_eq!(settings.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(settings.failure_preview_limit, DEFAULT_FAILURE_PREVIEW_LIMIT);
        assert_eq!(settings.row_timeout(), None);
    }
}
