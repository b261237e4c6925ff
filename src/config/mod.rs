// ==========================================
// 配送/库存管理系统 - 配置层
// ==========================================
// 职责: 导入配置读取 (config_kv 表 + 默认值)
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

pub use config_manager::ConfigManager;
pub use import_config_trait::{config_keys, ImportConfigReader, ImportSettings};
