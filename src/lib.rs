// ==========================================
// 配送/库存管理系统 - 批量导入核心库
// ==========================================
// 技术栈: Rust + Tokio + SQLite
// 系统定位: 表格文件 → 工时/物料/文档记录 的批量导入管道
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 行记录/导入结果/目标实体
pub mod domain;

// 数据仓储层 - 单行落库
pub mod repository;

// 导入层 - 解析/校验/转换/分批执行
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施 (连接初始化/PRAGMA 统一/建表)
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    DocumentRecord, EntityKind, FieldValue, ImportPreview, ImportReport, MaterialItem, Record,
    RecordId, RowOutcome, WorkHourEntry,
};

// 导入管道
pub use importer::{
    BatchExecutor, BatchOptions, ImportError, ImportProfile, ImportResult, ImportService, Schema,
};

// 配置
pub use config::{ConfigManager, ImportConfigReader, ImportSettings};

// API
pub use api::{ApiError, ImportApi, ImportApiResponse};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "delivery-import";
