// ==========================================
// 配送/库存管理系统 - 导入层
// ==========================================
// 职责: 外部文件批量导入为领域记录
// 支持: CSV, Excel (.xlsx / .xls)
// 流程: 解析 → 校验 → 转换 → 分批落库 → 报告
// ==========================================

// 模块声明
pub mod batch_executor;
pub mod error;
pub mod file_parser;
pub mod import_profile;
pub mod import_service;
pub mod importer_trait;
pub mod profiles;
pub mod row_transformer;
pub mod schema_validator;
pub mod transforms;

// 重导出核心类型
pub use batch_executor::{
    BatchExecutor, BatchOptions, BatchOutcome, ErrorCallback, ProgressCallback, DEFAULT_BATCH_SIZE,
};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, ParsedFile, UniversalFileParser};
pub use import_profile::ImportProfile;
pub use import_service::{CommitOutcome, ImportService};
pub use profiles::{DocumentsProfile, MaterialsProfile, WorkHoursProfile};
pub use row_transformer::transform;
pub use schema_validator::{validate, FieldSpec, FieldType, Schema};

// 重导出 Trait 接口
pub use importer_trait::{EntityProfile, FileParser};
