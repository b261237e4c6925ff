// ==========================================
// 配送/库存管理系统 - 领域层
// ==========================================
// 职责: 行记录模型 / 导入结果 / 目标实体 / 类型枚举
// ==========================================

pub mod entities;
pub mod import;
pub mod record;
pub mod types;

pub use entities::{DocumentRecord, MaterialItem, WorkHourEntry};
pub use import::{
    external_row_number, ImportPreview, ImportReport, RecordId, RowFailure, RowOutcome,
    RowValidation, ValidationResult, DEFAULT_FAILURE_PREVIEW_LIMIT, HEADER_ROW_OFFSET,
};
pub use record::{FieldValue, Record};
pub use types::{
    CoerceOrDefault, DocumentCategory, EntityKind, FileFormat, MaterialCategory, WorkType,
};
