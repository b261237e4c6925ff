// ==========================================
// 配送/库存管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 将导入层/仓储层错误转换为调用方可读的错误
// 说明: 行级错误不经过这里, 它们在 ImportReport 中
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported file format: .{0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    // ==========================================
    // 导入错误 (整个导入中止)
    // ==========================================
    #[error("Import failed: {0}")]
    ImportError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Database connection failed: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("file {}", path)),
            ImportError::UnsupportedFormat(ext) => ApiError::UnsupportedFormat(ext),
            ImportError::ConfigError { .. } => ApiError::ConfigError(err.to_string()),
            ImportError::DatabaseError(msg) => ApiError::DatabaseError(msg),
            ImportError::Other(e) => ApiError::Other(e),
            other @ (ImportError::EmptyInput(_)
            | ImportError::SheetNotFound(_)
            | ImportError::FileReadError(_)
            | ImportError::ExcelParseError(_)
            | ImportError::CsvParseError(_)) => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("lock poisoned: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("{}: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_keeps_extension() {
        let err: ApiError = ImportError::UnsupportedFormat("txt".to_string()).into();
        assert!(matches!(err, ApiError::UnsupportedFormat(ref ext) if ext == "txt"));
        assert!(err.to_string().contains(".txt"));
    }

    #[test]
    fn test_source_errors_become_import_errors() {
        let err: ApiError = ImportError::EmptyInput("empty.csv".to_string()).into();
        assert!(matches!(err, ApiError::ImportError(_)));
    }
}
