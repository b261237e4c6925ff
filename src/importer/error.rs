// ==========================================
// 配送/库存管理系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 范围: 仅源级错误 (整个导入中止); 行级问题进入 ImportReport
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: .{0} (expected .csv, .xlsx or .xls)")]
    UnsupportedFormat(String),

    #[error("File contains no data rows: {0}")]
    EmptyInput(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("File read failed: {0}")]
    FileReadError(String),

    #[error("Spreadsheet parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== 配置错误 =====
    #[error("Invalid import setting (key: {key}, value: {value}): {message}")]
    ConfigError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 数据库错误 =====
    #[error("Database error: {0}")]
    DatabaseError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
