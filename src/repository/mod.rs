// ==========================================
// 配送/库存管理系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供单行落库接口, 屏蔽数据库细节
// 约束: 所有写入使用参数化, 防止 SQL 注入
// ==========================================

pub mod error;
pub mod record_sink;
pub mod sqlite_sink;

// 重导出核心类型
pub use error::{RepositoryError, RepositoryResult};
pub use record_sink::RecordSink;
pub use sqlite_sink::SqliteRecordSink;
