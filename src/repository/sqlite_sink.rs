// ==========================================
// 配送/库存管理系统 - SQLite Sink 实现
// ==========================================
// 职责: 三类导入记录逐行落库, 返回行 ID
// 约束: 所有写入使用参数化语句
// ==========================================

use crate::db::{configure_sqlite_connection, init_schema, open_sqlite_connection};
use crate::domain::entities::{DocumentRecord, MaterialItem, WorkHourEntry};
use crate::domain::import::RecordId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_sink::RecordSink;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SqliteRecordSink {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordSink {
    /// 打开数据库并建表
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 (会再次应用统一 PRAGMA 并建表, 幂等)
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 统计表记录数
    pub fn count_rows(&self, table: &str) -> RepositoryResult<i64> {
        let table = match table {
            "work_hours" | "materials" | "documents" => table,
            other => {
                return Err(RepositoryError::FieldValueError {
                    field: "table".to_string(),
                    message: format!("unknown table: {}", other),
                })
            }
        };
        let conn = self.lock()?;
        let count = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

#[async_trait]
impl RecordSink<WorkHourEntry> for SqliteRecordSink {
    async fn persist(&self, entry: WorkHourEntry) -> RepositoryResult<RecordId> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO work_hours (
                employee_id, work_date, start_time, end_time, project_id,
                work_type, notes, hours_worked, regular_hours, overtime_hours
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                entry.employee_id,
                entry.date,
                entry.start_time,
                entry.end_time,
                entry.project_id,
                entry.work_type.as_str(),
                entry.notes,
                entry.hours_worked,
                entry.regular_hours,
                entry.overtime_hours,
            ],
        )?;
        Ok(RecordId::from(conn.last_insert_rowid()))
    }
}

#[async_trait]
impl RecordSink<MaterialItem> for SqliteRecordSink {
    async fn persist(&self, item: MaterialItem) -> RepositoryResult<RecordId> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO materials (
                name, category, unit, quantity, min_stock,
                supplier, unit_price, needs_restock, stock_value
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                item.name,
                item.category.as_str(),
                item.unit,
                item.quantity,
                item.min_stock,
                item.supplier,
                item.unit_price,
                item.needs_restock,
                item.stock_value,
            ],
        )?;
        Ok(RecordId::from(conn.last_insert_rowid()))
    }
}

#[async_trait]
impl RecordSink<DocumentRecord> for SqliteRecordSink {
    async fn persist(&self, doc: DocumentRecord) -> RepositoryResult<RecordId> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO documents (
                name, file_url, file_key, category, description, project_id, file_type
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                doc.name,
                doc.file_url,
                doc.file_key,
                doc.category.as_str(),
                doc.description,
                doc.project_id,
                doc.file_type,
            ],
        )?;
        Ok(RecordId::from(conn.last_insert_rowid()))
    }
}
