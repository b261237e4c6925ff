// ==========================================
// 配送/库存管理系统 - 导入目标实体
// ==========================================
// 职责: 通过校验 + 转换后的领域记录 (交给 Sink 落库)
// ==========================================

use crate::domain::types::{DocumentCategory, MaterialCategory, WorkType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// 工时记录 (work_hours)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkHourEntry {
    pub employee_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    pub project_id: Option<i64>,
    pub work_type: WorkType,
    pub notes: Option<String>,

    // 派生字段 (end_time 缺失时为空)
    pub hours_worked: Option<f64>,
    pub regular_hours: Option<f64>,
    pub overtime_hours: Option<f64>,
}

// ==========================================
// 库存物料 (materials)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    pub name: String,
    pub category: MaterialCategory,
    pub unit: String,
    pub quantity: f64,
    pub min_stock: f64,
    pub supplier: Option<String>,
    pub unit_price: Option<f64>,

    // 派生字段
    pub needs_restock: bool,
    pub stock_value: Option<f64>,
}

// ==========================================
// 文档元数据 (documents)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub name: String,
    pub file_url: String,
    pub file_key: String,
    pub category: DocumentCategory,
    pub description: Option<String>,
    pub project_id: Option<i64>,

    // 派生字段 (由 file_key 扩展名得到)
    pub file_type: Option<String>,
}
