// ==========================================
// 配送/库存管理系统 - 实体导入规则
// ==========================================
// 职责: 三类实体的字段契约 + 领域派生
// 说明: 通用管道 (校验/转换/分批) 不感知这里的任何实体细节
// ==========================================

pub mod documents;
pub mod materials;
pub mod work_hours;

pub use documents::DocumentsProfile;
pub use materials::MaterialsProfile;
pub use work_hours::WorkHoursProfile;

use crate::domain::record::Record;

// ==========================================
// 取值辅助 (build_entity 共用)
// ==========================================

/// 可选文本字段 (空值 → None)
pub(crate) fn text_field(record: &Record, name: &str) -> Option<String> {
    record
        .present(name)
        .and_then(|v| v.to_text())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 必填文本字段
pub(crate) fn required_text(record: &Record, name: &str) -> Result<String, String> {
    text_field(record, name).ok_or_else(|| format!("Missing required field: {}", name))
}

/// 可选数值字段 (有值但非数值 → Err)
pub(crate) fn number_field(record: &Record, name: &str) -> Result<Option<f64>, String> {
    match record.present(name) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("Field {} must be a number", name)),
    }
}

/// 可选整数字段 (小数 → Err)
pub(crate) fn integer_field(record: &Record, name: &str) -> Result<Option<i64>, String> {
    match record.present(name) {
        None => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| format!("Field {} must be an integer", name)),
    }
}

/// 保留两位小数
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
