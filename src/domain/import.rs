// ==========================================
// 配送/库存管理系统 - 导入结果模型
// ==========================================
// 职责: 校验结果 / 行结果 / 导入报告 / 预览结果
// ==========================================

use crate::domain::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 外部行号偏移: 0 基索引 + 1 (转 1 基) + 1 (表头行)
pub const HEADER_ROW_OFFSET: usize = 2;

/// 报告中失败明细的默认上限 (计数不截断)
pub const DEFAULT_FAILURE_PREVIEW_LIMIT: usize = 10;

/// 0 基行索引 → 用户可见的文件行号
///
/// 索引是解析后数据行的序号: 解析阶段跳过的空白行不占号,
/// 源文件中位于空白行之后的行, 其实际行号会大于这里的结果
pub fn external_row_number(index: usize) -> usize {
    index + HEADER_ROW_OFFSET
}

// ==========================================
// ValidationResult - 单行校验结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// 所有违规合并为一条原因
    pub fn reason(&self) -> String {
        self.errors.join("; ")
    }
}

// ==========================================
// RecordId - Sink 返回的不透明标识
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value.to_string())
    }
}

// ==========================================
// RowOutcome - 每行恰好产生一个
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RowOutcome {
    Success { index: usize, produced_id: RecordId },
    Failure { index: usize, reason: String },
}

impl RowOutcome {
    pub fn index(&self) -> usize {
        match self {
            RowOutcome::Success { index, .. } | RowOutcome::Failure { index, .. } => *index,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RowOutcome::Success { .. })
    }
}

/// 报告中的失败行 (外部行号)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    pub row_index: usize,
    pub error: String,
}

// ==========================================
// ImportReport - 返回调用方的唯一对象
// ==========================================
// 不变量: imported + failed == total
// errors 列表可截断, 计数不截断; errors 中的 row_index 为外部行号
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub success: bool,
    pub imported: usize,
    pub failed: usize,
    pub total: usize,
    pub errors: Vec<RowFailure>,
    pub message: String,
}

impl ImportReport {
    /// 折叠每行结果 (每行恰好一个 RowOutcome)
    ///
    /// # 参数
    /// - outcomes: 全部行结果, 任意顺序
    /// - preview_limit: errors 列表上限
    ///
    /// # 规则
    /// - total = outcomes 数量; imported / failed 按结果计数, 不受上限影响
    /// - errors 按原始行索引升序, 行号转为外部行号
    pub fn from_outcomes(outcomes: &[RowOutcome], preview_limit: usize) -> Self {
        let total = outcomes.len();
        let imported = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = total - imported;

        let mut failures: Vec<&RowOutcome> = outcomes.iter().filter(|o| !o.is_success()).collect();
        failures.sort_by_key(|o| o.index());
        let errors = failures
            .into_iter()
            .take(preview_limit)
            .filter_map(|o| match o {
                RowOutcome::Failure { index, reason } => Some(RowFailure {
                    row_index: external_row_number(*index),
                    error: reason.clone(),
                }),
                RowOutcome::Success { .. } => None,
            })
            .collect();

        let message = if failed == 0 {
            format!("Successfully imported {} of {} rows", imported, total)
        } else {
            format!(
                "Imported {} of {} rows, {} failed",
                imported, total, failed
            )
        };

        Self {
            success: imported > 0 || failed == 0,
            imported,
            failed,
            total,
            errors,
            message,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.imported + self.failed == self.total
    }
}

// ==========================================
// ImportPreview - 预览 (不调用 Sink)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowValidation {
    /// 外部行号
    pub row_index: usize,
    pub valid: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    pub file_name: String,
    pub total_rows: usize,
    pub columns: Vec<String>,
    pub sample_rows: Vec<Record>,
    pub validation: Vec<RowValidation>,
    pub estimated_records: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 生成 total 行结果, failed_at 中的索引为失败
    fn outcomes(total: usize, failed_at: &[usize]) -> Vec<RowOutcome> {
        (0..total)
            .map(|index| {
                if failed_at.contains(&index) {
                    RowOutcome::Failure {
                        index,
                        reason: format!("bad row {}", index),
                    }
                } else {
                    RowOutcome::Success {
                        index,
                        produced_id: RecordId::from(index as i64),
                    }
                }
            })
            .collect()
    }

    #[test]
    fn test_report_truncates_list_not_counts() {
        let failed_at: Vec<usize> = (0..25).collect();
        let report = ImportReport::from_outcomes(&outcomes(40, &failed_at), 10);

        assert_eq!(report.failed, 25);
        assert_eq!(report.imported, 15);
        assert_eq!(report.errors.len(), 10);
        assert!(report.is_consistent());
    }

    #[test]
    fn test_report_uses_external_row_numbers() {
        let report = ImportReport::from_outcomes(&outcomes(3, &[1]), 10);
        assert_eq!(report.errors[0].row_index, 3);
        assert_eq!(report.errors[0].error, "bad row 1");
        assert_eq!(report.message, "Imported 2 of 3 rows, 1 failed");
    }

    #[test]
    fn test_report_orders_failures_regardless_of_completion_order() {
        let mut settled = outcomes(6, &[4, 1]);
        settled.reverse();

        let report = ImportReport::from_outcomes(&settled, 10);
        let rows: Vec<usize> = report.errors.iter().map(|e| e.row_index).collect();
        assert_eq!(rows, vec![3, 6]);
    }

    #[test]
    fn test_report_success_flag() {
        assert!(ImportReport::from_outcomes(&outcomes(1, &[]), 10).success);
        assert!(!ImportReport::from_outcomes(&outcomes(2, &[0, 1]), 10).success);
    }
}
