// ==========================================
// 配送/库存管理系统 - 导入绑定 (Schema + 转换 + Sink)
// ==========================================
// 职责: 单一实体种类的行处理: 校验 → 转换 → 构建 → 落库
// 说明: 启动时按实体种类各创建一次, 之后不再修改
// ==========================================

use crate::domain::import::{external_row_number, ImportReport, RecordId, RowValidation};
use crate::domain::record::Record;
use crate::domain::types::EntityKind;
use crate::importer::batch_executor::{BatchExecutor, BatchOptions};
use crate::importer::importer_trait::EntityProfile;
use crate::importer::row_transformer::transform;
use crate::importer::schema_validator::Schema;
use crate::repository::record_sink::RecordSink;
use std::sync::Arc;
use tracing::debug;

pub struct ImportProfile<P: EntityProfile> {
    rules: P,
    sink: Arc<dyn RecordSink<P::Entity>>,
}

impl<P: EntityProfile> ImportProfile<P> {
    pub fn new(rules: P, sink: Arc<dyn RecordSink<P::Entity>>) -> Self {
        Self { rules, sink }
    }

    pub fn kind(&self) -> EntityKind {
        self.rules.kind()
    }

    pub fn schema(&self) -> &Schema {
        self.rules.schema()
    }

    /// 处理单行
    ///
    /// # 返回
    /// - Ok(RecordId): 已落库
    /// - Err(原因): 校验失败 (全部违规以 "; " 连接) / 构建失败 / 落库失败
    pub async fn process_row(&self, record: Record) -> Result<RecordId, String> {
        let validation = self.rules.schema().validate(&record);
        if !validation.valid {
            return Err(validation.reason());
        }

        let transformed = transform(&record, self.rules.schema());
        let entity = self.rules.build_entity(&transformed)?;

        self.sink.persist(entity).await.map_err(|e| e.to_string())
    }

    /// 预览校验 (不调用 Sink)
    ///
    /// # 参数
    /// - records: 已解析的行
    /// - limit: 校验前 N 行
    ///
    /// # 规则
    /// - 校验通过的行继续转换 + 构建实体, 构建失败同样计入 errors
    /// - 与 commit 对同一行的判定一致 (落库失败除外)
    pub fn preview(&self, records: &[Record], limit: usize) -> Vec<RowValidation> {
        records
            .iter()
            .take(limit)
            .enumerate()
            .map(|(index, record)| {
                let mut result = self.rules.schema().validate(record);
                if result.valid {
                    let transformed = transform(record, self.rules.schema());
                    if let Err(reason) = self.rules.build_entity(&transformed) {
                        result.valid = false;
                        result.errors.push(reason);
                    }
                }
                RowValidation {
                    row_index: external_row_number(index),
                    valid: result.valid,
                    errors: result.errors,
                }
            })
            .collect()
    }

    /// 分批导入全部行并汇总报告
    ///
    /// 每行恰好产出一个 RowOutcome, 全部落定后折叠为 ImportReport
    ///
    /// # 参数
    /// - records: 全部已解析的行
    /// - options: 批大小 / 进度回调 / 错误回调 / 单行超时
    /// - failure_limit: 报告中失败明细上限
    pub async fn commit(
        &self,
        records: Vec<Record>,
        options: BatchOptions,
        failure_limit: usize,
    ) -> ImportReport {
        let executor = BatchExecutor::new(options);

        let outcome = executor
            .run(records, |record, index| async move {
                let result = self.process_row(record).await;
                debug!(kind = %self.kind(), row_index = index, ok = result.is_ok(), "行处理完成");
                result
            })
            .await;

        ImportReport::from_outcomes(&outcome.into_row_outcomes(), failure_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MaterialItem;
    use crate::domain::record::FieldValue;
    use crate::importer::profiles::MaterialsProfile;
    use crate::repository::error::{RepositoryError, RepositoryResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSink {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordSink<MaterialItem> for CountingSink {
        async fn persist(&self, item: MaterialItem) -> RepositoryResult<RecordId> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if item.name == "broken" {
                return Err(RepositoryError::InternalError("disk full".to_string()));
            }
            Ok(RecordId(format!("m-{}", n)))
        }
    }

    fn material(name: &str, unit: &str) -> Record {
        vec![("name", FieldValue::from(name)), ("unit", FieldValue::from(unit))]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn test_invalid_row_never_reaches_sink() {
        let sink = Arc::new(CountingSink::default());
        let profile = ImportProfile::new(MaterialsProfile::new(), sink.clone());

        let result = profile.process_row(material("Tape", "")).await;
        assert_eq!(result, Err("Missing required field: unit".to_string()));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_commit_counts_sink_failures() {
        let sink = Arc::new(CountingSink::default());
        let profile = ImportProfile::new(MaterialsProfile::new(), sink.clone());

        let records = vec![
            material("Tape", "roll"),
            material("broken", "box"),
            material("Gloves", "pair"),
        ];
        let report = profile.commit(records, BatchOptions::default(), 10).await;

        assert_eq!((report.imported, report.failed, report.total), (2, 1, 3));
        assert_eq!(report.errors[0].row_index, 3);
        assert!(report.errors[0].error.contains("disk full"));
        assert!(report.is_consistent());
    }

    #[test]
    fn test_preview_uses_external_row_numbers() {
        let profile = ImportProfile::new(MaterialsProfile::new(), Arc::new(CountingSink::default()));
        let rows = vec![material("Tape", "roll"), material("", "roll")];

        let validation = profile.preview(&rows, 5);
        assert_eq!(validation.len(), 2);
        assert_eq!(validation[1].row_index, 3);
        assert!(!validation[1].valid);
    }

    #[tokio::test]
    async fn test_preview_and_commit_agree_on_rejected_rows() {
        use crate::domain::entities::WorkHourEntry;
        use crate::importer::profiles::WorkHoursProfile;

        struct NullSink;

        #[async_trait]
        impl RecordSink<WorkHourEntry> for NullSink {
            async fn persist(&self, _entry: WorkHourEntry) -> RepositoryResult<RecordId> {
                Ok(RecordId::from(1))
            }
        }

        let row = |id: &str, start: &str, end: &str| -> Record {
            vec![
                ("employeeId", FieldValue::from(id)),
                ("date", FieldValue::from("2024-01-01")),
                ("startTime", FieldValue::from(start)),
                ("endTime", FieldValue::from(end)),
            ]
            .into_iter()
            .collect()
        };
        let rows = vec![
            row("7.5", "08:00", "16:00"),
            row("7", "morning", "16:00"),
            row("7", "2024-01-01T16:00", "2024-01-01T08:00"),
            row("7", "08:00", "16:00"),
        ];

        let profile = ImportProfile::new(WorkHoursProfile::new(8.0), Arc::new(NullSink));
        let preview = profile.preview(&rows, 10);
        let report = profile.commit(rows, BatchOptions::default(), 10).await;

        let previewed: Vec<(usize, String)> = preview
            .iter()
            .filter(|v| !v.valid)
            .map(|v| (v.row_index, v.errors.join("; ")))
            .collect();
        let committed: Vec<(usize, String)> = report
            .errors
            .iter()
            .map(|e| (e.row_index, e.error.clone()))
            .collect();

        assert_eq!(previewed, committed);
        assert_eq!(
            committed,
            vec![
                (2, "Field employeeId must be an integer".to_string()),
                (3, "Field startTime must be a time or date-time".to_string()),
                (4, "endTime is before startTime".to_string()),
            ]
        );
        assert_eq!(report.imported, 1);
    }
}
