// ==========================================
// 配送/库存管理系统 - 导入服务
// ==========================================
// 职责: 预览 + 三类实体提交导入
// 流程: 读取文件 → 解析 → (预览: 校验前 N 行) / (提交: 分批 校验 → 转换 → 落库) → 报告
// ==========================================

use crate::config::{ImportConfigReader, ImportSettings};
use crate::domain::entities::{DocumentRecord, MaterialItem, WorkHourEntry};
use crate::domain::import::{ImportPreview, ImportReport};
use crate::domain::types::EntityKind;
use crate::importer::batch_executor::{BatchOptions, ProgressCallback};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{ParsedFile, UniversalFileParser};
use crate::importer::import_profile::ImportProfile;
use crate::importer::importer_trait::EntityProfile;
use crate::importer::profiles::{DocumentsProfile, MaterialsProfile, WorkHoursProfile};
use crate::repository::record_sink::RecordSink;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// 一次提交的结果 (报告 + 批次号)
#[derive(Debug, Clone)]
pub struct CommitOutcome {
    pub batch_id: String,
    pub report: ImportReport,
}

// ==========================================
// ImportService
// ==========================================
pub struct ImportService {
    settings: ImportSettings,
    parser: UniversalFileParser,
    work_hours: ImportProfile<WorkHoursProfile>,
    materials: ImportProfile<MaterialsProfile>,
    documents: ImportProfile<DocumentsProfile>,
}

impl ImportService {
    /// 创建导入服务 (三类实体的导入绑定在此一次性创建)
    ///
    /// # 参数
    /// - settings: 配置快照
    /// - sink: 同时支持三类实体落库的 Sink
    pub fn new<S>(settings: ImportSettings, sink: Arc<S>) -> Self
    where
        S: RecordSink<WorkHourEntry>
            + RecordSink<MaterialItem>
            + RecordSink<DocumentRecord>
            + 'static,
    {
        let work_hours_sink: Arc<dyn RecordSink<WorkHourEntry>> = sink.clone();
        let materials_sink: Arc<dyn RecordSink<MaterialItem>> = sink.clone();
        let documents_sink: Arc<dyn RecordSink<DocumentRecord>> = sink;

        Self {
            work_hours: ImportProfile::new(
                WorkHoursProfile::new(settings.standard_daily_hours),
                work_hours_sink,
            ),
            materials: ImportProfile::new(MaterialsProfile::new(), materials_sink),
            documents: ImportProfile::new(DocumentsProfile::new(), documents_sink),
            parser: UniversalFileParser,
            settings,
        }
    }

    /// 从配置读取器加载配置后创建
    pub async fn from_config<S>(config: &dyn ImportConfigReader, sink: Arc<S>) -> ImportResult<Self>
    where
        S: RecordSink<WorkHourEntry>
            + RecordSink<MaterialItem>
            + RecordSink<DocumentRecord>
            + 'static,
    {
        let settings = config.load_settings().await?;
        info!(?settings, "导入配置已加载");
        Ok(Self::new(settings, sink))
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    // ==========================================
    // 预览
    // ==========================================

    /// 预览文件: 解析 + 校验前 N 行, 不调用 Sink
    ///
    /// # 参数
    /// - file_path: 文件路径 (.csv / .xlsx / .xls)
    /// - kind: 实体种类
    /// - sheet: 工作表名 (仅电子表格)
    #[instrument(skip(self, file_path), fields(file = %file_path.display()))]
    pub async fn preview(
        &self,
        file_path: &Path,
        kind: EntityKind,
        sheet: Option<&str>,
    ) -> ImportResult<ImportPreview> {
        let parsed = self.parser.parse_file(file_path, sheet).await?;
        Ok(self.build_preview(file_name_of(file_path), parsed, kind))
    }

    /// 预览内存中的文件内容
    pub fn preview_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        kind: EntityKind,
        sheet: Option<&str>,
    ) -> ImportResult<ImportPreview> {
        let parsed = self.parser.parse_named(file_name, bytes, sheet)?;
        Ok(self.build_preview(file_name.to_string(), parsed, kind))
    }

    fn build_preview(&self, file_name: String, parsed: ParsedFile, kind: EntityKind) -> ImportPreview {
        let limit = self.settings.preview_rows;
        let validation = match kind {
            EntityKind::WorkHours => self.work_hours.preview(&parsed.records, limit),
            EntityKind::Materials => self.materials.preview(&parsed.records, limit),
            EntityKind::Documents => self.documents.preview(&parsed.records, limit),
        };

        let total_rows = parsed.records.len();
        let invalid = validation.iter().filter(|v| !v.valid).count();
        info!(kind = %kind, total_rows, sampled = validation.len(), invalid, "预览完成");

        ImportPreview {
            file_name,
            total_rows,
            columns: parsed.columns,
            sample_rows: parsed.records.into_iter().take(limit).collect(),
            validation,
            estimated_records: total_rows,
        }
    }

    // ==========================================
    // 提交
    // ==========================================

    /// 导入工时记录
    pub async fn import_work_hours(
        &self,
        file_path: &Path,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ImportResult<CommitOutcome> {
        let parsed = self.parser.parse_file(file_path, sheet).await?;
        Ok(self.commit_parsed(&self.work_hours, parsed, on_progress).await)
    }

    /// 导入库存物料
    pub async fn import_materials(
        &self,
        file_path: &Path,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ImportResult<CommitOutcome> {
        let parsed = self.parser.parse_file(file_path, sheet).await?;
        Ok(self.commit_parsed(&self.materials, parsed, on_progress).await)
    }

    /// 导入文档元数据
    pub async fn import_documents(
        &self,
        file_path: &Path,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ImportResult<CommitOutcome> {
        let parsed = self.parser.parse_file(file_path, sheet).await?;
        Ok(self.commit_parsed(&self.documents, parsed, on_progress).await)
    }

    /// 按实体种类分派导入
    pub async fn import(
        &self,
        file_path: &Path,
        kind: EntityKind,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ImportResult<CommitOutcome> {
        match kind {
            EntityKind::WorkHours => self.import_work_hours(file_path, sheet, on_progress).await,
            EntityKind::Materials => self.import_materials(file_path, sheet, on_progress).await,
            EntityKind::Documents => self.import_documents(file_path, sheet, on_progress).await,
        }
    }

    /// 导入内存中的文件内容
    pub async fn import_bytes(
        &self,
        file_name: &str,
        bytes: &[u8],
        kind: EntityKind,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ImportResult<CommitOutcome> {
        let parsed = self.parser.parse_named(file_name, bytes, sheet)?;
        let outcome = match kind {
            EntityKind::WorkHours => self.commit_parsed(&self.work_hours, parsed, on_progress).await,
            EntityKind::Materials => self.commit_parsed(&self.materials, parsed, on_progress).await,
            EntityKind::Documents => self.commit_parsed(&self.documents, parsed, on_progress).await,
        };
        Ok(outcome)
    }

    #[instrument(skip_all, fields(kind = %profile.kind(), batch_id))]
    async fn commit_parsed<P: EntityProfile>(
        &self,
        profile: &ImportProfile<P>,
        parsed: ParsedFile,
        on_progress: Option<ProgressCallback>,
    ) -> CommitOutcome {
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let total = parsed.records.len();
        info!(batch_id = %batch_id, total, batch_size = self.settings.batch_size, "开始导入");

        let kind = profile.kind();
        let mut options = BatchOptions::default()
            .with_batch_size(self.settings.batch_size)
            .with_row_timeout(self.settings.row_timeout())
            .with_error_hook(Arc::new(move |index: usize, reason: &str| {
                warn!(kind = %kind, row_index = index, error = %reason, "行导入失败");
            }));
        if let Some(callback) = on_progress {
            options = options.with_progress(callback);
        }

        let report = profile
            .commit(parsed.records, options, self.settings.failure_preview_limit)
            .await;

        info!(
            batch_id = %batch_id,
            imported = report.imported,
            failed = report.failed,
            total = report.total,
            "导入完成"
        );

        CommitOutcome { batch_id, report }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
