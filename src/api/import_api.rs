// ==========================================
// 配送/库存管理系统 - 导入API
// ==========================================
// 职责: 封装预览 + 三类实体导入, 返回可序列化响应
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::db::open_sqlite_connection;
use crate::domain::import::{ImportPreview, ImportReport};
use crate::domain::types::EntityKind;
use crate::importer::batch_executor::ProgressCallback;
use crate::importer::import_service::{CommitOutcome, ImportService};
use crate::repository::SqliteRecordSink;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportApiResponse {
    /// 导入批次ID (UUID)
    pub batch_id: String,
    /// 实体种类
    pub kind: EntityKind,
    /// 导入报告 (success / imported / failed / total / errors / message)
    #[serde(flatten)]
    pub report: ImportReport,
    /// 导入耗时 (毫秒)
    pub elapsed_ms: i64,
}

/// 导入API
pub struct ImportApi {
    service: ImportService,
}

impl ImportApi {
    /// 打开数据库并创建 ImportApi (配置与落库共用一个连接)
    pub async fn new(db_path: &str) -> ApiResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(e.to_string()))?;
        let conn = Arc::new(Mutex::new(conn));

        let config = ConfigManager::from_connection(conn.clone())?;
        let sink = Arc::new(SqliteRecordSink::from_connection(conn)?);
        let service = ImportService::from_config(&config, sink).await?;

        Ok(Self { service })
    }

    pub fn service(&self) -> &ImportService {
        &self.service
    }

    /// 预览导入
    ///
    /// # 参数
    /// - file_path: 文件路径
    /// - kind: 实体种类 (work_hours | materials | documents)
    /// - sheet: 工作表名 (可选)
    pub async fn preview_import(
        &self,
        file_path: &str,
        kind: &str,
        sheet: Option<&str>,
    ) -> ApiResult<ImportPreview> {
        let kind = parse_kind(kind)?;
        Ok(self.service.preview(Path::new(file_path), kind, sheet).await?)
    }

    /// 导入工时记录
    pub async fn import_work_hours(
        &self,
        file_path: &str,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ApiResult<ImportApiResponse> {
        self.import(file_path, EntityKind::WorkHours.as_str(), sheet, on_progress)
            .await
    }

    /// 导入库存物料
    pub async fn import_materials(
        &self,
        file_path: &str,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ApiResult<ImportApiResponse> {
        self.import(file_path, EntityKind::Materials.as_str(), sheet, on_progress)
            .await
    }

    /// 导入文档元数据
    pub async fn import_documents(
        &self,
        file_path: &str,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ApiResult<ImportApiResponse> {
        self.import(file_path, EntityKind::Documents.as_str(), sheet, on_progress)
            .await
    }

    /// 按实体种类导入
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入报告 (含行级失败)
    /// - Err(ApiError): 源级错误 (文件不存在 / 格式不支持 / 无数据行 / 解析失败)
    pub async fn import(
        &self,
        file_path: &str,
        kind: &str,
        sheet: Option<&str>,
        on_progress: Option<ProgressCallback>,
    ) -> ApiResult<ImportApiResponse> {
        let kind = parse_kind(kind)?;
        let started = Instant::now();

        let CommitOutcome { batch_id, report } = self
            .service
            .import(Path::new(file_path), kind, sheet, on_progress)
            .await?;

        Ok(ImportApiResponse {
            batch_id,
            kind,
            report,
            elapsed_ms: started.elapsed().as_millis() as i64,
        })
    }
}

fn parse_kind(kind: &str) -> ApiResult<EntityKind> {
    kind.parse::<EntityKind>().map_err(ApiError::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::import::{RecordId, RowOutcome};

    #[tokio::test]
    async fn test_unknown_kind_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("api.db");
        let api = ImportApi::new(db_path.to_str().unwrap()).await.unwrap();

        let result = api.import("whatever.csv", "invoices", None, None).await;
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_response_flattens_report() {
        let response = ImportApiResponse {
            batch_id: "b-1".to_string(),
            kind: EntityKind::Materials,
            report: ImportReport::from_outcomes(
                &[
                    RowOutcome::Success {
                        index: 0,
                        produced_id: RecordId::from(1),
                    },
                    RowOutcome::Success {
                        index: 1,
                        produced_id: RecordId::from(2),
                    },
                ],
                10,
            ),
            elapsed_ms: 5,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["batchId"], "b-1");
        assert_eq!(json["kind"], "materials");
        assert_eq!(json["imported"], 2);
        assert_eq!(json["total"], 2);
        assert_eq!(json["success"], true);
    }
}
