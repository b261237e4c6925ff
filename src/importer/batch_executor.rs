// ==========================================
// 配送/库存管理系统 - 分批执行器
// ==========================================
// 职责: 按固定批大小切分行序列, 批内并发处理, 批间串行
// 不变量:
// - 第 N+1 批在第 N 批全部完成前不会开始
// - 批内一行失败 (Err / panic / 超时) 不影响同批其他行
// - 每个结果带原始行索引, 与完成顺序无关
// ==========================================

use crate::domain::import::{RecordId, RowOutcome};
use crate::domain::record::Record;
use futures::future::join_all;
use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 默认批大小
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// 进度回调 (已完成行数, 总行数)
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// 失败回调 (0 基行索引, 原因)
pub type ErrorCallback = Arc<dyn Fn(usize, &str) + Send + Sync>;

#[derive(Clone)]
pub struct BatchOptions {
    pub batch_size: usize,
    pub on_progress: Option<ProgressCallback>,
    pub on_error: Option<ErrorCallback>,
    /// 单行超时 (None 表示不限)
    pub row_timeout: Option<Duration>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            on_progress: None,
            on_error: None,
            row_timeout: None,
        }
    }
}

impl BatchOptions {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub fn with_error_hook(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    pub fn with_row_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.row_timeout = timeout;
        self
    }
}

impl fmt::Debug for BatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchOptions")
            .field("batch_size", &self.batch_size)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("row_timeout", &self.row_timeout)
            .finish()
    }
}

/// 执行结果 (两个列表均按原始行索引升序)
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    pub successful: Vec<(usize, T)>,
    /// (0 基行索引, 原因)
    pub failed: Vec<(usize, String)>,
    pub total: usize,
}

impl<T> BatchOutcome<T> {
    fn new(total: usize) -> Self {
        Self {
            successful: Vec::new(),
            failed: Vec::new(),
            total,
        }
    }
}

impl BatchOutcome<RecordId> {
    /// 每行一个 RowOutcome, 按原始行索引升序
    pub fn into_row_outcomes(self) -> Vec<RowOutcome> {
        let mut outcomes: Vec<RowOutcome> = self
            .successful
            .into_iter()
            .map(|(index, produced_id)| RowOutcome::Success { index, produced_id })
            .chain(
                self.failed
                    .into_iter()
                    .map(|(index, reason)| RowOutcome::Failure { index, reason }),
            )
            .collect();
        outcomes.sort_by_key(RowOutcome::index);
        outcomes
    }
}

// ==========================================
// BatchExecutor
// ==========================================
pub struct BatchExecutor {
    options: BatchOptions,
}

impl BatchExecutor {
    pub fn new(options: BatchOptions) -> Self {
        Self { options }
    }

    /// 逐批处理全部行
    ///
    /// # 参数
    /// - records: 全部行 (顺序即原始行索引)
    /// - handler: 单行处理 (record, 原始索引) → Result
    ///
    /// # 返回
    /// - BatchOutcome: 成功/失败/总数; 行级错误从不向上传播
    pub async fn run<T, E, F, Fut>(&self, records: Vec<Record>, handler: F) -> BatchOutcome<T>
    where
        F: Fn(Record, usize) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let total = records.len();
        let batch_size = self.options.batch_size.max(1);
        let completed = AtomicUsize::new(0);
        let mut outcome = BatchOutcome::new(total);

        let mut rows = records.into_iter().enumerate().peekable();
        let mut batch_no = 0usize;

        while rows.peek().is_some() {
            let batch: Vec<(usize, Record)> = rows.by_ref().take(batch_size).collect();
            debug!(batch = batch_no, size = batch.len(), total = total, "开始处理批次");

            let handler = &handler;
            let completed = &completed;
            let pending = batch.into_iter().map(|(index, record)| async move {
                let result = self.settle_row(handler, record, index).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(on_progress) = &self.options.on_progress {
                    on_progress(done, total);
                }
                (index, result)
            });

            // 整批落定后再折叠结果
            for (index, result) in join_all(pending).await {
                match result {
                    Ok(value) => outcome.successful.push((index, value)),
                    Err(reason) => {
                        if let Some(on_error) = &self.options.on_error {
                            on_error(index, &reason);
                        }
                        outcome.failed.push((index, reason));
                    }
                }
            }

            debug!(
                batch = batch_no,
                succeeded = outcome.successful.len(),
                failed = outcome.failed.len(),
                "批次完成"
            );
            batch_no += 1;
        }

        outcome
    }

    /// 单行落定: Err / panic / 超时统一转为失败原因
    async fn settle_row<T, E, F, Fut>(&self, handler: &F, record: Record, index: usize) -> Result<T, String>
    where
        F: Fn(Record, usize) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let future = match std::panic::catch_unwind(AssertUnwindSafe(|| handler(record, index))) {
            Ok(future) => future,
            Err(payload) => return Err(panic_message(payload)),
        };
        let guarded = AssertUnwindSafe(future).catch_unwind();

        let settled = match self.options.row_timeout {
            Some(limit) => match tokio::time::timeout(limit, guarded).await {
                Ok(settled) => settled,
                Err(_) => {
                    return Err(format!(
                        "Row processing timed out after {} ms",
                        limit.as_millis()
                    ))
                }
            },
            None => guarded.await,
        };

        match settled {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.to_string()),
            Err(payload) => Err(panic_message(payload)),
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("Row handler panicked: {}", msg)
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("Row handler panicked: {}", msg)
    } else {
        "Row handler panicked".to_string()
    }
}
