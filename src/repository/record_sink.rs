// ==========================================
// 配送/库存管理系统 - 记录 Sink Trait
// ==========================================
// 职责: 定义单行落库接口 (不包含业务逻辑)
// 约束: 实现者需支持并发调用 (最多一个批次宽度在途)
// ==========================================

use crate::domain::import::RecordId;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// RecordSink Trait
// ==========================================
// 用途: 持久化一条已校验 + 已转换的领域记录
// 实现者: SqliteRecordSink
#[async_trait]
pub trait RecordSink<E>: Send + Sync
where
    E: Send + 'static,
{
    /// 落库一条记录
    ///
    /// # 返回
    /// - Ok(RecordId): 持久化标识
    /// - Err: 落库失败 (该行记为失败, 不影响其他行)
    async fn persist(&self, entity: E) -> RepositoryResult<RecordId>;
}
