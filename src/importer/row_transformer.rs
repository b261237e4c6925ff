// ==========================================
// 配送/库存管理系统 - 行转换器
// ==========================================
// 职责: 对已校验的行应用每字段转换函数
// 约束: 不修改输入; 转换失败吞掉并记录, 保留原值
// ==========================================

use crate::domain::record::Record;
use crate::importer::schema_validator::Schema;
use tracing::warn;

/// 已校验行 → 领域形状的行
///
/// 转换是尽力而为的增强步骤: 失败不会中止该行
pub fn transform(record: &Record, schema: &Schema) -> Record {
    let mut output = record.clone();

    for spec in schema.fields() {
        let transform = match spec.transform {
            Some(f) => f,
            None => continue,
        };
        let value = match record.get(spec.name) {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };

        match transform(value) {
            Ok(converted) => output.insert(spec.name, converted),
            Err(e) => {
                warn!(field = spec.name, value = %value, error = %e, "字段转换失败, 保留原值");
            }
        }
    }

    output
}
