// ==========================================
// 配送/库存管理系统 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口 (不包含实现)
// ==========================================

use crate::domain::record::Record;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::ParsedFile;
use crate::importer::schema_validator::Schema;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件字节为有序行记录
    ///
    /// # 参数
    /// - bytes: 文件内容
    /// - sheet: 工作表名 (仅电子表格有效, None 表示第一个工作表)
    ///
    /// # 返回
    /// - Ok(ParsedFile): 行记录 + 列名 (可能为空, 由调用方判定 EmptyInput)
    /// - Err: 格式错误 / 工作表不存在
    fn parse_bytes(&self, bytes: &[u8], sheet: Option<&str>) -> ImportResult<ParsedFile>;
}

// ==========================================
// EntityProfile Trait
// ==========================================
// 用途: 单一实体种类的导入规则 (字段契约 + 领域派生)
// 实现者: WorkHoursProfile, MaterialsProfile, DocumentsProfile
pub trait EntityProfile: Send + Sync + 'static {
    /// 落库的领域记录类型
    type Entity: Send + Sync + 'static;

    /// 实体种类
    fn kind(&self) -> crate::domain::types::EntityKind;

    /// 字段契约 (含每字段转换函数)
    fn schema(&self) -> &Schema;

    /// 已校验 + 已转换的行 → 领域记录
    ///
    /// # 说明
    /// - 派生字段 (工时/补库标记/文件类型等) 在此计算
    /// - Err 为行级失败原因, 不中止导入
    fn build_entity(&self, record: &Record) -> Result<Self::Entity, String>;
}
