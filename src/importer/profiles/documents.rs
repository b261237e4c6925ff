// ==========================================
// 配送/库存管理系统 - 文档元数据导入规则
// ==========================================
// 职责: documents 字段契约 + 文件类型派生
// ==========================================

use crate::domain::entities::DocumentRecord;
use crate::domain::record::Record;
use crate::domain::types::{CoerceOrDefault, DocumentCategory, EntityKind};
use crate::importer::importer_trait::EntityProfile;
use crate::importer::profiles::{integer_field, required_text, text_field};
use crate::importer::schema_validator::{FieldSpec, FieldType, Schema};
use crate::importer::transforms::{to_integer, to_text};

pub struct DocumentsProfile {
    schema: Schema,
}

impl DocumentsProfile {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(vec![
                FieldSpec::required("name", FieldType::String).with_transform(to_text),
                FieldSpec::required("fileUrl", FieldType::String).with_transform(to_text),
                FieldSpec::required("fileKey", FieldType::String).with_transform(to_text),
                FieldSpec::optional("category", FieldType::String).with_transform(to_text),
                FieldSpec::optional("description", FieldType::String).with_transform(to_text),
                FieldSpec::optional("projectId", FieldType::Integer).with_transform(to_integer),
            ]),
        }
    }
}

impl Default for DocumentsProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityProfile for DocumentsProfile {
    type Entity = DocumentRecord;

    fn kind(&self) -> EntityKind {
        EntityKind::Documents
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn build_entity(&self, record: &Record) -> Result<DocumentRecord, String> {
        let file_key = required_text(record, "fileKey")?;
        let category = text_field(record, "category")
            .map(|raw| DocumentCategory::coerce_or_default(&raw))
            .unwrap_or(DocumentCategory::DEFAULT);

        Ok(DocumentRecord {
            name: required_text(record, "name")?,
            file_url: required_text(record, "fileUrl")?,
            file_type: file_type_of(&file_key),
            file_key,
            category,
            description: text_field(record, "description"),
            project_id: integer_field(record, "projectId")?,
        })
    }
}

/// 存储键的扩展名 (小写); 只看最后一段路径
pub fn file_type_of(file_key: &str) -> Option<String> {
    let last_segment = file_key.rsplit('/').next().unwrap_or(file_key);
    let (stem, ext) = last_segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}
