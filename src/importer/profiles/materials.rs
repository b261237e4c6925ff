// ==========================================
// 配送/库存管理系统 - 库存物料导入规则
// ==========================================
// 职责: materials 字段契约 + 补库标记/库存金额派生
// ==========================================

use crate::domain::entities::MaterialItem;
use crate::domain::record::Record;
use crate::domain::types::{CoerceOrDefault, EntityKind, MaterialCategory};
use crate::importer::importer_trait::EntityProfile;
use crate::importer::profiles::{number_field, required_text, round2, text_field};
use crate::importer::schema_validator::{FieldSpec, FieldType, Schema};
use crate::importer::transforms::{to_number, to_text};

pub struct MaterialsProfile {
    schema: Schema,
}

impl MaterialsProfile {
    pub fn new() -> Self {
        Self {
            schema: Schema::new(vec![
                FieldSpec::required("name", FieldType::String).with_transform(to_text),
                FieldSpec::optional("category", FieldType::String).with_transform(to_text),
                FieldSpec::required("unit", FieldType::String).with_transform(to_text),
                FieldSpec::optional("quantity", FieldType::Number).with_transform(to_number),
                FieldSpec::optional("minStock", FieldType::Number).with_transform(to_number),
                FieldSpec::optional("supplier", FieldType::String).with_transform(to_text),
                FieldSpec::optional("unitPrice", FieldType::Number).with_transform(to_number),
            ]),
        }
    }
}

impl Default for MaterialsProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityProfile for MaterialsProfile {
    type Entity = MaterialItem;

    fn kind(&self) -> EntityKind {
        EntityKind::Materials
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    /// # 规则
    /// - quantity / minStock 缺失 → 0
    /// - needs_restock = quantity ≤ minStock
    /// - stock_value = quantity × unitPrice (无单价 → 空)
    /// - category 不识别 → other
    fn build_entity(&self, record: &Record) -> Result<MaterialItem, String> {
        let quantity = number_field(record, "quantity")?.unwrap_or(0.0);
        let min_stock = number_field(record, "minStock")?.unwrap_or(0.0);
        let unit_price = number_field(record, "unitPrice")?;

        let category = text_field(record, "category")
            .map(|raw| MaterialCategory::coerce_or_default(&raw))
            .unwrap_or(MaterialCategory::DEFAULT);

        Ok(MaterialItem {
            name: required_text(record, "name")?,
            category,
            unit: required_text(record, "unit")?,
            quantity,
            min_stock,
            supplier: text_field(record, "supplier"),
            unit_price,
            needs_restock: quantity <= min_stock,
            stock_value: unit_price.map(|price| round2(quantity * price)),
        })
    }
}
