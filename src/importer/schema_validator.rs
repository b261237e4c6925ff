// ==========================================
// 配送/库存管理系统 - 字段契约校验器
// ==========================================
// 职责: 按 Schema 校验单行, 返回全部违规 (不止第一条)
// 约束: 纯函数, 无 I/O, 调用间无共享状态
// ==========================================

use crate::domain::import::ValidationResult;
use crate::domain::record::{FieldValue, Record};
use crate::importer::transforms::{parse_boolean, parse_date_like, parse_time_of_day, TransformFn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 字段类型
///
/// Integer / Time 是 Number / Date 的收紧形式, 校验口径与对应转换函数一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Date,
    /// 一天内的时刻或完整日期时间
    Time,
    Boolean,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Integer => "integer",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Boolean => "boolean",
        };
        write!(f, "{}", name)
    }
}

/// 字段契约
#[derive(Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub transform: Option<TransformFn>,
}

impl FieldSpec {
    pub fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            transform: None,
        }
    }

    pub fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: TransformFn) -> Self {
        self.transform = Some(transform);
        self
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// 字段契约列表 (顺序即列优先级, 查找按名称)
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// 校验单行
    pub fn validate(&self, record: &Record) -> ValidationResult {
        validate(record, self)
    }
}

/// 按 Schema 校验单行
///
/// - 缺失/空 且 必填 → "Missing required field: {name}", 不再做类型检查
/// - 缺失/空 且 可选 → 跳过
/// - 有值 → 类型检查
pub fn validate(record: &Record, schema: &Schema) -> ValidationResult {
    let mut errors = Vec::new();

    for spec in schema.fields() {
        let value = match record.present(spec.name) {
            Some(value) => value,
            None => {
                if spec.required {
                    errors.push(format!("Missing required field: {}", spec.name));
                }
                continue;
            }
        };

        if !type_matches(value, spec.field_type) {
            errors.push(type_error(spec));
        }
    }

    ValidationResult::from_errors(errors)
}

fn type_matches(value: &FieldValue, field_type: FieldType) -> bool {
    match field_type {
        FieldType::Number => value.as_f64().is_some(),
        FieldType::Integer => value.as_i64().is_some(),
        FieldType::Date => parse_date_like(value).is_some(),
        FieldType::Time => parse_time_of_day(value).is_some() || parse_date_like(value).is_some(),
        FieldType::Boolean => parse_boolean(value).is_some(),
        // 数值可字符串化, 视为合法字符串
        FieldType::String => matches!(value, FieldValue::Text(_) | FieldValue::Number(_)),
    }
}

fn type_error(spec: &FieldSpec) -> String {
    match spec.field_type {
        FieldType::Number => format!("Field {} must be a number", spec.name),
        FieldType::Integer => format!("Field {} must be an integer", spec.name),
        FieldType::Date => format!("Field {} must be a valid date", spec.name),
        FieldType::Time => format!("Field {} must be a time or date-time", spec.name),
        FieldType::Boolean => format!("Field {} must be a boolean", spec.name),
        FieldType::String => format!("Field {} must be a string", spec.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(vec![
            FieldSpec::required("employeeId", FieldType::Number),
            FieldSpec::required("date", FieldType::Date),
            FieldSpec::optional("approved", FieldType::Boolean),
            FieldSpec::optional("notes", FieldType::String),
        ])
    }

    fn record(pairs: &[(&str, FieldValue)]) -> Record {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_valid_record() {
        let result = schema().validate(&record(&[
            ("employeeId", FieldValue::Number(7.0)),
            ("date", FieldValue::from("2024-01-01")),
            ("approved", FieldValue::from("yes")),
            ("notes", FieldValue::Number(12.0)),
        ]));
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_missing_required_skips_type_check() {
        let result = schema().validate(&record(&[
            ("employeeId", FieldValue::from("")),
            ("date", FieldValue::from("2024-01-01")),
        ]));
        assert!(!result.valid);
        assert_eq!(result.errors, vec!["Missing required field: employeeId"]);
    }

    #[test]
    fn test_collects_all_violations() {
        let result = schema().validate(&record(&[
            ("employeeId", FieldValue::from("seven")),
            ("approved", FieldValue::from("maybe")),
            ("notes", FieldValue::Bool(true)),
        ]));
        assert_eq!(
            result.errors,
            vec![
                "Field employeeId must be a number",
                "Missing required field: date",
                "Field approved must be a boolean",
                "Field notes must be a string",
            ]
        );
    }

    #[test]
    fn test_optional_blank_is_skipped() {
        let result = schema().validate(&record(&[
            ("employeeId", FieldValue::from("7")),
            ("date", FieldValue::from("2024-01-01")),
            ("approved", FieldValue::Null),
        ]));
        assert!(result.valid);
    }

    #[test]
    fn test_integer_and_time_types() {
        let schema = Schema::new(vec![
            FieldSpec::required("employeeId", FieldType::Integer),
            FieldSpec::required("startTime", FieldType::Time),
            FieldSpec::optional("endTime", FieldType::Time),
        ]);

        let ok = schema.validate(&record(&[
            ("employeeId", FieldValue::from("7")),
            ("startTime", FieldValue::from("08:00")),
            ("endTime", FieldValue::from("2024-01-01T16:30")),
        ]));
        assert!(ok.valid);

        let bad = schema.validate(&record(&[
            ("employeeId", FieldValue::Number(7.5)),
            ("startTime", FieldValue::from("morning")),
        ]));
        assert_eq!(
            bad.errors,
            vec![
                "Field employeeId must be an integer",
                "Field startTime must be a time or date-time",
            ]
        );
    }

    #[test]
    fn test_invalid_date() {
        let result = schema().validate(&record(&[
            ("employeeId", FieldValue::Number(7.0)),
            ("date", FieldValue::from("2024-13-01")),
        ]));
        assert_eq!(result.errors, vec!["Field date must be a valid date"]);
    }
}
