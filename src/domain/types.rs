// ==========================================
// 配送/库存管理系统 - 领域类型定义
// ==========================================
// 职责: 导入目标实体种类 / 文件格式 / 分类枚举
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入目标实体种类 (Entity Kind)
// ==========================================
// 序列化格式: snake_case (与外部选择器一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    WorkHours,
    Materials,
    Documents,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [
        EntityKind::WorkHours,
        EntityKind::Materials,
        EntityKind::Documents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::WorkHours => "work_hours",
            EntityKind::Materials => "materials",
            EntityKind::Documents => "documents",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "work_hours" => Ok(EntityKind::WorkHours),
            "materials" => Ok(EntityKind::Materials),
            "documents" => Ok(EntityKind::Documents),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

// ==========================================
// 文件格式 (由扩展名推断)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// 分隔文本 (.csv)
    Delimited,
    /// 电子表格 (.xlsx / .xls)
    Spreadsheet,
}

impl FileFormat {
    /// 按扩展名推断 (大小写不敏感); 不识别返回 None
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" => Some(FileFormat::Delimited),
            "xlsx" | "xls" => Some(FileFormat::Spreadsheet),
            _ => None,
        }
    }
}

// ==========================================
// 分类宽松映射
// ==========================================
// 不识别的分类值回落到默认分类, 不作为行错误.
// 这是有意保留的宽松行为, 不要改成拒绝.
pub trait CoerceOrDefault: Sized + Copy {
    const DEFAULT: Self;

    fn parse_known(raw: &str) -> Option<Self>;

    fn coerce_or_default(raw: &str) -> Self {
        Self::parse_known(&normalize_category(raw)).unwrap_or(Self::DEFAULT)
    }
}

/// 归一化分类文本: 去空白, 小写, 空格/连字符 → 下划线
fn normalize_category(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

macro_rules! category_enum {
    ($name:ident, default = $default:ident, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl CoerceOrDefault for $name {
            const DEFAULT: Self = $name::$default;

            fn parse_known(raw: &str) -> Option<Self> {
                match raw {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

// 工时类型 (默认: regular)
category_enum!(WorkType, default = Regular, {
    Regular => "regular",
    Overtime => "overtime",
    Holiday => "holiday",
    Weekend => "weekend",
    Remote => "remote",
});

// 物料分类 (默认: other)
category_enum!(MaterialCategory, default = Other, {
    Packaging => "packaging",
    Parts => "parts",
    Consumables => "consumables",
    Equipment => "equipment",
    Fuel => "fuel",
    Other => "other",
});

// 文档分类 (默认: other)
category_enum!(DocumentCategory, default = Other, {
    Contract => "contract",
    Invoice => "invoice",
    DeliveryNote => "delivery_note",
    Report => "report",
    Photo => "photo",
    Other => "other",
});
