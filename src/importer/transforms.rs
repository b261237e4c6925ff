// ==========================================
// 配送/库存管理系统 - 字段转换函数
// ==========================================
// 职责: 纯函数 原始值 → 领域值 (FieldSpec.transform 引用)
// 约束: 无副作用; 失败返回 Err, 由 RowTransformer 吞掉并记录
// ==========================================

use crate::domain::record::FieldValue;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// 字段转换函数签名
pub type TransformFn = fn(&FieldValue) -> Result<FieldValue, String>;

// 日期时间文本格式 (按顺序尝试)
const DATETIME_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

// 斜杠日期: 年在前为 Y/M/D, 年在后按美式 M/D/Y; 点分日期按 D.M.Y
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%Y%m%d"];

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M", "%I:%M %p"];

/// 解析日期或日期时间 (日期补 00:00:00)
///
/// - 文本: ISO / RFC 3339, YYYY/MM/DD, MM/DD/YYYY, DD.MM.YYYY, YYYYMMDD (可带时间)
/// - RFC 3339 带时区偏移时取原文中的本地日期时间, 不换算到 UTC
/// - 数值仅接受 8 位 YYYYMMDD
pub fn parse_date_like(value: &FieldValue) -> Option<NaiveDateTime> {
    match value {
        FieldValue::Date(d) => d.and_hms_opt(0, 0, 0),
        FieldValue::DateTime(dt) => Some(*dt),
        FieldValue::Number(n) => {
            if n.fract() != 0.0 || !(10_000_101.0..=99_991_231.0).contains(n) {
                return None;
            }
            NaiveDate::parse_from_str(&format!("{}", *n as i64), "%Y%m%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
        FieldValue::Text(s) => parse_datetime_text(s.trim()),
        _ => None,
    }
}

fn parse_datetime_text(text: &str) -> Option<NaiveDateTime> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// 解析一天内的时刻
///
/// 文本 "HH:MM[:SS]"; 数值按小时 (0 ≤ n < 24, 可带小数)
pub fn parse_time_of_day(value: &FieldValue) -> Option<NaiveTime> {
    match value {
        FieldValue::Time(t) => Some(*t),
        FieldValue::Text(s) => {
            let text = s.trim();
            TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(text, fmt).ok())
        }
        FieldValue::Number(n) if (0.0..24.0).contains(n) => {
            let seconds = (n * 3600.0).round() as u32;
            NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), 0)
        }
        _ => None,
    }
}

// ==========================================
// 转换函数
// ==========================================

/// 整数 (拒绝小数)
pub fn to_integer(value: &FieldValue) -> Result<FieldValue, String> {
    value
        .as_i64()
        .map(|n| FieldValue::Number(n as f64))
        .ok_or_else(|| format!("not an integer: {}", value))
}

/// 数值
pub fn to_number(value: &FieldValue) -> Result<FieldValue, String> {
    value
        .as_f64()
        .map(FieldValue::Number)
        .ok_or_else(|| format!("not a number: {}", value))
}

/// 日历日期 (丢弃时间部分)
pub fn to_date(value: &FieldValue) -> Result<FieldValue, String> {
    parse_date_like(value)
        .map(|dt| FieldValue::Date(dt.date()))
        .ok_or_else(|| format!("not a date: {}", value))
}

/// 时刻或完整日期时间 (工时起止时间)
pub fn to_clock(value: &FieldValue) -> Result<FieldValue, String> {
    if let Some(time) = parse_time_of_day(value) {
        return Ok(FieldValue::Time(time.with_nanosecond(0).unwrap_or(time)));
    }
    parse_date_like(value)
        .map(FieldValue::DateTime)
        .ok_or_else(|| format!("not a time or date-time: {}", value))
}

/// 文本 (去空白; 数值按展示格式字符串化)
pub fn to_text(value: &FieldValue) -> Result<FieldValue, String> {
    match value {
        FieldValue::Text(s) => Ok(FieldValue::Text(s.trim().to_string())),
        FieldValue::Number(_) => Ok(FieldValue::Text(value.to_string())),
        other => Err(format!("not text: {}", other)),
    }
}

/// 布尔 (true/false/1/0/yes/no)
pub fn to_boolean(value: &FieldValue) -> Result<FieldValue, String> {
    parse_boolean(value)
        .map(FieldValue::Bool)
        .ok_or_else(|| format!("not a boolean: {}", value))
}

pub fn parse_boolean(value: &FieldValue) -> Option<bool> {
    match value.to_string().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_like_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for raw in ["2024-01-01", "2024/01/01", "20240101", "2024-01-01T08:00"] {
            let parsed = parse_date_like(&FieldValue::from(raw)).unwrap();
            assert_eq!(parsed.date(), expected, "format {}", raw);
        }
        assert_eq!(
            parse_date_like(&FieldValue::Number(20240101.0)).map(|dt| dt.date()),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_date_like_regional_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        for raw in ["01/15/2024", "15.01.2024", "01/15/2024 08:30", "15.01.2024 08:30"] {
            let parsed = parse_date_like(&FieldValue::from(raw)).unwrap();
            assert_eq!(parsed.date(), expected, "format {}", raw);
        }
    }

    #[test]
    fn test_offset_timestamp_keeps_local_calendar_date() {
        let parsed = parse_date_like(&FieldValue::from("2024-01-15T23:30:00-05:00")).unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(parsed.time(), NaiveTime::from_hms_opt(23, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_date_like_rejects_invalid_calendar_dates() {
        assert!(parse_date_like(&FieldValue::from("2024-02-30")).is_none());
        assert!(parse_date_like(&FieldValue::from("tomorrow")).is_none());
        assert!(parse_date_like(&FieldValue::Number(42.0)).is_none());
    }

    #[test]
    fn test_to_clock_prefers_time_of_day() {
        assert_eq!(
            to_clock(&FieldValue::from("08:30")),
            Ok(FieldValue::Time(NaiveTime::from_hms_opt(8, 30, 0).unwrap()))
        );
        let dt = to_clock(&FieldValue::from("2024-01-01T16:30")).unwrap();
        assert!(matches!(dt, FieldValue::DateTime(_)));
    }

    #[test]
    fn test_to_integer_rejects_fraction() {
        assert_eq!(to_integer(&FieldValue::from("7")), Ok(FieldValue::Number(7.0)));
        assert!(to_integer(&FieldValue::Number(7.5)).is_err());
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(parse_boolean(&FieldValue::from("YES")), Some(true));
        assert_eq!(parse_boolean(&FieldValue::Number(0.0)), Some(false));
        assert_eq!(parse_boolean(&FieldValue::from("maybe")), None);
    }
}
