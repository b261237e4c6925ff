// ==========================================
// 配送/库存管理系统 - 工时导入规则
// ==========================================
// 职责: work_hours 字段契约 + 工时派生 (总工时/正常工时/加班工时)
// ==========================================

use crate::domain::entities::WorkHourEntry;
use crate::domain::record::{FieldValue, Record};
use crate::domain::types::{CoerceOrDefault, EntityKind, WorkType};
use crate::importer::importer_trait::EntityProfile;
use crate::importer::profiles::{integer_field, round2, text_field};
use crate::importer::schema_validator::{FieldSpec, FieldType, Schema};
use crate::importer::transforms::{
    parse_date_like, parse_time_of_day, to_clock, to_date, to_integer, to_text,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};

pub struct WorkHoursProfile {
    schema: Schema,
    standard_daily_hours: f64,
}

impl WorkHoursProfile {
    /// # 参数
    /// - standard_daily_hours: 标准日工时, 超出部分计入 overtime_hours
    pub fn new(standard_daily_hours: f64) -> Self {
        Self {
            schema: Schema::new(vec![
                FieldSpec::required("employeeId", FieldType::Integer).with_transform(to_integer),
                FieldSpec::required("date", FieldType::Date).with_transform(to_date),
                FieldSpec::required("startTime", FieldType::Time).with_transform(to_clock),
                FieldSpec::optional("endTime", FieldType::Time).with_transform(to_clock),
                FieldSpec::optional("projectId", FieldType::Integer).with_transform(to_integer),
                FieldSpec::optional("workType", FieldType::String).with_transform(to_text),
                FieldSpec::optional("notes", FieldType::String).with_transform(to_text),
            ]),
            standard_daily_hours,
        }
    }
}

/// 起止时间: 一天内的时刻 (与 date 组合) 或完整日期时间
enum Clock {
    TimeOfDay(NaiveDateTime),
    Absolute(NaiveDateTime),
}

impl Clock {
    /// 与 FieldType::Time 校验口径一致: 先按时刻, 再按日期时间
    fn resolve(value: &FieldValue, date: NaiveDate) -> Option<Self> {
        if let Some(time) = parse_time_of_day(value) {
            return Some(Clock::TimeOfDay(date.and_time(time)));
        }
        parse_date_like(value).map(Clock::Absolute)
    }

    fn at(&self) -> NaiveDateTime {
        match self {
            Clock::TimeOfDay(dt) | Clock::Absolute(dt) => *dt,
        }
    }
}

impl EntityProfile for WorkHoursProfile {
    type Entity = WorkHourEntry;

    fn kind(&self) -> EntityKind {
        EntityKind::WorkHours
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }

    /// # 规则
    /// - 结束时刻早于开始时刻 (仅时刻) → 视为跨天, 结束 +1 天
    /// - 结束日期时间早于开始日期时间 → 行失败
    /// - 无结束时间 → 工时字段为空
    /// - workType 不识别 → regular
    fn build_entity(&self, record: &Record) -> Result<WorkHourEntry, String> {
        let employee_id = integer_field(record, "employeeId")?
            .ok_or_else(|| "Missing required field: employeeId".to_string())?;

        let date = record
            .present("date")
            .and_then(parse_date_like)
            .map(|dt| dt.date())
            .ok_or_else(|| "Field date must be a valid date".to_string())?;

        let start = record
            .present("startTime")
            .and_then(|v| Clock::resolve(v, date))
            .ok_or_else(|| "Field startTime must be a time or date-time".to_string())?;
        let start_time = start.at();

        let end_time = match record.present("endTime") {
            None => None,
            Some(value) => {
                let end = Clock::resolve(value, date)
                    .ok_or_else(|| "Field endTime must be a time or date-time".to_string())?;
                Some(resolve_end(&start, &end)?)
            }
        };

        let (hours_worked, regular_hours, overtime_hours) = match end_time {
            Some(end) => {
                let (total, regular, overtime) =
                    split_hours(start_time, end, self.standard_daily_hours);
                (Some(total), Some(regular), Some(overtime))
            }
            None => (None, None, None),
        };

        let work_type = text_field(record, "workType")
            .map(|raw| WorkType::coerce_or_default(&raw))
            .unwrap_or(WorkType::DEFAULT);

        Ok(WorkHourEntry {
            employee_id,
            date,
            start_time,
            end_time,
            project_id: integer_field(record, "projectId")?,
            work_type,
            notes: text_field(record, "notes"),
            hours_worked,
            regular_hours,
            overtime_hours,
        })
    }
}

fn resolve_end(start: &Clock, end: &Clock) -> Result<NaiveDateTime, String> {
    let (start_at, end_at) = (start.at(), end.at());
    if end_at >= start_at {
        return Ok(end_at);
    }
    match end {
        Clock::TimeOfDay(_) => Ok(end_at + Duration::days(1)),
        Clock::Absolute(_) => Err("endTime is before startTime".to_string()),
    }
}

/// 总工时 → (总, 正常, 加班), 均保留两位小数
pub fn split_hours(start: NaiveDateTime, end: NaiveDateTime, standard: f64) -> (f64, f64, f64) {
    let hours = (end - start).num_seconds() as f64 / 3600.0;
    let total = round2(hours);
    let regular = round2(hours.min(standard));
    let overtime = round2((hours - standard).max(0.0));
    (total, regular, overtime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::row_transformer::transform;

    fn row(pairs: &[(&str, &str)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (*k, FieldValue::from(*v)))
            .collect()
    }

    fn build(profile: &WorkHoursProfile, record: &Record) -> Result<WorkHourEntry, String> {
        let transformed = transform(record, profile.schema());
        profile.build_entity(&transformed)
    }

    #[test]
    fn test_overtime_split() {
        let profile = WorkHoursProfile::new(8.0);
        let entry = build(
            &profile,
            &row(&[
                ("employeeId", "7"),
                ("date", "2024-01-01"),
                ("startTime", "08:00"),
                ("endTime", "18:30"),
                ("workType", "Overtime"),
            ]),
        )
        .unwrap();

        assert_eq!(entry.employee_id, 7);
        assert_eq!(entry.hours_worked, Some(10.5));
        assert_eq!(entry.regular_hours, Some(8.0));
        assert_eq!(entry.overtime_hours, Some(2.5));
        assert_eq!(entry.work_type, WorkType::Overtime);
    }

    #[test]
    fn test_night_shift_rolls_over() {
        let profile = WorkHoursProfile::new(8.0);
        let entry = build(
            &profile,
            &row(&[
                ("employeeId", "7"),
                ("date", "2024-01-01"),
                ("startTime", "22:00"),
                ("endTime", "06:00"),
            ]),
        )
        .unwrap();

        assert_eq!(entry.hours_worked, Some(8.0));
        assert_eq!(entry.overtime_hours, Some(0.0));
        assert_eq!(
            entry.end_time.map(|t| t.date()),
            NaiveDate::from_ymd_opt(2024, 1, 2)
        );
    }

    #[test]
    fn test_absolute_end_before_start_fails() {
        let profile = WorkHoursProfile::new(8.0);
        let result = build(
            &profile,
            &row(&[
                ("employeeId", "7"),
                ("date", "2024-01-01"),
                ("startTime", "2024-01-01T16:00"),
                ("endTime", "2024-01-01T08:00"),
            ]),
        );
        assert_eq!(result, Err("endTime is before startTime".to_string()));
    }

    #[test]
    fn test_missing_end_and_unknown_work_type() {
        let profile = WorkHoursProfile::new(8.0);
        let entry = build(
            &profile,
            &row(&[
                ("employeeId", "7"),
                ("date", "2024-01-01"),
                ("startTime", "08:00"),
                ("workType", "sabbatical"),
            ]),
        )
        .unwrap();

        assert_eq!(entry.hours_worked, None);
        assert_eq!(entry.end_time, None);
        assert_eq!(entry.work_type, WorkType::Regular);
    }
}
