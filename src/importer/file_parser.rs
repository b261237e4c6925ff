// ==========================================
// 配送/库存管理系统 - 文件解析器实现
// ==========================================
// 职责: 文件字节 → 有序行记录 + 列名
// 支持: CSV (.csv) / Excel (.xlsx/.xls, 可选工作表)
// ==========================================

use crate::domain::record::{parse_number, FieldValue, Record};
use crate::domain::types::FileFormat;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info};

/// 解析结果: 行记录 (保持源顺序) + 表头列名
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    pub records: Vec<Record>,
    pub columns: Vec<String>,
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8], _sheet: Option<&str>) -> ImportResult<ParsedFile> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 读取表头 (容忍非 UTF-8 字节)
        let raw_headers: Vec<String> = reader
            .byte_headers()?
            .iter()
            .map(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let columns = unique_headers(raw_headers);

        let mut records = Vec::new();
        for result in reader.byte_records() {
            let row = result?;
            let mut record = Record::with_capacity(columns.len());

            for (col_idx, header) in columns.iter().enumerate() {
                let value = row
                    .get(col_idx)
                    .map(|cell| coerce_cell(&String::from_utf8_lossy(cell)))
                    .unwrap_or(FieldValue::Null);
                record.insert(header.clone(), value);
            }

            // 跳过完全空白的行 (不占行索引)
            if record.is_blank() {
                continue;
            }

            records.push(record);
        }

        Ok(ParsedFile { records, columns })
    }
}

/// CSV 单元格类型推断: 空 (或全空白) → Null, 整体可解析为数值 → Number, 其余保持原文
///
/// 去空白只用于判定, 文本值按原样保存
pub fn coerce_cell(raw: &str) -> FieldValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FieldValue::Null;
    }
    match parse_number(trimmed) {
        Some(n) => FieldValue::Number(n),
        None => FieldValue::Text(raw.to_string()),
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8], sheet: Option<&str>) -> ImportResult<ParsedFile> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(requested) => sheet_names
                .iter()
                .find(|name| name.as_str() == requested)
                .cloned()
                .ok_or_else(|| ImportError::SheetNotFound(requested.to_string()))?,
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::EmptyInput("workbook has no sheets".to_string()))?,
        };
        debug!(sheet = %sheet_name, "读取工作表");

        let range = workbook.worksheet_range(&sheet_name)?;
        Ok(records_from_range(&range))
    }
}

/// 工作表区域 → 行记录 (首行为表头, 空白行整体跳过且不占行索引)
pub fn records_from_range(range: &Range<Data>) -> ParsedFile {
    let mut rows = range.rows();
    let header_row = match rows.next() {
        Some(row) => row,
        None => return ParsedFile::default(),
    };

    let columns = unique_headers(
        header_row
            .iter()
            .map(|cell| cell_to_value(cell).to_string().trim().to_string())
            .collect(),
    );

    let mut records = Vec::new();
    for data_row in rows {
        let mut record = Record::with_capacity(columns.len());
        for (col_idx, header) in columns.iter().enumerate() {
            let value = data_row
                .get(col_idx)
                .map(cell_to_value)
                .unwrap_or(FieldValue::Null);
            record.insert(header.clone(), value);
        }

        if record.is_blank() {
            continue;
        }
        records.push(record);
    }

    ParsedFile { records, columns }
}

/// Excel 单元格 → 标量值 (日期单元格转 ISO 文本)
fn cell_to_value(cell: &Data) -> FieldValue {
    match cell {
        Data::Empty => FieldValue::Null,
        Data::Int(i) => FieldValue::Number(*i as f64),
        Data::Float(f) => FieldValue::Number(*f),
        Data::Bool(b) => FieldValue::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            if s.trim().is_empty() {
                FieldValue::Null
            } else {
                FieldValue::Text(s.clone())
            }
        }
        Data::DateTime(dt) => {
            if dt.is_duration() {
                FieldValue::Number(dt.as_f64())
            } else {
                excel_serial_to_text(dt.as_f64())
                    .map(FieldValue::Text)
                    .unwrap_or(FieldValue::Number(dt.as_f64()))
            }
        }
        Data::Error(e) => FieldValue::Text(e.to_string()),
    }
}

/// Excel 序列日期 (1900 系统) → ISO 文本
///
/// - 整数部分为 0: 仅时间 "HH:MM:SS"
/// - 无时间部分: "YYYY-MM-DD"
/// - 其他: "YYYY-MM-DDTHH:MM:SS"
pub fn excel_serial_to_text(serial: f64) -> Option<String> {
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let days = serial.floor();
    let seconds = ((serial - days) * 86_400.0).round() as i64;
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let datetime = base
        .checked_add_signed(Duration::days(days as i64))?
        .and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::seconds(seconds))?;

    if days == 0.0 {
        Some(datetime.format("%H:%M:%S").to_string())
    } else if seconds == 0 {
        Some(datetime.format("%Y-%m-%d").to_string())
    } else {
        Some(datetime.format("%Y-%m-%dT%H:%M:%S").to_string())
    }
}

/// 表头去重补齐: 空列名 → column_N, 重复列名追加 _2/_3
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, header) in raw.into_iter().enumerate() {
        let base = if header.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            header
        };
        let mut candidate = base.clone();
        let mut suffix = 2;
        while columns.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        columns.push(candidate);
    }
    columns
}

// ==========================================
// 通用文件解析器 (根据格式自动选择)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 按声明格式解析字节; 零数据行为 EmptyInput
    pub fn parse(
        &self,
        bytes: &[u8],
        format: FileFormat,
        sheet: Option<&str>,
    ) -> ImportResult<ParsedFile> {
        let parsed = match format {
            FileFormat::Delimited => CsvParser.parse_bytes(bytes, sheet)?,
            FileFormat::Spreadsheet => ExcelParser.parse_bytes(bytes, sheet)?,
        };

        if parsed.records.is_empty() {
            return Err(ImportError::EmptyInput(format!("{:?} input", format)));
        }
        Ok(parsed)
    }

    /// 由扩展名推断格式
    pub fn detect_format(&self, file_path: &Path) -> ImportResult<FileFormat> {
        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        FileFormat::from_extension(&ext).ok_or(ImportError::UnsupportedFormat(ext))
    }

    /// 解析内存中的文件内容 (格式由文件名扩展名决定)
    pub fn parse_named(
        &self,
        file_name: &str,
        bytes: &[u8],
        sheet: Option<&str>,
    ) -> ImportResult<ParsedFile> {
        let format = self.detect_format(Path::new(file_name))?;
        self.parse(bytes, format, sheet).map_err(|e| match e {
            ImportError::EmptyInput(_) => ImportError::EmptyInput(file_name.to_string()),
            other => other,
        })
    }

    /// 读取并解析文件 (先查存在性, 再查扩展名)
    pub async fn parse_file(&self, file_path: &Path, sheet: Option<&str>) -> ImportResult<ParsedFile> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }
        let format = self.detect_format(file_path)?;

        let bytes = tokio::fs::read(file_path).await?;
        let parsed = self.parse(&bytes, format, sheet).map_err(|e| match e {
            ImportError::EmptyInput(_) => ImportError::EmptyInput(file_path.display().to_string()),
            other => other,
        })?;

        info!(
            file = %file_path.display(),
            rows = parsed.records.len(),
            columns = parsed.columns.len(),
            "文件解析完成"
        );
        Ok(parsed)
    }
}
