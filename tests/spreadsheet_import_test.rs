// ==========================================
// Excel 导入测试
// ==========================================
// 测试目标: 真实工作簿的工作表选择 / 日期单元格 / 空白行 / 落库
// 数据: tests/fixtures/timesheet_and_stock.xlsx
//   - Hours (首个工作表): 2 行工时, 第 3 行空白, date 列为日期格式
//   - Stock: 2 行物料, 第 3 行空白, 第 4 行缺少 unit
// ==========================================


use delivery_import::api::ImportApi;
use delivery_import::domain::FieldValue;
use delivery_import::importer::{ImportError, UniversalFileParser};
use delivery_import::logging;
use std::path::Path;
use test_helpers::create_test_db;

const WORKBOOK: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/tests/fixtures/timesheet_and_stock.xlsx"
);

#[tokio::test]
async fn test_default_sheet_is_first_and_dates_become_iso_text() {
    logging::init_test();

    let parsed = UniversalFileParser
        .parse_file(Path::new(WORKBOOK), None)
        .await
        .unwrap();

    assert_eq!(parsed.columns, vec!["employeeId", "date", "startTime", "endTime"]);
    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.records[0].get("employeeId"), Some(&FieldValue::Number(7.0)));
    assert_eq!(parsed.records[0].get("date"), Some(&FieldValue::from("2024-01-01")));
    assert_eq!(parsed.records[1].get("date"), Some(&FieldValue::from("2024-01-02")));
    assert_eq!(parsed.records[1].get("startTime"), Some(&FieldValue::from("09:00")));
}

#[tokio::test]
async fn test_named_sheet_skips_blank_rows() {
    logging::init_test();

    let parsed = UniversalFileParser
        .parse_file(Path::new(WORKBOOK), Some("Stock"))
        .await
        .unwrap();

    assert_eq!(parsed.columns, vec!["name", "unit", "quantity"]);
    assert_eq!(parsed.records.len(), 2);
    assert_eq!(parsed.records[0].get("name"), Some(&FieldValue::from("Gloves")));
    assert_eq!(parsed.records[1].get("name"), Some(&FieldValue::from("Boxes")));
    assert_eq!(parsed.records[1].get("unit"), Some(&FieldValue::Null));
}

#[tokio::test]
async fn test_unknown_sheet_is_source_error() {
    logging::init_test();

    let result = UniversalFileParser
        .parse_file(Path::new(WORKBOOK), Some("Nope"))
        .await;
    assert!(matches!(result, Err(ImportError::SheetNotFound(ref name)) if name == "Nope"));
}

#[tokio::test]
async fn test_work_hours_import_from_first_sheet() {
    logging::init_test();
    let (_db, db_path) = create_test_db();
    let api = ImportApi::new(&db_path).await.unwrap();

    let response = api.import_work_hours(WORKBOOK, None, None).await.unwrap();
    assert_eq!((response.report.imported, response.report.failed), (2, 0));

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let mut stmt = conn
        .prepare("SELECT work_date, hours_worked FROM work_hours ORDER BY id")
        .unwrap();
    let rows: Vec<(String, f64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        rows,
        vec![("2024-01-01".to_string(), 8.5), ("2024-01-02".to_string(), 8.0)]
    );
}

#[tokio::test]
async fn test_materials_import_from_named_sheet() {
    logging::init_test();
    let (_db, db_path) = create_test_db();
    let api = ImportApi::new(&db_path).await.unwrap();

    let preview = api
        .preview_import(WORKBOOK, "materials", Some("Stock"))
        .await
        .unwrap();
    assert_eq!(preview.total_rows, 2);
    assert!(!preview.validation[1].valid);

    let response = api
        .import_materials(WORKBOOK, Some("Stock"), None)
        .await
        .unwrap();
    assert_eq!(
        (response.report.imported, response.report.failed, response.report.total),
        (1, 1, 2)
    );
    // 行号按数据行序号计算, 跳过的空白行不占号
    assert_eq!(response.report.errors[0].row_index, 3);
    assert_eq!(response.report.errors[0].error, "Missing required field: unit");
}
