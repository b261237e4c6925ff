// ==========================================
// 导入配置测试
// ==========================================
// 测试目标: config_kv 覆写生效 / 非法配置被拒绝
// ==========================================


use delivery_import::api::{ApiError, ImportApi};
use delivery_import::config::{config_keys, ConfigManager, ImportConfigReader, ImportSettings};
use delivery_import::logging;
use test_helpers::{create_test_db, materials_csv, write_temp_file};

#[tokio::test]
async fn test_defaults_from_empty_database() {
    logging::init_test();
    let (_db, db_path) = create_test_db();

    let config = ConfigManager::new(&db_path).unwrap();
    assert_eq!(config.load_settings().await.unwrap(), ImportSettings::default());
}

#[tokio::test]
async fn test_overrides_flow_into_import() {
    logging::init_test();
    let (_db, db_path) = create_test_db();

    let config = ConfigManager::new(&db_path).unwrap();
    config.set_config_value(config_keys::BATCH_SIZE, "2").unwrap();
    config.set_config_value(config_keys::PREVIEW_ROWS, "3").unwrap();
    config
        .set_config_value(config_keys::FAILURE_PREVIEW_LIMIT, "1")
        .unwrap();
    drop(config);

    let api = ImportApi::new(&db_path).await.unwrap();
    assert_eq!(api.service().settings().batch_size, 2);

    let file = write_temp_file(".csv", "name,unit\nA,\nB,\nC,pcs\n");
    let path = file.path().to_str().unwrap();

    let preview = api.preview_import(path, "materials", None).await.unwrap();
    assert_eq!(preview.sample_rows.len(), 3);

    let response = api.import_materials(path, None, None).await.unwrap();
    assert_eq!(response.report.failed, 2);
    assert_eq!(response.report.errors.len(), 1);
}

#[tokio::test]
async fn test_standard_daily_hours_override() {
    logging::init_test();
    let (_db, db_path) = create_test_db();

    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_config_value(config_keys::STANDARD_DAILY_HOURS, "7.5")
        .unwrap();
    drop(config);

    let api = ImportApi::new(&db_path).await.unwrap();
    let file = write_temp_file(
        ".csv",
        "employeeId,date,startTime,endTime\n7,2024-01-01,08:00,16:30\n",
    );
    api.import_work_hours(file.path().to_str().unwrap(), None, None)
        .await
        .unwrap();

    let conn = rusqlite::Connection::open(&db_path).unwrap();
    let overtime: f64 = conn
        .query_row("SELECT overtime_hours FROM work_hours", [], |row| row.get(0))
        .unwrap();
    assert_eq!(overtime, 1.0);
}

#[tokio::test]
async fn test_zero_batch_size_is_rejected() {
    logging::init_test();
    let (_db, db_path) = create_test_db();

    let config = ConfigManager::new(&db_path).unwrap();
    config.set_config_value(config_keys::BATCH_SIZE, "0").unwrap();
    drop(config);

    let result = ImportApi::new(&db_path).await;
    assert!(matches!(result, Err(ApiError::ConfigError(_))));

    // 修正后恢复
    let config = ConfigManager::new(&db_path).unwrap();
    config.set_config_value(config_keys::BATCH_SIZE, "10").unwrap();
    let api = ImportApi::new(&db_path).await.unwrap();
    let file = write_temp_file(".csv", &materials_csv(25));
    let response = api
        .import_materials(file.path().to_str().unwrap(), None, None)
        .await
        .unwrap();
    assert_eq!(response.report.imported, 25);
}
