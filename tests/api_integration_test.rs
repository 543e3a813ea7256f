// ==========================================
// API 层端到端测试
// ==========================================
// 模拟调用方流程: 上传 → 看板 / 图表 / 补货建议 → 导出
// ==========================================


use liquor_stock_analytics::api::ApiError;
use liquor_stock_analytics::app::AppState;
use liquor_stock_analytics::config::config_keys;
use liquor_stock_analytics::domain::types::{SheetFormat, UrgencyLevel};
use liquor_stock_analytics::logging;
use test_helpers::create_test_state;

#[tokio::test]
async fn test_queries_before_upload_return_not_found() {
    logging::init_test();

    let state = AppState::in_memory().expect("创建 AppState 失败");

    assert!(matches!(
        state.analytics_api.get_analytics(None).await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.analytics_api.get_demand_recommendations().await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.analytics_api.current_batch().await,
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        state.export_api.export_demand_list().await,
        Err(ApiError::NotFound(_))
    ));
    assert!(state.analytics_api.list_brands().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_then_analytics_full_flow() {
    let (_temp_file, state) = create_test_state().expect("创建 AppState 失败");

    // 步骤 1: 上传
    let response = state
        .import_api
        .upload("stock.csv", &test_helpers::single_brand_csv())
        .await
        .expect("上传失败");
    assert_eq!(response.total_records, 1);
    assert_eq!(response.batch.format, SheetFormat::Tabular);
    assert_eq!(response.batch.anchor_date.as_deref(), Some("25-Aug"));
    assert!(response.skipped.is_empty());

    // 步骤 2: 看板（默认倍数 3）
    let summary = state.analytics_api.get_analytics(None).await.unwrap();
    assert_eq!(summary.total_brands, 1);
    assert_eq!(summary.total_stock_value, 4500.0);
    assert_eq!(summary.overstock_multiplier, 3.0);
    assert_eq!(summary.overstocked_brands, 0);
    assert_eq!(summary.sales_trends["25-Aug"], 100.0);
    assert_eq!(summary.sales_trends["26-Aug"], 90.0);

    // 步骤 3: 补货建议
    let recs = state.analytics_api.get_demand_recommendations().await.unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].urgency_level, UrgencyLevel::High);
    assert_eq!(recs[0].wholesale_rate, 45.0);
    assert_eq!(recs[0].recommended_qty, 180);

    // 步骤 4: 核算明细
    let details = state.analytics_api.get_calculation_details().await.unwrap();
    assert_eq!(details[0].calculated_multiplier_value, 0.375);
    assert_eq!(details[0].days_analyzed, 1);

    // 步骤 5: 图表
    let charts = state.analytics_api.get_charts().await.unwrap();
    assert_eq!(charts.volume_leaders[0].value, 90);
    assert_eq!(charts.revenue_proportion[0].percentage, 100.0);
}

#[tokio::test]
async fn test_multiplier_override_and_validation() {
    let state = AppState::in_memory().expect("创建 AppState 失败");
    state
        .import_api
        .upload("stock.csv", &test_helpers::single_brand_csv())
        .await
        .unwrap();

    // 库存比 0.375，倍数 0.25 时积压
    let summary = state.analytics_api.get_analytics(Some(0.25)).await.unwrap();
    assert_eq!(summary.overstocked_brands, 1);
    assert_eq!(summary.overstocked_items[0].threshold, 3000.0);
    assert_eq!(summary.overstocked_items[0].overstock_value, 1500.0);

    for invalid in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            state.analytics_api.get_analytics(Some(invalid)).await,
            Err(ApiError::InvalidInput(_))
        ));
    }
}

#[tokio::test]
async fn test_stored_multiplier_applies_when_not_overridden() {
    let state = AppState::in_memory().expect("创建 AppState 失败");
    state
        .config
        .set_global_config_value(config_keys::OVERSTOCK_MULTIPLIER, "0.25")
        .unwrap();
    state
        .import_api
        .upload("stock.csv", &test_helpers::single_brand_csv())
        .await
        .unwrap();

    let summary = state.analytics_api.get_analytics(None).await.unwrap();
    assert_eq!(summary.overstock_multiplier, 0.25);
    assert_eq!(summary.overstocked_brands, 1);

    assert!(state
        .config
        .set_global_config_value(config_keys::OVERSTOCK_MULTIPLIER, "-2")
        .is_err());
}

#[tokio::test]
async fn test_rejected_upload_keeps_previous_batch() {
    let state = AppState::in_memory().expect("创建 AppState 失败");
    state
        .import_api
        .upload("stock.csv", &test_helpers::global_anchor_csv())
        .await
        .unwrap();

    match state.import_api.upload("stock.pdf", b"whatever").await {
        Err(ApiError::ImportRejected { code, .. }) => assert_eq!(code, "UNSUPPORTED_FILE_TYPE"),
        other => panic!("unexpected result: {:?}", other.map(|r| r.total_records)),
    }

    let bad = b"Sl No,Brand Name,Selling Rate\n1,X,50\n";
    match state.import_api.upload("bad.csv", bad).await {
        Err(ApiError::ImportRejected { code, .. }) => assert_eq!(code, "MISSING_REQUIRED_COLUMN"),
        other => panic!("unexpected result: {:?}", other.map(|r| r.total_records)),
    }

    let brands = state.analytics_api.list_brands().await.unwrap();
    assert_eq!(brands.len(), 2);
}

#[tokio::test]
async fn test_reupload_replaces_batch() {
    let (_temp_file, state) = create_test_state().expect("创建 AppState 失败");

    state
        .import_api
        .upload("first.csv", &test_helpers::global_anchor_csv())
        .await
        .unwrap();
    let first = state.analytics_api.current_batch().await.unwrap();

    state
        .import_api
        .upload("second.csv", &test_helpers::headerless_csv())
        .await
        .unwrap();
    let second = state.analytics_api.current_batch().await.unwrap();

    assert_ne!(first.batch_id, second.batch_id);
    assert_eq!(second.file_name, "second.csv");
    assert_eq!(second.format, SheetFormat::HeaderlessList);

    let brands = state.analytics_api.list_brands().await.unwrap();
    let names: Vec<_> = brands.iter().map(|r| r.brand_name.as_str()).collect();
    assert_eq!(names, vec!["Old Monk", "Bacardi"]);
}

#[tokio::test]
async fn test_export_demand_list() {
    let state = AppState::in_memory().expect("创建 AppState 失败");
    state
        .import_api
        .upload("stock.csv", &test_helpers::single_brand_csv())
        .await
        .unwrap();

    let file = state.export_api.export_demand_list().await.unwrap();
    assert!(file.file_name.starts_with("liquor_demand_forecast_"));
    assert!(file.file_name.ends_with(".csv"));
    assert_eq!(file.content_type, "text/csv");

    let text = String::from_utf8(file.content).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("Index,Brand Name,Wholesale Rate,Quantity held in Stock,Quantity to be Demanded")
    );
    assert_eq!(lines.next(), Some("1,X,45.0,90,180"));
    assert_eq!(lines.next(), None);
}

#[tokio::test]
async fn test_export_without_recommendations() {
    let state = AppState::in_memory().expect("创建 AppState 失败");
    // 估算数据没有日均销量
    state
        .import_api
        .upload("list.csv", &test_helpers::headerless_csv())
        .await
        .unwrap();

    assert!(matches!(
        state.export_api.export_demand_list().await,
        Err(ApiError::NotFound(_))
    ));
}
