// ==========================================
// 酒类库存销售分析 - 命令行入口
// ==========================================
// 用法: liquor-stock-analytics [file] [db_path] [multiplier]
// - file: 待导入的 .xlsx/.xls/.csv（省略则只查询当前批次）
// - db_path: 数据库路径（省略使用默认路径）
// - multiplier: 积压倍数（省略使用配置值）
// 输出: 导入结果 / 分析汇总 / 补货建议（JSON，stdout）
// ==========================================

use anyhow::Context;
use liquor_stock_analytics::api::ApiError;
use liquor_stock_analytics::app::{get_default_db_path, AppState};
use liquor_stock_analytics::logging;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", liquor_stock_analytics::APP_NAME);
    tracing::info!("系统版本: {}", liquor_stock_analytics::VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let file = args.next();
    let db_path = args.next().unwrap_or_else(get_default_db_path);
    let multiplier = args
        .next()
        .map(|raw| raw.parse::<f64>())
        .transpose()
        .context("multiplier 必须为数值")?;

    tracing::info!(db_path = %db_path, "使用数据库");
    let state = AppState::new(db_path).context("无法初始化AppState")?;

    if let Some(file) = file {
        let response = state.import_api.import_file(&file).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
    }

    let analytics = match state.analytics_api.get_analytics(multiplier).await {
        Ok(summary) => summary,
        Err(ApiError::NotFound(msg)) => {
            println!("{}", json!({ "message": msg }));
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let recommendations = state.analytics_api.get_demand_recommendations().await?;

    let output = json!({
        "analytics": analytics,
        "demand_recommendations": recommendations,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
