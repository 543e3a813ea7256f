// ==========================================
// 酒类库存销售分析 - 导出 API
// ==========================================
// 职责: 补货建议导出为 CSV
// 列: Index / Brand Name / Wholesale Rate / Quantity held in Stock / Quantity to be Demanded
// ==========================================

use crate::api::analytics_api::NO_DATA_MESSAGE;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::analytics::DemandExportRow;
use crate::engine::DemandRecommender;
use crate::repository::ProductRepository;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// 导出文件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// 导出文件名
pub fn demand_export_file_name(date: NaiveDate) -> String {
    format!("liquor_demand_forecast_{}.csv", date.format("%Y%m%d"))
}

/// 导出行 → CSV 字节
pub fn render_demand_csv(rows: &[DemandExportRow]) -> ApiResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| ApiError::internal("export.serialize", e))?;
    }
    writer
        .into_inner()
        .map_err(|e| ApiError::internal("export.flush", e))
}

/// 导出API
pub struct ExportApi {
    repo: Arc<dyn ProductRepository>,
    recommender: DemandRecommender,
}

impl ExportApi {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self {
            repo,
            recommender: DemandRecommender::new(),
        }
    }

    /// 导出补货清单
    pub async fn export_demand_list(&self) -> ApiResult<ExportFile> {
        let records = self.repo.read_all()?;
        if records.is_empty() {
            return Err(ApiError::NotFound(NO_DATA_MESSAGE.to_string()));
        }

        let recommendations = self.recommender.recommend(&records);
        if recommendations.is_empty() {
            return Err(ApiError::NotFound("没有可导出的补货建议".to_string()));
        }

        let rows = self.recommender.export_rows(&recommendations);
        let content = render_demand_csv(&rows)?;
        let file_name = demand_export_file_name(Utc::now().date_naive());
        info!(file_name = %file_name, rows = rows.len(), "补货清单导出完成");

        Ok(ExportFile {
            file_name,
            content_type: "text/csv".to_string(),
            content,
        })
    }
}
