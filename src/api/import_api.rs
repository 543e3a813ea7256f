// ==========================================
// 酒类库存销售分析 - 导入 API
// ==========================================
// 职责: 封装上传导入，返回调用方可展示的结果
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::product::{BatchMeta, ImportReport, RowIssue};
use crate::importer::{InventoryImporter, InventoryImporterImpl};
use crate::repository::ProductRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    pub message: String,
    pub total_records: usize,
    pub batch: BatchMeta,
    /// 被跳过的数据行明细
    pub skipped: Vec<RowIssue>,
    pub elapsed_ms: i64,
}

impl From<ImportReport> for ImportApiResponse {
    fn from(report: ImportReport) -> Self {
        Self {
            message: format!("成功导入 {} 条酒类库存记录", report.batch.record_count),
            total_records: report.batch.record_count,
            batch: report.batch,
            skipped: report.issues,
            elapsed_ms: report.elapsed_ms,
        }
    }
}

/// 导入API
pub struct ImportApi {
    importer: InventoryImporterImpl<dyn ProductRepository>,
}

impl ImportApi {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self {
            importer: InventoryImporterImpl::new(repo),
        }
    }

    /// 导入上传文件内容
    pub async fn upload(&self, file_name: &str, content: &[u8]) -> ApiResult<ImportApiResponse> {
        let report = self.importer.import_bytes(file_name, content).await?;
        Ok(report.into())
    }

    /// 导入本地文件
    pub async fn import_file(&self, file_path: &str) -> ApiResult<ImportApiResponse> {
        let report = self.importer.import_file(file_path).await?;
        Ok(report.into())
    }
}
