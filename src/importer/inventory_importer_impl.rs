// ==========================================
// 酒类库存销售分析 - 库存导入器实现
// ==========================================
// 职责: 整合导入流程，从文件字节到仓储
// 流程: 校验 → 解析 → 格式识别 → 重建 → 落库
// ==========================================

use crate::domain::product::{BatchMeta, ImportReport, ProductBatch};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{validate_extension, UniversalFileParser};
use crate::importer::format_detector::{detect, ParsedFormat};
use crate::importer::headerless_reconstructor::HeaderlessReconstructor;
use crate::importer::inventory_importer_trait::InventoryImporter;
use crate::importer::raw_table::RawTable;
use crate::importer::tabular_reconstructor::{Reconstruction, TabularReconstructor};
use crate::repository::ProductRepository;
use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

/// 解析后的表格 → 重建结果（纯函数，不落库）
pub fn reconstruct_table(table: RawTable) -> ImportResult<Reconstruction> {
    match detect(table) {
        ParsedFormat::Tabular(sheet) => TabularReconstructor::new().reconstruct(&sheet),
        ParsedFormat::HeaderlessList(rows) => HeaderlessReconstructor::new().reconstruct(&rows),
    }
}

/// 文件字节 → 重建结果（纯函数，不落库）
pub fn reconstruct_from_bytes(content: &[u8]) -> ImportResult<Reconstruction> {
    let table = UniversalFileParser.parse_bytes(content)?;
    reconstruct_table(table)
}

// ==========================================
// InventoryImporterImpl - 库存导入器实现
// ==========================================
pub struct InventoryImporterImpl<R>
where
    R: ProductRepository + ?Sized,
{
    repo: Arc<R>,
    parser: UniversalFileParser,
}

impl<R> InventoryImporterImpl<R>
where
    R: ProductRepository + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            parser: UniversalFileParser,
        }
    }

    fn build_batch(&self, file_name: &str, reconstruction: Reconstruction) -> ProductBatch {
        ProductBatch {
            meta: BatchMeta {
                batch_id: Uuid::new_v4().to_string(),
                file_name: file_name.to_string(),
                format: reconstruction.format,
                anchor_date: reconstruction.anchor_date,
                record_count: reconstruction.records.len(),
                skipped_rows: reconstruction.issues.len(),
                imported_at: Utc::now(),
            },
            records: reconstruction.records,
        }
    }
}

#[async_trait]
impl<R> InventoryImporter for InventoryImporterImpl<R>
where
    R: ProductRepository + ?Sized + 'static,
{
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    async fn import_bytes(&self, file_name: &str, content: &[u8]) -> ImportResult<ImportReport> {
        let start_time = Instant::now();
        info!(file_name = %file_name, "开始导入库存数据");

        // === 步骤 1: 校验 ===
        validate_extension(file_name)?;
        if content.is_empty() {
            return Err(ImportError::EmptyFile);
        }

        // === 步骤 2: 解析 ===
        debug!("步骤 2: 解析文件");
        let table = self.parser.parse_bytes(content)?;

        // === 步骤 3-4: 格式识别 + 重建 ===
        let reconstruction = reconstruct_table(table)?;
        let total_rows = reconstruction.total_rows;
        let retained_rows = reconstruction.retained_rows;
        let issues = reconstruction.issues.clone();

        // === 步骤 5: 落库 ===
        let batch = self.build_batch(file_name, reconstruction);
        let written = self.repo.replace_all(&batch).map_err(|e| {
            error!(error = %e, batch_id = %batch.meta.batch_id, "批次落库失败");
            ImportError::from(e)
        })?;

        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        info!(
            batch_id = %batch.meta.batch_id,
            format = %batch.meta.format,
            anchor = ?batch.meta.anchor_date,
            records = written,
            skipped = issues.len(),
            elapsed_ms = elapsed_ms,
            "库存数据导入完成"
        );

        Ok(ImportReport {
            batch: batch.meta,
            total_rows,
            retained_rows,
            issues,
            elapsed_ms,
        })
    }

    #[instrument(skip(self, file_path))]
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportReport> {
        let path = file_path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        validate_extension(&file_name)?;
        let content = tokio::fs::read(path)
            .await
            .map_err(|e| ImportError::InternalError(e.to_string()))?;
        self.import_bytes(&file_name, &content).await
    }
}
