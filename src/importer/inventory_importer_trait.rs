// ==========================================
// 酒类库存销售分析 - 库存导入 Trait
// ==========================================
// 职责: 定义库存表导入接口（不包含实现）
// ==========================================

use crate::domain::product::ImportReport;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// InventoryImporter Trait
// ==========================================
// 实现者: InventoryImporterImpl
#[async_trait]
pub trait InventoryImporter: Send + Sync {
    /// 导入上传的文件内容，成功后整体替换当前批次
    ///
    /// # 参数
    /// - file_name: 原始文件名（用于扩展名校验与批次追溯）
    /// - content: 文件字节
    ///
    /// # 导入流程
    /// 1. 扩展名 / 空文件校验
    /// 2. 字节解析（Excel → CSV）
    /// 3. 格式识别（有表头表格 / 无表头列表）
    /// 4. 按格式重建商品记录
    /// 5. 落库（整体替换）
    async fn import_bytes(&self, file_name: &str, content: &[u8]) -> ImportResult<ImportReport>;

    /// 从本地文件导入
    async fn import_file<P: AsRef<Path> + Send>(&self, file_path: P) -> ImportResult<ImportReport>;
}
