// ==========================================
// 酒类库存销售分析 - 商品批次仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: replace_all 对并发读者原子可见（旧批次或新批次，不出现空窗口）
// ==========================================

mod memory;
mod sqlite;

pub use memory::InMemoryProductRepository;
pub use sqlite::SqliteProductRepository;

use crate::domain::product::{BatchMeta, ProductBatch, ProductRecord};
use crate::repository::error::RepositoryResult;

/// 当前批次仓储接口
pub trait ProductRepository: Send + Sync {
    /// 以新批次整体替换当前批次，返回写入记录数
    fn replace_all(&self, batch: &ProductBatch) -> RepositoryResult<usize>;

    /// 读取当前批次全部记录（按导入顺序）；尚无批次返回空列表
    fn read_all(&self) -> RepositoryResult<Vec<ProductRecord>>;

    /// 当前批次元数据
    fn current_batch_meta(&self) -> RepositoryResult<Option<BatchMeta>>;

    /// 当前批次记录数
    fn count(&self) -> RepositoryResult<usize> {
        Ok(self.read_all()?.len())
    }
}
