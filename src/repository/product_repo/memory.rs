use crate::domain::product::{BatchMeta, ProductBatch, ProductRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_repo::ProductRepository;
use std::sync::{Arc, RwLock};

// ==========================================
// InMemoryProductRepository - 内存快照仓储
// ==========================================
/// 持有不可变批次快照，替换时整体交换 Arc
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    current: RwLock<Option<Arc<ProductBatch>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前快照（读者持有期间不受后续替换影响）
    pub fn snapshot(&self) -> RepositoryResult<Option<Arc<ProductBatch>>> {
        let guard = self
            .current
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.clone())
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn replace_all(&self, batch: &ProductBatch) -> RepositoryResult<usize> {
        let next = Arc::new(batch.clone());
        let mut guard = self
            .current
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *guard = Some(next);
        Ok(batch.len())
    }

    fn read_all(&self) -> RepositoryResult<Vec<ProductRecord>> {
        Ok(self
            .snapshot()?
            .map(|batch| batch.records.clone())
            .unwrap_or_default())
    }

    fn current_batch_meta(&self) -> RepositoryResult<Option<BatchMeta>> {
        Ok(self.snapshot()?.map(|batch| batch.meta.clone()))
    }

    fn count(&self) -> RepositoryResult<usize> {
        Ok(self.snapshot()?.map(|batch| batch.len()).unwrap_or(0))
    }
}
