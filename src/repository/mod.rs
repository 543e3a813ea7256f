// ==========================================
// 酒类库存销售分析 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供当前批次的读写接口，屏蔽存储细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod product_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use product_repo::{InMemoryProductRepository, ProductRepository, SqliteProductRepository};
