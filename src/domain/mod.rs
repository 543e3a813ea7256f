// ==========================================
// 酒类库存销售分析 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod analytics;
pub mod product;
pub mod types;

// 重导出核心类型
pub use analytics::{
    AnalyticsSummary, CalculationDetail, ChartsData, DemandExportRow, DemandRecommendation,
    OverstockEntry, RevenueLeader, RevenueShare, TopSeller, VelocityLeader, VolumeLeader,
};
pub use product::{
    BatchMeta, ImportReport, ProductBatch, ProductRecord, RowIssue, SalesMetrics,
};
pub use types::{ColumnRole, DataFidelity, SheetFormat, UrgencyLevel};
