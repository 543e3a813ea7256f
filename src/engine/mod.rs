// ==========================================
// 酒类库存销售分析 - 引擎层
// ==========================================
// 职责: 锚点解析、指标计算、积压判定、补货建议、分析汇总
// 红线: Engine 只读记录，不访问仓储，不拼 SQL
// ==========================================

pub mod analytics;
pub mod anchor_resolver;
pub mod demand;
pub mod metrics;
pub mod overstock;

// 重导出核心引擎
pub use analytics::{AnalyticsEngine, AnalyticsOptions};
pub use anchor_resolver::{AnchorDateResolver, ResolvedAnchor, StockSeries};
pub use demand::DemandRecommender;
pub use metrics::{MetricCalculator, MetricInput};
pub use overstock::{OverstockClassifier, DEFAULT_OVERSTOCK_MULTIPLIER};
