// ==========================================
// 酒类库存销售分析 - 配置层
// ==========================================
// 职责: 分析参数管理（积压倍数 / 排行榜条数 / 图表标签长度）
// 存储: config_kv 表
// ==========================================

pub mod analytics_config_trait;
pub mod config_manager;

pub use analytics_config_trait::AnalyticsConfigReader;
pub use config_manager::{config_keys, is_valid_multiplier, ConfigManager};
