// ==========================================
// 酒类库存销售分析 - 分析配置读取 Trait
// ==========================================
// 职责: 定义分析模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::engine::AnalyticsOptions;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// AnalyticsConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait AnalyticsConfigReader: Send + Sync {
    /// 积压倍数
    ///
    /// # 默认值
    /// - 3.0（存储值非法时回退默认值）
    async fn get_overstock_multiplier(&self) -> RepositoryResult<f64>;

    /// 排行榜条数（Top-N）
    ///
    /// # 默认值
    /// - 10
    async fn get_leaderboard_size(&self) -> RepositoryResult<usize>;

    /// 图表品牌名最大字符数
    ///
    /// # 默认值
    /// - 20
    async fn get_chart_label_max_chars(&self) -> RepositoryResult<usize>;

    /// 组装分析参数
    async fn get_analytics_options(&self) -> RepositoryResult<AnalyticsOptions> {
        Ok(AnalyticsOptions {
            overstock_multiplier: self.get_overstock_multiplier().await?,
            leaderboard_size: self.get_leaderboard_size().await?,
            chart_label_max_chars: self.get_chart_label_max_chars().await?,
        })
    }
}
