// ==========================================
// 酒类库存销售分析 - 分析 API
// ==========================================
// 职责: 基于当前批次提供看板、品牌列表、图表、补货建议、核算明细
// 约束: 尚未上传批次 → NotFound
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{is_valid_multiplier, AnalyticsConfigReader};
use crate::domain::analytics::{
    AnalyticsSummary, CalculationDetail, ChartsData, DemandRecommendation,
};
use crate::domain::product::{BatchMeta, ProductRecord};
use crate::engine::{AnalyticsEngine, AnalyticsOptions, DemandRecommender};
use crate::repository::ProductRepository;
use std::sync::Arc;
use tracing::instrument;

pub(crate) const NO_DATA_MESSAGE: &str = "暂无数据，请先上传酒类库存文件";

/// 分析API
pub struct AnalyticsApi {
    repo: Arc<dyn ProductRepository>,
    config: Arc<dyn AnalyticsConfigReader>,
    engine: AnalyticsEngine,
    recommender: DemandRecommender,
}

impl AnalyticsApi {
    pub fn new(repo: Arc<dyn ProductRepository>, config: Arc<dyn AnalyticsConfigReader>) -> Self {
        Self {
            repo,
            config,
            engine: AnalyticsEngine::new(),
            recommender: DemandRecommender::new(),
        }
    }

    /// 读取当前批次记录，无数据返回 NotFound
    fn load_records(&self) -> ApiResult<Vec<ProductRecord>> {
        let records = self.repo.read_all()?;
        if records.is_empty() {
            return Err(ApiError::NotFound(NO_DATA_MESSAGE.to_string()));
        }
        Ok(records)
    }

    /// 合并调用方倍数与存储配置
    async fn resolve_options(&self, multiplier: Option<f64>) -> ApiResult<AnalyticsOptions> {
        let mut options = self.config.get_analytics_options().await?;
        if let Some(m) = multiplier {
            if !is_valid_multiplier(m) {
                return Err(ApiError::InvalidInput(format!(
                    "overstock_multiplier 必须为大于 0 的数值: {}",
                    m
                )));
            }
            options.overstock_multiplier = m;
        }
        Ok(options)
    }

    /// 汇总看板
    #[instrument(skip(self))]
    pub async fn get_analytics(&self, overstock_multiplier: Option<f64>) -> ApiResult<AnalyticsSummary> {
        let options = self.resolve_options(overstock_multiplier).await?;
        let records = self.load_records()?;
        Ok(self.engine.summarize(&records, &options))
    }

    /// 全部品牌记录（空批次返回空列表）
    pub async fn list_brands(&self) -> ApiResult<Vec<ProductRecord>> {
        Ok(self.repo.read_all()?)
    }

    /// 当前批次元数据
    pub async fn current_batch(&self) -> ApiResult<BatchMeta> {
        self.repo
            .current_batch_meta()?
            .ok_or_else(|| ApiError::NotFound(NO_DATA_MESSAGE.to_string()))
    }

    /// 图表数据
    #[instrument(skip(self))]
    pub async fn get_charts(&self) -> ApiResult<ChartsData> {
        let options = self.resolve_options(None).await?;
        let records = self.load_records()?;
        Ok(self.engine.charts(&records, &options))
    }

    /// 补货建议
    #[instrument(skip(self))]
    pub async fn get_demand_recommendations(&self) -> ApiResult<Vec<DemandRecommendation>> {
        let records = self.load_records()?;
        Ok(self.recommender.recommend(&records))
    }

    /// 核算明细
    pub async fn get_calculation_details(&self) -> ApiResult<Vec<CalculationDetail>> {
        let records = self.load_records()?;
        Ok(self.engine.calculation_details(&records))
    }
}
