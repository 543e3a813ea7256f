// ==========================================
// 酒类库存销售分析 - 分析汇总引擎
// ==========================================
// 职责: 汇总看板 / 图表 Top-N / 核算明细
// 输入: 当前批次记录（只读）
// ==========================================

use crate::domain::analytics::{
    AnalyticsSummary, CalculationDetail, ChartsData, RevenueLeader, RevenueShare, TopSeller,
    VelocityLeader, VolumeLeader,
};
use crate::domain::product::ProductRecord;
use crate::engine::demand::{round2, DEMAND_TARGET_DAYS};
use crate::engine::overstock::OverstockClassifier;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::instrument;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;
pub const DEFAULT_CHART_LABEL_MAX_CHARS: usize = 20;

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/// 汇总与图表参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticsOptions {
    pub overstock_multiplier: f64,
    pub leaderboard_size: usize,
    pub chart_label_max_chars: usize,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            overstock_multiplier: crate::engine::overstock::DEFAULT_OVERSTOCK_MULTIPLIER,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            chart_label_max_chars: DEFAULT_CHART_LABEL_MAX_CHARS,
        }
    }
}

/// AnalyticsEngine - 分析汇总引擎
#[derive(Debug, Default)]
pub struct AnalyticsEngine {
    classifier: OverstockClassifier,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按月销售额降序（稳定排序，保持原顺序打破平局）
    fn by_monthly_value<'a>(&self, records: &'a [ProductRecord]) -> Vec<&'a ProductRecord> {
        let mut sorted: Vec<&ProductRecord> = records.iter().collect();
        sorted.sort_by(|a, b| {
            desc(a.metrics.monthly_sales_value, b.metrics.monthly_sales_value)
        });
        sorted
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn summarize(&self, records: &[ProductRecord], options: &AnalyticsOptions) -> AnalyticsSummary {
        let overstocked_items = self
            .classifier
            .classify(records, options.overstock_multiplier);

        let top_selling_brands = self
            .by_monthly_value(records)
            .into_iter()
            .take(options.leaderboard_size)
            .map(|r| TopSeller {
                brand_name: r.brand_name.clone(),
                monthly_sales_value: r.metrics.monthly_sales_value,
                stock_value_today: r.metrics.stock_value_today,
                stock_ratio: r.metrics.stock_ratio,
            })
            .collect();

        let mut sales_trends: BTreeMap<String, f64> = BTreeMap::new();
        for record in records {
            for (label, qty) in &record.daily_stock {
                *sales_trends.entry(label.clone()).or_insert(0.0) += qty;
            }
        }

        AnalyticsSummary {
            total_brands: records.len(),
            total_stock_value: records.iter().map(|r| r.metrics.stock_value_today).sum(),
            total_overstocked_value: overstocked_items.iter().map(|e| e.overstock_value).sum(),
            overstocked_brands: overstocked_items.len(),
            overstock_multiplier: options.overstock_multiplier,
            top_selling_brands,
            overstocked_items,
            sales_trends,
        }
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn charts(&self, records: &[ProductRecord], options: &AnalyticsOptions) -> ChartsData {
        let n = options.leaderboard_size;

        let mut by_volume: Vec<&ProductRecord> = records.iter().collect();
        by_volume.sort_by(|a, b| b.metrics.current_stock_qty.cmp(&a.metrics.current_stock_qty));
        let volume_leaders = by_volume
            .into_iter()
            .take(n)
            .filter(|r| r.metrics.current_stock_qty > 0)
            .map(|r| VolumeLeader {
                name: r.brand_name.chars().take(options.chart_label_max_chars).collect(),
                value: r.metrics.current_stock_qty,
                stock_value: r.metrics.stock_value_today,
            })
            .collect();

        let mut by_days: Vec<&ProductRecord> = records
            .iter()
            .filter(|r| r.metrics.stock_available_days > 0.0)
            .collect();
        by_days.sort_by(|a, b| {
            a.metrics
                .stock_available_days
                .total_cmp(&b.metrics.stock_available_days)
        });
        let velocity_leaders = by_days
            .into_iter()
            .take(n)
            .map(|r| VelocityLeader {
                name: r.brand_name.clone(),
                velocity: round2(DEMAND_TARGET_DAYS / r.metrics.stock_available_days),
                days_of_stock: r.metrics.stock_available_days,
                sales_value: r.metrics.monthly_sales_value,
            })
            .collect();

        let revenue: Vec<&ProductRecord> =
            self.by_monthly_value(records).into_iter().take(n).collect();

        let total_sales: f64 = records.iter().map(|r| r.metrics.monthly_sales_value).sum();

        let revenue_leaders = revenue
            .iter()
            .map(|r| RevenueLeader {
                name: r.brand_name.clone(),
                value: r.metrics.monthly_sales_value,
                stock_value: r.metrics.stock_value_today,
                stock_ratio: r.metrics.stock_ratio,
            })
            .collect();

        let revenue_proportion = revenue
            .iter()
            .filter(|r| r.metrics.monthly_sales_value > 0.0)
            .map(|r| RevenueShare {
                name: r.brand_name.clone(),
                value: r.metrics.monthly_sales_value,
                percentage: if total_sales > 0.0 {
                    round2(r.metrics.monthly_sales_value / total_sales * 100.0)
                } else {
                    0.0
                },
                stock_value: r.metrics.stock_value_today,
            })
            .collect();

        ChartsData {
            volume_leaders,
            velocity_leaders,
            revenue_leaders,
            revenue_proportion,
        }
    }

    /// 核算明细，按序号升序
    pub fn calculation_details(&self, records: &[ProductRecord]) -> Vec<CalculationDetail> {
        let mut details: Vec<CalculationDetail> = records
            .iter()
            .map(|r| {
                let m = &r.metrics;
                let multiplier_value = if m.monthly_sales_value > 0.0 {
                    m.stock_value_today / m.monthly_sales_value.max(1.0)
                } else {
                    0.0
                };

                CalculationDetail {
                    index: r.index_number,
                    brand_name: r.brand_name.clone(),
                    calculated_wholesale_rate: r.wholesale_rate,
                    selling_rate: r.selling_rate,
                    calculated_avg_monthly_sale: m.monthly_sales_value,
                    calculated_current_stock_value: m.stock_value_today,
                    calculated_multiplier_value: round3(multiplier_value),
                    anchor_date: r.anchor_date.clone(),
                    anchor_stock: r.anchor_stock,
                    last_date: r.last_date.clone(),
                    last_stock: r.last_stock,
                    total_sales_qty: m.total_sales_qty,
                    avg_daily_sales_qty: m.avg_daily_sales_qty,
                    days_analyzed: m.days_analyzed,
                    stock_available_days: m.stock_available_days,
                }
            })
            .collect();

        details.sort_by_key(|d| d.index);
        details
    }
}
