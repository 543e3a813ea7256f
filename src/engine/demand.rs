// ==========================================
// 酒类库存销售分析 - 补货建议引擎
// ==========================================
// 目标窗口: 30 天
// 建议量 = max(0, trunc(日均销量 × 30) - 当前库存)，上限 2 × 当前库存
// 紧急等级: 可售天数 <10 HIGH / <20 MEDIUM / <30 LOW / 其余 NONE
// 输出条件: 等级非 NONE，或建议量 > 5
// 排序: 等级（HIGH 在前），同级按建议量降序
// ==========================================

use crate::domain::analytics::{DemandExportRow, DemandRecommendation};
use crate::domain::product::ProductRecord;
use crate::domain::types::UrgencyLevel;
use tracing::{debug, instrument};

/// 补货目标天数
pub const DEMAND_TARGET_DAYS: f64 = 30.0;

/// 无紧急等级时的最小建议量（不含）
const MIN_RECOMMENDED_QTY: i64 = 5;

/// 两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// DemandRecommender - 补货建议引擎
#[derive(Debug, Default)]
pub struct DemandRecommender;

impl DemandRecommender {
    pub fn new() -> Self {
        Self
    }

    /// 单条记录建议；无销售速度或无需补货返回 None
    pub fn evaluate(&self, record: &ProductRecord) -> Option<DemandRecommendation> {
        let metrics = &record.metrics;
        if metrics.avg_daily_sales_qty <= 0.0 {
            return None;
        }

        let current = metrics.current_stock_qty;
        let target_qty = (metrics.avg_daily_sales_qty * DEMAND_TARGET_DAYS).trunc() as i64;
        let shortfall = (target_qty - current).max(0);
        let urgency = UrgencyLevel::from_stock_days(metrics.stock_available_days);

        // 入选判定使用封顶前的缺口
        if urgency == UrgencyLevel::None && shortfall <= MIN_RECOMMENDED_QTY {
            debug!(brand = %record.brand_name, shortfall = shortfall, "库存充足，不建议补货");
            return None;
        }

        Some(DemandRecommendation {
            brand_name: record.brand_name.clone(),
            index_number: record.index_number,
            selling_rate: record.selling_rate,
            wholesale_rate: round2(record.wholesale_rate),
            current_stock_qty: current,
            recommended_qty: shortfall.min(current.saturating_mul(2)),
            urgency_level: urgency,
        })
    }

    /// 批量生成并排序
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn recommend(&self, records: &[ProductRecord]) -> Vec<DemandRecommendation> {
        let mut recommendations: Vec<DemandRecommendation> =
            records.iter().filter_map(|r| self.evaluate(r)).collect();

        recommendations.sort_by(|a, b| {
            a.urgency_level
                .rank()
                .cmp(&b.urgency_level.rank())
                .then_with(|| b.recommended_qty.cmp(&a.recommended_qty))
        });
        recommendations
    }

    /// 转换为导出行（序号从 1 开始，保持建议顺序）
    pub fn export_rows(&self, recommendations: &[DemandRecommendation]) -> Vec<DemandExportRow> {
        recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| DemandExportRow {
                index: i + 1,
                brand_name: rec.brand_name.clone(),
                wholesale_rate: rec.wholesale_rate,
                quantity_in_stock: rec.current_stock_qty,
                quantity_to_demand: rec.recommended_qty,
            })
            .collect()
    }
}
