// ==========================================
// 酒类库存销售分析 - 积压判定引擎
// ==========================================
// 规则: threshold = 月销售额 × multiplier
//       库存金额 > threshold 且 月销售额 > 0 → 积压
// 输出: 按 overstock_value 降序
// ==========================================

use crate::domain::analytics::OverstockEntry;
use crate::domain::product::ProductRecord;
use tracing::instrument;

/// 默认积压倍数
pub const DEFAULT_OVERSTOCK_MULTIPLIER: f64 = 3.0;

/// OverstockClassifier - 积压判定引擎（只读）
#[derive(Debug, Default)]
pub struct OverstockClassifier;

impl OverstockClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 判定单条记录，未积压返回 None
    pub fn evaluate(&self, record: &ProductRecord, multiplier: f64) -> Option<OverstockEntry> {
        let monthly = record.metrics.monthly_sales_value;
        let stock_value = record.metrics.stock_value_today;
        let threshold = monthly * multiplier;

        if monthly > 0.0 && stock_value > threshold {
            Some(OverstockEntry {
                brand_name: record.brand_name.clone(),
                current_stock_value: stock_value,
                monthly_avg_sale: monthly,
                threshold,
                overstock_value: stock_value - threshold,
                stock_ratio: record.metrics.stock_ratio,
            })
        } else {
            None
        }
    }

    /// 批量判定
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn classify(&self, records: &[ProductRecord], multiplier: f64) -> Vec<OverstockEntry> {
        let mut entries: Vec<OverstockEntry> = records
            .iter()
            .filter_map(|r| self.evaluate(r, multiplier))
            .collect();

        entries.sort_by(|a, b| b.overstock_value.total_cmp(&a.overstock_value));
        entries
    }
}
