// ==========================================
// 酒类库存销售分析 - 销售指标计算器
// ==========================================
// 纯函数: 原始读数 → 派生指标，无副作用
// 公式:
//   total_sales_qty      = max(0, anchor_stock - last_stock)
//   days_analyzed        = max(1, 有读数日期数 - 1)
//   avg_daily_sales_qty  = total_sales_qty / days_analyzed
//   monthly_sales_qty    = avg_daily_sales_qty * 24
//   monthly_sales_value  = monthly_sales_qty * selling_rate
//   stock_value_today    = last_stock * selling_rate
//   stock_ratio          = stock_value_today / max(1, monthly_sales_value)   (月销售额 > 0)
//   stock_available_days = last_stock / max(0.1, avg_daily_sales_qty)        (日均 > 0，否则 999)
// ==========================================

use crate::domain::product::SalesMetrics;

/// 商业月天数
pub const COMMERCIAL_MONTH_DAYS: f64 = 24.0;

/// 库存可售天数哨兵值 / 上限
pub const STOCK_DAYS_SENTINEL: f64 = 999.0;

/// 批发价 / 零售价固定比例
pub const WHOLESALE_RATIO: f64 = 0.9;

/// 指标计算输入
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricInput {
    pub anchor_stock: f64,
    pub last_stock: f64,
    /// 源表中存在读数的日期个数
    pub present_readings: usize,
    pub selling_rate: f64,
}

/// 价格补全结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRates {
    pub wholesale_rate: f64,
    pub selling_rate: f64,
}

/// 补全批发价/零售价：仅一方为正时按 0.9 比例推导另一方
pub fn resolve_rates(wholesale_rate: f64, selling_rate: f64) -> ResolvedRates {
    let wholesale_rate = wholesale_rate.max(0.0);
    let selling_rate = selling_rate.max(0.0);

    if wholesale_rate == 0.0 && selling_rate > 0.0 {
        ResolvedRates {
            wholesale_rate: selling_rate * WHOLESALE_RATIO,
            selling_rate,
        }
    } else if selling_rate == 0.0 && wholesale_rate > 0.0 {
        ResolvedRates {
            wholesale_rate,
            selling_rate: wholesale_rate / WHOLESALE_RATIO,
        }
    } else {
        ResolvedRates {
            wholesale_rate,
            selling_rate,
        }
    }
}

/// MetricCalculator - 销售指标计算器
#[derive(Debug, Default)]
pub struct MetricCalculator;

impl MetricCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, input: &MetricInput) -> SalesMetrics {
        let total_sales_qty = (input.anchor_stock - input.last_stock).max(0.0);
        let days_analyzed = input.present_readings.saturating_sub(1).max(1) as u32;
        let avg_daily_sales_qty = total_sales_qty / days_analyzed as f64;

        let monthly_sales_qty = avg_daily_sales_qty * COMMERCIAL_MONTH_DAYS;
        let monthly_sales_value = monthly_sales_qty * input.selling_rate;

        let stock_value_today = input.last_stock * input.selling_rate;
        let stock_value_at_anchor = input.anchor_stock * input.selling_rate;

        let stock_ratio = if monthly_sales_value > 0.0 {
            stock_value_today / monthly_sales_value.max(1.0)
        } else {
            0.0
        };

        let stock_available_days = if avg_daily_sales_qty > 0.0 {
            input.last_stock / avg_daily_sales_qty.max(0.1)
        } else {
            STOCK_DAYS_SENTINEL
        };

        SalesMetrics {
            total_sales_qty,
            days_analyzed,
            avg_daily_sales_qty,
            monthly_sales_qty,
            monthly_sales_value,
            current_stock_qty: input.last_stock.max(0.0).trunc() as i64,
            stock_value_today,
            stock_value_at_anchor,
            stock_ratio,
            stock_available_days: stock_available_days.clamp(0.0, STOCK_DAYS_SENTINEL),
        }
    }
}
