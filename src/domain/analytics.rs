// ==========================================
// 酒类库存销售分析 - 分析结果领域模型
// ==========================================
// 职责: 积压、补货建议、汇总看板、图表、核算明细、导出行
// 说明: 均为派生数据，不落库
// ==========================================

use crate::domain::types::UrgencyLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 积压条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverstockEntry {
    pub brand_name: String,
    pub current_stock_value: f64,
    pub monthly_avg_sale: f64,
    pub threshold: f64,
    pub overstock_value: f64,
    pub stock_ratio: f64,
}

/// 补货建议
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRecommendation {
    pub brand_name: String,
    pub index_number: i64,
    pub selling_rate: f64,
    pub wholesale_rate: f64,
    pub current_stock_qty: i64,
    pub recommended_qty: i64,
    pub urgency_level: UrgencyLevel,
}

/// 畅销品牌摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSeller {
    pub brand_name: String,
    pub monthly_sales_value: f64,
    pub stock_value_today: f64,
    pub stock_ratio: f64,
}

/// 汇总看板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_brands: usize,
    pub total_stock_value: f64,
    pub total_overstocked_value: f64,
    pub overstocked_brands: usize,
    pub overstock_multiplier: f64,
    pub top_selling_brands: Vec<TopSeller>,
    pub overstocked_items: Vec<OverstockEntry>,
    /// 日期标签 → 全部商品库存读数合计
    pub sales_trends: BTreeMap<String, f64>,
}

// ==========================================
// 图表数据
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeLeader {
    pub name: String,
    pub value: i64,
    pub stock_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityLeader {
    pub name: String,
    pub velocity: f64,
    pub days_of_stock: f64,
    pub sales_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueLeader {
    pub name: String,
    pub value: f64,
    pub stock_value: f64,
    pub stock_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueShare {
    pub name: String,
    pub value: f64,
    pub percentage: f64,
    pub stock_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartsData {
    pub volume_leaders: Vec<VolumeLeader>,
    pub velocity_leaders: Vec<VelocityLeader>,
    pub revenue_leaders: Vec<RevenueLeader>,
    pub revenue_proportion: Vec<RevenueShare>,
}

/// 核算明细（供人工复核）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationDetail {
    pub index: i64,
    pub brand_name: String,
    pub calculated_wholesale_rate: f64,
    pub selling_rate: f64,
    pub calculated_avg_monthly_sale: f64,
    pub calculated_current_stock_value: f64,
    pub calculated_multiplier_value: f64,
    pub anchor_date: Option<String>,
    pub anchor_stock: f64,
    pub last_date: Option<String>,
    pub last_stock: f64,
    pub total_sales_qty: f64,
    pub avg_daily_sales_qty: f64,
    pub days_analyzed: u32,
    pub stock_available_days: f64,
}

/// 补货清单导出行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandExportRow {
    #[serde(rename = "Index")]
    pub index: usize,
    #[serde(rename = "Brand Name")]
    pub brand_name: String,
    #[serde(rename = "Wholesale Rate")]
    pub wholesale_rate: f64,
    #[serde(rename = "Quantity held in Stock")]
    pub quantity_in_stock: i64,
    #[serde(rename = "Quantity to be Demanded")]
    pub quantity_to_demand: i64,
}
