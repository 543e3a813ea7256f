// ==========================================
// 酒类库存销售分析 - 商品记录领域模型
// ==========================================
// 职责: 单个商品的库存重建结果、销售指标、批次元数据
// 红线: 记录一经生成即不可变，后续分析只读
// ==========================================

use crate::domain::types::{DataFidelity, SheetFormat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// SalesMetrics - 派生销售/库存指标
// ==========================================
/// 由 MetricCalculator 从原始读数派生的指标集
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesMetrics {
    /// 期间销量 = max(0, 锚点库存 - 末次库存)
    pub total_sales_qty: f64,
    /// 分析天数 = max(1, 有读数的日期数 - 1)
    pub days_analyzed: u32,
    /// 日均销量
    pub avg_daily_sales_qty: f64,
    /// 月销量（24 天商业月）
    pub monthly_sales_qty: f64,
    /// 月销售额
    pub monthly_sales_value: f64,
    /// 当前库存数量（非负整数）
    pub current_stock_qty: i64,
    /// 当前库存金额
    pub stock_value_today: f64,
    /// 锚点日库存金额
    pub stock_value_at_anchor: f64,
    /// 库存比 = 库存金额 / 月销售额
    pub stock_ratio: f64,
    /// 库存可售天数，钳制在 [0, 999]
    pub stock_available_days: f64,
}

// ==========================================
// ProductRecord - 商品记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub brand_name: String,
    pub product_id: String,
    pub index_number: i64,
    pub wholesale_rate: f64,
    pub selling_rate: f64,
    /// 日期标签 → 库存读数（按标签字符串排序，缺失/无法解析记为 0）
    pub daily_stock: BTreeMap<String, f64>,
    pub anchor_date: Option<String>,
    pub anchor_stock: f64,
    pub last_date: Option<String>,
    pub last_stock: f64,
    pub fidelity: DataFidelity,
    #[serde(flatten)]
    pub metrics: SalesMetrics,
}

// ==========================================
// RowIssue - 行级重建失败记录
// ==========================================
/// 行级失败不阻断批次，仅记录用于诊断
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowIssue {
    /// 源表数据行号（从 1 开始，不含表头）
    pub row_number: usize,
    pub brand_name: Option<String>,
    pub reason: String,
}

// ==========================================
// BatchMeta / ProductBatch - 批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMeta {
    pub batch_id: String,
    pub file_name: String,
    pub format: SheetFormat,
    pub anchor_date: Option<String>,
    pub record_count: usize,
    pub skipped_rows: usize,
    pub imported_at: DateTime<Utc>,
}

/// 一次上传生成的完整批次，整体替换仓储中的旧批次
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductBatch {
    pub meta: BatchMeta,
    pub records: Vec<ProductRecord>,
}

impl ProductBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==========================================
// ImportReport - 导入结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch: BatchMeta,
    /// 源表数据行数（不含表头）
    pub total_rows: usize,
    /// 行过滤后保留的行数
    pub retained_rows: usize,
    /// 行级失败明细
    pub issues: Vec<RowIssue>,
    pub elapsed_ms: i64,
}
