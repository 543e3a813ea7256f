// ==========================================
// 酒类库存销售分析 - 无表头列表重建器（降级路径）
// ==========================================
// 输入: 整表单元格按行展开
// 规则: 可解析为数值的单元格 → 数值序列；其余 → 品牌名
//       每个品牌按展开顺序消费三个数值 (product_id, rate, quantity)
// 精度: 指标为粗略估算，记录标记为 DataFidelity::Estimated
// ==========================================

use crate::domain::product::{ProductRecord, SalesMetrics};
use crate::domain::types::{DataFidelity, SheetFormat};
use crate::engine::metrics::WHOLESALE_RATIO;
use crate::importer::data_cleaner::parse_number_text;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::raw_table::RawCell;
use crate::importer::tabular_reconstructor::Reconstruction;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// 每个品牌消费的数值个数
pub const VALUES_PER_BRAND: usize = 3;

/// 锚点库存金额估算系数
const ANCHOR_VALUE_FACTOR: f64 = 1.1;

/// 展开后的单元格分组
#[derive(Debug, Clone, PartialEq, Default)]
struct FlattenedCells {
    brands: Vec<String>,
    numbers: Vec<f64>,
}

fn flatten(rows: &[Vec<RawCell>]) -> FlattenedCells {
    let mut flat = FlattenedCells::default();

    for cell in rows.iter().flatten() {
        let text = cell.to_string();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let number = match cell {
            RawCell::Number(v) if v.is_finite() => Some(*v),
            _ => parse_number_text(text),
        };

        match number {
            Some(v) => flat.numbers.push(v),
            // "1.2.3" 这类纯数字点号串既不是数值也不是品牌
            None if text.chars().all(|c| c.is_ascii_digit() || c == '.') => {}
            None => flat.brands.push(text.to_string()),
        }
    }
    flat
}

fn format_product_id(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// 估算指标
fn estimate_metrics(rate: f64, quantity: i64) -> SalesMetrics {
    let monthly_sales_qty = (quantity.div_euclid(4)).max(1);
    let monthly_sales_value = monthly_sales_qty as f64 * rate;
    let stock_value_today = rate * quantity as f64;

    let stock_available_days = if quantity > 0 {
        (quantity / (quantity / 30).max(1)).max(1) as f64
    } else {
        0.0
    };

    SalesMetrics {
        total_sales_qty: 0.0,
        days_analyzed: 1,
        avg_daily_sales_qty: 0.0,
        monthly_sales_qty: monthly_sales_qty as f64,
        monthly_sales_value,
        current_stock_qty: quantity,
        stock_value_today,
        stock_value_at_anchor: stock_value_today * ANCHOR_VALUE_FACTOR,
        stock_ratio: stock_value_today / monthly_sales_value.max(1.0),
        stock_available_days,
    }
}

/// HeaderlessReconstructor - 平铺列表重建器
#[derive(Debug, Default)]
pub struct HeaderlessReconstructor;

impl HeaderlessReconstructor {
    pub fn new() -> Self {
        Self
    }

    pub fn reconstruct(&self, rows: &[Vec<RawCell>]) -> ImportResult<Reconstruction> {
        let flat = flatten(rows);

        if flat.brands.is_empty() && flat.numbers.is_empty() {
            return Err(ImportError::EmptyDataset);
        }

        let expected = flat.brands.len() * VALUES_PER_BRAND;
        if flat.brands.is_empty() || flat.numbers.len() < expected {
            warn!(
                brands = flat.brands.len(),
                numbers = flat.numbers.len(),
                "无表头列表数值不足"
            );
            return Err(ImportError::InsufficientData {
                expected: expected.max(VALUES_PER_BRAND),
                found: flat.numbers.len(),
            });
        }

        let records: Vec<ProductRecord> = flat
            .brands
            .iter()
            .zip(flat.numbers.chunks_exact(VALUES_PER_BRAND))
            .enumerate()
            .map(|(i, (brand, triple))| {
                // 负单价按 0 处理
                let rate = triple[1].max(0.0);
                let quantity = triple[2].trunc() as i64;

                ProductRecord {
                    brand_name: brand.clone(),
                    product_id: format_product_id(triple[0]),
                    index_number: i as i64 + 1,
                    wholesale_rate: rate * WHOLESALE_RATIO,
                    selling_rate: rate,
                    daily_stock: BTreeMap::new(),
                    anchor_date: None,
                    anchor_stock: 0.0,
                    last_date: None,
                    last_stock: quantity as f64,
                    fidelity: DataFidelity::Estimated,
                    metrics: estimate_metrics(rate, quantity),
                }
            })
            .collect();

        info!(records = records.len(), "无表头列表重建完成（估算数据）");

        if records.is_empty() {
            return Err(ImportError::NoValidRows);
        }

        Ok(Reconstruction {
            format: SheetFormat::HeaderlessList,
            anchor_date: None,
            retained_rows: records.len(),
            records,
            issues: Vec::new(),
            total_rows: rows.len(),
        })
    }
}
