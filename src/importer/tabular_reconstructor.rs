// ==========================================
// 酒类库存销售分析 - 有表头表格重建器
// ==========================================
// 流程: 列分类 → 行过滤 → 全局锚点 → 逐行重建 → 指标计算
// 行级失败: 记录 RowIssue 并继续；全部失败 → NoValidRows
// ==========================================

use crate::domain::product::{ProductRecord, RowIssue};
use crate::domain::types::{DataFidelity, SheetFormat};
use crate::engine::anchor_resolver::{AnchorDateResolver, StockSeries};
use crate::engine::metrics::{resolve_rates, MetricCalculator, MetricInput};
use crate::importer::column_classifier::{build_layout, ColumnLayout};
use crate::importer::data_cleaner::{
    coerce_number_or_zero, is_present, leading_integer,
};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::format_detector::TabularSheet;
use crate::importer::row_filter::{filter_rows, RetainedRow};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// 重建结果（两条路径共用）
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    pub format: SheetFormat,
    pub anchor_date: Option<String>,
    pub records: Vec<ProductRecord>,
    pub issues: Vec<RowIssue>,
    /// 源数据行数
    pub total_rows: usize,
    /// 过滤后保留行数
    pub retained_rows: usize,
}

/// TabularReconstructor - 逐行重建商品时间序列
#[derive(Debug, Default)]
pub struct TabularReconstructor {
    anchor_resolver: AnchorDateResolver,
    calculator: MetricCalculator,
}

impl TabularReconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconstruct(&self, sheet: &TabularSheet) -> ImportResult<Reconstruction> {
        let layout = build_layout(&sheet.headers)?;
        let retained = filter_rows(&sheet.rows, layout.brand)?;
        let labels = layout.date_labels();

        let series: Vec<StockSeries> = retained
            .iter()
            .map(|row| present_series(row, &layout))
            .collect();

        let anchor = self
            .anchor_resolver
            .resolve(&labels, &series)
            .ok_or_else(|| ImportError::InternalError("日期列为空，无法确定锚点".to_string()))?;
        let anchor_date = anchor.anchor_date;

        let mut records = Vec::with_capacity(retained.len());
        let mut issues = Vec::new();

        for (row, present) in retained.iter().zip(series.iter()) {
            match self.reconstruct_row(row, present, &layout, &anchor_date) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    warn!(row_number = row.row_number, brand = %row.brand_name, reason = %reason, "跳过数据行");
                    issues.push(RowIssue {
                        row_number: row.row_number,
                        brand_name: Some(row.brand_name.clone()),
                        reason,
                    });
                }
            }
        }

        info!(
            anchor = %anchor_date,
            records = records.len(),
            skipped = issues.len(),
            "有表头表格重建完成"
        );

        if records.is_empty() {
            return Err(ImportError::NoValidRows);
        }

        Ok(Reconstruction {
            format: SheetFormat::Tabular,
            anchor_date: Some(anchor_date),
            records,
            issues,
            total_rows: sheet.rows.len(),
            retained_rows: retained.len(),
        })
    }

    fn reconstruct_row(
        &self,
        row: &RetainedRow<'_>,
        present: &StockSeries,
        layout: &ColumnLayout,
        anchor_date: &str,
    ) -> Result<ProductRecord, String> {
        // 负数读数保留在序列中，但不计入有效读数
        let valid: Vec<(&String, f64)> = present
            .readings
            .iter()
            .filter(|(_, v)| **v >= 0.0)
            .map(|(d, v)| (d, *v))
            .collect();

        let (last_date, last_stock) = match valid.last() {
            Some((d, v)) => ((*d).clone(), *v),
            None => return Err("无有效库存读数".to_string()),
        };

        let daily_stock: BTreeMap<String, f64> = layout
            .dates
            .iter()
            .map(|d| {
                let value = present.readings.get(&d.label).copied().unwrap_or(0.0);
                (d.label.clone(), value)
            })
            .collect();

        let mut anchor_stock = daily_stock.get(anchor_date).copied().unwrap_or(0.0);
        if anchor_stock == 0.0 {
            anchor_stock = valid
                .iter()
                .take_while(|(d, _)| d.as_str() <= anchor_date)
                .last()
                .map(|(_, v)| *v)
                .unwrap_or(0.0);
        }

        let index_number = layout
            .index
            .and_then(|col| leading_integer(row.cells.get(col)))
            .unwrap_or(row.row_number as i64);

        let rates = resolve_rates(
            layout
                .wholesale_rate
                .map(|col| coerce_number_or_zero(row.cells.get(col)))
                .unwrap_or(0.0),
            layout
                .selling_rate
                .map(|col| coerce_number_or_zero(row.cells.get(col)))
                .unwrap_or(0.0),
        );

        let metrics = self.calculator.compute(&MetricInput {
            anchor_stock,
            last_stock,
            present_readings: valid.len(),
            selling_rate: rates.selling_rate,
        });

        Ok(ProductRecord {
            brand_name: row.brand_name.clone(),
            product_id: format!("ID_{}", index_number),
            index_number,
            wholesale_rate: rates.wholesale_rate,
            selling_rate: rates.selling_rate,
            daily_stock,
            anchor_date: Some(anchor_date.to_string()),
            anchor_stock,
            last_date: Some(last_date),
            last_stock,
            fidelity: DataFidelity::TimeSeries,
            metrics,
        })
    }
}

/// 单行中源表存在的日期读数（无法解析记为 0）
fn present_series(row: &RetainedRow<'_>, layout: &ColumnLayout) -> StockSeries {
    let readings = layout
        .dates
        .iter()
        .filter(|d| is_present(row.cells.get(d.column)))
        .map(|d| (d.label.clone(), coerce_number_or_zero(row.cells.get(d.column))))
        .collect();

    StockSeries {
        brand_name: row.brand_name.clone(),
        readings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::raw_table::RawCell;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn num(v: f64) -> RawCell {
        RawCell::Number(v)
    }

    #[test]
    fn test_single_brand_scenario() {
        let sheet = TabularSheet {
            headers: headers(&["Brand Name", "Selling Rate", "25-Aug", "26-Aug"]),
            rows: vec![vec![RawCell::text("X"), num(50.0), num(100.0), num(90.0)]],
        };
        let result = TabularReconstructor::new().reconstruct(&sheet).unwrap();
        let record = &result.records[0];

        assert_eq!(result.anchor_date.as_deref(), Some("25-Aug"));
        assert_eq!(record.wholesale_rate, 45.0);
        assert_eq!(record.anchor_stock, 100.0);
        assert_eq!(record.last_date.as_deref(), Some("26-Aug"));
        assert_eq!(record.metrics.total_sales_qty, 10.0);
        assert_eq!(record.index_number, 1);
        assert_eq!(record.product_id, "ID_1");
    }

    #[test]
    fn test_row_without_readings_is_skipped() {
        let sheet = TabularSheet {
            headers: headers(&["Brand Name", "Rate", "01-Sep", "02-Sep"]),
            rows: vec![
                vec![RawCell::text("A"), num(10.0), RawCell::Empty, RawCell::Empty],
                vec![RawCell::text("B"), num(10.0), num(5.0), num(4.0)],
            ],
        };
        let result = TabularReconstructor::new().reconstruct(&sheet).unwrap();

        assert_eq!(result.records.len(), 1);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].row_number, 1);
        assert_eq!(result.retained_rows, 2);
    }

    #[test]
    fn test_all_rows_invalid() {
        let sheet = TabularSheet {
            headers: headers(&["Brand Name", "Rate", "01-Sep"]),
            rows: vec![vec![RawCell::text("A"), num(10.0), RawCell::Empty]],
        };
        assert!(matches!(
            TabularReconstructor::new().reconstruct(&sheet),
            Err(ImportError::NoValidRows)
        ));
    }

    #[test]
    fn test_missing_and_unparseable_cells() {
        let sheet = TabularSheet {
            headers: headers(&["Brand Name", "Rate", "01-Sep", "02-Sep", "03-Sep"]),
            rows: vec![vec![
                RawCell::text("A"),
                num(10.0),
                num(30.0),
                RawCell::text("n/a"),
                RawCell::Empty,
            ]],
        };
        let result = TabularReconstructor::new().reconstruct(&sheet).unwrap();
        let record = &result.records[0];

        assert_eq!(record.daily_stock.len(), 3);
        assert_eq!(record.daily_stock["02-Sep"], 0.0);
        assert_eq!(record.daily_stock["03-Sep"], 0.0);
        // 无法解析的单元格仍计入有效读数
        assert_eq!(record.last_date.as_deref(), Some("02-Sep"));
        assert_eq!(record.metrics.days_analyzed, 1);
        assert_eq!(record.metrics.total_sales_qty, 30.0);
    }

    #[test]
    fn test_anchor_stock_falls_back_to_previous_reading() {
        // B 在锚点日无读数，取锚点之前最近读数
        let sheet = TabularSheet {
            headers: headers(&["Brand Name", "Rate", "01-Sep", "02-Sep", "03-Sep"]),
            rows: vec![
                vec![RawCell::text("A"), num(10.0), num(5.0), num(9.0), num(8.0)],
                vec![RawCell::text("B"), num(10.0), num(40.0), RawCell::Empty, num(30.0)],
            ],
        };
        let result = TabularReconstructor::new().reconstruct(&sheet).unwrap();

        assert_eq!(result.anchor_date.as_deref(), Some("02-Sep"));
        let b = &result.records[1];
        assert_eq!(b.anchor_stock, 40.0);
        assert_eq!(b.metrics.total_sales_qty, 10.0);
    }

    #[test]
    fn test_index_column_digits() {
        let sheet = TabularSheet {
            headers: headers(&["Sl No", "Brand Name", "Rate", "01-Sep"]),
            rows: vec![vec![
                RawCell::text("No. 17"),
                RawCell::text("A"),
                num(10.0),
                num(5.0),
            ]],
        };
        let result = TabularReconstructor::new().reconstruct(&sheet).unwrap();
        assert_eq!(result.records[0].index_number, 17);
        assert_eq!(result.records[0].product_id, "ID_17");
    }
}
