// ==========================================
// 酒类库存销售分析 - 数据行过滤器
// ==========================================
// 剔除: 品牌为空 / 含 "total"、"sum"（不区分大小写）/ 等于裸表头文本
// ==========================================

use crate::importer::data_cleaner::normalize_text;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::raw_table::RawCell;
use tracing::{debug, info};

const SUMMARY_TERMS: [&str; 2] = ["total", "sum"];
const BARE_HEADER_LABELS: [&str; 3] = ["brand name", "name", "brand"];
// 表格工具导出的空值占位
const NULL_PLACEHOLDERS: [&str; 2] = ["nan", "none"];

/// 过滤后保留的数据行
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedRow<'a> {
    /// 源表数据行号（从 1 开始）
    pub row_number: usize,
    pub brand_name: String,
    pub cells: &'a [RawCell],
}

/// 判定品牌文本是否应被剔除
pub fn is_excluded_brand(brand: &str) -> bool {
    let lower = brand.trim().to_lowercase();
    lower.is_empty()
        || NULL_PLACEHOLDERS.contains(&lower.as_str())
        || SUMMARY_TERMS.iter().any(|t| lower.contains(t))
        || BARE_HEADER_LABELS.contains(&lower.as_str())
}

/// 按品牌列过滤数据行
pub fn filter_rows(rows: &[Vec<RawCell>], brand_column: usize) -> ImportResult<Vec<RetainedRow<'_>>> {
    let mut retained = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let brand = match normalize_text(row.get(brand_column)) {
            Some(b) if !is_excluded_brand(&b) => b,
            other => {
                debug!(row_number = idx + 1, brand = ?other, "剔除数据行");
                continue;
            }
        };

        retained.push(RetainedRow {
            row_number: idx + 1,
            brand_name: brand,
            cells: row.as_slice(),
        });
    }

    info!(total = rows.len(), retained = retained.len(), "数据行过滤完成");

    if retained.is_empty() {
        return Err(ImportError::EmptyDataset);
    }
    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(brand: &str) -> Vec<RawCell> {
        vec![RawCell::text(brand), RawCell::Number(10.0)]
    }

    #[test]
    fn test_summary_rows_excluded() {
        assert!(is_excluded_brand("Total"));
        assert!(is_excluded_brand("GRAND TOTAL"));
        assert!(is_excluded_brand("Sum of stock"));
        assert!(is_excluded_brand("brand name"));
        assert!(is_excluded_brand(" Brand "));
        assert!(is_excluded_brand("nan"));
        assert!(!is_excluded_brand("Old Monk"));
        assert!(!is_excluded_brand("Brand Name Special"));
    }

    #[test]
    fn test_filter_keeps_row_numbers() {
        let rows = vec![row("Old Monk"), row("Total"), vec![RawCell::Empty], row("Bacardi")];
        let retained = filter_rows(&rows, 0).unwrap();

        assert_eq!(retained.len(), 2);
        assert_eq!(retained[0].row_number, 1);
        assert_eq!(retained[1].row_number, 4);
        assert_eq!(retained[1].brand_name, "Bacardi");
    }

    #[test]
    fn test_filter_empty_dataset() {
        let rows = vec![row("Total"), row("  ")];
        assert!(matches!(filter_rows(&rows, 0), Err(ImportError::EmptyDataset)));
    }
}
