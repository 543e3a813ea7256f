// ==========================================
// 酒类库存销售分析 - 表格格式识别器
// ==========================================
// 规则: 列数 >= 3 且任一表头（小写、去空白）包含品牌识别词 → Tabular
//       否则 → HeaderlessList（整表含首行按平铺列表处理）
// ==========================================

use crate::domain::types::SheetFormat;
use crate::importer::raw_table::{RawCell, RawTable};
use tracing::debug;

/// 品牌识别词
pub const BRAND_TERMS: [&str; 4] = ["brand name", "brand_name", "product", "name"];

/// 最少列数
pub const MIN_TABULAR_COLUMNS: usize = 3;

/// 有表头表格
#[derive(Debug, Clone, PartialEq)]
pub struct TabularSheet {
    /// 去空白后的表头
    pub headers: Vec<String>,
    /// 数据行（不含表头）
    pub rows: Vec<Vec<RawCell>>,
}

/// 格式识别结果：每种变体对应一个专用重建器
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFormat {
    Tabular(TabularSheet),
    HeaderlessList(Vec<Vec<RawCell>>),
}

impl ParsedFormat {
    pub fn format(&self) -> SheetFormat {
        match self {
            ParsedFormat::Tabular(_) => SheetFormat::Tabular,
            ParsedFormat::HeaderlessList(_) => SheetFormat::HeaderlessList,
        }
    }
}

/// 表头是否含品牌识别词
pub fn is_brand_header(header: &str) -> bool {
    let lower = header.trim().to_lowercase();
    !lower.is_empty() && BRAND_TERMS.iter().any(|term| lower.contains(term))
}

/// 识别表格格式
pub fn detect(table: RawTable) -> ParsedFormat {
    let headers = table.header().unwrap_or_default();
    let is_tabular =
        headers.len() >= MIN_TABULAR_COLUMNS && headers.iter().any(|h| is_brand_header(h));

    if is_tabular {
        debug!(columns = headers.len(), "识别为有表头表格");
        let rows = table.rows.into_iter().skip(1).collect();
        ParsedFormat::Tabular(TabularSheet { headers, rows })
    } else {
        debug!(columns = headers.len(), "识别为无表头列表");
        ParsedFormat::HeaderlessList(table.rows)
    }
}
