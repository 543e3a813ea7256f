// ==========================================
// 酒类库存销售分析 - 列语义分类器
// ==========================================
// 职责: 表头文本 → 列语义角色（纯函数，不依赖文件 I/O）
// 规则: 每列按优先级取首个命中规则
//   1. 品牌列: 含 "brand" 且含 "name"
//   2. 批发价: 含 "wholesale" 且含 "rate"
//   3. 零售价: 含 "rate" 且含 "selling"/"retail"
//   4. 通用价: 含 "rate" 且批发价、零售价均未分配 → 视为零售价
//   5. 序号列: 长度 <= 10 且含 "index"/"sl"/"sr"/"no"/"id"
//   6. 日期列: 含英文月份缩写
// 同一单值角色被多列命中时，后出现的列生效
// ==========================================

use crate::domain::types::ColumnRole;
use crate::importer::error::{ImportError, ImportResult};
use tracing::{info, warn};

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

pub const INDEX_TERMS: [&str; 5] = ["index", "sl", "sr", "no", "id"];

pub const MAX_INDEX_HEADER_LEN: usize = 10;

/// 日期库存列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumn {
    pub label: String,
    pub column: usize,
}

/// 列布局（分类结果）
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    /// 逐列角色，未识别为 None
    pub roles: Vec<Option<ColumnRole>>,
    pub brand: usize,
    pub index: Option<usize>,
    pub wholesale_rate: Option<usize>,
    pub selling_rate: Option<usize>,
    /// 按表头字符串排序的日期列（标签唯一）
    pub dates: Vec<DateColumn>,
}

impl ColumnLayout {
    pub fn date_labels(&self) -> Vec<String> {
        self.dates.iter().map(|d| d.label.clone()).collect()
    }
}

fn contains_month(lower: &str) -> bool {
    MONTH_ABBREVIATIONS.iter().any(|m| lower.contains(m))
}

/// 逐列分类（纯函数）
pub fn classify_columns(headers: &[String]) -> Vec<Option<ColumnRole>> {
    let mut wholesale_assigned = false;
    let mut selling_assigned = false;

    headers
        .iter()
        .map(|raw| {
            let header = raw.trim();
            let lower = header.to_lowercase();

            let role = if lower.contains("brand") && lower.contains("name") {
                Some(ColumnRole::BrandName)
            } else if lower.contains("wholesale") && lower.contains("rate") {
                Some(ColumnRole::WholesaleRate)
            } else if lower.contains("rate")
                && (lower.contains("selling") || lower.contains("retail"))
            {
                Some(ColumnRole::SellingRate)
            } else if lower.contains("rate") && !wholesale_assigned && !selling_assigned {
                Some(ColumnRole::SellingRate)
            } else if header.chars().count() <= MAX_INDEX_HEADER_LEN
                && INDEX_TERMS.iter().any(|t| lower.contains(t))
            {
                Some(ColumnRole::Index)
            } else if contains_month(&lower) {
                Some(ColumnRole::DateReading(header.to_string()))
            } else {
                None
            };

            match role {
                Some(ColumnRole::WholesaleRate) => wholesale_assigned = true,
                Some(ColumnRole::SellingRate) => selling_assigned = true,
                _ => {}
            }
            role
        })
        .collect()
}

/// 分类并校验必需列
pub fn build_layout(headers: &[String]) -> ImportResult<ColumnLayout> {
    let roles = classify_columns(headers);

    let mut brand = None;
    let mut index = None;
    let mut wholesale_rate = None;
    let mut selling_rate = None;
    let mut dates: Vec<DateColumn> = Vec::new();

    for (column, role) in roles.iter().enumerate() {
        match role {
            Some(ColumnRole::BrandName) => brand = Some(column),
            Some(ColumnRole::Index) => index = Some(column),
            Some(ColumnRole::WholesaleRate) => wholesale_rate = Some(column),
            Some(ColumnRole::SellingRate) => selling_rate = Some(column),
            Some(ColumnRole::DateReading(label)) => {
                if dates.iter().any(|d| &d.label == label) {
                    warn!(label = %label, column = column, "日期列标签重复，保留首列");
                } else {
                    dates.push(DateColumn {
                        label: label.clone(),
                        column,
                    });
                }
            }
            None => {}
        }
    }

    // 按原始表头字符串排序（不做日历解析）
    dates.sort_by(|a, b| a.label.cmp(&b.label));

    let brand = brand.ok_or_else(|| ImportError::MissingRequiredColumn {
        column: "Brand Name".to_string(),
    })?;

    if dates.is_empty() {
        return Err(ImportError::MissingRequiredColumn {
            column: "日期库存列".to_string(),
        });
    }

    info!(
        brand = %headers[brand],
        index = ?index.map(|i| &headers[i]),
        wholesale = ?wholesale_rate.map(|i| &headers[i]),
        selling = ?selling_rate.map(|i| &headers[i]),
        dates = ?dates.iter().map(|d| d.label.as_str()).collect::<Vec<_>>(),
        "列识别完成"
    );

    Ok(ColumnLayout {
        roles,
        brand,
        index,
        wholesale_rate,
        selling_rate,
        dates,
    })
}
