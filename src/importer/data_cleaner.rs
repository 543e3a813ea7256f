// ==========================================
// 酒类库存销售分析 - 单元格清洗与数值转换
// ==========================================
// 职责: TRIM / NULL 标准化 / 容错数值转换（去千分位）
// ==========================================

use crate::importer::raw_table::RawCell;

/// 单元格是否在源表中存在（非空、非空白）
pub fn is_present(cell: Option<&RawCell>) -> bool {
    cell.map(|c| !c.is_empty()).unwrap_or(false)
}

/// 清洗文本（TRIM），空白返回 None
pub fn normalize_text(cell: Option<&RawCell>) -> Option<String> {
    let cell = cell?;
    let text = cell.to_string();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 解析数值文本（去千分位逗号），非有限数值返回 None
pub fn parse_number_text(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 容错数值转换：缺失或无法解析返回 None
pub fn coerce_number(cell: Option<&RawCell>) -> Option<f64> {
    match cell? {
        RawCell::Empty => None,
        RawCell::Number(v) if v.is_finite() => Some(*v),
        RawCell::Number(_) => None,
        RawCell::Text(s) => parse_number_text(s),
    }
}

/// 容错数值转换：缺失或无法解析记为 0
pub fn coerce_number_or_zero(cell: Option<&RawCell>) -> f64 {
    coerce_number(cell).unwrap_or(0.0)
}

/// 提取首段连续数字（用于序号列，如 "No. 12" → 12）
pub fn leading_integer(cell: Option<&RawCell>) -> Option<i64> {
    match cell? {
        RawCell::Empty => None,
        RawCell::Number(v) if v.is_finite() => Some(v.trunc() as i64),
        RawCell::Number(_) => None,
        RawCell::Text(s) => {
            let digits: String = s
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .take_while(|c| c.is_ascii_digit())
                .collect();
            digits.parse::<i64>().ok()
        }
    }
}
