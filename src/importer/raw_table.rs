// ==========================================
// 酒类库存销售分析 - 原始表格模型
// ==========================================
// 职责: 文件解析后的无类型单元格表格（首行为候选表头）
// ==========================================

use std::fmt;

/// 原始单元格
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    pub fn text<S: Into<String>>(value: S) -> Self {
        RawCell::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Number(_) => false,
            RawCell::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Number(v) => {
                // 整数值不带小数位输出
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            RawCell::Text(s) => write!(f, "{}", s),
        }
    }
}

/// 原始表格：首行视为候选表头，其余为数据行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<RawCell>>) -> Self {
        Self { rows }
    }

    /// 候选表头（去除首尾空白）
    pub fn header(&self) -> Option<Vec<String>> {
        self.rows
            .first()
            .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect())
    }

    /// 表头之后的数据行
    pub fn data_rows(&self) -> &[Vec<RawCell>] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
