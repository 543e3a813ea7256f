// ==========================================
// 酒类库存销售分析 - 领域类型定义
// ==========================================
// 职责: 表格格式、列语义角色、补货紧急等级、数据精度标记
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 表格格式 (Sheet Format)
// ==========================================
// 由格式识别器一次性判定，每种格式对应唯一的重建器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SheetFormat {
    Tabular,        // 有表头，含品牌列 + 日期库存列
    HeaderlessList, // 无表头，名称与数字平铺
}

impl fmt::Display for SheetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetFormat::Tabular => write!(f, "TABULAR"),
            SheetFormat::HeaderlessList => write!(f, "HEADERLESS_LIST"),
        }
    }
}

impl SheetFormat {
    /// 从数据库字符串解析（未知值返回 None）
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value.trim() {
            "TABULAR" => Some(SheetFormat::Tabular),
            "HEADERLESS_LIST" => Some(SheetFormat::HeaderlessList),
            _ => None,
        }
    }
}

// ==========================================
// 列语义角色 (Column Role)
// ==========================================
// DateReading 保留原始表头文本，后续作为时间序列键并按字符串排序
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "label", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnRole {
    BrandName,
    Index,
    WholesaleRate,
    SellingRate,
    DateReading(String),
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::BrandName => write!(f, "BRAND_NAME"),
            ColumnRole::Index => write!(f, "INDEX"),
            ColumnRole::WholesaleRate => write!(f, "WHOLESALE_RATE"),
            ColumnRole::SellingRate => write!(f, "SELLING_RATE"),
            ColumnRole::DateReading(label) => write!(f, "DATE_READING({})", label),
        }
    }
}

// ==========================================
// 补货紧急等级 (Urgency Level)
// ==========================================
// 顺序: High < Medium < Low < None（排序时 High 排最前）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UrgencyLevel {
    High,   // 库存不足 10 天
    Medium, // 库存不足 20 天
    Low,    // 库存不足 30 天
    None,   // 库存充足
}

impl UrgencyLevel {
    /// 按库存可售天数判定紧急等级
    pub fn from_stock_days(stock_available_days: f64) -> Self {
        if stock_available_days < 10.0 {
            UrgencyLevel::High
        } else if stock_available_days < 20.0 {
            UrgencyLevel::Medium
        } else if stock_available_days < 30.0 {
            UrgencyLevel::Low
        } else {
            UrgencyLevel::None
        }
    }

    /// 排序权重（越小越紧急）
    pub fn rank(&self) -> u8 {
        match self {
            UrgencyLevel::High => 1,
            UrgencyLevel::Medium => 2,
            UrgencyLevel::Low => 3,
            UrgencyLevel::None => 4,
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyLevel::High => write!(f, "HIGH"),
            UrgencyLevel::Medium => write!(f, "MEDIUM"),
            UrgencyLevel::Low => write!(f, "LOW"),
            UrgencyLevel::None => write!(f, "NONE"),
        }
    }
}

// ==========================================
// 数据精度 (Data Fidelity)
// ==========================================
// TimeSeries: 由日期库存序列重建
// Estimated: 无表头列表的粗略估算，不可与 TimeSeries 结果混用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataFidelity {
    TimeSeries,
    Estimated,
}

impl fmt::Display for DataFidelity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataFidelity::TimeSeries => write!(f, "TIME_SERIES"),
            DataFidelity::Estimated => write!(f, "ESTIMATED"),
        }
    }
}

impl DataFidelity {
    pub fn from_db_str(value: &str) -> Option<Self> {
        match value.trim() {
            "TIME_SERIES" => Some(DataFidelity::TimeSeries),
            "ESTIMATED" => Some(DataFidelity::Estimated),
            _ => None,
        }
    }
}
