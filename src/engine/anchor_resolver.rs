// ==========================================
// 酒类库存销售分析 - 锚点日期解析器
// ==========================================
// 锚点: 全批次共享的补货日，作为销售观测窗口起点
// 规则: 按排序后的日期标签逐对扫描，每对内按行顺序扫描；
//       首个"后一日读数 > 前一日读数"的 (日期对, 行) 将锚点定为后一日
// 兜底: 全表无补货 → 字典序首个日期标签
// ==========================================

use std::collections::BTreeMap;
use tracing::info;

/// 单行的有效库存读数（仅含源表中存在的单元格）
#[derive(Debug, Clone, PartialEq)]
pub struct StockSeries {
    pub brand_name: String,
    pub readings: BTreeMap<String, f64>,
}

/// 触发锚点的补货事件
#[derive(Debug, Clone, PartialEq)]
pub struct ReplenishmentEvent {
    pub brand_name: String,
    pub previous_date: String,
    pub previous_stock: f64,
    pub stock: f64,
}

/// 锚点解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAnchor {
    pub anchor_date: String,
    /// None 表示未检测到补货，使用首个日期兜底
    pub event: Option<ReplenishmentEvent>,
}

/// AnchorDateResolver - 锚点日期解析器
#[derive(Debug, Default)]
pub struct AnchorDateResolver;

impl AnchorDateResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析全局锚点
    ///
    /// # 参数
    /// - sorted_labels: 已按字符串排序的日期标签
    /// - series: 过滤后保留行的读数（保持行顺序）
    ///
    /// # 返回
    /// - None: 无日期标签
    pub fn resolve(&self, sorted_labels: &[String], series: &[StockSeries]) -> Option<ResolvedAnchor> {
        let first = sorted_labels.first()?;

        for pair in sorted_labels.windows(2) {
            let (prev_date, curr_date) = (&pair[0], &pair[1]);

            for row in series {
                let (Some(&prev), Some(&curr)) =
                    (row.readings.get(prev_date), row.readings.get(curr_date))
                else {
                    continue;
                };

                if curr > prev {
                    info!(
                        anchor = %curr_date,
                        brand = %row.brand_name,
                        previous = prev,
                        current = curr,
                        "检测到补货，确定全局锚点"
                    );
                    return Some(ResolvedAnchor {
                        anchor_date: curr_date.clone(),
                        event: Some(ReplenishmentEvent {
                            brand_name: row.brand_name.clone(),
                            previous_date: prev_date.clone(),
                            previous_stock: prev,
                            stock: curr,
                        }),
                    });
                }
            }
        }

        info!(anchor = %first, "未检测到补货，使用首个日期作为锚点");
        Some(ResolvedAnchor {
            anchor_date: first.clone(),
            event: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(brand: &str, readings: &[(&str, f64)]) -> StockSeries {
        StockSeries {
            brand_name: brand.to_string(),
            readings: readings
                .iter()
                .map(|(d, v)| (d.to_string(), *v))
                .collect(),
        }
    }

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_no_labels() {
        assert_eq!(AnchorDateResolver::new().resolve(&[], &[]), None);
    }

    #[test]
    fn test_earliest_pair_wins_over_row_order() {
        let l = labels(&["01-Sep", "02-Sep", "03-Sep"]);
        let rows = vec![
            series("A", &[("01-Sep", 10.0), ("02-Sep", 9.0), ("03-Sep", 20.0)]),
            series("B", &[("01-Sep", 5.0), ("02-Sep", 8.0), ("03-Sep", 7.0)]),
        ];
        let r = AnchorDateResolver::new().resolve(&l, &rows).unwrap();
        assert_eq!(r.anchor_date, "02-Sep");
        assert_eq!(r.event.unwrap().brand_name, "B");
    }

    #[test]
    fn test_first_row_within_pair() {
        let l = labels(&["01-Sep", "02-Sep"]);
        let rows = vec![
            series("A", &[("01-Sep", 1.0), ("02-Sep", 2.0)]),
            series("B", &[("01-Sep", 1.0), ("02-Sep", 5.0)]),
        ];
        let r = AnchorDateResolver::new().resolve(&l, &rows).unwrap();
        assert_eq!(r.event.unwrap().brand_name, "A");
    }

    #[test]
    fn test_missing_reading_breaks_pair() {
        let l = labels(&["01-Sep", "02-Sep", "03-Sep"]);
        let rows = vec![series("A", &[("01-Sep", 1.0), ("03-Sep", 5.0)])];
        let r = AnchorDateResolver::new().resolve(&l, &rows).unwrap();
        assert_eq!(r.anchor_date, "01-Sep");
        assert!(r.event.is_none());
    }

    #[test]
    fn test_equal_readings_are_not_increase() {
        let l = labels(&["01-Sep", "02-Sep"]);
        let rows = vec![series("A", &[("01-Sep", 5.0), ("02-Sep", 5.0)])];
        let r = AnchorDateResolver::new().resolve(&l, &rows).unwrap();
        assert_eq!(r.anchor_date, "01-Sep");
    }
}
