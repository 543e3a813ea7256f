// ==========================================
// 分析引擎集成测试
// ==========================================
// 测试目标: 指标计算 → 积压判定 / 补货建议 / 汇总 的不变量
// ==========================================

use liquor_stock_analytics::domain::product::{ProductRecord, SalesMetrics};
use liquor_stock_analytics::domain::types::{DataFidelity, UrgencyLevel};
use liquor_stock_analytics::engine::metrics::STOCK_DAYS_SENTINEL;
use liquor_stock_analytics::engine::{
    AnalyticsEngine, AnalyticsOptions, DemandRecommender, MetricCalculator, MetricInput,
    OverstockClassifier,
};
use std::collections::BTreeMap;

fn record_from_metrics(brand: &str, index: i64, metrics: SalesMetrics) -> ProductRecord {
    ProductRecord {
        brand_name: brand.to_string(),
        product_id: format!("ID_{}", index),
        index_number: index,
        wholesale_rate: 9.0,
        selling_rate: 10.0,
        daily_stock: BTreeMap::new(),
        anchor_date: None,
        anchor_stock: 0.0,
        last_date: None,
        last_stock: metrics.current_stock_qty as f64,
        fidelity: DataFidelity::TimeSeries,
        metrics,
    }
}

/// 通过指标计算器构造记录
fn computed_record(brand: &str, index: i64, anchor: f64, last: f64, readings: usize, rate: f64) -> ProductRecord {
    let metrics = MetricCalculator::new().compute(&MetricInput {
        anchor_stock: anchor,
        last_stock: last,
        present_readings: readings,
        selling_rate: rate,
    });
    let mut record = record_from_metrics(brand, index, metrics);
    record.selling_rate = rate;
    record.wholesale_rate = rate * 0.9;
    record.anchor_stock = anchor;
    record.last_stock = last;
    record
}

/// 直接指定月销售额与库存金额
fn valued_record(brand: &str, monthly: f64, stock_value: f64) -> ProductRecord {
    record_from_metrics(
        brand,
        1,
        SalesMetrics {
            total_sales_qty: 0.0,
            days_analyzed: 1,
            avg_daily_sales_qty: 0.0,
            monthly_sales_qty: 0.0,
            monthly_sales_value: monthly,
            current_stock_qty: 0,
            stock_value_today: stock_value,
            stock_value_at_anchor: 0.0,
            stock_ratio: if monthly > 0.0 { stock_value / monthly.max(1.0) } else { 0.0 },
            stock_available_days: STOCK_DAYS_SENTINEL,
        },
    )
}

fn sample_batch() -> Vec<ProductRecord> {
    vec![
        computed_record("Old Monk", 1, 100.0, 90.0, 2, 50.0),
        computed_record("Bacardi", 2, 40.0, 40.0, 3, 100.0),
        computed_record("Magic Moments", 3, 300.0, 280.0, 5, 20.0),
        computed_record("Royal Stag", 4, 60.0, 10.0, 6, 30.0),
    ]
}

// ==========================================
// 积压判定
// ==========================================

#[test]
fn test_overstock_threshold_boundary() {
    let c = OverstockClassifier::new();
    assert!(c.evaluate(&valued_record("A", 1000.0, 2900.0), 3.0).is_none());
    assert!(c.evaluate(&valued_record("A", 1000.0, 3000.0), 3.0).is_none());

    let entry = c.evaluate(&valued_record("A", 1000.0, 3100.0), 3.0).unwrap();
    assert_eq!(entry.threshold, 3000.0);
    assert_eq!(entry.overstock_value, 100.0);
}

#[test]
fn test_overstock_multiplier_monotonic() {
    let records = sample_batch();
    let c = OverstockClassifier::new();

    let multipliers = [0.5, 1.0, 2.0, 3.0, 5.0, 10.0];
    for pair in multipliers.windows(2) {
        let loose: Vec<String> = c
            .classify(&records, pair[0])
            .into_iter()
            .map(|e| e.brand_name)
            .collect();
        let strict: Vec<String> = c
            .classify(&records, pair[1])
            .into_iter()
            .map(|e| e.brand_name)
            .collect();

        for brand in &strict {
            assert!(
                loose.contains(brand),
                "{} 在倍数 {} 下积压但在 {} 下未积压",
                brand,
                pair[1],
                pair[0]
            );
        }
    }
}

#[test]
fn test_zero_sales_never_overstocked() {
    // 无销量: 月销售额 0，库存比 0
    let record = computed_record("Bacardi", 1, 40.0, 40.0, 3, 100.0);
    assert_eq!(record.metrics.monthly_sales_value, 0.0);
    assert_eq!(record.metrics.stock_ratio, 0.0);

    let c = OverstockClassifier::new();
    for m in [0.01, 1.0, 3.0, 100.0] {
        assert!(c.evaluate(&record, m).is_none());
    }
}

// ==========================================
// 指标不变量
// ==========================================

#[test]
fn test_no_velocity_uses_sentinel() {
    let record = computed_record("Bacardi", 1, 40.0, 40.0, 3, 100.0);
    assert_eq!(record.metrics.avg_daily_sales_qty, 0.0);
    assert_eq!(record.metrics.stock_available_days, 999.0);
    assert!(DemandRecommender::new().evaluate(&record).is_none());
}

#[test]
fn test_stock_days_clamped() {
    // 日均 0.5，库存 5000 → 10000 天，钳制为 999
    let record = computed_record("Slow", 1, 5001.0, 5000.0, 3, 10.0);
    assert_eq!(record.metrics.avg_daily_sales_qty, 0.5);
    assert_eq!(record.metrics.stock_available_days, 999.0);
}

#[test]
fn test_negative_last_stock_floors_quantity() {
    let record = computed_record("Short", 1, 10.0, -5.0, 2, 10.0);
    assert_eq!(record.metrics.current_stock_qty, 0);
    assert_eq!(record.metrics.stock_available_days, 0.0);
}

// ==========================================
// 补货建议
// ==========================================

#[test]
fn test_recommendations_sorted_by_urgency_then_quantity() {
    let records = sample_batch();
    let recs = DemandRecommender::new().recommend(&records);

    for pair in recs.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.urgency_level.rank() <= b.urgency_level.rank());
        if a.urgency_level == b.urgency_level {
            assert!(a.recommended_qty >= b.recommended_qty);
        }
    }

    for rec in &recs {
        assert!(rec.recommended_qty >= 0);
        assert!(rec.recommended_qty <= rec.current_stock_qty * 2);
        assert!(rec.urgency_level != UrgencyLevel::None || rec.recommended_qty > 5);
    }

    // 同为 HIGH: Old Monk 建议 180（封顶），Royal Stag 建议 20（封顶）
    let names: Vec<_> = recs.iter().map(|r| r.brand_name.as_str()).collect();
    assert_eq!(names, vec!["Old Monk", "Royal Stag"]);
    assert_eq!(recs[1].urgency_level, UrgencyLevel::High);
    assert_eq!(recs[1].recommended_qty, 20);
}

// ==========================================
// 汇总看板
// ==========================================

#[test]
fn test_summary_consistency() {
    let records = sample_batch();
    let options = AnalyticsOptions {
        overstock_multiplier: 1.0,
        ..AnalyticsOptions::default()
    };
    let summary = AnalyticsEngine::new().summarize(&records, &options);

    assert_eq!(summary.total_brands, records.len());
    assert_eq!(summary.overstock_multiplier, 1.0);
    assert_eq!(summary.overstocked_brands, summary.overstocked_items.len());

    let expected_total: f64 = records.iter().map(|r| r.metrics.stock_value_today).sum();
    assert_eq!(summary.total_stock_value, expected_total);

    let overstock_total: f64 = summary.overstocked_items.iter().map(|e| e.overstock_value).sum();
    assert_eq!(summary.total_overstocked_value, overstock_total);

    for pair in summary.top_selling_brands.windows(2) {
        assert!(pair[0].monthly_sales_value >= pair[1].monthly_sales_value);
    }
}

#[test]
fn test_leaderboard_size_limits_charts() {
    let records = sample_batch();
    let options = AnalyticsOptions {
        leaderboard_size: 2,
        ..AnalyticsOptions::default()
    };
    let engine = AnalyticsEngine::new();

    let summary = engine.summarize(&records, &options);
    assert_eq!(summary.top_selling_brands.len(), 2);

    let charts = engine.charts(&records, &options);
    assert!(charts.volume_leaders.len() <= 2);
    assert!(charts.velocity_leaders.len() <= 2);
    assert_eq!(charts.revenue_leaders.len(), 2);
}
