// ==========================================
// 酒类库存销售分析 - 核心库
// ==========================================
// 职责: 上传库存表 → 重建销售序列 → 积压 / 补货决策支持
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 商品记录 / 批次 / 分析结果
pub mod domain;

// 仓储层 - 当前批次整体替换与读取
pub mod repository;

// 引擎层 - 锚点 / 指标 / 积压 / 补货 / 汇总
pub mod engine;

// 导入层 - Excel/CSV → 商品记录
pub mod importer;

// 配置层 - 分析参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志 (tracing)
pub mod logging;

// API 层 - 上传 / 分析 / 导出
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::types::{ColumnRole, DataFidelity, SheetFormat, UrgencyLevel};

pub use domain::{
    AnalyticsSummary, BatchMeta, ChartsData, DemandRecommendation, ImportReport, OverstockEntry,
    ProductBatch, ProductRecord, SalesMetrics,
};

// 引擎
pub use engine::{
    AnalyticsEngine, AnchorDateResolver, DemandRecommender, MetricCalculator, OverstockClassifier,
};

// 导入
pub use importer::{ImportError, InventoryImporter, InventoryImporterImpl};

// API
pub use api::{AnalyticsApi, ApiError, ExportApi, ImportApi};

// ==========================================
// 常量定义
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "酒类库存销售分析";
