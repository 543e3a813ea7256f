// ==========================================
// 酒类库存销售分析 - API 层
// ==========================================
// 职责: 传输无关的业务接口（上传 / 分析 / 导出）
// ==========================================

pub mod analytics_api;
pub mod error;
pub mod export_api;
pub mod import_api;

// 重导出核心类型
pub use analytics_api::AnalyticsApi;
pub use error::{ApiError, ApiResult};
pub use export_api::{ExportApi, ExportFile};
pub use import_api::{ImportApi, ImportApiResponse};
