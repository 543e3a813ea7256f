// ==========================================
// 酒类库存销售分析 - 导入层
// ==========================================
// 职责: 上传文件 → 商品记录批次
// 支持: Excel (.xlsx/.xls), CSV
// ==========================================

pub mod column_classifier;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod format_detector;
pub mod headerless_reconstructor;
pub mod inventory_importer_impl;
pub mod inventory_importer_trait;
pub mod raw_table;
pub mod row_filter;
pub mod tabular_reconstructor;

// 重导出核心类型
pub use column_classifier::{build_layout, classify_columns, ColumnLayout};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use format_detector::{detect, ParsedFormat, TabularSheet};
pub use headerless_reconstructor::HeaderlessReconstructor;
pub use inventory_importer_impl::{reconstruct_from_bytes, reconstruct_table, InventoryImporterImpl};
pub use inventory_importer_trait::InventoryImporter;
pub use raw_table::{RawCell, RawTable};
pub use tabular_reconstructor::{Reconstruction, TabularReconstructor};
