// ==========================================
// 酒类库存销售分析 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 前五类为面向客户端的业务错误，其余为文件/落库/内部错误
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 表格结构错误 =====
    #[error("无法识别的文件格式: 既不是有效的 Excel 文件，也不是有效的 CSV 文件 ({0})")]
    UnrecognizedFormat(String),

    #[error("缺少必需列: {column}")]
    MissingRequiredColumn { column: String },

    #[error("过滤后没有有效的品牌数据行")]
    EmptyDataset,

    #[error("数值数据不足: 期望至少 {expected} 个数值，实际 {found} 个")]
    InsufficientData { expected: usize, found: usize },

    #[error("所有数据行均无法重建库存序列")]
    NoValidRows,

    // ===== 文件相关错误 =====
    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFileType(String),

    #[error("上传的文件为空")]
    EmptyFile,

    // ===== 落库错误 =====
    #[error("数据落库失败: {0}")]
    Persistence(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ImportError {
    /// 是否为面向客户端的输入错误（可直接展示原因）
    pub fn is_client_facing(&self) -> bool {
        matches!(
            self,
            ImportError::UnrecognizedFormat(_)
                | ImportError::MissingRequiredColumn { .. }
                | ImportError::EmptyDataset
                | ImportError::InsufficientData { .. }
                | ImportError::NoValidRows
                | ImportError::UnsupportedFileType(_)
                | ImportError::EmptyFile
        )
    }

    /// 稳定错误码（供传输层映射）
    pub fn code(&self) -> &'static str {
        match self {
            ImportError::UnrecognizedFormat(_) => "UNRECOGNIZED_FORMAT",
            ImportError::MissingRequiredColumn { .. } => "MISSING_REQUIRED_COLUMN",
            ImportError::EmptyDataset => "EMPTY_DATASET",
            ImportError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            ImportError::NoValidRows => "NO_VALID_ROWS",
            ImportError::UnsupportedFileType(_) => "UNSUPPORTED_FILE_TYPE",
            ImportError::EmptyFile => "EMPTY_FILE",
            ImportError::Persistence(_) => "PERSISTENCE_ERROR",
            ImportError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
