// ==========================================
// 酒类库存销售分析 - API层错误类型
// ==========================================
// 职责: 将导入/仓储错误转换为面向调用方的错误
// 约束: 内部错误只记录日志，不向调用方暴露细节
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;
use tracing::error;

/// 对外统一的内部错误提示
pub const INTERNAL_ERROR_MESSAGE: &str = "服务内部错误，请稍后重试";

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 业务规则错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 上传文件被拒绝（原因可直接展示）
    #[error("文件导入失败: {message}")]
    ImportRejected { code: &'static str, message: String },

    // ===== 数据访问错误 =====
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 记录内部细节并返回脱敏后的内部错误
    pub fn internal<E: std::fmt::Display>(context: &str, err: E) -> Self {
        error!(context = context, error = %err, "内部错误");
        ApiError::InternalError(INTERNAL_ERROR_MESSAGE.to_string())
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if err.is_client_facing() {
            return ApiError::ImportRejected {
                code: err.code(),
                message: err.to_string(),
            };
        }

        match err {
            ImportError::Persistence(repo_err) => ApiError::from(repo_err),
            other => ApiError::internal("import", other),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::LockError(_)
            | RepositoryError::DatabaseBusy(_)
            | RepositoryError::DatabaseQueryError(_)
            | RepositoryError::CorruptRecord { .. } => {
                error!(error = %err, "数据库访问失败");
                ApiError::DatabaseError("数据访问失败".to_string())
            }
            other => ApiError::internal("repository", other),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_facing_import_error() {
        let err = ApiError::from(ImportError::MissingRequiredColumn {
            column: "Brand Name".to_string(),
        });
        match err {
            ApiError::ImportRejected { code, message } => {
                assert_eq!(code, "MISSING_REQUIRED_COLUMN");
                assert!(message.contains("Brand Name"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_internal_error_is_masked() {
        let err = ApiError::from(ImportError::InternalError("stack detail".to_string()));
        match err {
            ApiError::InternalError(msg) => assert!(!msg.contains("stack detail")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_persistence_maps_to_database_error() {
        let err = ApiError::from(ImportError::Persistence(RepositoryError::LockError(
            "poisoned".to_string(),
        )));
        assert!(matches!(err, ApiError::DatabaseError(_)));
    }
}
