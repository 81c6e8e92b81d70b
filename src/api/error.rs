// ==========================================
// 车队维保系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户友好的错误消息
// ==========================================

use crate::engine::error::{MaintenanceError, ReconcileError};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据状态非法: {0}")]
    InvalidState(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    /// 备件核对失败（携带第一条失败需求的位置）
    #[error("备件核对失败: 第{index}条需求({part})未能保存: {message}")]
    ReconcileFailed {
        index: usize,
        part: String,
        message: String,
    },

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导入错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将Repository层的技术错误转换为用户友好的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
        }
    }
}

impl From<MaintenanceError> for ApiError {
    fn from(err: MaintenanceError) -> Self {
        match err {
            MaintenanceError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            MaintenanceError::InvalidState(msg) => ApiError::InvalidState(msg),
            MaintenanceError::StoreFailure(repo_err) => repo_err.into(),
        }
    }
}

impl From<ReconcileError> for ApiError {
    fn from(err: ReconcileError) -> Self {
        ApiError::ReconcileFailed {
            index: err.index,
            part: err.key.to_string(),
            message: err.source.to_string(),
        }
    }
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        ApiError::ImportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::part::PartRequirement;

    #[test]
    fn test_repository_error_conversion() {
        let repo_err = RepositoryError::NotFound {
            entity: "PartRecord".to_string(),
            id: "P001".to_string(),
        };
        let api_err: ApiError = repo_err.into();
        match api_err {
            ApiError::NotFound(msg) => {
                assert!(msg.contains("PartRecord"));
                assert!(msg.contains("P001"));
            }
            _ => panic!("Expected NotFound"),
        }
    }

    #[test]
    fn test_maintenance_error_conversion() {
        let api_err: ApiError = MaintenanceError::vehicle_not_found("VIN404").into();
        assert!(matches!(api_err, ApiError::NotFound(ref msg) if msg.contains("VIN404")));

        let api_err: ApiError = MaintenanceError::StoreFailure(RepositoryError::DatabaseQueryError(
            "disk I/O error".to_string(),
        ))
        .into();
        assert!(matches!(api_err, ApiError::DatabaseError(_)));
    }

    #[test]
    fn test_field_value_error_conversion() {
        let api_err: ApiError = RepositoryError::FieldValueError {
            field: "quantity".to_string(),
            message: "累加后数量溢出".to_string(),
        }
        .into();
        assert!(matches!(api_err, ApiError::InvalidInput(ref msg) if msg.contains("quantity")));
    }

    #[test]
    fn test_reconcile_error_conversion() {
        let err = ReconcileError {
            index: 2,
            key: PartRequirement::new("Oil Filter", "Bosch", "OF1", 1).natural_key(),
            source: RepositoryError::LockError("poisoned".to_string()),
        };
        let api_err: ApiError = err.into();
        let msg = api_err.to_string();
        assert!(msg.contains("第2条"));
        assert!(msg.contains("Oil Filter/Bosch/OF1"));
    }
}
