// ==========================================
// 车队维保系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 引擎不做本地恢复，协作方失败原样上抛
// ==========================================

use crate::domain::part::PartNaturalKey;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 到期判定/调度错误
#[derive(Error, Debug)]
pub enum MaintenanceError {
    /// 引用的车辆或维保记录在查询时不存在
    #[error("记录未找到: {entity} id={id}")]
    NotFound { entity: String, id: String },

    /// 维保记录与判定所用车辆不一致（交叉关联的数据）
    #[error("数据状态非法: {0}")]
    InvalidState(String),

    /// 存储协作方调用失败，不重试
    #[error("存储调用失败: {0}")]
    StoreFailure(#[from] RepositoryError),
}

impl MaintenanceError {
    pub fn vehicle_not_found(vehicle_id: &str) -> Self {
        MaintenanceError::NotFound {
            entity: "Vehicle".to_string(),
            id: vehicle_id.to_string(),
        }
    }
}

/// 备件核对错误
///
/// 携带第一条无法持久化的需求的下标与自然键；
/// 之前的需求已经写入存储（非事务）。
#[derive(Error, Debug)]
#[error("备件核对失败: index={index}, part={key}: {source}")]
pub struct ReconcileError {
    pub index: usize,
    pub key: PartNaturalKey,
    pub source: RepositoryError,
}

/// Result 类型别名
pub type MaintenanceResult<T> = Result<T, MaintenanceError>;
