// ==========================================
// 车队维保系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供展示层调用
// ==========================================

pub mod error;
pub mod maintenance_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use maintenance_api::{MaintenanceApi, SweepFailureInfo, SweepSummary};
