// ==========================================
// 车队维保系统 - 引擎层
// ==========================================
// 职责: 实现业务规则引擎,不拼 SQL
// 红线: Engine 不拼 SQL, 判定规则必须输出 reason
// ==========================================

pub mod due_job;
pub mod error;
pub mod parts_reconciler;
pub mod sweep;

// 重导出核心引擎
pub use due_job::{days_between, BatchDecision, DueEvaluation, DueEvaluatorConfig, DueJobEvaluator};
pub use error::{MaintenanceError, MaintenanceResult, ReconcileError};
pub use parts_reconciler::{PartsReconciler, DEFAULT_STORAGE_CARD};
pub use sweep::{MaintenanceSweep, PlannedEntry, SweepFailure, SweepReport};
