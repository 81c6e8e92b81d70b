// ==========================================
// 车队维保系统 - 领域模型层
// ==========================================
// 职责: 定义车辆快照、维保记录、计划维保、备件等领域实体
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod maintenance;
pub mod part;
pub mod types;
pub mod vehicle;

// 重导出核心类型
pub use maintenance::{IntervalThresholds, MaintenanceOccurrence, PlannedOccurrence};
pub use part::{PartNaturalKey, PartRecord, PartRequirement, VehiclePartKey};
pub use types::{DueSignal, UnknownHoursPolicy};
pub use vehicle::{Vehicle, VehicleSnapshot};
