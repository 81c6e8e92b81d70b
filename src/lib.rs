// ==========================================
// 车队维保系统 - 核心库
// ==========================================
// 职责: 维保到期判定、计划维保生成、备件库存核对
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 备件清单
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DueSignal, UnknownHoursPolicy};

// 领域实体
pub use domain::{
    IntervalThresholds, MaintenanceOccurrence, PartNaturalKey, PartRecord, PartRequirement,
    PlannedOccurrence, Vehicle, VehiclePartKey, VehicleSnapshot,
};

// 引擎
pub use engine::{DueEvaluation, DueJobEvaluator, MaintenanceSweep, PartsReconciler, SweepReport};

// API
pub use api::{ApiError, MaintenanceApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车队维保系统";

// 数据库版本
pub const DB_VERSION: &str = "v1";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(DB_VERSION, format!("v{}", db::CURRENT_SCHEMA_VERSION));
    }
}
