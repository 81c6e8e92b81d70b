// ==========================================
// 车队维保系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod collaborators;
pub mod error;
pub mod occurrence_repo;
pub mod part_repo;
pub mod planned_repo;
pub mod vehicle_repo;

// 重导出核心仓储
pub use collaborators::{OccurrenceReader, PartStore, PlannedWriter, VehicleReader};
pub use error::{RepositoryError, RepositoryResult};
pub use occurrence_repo::OccurrenceRepository;
pub use part_repo::PartRepository;
pub use planned_repo::PlannedOccurrenceRepository;
pub use vehicle_repo::VehicleRepository;
