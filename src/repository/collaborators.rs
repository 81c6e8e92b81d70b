// ==========================================
// 车队维保系统 - 存储协作方接口
// ==========================================
// 职责: 定义引擎层依赖的窄接口（依赖倒置）
// 说明: 引擎只依赖这些 trait，SQLite 仓储是其中一种实现
// 红线: Repository 不含业务规则，只做数据读写
// ==========================================

use crate::domain::maintenance::{MaintenanceOccurrence, PlannedOccurrence};
use crate::domain::part::{PartNaturalKey, PartRecord, VehiclePartKey};
use crate::domain::vehicle::Vehicle;
use crate::repository::error::RepositoryResult;

/// 车辆读取
pub trait VehicleReader: Send + Sync {
    /// 按 VIN/序列号读取车辆，不存在返回 Ok(None)
    fn get(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>>;

    /// 枚举车队全部车辆标识（按标识升序）
    fn list_vehicle_ids(&self) -> RepositoryResult<Vec<String>>;
}

/// 维保记录读取
pub trait OccurrenceReader: Send + Sync {
    fn list_for_vehicle(&self, vehicle_id: &str) -> RepositoryResult<Vec<MaintenanceOccurrence>>;
}

/// 计划维保写入
pub trait PlannedWriter: Send + Sync {
    /// 持久化计划维保，返回带 planned_id 的持久化形态
    fn create(&self, planned: &PlannedOccurrence) -> RepositoryResult<PlannedOccurrence>;
}

/// 备件库存
///
/// 两种查询口径互不替代：
/// - `find_by_natural_key`: 核对去重使用 (名称, 厂商, 零件号)
/// - `find_by_vehicle`: 可用性检查使用 (车辆, 零件号)
pub trait PartStore: Send + Sync {
    fn find_by_natural_key(&self, key: &PartNaturalKey) -> RepositoryResult<Option<PartRecord>>;

    fn find_by_vehicle(&self, key: &VehiclePartKey) -> RepositoryResult<Option<PartRecord>>;

    /// 按 part_id 新建或更新；part_id 为 None 时由存储层分配
    fn save(&self, record: &PartRecord) -> RepositoryResult<PartRecord>;
}
