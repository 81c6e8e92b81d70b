// ==========================================
// 车队维保系统 - 车辆领域模型
// ==========================================
// 对齐: vehicle 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Vehicle - 车辆主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: String,           // VIN 或出厂序列号
    pub odometer_km: Option<i64>,     // 当前里程 (km)，None 表示未知
    pub operating_hours: Option<i64>, // 当前累计运行工时 (h)，None 表示未知
}

impl Vehicle {
    pub fn new(vehicle_id: String, odometer_km: Option<i64>, operating_hours: Option<i64>) -> Self {
        Self {
            vehicle_id,
            odometer_km,
            operating_hours,
        }
    }

    /// 以指定时刻生成只读快照（供到期判定使用）
    pub fn snapshot_at(&self, now: NaiveDateTime) -> VehicleSnapshot {
        VehicleSnapshot {
            vehicle_id: self.vehicle_id.clone(),
            odometer_km: self.odometer_km,
            operating_hours: self.operating_hours,
            now,
        }
    }
}

// ==========================================
// VehicleSnapshot - 车辆状态快照
// ==========================================
// 到期判定引擎的只读输入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub vehicle_id: String,
    pub odometer_km: Option<i64>,
    pub operating_hours: Option<i64>,
    pub now: NaiveDateTime, // 判定时刻
}
