// ==========================================
// 车队维保系统 - 维保记录领域模型
// ==========================================
// 对齐: maintenance_occurrence / planned_occurrence 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// IntervalThresholds - 维保间隔阈值
// ==========================================
// None 表示该磨损维度不约束本作业
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntervalThresholds {
    pub distance_km: Option<i64>,     // 里程间隔 (km)
    pub operating_hours: Option<i64>, // 工时间隔 (h)
    pub calendar_days: Option<i64>,   // 日历间隔 (天)
}

impl IntervalThresholds {
    /// 无任何阈值（按需作业）
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_distance_km(mut self, km: i64) -> Self {
        self.distance_km = Some(km);
        self
    }

    pub fn with_operating_hours(mut self, hours: i64) -> Self {
        self.operating_hours = Some(hours);
        self
    }

    pub fn with_calendar_days(mut self, days: i64) -> Self {
        self.calendar_days = Some(days);
        self
    }

    /// 三个阈值全部缺失 → 不参与周期调度
    pub fn is_unscheduled(&self) -> bool {
        self.distance_km.is_none() && self.operating_hours.is_none() && self.calendar_days.is_none()
    }
}

// ==========================================
// MaintenanceOccurrence - 已执行的维保作业
// ==========================================
// 记录作业执行时的车辆读数及复发阈值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceOccurrence {
    // ===== 主键 =====
    pub occurrence_id: String,

    // ===== 归属 =====
    pub vehicle_id: String, // 所属车辆
    pub job_name: String,   // 作业名称 (标识作业类型)

    // ===== 执行时读数 =====
    pub odometer_km: i64,             // 执行时里程
    pub operating_hours: Option<i64>, // 执行时工时 (无工时表的车辆为 None)
    pub performed_at: NaiveDateTime,  // 执行时间

    // ===== 复发阈值 =====
    pub intervals: IntervalThresholds,
}

impl MaintenanceOccurrence {
    pub fn new(
        occurrence_id: String,
        vehicle_id: String,
        job_name: String,
        odometer_km: i64,
        operating_hours: Option<i64>,
        performed_at: NaiveDateTime,
        intervals: IntervalThresholds,
    ) -> Self {
        Self {
            occurrence_id,
            vehicle_id,
            job_name,
            odometer_km,
            operating_hours,
            performed_at,
            intervals,
        }
    }
}

// ==========================================
// PlannedOccurrence - 计划维保
// ==========================================
// 仅由到期判定的正向结果创建，之后归计划维保仓储所有
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedOccurrence {
    pub planned_id: Option<String>, // 由存储层分配
    pub vehicle_id: String,
    pub job_name: String,
    pub planned_at: NaiveDateTime, // 判定时刻，不做前向推算
}

impl PlannedOccurrence {
    pub fn new(vehicle_id: String, job_name: String, planned_at: NaiveDateTime) -> Self {
        Self {
            planned_id: None,
            vehicle_id,
            job_name,
            planned_at,
        }
    }

    /// 是否已持久化
    pub fn is_persisted(&self) -> bool {
        self.planned_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_thresholds_unscheduled() {
        assert!(IntervalThresholds::none().is_unscheduled());
        assert!(!IntervalThresholds::none().with_calendar_days(30).is_unscheduled());
        assert!(!IntervalThresholds::none().with_operating_hours(250).is_unscheduled());
    }
}
