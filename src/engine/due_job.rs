// ==========================================
// 车队维保系统 - 到期作业判定引擎
// ==========================================
// 职责: 判定已执行的维保作业是否再次到期
// 输入: 车辆快照 + 维保记录(执行时读数 + 间隔阈值)
// 输出: 是否到期 + 触发信号 + 原因
// 红线: 纯函数，不修改输入，不访问存储
// ==========================================

use crate::domain::maintenance::{MaintenanceOccurrence, PlannedOccurrence};
use crate::domain::types::{DueSignal, UnknownHoursPolicy};
use crate::domain::vehicle::VehicleSnapshot;
use crate::engine::error::MaintenanceError;
use chrono::NaiveDateTime;
use serde_json::json;

const SECONDS_PER_DAY: i64 = 86_400;

/// 两个时刻之间的整天数（向下取整，不四舍五入）
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

// ==========================================
// 配置
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DueEvaluatorConfig {
    pub unknown_hours_policy: UnknownHoursPolicy,
}

// ==========================================
// 判定结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueEvaluation {
    pub is_due: bool,
    /// 第一个满足的信号（按 里程 → 工时 → 日历 顺序）
    pub signal: Option<DueSignal>,
    /// JSON 格式的原因说明
    pub reason: String,
}

/// 批量判定中单个 (车辆, 维保记录) 的结果
#[derive(Debug)]
pub struct BatchDecision {
    pub vehicle_id: String,
    pub occurrence_id: String,
    /// Ok(Some): 需要新建计划; Ok(None): 未到期
    pub outcome: Result<Option<PlannedOccurrence>, MaintenanceError>,
}

// ==========================================
// DueJobEvaluator - 到期作业判定引擎
// ==========================================
/// 到期作业判定引擎
/// 职责: 里程/工时/日历三信号的逻辑或判定，生成计划维保请求
pub struct DueJobEvaluator {
    config: DueEvaluatorConfig,
}

impl DueJobEvaluator {
    pub fn new() -> Self {
        Self::with_config(DueEvaluatorConfig::default())
    }

    pub fn with_config(config: DueEvaluatorConfig) -> Self {
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 判定维保作业是否到期
    pub fn is_due(&self, vehicle: &VehicleSnapshot, occurrence: &MaintenanceOccurrence) -> bool {
        self.fired_signal(vehicle, occurrence).is_some()
    }

    /// 判定维保作业是否到期（带原因）
    ///
    /// # 规则
    /// - 三个阈值全部缺失 → 不到期（按需作业）
    /// - 里程差 ≥ 里程间隔 → 到期
    /// - 工时差 ≥ 工时间隔 → 到期
    /// - 整天数 ≥ 日历间隔 → 到期
    pub fn evaluate(&self, vehicle: &VehicleSnapshot, occurrence: &MaintenanceOccurrence) -> DueEvaluation {
        if occurrence.intervals.is_unscheduled() {
            return DueEvaluation {
                is_due: false,
                signal: None,
                reason: json!({
                    "status": "UNSCHEDULED",
                    "reason": "未设置任何间隔阈值，按需执行",
                    "vehicle_id": vehicle.vehicle_id,
                    "job_name": occurrence.job_name,
                })
                .to_string(),
            };
        }

        match self.fired_signal(vehicle, occurrence) {
            Some((signal, elapsed, interval)) => DueEvaluation {
                is_due: true,
                signal: Some(signal),
                reason: json!({
                    "status": "DUE",
                    "signal": signal.as_str(),
                    "elapsed": elapsed,
                    "interval": interval,
                    "vehicle_id": vehicle.vehicle_id,
                    "job_name": occurrence.job_name,
                })
                .to_string(),
            },
            None => DueEvaluation {
                is_due: false,
                signal: None,
                reason: json!({
                    "status": "NOT_DUE",
                    "reason": "所有已设置的阈值均未达到",
                    "vehicle_id": vehicle.vehicle_id,
                    "job_name": occurrence.job_name,
                })
                .to_string(),
            },
        }
    }

    /// 构造计划维保（纯构造，不持久化）
    pub fn build_planned_occurrence(
        &self,
        vehicle: &VehicleSnapshot,
        job_name: &str,
        now: NaiveDateTime,
    ) -> PlannedOccurrence {
        PlannedOccurrence::new(vehicle.vehicle_id.clone(), job_name.to_string(), now)
    }

    /// 单对判定：校验关联关系后判定，到期时返回计划维保请求
    pub fn decide(
        &self,
        vehicle: &VehicleSnapshot,
        occurrence: &MaintenanceOccurrence,
        now: NaiveDateTime,
    ) -> Result<Option<PlannedOccurrence>, MaintenanceError> {
        if occurrence.vehicle_id != vehicle.vehicle_id {
            return Err(MaintenanceError::InvalidState(format!(
                "维保记录 {} 属于车辆 {}，却以车辆 {} 进行判定",
                occurrence.occurrence_id, occurrence.vehicle_id, vehicle.vehicle_id
            )));
        }

        let evaluation = self.evaluate(vehicle, occurrence);
        tracing::debug!(
            "到期判定完成: vehicle_id={}, occurrence_id={}, reason={}",
            vehicle.vehicle_id,
            occurrence.occurrence_id,
            evaluation.reason
        );

        if !evaluation.is_due {
            return Ok(None);
        }
        Ok(Some(self.build_planned_occurrence(
            vehicle,
            &occurrence.job_name,
            now,
        )))
    }

    /// 批量判定：对不可变快照做纯变换，返回计划维保请求，由调用方写入
    pub fn plan_batch(
        &self,
        pairs: &[(VehicleSnapshot, MaintenanceOccurrence)],
        now: NaiveDateTime,
    ) -> Vec<BatchDecision> {
        pairs
            .iter()
            .map(|(vehicle, occurrence)| BatchDecision {
                vehicle_id: vehicle.vehicle_id.clone(),
                occurrence_id: occurrence.occurrence_id.clone(),
                outcome: self.decide(vehicle, occurrence, now),
            })
            .collect()
    }

    // ==========================================
    // 信号判定
    // ==========================================

    /// 里程信号；车辆里程未知时不触发
    pub fn distance_due(&self, vehicle: &VehicleSnapshot, occurrence: &MaintenanceOccurrence) -> bool {
        self.distance_elapsed(vehicle, occurrence).is_some()
    }

    /// 工时信号；车辆工时未知时按策略处理
    pub fn hours_due(&self, vehicle: &VehicleSnapshot, occurrence: &MaintenanceOccurrence) -> bool {
        self.hours_elapsed(vehicle, occurrence).is_some()
    }

    /// 日历信号
    pub fn calendar_due(&self, vehicle: &VehicleSnapshot, occurrence: &MaintenanceOccurrence) -> bool {
        self.calendar_elapsed(vehicle, occurrence).is_some()
    }

    /// 返回 (信号, 已消耗量, 阈值)
    fn fired_signal(
        &self,
        vehicle: &VehicleSnapshot,
        occurrence: &MaintenanceOccurrence,
    ) -> Option<(DueSignal, i64, i64)> {
        self.distance_elapsed(vehicle, occurrence)
            .map(|(elapsed, interval)| (DueSignal::Distance, elapsed, interval))
            .or_else(|| {
                self.hours_elapsed(vehicle, occurrence)
                    .map(|(elapsed, interval)| (DueSignal::OperatingHours, elapsed, interval))
            })
            .or_else(|| {
                self.calendar_elapsed(vehicle, occurrence)
                    .map(|(elapsed, interval)| (DueSignal::Calendar, elapsed, interval))
            })
    }

    fn distance_elapsed(
        &self,
        vehicle: &VehicleSnapshot,
        occurrence: &MaintenanceOccurrence,
    ) -> Option<(i64, i64)> {
        let interval = occurrence.intervals.distance_km?;
        let current = vehicle.odometer_km?;
        let elapsed = current - occurrence.odometer_km;
        (elapsed >= interval).then_some((elapsed, interval))
    }

    fn hours_elapsed(
        &self,
        vehicle: &VehicleSnapshot,
        occurrence: &MaintenanceOccurrence,
    ) -> Option<(i64, i64)> {
        let interval = occurrence.intervals.operating_hours?;
        let baseline = occurrence.operating_hours?;
        let current = match (vehicle.operating_hours, self.config.unknown_hours_policy) {
            (Some(hours), _) => hours,
            (None, UnknownHoursPolicy::TreatAsZero) => 0,
            (None, UnknownHoursPolicy::SkipSignal) => return None,
        };
        let elapsed = current - baseline;
        (elapsed >= interval).then_some((elapsed, interval))
    }

    fn calendar_elapsed(
        &self,
        vehicle: &VehicleSnapshot,
        occurrence: &MaintenanceOccurrence,
    ) -> Option<(i64, i64)> {
        let interval = occurrence.intervals.calendar_days?;
        let elapsed = days_between(occurrence.performed_at, vehicle.now);
        (elapsed >= interval).then_some((elapsed, interval))
    }
}

impl Default for DueJobEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::maintenance::IntervalThresholds;
    use chrono::{Duration, NaiveDate};

    fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn vehicle(odometer_km: Option<i64>, hours: Option<i64>, now: NaiveDateTime) -> VehicleSnapshot {
        VehicleSnapshot {
            vehicle_id: "VIN001".to_string(),
            odometer_km,
            operating_hours: hours,
            now,
        }
    }

    fn occurrence(
        odometer_km: i64,
        hours: Option<i64>,
        performed_at: NaiveDateTime,
        intervals: IntervalThresholds,
    ) -> MaintenanceOccurrence {
        MaintenanceOccurrence::new(
            "OCC-1".to_string(),
            "VIN001".to_string(),
            "Oil change".to_string(),
            odometer_km,
            hours,
            performed_at,
            intervals,
        )
    }

    #[test]
    fn test_days_between_truncates() {
        let from = ts(2025, 1, 1, 12);
        assert_eq!(days_between(from, from + Duration::days(7) - Duration::hours(1)), 6);
        assert_eq!(days_between(from, from + Duration::days(7)), 7);
        assert_eq!(days_between(from, from + Duration::hours(23)), 0);
        assert_eq!(days_between(from, from - Duration::hours(1)), -1);
    }

    #[test]
    fn test_distance_only_interval() {
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 1, 8);
        let intervals = IntervalThresholds::none().with_distance_km(5_000);
        // 工时、日期差距很大也不影响结果
        let occ = occurrence(10_000, Some(0), ts(2000, 1, 1, 0), intervals);

        assert!(!engine.is_due(&vehicle(Some(14_999), Some(99_999), now), &occ));
        assert!(engine.is_due(&vehicle(Some(15_000), Some(0), now), &occ));
        assert!(engine.is_due(&vehicle(Some(20_000), None, now), &occ));
    }

    #[test]
    fn test_unknown_odometer_never_fires_distance() {
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 1, 8);
        let occ = occurrence(0, None, now, IntervalThresholds::none().with_distance_km(1));

        assert!(!engine.distance_due(&vehicle(None, None, now), &occ));
        assert!(!engine.is_due(&vehicle(None, None, now), &occ));
    }

    #[test]
    fn test_no_intervals_never_due() {
        let engine = DueJobEvaluator::new();
        let occ = occurrence(0, Some(0), ts(2000, 1, 1, 0), IntervalThresholds::none());
        let v = vehicle(Some(1_000_000), Some(100_000), ts(2025, 1, 1, 0));

        let evaluation = engine.evaluate(&v, &occ);
        assert!(!evaluation.is_due);
        assert_eq!(evaluation.signal, None);
        assert!(evaluation.reason.contains("UNSCHEDULED"));
    }

    #[test]
    fn test_calendar_signal_boundary() {
        let engine = DueJobEvaluator::new();
        let performed_at = ts(2025, 3, 1, 10);
        let occ = occurrence(0, None, performed_at, IntervalThresholds::none().with_calendar_days(30));

        let just_short = vehicle(None, None, performed_at + Duration::days(30) - Duration::hours(1));
        let exact = vehicle(None, None, performed_at + Duration::days(30));

        assert!(!engine.is_due(&just_short, &occ));
        assert!(engine.is_due(&exact, &occ));
    }

    #[test]
    fn test_hours_signal() {
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 1, 8);
        let occ = occurrence(0, Some(1_000), now, IntervalThresholds::none().with_operating_hours(250));

        assert!(!engine.hours_due(&vehicle(None, Some(1_249), now), &occ));
        assert!(engine.hours_due(&vehicle(None, Some(1_250), now), &occ));
    }

    #[test]
    fn test_unknown_hours_treated_as_zero() {
        // 按字面规则: 0 - 100 = -100 < 50，不到期
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 1, 8);
        let occ = occurrence(0, Some(100), now, IntervalThresholds::none().with_operating_hours(50));
        assert!(!engine.is_due(&vehicle(None, None, now), &occ));

        // 执行时工时为 0 且阈值为 0 时，按 0 计算会触发
        let occ_zero = occurrence(0, Some(0), now, IntervalThresholds::none().with_operating_hours(0));
        assert!(engine.is_due(&vehicle(None, None, now), &occ_zero));
    }

    #[test]
    fn test_unknown_hours_skip_signal_policy() {
        let engine = DueJobEvaluator::with_config(DueEvaluatorConfig {
            unknown_hours_policy: UnknownHoursPolicy::SkipSignal,
        });
        let now = ts(2025, 6, 1, 8);
        let occ_zero = occurrence(0, Some(0), now, IntervalThresholds::none().with_operating_hours(0));

        assert!(!engine.is_due(&vehicle(None, None, now), &occ_zero));
        assert!(engine.is_due(&vehicle(None, Some(0), now), &occ_zero));
    }

    #[test]
    fn test_missing_hours_baseline_never_fires() {
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 1, 8);
        let occ = occurrence(0, None, now, IntervalThresholds::none().with_operating_hours(10));

        assert!(!engine.is_due(&vehicle(None, Some(10_000), now), &occ));
    }

    #[test]
    fn test_end_to_end_distance_fires_first() {
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 20, 9);
        let intervals = IntervalThresholds::none()
            .with_distance_km(5_000)
            .with_operating_hours(200)
            .with_calendar_days(7);
        let occ = occurrence(110_000, Some(2_900), now - Duration::days(10), intervals);
        let v = vehicle(Some(120_000), Some(3_000), now);

        let evaluation = engine.evaluate(&v, &occ);
        assert!(evaluation.is_due);
        assert_eq!(evaluation.signal, Some(DueSignal::Distance));
        assert!(evaluation.reason.contains("10000"));
        // 工时差 100 < 200
        assert!(!engine.hours_due(&v, &occ));
        assert!(engine.calendar_due(&v, &occ));
    }

    #[test]
    fn test_build_planned_occurrence() {
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 1, 8);
        let planned = engine.build_planned_occurrence(&vehicle(Some(1), None, now), "Brake check", now);

        assert_eq!(planned.vehicle_id, "VIN001");
        assert_eq!(planned.job_name, "Brake check");
        assert_eq!(planned.planned_at, now);
        assert!(!planned.is_persisted());
    }

    #[test]
    fn test_decide_rejects_cross_linked_occurrence() {
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 1, 8);
        let mut occ = occurrence(0, None, now, IntervalThresholds::none().with_distance_km(1));
        occ.vehicle_id = "VIN999".to_string();

        let result = engine.decide(&vehicle(Some(100), None, now), &occ, now);
        assert!(matches!(result, Err(MaintenanceError::InvalidState(_))));
    }

    #[test]
    fn test_plan_batch_keeps_pair_order() {
        let engine = DueJobEvaluator::new();
        let now = ts(2025, 6, 1, 8);
        let v = vehicle(Some(10_000), None, now);

        let due = occurrence(0, None, now, IntervalThresholds::none().with_distance_km(5_000));
        let mut not_due = occurrence(9_000, None, now, IntervalThresholds::none().with_distance_km(5_000));
        not_due.occurrence_id = "OCC-2".to_string();
        let mut foreign = due.clone();
        foreign.occurrence_id = "OCC-3".to_string();
        foreign.vehicle_id = "VIN002".to_string();

        let decisions = engine.plan_batch(
            &[(v.clone(), due), (v.clone(), not_due), (v, foreign)],
            now,
        );

        assert_eq!(decisions.len(), 3);
        assert_eq!(decisions[0].occurrence_id, "OCC-1");
        assert!(matches!(&decisions[0].outcome, Ok(Some(p)) if p.job_name == "Oil change"));
        assert!(matches!(decisions[1].outcome, Ok(None)));
        assert!(matches!(decisions[2].outcome, Err(MaintenanceError::InvalidState(_))));
    }
}
