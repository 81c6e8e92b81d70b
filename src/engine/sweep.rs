// ==========================================
// 车队维保系统 - 车队到期扫描
// ==========================================
// 职责: 枚举车辆 → 读取维保记录 → 批量判定 → 写入计划维保
// 说明: 判定是纯变换 (DueJobEvaluator::plan_batch)，写入是显式的独立步骤
// 红线: 单个 (车辆, 维保记录) 失败只记录，不中断整个车队扫描
// ==========================================

use crate::domain::maintenance::{MaintenanceOccurrence, PlannedOccurrence};
use crate::domain::vehicle::VehicleSnapshot;
use crate::engine::due_job::DueJobEvaluator;
use crate::engine::error::{MaintenanceError, MaintenanceResult};
use crate::repository::collaborators::{OccurrenceReader, PlannedWriter, VehicleReader};
use chrono::NaiveDateTime;
use std::sync::Arc;

/// 已写入的计划维保及其来源记录
#[derive(Debug, Clone)]
pub struct PlannedEntry {
    pub occurrence_id: String,
    pub planned: PlannedOccurrence,
}

/// 扫描失败项；occurrence_id 为 None 表示车辆级失败
#[derive(Debug)]
pub struct SweepFailure {
    pub vehicle_id: String,
    pub occurrence_id: Option<String>,
    pub error: MaintenanceError,
}

/// 扫描报告
#[derive(Debug, Default)]
pub struct SweepReport {
    pub vehicles_scanned: usize,
    pub occurrences_evaluated: usize,
    pub planned: Vec<PlannedEntry>,
    pub failures: Vec<SweepFailure>,
}

impl SweepReport {
    /// 无任何失败
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

// ==========================================
// MaintenanceSweep - 车队到期扫描
// ==========================================
pub struct MaintenanceSweep {
    vehicles: Arc<dyn VehicleReader>,
    occurrences: Arc<dyn OccurrenceReader>,
    planned: Arc<dyn PlannedWriter>,
    evaluator: DueJobEvaluator,
}

impl MaintenanceSweep {
    pub fn new(
        vehicles: Arc<dyn VehicleReader>,
        occurrences: Arc<dyn OccurrenceReader>,
        planned: Arc<dyn PlannedWriter>,
        evaluator: DueJobEvaluator,
    ) -> Self {
        Self {
            vehicles,
            occurrences,
            planned,
            evaluator,
        }
    }

    /// 扫描整个车队
    ///
    /// # 返回
    /// - Ok(SweepReport): 成功/失败明细
    /// - Err: 仅在无法枚举车辆时返回
    pub fn run(&self, now: NaiveDateTime) -> MaintenanceResult<SweepReport> {
        let vehicle_ids = self.vehicles.list_vehicle_ids()?;
        tracing::info!("开始车队到期扫描: {} 辆车, now={}", vehicle_ids.len(), now);

        let mut report = SweepReport::default();
        for vehicle_id in &vehicle_ids {
            if let Err(error) = self.sweep_vehicle(vehicle_id, now, &mut report) {
                tracing::warn!("车辆扫描失败: vehicle_id={}, error={}", vehicle_id, error);
                report.failures.push(SweepFailure {
                    vehicle_id: vehicle_id.clone(),
                    occurrence_id: None,
                    error,
                });
            }
        }

        tracing::info!(
            "车队到期扫描完成: vehicles={}, evaluated={}, planned={}, failures={}",
            report.vehicles_scanned,
            report.occurrences_evaluated,
            report.planned.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// 按需扫描单辆车
    ///
    /// 车辆不存在或读取失败时直接返回错误；记录级失败仍写入报告。
    pub fn run_for_vehicle(&self, vehicle_id: &str, now: NaiveDateTime) -> MaintenanceResult<SweepReport> {
        let mut report = SweepReport::default();
        self.sweep_vehicle(vehicle_id, now, &mut report)?;
        Ok(report)
    }

    /// 扫描单辆车：读取 → 纯判定 → 写入
    fn sweep_vehicle(
        &self,
        vehicle_id: &str,
        now: NaiveDateTime,
        report: &mut SweepReport,
    ) -> MaintenanceResult<()> {
        let vehicle = self
            .vehicles
            .get(vehicle_id)?
            .ok_or_else(|| MaintenanceError::vehicle_not_found(vehicle_id))?;
        let snapshot = vehicle.snapshot_at(now);
        let occurrences = self.occurrences.list_for_vehicle(vehicle_id)?;

        report.vehicles_scanned += 1;
        report.occurrences_evaluated += occurrences.len();

        let pairs: Vec<(VehicleSnapshot, MaintenanceOccurrence)> = occurrences
            .into_iter()
            .map(|occurrence| (snapshot.clone(), occurrence))
            .collect();

        for decision in self.evaluator.plan_batch(&pairs, now) {
            let result = decision
                .outcome
                .and_then(|planned| self.write_planned(planned));

            match result {
                Ok(Some(planned)) => report.planned.push(PlannedEntry {
                    occurrence_id: decision.occurrence_id,
                    planned,
                }),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        "维保记录判定失败: vehicle_id={}, occurrence_id={}, error={}",
                        decision.vehicle_id,
                        decision.occurrence_id,
                        error
                    );
                    report.failures.push(SweepFailure {
                        vehicle_id: decision.vehicle_id,
                        occurrence_id: Some(decision.occurrence_id),
                        error,
                    });
                }
            }
        }
        Ok(())
    }

    fn write_planned(
        &self,
        planned: Option<PlannedOccurrence>,
    ) -> MaintenanceResult<Option<PlannedOccurrence>> {
        match planned {
            Some(planned) => Ok(Some(self.planned.create(&planned)?)),
            None => Ok(None),
        }
    }
}
