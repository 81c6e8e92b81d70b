// ==========================================
// 车队维保系统 - 维保 API
// ==========================================
// 职责: 到期扫描、备件核对、备件可用性查询、备件清单导入
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::validator::{validate_identifier, validate_part_requirements};
use crate::domain::maintenance::PlannedOccurrence;
use crate::domain::part::{PartRecord, PartRequirement};
use crate::engine::parts_reconciler::PartsReconciler;
use crate::engine::sweep::{MaintenanceSweep, SweepReport};
use crate::importer::BillOfPartsParser;

// ==========================================
// DTO
// ==========================================

/// 扫描失败项（展示用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepFailureInfo {
    pub vehicle_id: String,
    pub occurrence_id: Option<String>,
    pub message: String,
}

/// 扫描结果摘要（展示用）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSummary {
    pub vehicles_scanned: usize,
    pub occurrences_evaluated: usize,
    pub planned: Vec<PlannedOccurrence>,
    pub failures: Vec<SweepFailureInfo>,
}

impl From<SweepReport> for SweepSummary {
    fn from(report: SweepReport) -> Self {
        Self {
            vehicles_scanned: report.vehicles_scanned,
            occurrences_evaluated: report.occurrences_evaluated,
            planned: report.planned.into_iter().map(|entry| entry.planned).collect(),
            failures: report
                .failures
                .into_iter()
                .map(|failure| SweepFailureInfo {
                    vehicle_id: failure.vehicle_id,
                    occurrence_id: failure.occurrence_id,
                    message: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

// ==========================================
// MaintenanceApi - 维保 API
// ==========================================

/// 维保API
///
/// 职责：
/// 1. 车队到期扫描（全量 / 单车）
/// 2. 备件核对（含 CSV 清单导入）
/// 3. 备件可用性查询
pub struct MaintenanceApi {
    sweep: Arc<MaintenanceSweep>,
    reconciler: Arc<PartsReconciler>,
}

impl MaintenanceApi {
    /// 创建新的MaintenanceApi实例
    pub fn new(sweep: Arc<MaintenanceSweep>, reconciler: Arc<PartsReconciler>) -> Self {
        Self { sweep, reconciler }
    }

    /// 扫描整个车队，为到期作业生成计划维保
    pub fn run_due_sweep(&self, now: NaiveDateTime) -> ApiResult<SweepSummary> {
        let report = self.sweep.run(now)?;
        Ok(report.into())
    }

    /// 按需扫描单辆车
    pub fn evaluate_vehicle(&self, vehicle_id: &str, now: NaiveDateTime) -> ApiResult<SweepSummary> {
        validate_identifier("车辆标识", vehicle_id)?;

        let report = self.sweep.run_for_vehicle(vehicle_id.trim(), now)?;
        Ok(report.into())
    }

    /// 核对备件需求，返回与输入等长同序的库存备件
    pub fn reconcile_parts(&self, requirements: &[PartRequirement]) -> ApiResult<Vec<PartRecord>> {
        validate_part_requirements(requirements)?;
        Ok(self.reconciler.reconcile(requirements)?)
    }

    /// 查询备件需求是否全部可满足
    pub fn check_parts_available(&self, requirements: &[PartRequirement]) -> ApiResult<bool> {
        validate_part_requirements(requirements)?;
        Ok(self.reconciler.parts_available(requirements)?)
    }

    /// 导入 CSV 备件清单并核对
    pub fn import_bill_of_parts(&self, file_path: &Path) -> ApiResult<Vec<PartRecord>> {
        let requirements = BillOfPartsParser.parse_file(file_path)?;
        self.reconcile_parts(&requirements)
    }
}
