// ==========================================
// 车队维保系统 - 备件核对引擎
// ==========================================
// 职责: 将备件需求清单与库存按自然键合并
// 输入: 备件需求列表
// 输出: 已持久化的库存备件列表（与输入等长同序）
// 红线: 同一自然键只允许一条库存记录，数量只累加不覆盖
// ==========================================

use crate::domain::part::{PartRecord, PartRequirement};
use crate::engine::error::{MaintenanceError, ReconcileError};
use crate::repository::collaborators::PartStore;
use crate::repository::error::RepositoryError;
use std::sync::{Arc, Mutex};

/// 新建库存备件的默认库位卡
pub const DEFAULT_STORAGE_CARD: &str = "UNASSIGNED";

// ==========================================
// PartsReconciler - 备件核对引擎
// ==========================================
pub struct PartsReconciler {
    store: Arc<dyn PartStore>,
    default_storage_card: String,
    // 同一实例上的两次 reconcile 不交错执行（读-加-写序列）
    batch_guard: Mutex<()>,
}

impl PartsReconciler {
    pub fn new(store: Arc<dyn PartStore>) -> Self {
        Self::with_storage_card(store, DEFAULT_STORAGE_CARD)
    }

    pub fn with_storage_card(store: Arc<dyn PartStore>, default_storage_card: &str) -> Self {
        Self {
            store,
            default_storage_card: default_storage_card.to_string(),
            batch_guard: Mutex::new(()),
        }
    }

    /// 核对备件需求
    ///
    /// # 规则
    /// 按输入顺序逐条处理：
    /// - 自然键已存在 → 数量 = 现有数量 + 需求数量，保存
    /// - 自然键不存在 → 按需求新建库存备件，保存
    ///
    /// 同批次内重复的自然键依次作用于存储（后者可见前者的更新）。
    ///
    /// # 错误
    /// 第一条保存失败的需求的下标与自然键；此前的需求已写入，不回滚。
    pub fn reconcile(&self, requirements: &[PartRequirement]) -> Result<Vec<PartRecord>, ReconcileError> {
        // 守卫不保护数据，中毒后继续使用
        let _batch = self.batch_guard.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = Vec::with_capacity(requirements.len());
        for (index, requirement) in requirements.iter().enumerate() {
            let record = self
                .reconcile_one(requirement)
                .map_err(|source| ReconcileError {
                    index,
                    key: requirement.natural_key(),
                    source,
                })?;
            records.push(record);
        }

        tracing::info!("备件核对完成: {} 条需求", records.len());
        Ok(records)
    }

    fn reconcile_one(
        &self,
        requirement: &PartRequirement,
    ) -> Result<PartRecord, RepositoryError> {
        let key = requirement.natural_key();

        let proposed = match self.store.find_by_natural_key(&key)? {
            Some(mut existing) => {
                tracing::debug!(
                    "备件已存在，累加数量: part={}, {} + {}",
                    key,
                    existing.quantity,
                    requirement.quantity
                );
                existing.quantity = existing
                    .quantity
                    .checked_add(requirement.quantity)
                    .ok_or_else(|| RepositoryError::FieldValueError {
                        field: "quantity".to_string(),
                        message: format!(
                            "累加后数量溢出: {} + {}",
                            existing.quantity, requirement.quantity
                        ),
                    })?;
                existing
            }
            None => {
                tracing::debug!("备件不存在，新建: part={}, qty={}", key, requirement.quantity);
                PartRecord::from_requirement(requirement, &self.default_storage_card)
            }
        };

        self.store.save(&proposed)
    }

    /// 检查备件需求是否全部可满足（只读）
    ///
    /// 按车辆范围查询 (车辆, 零件号)，要求记录存在且在库数量 ≥ 需求数量；
    /// 遇到第一条不满足的需求即返回 false。未关联车辆的需求视为不满足。
    pub fn parts_available(&self, requirements: &[PartRequirement]) -> Result<bool, MaintenanceError> {
        for requirement in requirements {
            let Some(key) = requirement.vehicle_key() else {
                tracing::debug!("需求未关联车辆，无法检查可用性: part={}", requirement.natural_key());
                return Ok(false);
            };

            let satisfied = self
                .store
                .find_by_vehicle(&key)?
                .map(|record| record.covers(requirement.quantity))
                .unwrap_or(false);

            if !satisfied {
                tracing::debug!(
                    "备件不足: vehicle_id={}, part_number={}, requested={}",
                    key.vehicle_id,
                    key.part_number,
                    requirement.quantity
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
