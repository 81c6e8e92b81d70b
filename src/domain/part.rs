// ==========================================
// 车队维保系统 - 备件领域模型
// ==========================================
// 对齐: part_record 表
// 红线: 自然键 (名称, 厂商, 零件号) 区分大小写，精确匹配
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// PartNaturalKey - 备件自然键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartNaturalKey {
    pub name: String,
    pub manufacturer: String,
    pub part_number: String,
}

impl fmt::Display for PartNaturalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.name, self.manufacturer, self.part_number)
    }
}

// ==========================================
// VehiclePartKey - 车辆范围内的备件标识
// ==========================================
// 仅用于可用性检查，与自然键是两种不同的查询
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehiclePartKey {
    pub vehicle_id: String,
    pub part_number: String,
}

// ==========================================
// PartRequirement - 备件需求
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRequirement {
    pub name: String,
    pub manufacturer: String,
    pub part_number: String,
    pub quantity: i64,              // 需求数量 (正整数)
    pub vehicle_id: Option<String>, // 关联车辆
}

impl PartRequirement {
    pub fn new(name: &str, manufacturer: &str, part_number: &str, quantity: i64) -> Self {
        Self {
            name: name.to_string(),
            manufacturer: manufacturer.to_string(),
            part_number: part_number.to_string(),
            quantity,
            vehicle_id: None,
        }
    }

    pub fn for_vehicle(mut self, vehicle_id: &str) -> Self {
        self.vehicle_id = Some(vehicle_id.to_string());
        self
    }

    pub fn natural_key(&self) -> PartNaturalKey {
        PartNaturalKey {
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            part_number: self.part_number.clone(),
        }
    }

    /// 车辆范围标识；未关联车辆时为 None
    pub fn vehicle_key(&self) -> Option<VehiclePartKey> {
        self.vehicle_id.as_ref().map(|vehicle_id| VehiclePartKey {
            vehicle_id: vehicle_id.clone(),
            part_number: self.part_number.clone(),
        })
    }
}

// ==========================================
// PartRecord - 库存备件
// ==========================================
// 生命周期: 自然键首次出现时创建，之后只累加数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    pub part_id: Option<String>, // 由存储层分配
    pub name: String,
    pub manufacturer: String,
    pub part_number: String,
    pub quantity: i64,              // 在库数量
    pub storage_card: String,       // 库位卡/货位
    pub vehicle_id: Option<String>, // 关联车辆
}

impl PartRecord {
    /// 由需求构造新的库存备件（未持久化）
    pub fn from_requirement(requirement: &PartRequirement, storage_card: &str) -> Self {
        Self {
            part_id: None,
            name: requirement.name.clone(),
            manufacturer: requirement.manufacturer.clone(),
            part_number: requirement.part_number.clone(),
            quantity: requirement.quantity,
            storage_card: storage_card.to_string(),
            vehicle_id: requirement.vehicle_id.clone(),
        }
    }

    pub fn natural_key(&self) -> PartNaturalKey {
        PartNaturalKey {
            name: self.name.clone(),
            manufacturer: self.manufacturer.clone(),
            part_number: self.part_number.clone(),
        }
    }

    /// 在库数量是否满足需求
    pub fn covers(&self, requested: i64) -> bool {
        self.quantity >= requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_key_is_case_sensitive() {
        let a = PartRequirement::new("Oil Filter", "Bosch", "OF1", 1).natural_key();
        let b = PartRequirement::new("oil filter", "Bosch", "OF1", 1).natural_key();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "Oil Filter/Bosch/OF1");
    }

    #[test]
    fn test_from_requirement_copies_identity() {
        let req = PartRequirement::new("Brake Pad", "ATE", "BP-7", 4).for_vehicle("VIN001");
        let record = PartRecord::from_requirement(&req, "A-01");

        assert_eq!(record.part_id, None);
        assert_eq!(record.quantity, 4);
        assert_eq!(record.storage_card, "A-01");
        assert_eq!(record.vehicle_id.as_deref(), Some("VIN001"));
        assert_eq!(record.natural_key(), req.natural_key());
        assert!(record.covers(4));
        assert!(!record.covers(5));
    }

    #[test]
    fn test_vehicle_key_requires_vehicle() {
        let req = PartRequirement::new("Belt", "Gates", "G-1", 1);
        assert!(req.vehicle_key().is_none());

        let key = req.for_vehicle("VIN9").vehicle_key().unwrap();
        assert_eq!(key.vehicle_id, "VIN9");
        assert_eq!(key.part_number, "G-1");
    }
}
