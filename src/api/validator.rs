// ==========================================
// 车队维保系统 - 输入校验
// ==========================================
// 职责: 在调用引擎前拦截不合法的输入
// 说明: 引擎假定输入已合法，校验只在 API 层做
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::part::PartRequirement;

/// 校验标识类字段非空
pub fn validate_identifier(field: &str, value: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{}不能为空", field)));
    }
    Ok(())
}

/// 校验备件需求清单
///
/// 规则:
/// - 名称、厂商、零件号不能为空
/// - 需求数量必须为正整数
/// - 关联车辆（若提供）不能为空白
pub fn validate_part_requirements(requirements: &[PartRequirement]) -> ApiResult<()> {
    for (index, requirement) in requirements.iter().enumerate() {
        let located = |e: ApiError| match e {
            ApiError::InvalidInput(msg) => ApiError::InvalidInput(format!("第{}条需求: {}", index, msg)),
            other => other,
        };

        validate_identifier("名称", &requirement.name).map_err(located)?;
        validate_identifier("厂商", &requirement.manufacturer).map_err(located)?;
        validate_identifier("零件号", &requirement.part_number).map_err(located)?;

        if requirement.quantity <= 0 {
            return Err(located(ApiError::InvalidInput(format!(
                "需求数量必须为正整数，实际 {}",
                requirement.quantity
            ))));
        }

        if let Some(vehicle_id) = &requirement.vehicle_id {
            validate_identifier("车辆标识", vehicle_id).map_err(located)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_part_requirements() {
        let ok = [
            PartRequirement::new("Oil Filter", "Bosch", "OF1", 5),
            PartRequirement::new("Air Filter", "Mann", "AF2", 1).for_vehicle("VIN001"),
        ];
        assert!(validate_part_requirements(&ok).is_ok());
        assert!(validate_part_requirements(&[]).is_ok());

        let zero = [
            PartRequirement::new("Oil Filter", "Bosch", "OF1", 5),
            PartRequirement::new("Air Filter", "Mann", "AF2", 0),
        ];
        match validate_part_requirements(&zero) {
            Err(ApiError::InvalidInput(msg)) => {
                assert!(msg.contains("第1条"));
                assert!(msg.contains("正整数"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        let blank = [PartRequirement::new("  ", "Bosch", "OF1", 5)];
        assert!(matches!(
            validate_part_requirements(&blank),
            Err(ApiError::InvalidInput(_))
        ));

        let blank_vehicle = [PartRequirement::new("Belt", "Gates", "G1", 1).for_vehicle(" ")];
        assert!(validate_part_requirements(&blank_vehicle).is_err());
    }
}
