// ==========================================
// 车队维保系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 到期信号 (Due Signal)
// ==========================================
// 三个互相独立的磨损维度，任一满足即判定到期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DueSignal {
    Distance,       // 里程
    OperatingHours, // 运行工时
    Calendar,       // 日历天数
}

impl DueSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            DueSignal::Distance => "DISTANCE",
            DueSignal::OperatingHours => "OPERATING_HOURS",
            DueSignal::Calendar => "CALENDAR",
        }
    }
}

impl fmt::Display for DueSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 未知工时处理策略 (Unknown Hours Policy)
// ==========================================
// 车辆当前工时缺失时，工时信号如何处理
// - TreatAsZero: 按 0 参与计算（沿用历史口径，默认）
// - SkipSignal: 工时信号不触发（与里程缺失的处理一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnknownHoursPolicy {
    #[default]
    TreatAsZero,
    SkipSignal,
}

impl UnknownHoursPolicy {
    /// 从数据库/配置字符串解析，无法识别时返回 None
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "TREAT_AS_ZERO" => Some(UnknownHoursPolicy::TreatAsZero),
            "SKIP_SIGNAL" => Some(UnknownHoursPolicy::SkipSignal),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            UnknownHoursPolicy::TreatAsZero => "TREAT_AS_ZERO",
            UnknownHoursPolicy::SkipSignal => "SKIP_SIGNAL",
        }
    }
}

impl fmt::Display for UnknownHoursPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_hours_policy_parse() {
        assert_eq!(
            UnknownHoursPolicy::from_db_str("skip_signal"),
            Some(UnknownHoursPolicy::SkipSignal)
        );
        assert_eq!(
            UnknownHoursPolicy::from_db_str(" TREAT_AS_ZERO "),
            Some(UnknownHoursPolicy::TreatAsZero)
        );
        assert_eq!(UnknownHoursPolicy::from_db_str("maybe"), None);
        assert_eq!(UnknownHoursPolicy::default(), UnknownHoursPolicy::TreatAsZero);
    }

    #[test]
    fn test_due_signal_serde() {
        let json = serde_json::to_string(&DueSignal::OperatingHours).unwrap();
        assert_eq!(json, "\"OPERATING_HOURS\"");
        assert_eq!(DueSignal::Calendar.to_string(), "CALENDAR");
    }
}
