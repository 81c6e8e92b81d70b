// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::error::Error;
use tempfile::NamedTempFile;

use garage_maintenance::app::AppState;
use garage_maintenance::db::{init_schema, open_sqlite_connection};
use garage_maintenance::domain::{IntervalThresholds, MaintenanceOccurrence, Vehicle};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 测试环境：临时数据库 + 完整装配的 AppState
pub struct TestEnv {
    pub app: AppState,
    _temp_file: NamedTempFile,
}

impl TestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        garage_maintenance::logging::init_test();
        let (temp_file, db_path) = create_test_db()?;
        let app = AppState::new(db_path)?;
        Ok(Self {
            app,
            _temp_file: temp_file,
        })
    }

    /// 写入车辆读数
    pub fn seed_vehicle(&self, vehicle_id: &str, odometer_km: Option<i64>, operating_hours: Option<i64>) {
        self.app
            .vehicle_repo
            .upsert(&Vehicle::new(vehicle_id.to_string(), odometer_km, operating_hours))
            .expect("写入车辆失败");
    }

    /// 写入维保记录
    pub fn seed_occurrence(&self, occurrence: &MaintenanceOccurrence) {
        self.app
            .occurrence_repo
            .create(occurrence)
            .expect("写入维保记录失败");
    }
}

/// 构造日期时间（00:00:00）
pub fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// 构造维保记录
pub fn occurrence(
    occurrence_id: &str,
    vehicle_id: &str,
    job_name: &str,
    odometer_km: i64,
    operating_hours: Option<i64>,
    performed_at: NaiveDateTime,
    intervals: IntervalThresholds,
) -> MaintenanceOccurrence {
    MaintenanceOccurrence::new(
        occurrence_id.to_string(),
        vehicle_id.to_string(),
        job_name.to_string(),
        odometer_km,
        operating_hours,
        performed_at,
        intervals,
    )
}
