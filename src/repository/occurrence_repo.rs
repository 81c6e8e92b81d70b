// ==========================================
// 车队维保系统 - 维保记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::maintenance::{IntervalThresholds, MaintenanceOccurrence};
use crate::repository::collaborators::OccurrenceReader;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT
        occurrence_id, vehicle_id, job_name,
        odometer_km, operating_hours, performed_at,
        interval_distance_km, interval_operating_hours, interval_calendar_days
    FROM maintenance_occurrence
"#;

// ==========================================
// OccurrenceRepository - 维保记录仓储
// ==========================================
/// 维保记录仓储
/// 职责: 管理 maintenance_occurrence 表的读写
pub struct OccurrenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OccurrenceRepository {
    /// 创建新的 OccurrenceRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入一条已执行的维保作业
    pub fn create(&self, occurrence: &MaintenanceOccurrence) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO maintenance_occurrence (
                occurrence_id, vehicle_id, job_name,
                odometer_km, operating_hours, performed_at,
                interval_distance_km, interval_operating_hours, interval_calendar_days
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                occurrence.occurrence_id,
                occurrence.vehicle_id,
                occurrence.job_name,
                occurrence.odometer_km,
                occurrence.operating_hours,
                occurrence.performed_at,
                occurrence.intervals.distance_km,
                occurrence.intervals.operating_hours,
                occurrence.intervals.calendar_days,
            ],
        )?;
        Ok(())
    }

    /// 按主键查询
    pub fn find_by_id(&self, occurrence_id: &str) -> RepositoryResult<Option<MaintenanceOccurrence>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE occurrence_id = ?1", SELECT_COLUMNS);
        let occurrence = conn
            .query_row(&sql, params![occurrence_id], map_occurrence_row)
            .optional()?;
        Ok(occurrence)
    }

    /// 查询车辆的全部维保记录（按执行时间升序）
    pub fn find_by_vehicle_id(&self, vehicle_id: &str) -> RepositoryResult<Vec<MaintenanceOccurrence>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE vehicle_id = ?1 ORDER BY performed_at ASC, occurrence_id ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let occurrences = stmt
            .query_map(params![vehicle_id], map_occurrence_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(occurrences)
    }
}

impl OccurrenceReader for OccurrenceRepository {
    fn list_for_vehicle(&self, vehicle_id: &str) -> RepositoryResult<Vec<MaintenanceOccurrence>> {
        self.find_by_vehicle_id(vehicle_id)
    }
}

fn map_occurrence_row(row: &Row<'_>) -> SqliteResult<MaintenanceOccurrence> {
    Ok(MaintenanceOccurrence {
        occurrence_id: row.get(0)?,
        vehicle_id: row.get(1)?,
        job_name: row.get(2)?,
        odometer_km: row.get(3)?,
        operating_hours: row.get(4)?,
        performed_at: row.get(5)?,
        intervals: IntervalThresholds {
            distance_km: row.get(6)?,
            operating_hours: row.get(7)?,
            calendar_days: row.get(8)?,
        },
    })
}
