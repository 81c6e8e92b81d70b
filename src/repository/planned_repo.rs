// ==========================================
// 车队维保系统 - 计划维保仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 不做重复计划去重，按调用次数逐条写入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::maintenance::PlannedOccurrence;
use crate::repository::collaborators::PlannedWriter;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// PlannedOccurrenceRepository - 计划维保仓储
// ==========================================
pub struct PlannedOccurrenceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PlannedOccurrenceRepository {
    /// 创建新的 PlannedOccurrenceRepository 实例
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

    /// 插入计划维保，分配 planned_id
    pub fn insert(&self, planned: &PlannedOccurrence) -> RepositoryResult<PlannedOccurrence> {
        let planned_id = planned
            .planned_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO planned_occurrence (planned_id, vehicle_id, job_name, planned_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![planned_id, planned.vehicle_id, planned.job_name, planned.planned_at],
        )?;

        Ok(PlannedOccurrence {
            planned_id: Some(planned_id),
            ..planned.clone()
        })
    }

    /// 查询车辆的计划维保（按计划时间升序）
    pub fn find_by_vehicle_id(&self, vehicle_id: &str) -> RepositoryResult<Vec<PlannedOccurrence>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT planned_id, vehicle_id, job_name, planned_at
            FROM planned_occurrence
            WHERE vehicle_id = ?1
            ORDER BY planned_at ASC, job_name ASC
            "#,
        )?;
        let rows = stmt
            .query_map(params![vehicle_id], |row| {
                Ok(PlannedOccurrence {
                    planned_id: row.get(0)?,
                    vehicle_id: row.get(1)?,
                    job_name: row.get(2)?,
                    planned_at: row.get(3)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }

    /// 统计全部计划维保条数
    pub fn count_all(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM planned_occurrence", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl PlannedWriter for PlannedOccurrenceRepository {
    fn create(&self, planned: &PlannedOccurrence) -> RepositoryResult<PlannedOccurrence> {
        self.insert(planned)
    }
}
