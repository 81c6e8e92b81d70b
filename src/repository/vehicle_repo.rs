// ==========================================
// 车队维保系统 - 车辆数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::vehicle::Vehicle;
use crate::repository::collaborators::VehicleReader;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// VehicleRepository - 车辆仓储
// ==========================================
/// 车辆仓储
/// 职责: 管理 vehicle 表的读写
pub struct VehicleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl VehicleRepository {
    /// 创建新的 VehicleRepository 实例
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

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增或更新车辆读数
    pub fn upsert(&self, vehicle: &Vehicle) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO vehicle (vehicle_id, odometer_km, operating_hours)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(vehicle_id) DO UPDATE SET
                odometer_km = excluded.odometer_km,
                operating_hours = excluded.operating_hours,
                updated_at = datetime('now')
            "#,
            params![vehicle.vehicle_id, vehicle.odometer_km, vehicle.operating_hours],
        )?;
        Ok(())
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Vehicle)): 找到车辆
    /// - Ok(None): 未找到
    /// - Err: 数据库错误
    pub fn find_by_id(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>> {
        let conn = self.get_conn()?;
        let vehicle = conn
            .query_row(
                r#"
                SELECT vehicle_id, odometer_km, operating_hours
                FROM vehicle
                WHERE vehicle_id = ?1
                "#,
                params![vehicle_id],
                |row| {
                    Ok(Vehicle {
                        vehicle_id: row.get(0)?,
                        odometer_km: row.get(1)?,
                        operating_hours: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(vehicle)
    }

    /// 查询全部车辆标识
    pub fn list_ids(&self) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT vehicle_id FROM vehicle ORDER BY vehicle_id ASC")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(ids)
    }
}

impl VehicleReader for VehicleRepository {
    fn get(&self, vehicle_id: &str) -> RepositoryResult<Option<Vehicle>> {
        self.find_by_id(vehicle_id)
    }

    fn list_vehicle_ids(&self) -> RepositoryResult<Vec<String>> {
        self.list_ids()
    }
}
