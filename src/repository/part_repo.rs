// ==========================================
// 车队维保系统 - 备件库存仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: part_record(name, manufacturer, part_number) 唯一
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::part::{PartNaturalKey, PartRecord, VehiclePartKey};
use crate::repository::collaborators::PartStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT part_id, name, manufacturer, part_number, quantity, storage_card, vehicle_id
    FROM part_record
"#;

// ==========================================
// PartRepository - 备件库存仓储
// ==========================================
/// 备件库存仓储
/// 职责: 管理 part_record 表的读写
pub struct PartRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PartRepository {
    /// 创建新的 PartRepository 实例
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

    /// 按主键查询
    pub fn find_by_id(&self, part_id: &str) -> RepositoryResult<Option<PartRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE part_id = ?1", SELECT_COLUMNS);
        let record = conn
            .query_row(&sql, params![part_id], map_part_row)
            .optional()?;
        Ok(record)
    }

    /// 查询全部库存备件（按自然键排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<PartRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} ORDER BY name ASC, manufacturer ASC, part_number ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], map_part_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(records)
    }

    fn insert(&self, record: &PartRecord, part_id: String) -> RepositoryResult<PartRecord> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO part_record (
                part_id, name, manufacturer, part_number,
                quantity, storage_card, vehicle_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                part_id,
                record.name,
                record.manufacturer,
                record.part_number,
                record.quantity,
                record.storage_card,
                record.vehicle_id,
            ],
        )?;

        Ok(PartRecord {
            part_id: Some(part_id),
            ..record.clone()
        })
    }

    fn update(&self, record: &PartRecord, part_id: &str) -> RepositoryResult<PartRecord> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE part_record SET
                name = ?2,
                manufacturer = ?3,
                part_number = ?4,
                quantity = ?5,
                storage_card = ?6,
                vehicle_id = ?7,
                updated_at = datetime('now')
            WHERE part_id = ?1
            "#,
            params![
                part_id,
                record.name,
                record.manufacturer,
                record.part_number,
                record.quantity,
                record.storage_card,
                record.vehicle_id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "PartRecord".to_string(),
                id: part_id.to_string(),
            });
        }

        Ok(record.clone())
    }
}

impl PartStore for PartRepository {
    fn find_by_natural_key(&self, key: &PartNaturalKey) -> RepositoryResult<Option<PartRecord>> {
        let conn = self.get_conn()?;
        // SQLite 的 = 对 TEXT 默认 BINARY 比较，区分大小写
        let sql = format!(
            "{} WHERE name = ?1 AND manufacturer = ?2 AND part_number = ?3",
            SELECT_COLUMNS
        );
        let record = conn
            .query_row(
                &sql,
                params![key.name, key.manufacturer, key.part_number],
                map_part_row,
            )
            .optional()?;
        Ok(record)
    }

    fn find_by_vehicle(&self, key: &VehiclePartKey) -> RepositoryResult<Option<PartRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "{} WHERE vehicle_id = ?1 AND part_number = ?2 ORDER BY name ASC, manufacturer ASC LIMIT 1",
            SELECT_COLUMNS
        );
        let record = conn
            .query_row(&sql, params![key.vehicle_id, key.part_number], map_part_row)
            .optional()?;
        Ok(record)
    }

    fn save(&self, record: &PartRecord) -> RepositoryResult<PartRecord> {
        match &record.part_id {
            Some(part_id) => self.update(record, part_id),
            None => self.insert(record, Uuid::new_v4().to_string()),
        }
    }
}

fn map_part_row(row: &Row<'_>) -> SqliteResult<PartRecord> {
    Ok(PartRecord {
        part_id: row.get(0)?,
        name: row.get(1)?,
        manufacturer: row.get(2)?,
        part_number: row.get(3)?,
        quantity: row.get(4)?,
        storage_card: row.get(5)?,
        vehicle_id: row.get(6)?,
    })
}
