// ==========================================
// 车队维保系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::UnknownHoursPolicy;
use crate::engine::due_job::DueEvaluatorConfig;
use crate::engine::parts_reconciler::DEFAULT_STORAGE_CARD;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 扫描日志中记录当次生效的配置
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare(
            "SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key"
        )?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
            ))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    // ===== 到期判定配置 =====

    /// 获取车辆工时未知时的处理策略
    ///
    /// # 返回
    /// - UnknownHoursPolicy（默认 TREAT_AS_ZERO；无法识别的值也回退为默认）
    pub fn get_unknown_hours_policy(&self) -> Result<UnknownHoursPolicy, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::UNKNOWN_HOURS_POLICY,
            UnknownHoursPolicy::default().to_db_str(),
        )?;
        Ok(UnknownHoursPolicy::from_db_str(&value).unwrap_or_else(|| {
            tracing::warn!(
                config_key = config_keys::UNKNOWN_HOURS_POLICY,
                raw_value = %value,
                "工时策略配置无法识别，使用默认值"
            );
            UnknownHoursPolicy::default()
        }))
    }

    /// 组装到期判定引擎配置
    pub fn load_evaluator_config(&self) -> Result<DueEvaluatorConfig, Box<dyn Error>> {
        Ok(DueEvaluatorConfig {
            unknown_hours_policy: self.get_unknown_hours_policy()?,
        })
    }

    // ===== 备件配置 =====

    /// 获取新建库存备件的默认库位卡
    pub fn get_default_storage_card(&self) -> Result<String, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_STORAGE_CARD, DEFAULT_STORAGE_CARD)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(DEFAULT_STORAGE_CARD.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 GARAGE_MAINTENANCE_DB_PATH（若设置）
/// - 否则: 用户数据目录/garage-maintenance/garage_maintenance.db
/// - 无法获取数据目录时: ./garage_maintenance.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("GARAGE_MAINTENANCE_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./garage_maintenance.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("garage-maintenance");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("garage_maintenance.db");
        }
    }

    path.to_string_lossy().to_string()
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 到期判定
    pub const UNKNOWN_HOURS_POLICY: &str = "maintenance/unknown_hours_policy";

    // 备件
    pub const DEFAULT_STORAGE_CARD: &str = "parts/default_storage_card";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn create_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let manager = create_manager();

        assert_eq!(
            manager.get_unknown_hours_policy().unwrap(),
            UnknownHoursPolicy::TreatAsZero
        );
        assert_eq!(manager.get_default_storage_card().unwrap(), DEFAULT_STORAGE_CARD);
    }

    #[test]
    fn test_override_and_snapshot() {
        let manager = create_manager();
        manager
            .set_global_config_value(config_keys::UNKNOWN_HOURS_POLICY, "SKIP_SIGNAL")
            .unwrap();
        manager
            .set_global_config_value(config_keys::DEFAULT_STORAGE_CARD, " SHELF-3 ")
            .unwrap();

        let config = manager.load_evaluator_config().unwrap();
        assert_eq!(config.unknown_hours_policy, UnknownHoursPolicy::SkipSignal);
        assert_eq!(manager.get_default_storage_card().unwrap(), "SHELF-3");

        let snapshot = manager.get_config_snapshot().unwrap();
        assert!(snapshot.contains("SKIP_SIGNAL"));
    }

    #[test]
    fn test_unrecognized_policy_falls_back() {
        let manager = create_manager();
        manager
            .set_global_config_value(config_keys::UNKNOWN_HOURS_POLICY, "sometimes")
            .unwrap();

        assert_eq!(
            manager.get_unknown_hours_policy().unwrap(),
            UnknownHoursPolicy::TreatAsZero
        );
    }
}
