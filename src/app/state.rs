// ==========================================
// 车队维保系统 - 应用状态
// ==========================================
// 职责: 打开数据库、初始化表结构、装配各层实例
// 说明: 所有仓储与配置管理器共享同一连接
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::MaintenanceApi;
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{DueJobEvaluator, MaintenanceSweep, PartsReconciler};
use crate::repository::{
    OccurrenceRepository, PartRepository, PlannedOccurrenceRepository, VehicleRepository,
};

/// 应用状态
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 维保API
    pub maintenance_api: Arc<MaintenanceApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    /// 车辆仓储（用于录入与查询）
    pub vehicle_repo: Arc<VehicleRepository>,

    /// 维保记录仓储
    pub occurrence_repo: Arc<OccurrenceRepository>,

    /// 计划维保仓储
    pub planned_repo: Arc<PlannedOccurrenceRepository>,

    /// 库存备件仓储
    pub part_repo: Arc<PartRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 1. 打开数据库并初始化表结构（幂等）
    /// 2. 从配置表读取判定策略与默认库位卡
    /// 3. 装配 Repository → Engine → API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化表结构: {}", e))?;

        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 基于已初始化表结构的共享连接装配
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let vehicle_repo = Arc::new(VehicleRepository::from_connection(conn.clone()));
        let occurrence_repo = Arc::new(OccurrenceRepository::from_connection(conn.clone()));
        let planned_repo = Arc::new(PlannedOccurrenceRepository::from_connection(conn.clone()));
        let part_repo = Arc::new(PartRepository::from_connection(conn.clone()));

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        match config_manager.get_config_snapshot() {
            Ok(snapshot) => tracing::debug!("生效配置快照: {}", snapshot),
            Err(e) => tracing::warn!("配置快照读取失败: {}", e),
        }

        let evaluator_config = config_manager
            .load_evaluator_config()
            .map_err(|e| format!("无法加载判定配置: {}", e))?;
        tracing::info!(
            "到期判定配置: unknown_hours_policy={}",
            evaluator_config.unknown_hours_policy.to_db_str()
        );
        let evaluator = DueJobEvaluator::with_config(evaluator_config);

        let storage_card = config_manager
            .get_default_storage_card()
            .map_err(|e| format!("无法读取默认库位卡: {}", e))?;

        let sweep = Arc::new(MaintenanceSweep::new(
            vehicle_repo.clone(),
            occurrence_repo.clone(),
            planned_repo.clone(),
            evaluator,
        ));
        let reconciler = Arc::new(PartsReconciler::with_storage_card(
            part_repo.clone(),
            &storage_card,
        ));

        // ==========================================
        // 初始化API层
        // ==========================================
        let maintenance_api = Arc::new(MaintenanceApi::new(sweep, reconciler));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            maintenance_api,
            config_manager,
            vehicle_repo,
            occurrence_repo,
            planned_repo,
            part_repo,
        })
    }
}
