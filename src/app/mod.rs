// ==========================================
// 车队维保系统 - 应用层
// ==========================================
// 职责: 组装仓储、引擎与 API，供命令行入口使用
// ==========================================

pub mod state;

// 重导出
pub use state::AppState;
pub use crate::config::get_default_db_path;
