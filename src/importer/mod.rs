// ==========================================
// 车队维保系统 - 导入层
// ==========================================
// 职责: 外部备件清单导入,生成备件需求
// 支持: CSV
// ==========================================

pub mod bill_of_parts;
pub mod error;

// 重导出核心类型
pub use bill_of_parts::BillOfPartsParser;
pub use error::{ImportError, ImportResult};
