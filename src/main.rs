// ==========================================
// 车队维保系统 - 到期扫描命令行入口
// ==========================================
// 用法: maintenance-sweep [数据库路径] [--bill <备件清单.csv>]
// 未指定数据库路径时使用 GARAGE_MAINTENANCE_DB_PATH 或系统数据目录
// ==========================================

use std::error::Error;
use std::path::PathBuf;

use garage_maintenance::app::{get_default_db_path, AppState};
use garage_maintenance::logging;

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 到期扫描", garage_maintenance::APP_NAME);
    tracing::info!("系统版本: {}", garage_maintenance::VERSION);
    tracing::info!("==================================================");

    let mut db_path: Option<String> = None;
    let mut bill_path: Option<PathBuf> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--bill" {
            let path = args.next().ok_or("--bill 需要指定文件路径")?;
            bill_path = Some(PathBuf::from(path));
        } else if db_path.is_none() {
            db_path = Some(arg);
        } else {
            return Err(format!("无法识别的参数: {}", arg).into());
        }
    }

    let db_path = db_path.unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    let app_state = AppState::new(db_path)?;

    if let Some(bill_path) = bill_path {
        let records = app_state.maintenance_api.import_bill_of_parts(&bill_path)?;
        println!("备件核对完成: {} 条", records.len());
        for record in &records {
            println!(
                "  {}/{}/{} 数量={} 库位={}",
                record.name, record.manufacturer, record.part_number, record.quantity, record.storage_card
            );
        }
    }

    let now = chrono::Local::now().naive_local();
    let summary = app_state.maintenance_api.run_due_sweep(now)?;

    println!(
        "扫描完成: 车辆 {} 辆, 维保记录 {} 条, 新增计划 {} 条, 失败 {} 条",
        summary.vehicles_scanned,
        summary.occurrences_evaluated,
        summary.planned.len(),
        summary.failures.len()
    );
    for planned in &summary.planned {
        println!("  计划: {} {} @ {}", planned.vehicle_id, planned.job_name, planned.planned_at);
    }
    for failure in &summary.failures {
        println!(
            "  失败: vehicle={} occurrence={} {}",
            failure.vehicle_id,
            failure.occurrence_id.as_deref().unwrap_or("-"),
            failure.message
        );
    }

    Ok(())
}
