// ==========================================
// 考场分配系统 - 命令行入口
// ==========================================
// 用法:
//   exam-room-alloc <exam_date YYYY-MM-DD> <shift MORNING|AFTERNOON|EVENING>
//                   [--db path] [--actor name] [--create-session exam_type] [--json]
//
// 退出码: 0 = 分配成功 (允许部分未分配), 1 = 整体失败, 2 = 运行错误
// ==========================================

use chrono::NaiveDate;
use exam_room_alloc::api::AllocationApi;
use exam_room_alloc::config::ConfigManager;
use exam_room_alloc::db;
use exam_room_alloc::domain::types::Shift;
use exam_room_alloc::domain::ExamSession;
use exam_room_alloc::logging;
use exam_room_alloc::repository::ExamSessionRepository;
use std::error::Error;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("错误: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<bool, Box<dyn Error>> {
    let mut positional: Vec<String> = Vec::new();
    let mut db_path: Option<String> = None;
    let mut actor = "admin".to_string();
    let mut create_session: Option<String> = None;
    let mut json = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_path = Some(args.next().ok_or("--db 需要路径参数")?),
            "--actor" => actor = args.next().ok_or("--actor 需要名称参数")?,
            "--create-session" => {
                create_session = Some(args.next().ok_or("--create-session 需要考试类型参数")?)
            }
            "--json" => json = true,
            _ => positional.push(arg),
        }
    }

    if positional.len() != 2 {
        return Err(
            "用法: exam-room-alloc <exam_date> <shift> [--db path] [--actor name] [--create-session exam_type] [--json]"
                .into(),
        );
    }

    let exam_date = NaiveDate::parse_from_str(&positional[0], "%Y-%m-%d")
        .map_err(|_| format!("日期格式错误 (期望 YYYY-MM-DD): {}", positional[0]))?;
    let shift = Shift::from_str(&positional[1].to_ascii_uppercase())?;

    let db_path = match db_path {
        Some(p) => p,
        None => default_db_path()?,
    };

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;
    if let Some(v) = db::read_schema_version(&conn)? {
        if v != db::CURRENT_SCHEMA_VERSION {
            eprintln!(
                "警告: 数据库 schema 版本 {} 与期望 {} 不一致",
                v,
                db::CURRENT_SCHEMA_VERSION
            );
        }
    }
    let conn = Arc::new(Mutex::new(conn));

    // 场次不存在时按需创建 (管理端动作)
    if let Some(exam_type) = create_session {
        let session_repo = ExamSessionRepository::new(conn.clone());
        if session_repo.find(exam_date, shift)?.is_none() {
            let mut session = ExamSession::new(exam_date, shift, exam_type);
            session.created_by = Some(actor.clone());
            session_repo.create(&session)?;
        }
    }

    let config = Arc::new(ConfigManager::from_connection(conn.clone())?);
    let api = AllocationApi::from_connection(config, conn);

    let result = api.allocate(exam_date, shift, &actor).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.message);
        for a in &result.assignments {
            println!("  考场 {} <- 班级 {} ({} 座)", a.room_id, a.class_id, a.seats);
        }
        for u in &result.unallocated {
            println!(
                "  未分配 班级 {} 剩余 {} 人: {}",
                u.class_id, u.residual_seats, u.reason
            );
        }
    }

    Ok(result.success)
}

/// 默认数据库路径 (系统数据目录下)
fn default_db_path() -> Result<String, Box<dyn Error>> {
    let dir = dirs::data_dir()
        .ok_or("无法确定数据目录, 请使用 --db 指定数据库路径")?
        .join("exam-room-alloc");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("exam_room_alloc.db").to_string_lossy().into_owned())
}
