// Small admin utility: load class/room master data from CSV files.
//
// Usage:
//   cargo run --bin import_seed_data -- <db_path> [--classes file.csv] [--rooms file.csv]
//
// This is intentionally lightweight and does not touch allocation state.

use exam_room_alloc::db;
use exam_room_alloc::importer::SeedImporter;
use exam_room_alloc::repository::{ClassGroupRepository, RoomRepository};
use std::error::Error;
use std::path::Path;
use std::sync::{Arc, Mutex};

fn main() -> Result<(), Box<dyn Error>> {
    exam_room_alloc::logging::init();

    let mut db_path: Option<String> = None;
    let mut classes_csv: Option<String> = None;
    let mut rooms_csv: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--classes" => classes_csv = Some(args.next().ok_or("--classes 需要文件路径")?),
            "--rooms" => rooms_csv = Some(args.next().ok_or("--rooms 需要文件路径")?),
            _ => db_path = Some(arg),
        }
    }

    let db_path = db_path.ok_or("用法: import_seed_data <db_path> [--classes file.csv] [--rooms file.csv]")?;
    if classes_csv.is_none() && rooms_csv.is_none() {
        return Err("至少指定 --classes 或 --rooms 之一".into());
    }

    let conn = db::open_sqlite_connection(&db_path)?;
    db::init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let importer = SeedImporter::new(
        Arc::new(ClassGroupRepository::new(conn.clone())),
        Arc::new(RoomRepository::new(conn)),
    );

    if let Some(path) = classes_csv {
        let summary = importer.import_classes(Path::new(&path))?;
        println!(
            "classes: imported={} skipped={}",
            summary.imported,
            summary.skipped.len()
        );
        for (row, reason) in &summary.skipped {
            println!("  row {}: {}", row, reason);
        }
    }

    if let Some(path) = rooms_csv {
        let summary = importer.import_rooms(Path::new(&path))?;
        println!(
            "rooms: imported={} skipped={}",
            summary.imported,
            summary.skipped.len()
        );
        for (row, reason) in &summary.skipped {
            println!("  row {}: {}", row, reason);
        }
    }

    Ok(())
}
