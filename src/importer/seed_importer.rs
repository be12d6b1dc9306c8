// ==========================================
// 考场分配系统 - 主数据 CSV 导入
// ==========================================
// 职责: 班级/考场主数据从 CSV 文件入库
// 红线: 逐行校验,不合格行带原因跳过,合格行继续入库
// ==========================================

use crate::domain::class_group::ClassGroup;
use crate::domain::room::Room;
use crate::domain::types::{AcademicLevel, RoomType};
use crate::importer::error::{ImportError, ImportResult};
use crate::repository::class_repo::ClassGroupRepository;
use crate::repository::room_repo::RoomRepository;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// CSV 行格式
// ==========================================

#[derive(Debug, Deserialize)]
struct ClassGroupRecord {
    class_id: String,
    class_name: String,
    academic_year: String,
    academic_level: String,
    department_id: String,
    student_count: i32,
    #[serde(default = "default_active")]
    active: i32,
}

#[derive(Debug, Deserialize)]
struct RoomRecord {
    room_id: String,
    room_code: String,
    room_name: String,
    capacity: i32,
    room_type: String,
    #[serde(default)]
    floor_no: i32,
    #[serde(default)]
    building: String,
    #[serde(default)]
    has_projector: i32,
    #[serde(default)]
    has_whiteboard: i32,
    #[serde(default)]
    has_computers: i32,
    #[serde(default = "default_active")]
    active: i32,
}

fn default_active() -> i32 {
    1
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub imported: usize,
    /// 被跳过的行: (行号, 原因)
    pub skipped: Vec<(usize, String)>,
}

// ==========================================
// SeedImporter - 主数据导入器
// ==========================================
pub struct SeedImporter {
    class_repo: Arc<ClassGroupRepository>,
    room_repo: Arc<RoomRepository>,
}

impl SeedImporter {
    /// 创建新的 SeedImporter 实例
    pub fn new(class_repo: Arc<ClassGroupRepository>, room_repo: Arc<RoomRepository>) -> Self {
        Self {
            class_repo,
            room_repo,
        }
    }

    /// 从 CSV 导入班级主数据
    ///
    /// CSV 表头: class_id,class_name,academic_year,academic_level,
    ///           department_id,student_count[,active]
    ///
    /// # 返回
    /// - `Ok(ImportSummary)`: 入库行数与被跳过的行
    /// - `Err`: 文件不可读或数据库写入失败
    pub fn import_classes(&self, path: &Path) -> ImportResult<ImportSummary> {
        let mut reader = self.open_reader(path)?;
        let mut imported = 0usize;
        let mut skipped: Vec<(usize, String)> = Vec::new();

        for (idx, record) in reader.deserialize::<ClassGroupRecord>().enumerate() {
            let row_no = idx + 2; // 首行为表头
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    skipped.push((row_no, format!("CSV_ROW_INVALID: {}", e)));
                    continue;
                }
            };

            let level = match AcademicLevel::from_str(record.academic_level.trim()) {
                Ok(l) => l,
                Err(e) => {
                    skipped.push((row_no, e.to_string()));
                    continue;
                }
            };

            let class = match ClassGroup::new(
                record.class_id,
                record.class_name,
                record.academic_year,
                level,
                record.department_id,
                record.student_count,
                record.active != 0,
            ) {
                Ok(c) => c,
                Err(e) => {
                    skipped.push((row_no, e.to_string()));
                    continue;
                }
            };

            self.class_repo.upsert(&class)?;
            imported += 1;
        }

        for (row_no, reason) in &skipped {
            warn!(row = row_no, reason = %reason, "班级行被跳过");
        }
        info!(imported, skipped = skipped.len(), "班级主数据导入完成");

        Ok(ImportSummary { imported, skipped })
    }

    /// 从 CSV 导入考场主数据
    ///
    /// CSV 表头: room_id,room_code,room_name,capacity,room_type
    ///           [,floor_no,building,has_projector,has_whiteboard,has_computers,active]
    pub fn import_rooms(&self, path: &Path) -> ImportResult<ImportSummary> {
        let mut reader = self.open_reader(path)?;
        let mut imported = 0usize;
        let mut skipped: Vec<(usize, String)> = Vec::new();

        for (idx, record) in reader.deserialize::<RoomRecord>().enumerate() {
            let row_no = idx + 2;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    skipped.push((row_no, format!("CSV_ROW_INVALID: {}", e)));
                    continue;
                }
            };

            let room_type = match RoomType::from_str(record.room_type.trim()) {
                Ok(t) => t,
                Err(e) => {
                    skipped.push((row_no, e.to_string()));
                    continue;
                }
            };

            let room = match Room::new(
                record.room_id,
                record.room_code,
                record.room_name,
                record.capacity,
                room_type,
                record.floor_no,
                record.building,
                record.has_projector != 0,
                record.has_whiteboard != 0,
                record.has_computers != 0,
                record.active != 0,
            ) {
                Ok(r) => r,
                Err(e) => {
                    skipped.push((row_no, e.to_string()));
                    continue;
                }
            };

            self.room_repo.upsert(&room)?;
            imported += 1;
        }

        for (row_no, reason) in &skipped {
            warn!(row = row_no, reason = %reason, "考场行被跳过");
        }
        info!(imported, skipped = skipped.len(), "考场主数据导入完成");

        Ok(ImportSummary { imported, skipped })
    }

    fn open_reader(&self, path: &Path) -> ImportResult<csv::Reader<std::fs::File>> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| ImportError::CsvParseError(e.to_string()))
    }
}
