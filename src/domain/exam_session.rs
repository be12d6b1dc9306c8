// ==========================================
// 考场分配系统 - 考试场次领域模型
// ==========================================
// 同一 (日期, 场次) 最多存在一代有效分配
// ==========================================

use crate::domain::types::Shift;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ExamSession - 考试场次
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSession {
    pub exam_date: NaiveDate,       // 考试日期
    pub shift: Shift,               // 场次
    pub exam_type: String,          // 考试类型 (如 "期末考试")
    pub created_by: Option<String>, // 创建人
}

impl ExamSession {
    pub fn new(exam_date: NaiveDate, shift: Shift, exam_type: impl Into<String>) -> Self {
        Self {
            exam_date,
            shift,
            exam_type: exam_type.into(),
            created_by: None,
        }
    }

    /// 场次标识 (用于日志与锁键)
    pub fn session_key(&self) -> String {
        format!("{}#{}", self.exam_date.format("%Y-%m-%d"), self.shift)
    }
}
