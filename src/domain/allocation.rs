// ==========================================
// 考场分配系统 - 分配记录领域模型
// ==========================================
// 红线: 分配记录按场次整代生成与销毁,不做单条修改
// ==========================================

use crate::domain::exam_session::ExamSession;
use crate::domain::types::Shift;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// Allocation - 考场分配记录
// ==========================================
// 归一化存储: 每行对应 (场次, 考场, 班级) 与其占用座位数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub allocation_id: String,     // 分配记录ID (UUID)
    pub exam_date: NaiveDate,      // 考试日期
    pub shift: Shift,              // 场次
    pub room_id: String,           // 考场ID
    pub class_id: String,          // 班级ID
    pub seats: i32,                // 该班级在该考场占用的座位数
    pub confirmed: bool,           // 是否已确认 (管理员签发)
    pub created_by: String,        // 创建人
    pub created_at: DateTime<Utc>, // 创建时间
}

impl Allocation {
    /// 由分配计划生成一条新的分配记录 (未确认状态)
    pub fn new(
        session: &ExamSession,
        room_id: impl Into<String>,
        class_id: impl Into<String>,
        seats: i32,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            allocation_id: Uuid::new_v4().to_string(),
            exam_date: session.exam_date,
            shift: session.shift,
            room_id: room_id.into(),
            class_id: class_id.into(),
            seats,
            confirmed: false,
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_allocation_defaults() {
        let session = ExamSession::new(
            NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            Shift::Afternoon,
            "期末考试",
        );
        let alloc = Allocation::new(&session, "R001", "C001", 42, "admin");

        assert!(!alloc.confirmed);
        assert_eq!(alloc.seats, 42);
        assert_eq!(alloc.shift, Shift::Afternoon);
        assert!(!alloc.allocation_id.is_empty());
    }
}
