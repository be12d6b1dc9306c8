// ==========================================
// 考场分配系统 - 领域层
// ==========================================
// 职责: 实体与类型定义,构造时校验数据约束
// 红线: 领域层不访问数据库,不拼 SQL
// ==========================================

pub mod allocation;
pub mod class_group;
pub mod exam_session;
pub mod room;
pub mod types;

pub use allocation::Allocation;
pub use class_group::ClassGroup;
pub use exam_session::ExamSession;
pub use room::Room;
pub use types::{AcademicLevel, EnumParseError, RoomType, Shift};

use thiserror::Error;

/// 领域层错误类型 (构造时校验失败)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}
