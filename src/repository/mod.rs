// ==========================================
// 考场分配系统 - 数据仓储层
// ==========================================
// 职责: 数据访问,行到领域对象的映射
// 红线: 业务规则不下沉到 SQL,引擎不拼 SQL
// ==========================================

pub mod allocation_repo;
pub mod class_repo;
pub mod error;
pub mod room_repo;
pub mod session_repo;

pub use allocation_repo::AllocationRepository;
pub use class_repo::ClassGroupRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use room_repo::RoomRepository;
pub use session_repo::ExamSessionRepository;
