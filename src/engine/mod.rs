// ==========================================
// 考场分配系统 - 引擎层
// ==========================================
// 职责: 约束判定、打包计算与运行编排
// 红线: Engine 不拼 SQL, 所有规则必须输出 reason
// ==========================================

pub mod allocator;
pub mod constraint;
pub mod error;
pub mod packer;
pub mod result;

// 重导出核心引擎
pub use allocator::AllocationEngine;
pub use constraint::{
    AllocationRule, ConstraintPolicy, DepartmentMixingRule, LevelSeparationRule, PlacedClass,
    PlacementState, ShiftExclusivityRule,
};
pub use error::{AllocationEngineResult, AllocationError};
pub use packer::{PackingPlan, RoomLoad, RoomPacker};
pub use result::{AllocationResult, AllocationStatistics, SeatAssignment, UnallocatedClass};
