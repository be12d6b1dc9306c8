// ==========================================
// 考场分配系统 - 分配结果契约
// ==========================================
// 消费者: 管理端工具 (CLI / 报表协作方)
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// SeatAssignment - 单条座位指派
// ==========================================
// 一个班级在一间考场占用的座位数;拆分班级会产生多条
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub room_id: String,  // 考场ID
    pub class_id: String, // 班级ID
    pub seats: i32,       // 座位数
}

// ==========================================
// UnallocatedClass - 未分配班级
// ==========================================
// 红线: 规则不满足不得静默丢弃,必须带原因上报
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnallocatedClass {
    pub class_id: String,   // 班级ID
    pub residual_seats: i32, // 未落位人数
    pub reason: String,     // 原因 (ALL_CAPS 前缀 + 细节)
}

// ==========================================
// AllocationStatistics - 分配统计
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStatistics {
    pub classes_allocated: usize, // 完整落位的班级数
    pub students_allocated: i64,  // 已落位考生数
    pub rooms_used: usize,        // 使用的考场数
}

// ==========================================
// AllocationResult - 分配结果
// ==========================================
// 部分班级未落位时 success 仍为 true (区别于整体失败)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationResult {
    pub success: bool,
    pub message: String,
    pub assignments: Vec<SeatAssignment>,
    pub unallocated: Vec<UnallocatedClass>,
    pub statistics: AllocationStatistics,
}

impl AllocationResult {
    /// 构造失败结果 (不触碰存储的整体失败路径)
    pub fn failure(message: impl Into<String>, unallocated: Vec<UnallocatedClass>) -> Self {
        Self {
            success: false,
            message: message.into(),
            assignments: Vec::new(),
            unallocated,
            statistics: AllocationStatistics::default(),
        }
    }
}
