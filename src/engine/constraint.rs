// ==========================================
// 考场分配系统 - 约束策略引擎
// ==========================================
// 职责: 班级与考场的兼容性判定
// 红线: 纯函数,只依赖 (班级, 考场, 当前部分计划, 规则配置)
// 红线: 所有规则必须输出 reason
// ==========================================

use crate::config::rule_config::RuleConfig;
use crate::domain::class_group::ClassGroup;
use crate::domain::room::Room;
use crate::domain::types::AcademicLevel;
use std::collections::HashSet;

// ==========================================
// PlacedClass - 考场内已放置的班级
// ==========================================
#[derive(Debug, Clone)]
pub struct PlacedClass {
    pub class_id: String,
    pub academic_level: AcademicLevel,
    pub department_id: String,
    pub seats: i32,
}

// ==========================================
// PlacementState - 单间考场的当前占用视图
// ==========================================
// 由打包策略在扫描时构造,约束策略只读
#[derive(Debug)]
pub struct PlacementState<'a> {
    pub placed: &'a [PlacedClass],                  // 该考场本轮已放置的班级
    pub used_seats: i32,                            // 该考场已占用座位数
    pub occupied_other_shifts: &'a HashSet<String>, // 同日其他场次已占用的考场ID
}

// ==========================================
// AllocationRule - 分配规则接口
// ==========================================
// 规则集合封闭可枚举,不接受自由回调
pub trait AllocationRule: Send + Sync {
    /// 规则代码 (进入 reason 前缀)
    fn code(&self) -> &'static str;

    /// 评估规则
    ///
    /// # 返回
    /// - `None`: 通过
    /// - `Some(detail)`: 违反,带细节说明
    fn check(
        &self,
        class: &ClassGroup,
        room: &Room,
        state: &PlacementState<'_>,
        config: &RuleConfig,
    ) -> Option<String>;
}

// ==========================================
// LevelSeparationRule - 本科/研究生分离规则
// ==========================================
pub struct LevelSeparationRule;

impl AllocationRule for LevelSeparationRule {
    fn code(&self) -> &'static str {
        "UG_PG_SEPARATION"
    }

    fn check(
        &self,
        class: &ClassGroup,
        _room: &Room,
        state: &PlacementState<'_>,
        config: &RuleConfig,
    ) -> Option<String> {
        if !config.strict_ug_pg_separation {
            return None;
        }

        state
            .placed
            .iter()
            .find(|p| p.academic_level != class.academic_level)
            .map(|p| {
                format!(
                    "room already holds {} class {}",
                    p.academic_level, p.class_id
                )
            })
    }
}

// ==========================================
// DepartmentMixingRule - 院系混排规则
// ==========================================
pub struct DepartmentMixingRule;

impl AllocationRule for DepartmentMixingRule {
    fn code(&self) -> &'static str {
        "DEPARTMENT_MIXING"
    }

    fn check(
        &self,
        class: &ClassGroup,
        _room: &Room,
        state: &PlacementState<'_>,
        config: &RuleConfig,
    ) -> Option<String> {
        if config.allow_department_mixing {
            return None;
        }

        state
            .placed
            .iter()
            .find(|p| p.department_id != class.department_id)
            .map(|p| format!("room already holds department {}", p.department_id))
    }
}

// ==========================================
// ShiftExclusivityRule - 同日场次互斥规则
// ==========================================
// 同一日期内,一间考场最多服务一个场次
pub struct ShiftExclusivityRule;

impl AllocationRule for ShiftExclusivityRule {
    fn code(&self) -> &'static str {
        "SHIFT_EXCLUSIVITY"
    }

    fn check(
        &self,
        _class: &ClassGroup,
        room: &Room,
        state: &PlacementState<'_>,
        config: &RuleConfig,
    ) -> Option<String> {
        if !config.strict_shift_separation {
            return None;
        }

        if state.occupied_other_shifts.contains(&room.room_id) {
            return Some("room occupied by another shift on the same date".to_string());
        }

        None
    }
}

// ==========================================
// ConstraintPolicy - 约束策略
// ==========================================
// 评估顺序: 容量 → 学历分离 → 院系混排 → 场次互斥,首个违反即返回
pub struct ConstraintPolicy {
    rules: Vec<Box<dyn AllocationRule>>,
}

impl ConstraintPolicy {
    /// 构造封闭规则集
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(LevelSeparationRule),
                Box::new(DepartmentMixingRule),
                Box::new(ShiftExclusivityRule),
            ],
        }
    }

    /// 整班放置兼容性判定
    ///
    /// # 参数
    /// - `required_seats`: 该班级尚未落位的人数
    ///
    /// # 返回
    /// - `None`: 可整班放入
    /// - `Some(reason)`: 首个违反项 (容量或规则)
    pub fn evaluate(
        &self,
        class: &ClassGroup,
        room: &Room,
        state: &PlacementState<'_>,
        config: &RuleConfig,
        required_seats: i32,
    ) -> Option<String> {
        let remaining = room.capacity - state.used_seats;
        if remaining < required_seats {
            return Some(format!(
                "CAPACITY_INSUFFICIENT: remaining={}, required={}",
                remaining, required_seats
            ));
        }

        self.check_rules(class, room, state, config)
    }

    /// 仅评估规则集 (拆分路径: 容量允许部分放置)
    ///
    /// # 返回
    /// - `None`: 全部规则通过
    /// - `Some(reason)`: 首个违反的规则,格式 "CODE: detail"
    pub fn check_rules(
        &self,
        class: &ClassGroup,
        room: &Room,
        state: &PlacementState<'_>,
        config: &RuleConfig,
    ) -> Option<String> {
        for rule in &self.rules {
            if let Some(detail) = rule.check(class, room, state, config) {
                return Some(format!("{}: {}", rule.code(), detail));
            }
        }
        None
    }
}

impl Default for ConstraintPolicy {
    fn default() -> Self {
        Self::new()
    }
}
