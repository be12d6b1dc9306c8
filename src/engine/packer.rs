// ==========================================
// 考场分配系统 - 考场打包引擎
// ==========================================
// 职责: 首次适应递减装箱,班级尽量整班落位
// 输入: 班级列表 + 考场列表 + 他场次占用 + 规则配置
// 输出: 考场负载计划 + 未分配班级列表
// 红线: 排序与选择全程确定性,相同输入必须产出相同计划
// ==========================================

use crate::config::rule_config::RuleConfig;
use crate::domain::class_group::ClassGroup;
use crate::domain::room::Room;
use crate::engine::constraint::{ConstraintPolicy, PlacedClass, PlacementState};
use crate::engine::result::{AllocationStatistics, SeatAssignment, UnallocatedClass};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

// ==========================================
// RoomLoad - 单间考场的负载
// ==========================================
#[derive(Debug, Clone)]
pub struct RoomLoad {
    pub room: Room,
    pub used_seats: i32,
    pub placed: Vec<PlacedClass>,
}

impl RoomLoad {
    fn new(room: Room) -> Self {
        Self {
            room,
            used_seats: 0,
            placed: Vec::new(),
        }
    }

    /// 剩余可用座位
    pub fn remaining_capacity(&self) -> i32 {
        self.room.capacity - self.used_seats
    }

    /// 本轮是否被占用
    pub fn is_used(&self) -> bool {
        self.used_seats > 0
    }

    fn state<'a>(&'a self, occupied: &'a HashSet<String>) -> PlacementState<'a> {
        PlacementState {
            placed: &self.placed,
            used_seats: self.used_seats,
            occupied_other_shifts: occupied,
        }
    }

    fn place(&mut self, class: &ClassGroup, seats: i32) {
        self.placed.push(PlacedClass {
            class_id: class.class_id.clone(),
            academic_level: class.academic_level,
            department_id: class.department_id.clone(),
            seats,
        });
        self.used_seats += seats;
    }
}

// ==========================================
// PackingPlan - 打包计划
// ==========================================
#[derive(Debug, Clone)]
pub struct PackingPlan {
    pub room_loads: Vec<RoomLoad>,
    pub unallocated: Vec<UnallocatedClass>,
}

impl PackingPlan {
    /// 展开为座位指派列表 (考场顺序 × 放置顺序)
    pub fn assignments(&self) -> Vec<SeatAssignment> {
        self.room_loads
            .iter()
            .flat_map(|load| {
                load.placed.iter().map(|p| SeatAssignment {
                    room_id: load.room.room_id.clone(),
                    class_id: p.class_id.clone(),
                    seats: p.seats,
                })
            })
            .collect()
    }

    /// 汇总统计
    ///
    /// classes_allocated 只统计完整落位的班级;
    /// 拆分后仍有剩余人数的班级同时出现在指派与 unallocated 中。
    pub fn statistics(&self) -> AllocationStatistics {
        let residual_ids: HashSet<&str> = self
            .unallocated
            .iter()
            .map(|u| u.class_id.as_str())
            .collect();

        let mut placed_ids: HashSet<&str> = HashSet::new();
        let mut students_allocated: i64 = 0;
        for load in &self.room_loads {
            for p in &load.placed {
                placed_ids.insert(p.class_id.as_str());
                students_allocated += i64::from(p.seats);
            }
        }

        AllocationStatistics {
            classes_allocated: placed_ids
                .iter()
                .filter(|id| !residual_ids.contains(*id))
                .count(),
            students_allocated,
            rooms_used: self.room_loads.iter().filter(|l| l.is_used()).count(),
        }
    }
}

// ==========================================
// RoomPacker - 考场打包引擎
// ==========================================
pub struct RoomPacker {
    policy: ConstraintPolicy,
}

impl RoomPacker {
    /// 构造函数
    pub fn new() -> Self {
        Self {
            policy: ConstraintPolicy::new(),
        }
    }

    /// 执行打包
    ///
    /// 算法 (首次适应递减):
    /// 1) 班级按人数降序排序,同人数按 class_id 升序
    /// 2) 考场按容量降序排序,同容量按 room_id 升序
    /// 3) 逐班级扫描: 首个规则兼容且余量足够的考场整班放入;
    ///    无单间可容纳时反复选取规则兼容且剩余容量最大的考场拆分放入;
    ///    仍有剩余人数则带原因记入 unallocated,继续下一班级
    ///
    /// # 参数
    /// - `occupied_other_shifts`: 同日其他场次已占用的考场ID (场次互斥规则消费)
    ///
    /// # 返回
    /// 打包计划 (考场负载 + 未分配班级)
    #[instrument(skip_all, fields(classes_count = classes.len(), rooms_count = rooms.len()))]
    pub fn pack(
        &self,
        classes: &[ClassGroup],
        rooms: &[Room],
        occupied_other_shifts: &HashSet<String>,
        config: &RuleConfig,
    ) -> PackingPlan {
        // 1. 确定性排序
        let mut sorted_classes: Vec<ClassGroup> = classes.to_vec();
        sorted_classes.sort_by(|a, b| {
            b.student_count
                .cmp(&a.student_count)
                .then_with(|| a.class_id.cmp(&b.class_id))
        });

        let mut sorted_rooms: Vec<Room> = rooms.to_vec();
        sorted_rooms.sort_by(|a, b| {
            b.capacity
                .cmp(&a.capacity)
                .then_with(|| a.room_id.cmp(&b.room_id))
        });
        let mut loads: Vec<RoomLoad> = sorted_rooms.into_iter().map(RoomLoad::new).collect();

        let mut unallocated: Vec<UnallocatedClass> = Vec::new();

        for class in &sorted_classes {
            let mut remaining = class.student_count;

            // 2. 整班落位: 顺序扫描首个可整班容纳的考场
            let mut whole_idx: Option<usize> = None;
            for idx in 0..loads.len() {
                let state = loads[idx].state(occupied_other_shifts);
                if self
                    .policy
                    .evaluate(class, &loads[idx].room, &state, config, remaining)
                    .is_none()
                {
                    whole_idx = Some(idx);
                    break;
                }
            }
            if let Some(idx) = whole_idx {
                loads[idx].place(class, remaining);
                debug!(
                    class_id = %class.class_id,
                    room_id = %loads[idx].room.room_id,
                    seats = remaining,
                    "整班落位"
                );
                continue;
            }

            // 3. 拆分路径: 反复选取规则兼容且剩余容量最大的考场
            let mut last_rule_reason: Option<String> = None;
            while remaining > 0 {
                let mut best: Option<usize> = None;
                for idx in 0..loads.len() {
                    if loads[idx].remaining_capacity() <= 0 {
                        continue;
                    }
                    let state = loads[idx].state(occupied_other_shifts);
                    if let Some(reason) =
                        self.policy
                            .check_rules(class, &loads[idx].room, &state, config)
                    {
                        last_rule_reason = Some(reason);
                        continue;
                    }
                    best = match best {
                        Some(b)
                            if loads[b].remaining_capacity()
                                >= loads[idx].remaining_capacity() =>
                        {
                            Some(b)
                        }
                        _ => Some(idx),
                    };
                }

                let Some(idx) = best else { break };
                let take = remaining.min(loads[idx].remaining_capacity());
                loads[idx].place(class, take);
                remaining -= take;
                debug!(
                    class_id = %class.class_id,
                    room_id = %loads[idx].room.room_id,
                    seats = take,
                    residual = remaining,
                    "拆分落位"
                );
            }

            // 4. 剩余人数带原因上报,不中断本轮运行
            if remaining > 0 {
                let reason = if loads.is_empty() {
                    "NO_ROOMS_AVAILABLE: no active room for this session".to_string()
                } else {
                    last_rule_reason.unwrap_or_else(|| {
                        "CAPACITY_EXHAUSTED: no compatible room has remaining capacity"
                            .to_string()
                    })
                };
                warn!(
                    class_id = %class.class_id,
                    residual = remaining,
                    reason = %reason,
                    "班级未能完整分配"
                );
                unallocated.push(UnallocatedClass {
                    class_id: class.class_id.clone(),
                    residual_seats: remaining,
                    reason,
                });
            }
        }

        PackingPlan {
            room_loads: loads,
            unallocated,
        }
    }
}

impl Default for RoomPacker {
    fn default() -> Self {
        Self::new()
    }
}
