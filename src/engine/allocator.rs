// ==========================================
// 考场分配系统 - 分配运行编排器
// ==========================================
// 职责: 校验 → 读取 → 打包 → 事务落库
// 状态机: Validating → Clearing → Writing → Committed
//         任一写入失败整体回滚,旧一代分配保持原样
// 红线: 失败结果 (success=false) 不触碰已持久化的分配
// ==========================================

use crate::config::rule_config_trait::RuleConfigReader;
use crate::domain::allocation::Allocation;
use crate::domain::types::Shift;
use crate::engine::error::{AllocationEngineResult, AllocationError};
use crate::engine::packer::RoomPacker;
use crate::engine::result::{AllocationResult, UnallocatedClass};
use crate::repository::allocation_repo::AllocationRepository;
use crate::repository::class_repo::ClassGroupRepository;
use crate::repository::room_repo::RoomRepository;
use crate::repository::session_repo::ExamSessionRepository;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, instrument};

// ==========================================
// AllocationEngine - 分配运行编排器
// ==========================================
pub struct AllocationEngine<C>
where
    C: RuleConfigReader,
{
    config: Arc<C>,
    class_repo: Arc<ClassGroupRepository>,
    room_repo: Arc<RoomRepository>,
    session_repo: Arc<ExamSessionRepository>,
    allocation_repo: Arc<AllocationRepository>,
    packer: RoomPacker,
}

impl<C> AllocationEngine<C>
where
    C: RuleConfigReader,
{
    /// 创建新的编排器实例
    pub fn new(
        config: Arc<C>,
        class_repo: Arc<ClassGroupRepository>,
        room_repo: Arc<RoomRepository>,
        session_repo: Arc<ExamSessionRepository>,
        allocation_repo: Arc<AllocationRepository>,
    ) -> Self {
        Self {
            config,
            class_repo,
            room_repo,
            session_repo,
            allocation_repo,
            packer: RoomPacker::new(),
        }
    }

    /// 执行一次完整分配运行 (单场次)
    ///
    /// # 参数
    /// - `exam_date` / `shift`: 目标场次
    /// - `actor`: 触发人 (写入 created_by)
    ///
    /// # 返回
    /// - `Ok(AllocationResult)`: 运行结束 (success 标志区分整体失败与部分未分配)
    /// - `Err(InvalidRequest)`: 场次不存在或无任何班级与考场
    /// - `Err(DataAccess)`: 提供者或存储不可达 (事务内失败已回滚)
    #[instrument(skip(self), fields(exam_date = %exam_date, shift = %shift))]
    pub async fn allocate(
        &self,
        exam_date: NaiveDate,
        shift: Shift,
        actor: &str,
    ) -> AllocationEngineResult<AllocationResult> {
        // ==========================================
        // 步骤1: 校验 (Validating)
        // ==========================================
        let session = self
            .session_repo
            .find(exam_date, shift)?
            .ok_or_else(|| {
                AllocationError::InvalidRequest(format!(
                    "考试场次不存在: {} {}",
                    exam_date.format("%Y-%m-%d"),
                    shift
                ))
            })?;

        let rule_config = self
            .config
            .get_rule_config()
            .await
            .map_err(|e| AllocationError::ConfigError(e.to_string()))?;

        // ==========================================
        // 步骤2: 读取 (Providers)
        // ==========================================
        let classes = self.class_repo.list_active()?;
        let rooms = self.room_repo.list_active()?;

        if classes.is_empty() && rooms.is_empty() {
            return Err(AllocationError::InvalidRequest(
                "无任何启用班级与考场, 场次不具备分配条件".to_string(),
            ));
        }

        info!(
            session = %session.session_key(),
            classes_count = classes.len(),
            rooms_count = rooms.len(),
            allow_department_mixing = rule_config.allow_department_mixing,
            strict_ug_pg_separation = rule_config.strict_ug_pg_separation,
            strict_shift_separation = rule_config.strict_shift_separation,
            "开始执行考场分配"
        );

        // 整体失败路径: 有班级而无考场,不触碰已持久化的分配
        if rooms.is_empty() {
            let unallocated = classes
                .iter()
                .map(|c| UnallocatedClass {
                    class_id: c.class_id.clone(),
                    residual_seats: c.student_count,
                    reason: "NO_ROOMS_AVAILABLE: no active room for this session".to_string(),
                })
                .collect();
            info!(session = %session.session_key(), "分配失败: 该场次无可用考场");
            return Ok(AllocationResult::failure(
                "分配失败: 该场次无可用考场",
                unallocated,
            ));
        }

        // 场次互斥规则的占用来源: 同日其他场次的已持久化分配
        let occupied_other_shifts: HashSet<String> = if rule_config.strict_shift_separation {
            self.allocation_repo
                .occupied_room_ids_other_shifts(exam_date, shift)?
                .into_iter()
                .collect()
        } else {
            HashSet::new()
        };

        // ==========================================
        // 步骤3: 打包计算 (纯内存,不触碰存储)
        // ==========================================
        let plan = self
            .packer
            .pack(&classes, &rooms, &occupied_other_shifts, &rule_config);
        let assignments = plan.assignments();
        let statistics = plan.statistics();

        // ==========================================
        // 步骤4: 事务落库 (Clearing + Writing, 单事务)
        // ==========================================
        let rows: Vec<Allocation> = assignments
            .iter()
            .map(|a| Allocation::new(&session, &a.room_id, &a.class_id, a.seats, actor))
            .collect();
        self.allocation_repo.replace_for_session(&session, &rows)?;

        let message = if classes.is_empty() {
            "无待分配班级, 已清空该场次历史分配".to_string()
        } else if plan.unallocated.is_empty() {
            format!(
                "分配完成: {} 个班级全部落位, 共 {} 名考生, 使用考场 {} 间",
                statistics.classes_allocated,
                statistics.students_allocated,
                statistics.rooms_used
            )
        } else {
            format!(
                "分配完成: {} 个班级完整落位, {} 个班级未能完整分配",
                statistics.classes_allocated,
                plan.unallocated.len()
            )
        };

        info!(
            session = %session.session_key(),
            classes_allocated = statistics.classes_allocated,
            students_allocated = statistics.students_allocated,
            rooms_used = statistics.rooms_used,
            unallocated_count = plan.unallocated.len(),
            "考场分配已提交"
        );

        Ok(AllocationResult {
            success: true,
            message,
            assignments,
            unallocated: plan.unallocated,
            statistics,
        })
    }
}
