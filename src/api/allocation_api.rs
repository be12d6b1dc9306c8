// ==========================================
// 考场分配系统 - 分配业务接口
// ==========================================
// 职责: 管理端工具消费的薄接口,组装引擎与仓储
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::rule_config_trait::RuleConfigReader;
use crate::domain::allocation::Allocation;
use crate::domain::exam_session::ExamSession;
use crate::domain::types::Shift;
use crate::engine::allocator::AllocationEngine;
use crate::engine::result::AllocationResult;
use crate::repository::allocation_repo::AllocationRepository;
use crate::repository::class_repo::ClassGroupRepository;
use crate::repository::room_repo::RoomRepository;
use crate::repository::session_repo::ExamSessionRepository;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

// ==========================================
// AllocationApi - 分配业务接口
// ==========================================
pub struct AllocationApi<C>
where
    C: RuleConfigReader,
{
    engine: AllocationEngine<C>,
    session_repo: Arc<ExamSessionRepository>,
    allocation_repo: Arc<AllocationRepository>,
}

impl<C> AllocationApi<C>
where
    C: RuleConfigReader,
{
    /// 创建新的 AllocationApi 实例 (显式注入仓储)
    pub fn new(
        config: Arc<C>,
        class_repo: Arc<ClassGroupRepository>,
        room_repo: Arc<RoomRepository>,
        session_repo: Arc<ExamSessionRepository>,
        allocation_repo: Arc<AllocationRepository>,
    ) -> Self {
        Self {
            engine: AllocationEngine::new(
                config,
                class_repo,
                room_repo,
                session_repo.clone(),
                allocation_repo.clone(),
            ),
            session_repo,
            allocation_repo,
        }
    }

    /// 从共享连接构建全套仓储并组装接口
    pub fn from_connection(config: Arc<C>, conn: Arc<Mutex<Connection>>) -> Self {
        let class_repo = Arc::new(ClassGroupRepository::new(conn.clone()));
        let room_repo = Arc::new(RoomRepository::new(conn.clone()));
        let session_repo = Arc::new(ExamSessionRepository::new(conn.clone()));
        let allocation_repo = Arc::new(AllocationRepository::new(conn));

        Self::new(config, class_repo, room_repo, session_repo, allocation_repo)
    }

    /// 执行一次分配运行
    ///
    /// # 返回
    /// - `Ok(AllocationResult)`: success 标志区分整体失败与部分未分配
    pub async fn allocate(
        &self,
        exam_date: NaiveDate,
        shift: Shift,
        actor: &str,
    ) -> ApiResult<AllocationResult> {
        Ok(self.engine.allocate(exam_date, shift, actor).await?)
    }

    /// 创建考试场次
    pub fn create_session(&self, session: &ExamSession) -> ApiResult<()> {
        if session.exam_type.trim().is_empty() {
            return Err(ApiError::InvalidParam("考试类型不能为空".to_string()));
        }

        self.session_repo.create(session)?;
        Ok(())
    }

    /// 整场次确认分配 (管理员签发)
    pub fn confirm_allocations(&self, exam_date: NaiveDate, shift: Shift) -> ApiResult<usize> {
        Ok(self.allocation_repo.confirm_session(exam_date, shift)?)
    }

    /// 查询某场次的分配记录
    pub fn list_allocations(
        &self,
        exam_date: NaiveDate,
        shift: Shift,
    ) -> ApiResult<Vec<Allocation>> {
        Ok(self.allocation_repo.list_by_session(exam_date, shift)?)
    }
}
