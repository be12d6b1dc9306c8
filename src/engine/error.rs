// ==========================================
// 考场分配系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 分配引擎错误类型
///
/// 约定:
/// - InvalidRequest: 快速失败,不触碰存储
/// - DataAccess: 提供者或存储不可达,事务内失败已回滚
/// - 规则不满足不是错误: 无法落位的班级进入 unallocated 列表
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("无效的分配请求: {0}")]
    InvalidRequest(String),

    #[error("数据访问失败: {0}")]
    DataAccess(#[from] RepositoryError),

    #[error("配置读取失败: {0}")]
    ConfigError(String),
}

/// Result 类型别名
pub type AllocationEngineResult<T> = Result<T, AllocationError>;
