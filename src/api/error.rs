// ==========================================
// 考场分配系统 - API 层错误类型
// ==========================================

use crate::engine::error::AllocationError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("参数错误: {0}")]
    InvalidParam(String),

    #[error(transparent)]
    Engine(#[from] AllocationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
