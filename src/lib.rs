// ==========================================
// 考场分配系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 考务决策支持 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 约束判定与打包分配
pub mod engine;

// 导入层 - 外部主数据
pub mod importer;

// 配置层 - 分配规则配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AcademicLevel, RoomType, Shift};

// 领域实体
pub use domain::{Allocation, ClassGroup, ExamSession, Room};

// 引擎
pub use engine::{
    AllocationEngine, AllocationError, AllocationResult, AllocationStatistics, ConstraintPolicy,
    PackingPlan, RoomPacker, SeatAssignment, UnallocatedClass,
};

// 配置
pub use config::{ConfigManager, RuleConfig, RuleConfigReader};

// API
pub use api::AllocationApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "考场分配系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 预编译检查
// ==========================================
