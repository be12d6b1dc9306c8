// ==========================================
// 考场分配系统 - 规则配置读取 Trait
// ==========================================
// 职责: 定义分配引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::rule_config::RuleConfig;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// RuleConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）; 测试使用内存 mock
#[async_trait]
pub trait RuleConfigReader: Send + Sync {
    /// 获取本次分配运行的规则配置
    ///
    /// # 返回
    /// - 三项规则开关的不可变快照
    ///
    /// # 默认值
    /// - allow_department_mixing = true
    /// - strict_ug_pg_separation = true
    /// - strict_shift_separation = true
    async fn get_rule_config(&self) -> Result<RuleConfig, Box<dyn Error>>;
}
