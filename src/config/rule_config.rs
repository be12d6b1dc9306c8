// ==========================================
// 考场分配系统 - 分配规则配置
// ==========================================
// 红线: 每次运行加载一次,运行期间不可变
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// RuleConfig - 分配规则配置
// ==========================================
// 三项规则开关,由 config_kv 表的 global scope 提供
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub allow_department_mixing: bool, // 是否允许跨院系混排
    pub strict_ug_pg_separation: bool, // 本科/研究生是否严格分离
    pub strict_shift_separation: bool, // 同日不同场次的考场是否互斥
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            allow_department_mixing: true,
            strict_ug_pg_separation: true,
            strict_shift_separation: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let config = RuleConfig::default();
        assert!(config.allow_department_mixing);
        assert!(config.strict_ug_pg_separation);
        assert!(config.strict_shift_separation);
    }
}
