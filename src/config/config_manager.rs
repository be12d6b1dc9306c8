// ==========================================
// 考场分配系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::rule_config::RuleConfig;
use crate::config::rule_config_trait::RuleConfigReader;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键: 是否允许跨院系混排
pub const KEY_ALLOW_DEPARTMENT_MIXING: &str = "rules/allow_department_mixing";
/// 配置键: 本科/研究生严格分离
pub const KEY_STRICT_UG_PG_SEPARATION: &str = "rules/strict_ug_pg_separation";
/// 配置键: 同日场次考场互斥
pub const KEY_STRICT_SHIFT_SEPARATION: &str = "rules/strict_shift_separation";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 配置值（管理端使用）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"INSERT INTO config_kv (scope_id, key, value, updated_at)
               VALUES ('global', ?1, ?2, datetime('now'))
               ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')"#,
            params![key, value],
        )?;

        Ok(())
    }

    /// 读取布尔配置值，带默认值
    ///
    /// 兼容取值: "true"/"false"/"1"/"0"（大小写不敏感）
    fn get_bool_config(&self, key: &str, default: bool) -> Result<bool, Box<dyn Error>> {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(format!("配置值无法解析为布尔 (key={}): {}", key, other).into()),
        }
    }

    /// 读取完整规则配置（同步）
    pub fn load_rule_config(&self) -> Result<RuleConfig, Box<dyn Error>> {
        let defaults = RuleConfig::default();

        Ok(RuleConfig {
            allow_department_mixing: self
                .get_bool_config(KEY_ALLOW_DEPARTMENT_MIXING, defaults.allow_department_mixing)?,
            strict_ug_pg_separation: self
                .get_bool_config(KEY_STRICT_UG_PG_SEPARATION, defaults.strict_ug_pg_separation)?,
            strict_shift_separation: self
                .get_bool_config(KEY_STRICT_SHIFT_SEPARATION, defaults.strict_shift_separation)?,
        })
    }

    /// 获取当前规则配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 运行日志记录本次分配使用的规则组合
    pub fn config_snapshot_json(&self) -> Result<String, Box<dyn Error>> {
        let config = self.load_rule_config()?;

        Ok(json!({
            "allow_department_mixing": config.allow_department_mixing,
            "strict_ug_pg_separation": config.strict_ug_pg_separation,
            "strict_shift_separation": config.strict_shift_separation,
        })
        .to_string())
    }
}

#[async_trait]
impl RuleConfigReader for ConfigManager {
    async fn get_rule_config(&self) -> Result<RuleConfig, Box<dyn Error>> {
        self.load_rule_config()
    }
}
