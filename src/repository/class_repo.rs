// ==========================================
// 考场分配系统 - 班级仓储
// ==========================================
// 红线: 引擎消费的班级列表只包含 active=1 的记录
// ==========================================

use crate::domain::class_group::ClassGroup;
use crate::domain::types::AcademicLevel;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ClassGroupRepository - 班级仓储
// ==========================================
pub struct ClassGroupRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassGroupRepository {
    /// 创建新的ClassGroupRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询所有启用班级
    ///
    /// # 返回
    /// - `Ok(Vec<ClassGroup>)`: 班级列表，按class_id升序（保证可复现的遍历顺序）
    /// - `Err`: 数据库错误
    pub fn list_active(&self) -> RepositoryResult<Vec<ClassGroup>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT class_id, class_name, academic_year, academic_level,
                      department_id, student_count, active
               FROM class_group
               WHERE active = 1
               ORDER BY class_id ASC"#,
        )?;

        let classes = stmt
            .query_map([], |row| self.map_row(row))?
            .collect::<Result<Vec<ClassGroup>, _>>()?;

        Ok(classes)
    }

    /// 按class_id查询班级
    ///
    /// # 返回
    /// - `Ok(Some(ClassGroup))`: 找到班级
    /// - `Ok(None)`: 未找到班级
    /// - `Err`: 数据库错误
    pub fn find_by_id(&self, class_id: &str) -> RepositoryResult<Option<ClassGroup>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT class_id, class_name, academic_year, academic_level,
                      department_id, student_count, active
               FROM class_group
               WHERE class_id = ?"#,
            params![class_id],
            |row| self.map_row(row),
        ) {
            Ok(class) => Ok(Some(class)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 插入或更新班级（导入与测试使用）
    pub fn upsert(&self, class: &ClassGroup) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO class_group (
                   class_id, class_name, academic_year, academic_level,
                   department_id, student_count, active
               ) VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(class_id) DO UPDATE SET
                   class_name = excluded.class_name,
                   academic_year = excluded.academic_year,
                   academic_level = excluded.academic_level,
                   department_id = excluded.department_id,
                   student_count = excluded.student_count,
                   active = excluded.active,
                   updated_at = datetime('now')"#,
            params![
                &class.class_id,
                &class.class_name,
                &class.academic_year,
                &class.academic_level.to_string(),
                &class.department_id,
                &class.student_count,
                if class.active { 1 } else { 0 },
            ],
        )?;

        Ok(())
    }

    /// 映射数据库行到ClassGroup对象
    fn map_row(&self, row: &rusqlite::Row) -> rusqlite::Result<ClassGroup> {
        let level_raw: String = row.get(3)?;
        let academic_level = AcademicLevel::from_str(&level_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(ClassGroup {
            class_id: row.get(0)?,
            class_name: row.get(1)?,
            academic_year: row.get(2)?,
            academic_level,
            department_id: row.get(4)?,
            student_count: row.get(5)?,
            active: row.get::<_, i32>(6)? != 0,
        })
    }
}
