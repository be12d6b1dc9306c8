// ==========================================
// 考场分配系统 - 考试场次仓储
// ==========================================

use crate::domain::exam_session::ExamSession;
use crate::domain::types::Shift;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ExamSessionRepository - 考试场次仓储
// ==========================================
pub struct ExamSessionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ExamSessionRepository {
    /// 创建新的ExamSessionRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建考试场次
    ///
    /// # 返回
    /// - `Ok(())`: 创建成功
    /// - `Err(UniqueConstraintViolation)`: 同一 (日期, 场次) 已存在
    pub fn create(&self, session: &ExamSession) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO exam_session (exam_date, shift, exam_type, created_by)
               VALUES (?, ?, ?, ?)"#,
            params![
                &session.exam_date.format("%Y-%m-%d").to_string(),
                &session.shift.to_string(),
                &session.exam_type,
                &session.created_by,
            ],
        )?;

        Ok(())
    }

    /// 按 (日期, 场次) 查询场次
    ///
    /// # 返回
    /// - `Ok(Some(ExamSession))`: 找到场次
    /// - `Ok(None)`: 场次不存在
    pub fn find(&self, exam_date: NaiveDate, shift: Shift) -> RepositoryResult<Option<ExamSession>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT exam_date, shift, exam_type, created_by
               FROM exam_session
               WHERE exam_date = ? AND shift = ?"#,
            params![
                &exam_date.format("%Y-%m-%d").to_string(),
                &shift.to_string()
            ],
            |row| Self::map_row(row),
        ) {
            Ok(session) => Ok(Some(session)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询某日的全部场次
    pub fn list_by_date(&self, exam_date: NaiveDate) -> RepositoryResult<Vec<ExamSession>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT exam_date, shift, exam_type, created_by
               FROM exam_session
               WHERE exam_date = ?
               ORDER BY shift ASC"#,
        )?;

        let sessions = stmt
            .query_map(
                params![&exam_date.format("%Y-%m-%d").to_string()],
                |row| Self::map_row(row),
            )?
            .collect::<Result<Vec<ExamSession>, _>>()?;

        Ok(sessions)
    }

    /// 映射数据库行到ExamSession对象
    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<ExamSession> {
        let date_raw: String = row.get(0)?;
        let exam_date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let shift_raw: String = row.get(1)?;
        let shift = Shift::from_str(&shift_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(ExamSession {
            exam_date,
            shift,
            exam_type: row.get(2)?,
            created_by: row.get(3)?,
        })
    }
}
