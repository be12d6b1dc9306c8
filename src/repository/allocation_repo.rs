// ==========================================
// 考场分配系统 - 分配记录仓储
// ==========================================
// 红线: 同一场次的分配记录整代替换,删除与写入必须在同一事务内
// ==========================================

use crate::domain::allocation::Allocation;
use crate::domain::exam_session::ExamSession;
use crate::domain::types::Shift;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, TransactionBehavior};
use std::sync::{Arc, Mutex};

// ==========================================
// AllocationRepository - 分配记录仓储
// ==========================================
pub struct AllocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AllocationRepository {
    /// 创建新的AllocationRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 整代替换某场次的分配记录
    ///
    /// 在单个立即事务内完成: 先删除该 (日期, 场次) 的全部旧记录，
    /// 再逐条写入新记录。任一步失败则整体回滚，旧的一代保持原样。
    /// 立即事务在开始时即取得写锁，同一场次的并发替换在此串行化。
    ///
    /// # 参数
    /// - `session`: 目标场次
    /// - `rows`: 新一代分配记录（可以为空，表示清空该场次）
    ///
    /// # 返回
    /// - `Ok(count)`: 写入的记录数
    /// - `Err`: 数据库错误（已回滚）
    pub fn replace_for_session(
        &self,
        session: &ExamSession,
        rows: &[Allocation],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            "DELETE FROM allocation WHERE exam_date = ? AND shift = ?",
            params![
                &session.exam_date.format("%Y-%m-%d").to_string(),
                &session.shift.to_string()
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO allocation (
                        allocation_id, exam_date, shift, room_id, class_id,
                        seats, confirmed, created_by, created_at
                    ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )?;

            for row in rows {
                stmt.execute(params![
                    &row.allocation_id,
                    &row.exam_date.format("%Y-%m-%d").to_string(),
                    &row.shift.to_string(),
                    &row.room_id,
                    &row.class_id,
                    &row.seats,
                    if row.confirmed { 1 } else { 0 },
                    &row.created_by,
                    &row.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(rows.len())
    }

    /// 查询某场次的全部分配记录
    ///
    /// # 返回
    /// - `Ok(Vec<Allocation>)`: 按 (room_id, class_id) 升序
    pub fn list_by_session(
        &self,
        exam_date: NaiveDate,
        shift: Shift,
    ) -> RepositoryResult<Vec<Allocation>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT allocation_id, exam_date, shift, room_id, class_id,
                      seats, confirmed, created_by, created_at
               FROM allocation
               WHERE exam_date = ? AND shift = ?
               ORDER BY room_id ASC, class_id ASC"#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    &exam_date.format("%Y-%m-%d").to_string(),
                    &shift.to_string()
                ],
                |row| Self::map_row(row),
            )?
            .collect::<Result<Vec<Allocation>, _>>()?;

        Ok(rows)
    }

    /// 查询同一日期其他场次已占用的考场ID集合
    ///
    /// # 用途
    /// - strict_shift_separation 开启时，这些考场对本场次不可用
    pub fn occupied_room_ids_other_shifts(
        &self,
        exam_date: NaiveDate,
        shift: Shift,
    ) -> RepositoryResult<Vec<String>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT DISTINCT room_id
               FROM allocation
               WHERE exam_date = ? AND shift <> ?
               ORDER BY room_id ASC"#,
        )?;

        let room_ids = stmt
            .query_map(
                params![
                    &exam_date.format("%Y-%m-%d").to_string(),
                    &shift.to_string()
                ],
                |row| row.get::<_, String>(0),
            )?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(room_ids)
    }

    /// 整场次确认分配（管理员签发）
    ///
    /// # 返回
    /// - `Ok(count)`: 被确认的记录数
    pub fn confirm_session(&self, exam_date: NaiveDate, shift: Shift) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;

        let count = conn.execute(
            "UPDATE allocation SET confirmed = 1 WHERE exam_date = ? AND shift = ?",
            params![
                &exam_date.format("%Y-%m-%d").to_string(),
                &shift.to_string()
            ],
        )?;

        Ok(count)
    }

    /// 删除某场次的全部分配记录
    pub fn delete_for_session(&self, exam_date: NaiveDate, shift: Shift) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;

        let count = conn.execute(
            "DELETE FROM allocation WHERE exam_date = ? AND shift = ?",
            params![
                &exam_date.format("%Y-%m-%d").to_string(),
                &shift.to_string()
            ],
        )?;

        Ok(count)
    }

    /// 映射数据库行到Allocation对象
    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Allocation> {
        let date_raw: String = row.get(1)?;
        let exam_date = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let shift_raw: String = row.get(2)?;
        let shift = Shift::from_str(&shift_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let created_raw: String = row.get(8)?;
        let created_at = chrono::NaiveDateTime::parse_from_str(&created_raw, "%Y-%m-%d %H:%M:%S")
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    8,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?
            .and_utc();

        Ok(Allocation {
            allocation_id: row.get(0)?,
            exam_date,
            shift,
            room_id: row.get(3)?,
            class_id: row.get(4)?,
            seats: row.get(5)?,
            confirmed: row.get::<_, i32>(6)? != 0,
            created_by: row.get(7)?,
            created_at,
        })
    }
}
