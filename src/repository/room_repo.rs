// ==========================================
// 考场分配系统 - 考场仓储
// ==========================================
// 红线: 引擎消费的考场列表只包含 active=1 的记录
// ==========================================

use crate::domain::room::Room;
use crate::domain::types::RoomType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// RoomRepository - 考场仓储
// ==========================================
pub struct RoomRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RoomRepository {
    /// 创建新的RoomRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询所有启用考场
    ///
    /// # 返回
    /// - `Ok(Vec<Room>)`: 考场列表，按room_id升序（保证可复现的遍历顺序）
    /// - `Err`: 数据库错误
    pub fn list_active(&self) -> RepositoryResult<Vec<Room>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"SELECT room_id, room_code, room_name, capacity, room_type,
                      floor_no, building, has_projector, has_whiteboard,
                      has_computers, active
               FROM room
               WHERE active = 1
               ORDER BY room_id ASC"#,
        )?;

        let rooms = stmt
            .query_map([], |row| self.map_row(row))?
            .collect::<Result<Vec<Room>, _>>()?;

        Ok(rooms)
    }

    /// 按room_id查询考场
    pub fn find_by_id(&self, room_id: &str) -> RepositoryResult<Option<Room>> {
        let conn = self.get_conn()?;

        match conn.query_row(
            r#"SELECT room_id, room_code, room_name, capacity, room_type,
                      floor_no, building, has_projector, has_whiteboard,
                      has_computers, active
               FROM room
               WHERE room_id = ?"#,
            params![room_id],
            |row| self.map_row(row),
        ) {
            Ok(room) => Ok(Some(room)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 插入或更新考场（导入与测试使用）
    pub fn upsert(&self, room: &Room) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO room (
                   room_id, room_code, room_name, capacity, room_type,
                   floor_no, building, has_projector, has_whiteboard,
                   has_computers, active
               ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(room_id) DO UPDATE SET
                   room_code = excluded.room_code,
                   room_name = excluded.room_name,
                   capacity = excluded.capacity,
                   room_type = excluded.room_type,
                   floor_no = excluded.floor_no,
                   building = excluded.building,
                   has_projector = excluded.has_projector,
                   has_whiteboard = excluded.has_whiteboard,
                   has_computers = excluded.has_computers,
                   active = excluded.active,
                   updated_at = datetime('now')"#,
            params![
                &room.room_id,
                &room.room_code,
                &room.room_name,
                &room.capacity,
                &room.room_type.to_string(),
                &room.floor_no,
                &room.building,
                if room.has_projector { 1 } else { 0 },
                if room.has_whiteboard { 1 } else { 0 },
                if room.has_computers { 1 } else { 0 },
                if room.active { 1 } else { 0 },
            ],
        )?;

        Ok(())
    }

    /// 映射数据库行到Room对象
    fn map_row(&self, row: &rusqlite::Row) -> rusqlite::Result<Room> {
        let type_raw: String = row.get(4)?;
        let room_type = RoomType::from_str(&type_raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Room {
            room_id: row.get(0)?,
            room_code: row.get(1)?,
            room_name: row.get(2)?,
            capacity: row.get(3)?,
            room_type,
            floor_no: row.get(5)?,
            building: row.get(6)?,
            has_projector: row.get::<_, i32>(7)? != 0,
            has_whiteboard: row.get::<_, i32>(8)? != 0,
            has_computers: row.get::<_, i32>(9)? != 0,
            active: row.get::<_, i32>(10)? != 0,
        })
    }
}
