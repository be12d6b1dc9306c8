// ==========================================
// 考场分配系统 - 考场领域模型
// ==========================================

use crate::domain::types::RoomType;
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};

// ==========================================
// Room - 考场
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,      // 考场ID
    pub room_code: String,    // 考场编号 (如 "A-301")
    pub room_name: String,    // 考场名称
    pub capacity: i32,        // 容量 (>0)
    pub room_type: RoomType,  // 考场类型
    pub floor_no: i32,        // 楼层
    pub building: String,     // 楼栋
    pub has_projector: bool,  // 是否有投影
    pub has_whiteboard: bool, // 是否有白板
    pub has_computers: bool,  // 是否有计算机
    pub active: bool,         // 是否启用
}

impl Room {
    /// 构造并校验考场数据
    ///
    /// # 返回
    /// - `Ok(Room)`: 校验通过
    /// - `Err(DomainError)`: 字段不满足约束 (容量必须大于 0)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        room_id: impl Into<String>,
        room_code: impl Into<String>,
        room_name: impl Into<String>,
        capacity: i32,
        room_type: RoomType,
        floor_no: i32,
        building: impl Into<String>,
        has_projector: bool,
        has_whiteboard: bool,
        has_computers: bool,
        active: bool,
    ) -> Result<Self, DomainError> {
        let room_id = room_id.into();
        if room_id.trim().is_empty() {
            return Err(DomainError::FieldValueError {
                field: "room_id".to_string(),
                message: "考场ID不能为空".to_string(),
            });
        }
        if capacity <= 0 {
            return Err(DomainError::FieldValueError {
                field: "capacity".to_string(),
                message: format!("考场容量必须大于 0, 实际为 {}", capacity),
            });
        }

        Ok(Self {
            room_id,
            room_code: room_code.into(),
            room_name: room_name.into(),
            capacity,
            room_type,
            floor_no,
            building: building.into(),
            has_projector,
            has_whiteboard,
            has_computers,
            active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_room(capacity: i32) -> Result<Room, DomainError> {
        Room::new(
            "R001",
            "A-301",
            "教一楼301",
            capacity,
            RoomType::Lecture,
            3,
            "教一楼",
            true,
            true,
            false,
            true,
        )
    }

    #[test]
    fn test_new_valid_room() {
        let room = build_room(60).unwrap();
        assert_eq!(room.capacity, 60);
        assert_eq!(room.room_code, "A-301");
    }

    #[test]
    fn test_new_rejects_non_positive_capacity() {
        assert!(build_room(0).is_err());
        assert!(build_room(-5).is_err());
    }
}
