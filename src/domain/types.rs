// ==========================================
// 考场分配系统 - 领域类型定义
// ==========================================
// 红线: 枚举值与数据库存储格式保持一致
// 序列化格式: SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 枚举解析失败（数据库中存在未知取值时返回）
#[derive(Error, Debug)]
#[error("无法解析枚举值 (kind={kind}): {value}")]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl EnumParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// ==========================================
// 学历层次 (Academic Level)
// ==========================================
// 红线: 仅两级,本科与研究生,不做评分制扩展
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcademicLevel {
    Undergraduate, // 本科
    Postgraduate,  // 研究生
}

impl fmt::Display for AcademicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcademicLevel::Undergraduate => write!(f, "UNDERGRADUATE"),
            AcademicLevel::Postgraduate => write!(f, "POSTGRADUATE"),
        }
    }
}

impl AcademicLevel {
    /// 从数据库字符串解析
    pub fn from_str(s: &str) -> Result<Self, EnumParseError> {
        match s {
            "UNDERGRADUATE" => Ok(AcademicLevel::Undergraduate),
            "POSTGRADUATE" => Ok(AcademicLevel::Postgraduate),
            _ => Err(EnumParseError::new("AcademicLevel", s)),
        }
    }
}

// ==========================================
// 考试场次 (Shift)
// ==========================================
// 同一日期按场次划分考场占用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shift {
    Morning,   // 上午场
    Afternoon, // 下午场
    Evening,   // 晚场
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Morning => write!(f, "MORNING"),
            Shift::Afternoon => write!(f, "AFTERNOON"),
            Shift::Evening => write!(f, "EVENING"),
        }
    }
}

impl Shift {
    /// 从数据库字符串解析
    pub fn from_str(s: &str) -> Result<Self, EnumParseError> {
        match s {
            "MORNING" => Ok(Shift::Morning),
            "AFTERNOON" => Ok(Shift::Afternoon),
            "EVENING" => Ok(Shift::Evening),
            _ => Err(EnumParseError::new("Shift", s)),
        }
    }
}

// ==========================================
// 考场类型 (Room Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomType {
    Lecture,    // 普通教室
    Tutorial,   // 辅导教室
    Lab,        // 实验室
    Auditorium, // 阶梯教室
    Seminar,    // 研讨室
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomType::Lecture => write!(f, "LECTURE"),
            RoomType::Tutorial => write!(f, "TUTORIAL"),
            RoomType::Lab => write!(f, "LAB"),
            RoomType::Auditorium => write!(f, "AUDITORIUM"),
            RoomType::Seminar => write!(f, "SEMINAR"),
        }
    }
}

impl RoomType {
    /// 从数据库字符串解析
    pub fn from_str(s: &str) -> Result<Self, EnumParseError> {
        match s {
            "LECTURE" => Ok(RoomType::Lecture),
            "TUTORIAL" => Ok(RoomType::Tutorial),
            "LAB" => Ok(RoomType::Lab),
            "AUDITORIUM" => Ok(RoomType::Auditorium),
            "SEMINAR" => Ok(RoomType::Seminar),
            _ => Err(EnumParseError::new("RoomType", s)),
        }
    }
}

// ==========================================
// 测试模块
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_display_roundtrip() {
        for shift in [Shift::Morning, Shift::Afternoon, Shift::Evening] {
            assert_eq!(Shift::from_str(&shift.to_string()).unwrap(), shift);
        }
    }

    #[test]
    fn test_academic_level_parse_unknown() {
        let err = AcademicLevel::from_str("DOCTORAL").unwrap_err();
        assert_eq!(err.kind, "AcademicLevel");
        assert_eq!(err.value, "DOCTORAL");
    }

    #[test]
    fn test_room_type_serde_format() {
        let json = serde_json::to_string(&RoomType::Auditorium).unwrap();
        assert_eq!(json, "\"AUDITORIUM\"");
    }
}
