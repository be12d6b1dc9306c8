// ==========================================
// 考场分配系统 - 班级领域模型
// ==========================================
// 红线: 引擎读取后的班级数据在单次运行内不可变
// ==========================================

use crate::domain::types::AcademicLevel;
use crate::domain::DomainError;
use serde::{Deserialize, Serialize};

// ==========================================
// ClassGroup - 考试班级
// ==========================================
// 分配的最小单位是整班,仅在无单间可容纳时拆分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassGroup {
    pub class_id: String,             // 班级ID
    pub class_name: String,           // 班级名称
    pub academic_year: String,        // 学年 (如 "2025-2026")
    pub academic_level: AcademicLevel, // 学历层次
    pub department_id: String,        // 院系ID
    pub student_count: i32,           // 考生人数 (>0)
    pub active: bool,                 // 是否启用
}

impl ClassGroup {
    /// 构造并校验班级数据
    ///
    /// # 参数
    /// - `class_id`: 班级ID,非空
    /// - `student_count`: 考生人数,必须大于 0
    ///
    /// # 返回
    /// - `Ok(ClassGroup)`: 校验通过
    /// - `Err(DomainError)`: 字段不满足约束
    pub fn new(
        class_id: impl Into<String>,
        class_name: impl Into<String>,
        academic_year: impl Into<String>,
        academic_level: AcademicLevel,
        department_id: impl Into<String>,
        student_count: i32,
        active: bool,
    ) -> Result<Self, DomainError> {
        let class_id = class_id.into();
        if class_id.trim().is_empty() {
            return Err(DomainError::FieldValueError {
                field: "class_id".to_string(),
                message: "班级ID不能为空".to_string(),
            });
        }
        if student_count <= 0 {
            return Err(DomainError::FieldValueError {
                field: "student_count".to_string(),
                message: format!("考生人数必须大于 0, 实际为 {}", student_count),
            });
        }
        let department_id = department_id.into();
        if department_id.trim().is_empty() {
            return Err(DomainError::FieldValueError {
                field: "department_id".to_string(),
                message: "院系ID不能为空".to_string(),
            });
        }

        Ok(Self {
            class_id,
            class_name: class_name.into(),
            academic_year: academic_year.into(),
            academic_level,
            department_id,
            student_count,
            active,
        })
    }
}
