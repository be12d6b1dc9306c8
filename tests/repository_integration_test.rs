// ==========================================
// 仓储层集成测试
// ==========================================
// 职责: 验证行映射、active 过滤与约束分类
// ==========================================


#[cfg(test)]
mod repository_integration_test {
    use chrono::NaiveDate;
    use exam_room_alloc::domain::types::{AcademicLevel, RoomType, Shift};
    use exam_room_alloc::domain::{Allocation, ClassGroup, ExamSession, Room};
    use exam_room_alloc::repository::{
        AllocationRepository, ClassGroupRepository, ExamSessionRepository, RepositoryError,
        RoomRepository,
    };

    use crate::test_helpers::{create_test_db, open_shared_conn, seed_class, seed_room, seed_session};

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()
    }

    #[test]
    fn test_class_upsert_roundtrip_and_active_filter() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        let repo = ClassGroupRepository::new(conn);

        let class = ClassGroup::new(
            "C001",
            "软件2401",
            "2025-2026",
            AcademicLevel::Postgraduate,
            "D07",
            38,
            true,
        )
        .unwrap();
        repo.upsert(&class).unwrap();

        let loaded = repo.find_by_id("C001").unwrap().unwrap();
        assert_eq!(loaded.academic_level, AcademicLevel::Postgraduate);
        assert_eq!(loaded.student_count, 38);

        // 停用后不再出现在 list_active
        let mut inactive = class.clone();
        inactive.active = false;
        repo.upsert(&inactive).unwrap();
        assert!(repo.list_active().unwrap().is_empty());
        assert!(repo.find_by_id("C001").unwrap().is_some());
    }

    #[test]
    fn test_room_upsert_roundtrip_with_features() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        let repo = RoomRepository::new(conn);

        let room = Room::new(
            "R001",
            "B-202",
            "实验楼202",
            45,
            RoomType::Lab,
            2,
            "实验楼",
            true,
            false,
            true,
            true,
        )
        .unwrap();
        repo.upsert(&room).unwrap();

        let loaded = repo.find_by_id("R001").unwrap().unwrap();
        assert_eq!(loaded.room_type, RoomType::Lab);
        assert!(loaded.has_projector);
        assert!(!loaded.has_whiteboard);
        assert!(loaded.has_computers);

        // 更新容量后以新值为准
        let mut resized = room.clone();
        resized.capacity = 50;
        repo.upsert(&resized).unwrap();
        assert_eq!(repo.find_by_id("R001").unwrap().unwrap().capacity, 50);
    }

    #[test]
    fn test_session_create_find_and_duplicate() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        let repo = ExamSessionRepository::new(conn);

        let session = ExamSession::new(test_date(), Shift::Morning, "期末考试");
        repo.create(&session).unwrap();

        let loaded = repo.find(test_date(), Shift::Morning).unwrap().unwrap();
        assert_eq!(loaded.exam_type, "期末考试");
        assert!(repo.find(test_date(), Shift::Evening).unwrap().is_none());

        // 同一 (日期, 场次) 二次创建触发唯一约束
        let err = repo.create(&session).unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
    }

    #[test]
    fn test_session_list_by_date() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        let repo = ExamSessionRepository::new(conn.clone());
        seed_session(&conn, test_date(), "MORNING");
        seed_session(&conn, test_date(), "EVENING");
        seed_session(&conn, NaiveDate::from_ymd_opt(2026, 1, 13).unwrap(), "MORNING");

        let sessions = repo.list_by_date(test_date()).unwrap();
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn test_allocation_list_ordering_and_occupied_query() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_session(&conn, test_date(), "AFTERNOON");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 30);
        seed_class(&conn, "C002", "UNDERGRADUATE", "D01", 20);
        seed_room(&conn, "R001", 60);
        seed_room(&conn, "R002", 60);

        let repo = AllocationRepository::new(conn);
        let morning = ExamSession::new(test_date(), Shift::Morning, "期末考试");
        let afternoon = ExamSession::new(test_date(), Shift::Afternoon, "期末考试");

        repo.replace_for_session(
            &morning,
            &[
                Allocation::new(&morning, "R002", "C001", 30, "admin"),
                Allocation::new(&morning, "R001", "C002", 20, "admin"),
            ],
        )
        .unwrap();
        repo.replace_for_session(
            &afternoon,
            &[Allocation::new(&afternoon, "R001", "C001", 30, "admin")],
        )
        .unwrap();

        // 按 (room_id, class_id) 升序
        let rows = repo.list_by_session(test_date(), Shift::Morning).unwrap();
        assert_eq!(rows[0].room_id, "R001");
        assert_eq!(rows[1].room_id, "R002");

        // 下午场视角: 上午场占用了 R001 与 R002
        let occupied = repo
            .occupied_room_ids_other_shifts(test_date(), Shift::Afternoon)
            .unwrap();
        assert_eq!(occupied, vec!["R001".to_string(), "R002".to_string()]);

        // 上午场视角: 下午场只占用 R001
        let occupied = repo
            .occupied_room_ids_other_shifts(test_date(), Shift::Morning)
            .unwrap();
        assert_eq!(occupied, vec!["R001".to_string()]);
    }

    #[test]
    fn test_allocation_created_at_roundtrip() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 30);
        seed_room(&conn, "R001", 60);

        let repo = AllocationRepository::new(conn);
        let session = ExamSession::new(test_date(), Shift::Morning, "期末考试");
        let row = Allocation::new(&session, "R001", "C001", 30, "admin");
        let created_at = row.created_at;
        repo.replace_for_session(&session, &[row]).unwrap();

        let loaded = &repo.list_by_session(test_date(), Shift::Morning).unwrap()[0];
        // 秒级精度存储
        assert_eq!(
            loaded.created_at.timestamp(),
            created_at.timestamp()
        );
        assert_eq!(loaded.created_by, "admin");
        assert!(!loaded.confirmed);
    }
}
