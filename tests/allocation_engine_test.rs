// ==========================================
// 分配引擎集成测试
// ==========================================
// 职责: 验证端到端分配流程与不变量
// ==========================================


#[cfg(test)]
mod allocation_engine_test {
    use chrono::NaiveDate;
    use exam_room_alloc::api::{AllocationApi, ApiError};
    use exam_room_alloc::config::config_manager::{
        ConfigManager, KEY_STRICT_SHIFT_SEPARATION, KEY_STRICT_UG_PG_SEPARATION,
    };
    use exam_room_alloc::domain::types::Shift;
    use exam_room_alloc::engine::AllocationError;
    use rusqlite::Connection;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use crate::test_helpers::{
        count_allocations, create_test_db, open_shared_conn, seed_class, seed_inactive_class,
        seed_room, seed_session, set_rule,
    };

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 12).unwrap()
    }

    fn build_api(conn: Arc<Mutex<Connection>>) -> AllocationApi<ConfigManager> {
        let config = Arc::new(ConfigManager::from_connection(conn.clone()).unwrap());
        AllocationApi::from_connection(config, conn)
    }

    /// 容量不变量: 每间考场的已分配座位之和不超过容量
    fn assert_capacity_invariant(conn: &Arc<Mutex<Connection>>) {
        let c = conn.lock().unwrap();
        let violations: i64 = c
            .query_row(
                r#"SELECT COUNT(*) FROM (
                       SELECT a.room_id, a.exam_date, a.shift
                       FROM allocation a JOIN room r ON r.room_id = a.room_id
                       GROUP BY a.room_id, a.exam_date, a.shift
                       HAVING SUM(a.seats) > MAX(r.capacity)
                   )"#,
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(violations, 0, "存在超容考场");
    }

    // ==========================================
    // 基础场景
    // ==========================================

    #[tokio::test]
    async fn test_two_classes_share_one_room() {
        // 60 + 40 人两个班级同入一间 100 座考场
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 60);
        seed_class(&conn, "C002", "UNDERGRADUATE", "D01", 40);
        seed_room(&conn, "R001", 100);

        let api = build_api(conn.clone());
        let result = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        assert!(result.success);
        assert!(result.unallocated.is_empty());
        assert_eq!(result.statistics.classes_allocated, 2);
        assert_eq!(result.statistics.students_allocated, 100);
        assert_eq!(result.statistics.rooms_used, 1);
        assert_eq!(count_allocations(&conn, test_date(), "MORNING"), 2);
        assert_capacity_invariant(&conn);
    }

    #[tokio::test]
    async fn test_oversized_class_splits_across_rooms() {
        // 150 人班级拆入 100 + 80 两间考场 (100 + 50)
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 150);
        seed_room(&conn, "R001", 100);
        seed_room(&conn, "R002", 80);

        let api = build_api(conn.clone());
        let result = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        assert!(result.success);
        assert!(result.unallocated.is_empty());
        assert_eq!(result.statistics.rooms_used, 2);

        let seats: HashMap<String, i32> = result
            .assignments
            .iter()
            .map(|a| (a.room_id.clone(), a.seats))
            .collect();
        assert_eq!(seats["R001"], 100);
        assert_eq!(seats["R002"], 50);
        assert_capacity_invariant(&conn);
    }

    #[tokio::test]
    async fn test_ug_blocked_by_pg_room_reports_unallocated() {
        // 唯一考场被研究生班占用,本科班进入 unallocated (success 仍为 true)
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "P001", "POSTGRADUATE", "D01", 60);
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 50);
        seed_room(&conn, "R001", 150);

        let api = build_api(conn.clone());
        let result = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        assert!(result.success);
        assert_eq!(result.unallocated.len(), 1);
        assert_eq!(result.unallocated[0].class_id, "C001");
        assert_eq!(result.unallocated[0].residual_seats, 50);
        assert_eq!(result.statistics.classes_allocated, 1);
        assert_capacity_invariant(&conn);
    }

    #[tokio::test]
    async fn test_no_rooms_total_failure_untouched_storage() {
        // 无可用考场: success=false,整班进入 unallocated,存储不被触碰
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 30);

        let api = build_api(conn.clone());
        let result = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        assert!(!result.success);
        assert_eq!(result.unallocated.len(), 1);
        assert_eq!(result.unallocated[0].residual_seats, 30);
        assert!(result.unallocated[0].reason.starts_with("NO_ROOMS_AVAILABLE"));
        assert_eq!(count_allocations(&conn, test_date(), "MORNING"), 0);
    }

    // ==========================================
    // 校验与请求错误
    // ==========================================

    #[tokio::test]
    async fn test_unknown_session_rejected() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 30);
        seed_room(&conn, "R001", 60);

        let api = build_api(conn);
        let err = api
            .allocate(test_date(), Shift::Evening, "admin")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Engine(AllocationError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_no_classes_and_no_rooms_rejected() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");

        let api = build_api(conn);
        let err = api
            .allocate(test_date(), Shift::Morning, "admin")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Engine(AllocationError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_classes_clears_previous_generation() {
        // 无待分配班级: 空计划成功,旧一代被清空
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 30);
        seed_room(&conn, "R001", 60);

        let api = build_api(conn.clone());
        api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();
        assert_eq!(count_allocations(&conn, test_date(), "MORNING"), 1);

        // 停用班级后重跑
        {
            let c = conn.lock().unwrap();
            c.execute("UPDATE class_group SET active = 0 WHERE class_id = 'C001'", [])
                .unwrap();
        }
        let result = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        assert!(result.success);
        assert!(result.assignments.is_empty());
        assert_eq!(result.statistics.students_allocated, 0);
        assert_eq!(count_allocations(&conn, test_date(), "MORNING"), 0);
    }

    // ==========================================
    // 幂等与重跑
    // ==========================================

    #[tokio::test]
    async fn test_rerun_is_idempotent() {
        // 相同输入重跑: 计划一致,且只保留一代分配行
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 55);
        seed_class(&conn, "C002", "POSTGRADUATE", "D02", 48);
        seed_class(&conn, "C003", "UNDERGRADUATE", "D01", 30);
        seed_room(&conn, "R001", 90);
        seed_room(&conn, "R002", 60);

        let api = build_api(conn.clone());
        let first = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();
        let second = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.unallocated, second.unallocated);
        assert_eq!(first.statistics, second.statistics);
        assert_eq!(
            count_allocations(&conn, test_date(), "MORNING"),
            second.assignments.len() as i64
        );
        assert_capacity_invariant(&conn);
    }

    #[tokio::test]
    async fn test_inactive_entities_excluded() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 30);
        seed_inactive_class(&conn, "C999", 500);
        seed_room(&conn, "R001", 60);

        let api = build_api(conn.clone());
        let result = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        assert!(result.success);
        assert!(result.unallocated.is_empty());
        assert!(result.assignments.iter().all(|a| a.class_id != "C999"));
    }

    // ==========================================
    // 规则开关
    // ==========================================

    #[tokio::test]
    async fn test_mixing_allowed_when_separation_disabled() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "P001", "POSTGRADUATE", "D01", 60);
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 50);
        seed_room(&conn, "R001", 150);
        set_rule(&conn, KEY_STRICT_UG_PG_SEPARATION, "false");

        let api = build_api(conn.clone());
        let result = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        assert!(result.success);
        assert!(result.unallocated.is_empty());
        assert_eq!(result.statistics.rooms_used, 1);
        assert_capacity_invariant(&conn);
    }

    #[tokio::test]
    async fn test_shift_separation_excludes_occupied_room() {
        // 上午场占用大考场后,下午场同一班级只能使用另一间
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_session(&conn, test_date(), "AFTERNOON");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 50);
        seed_room(&conn, "R001", 100);
        seed_room(&conn, "R002", 60);

        let api = build_api(conn.clone());
        let morning = api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();
        assert_eq!(morning.assignments[0].room_id, "R001");

        let afternoon = api
            .allocate(test_date(), Shift::Afternoon, "admin")
            .await
            .unwrap();
        assert!(afternoon.success);
        assert_eq!(afternoon.assignments.len(), 1);
        assert_eq!(afternoon.assignments[0].room_id, "R002");

        // 上午场的分配保持原样
        assert_eq!(count_allocations(&conn, test_date(), "MORNING"), 1);
    }

    #[tokio::test]
    async fn test_shift_separation_disabled_reuses_room() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_session(&conn, test_date(), "AFTERNOON");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 50);
        seed_room(&conn, "R001", 100);
        seed_room(&conn, "R002", 60);
        set_rule(&conn, KEY_STRICT_SHIFT_SEPARATION, "false");

        let api = build_api(conn.clone());
        api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();
        let afternoon = api
            .allocate(test_date(), Shift::Afternoon, "admin")
            .await
            .unwrap();

        assert_eq!(afternoon.assignments[0].room_id, "R001");
    }

    // ==========================================
    // 确认流程
    // ==========================================

    #[tokio::test]
    async fn test_confirm_session_marks_generation() {
        let (_tmp, db_path) = create_test_db().unwrap();
        let conn = open_shared_conn(&db_path);
        seed_session(&conn, test_date(), "MORNING");
        seed_class(&conn, "C001", "UNDERGRADUATE", "D01", 30);
        seed_class(&conn, "C002", "UNDERGRADUATE", "D01", 20);
        seed_room(&conn, "R001", 60);

        let api = build_api(conn.clone());
        api.allocate(test_date(), Shift::Morning, "admin").await.unwrap();

        let confirmed = api.confirm_allocations(test_date(), Shift::Morning).unwrap();
        assert_eq!(confirmed, 2);

        let rows = api.list_allocations(test_date(), Shift::Morning).unwrap();
        assert!(rows.iter().all(|a| a.confirmed));
    }
}
