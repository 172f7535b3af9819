use chrono::{NaiveDate, TimeZone, Utc};
use shiftwell_lib::db::DbPool;
use shiftwell_lib::error::AppError;
use shiftwell_lib::models::shift::ShiftCreateInput;
use shiftwell_lib::models::task::{TaskCreateInput, TaskUpdateInput};
use shiftwell_lib::models::wellness_log::{MoodLogInput, SleepLogInput};
use shiftwell_lib::services::shift_service::ShiftService;
use shiftwell_lib::services::task_service::TaskService;
use shiftwell_lib::services::wellness_log_service::WellnessLogService;
use tempfile::{tempdir, TempDir};

const USER: &str = "medic-42";

fn pool() -> (TempDir, DbPool) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("tracking.sqlite")).expect("db pool");
    (dir, pool)
}

fn shift_input(start: &str, end: &str) -> ShiftCreateInput {
    ShiftCreateInput {
        user_id: USER.into(),
        start_time: start.into(),
        end_time: end.into(),
        notes: None,
    }
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("date")
}

#[test]
fn shifts_keep_their_offset_and_are_listed_oldest_first() {
    let (_dir, pool) = pool();
    let service = ShiftService::new(pool);

    let late = service
        .create_shift(shift_input("2025-06-12T22:00:00+02:00", "2025-06-13T06:00:00+02:00"))
        .expect("night shift");
    let early = service
        .create_shift(ShiftCreateInput {
            notes: Some("  ER cover  ".into()),
            ..shift_input("2025-06-10T08:00:00Z", "2025-06-10T16:00:00Z")
        })
        .expect("day shift");

    assert_eq!(late.start_time, Utc.with_ymd_and_hms(2025, 6, 12, 20, 0, 0).unwrap());
    assert_eq!(late.start_time.to_rfc3339(), "2025-06-12T22:00:00+02:00");
    assert_eq!(early.notes.as_deref(), Some("ER cover"));

    let stored = service.get_shift(&late.id).expect("stored night shift");
    assert_eq!(stored.start_time.to_rfc3339(), "2025-06-12T22:00:00+02:00");
    assert_eq!(stored.end_time.to_rfc3339(), "2025-06-13T06:00:00+02:00");

    let since = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let listed = service.list_since(USER, since).expect("list");
    let ids: Vec<_> = listed.iter().map(|shift| shift.id.as_str()).collect();
    assert_eq!(ids, vec![early.id.as_str(), late.id.as_str()]);

    let later = Utc.with_ymd_and_hms(2025, 6, 11, 0, 0, 0).unwrap();
    assert_eq!(service.list_since(USER, later).expect("list").len(), 1);
    assert!(service.list_since("someone-else", since).expect("list").is_empty());
}

#[test]
fn invalid_shifts_are_rejected() {
    let (_dir, pool) = pool();
    let service = ShiftService::new(pool);

    let cases = [
        shift_input("2025-06-10T16:00:00Z", "2025-06-10T08:00:00Z"),
        shift_input("2025-06-10T08:00:00Z", "2025-06-10T08:00:00Z"),
        shift_input("2025-06-10 08:00", "2025-06-10T16:00:00Z"),
        ShiftCreateInput {
            user_id: " ".into(),
            ..shift_input("2025-06-10T08:00:00Z", "2025-06-10T16:00:00Z")
        },
    ];

    for input in cases {
        let result = service.create_shift(input.clone());
        assert!(
            matches!(result, Err(AppError::Validation { .. })),
            "expected validation error for {input:?}"
        );
    }
}

#[test]
fn deleting_shifts() {
    let (_dir, pool) = pool();
    let service = ShiftService::new(pool);

    let shift = service
        .create_shift(shift_input("2025-06-10T08:00:00Z", "2025-06-10T16:00:00Z"))
        .expect("shift");
    service.delete_shift(&shift.id).expect("delete");

    assert!(matches!(service.get_shift(&shift.id), Err(AppError::NotFound)));
    assert!(matches!(service.delete_shift(&shift.id), Err(AppError::NotFound)));
}

#[test]
fn mood_log_for_the_same_day_replaces_the_earlier_entry() {
    let (_dir, pool) = pool();
    let service = WellnessLogService::new(pool);

    let first = service
        .record_mood(MoodLogInput {
            user_id: USER.into(),
            mood_score: 2,
            energy_level: 3,
            notes: Some("rough night".into()),
            log_date: "2025-06-10".into(),
        })
        .expect("first mood");
    let second = service
        .record_mood(MoodLogInput {
            user_id: USER.into(),
            mood_score: 4,
            energy_level: 4,
            notes: None,
            log_date: "2025-06-10".into(),
        })
        .expect("second mood");

    assert_eq!(second.id, first.id);
    assert_eq!(second.mood_score, 4);
    assert_eq!(second.notes, None);

    let logs = service
        .list_mood_since(USER, date("2025-06-01"))
        .expect("list");
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].energy_level, 4);
}

#[test]
fn mood_ratings_and_dates_are_validated() {
    let (_dir, pool) = pool();
    let service = WellnessLogService::new(pool);

    let valid = MoodLogInput {
        user_id: USER.into(),
        mood_score: 3,
        energy_level: 3,
        notes: None,
        log_date: "2025-06-10".into(),
    };

    for input in [
        MoodLogInput { mood_score: 0, ..valid.clone() },
        MoodLogInput { energy_level: 6, ..valid.clone() },
        MoodLogInput { log_date: "2025-13-01".into(), ..valid.clone() },
    ] {
        assert!(matches!(
            service.record_mood(input),
            Err(AppError::Validation { .. })
        ));
    }

    let err = service
        .record_mood(MoodLogInput { mood_score: 9, ..valid })
        .unwrap_err();
    assert_eq!(
        err.validation_details().and_then(|d| d.get("field")),
        Some(&serde_json::json!("moodScore"))
    );
}

#[test]
fn sleep_logs_are_validated_and_listed_by_date() {
    let (_dir, pool) = pool();
    let service = WellnessLogService::new(pool);

    let input = |hours: f64, quality: i32, log_date: &str| SleepLogInput {
        user_id: USER.into(),
        sleep_hours: hours,
        sleep_quality: quality,
        log_date: log_date.into(),
    };

    service.record_sleep(input(6.5, 3, "2025-06-11")).expect("sleep");
    service.record_sleep(input(4.0, 2, "2025-06-09")).expect("sleep");
    service.record_sleep(input(0.0, 1, "2025-06-01")).expect("zero hours");

    for bad in [
        input(-1.0, 3, "2025-06-12"),
        input(24.5, 3, "2025-06-12"),
        input(f64::NAN, 3, "2025-06-12"),
        input(7.0, 0, "2025-06-12"),
    ] {
        assert!(matches!(
            service.record_sleep(bad),
            Err(AppError::Validation { .. })
        ));
    }

    let logs = service
        .list_sleep_since(USER, date("2025-06-05"))
        .expect("list");
    let dates: Vec<_> = logs.iter().map(|log| log.log_date).collect();
    assert_eq!(dates, vec![date("2025-06-09"), date("2025-06-11")]);
}

#[test]
fn task_lifecycle() {
    let (_dir, pool) = pool();
    let service = TaskService::new(pool);

    let task = service
        .create_task(TaskCreateInput {
            user_id: USER.into(),
            title: "  Renew BLS certification ".into(),
            completed: None,
            due_date: Some("2025-07-01".into()),
        })
        .expect("create");
    assert_eq!(task.title, "Renew BLS certification");
    assert!(!task.completed);
    assert_eq!(task.due_date, Some(date("2025-07-01")));

    let updated = service
        .update_task(
            &task.id,
            TaskUpdateInput {
                title: Some("Renew ACLS certification".into()),
                due_date: Some(None),
                ..TaskUpdateInput::default()
            },
        )
        .expect("update");
    assert_eq!(updated.title, "Renew ACLS certification");
    assert_eq!(updated.due_date, None);
    assert!(updated.updated_at >= task.updated_at);

    let completed = service.complete_task(&task.id).expect("complete");
    assert!(completed.completed);
    assert_eq!(service.get_task(&task.id).expect("get"), completed);

    assert_eq!(service.list_for_user(USER).expect("list").len(), 1);

    service.delete_task(&task.id).expect("delete");
    assert!(service.list_for_user(USER).expect("list").is_empty());
    assert!(matches!(service.delete_task(&task.id), Err(AppError::NotFound)));
}

#[test]
fn task_input_is_validated() {
    let (_dir, pool) = pool();
    let service = TaskService::new(pool);

    assert!(matches!(
        service.create_task(TaskCreateInput {
            user_id: USER.into(),
            title: "   ".into(),
            ..TaskCreateInput::default()
        }),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        service.create_task(TaskCreateInput {
            user_id: USER.into(),
            title: "Handover notes".into(),
            due_date: Some("next week".into()),
            ..TaskCreateInput::default()
        }),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        service.update_task("missing", TaskUpdateInput::default()),
        Err(AppError::NotFound)
    ));
}
