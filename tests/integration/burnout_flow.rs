use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use shiftwell_lib::db::DbPool;
use shiftwell_lib::error::AppError;
use shiftwell_lib::models::burnout::{
    BurnoutLevel, BurnoutTrend, FactorCategory, RecommendationPriority,
};
use shiftwell_lib::models::shift::ShiftCreateInput;
use shiftwell_lib::models::task::TaskCreateInput;
use shiftwell_lib::models::wellness_log::MoodLogInput;
use shiftwell_lib::services::settings_service::SettingsUpdateInput;
use shiftwell_lib::state::AppState;
use tempfile::{tempdir, TempDir};

const USER: &str = "nurse-ortiz";

fn setup() -> (TempDir, AppState) {
    let dir = tempdir().expect("temp dir");
    let pool = DbPool::new(dir.path().join("burnout.sqlite")).expect("db pool");
    (dir, AppState::new(pool))
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn now() -> DateTime<Utc> {
    at(15, 12)
}

#[test]
fn empty_history_scores_baseline_and_is_persisted() {
    let (_dir, state) = setup();

    let analysis = state.burnout().analyze(USER, now()).expect("analysis");

    assert_eq!(analysis.score, 10);
    assert_eq!(analysis.level, BurnoutLevel::Low);
    assert_eq!(analysis.trend, BurnoutTrend::Stable);
    assert_eq!(analysis.factors.len(), 5);

    let stored = state
        .burnout()
        .latest_score(USER)
        .expect("latest score")
        .expect("stored record");
    assert_eq!(stored.score, 10);
    assert_eq!(stored.level, BurnoutLevel::Low);
    assert_eq!(stored.calculated_at, now());
    assert_eq!(stored.factors, analysis.factors);
    assert_eq!(stored.recommendations, analysis.recommendations);
}

#[test]
fn low_mood_week_worsens_against_the_stored_score() {
    let (_dir, state) = setup();
    let burnout = state.burnout();

    let baseline = burnout.analyze(USER, now()).expect("baseline");
    assert_eq!(baseline.score, 10);

    for day in 9..=15 {
        state
            .wellness_logs()
            .record_mood(MoodLogInput {
                user_id: USER.into(),
                mood_score: 1,
                energy_level: 1,
                notes: None,
                log_date: format!("2025-06-{day:02}"),
            })
            .expect("mood log");
    }

    let analysis = burnout
        .analyze(USER, now() + Duration::hours(1))
        .expect("second analysis");

    let emotional = analysis
        .factor(FactorCategory::EmotionalHealth)
        .expect("emotional factor");
    assert_eq!(emotional.score, 27);
    assert_eq!(analysis.score, 32);
    assert_eq!(analysis.level, BurnoutLevel::Moderate);
    assert_eq!(analysis.trend, BurnoutTrend::Worsening);
    assert!(analysis
        .early_warnings
        .iter()
        .any(|w| w == "Burnout risk increasing rapidly"));
    assert!(analysis
        .early_warnings
        .iter()
        .any(|w| w == "Consistently low mood scores"));

    let history = burnout.score_history(USER, 10).expect("history");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].score, 32);
    assert_eq!(history[0].trend, BurnoutTrend::Worsening);
    assert_eq!(history[1].score, 10);
}

#[test]
fn week_of_double_shifts_drives_work_load() {
    let (_dir, state) = setup();

    for day in 9..=15 {
        state
            .shifts()
            .create_shift(ShiftCreateInput {
                user_id: USER.into(),
                start_time: format!("2025-06-{day:02}T07:00:00Z"),
                end_time: format!("2025-06-{day:02}T20:00:00Z"),
                notes: Some("ICU".into()),
            })
            .expect("shift");
    }

    let analysis = state.burnout().analyze(USER, now()).expect("analysis");

    let work = analysis
        .factor(FactorCategory::WorkLoad)
        .expect("work factor");
    assert_eq!(work.score, 17);
    assert_eq!(analysis.score, 27);
    assert_eq!(analysis.level, BurnoutLevel::Moderate);

    for warning in [
        "Working excessive hours (60+ per week)",
        "Multiple double shifts (>12 hours)",
        "No days off in the past week",
    ] {
        assert!(
            analysis.early_warnings.iter().any(|w| w == warning),
            "missing warning: {warning}"
        );
    }

    let priorities: Vec<_> = analysis
        .recommendations
        .iter()
        .map(|r| r.priority)
        .collect();
    assert_eq!(
        priorities,
        vec![
            RecommendationPriority::Immediate,
            RecommendationPriority::High,
            RecommendationPriority::Low,
        ]
    );
    assert_eq!(analysis.recommendations[0].title, "Reduce work hours this week");
    assert_eq!(analysis.recommendations[1].title, "Schedule a day off");
}

#[test]
fn local_day_shifts_are_not_scored_as_nights() {
    let (_dir, state) = setup();

    for day in [13, 14] {
        state
            .shifts()
            .create_shift(ShiftCreateInput {
                user_id: USER.into(),
                start_time: format!("2025-06-{day}T09:00:00+10:00"),
                end_time: format!("2025-06-{day}T17:00:00+10:00"),
                notes: None,
            })
            .expect("shift");
    }

    let analysis = state.burnout().analyze(USER, now()).expect("analysis");
    let work = analysis
        .factor(FactorCategory::WorkLoad)
        .expect("work factor");
    assert_eq!(work.score, 0);
    assert_eq!(
        work.description,
        "16.0 hours over 2 day(s), 0 night shift(s), 0 double shift(s)"
    );
}

#[test]
fn analysis_in_local_time_uses_the_local_calendar_day() {
    let (_dir, state) = setup();
    let sydney = FixedOffset::east_opt(10 * 3600).expect("offset");

    state
        .tasks()
        .create_task(TaskCreateInput {
            user_id: USER.into(),
            title: "Submit roster swap".into(),
            completed: None,
            due_date: Some("2025-06-16".into()),
        })
        .expect("task");

    // 20:00 UTC on the 15th is 06:00 on the 16th in Sydney.
    let evening = at(15, 20);
    let utc = state.burnout().analyze(USER, evening).expect("utc analysis");
    assert_eq!(utc.factor(FactorCategory::TaskLoad).map(|f| f.score), Some(0));

    let local = state
        .burnout()
        .analyze(USER, evening.with_timezone(&sydney))
        .expect("local analysis");
    assert_eq!(local.factor(FactorCategory::TaskLoad).map(|f| f.score), Some(2));

    let latest = state
        .burnout()
        .latest_score(USER)
        .expect("latest")
        .expect("stored");
    assert_eq!(latest.calculated_at, evening);
}

#[test]
fn reads_normalize_the_user_id_like_analyze() {
    let (_dir, state) = setup();
    let burnout = state.burnout();

    burnout.analyze(" nurse-kim ", now()).expect("analysis");

    assert!(burnout
        .latest_score("  nurse-kim")
        .expect("latest")
        .is_some());
    assert_eq!(
        burnout
            .score_history("nurse-kim  ", 5)
            .expect("history")
            .len(),
        1
    );
    assert!(matches!(
        burnout.latest_score("   "),
        Err(AppError::Validation { .. })
    ));
}

#[test]
fn overdue_tasks_feed_task_load() {
    let (_dir, state) = setup();
    let tasks = state.tasks();

    let mut ids = Vec::new();
    for idx in 0..7 {
        let task = tasks
            .create_task(TaskCreateInput {
                user_id: USER.into(),
                title: format!("Chart audit {idx}"),
                completed: None,
                due_date: Some("2025-06-01".into()),
            })
            .expect("task");
        ids.push(task.id);
    }
    tasks.complete_task(&ids[0]).expect("complete");

    let analysis = state.burnout().analyze(USER, now()).expect("analysis");
    let task_factor = analysis
        .factor(FactorCategory::TaskLoad)
        .expect("task factor");
    assert_eq!(task_factor.score, 4);
    assert_eq!(analysis.score, 14);
}

#[test]
fn scores_older_than_retention_are_pruned() {
    let (_dir, state) = setup();
    state
        .settings()
        .update(SettingsUpdateInput {
            score_retention_days: Some(7),
            ..SettingsUpdateInput::default()
        })
        .expect("settings");

    let burnout = state.burnout();
    burnout.analyze(USER, at(1, 9)).expect("june 1");
    burnout.analyze(USER, at(5, 9)).expect("june 5");
    assert_eq!(burnout.score_history(USER, 10).expect("history").len(), 2);

    burnout.analyze(USER, now()).expect("june 15");
    let history = burnout.score_history(USER, 10).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].calculated_at, now());
}

#[test]
fn history_is_scoped_per_user() {
    let (_dir, state) = setup();
    let burnout = state.burnout();

    burnout.analyze(USER, now()).expect("first user");
    burnout.analyze("nurse-patel", now()).expect("second user");

    assert_eq!(burnout.score_history(USER, 10).expect("history").len(), 1);
    assert!(burnout
        .latest_score("nurse-unknown")
        .expect("latest")
        .is_none());
}

#[test]
fn invalid_requests_are_rejected() {
    let (_dir, state) = setup();

    assert!(matches!(
        state.burnout().analyze("  ", now()),
        Err(AppError::Validation { .. })
    ));
    assert!(matches!(
        state.burnout().score_history(USER, 0),
        Err(AppError::Validation { .. })
    ));
}
