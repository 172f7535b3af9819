//! Invariants of the scorer checked over deterministic pseudo-random inputs.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shiftwell_lib::compute_burnout_analysis;
use shiftwell_lib::models::burnout::{BurnoutLevel, FactorCategory, MAX_BURNOUT_SCORE};
use shiftwell_lib::models::shift::Shift;
use shiftwell_lib::models::task::Task;
use shiftwell_lib::models::wellness_log::{MoodLog, SleepLog};

struct Case {
    shifts: Vec<Shift>,
    moods: Vec<MoodLog>,
    sleeps: Vec<SleepLog>,
    tasks: Vec<Task>,
    previous: Option<f64>,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn day(days_ago: i64) -> NaiveDate {
    (now() - Duration::days(days_ago)).date_naive()
}

fn random_case(rng: &mut StdRng) -> Case {
    let shifts = (0..rng.gen_range(0..=40))
        .map(|_| {
            let offset = Duration::days(rng.gen_range(0..=35))
                + Duration::hours(rng.gen_range(0..=23))
                + Duration::minutes(rng.gen_range(0..=59));
            let start = now() - offset;
            Shift::new(start, start + Duration::minutes(rng.gen_range(4..=64) * 15))
        })
        .collect();
    let moods = (0..rng.gen_range(0..=12))
        .map(|_| MoodLog {
            mood_score: rng.gen_range(1..=5) as i32,
            energy_level: rng.gen_range(1..=5) as i32,
            log_date: day(rng.gen_range(0..=20)),
        })
        .collect();
    let sleeps = (0..rng.gen_range(0..=12))
        .map(|_| SleepLog {
            sleep_hours: rng.gen_range(0..=24) as f64 / 2.0,
            sleep_quality: rng.gen_range(1..=5) as i32,
            log_date: day(rng.gen_range(0..=20)),
        })
        .collect();
    let tasks = (0..rng.gen_range(0..=30))
        .map(|_| Task {
            completed: rng.gen_range(0..=3) == 0,
            due_date: match rng.gen_range(0..=2) {
                0 => None,
                _ => Some(day(rng.gen_range(-10..=10))),
            },
        })
        .collect();
    let previous = match rng.gen_range(0..=2) {
        0 => None,
        _ => Some(rng.gen_range(0..=100) as f64),
    };

    Case {
        shifts,
        moods,
        sleeps,
        tasks,
        previous,
    }
}

fn analyze(case: &Case) -> shiftwell_lib::models::burnout::BurnoutAnalysis {
    compute_burnout_analysis(
        &case.shifts,
        &case.moods,
        &case.sleeps,
        &case.tasks,
        case.previous,
        now(),
    )
}

#[test]
fn composite_is_bounded_sum_of_capped_factors() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..300 {
        let case = random_case(&mut rng);
        let analysis = analyze(&case);

        let categories: Vec<_> = analysis.factors.iter().map(|f| f.category).collect();
        assert_eq!(categories, FactorCategory::ALL.to_vec());

        for factor in &analysis.factors {
            assert_eq!(factor.max_score, factor.category.max_score());
            assert!(factor.score <= factor.max_score);
        }

        let sum: u32 = analysis.factors.iter().map(|f| f.score).sum();
        assert_eq!(analysis.score, sum);
        assert!(analysis.score <= MAX_BURNOUT_SCORE);
        assert_eq!(analysis.max_score, MAX_BURNOUT_SCORE);
        assert!((analysis.percentage - f64::from(analysis.score)).abs() < 1e-9);
        assert_eq!(analysis.level, BurnoutLevel::from_score(analysis.score));
        assert_eq!(analysis.message, analysis.level.message());
    }
}

#[test]
fn recommendations_are_always_ordered_by_priority() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..300 {
        let analysis = analyze(&random_case(&mut rng));
        let ranks: Vec<_> = analysis
            .recommendations
            .iter()
            .map(|r| r.priority.rank())
            .collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
    }
}

#[test]
fn analysis_is_deterministic_and_ignores_shift_and_task_order() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..100 {
        let case = random_case(&mut rng);
        let first = analyze(&case);
        assert_eq!(analyze(&case), first);

        let reversed = Case {
            shifts: case.shifts.iter().rev().copied().collect(),
            moods: case.moods.clone(),
            sleeps: case.sleeps.clone(),
            tasks: case.tasks.iter().rev().copied().collect(),
            previous: case.previous,
        };
        let reversed = analyze(&reversed);
        assert_eq!(reversed.score, first.score);
        assert_eq!(reversed.factors, first.factors);
    }
}

#[test]
fn adding_day_shift_hours_never_lowers_work_load() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..100 {
        let count = rng.gen_range(1..=7);
        let mut shifts: Vec<Shift> = (0..count)
            .map(|days_ago| {
                let start = Utc
                    .from_utc_datetime(&day(days_ago).and_hms_opt(9, 0, 0).expect("time"));
                Shift::new(start, start + Duration::hours(rng.gen_range(1..=8)))
            })
            .collect();

        let work_score = |shifts: &[Shift]| {
            compute_burnout_analysis(shifts, &[], &[], &[], None, now())
                .factor(FactorCategory::WorkLoad)
                .map(|f| f.score)
                .unwrap_or_default()
        };

        let before = work_score(&shifts);
        for shift in shifts.iter_mut() {
            let extra = Duration::hours(rng.gen_range(0..=3));
            *shift = Shift::new(shift.start_time, shift.end_time + extra);
        }
        assert!(work_score(&shifts) >= before);
    }
}

#[test]
fn working_every_day_for_a_month_reports_the_oldest_scanned_day() {
    let shifts: Vec<Shift> = (0..40)
        .map(|days_ago| {
            let start = Utc.from_utc_datetime(&day(days_ago).and_hms_opt(8, 0, 0).expect("time"));
            Shift::new(start, start + Duration::hours(8))
        })
        .collect();

    let analysis = compute_burnout_analysis(&shifts, &[], &[], &[], None, now());
    let recovery = analysis
        .factor(FactorCategory::RecoveryTime)
        .expect("recovery factor");

    assert_eq!(recovery.score, 10);
    assert_eq!(recovery.description, "29 day(s) since the last two-day break");
    assert!(analysis
        .early_warnings
        .iter()
        .any(|w| w == "No break in over 2 weeks"));
}
