//! Burnout-risk scoring.
//!
//! Five capped sub-scores are summed into a 0-100 composite:
//!
//! ```text
//! Work Load        0-25   hours, night shifts, double shifts, days off (last 7 days)
//! Emotional Health 0-30   average mood / energy and mood swings (last 7 days)
//! Sleep Health     0-25   average hours / quality and irregularity (last 7 days)
//! Task Load        0-10   overdue and pending tasks
//! Recovery Time    0-10   days since the last run of two shift-free days (last 30 days)
//! ```
//!
//! The computation is pure: every window is measured from the `now` passed in,
//! so a fixed `now` always yields the same analysis.
//!
//! Shift hours and shift days are read in the offset each shift was recorded
//! with. "Today" and the midnight boundaries of log and due dates are taken in
//! the offset of `now`.

use std::collections::BTreeSet;

use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
};

use crate::models::burnout::{
    BurnoutAnalysis, BurnoutFactor, BurnoutLevel, BurnoutTrend, FactorCategory, FactorImpact,
    Recommendation, RecommendationPriority, MAX_BURNOUT_SCORE,
};
use crate::models::shift::Shift;
use crate::models::task::Task;
use crate::models::wellness_log::{MoodLog, SleepLog};

const RECENT_WINDOW_DAYS: i64 = 7;
const RECOVERY_SCAN_DAYS: i64 = 30;
const BREAK_LENGTH_DAYS: u32 = 2;

const NIGHT_SHIFT_START_HOUR: u32 = 22;
const NIGHT_SHIFT_END_HOUR: u32 = 6;
const DOUBLE_SHIFT_HOURS: f64 = 12.0;

#[derive(Debug, Clone, Default, PartialEq)]
struct WorkLoadMetrics {
    shift_count: usize,
    total_hours: f64,
    night_shifts: u32,
    double_shifts: u32,
    consecutive_days: u32,
    work_days: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TaskMetrics {
    overdue: usize,
    pending: usize,
}

/// Scores recent shifts, wellness logs and tasks into a [`BurnoutAnalysis`].
///
/// Inputs need not be pre-filtered or sorted. `previous_score` is the last
/// persisted total and only feeds the trend.
pub fn compute_burnout_analysis<Tz: TimeZone>(
    shifts: &[Shift],
    mood_logs: &[MoodLog],
    sleep_logs: &[SleepLog],
    tasks: &[Task],
    previous_score: Option<f64>,
    now: DateTime<Tz>,
) -> BurnoutAnalysis {
    let now = now.fixed_offset();
    let mut early_warnings = Vec::new();

    let (work_factor, work_metrics) = score_work_load(shifts, now, &mut early_warnings);
    let mood_factor = score_emotional_health(mood_logs, now, &mut early_warnings);
    let sleep_factor = score_sleep_health(sleep_logs, now, &mut early_warnings);
    let (task_factor, task_metrics) = score_task_load(tasks, now);
    let days_since_break = days_since_last_break(shifts, now.date_naive());
    let recovery_factor = score_recovery_time(days_since_break, &mut early_warnings);

    let factors = vec![
        work_factor,
        mood_factor,
        sleep_factor,
        task_factor,
        recovery_factor,
    ];
    let score: u32 = factors.iter().map(|factor| factor.score).sum();

    let trend = BurnoutTrend::from_scores(score, previous_score);
    if trend == BurnoutTrend::Worsening {
        early_warnings.push("Burnout risk increasing rapidly".to_string());
    }

    let level = BurnoutLevel::from_score(score);
    let recommendations = build_recommendations(
        score,
        &factors,
        &work_metrics,
        &task_metrics,
        days_since_break,
    );

    BurnoutAnalysis {
        level,
        score,
        max_score: MAX_BURNOUT_SCORE,
        percentage: f64::from(score) / f64::from(MAX_BURNOUT_SCORE) * 100.0,
        message: level.message().to_string(),
        factors,
        recommendations,
        trend,
        early_warnings,
    }
}

fn score_work_load(
    shifts: &[Shift],
    now: DateTime<FixedOffset>,
    warnings: &mut Vec<String>,
) -> (BurnoutFactor, WorkLoadMetrics) {
    let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let mut recent: Vec<&Shift> = shifts
        .iter()
        .filter(|shift| shift.start_time >= cutoff)
        .collect();
    recent.sort_by_key(|shift| shift.start_time);

    let mut metrics = WorkLoadMetrics {
        shift_count: recent.len(),
        ..WorkLoadMetrics::default()
    };
    let mut work_days = BTreeSet::new();
    let mut previous_day: Option<NaiveDate> = None;

    for shift in recent {
        let hours = shift.duration_hours();
        metrics.total_hours += hours;

        let day = shift.start_time.date_naive();
        work_days.insert(day);

        if shift.start_time.hour() >= NIGHT_SHIFT_START_HOUR
            || shift.end_time.hour() <= NIGHT_SHIFT_END_HOUR
        {
            metrics.night_shifts += 1;
        }

        if hours > DOUBLE_SHIFT_HOURS {
            metrics.double_shifts += 1;
        }

        if let Some(previous) = previous_day {
            if (day - previous).num_days() == 1 {
                metrics.consecutive_days += 1;
            }
        }
        previous_day = Some(day);
    }
    metrics.work_days = work_days.len();

    let mut score = 0;

    if metrics.total_hours > 60.0 {
        score += 10;
        warnings.push("Working excessive hours (60+ per week)".to_string());
    } else if metrics.total_hours > 50.0 {
        score += 7;
    } else if metrics.total_hours > 40.0 {
        score += 4;
    }

    if metrics.night_shifts >= 4 {
        score += 8;
        warnings.push("Multiple night shifts detected".to_string());
    } else if metrics.night_shifts >= 2 {
        score += 5;
    }

    if metrics.double_shifts >= 2 {
        score += 4;
        warnings.push("Multiple double shifts (>12 hours)".to_string());
    }

    if metrics.work_days >= 7 {
        score += 3;
        warnings.push("No days off in the past week".to_string());
    }

    let description = if metrics.shift_count == 0 {
        "No shifts logged in the past week".to_string()
    } else {
        format!(
            "{:.1} hours over {} day(s), {} night shift(s), {} double shift(s)",
            metrics.total_hours, metrics.work_days, metrics.night_shifts, metrics.double_shifts
        )
    };

    let factor = build_factor(FactorCategory::WorkLoad, score, description, |s| {
        impact_from_bands(s, Some(18), 12, 6)
    });
    (factor, metrics)
}

fn score_emotional_health(
    mood_logs: &[MoodLog],
    now: DateTime<FixedOffset>,
    warnings: &mut Vec<String>,
) -> BurnoutFactor {
    let cutoff = (now - Duration::days(RECENT_WINDOW_DAYS)).naive_local();
    let recent: Vec<&MoodLog> = mood_logs
        .iter()
        .filter(|log| start_of_day(log.log_date) >= cutoff)
        .collect();

    let mut score = 0;

    let description = if recent.is_empty() {
        score += 5;
        warnings.push("No mood tracking in the past week".to_string());
        "No mood logged in the past week".to_string()
    } else {
        let moods: Vec<f64> = recent.iter().map(|log| f64::from(log.mood_score)).collect();
        let energies: Vec<f64> = recent
            .iter()
            .map(|log| f64::from(log.energy_level))
            .collect();
        let avg_mood = mean(&moods);
        let avg_energy = mean(&energies);

        if avg_mood <= 2.0 {
            score += 15;
            warnings.push("Consistently low mood scores".to_string());
        } else if avg_mood <= 3.0 {
            score += 10;
        } else if avg_mood <= 3.5 {
            score += 5;
        }

        if avg_energy <= 2.0 {
            score += 12;
            warnings.push("Consistently low energy levels".to_string());
        } else if avg_energy <= 3.0 {
            score += 7;
        }

        if mean_absolute_deviation(&moods, avg_mood) > 1.5 {
            score += 3;
        }

        format!(
            "Average mood {:.1}/5 and energy {:.1}/5 over {} log(s)",
            avg_mood,
            avg_energy,
            recent.len()
        )
    };

    build_factor(FactorCategory::EmotionalHealth, score, description, |s| {
        impact_from_bands(s, Some(22), 15, 8)
    })
}

fn score_sleep_health(
    sleep_logs: &[SleepLog],
    now: DateTime<FixedOffset>,
    warnings: &mut Vec<String>,
) -> BurnoutFactor {
    let cutoff = (now - Duration::days(RECENT_WINDOW_DAYS)).naive_local();
    let recent: Vec<&SleepLog> = sleep_logs
        .iter()
        .filter(|log| start_of_day(log.log_date) >= cutoff)
        .collect();

    let mut score = 0;

    let description = if recent.is_empty() {
        score += 5;
        "No sleep logged in the past week".to_string()
    } else {
        let hours: Vec<f64> = recent.iter().map(|log| log.sleep_hours).collect();
        let qualities: Vec<f64> = recent
            .iter()
            .map(|log| f64::from(log.sleep_quality))
            .collect();
        let avg_hours = mean(&hours);
        let avg_quality = mean(&qualities);

        if avg_hours < 5.0 {
            score += 15;
            warnings.push("Severe sleep deprivation (<5 hours avg)".to_string());
        } else if avg_hours < 6.0 {
            score += 12;
            warnings.push("Insufficient sleep (<6 hours avg)".to_string());
        } else if avg_hours < 7.0 {
            score += 7;
        }

        if avg_quality <= 2.0 {
            score += 8;
        } else if avg_quality <= 3.0 {
            score += 4;
        }

        if mean_absolute_deviation(&hours, avg_hours) > 2.0 {
            score += 2;
        }

        format!(
            "Average {:.1} hours of sleep, quality {:.1}/5 over {} night(s)",
            avg_hours,
            avg_quality,
            recent.len()
        )
    };

    build_factor(FactorCategory::SleepHealth, score, description, |s| {
        impact_from_bands(s, Some(18), 12, 6)
    })
}

fn score_task_load(tasks: &[Task], now: DateTime<FixedOffset>) -> (BurnoutFactor, TaskMetrics) {
    let metrics = TaskMetrics {
        overdue: tasks
            .iter()
            .filter(|task| {
                !task.completed
                    && task
                        .due_date
                        .map(|due| start_of_day(due) < now.naive_local())
                        .unwrap_or(false)
            })
            .count(),
        pending: tasks.iter().filter(|task| !task.completed).count(),
    };

    let mut score = 0;

    if metrics.overdue > 10 {
        score += 6;
    } else if metrics.overdue > 5 {
        score += 4;
    } else if metrics.overdue > 0 {
        score += 2;
    }

    if metrics.pending > 20 {
        score += 4;
    } else if metrics.pending > 10 {
        score += 2;
    }

    let description = if metrics.pending == 0 {
        "No pending tasks".to_string()
    } else {
        format!(
            "{} overdue of {} pending task(s)",
            metrics.overdue, metrics.pending
        )
    };

    let factor = build_factor(FactorCategory::TaskLoad, score, description, |s| {
        impact_from_bands(s, None, 7, 4)
    });
    (factor, metrics)
}

fn score_recovery_time(days_since_break: i64, warnings: &mut Vec<String>) -> BurnoutFactor {
    let mut score = 0;

    if days_since_break > 14 {
        score += 10;
        warnings.push("No break in over 2 weeks".to_string());
    } else if days_since_break > 10 {
        score += 7;
    } else if days_since_break > 7 {
        score += 4;
    }

    let description = if days_since_break == 0 {
        "Recent break of two or more days".to_string()
    } else {
        format!("{days_since_break} day(s) since the last two-day break")
    };

    build_factor(FactorCategory::RecoveryTime, score, description, |s| {
        impact_from_bands(s, None, 7, 4)
    })
}

/// Walks back from today one calendar day at a time. Each day with a shift
/// start records its offset; the first run of two shift-free days stops the
/// walk and returns the last recorded offset. A window with no such run
/// returns the offset of the oldest worked day seen, not the window length.
fn days_since_last_break(shifts: &[Shift], today: NaiveDate) -> i64 {
    let shift_days: BTreeSet<NaiveDate> = shifts
        .iter()
        .map(|shift| shift.start_time.date_naive())
        .collect();

    let mut days_since_break = 0;
    let mut free_run = 0;

    for offset in 0..RECOVERY_SCAN_DAYS {
        let day = today - Duration::days(offset);
        if shift_days.contains(&day) {
            free_run = 0;
            days_since_break = offset;
        } else {
            free_run += 1;
            if free_run >= BREAK_LENGTH_DAYS {
                return days_since_break;
            }
        }
    }

    days_since_break
}

fn build_recommendations(
    score: u32,
    factors: &[BurnoutFactor],
    work: &WorkLoadMetrics,
    tasks: &TaskMetrics,
    days_since_break: i64,
) -> Vec<Recommendation> {
    let factor_score = |category: FactorCategory| {
        factors
            .iter()
            .find(|factor| factor.category == category)
            .map(|factor| factor.score)
            .unwrap_or(0)
    };
    let work_score = factor_score(FactorCategory::WorkLoad);
    let mood_score = factor_score(FactorCategory::EmotionalHealth);
    let sleep_score = factor_score(FactorCategory::SleepHealth);
    let task_score = factor_score(FactorCategory::TaskLoad);
    let recovery_score = factor_score(FactorCategory::RecoveryTime);

    let mut recommendations = Vec::new();
    let mut push = |priority, title: &str, action: String| {
        recommendations.push(Recommendation {
            priority,
            title: title.to_string(),
            action,
        });
    };

    if score >= 70 {
        push(
            RecommendationPriority::Immediate,
            "Consider emergency time off",
            "Your risk is critical. Speak with your manager or occupational health about taking leave now."
                .to_string(),
        );
    }

    if work_score > 15 {
        push(
            RecommendationPriority::Immediate,
            "Reduce work hours this week",
            format!(
                "You logged {:.0} hours this week. Decline extra shifts and trade at least one if you can.",
                work.total_hours
            ),
        );
    }

    if work.night_shifts >= 3 {
        push(
            RecommendationPriority::High,
            "Request day shifts",
            format!(
                "{} night shifts this week. Ask your scheduler for day shifts so your body clock can reset.",
                work.night_shifts
            ),
        );
    }

    if work.consecutive_days >= 5 {
        push(
            RecommendationPriority::High,
            "Schedule a day off",
            "You have worked many days in a row. Block out a full rest day in the next few days."
                .to_string(),
        );
    }

    if sleep_score > 10 {
        push(
            RecommendationPriority::Immediate,
            "Prioritize sleep tonight",
            "Aim for 7-9 hours tonight. Skip screens for the last hour and keep the room dark."
                .to_string(),
        );
        push(
            RecommendationPriority::High,
            "Create a consistent bedtime routine",
            "Go to bed and wake up at the same times, even around rotating shifts.".to_string(),
        );
    }

    if mood_score > 15 {
        push(
            RecommendationPriority::Immediate,
            "Talk to someone you trust",
            "Reach out to a friend, colleague or family member today about how you are feeling."
                .to_string(),
        );
        push(
            RecommendationPriority::High,
            "Consider professional support",
            "An employee assistance program or counselor can help you work through ongoing low mood."
                .to_string(),
        );
    }

    if score > 40 {
        push(
            RecommendationPriority::High,
            "Schedule daily self-care",
            "Set aside at least 20 minutes each day for something restorative.".to_string(),
        );
    }

    if task_score > 5 {
        push(
            RecommendationPriority::Medium,
            "Delegate or postpone tasks",
            format!(
                "{} task(s) are overdue. Hand off or reschedule anything that is not urgent.",
                tasks.overdue
            ),
        );
    }

    if recovery_score > 5 {
        push(
            RecommendationPriority::High,
            "Plan a vacation or extended break",
            format!(
                "It has been {days_since_break} days since you had two days off in a row. Put a longer break on the calendar."
            ),
        );
    }

    if score < 30 {
        push(
            RecommendationPriority::Low,
            "Keep up the good habits",
            "Your routines are working. Keep protecting your rest days and sleep.".to_string(),
        );
    }

    recommendations.sort_by_key(|recommendation| recommendation.priority.rank());
    recommendations
}

fn build_factor(
    category: FactorCategory,
    raw_score: u32,
    description: String,
    impact: impl Fn(u32) -> FactorImpact,
) -> BurnoutFactor {
    let max_score = category.max_score();
    let score = raw_score.min(max_score);
    BurnoutFactor {
        category,
        score,
        max_score,
        impact: impact(score),
        description,
    }
}

fn impact_from_bands(
    score: u32,
    critical_above: Option<u32>,
    high_above: u32,
    medium_above: u32,
) -> FactorImpact {
    match critical_above {
        Some(threshold) if score > threshold => FactorImpact::Critical,
        _ if score > high_above => FactorImpact::High,
        _ if score > medium_above => FactorImpact::Medium,
        _ => FactorImpact::Low,
    }
}

/// Local midnight, compared against `naive_local()` instants in the offset of `now`.
fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn mean_absolute_deviation(values: &[f64], average: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|value| (value - average).abs()).sum::<f64>() / values.len() as f64
}
