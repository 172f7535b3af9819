use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::db::repositories::burnout_repository::BurnoutRepository;
use crate::db::repositories::mood_repository::MoodRepository;
use crate::db::repositories::shift_repository::ShiftRepository;
use crate::db::repositories::sleep_repository::SleepRepository;
use crate::db::repositories::task_repository::TaskRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::burnout::{BurnoutAnalysis, BurnoutScoreRecord};
use crate::models::shift::Shift;
use crate::models::task::Task;
use crate::models::wellness_log::{MoodLog, SleepLog};
use crate::services::burnout_scorer::compute_burnout_analysis;
use crate::services::settings_service::SettingsService;
use crate::services::shift_service::normalize_user_id;

/// How far back history is loaded for a fresh analysis.
const HISTORY_WINDOW_DAYS: i64 = 30;
const MAX_HISTORY_LIMIT: usize = 365;

/// Loads a user's recent history, scores it and keeps the result.
pub struct BurnoutService {
    db: DbPool,
    settings_service: Arc<SettingsService>,
}

impl BurnoutService {
    pub fn new(db: DbPool, settings_service: Arc<SettingsService>) -> Self {
        Self {
            db,
            settings_service,
        }
    }

    /// Scores the user's history as of `now`. Calendar days (log dates, due
    /// dates, "today") are read in the offset of `now`, so pass the user's
    /// local time when it is known.
    pub fn analyze<Tz: TimeZone>(
        &self,
        user_id: &str,
        now: DateTime<Tz>,
    ) -> AppResult<BurnoutAnalysis> {
        let user_id = normalize_user_id(user_id)?;
        let settings = self.settings_service.get()?;

        let now = now.fixed_offset();
        let calculated_at = now.with_timezone(&Utc).trunc_subsecs(0);
        let window_start = now - Duration::days(HISTORY_WINDOW_DAYS);
        let window_start_utc = window_start.with_timezone(&Utc);
        let retention_cutoff = calculated_at - Duration::days(settings.score_retention_days);

        let (analysis, pruned) = self.db.with_transaction(|conn| {
            let shifts: Vec<Shift> =
                ShiftRepository::list_for_user_since(conn, &user_id, &window_start_utc)?
                    .iter()
                    .map(Shift::from)
                    .collect();
            let mood_logs: Vec<MoodLog> =
                MoodRepository::list_for_user_since(conn, &user_id, &window_start.date_naive())?
                    .iter()
                    .map(MoodLog::from)
                    .collect();
            let sleep_logs: Vec<SleepLog> =
                SleepRepository::list_for_user_since(conn, &user_id, &window_start.date_naive())?
                    .iter()
                    .map(SleepLog::from)
                    .collect();
            let tasks: Vec<Task> = TaskRepository::list_for_user(conn, &user_id)?
                .iter()
                .map(Task::from)
                .collect();
            let previous_score = BurnoutRepository::latest_for_user(conn, &user_id)?
                .map(|record| f64::from(record.score));

            debug!(
                target: "app::burnout",
                user_id = %user_id,
                shifts = shifts.len(),
                mood_logs = mood_logs.len(),
                sleep_logs = sleep_logs.len(),
                tasks = tasks.len(),
                previous_score = ?previous_score,
                "scoring burnout risk"
            );

            let analysis = compute_burnout_analysis(
                &shifts,
                &mood_logs,
                &sleep_logs,
                &tasks,
                previous_score,
                now,
            );

            let record =
                BurnoutScoreRecord::from_analysis(user_id.as_str(), &analysis, calculated_at);
            BurnoutRepository::insert(conn, &record)?;
            let pruned = BurnoutRepository::delete_before(conn, &user_id, &retention_cutoff)?;

            Ok((analysis, pruned))
        })?;

        info!(
            target: "app::burnout",
            user_id = %user_id,
            score = analysis.score,
            level = %analysis.level,
            trend = %analysis.trend,
            warnings = analysis.early_warnings.len(),
            pruned,
            "burnout analysis stored"
        );

        if settings.burnout_alerts_enabled && analysis.level.is_elevated() {
            warn!(
                target: "app::burnout",
                user_id = %user_id,
                score = analysis.score,
                level = %analysis.level,
                "elevated burnout risk"
            );
        }

        Ok(analysis)
    }

    pub fn latest_score(&self, user_id: &str) -> AppResult<Option<BurnoutScoreRecord>> {
        let user_id = normalize_user_id(user_id)?;
        self.db
            .with_connection(|conn| BurnoutRepository::latest_for_user(conn, &user_id))
    }

    /// Stored analyses, most recent first. `limit` is capped at one year of
    /// daily entries.
    pub fn score_history(&self, user_id: &str, limit: usize) -> AppResult<Vec<BurnoutScoreRecord>> {
        if limit == 0 {
            return Err(AppError::validation("history limit must be positive"));
        }
        let user_id = normalize_user_id(user_id)?;
        let limit = limit.min(MAX_HISTORY_LIMIT);
        self.db
            .with_connection(|conn| BurnoutRepository::list_for_user(conn, &user_id, limit))
    }
}
