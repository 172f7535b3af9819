use chrono::{NaiveDate, SubsecRound, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::repositories::mood_repository::MoodRepository;
use crate::db::repositories::sleep_repository::SleepRepository;
use crate::db::repositories::DATE_FORMAT;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::wellness_log::{MoodLogInput, MoodLogRecord, SleepLogInput, SleepLogRecord};
use crate::services::shift_service::normalize_user_id;

const MIN_RATING: i32 = 1;
const MAX_RATING: i32 = 5;
const MAX_SLEEP_HOURS: f64 = 24.0;

/// Daily mood and sleep check-ins. A user has at most one of each per day;
/// recording again for the same date replaces the earlier values.
pub struct WellnessLogService {
    db: DbPool,
}

impl WellnessLogService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn record_mood(&self, input: MoodLogInput) -> AppResult<MoodLogRecord> {
        let user_id = normalize_user_id(&input.user_id)?;
        ensure_rating("moodScore", input.mood_score)?;
        ensure_rating("energyLevel", input.energy_level)?;
        let log_date = parse_log_date(&input.log_date)?;

        let record = MoodLogRecord {
            id: Uuid::new_v4().to_string(),
            user_id,
            mood_score: input.mood_score,
            energy_level: input.energy_level,
            notes: input
                .notes
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()),
            log_date,
            created_at: Utc::now().trunc_subsecs(0),
        };

        let stored = self.db.with_transaction(|conn| {
            MoodRepository::upsert(conn, &record)?;
            MoodRepository::find_for_day(conn, &record.user_id, &log_date)?
                .ok_or_else(AppError::not_found)
        })?;

        info!(
            target: "app::tracking",
            user_id = %stored.user_id,
            log_date = %stored.log_date,
            mood = stored.mood_score,
            energy = stored.energy_level,
            "mood logged"
        );

        Ok(stored)
    }

    pub fn record_sleep(&self, input: SleepLogInput) -> AppResult<SleepLogRecord> {
        let user_id = normalize_user_id(&input.user_id)?;
        if !input.sleep_hours.is_finite()
            || input.sleep_hours < 0.0
            || input.sleep_hours > MAX_SLEEP_HOURS
        {
            return Err(AppError::validation_with_details(
                "sleep hours must be between 0 and 24",
                serde_json::json!({ "field": "sleepHours", "value": input.sleep_hours }),
            ));
        }
        ensure_rating("sleepQuality", input.sleep_quality)?;
        let log_date = parse_log_date(&input.log_date)?;

        let record = SleepLogRecord {
            id: Uuid::new_v4().to_string(),
            user_id,
            sleep_hours: input.sleep_hours,
            sleep_quality: input.sleep_quality,
            log_date,
            created_at: Utc::now().trunc_subsecs(0),
        };

        let stored = self.db.with_transaction(|conn| {
            SleepRepository::upsert(conn, &record)?;
            SleepRepository::find_for_day(conn, &record.user_id, &log_date)?
                .ok_or_else(AppError::not_found)
        })?;

        info!(
            target: "app::tracking",
            user_id = %stored.user_id,
            log_date = %stored.log_date,
            hours = stored.sleep_hours,
            quality = stored.sleep_quality,
            "sleep logged"
        );

        Ok(stored)
    }

    /// Mood logs dated on or after `since`, oldest first.
    pub fn list_mood_since(&self, user_id: &str, since: NaiveDate) -> AppResult<Vec<MoodLogRecord>> {
        let logs = self
            .db
            .with_connection(|conn| MoodRepository::list_for_user_since(conn, user_id, &since))?;
        debug!(target: "app::tracking", user_id, count = logs.len(), "listed mood logs");
        Ok(logs)
    }

    /// Sleep logs dated on or after `since`, oldest first.
    pub fn list_sleep_since(
        &self,
        user_id: &str,
        since: NaiveDate,
    ) -> AppResult<Vec<SleepLogRecord>> {
        let logs = self
            .db
            .with_connection(|conn| SleepRepository::list_for_user_since(conn, user_id, &since))?;
        debug!(target: "app::tracking", user_id, count = logs.len(), "listed sleep logs");
        Ok(logs)
    }
}

fn ensure_rating(field: &str, value: i32) -> AppResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        return Ok(());
    }
    Err(AppError::validation_with_details(
        format!("{field} must be between {MIN_RATING} and {MAX_RATING}"),
        serde_json::json!({ "field": field, "value": value }),
    ))
}

pub(crate) fn parse_log_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AppError::validation_with_details(
            "date must use the YYYY-MM-DD format",
            serde_json::json!({ "value": value }),
        )
    })
}
