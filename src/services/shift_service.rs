use chrono::{DateTime, FixedOffset, SubsecRound, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::repositories::shift_repository::ShiftRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::shift::{ShiftCreateInput, ShiftRecord};

/// Records and lists scheduled work periods.
pub struct ShiftService {
    db: DbPool,
}

impl ShiftService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create_shift(&self, input: ShiftCreateInput) -> AppResult<ShiftRecord> {
        let user_id = normalize_user_id(&input.user_id)?;
        let start_time = parse_timestamp("startTime", &input.start_time)?;
        let end_time = parse_timestamp("endTime", &input.end_time)?;

        if end_time <= start_time {
            return Err(AppError::validation_with_details(
                "shift must end after it starts",
                serde_json::json!({
                    "startTime": input.start_time,
                    "endTime": input.end_time,
                }),
            ));
        }

        let notes = input
            .notes
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let record = ShiftRecord {
            id: Uuid::new_v4().to_string(),
            user_id,
            start_time,
            end_time,
            notes,
            created_at: Utc::now().trunc_subsecs(0),
        };

        self.db
            .with_connection(|conn| ShiftRepository::insert(conn, &record))?;

        info!(
            target: "app::tracking",
            shift_id = %record.id,
            user_id = %record.user_id,
            hours = (end_time - start_time).num_minutes() as f64 / 60.0,
            "shift recorded"
        );

        Ok(record)
    }

    pub fn get_shift(&self, id: &str) -> AppResult<ShiftRecord> {
        self.db
            .with_connection(|conn| ShiftRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)
    }

    /// Shifts starting at or after `since`, oldest first.
    pub fn list_since(&self, user_id: &str, since: DateTime<Utc>) -> AppResult<Vec<ShiftRecord>> {
        let shifts = self
            .db
            .with_connection(|conn| ShiftRepository::list_for_user_since(conn, user_id, &since))?;
        debug!(target: "app::tracking", user_id, count = shifts.len(), "listed shifts");
        Ok(shifts)
    }

    pub fn delete_shift(&self, id: &str) -> AppResult<()> {
        self.db
            .with_connection(|conn| ShiftRepository::delete(conn, id))?;
        info!(target: "app::tracking", shift_id = id, "shift deleted");
        Ok(())
    }
}

pub(crate) fn normalize_user_id(user_id: &str) -> AppResult<String> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("user id must not be blank"));
    }
    Ok(trimmed.to_string())
}

/// Keeps the caller's offset so the shift's local hours survive storage.
fn parse_timestamp(field: &str, value: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|_| {
        AppError::validation_with_details(
            format!("{field} must be an RFC 3339 timestamp"),
            serde_json::json!({ "field": field, "value": value }),
        )
    })
}
