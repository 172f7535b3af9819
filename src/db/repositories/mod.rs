pub mod burnout_repository;
pub mod mood_repository;
pub mod settings_repository;
pub mod shift_repository;
pub mod sleep_repository;
pub mod task_repository;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};

use crate::error::{AppError, AppResult};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamps are stored as second-precision UTC RFC 3339 so that string
/// ordering in SQL matches chronological ordering.
pub(crate) fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn parse_datetime(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::validation(format!("invalid timestamp: {value}")))
}

/// Re-attaches an offset stored in seconds east of UTC.
pub(crate) fn with_offset(
    value: DateTime<Utc>,
    offset_seconds: i32,
) -> AppResult<DateTime<FixedOffset>> {
    FixedOffset::east_opt(offset_seconds)
        .map(|offset| value.with_timezone(&offset))
        .ok_or_else(|| AppError::validation(format!("invalid utc offset: {offset_seconds}")))
}

pub(crate) fn format_date(value: &NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| AppError::validation(format!("invalid date: {value}")))
}

pub(crate) fn serialize_json<T: serde::Serialize>(value: &T) -> AppResult<String> {
    serde_json::to_string(value).map_err(AppError::from)
}

pub(crate) fn deserialize_json<T: serde::de::DeserializeOwned>(raw: &str) -> AppResult<T> {
    serde_json::from_str(raw).map_err(AppError::from)
}
