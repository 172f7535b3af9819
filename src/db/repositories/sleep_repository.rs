use std::convert::TryFrom;

use chrono::NaiveDate;
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use super::{format_date, format_datetime, parse_date, parse_datetime};
use crate::error::{AppError, AppResult};
use crate::models::wellness_log::SleepLogRecord;

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, sleep_hours, sleep_quality, log_date, created_at FROM sleep_logs";

#[derive(Debug, Clone)]
pub struct SleepLogRow {
    pub id: String,
    pub user_id: String,
    pub sleep_hours: f64,
    pub sleep_quality: i32,
    pub log_date: String,
    pub created_at: String,
}

impl SleepLogRow {
    pub fn from_record(record: &SleepLogRecord) -> Self {
        Self {
            id: record.id.clone(),
            user_id: record.user_id.clone(),
            sleep_hours: record.sleep_hours,
            sleep_quality: record.sleep_quality,
            log_date: format_date(&record.log_date),
            created_at: format_datetime(&record.created_at),
        }
    }

    pub fn into_record(self) -> AppResult<SleepLogRecord> {
        Ok(SleepLogRecord {
            log_date: parse_date(&self.log_date)?,
            created_at: parse_datetime(&self.created_at)?,
            id: self.id,
            user_id: self.user_id,
            sleep_hours: self.sleep_hours,
            sleep_quality: self.sleep_quality,
        })
    }
}

impl TryFrom<&Row<'_>> for SleepLogRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            sleep_hours: row.get("sleep_hours")?,
            sleep_quality: row.get("sleep_quality")?,
            log_date: row.get("log_date")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct SleepRepository;

impl SleepRepository {
    pub fn upsert(conn: &Connection, record: &SleepLogRecord) -> AppResult<()> {
        let row = SleepLogRow::from_record(record);

        conn.execute(
            r#"
                INSERT INTO sleep_logs (
                    id,
                    user_id,
                    sleep_hours,
                    sleep_quality,
                    log_date,
                    created_at
                ) VALUES (
                    :id,
                    :user_id,
                    :sleep_hours,
                    :sleep_quality,
                    :log_date,
                    :created_at
                )
                ON CONFLICT(user_id, log_date) DO UPDATE SET
                    sleep_hours = excluded.sleep_hours,
                    sleep_quality = excluded.sleep_quality
            "#,
            named_params! {
                ":id": &row.id,
                ":user_id": &row.user_id,
                ":sleep_hours": row.sleep_hours,
                ":sleep_quality": row.sleep_quality,
                ":log_date": &row.log_date,
                ":created_at": &row.created_at,
            },
        )?;

        Ok(())
    }

    pub fn find_for_day(
        conn: &Connection,
        user_id: &str,
        log_date: &NaiveDate,
    ) -> AppResult<Option<SleepLogRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = :user_id AND log_date = :log_date"
        ))?;

        let row = stmt
            .query_row(
                named_params! {":user_id": user_id, ":log_date": format_date(log_date)},
                |row| SleepLogRow::try_from(row),
            )
            .optional()?;

        row.map(|row| row.into_record()).transpose()
    }

    pub fn list_for_user_since(
        conn: &Connection,
        user_id: &str,
        since: &NaiveDate,
    ) -> AppResult<Vec<SleepLogRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = :user_id AND log_date >= :since ORDER BY log_date ASC"
        ))?;

        let records = stmt
            .query_map(
                named_params! {":user_id": user_id, ":since": format_date(since)},
                |row| SleepLogRow::try_from(row),
            )?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(records)
    }
}
