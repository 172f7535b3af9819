use std::convert::TryFrom;

use chrono::NaiveDate;
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use super::{format_date, format_datetime, parse_date, parse_datetime};
use crate::error::{AppError, AppResult};
use crate::models::wellness_log::MoodLogRecord;

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, mood_score, energy_level, notes, log_date, created_at FROM mood_logs";

#[derive(Debug, Clone)]
pub struct MoodLogRow {
    pub id: String,
    pub user_id: String,
    pub mood_score: i32,
    pub energy_level: i32,
    pub notes: Option<String>,
    pub log_date: String,
    pub created_at: String,
}

impl MoodLogRow {
    pub fn from_record(record: &MoodLogRecord) -> Self {
        Self {
            id: record.id.clone(),
            user_id: record.user_id.clone(),
            mood_score: record.mood_score,
            energy_level: record.energy_level,
            notes: record.notes.clone(),
            log_date: format_date(&record.log_date),
            created_at: format_datetime(&record.created_at),
        }
    }

    pub fn into_record(self) -> AppResult<MoodLogRecord> {
        Ok(MoodLogRecord {
            log_date: parse_date(&self.log_date)?,
            created_at: parse_datetime(&self.created_at)?,
            id: self.id,
            user_id: self.user_id,
            mood_score: self.mood_score,
            energy_level: self.energy_level,
            notes: self.notes,
        })
    }
}

impl TryFrom<&Row<'_>> for MoodLogRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            mood_score: row.get("mood_score")?,
            energy_level: row.get("energy_level")?,
            notes: row.get("notes")?,
            log_date: row.get("log_date")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct MoodRepository;

impl MoodRepository {
    /// Inserts the log, or overwrites the scores of the user's existing entry
    /// for the same day. The stored row keeps its original id.
    pub fn upsert(conn: &Connection, record: &MoodLogRecord) -> AppResult<()> {
        let row = MoodLogRow::from_record(record);

        conn.execute(
            r#"
                INSERT INTO mood_logs (
                    id,
                    user_id,
                    mood_score,
                    energy_level,
                    notes,
                    log_date,
                    created_at
                ) VALUES (
                    :id,
                    :user_id,
                    :mood_score,
                    :energy_level,
                    :notes,
                    :log_date,
                    :created_at
                )
                ON CONFLICT(user_id, log_date) DO UPDATE SET
                    mood_score = excluded.mood_score,
                    energy_level = excluded.energy_level,
                    notes = excluded.notes
            "#,
            named_params! {
                ":id": &row.id,
                ":user_id": &row.user_id,
                ":mood_score": row.mood_score,
                ":energy_level": row.energy_level,
                ":notes": &row.notes,
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
    ) -> AppResult<Option<MoodLogRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = :user_id AND log_date = :log_date"
        ))?;

        let row = stmt
            .query_row(
                named_params! {":user_id": user_id, ":log_date": format_date(log_date)},
                |row| MoodLogRow::try_from(row),
            )
            .optional()?;

        row.map(|row| row.into_record()).transpose()
    }

    pub fn list_for_user_since(
        conn: &Connection,
        user_id: &str,
        since: &NaiveDate,
    ) -> AppResult<Vec<MoodLogRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE user_id = :user_id AND log_date >= :since ORDER BY log_date ASC"
        ))?;

        let records = stmt
            .query_map(
                named_params! {":user_id": user_id, ":since": format_date(since)},
                |row| MoodLogRow::try_from(row),
            )?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(records)
    }
}
