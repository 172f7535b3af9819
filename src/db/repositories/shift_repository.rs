use std::convert::TryFrom;

use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use super::{format_datetime, parse_datetime, with_offset};
use crate::error::{AppError, AppResult};
use crate::models::shift::ShiftRecord;

#[derive(Debug, Clone)]
pub struct ShiftRow {
    pub id: String,
    pub user_id: String,
    pub start_time: String,
    pub start_offset_seconds: i32,
    pub end_time: String,
    pub end_offset_seconds: i32,
    pub notes: Option<String>,
    pub created_at: String,
}

impl ShiftRow {
    pub fn from_record(record: &ShiftRecord) -> Self {
        Self {
            id: record.id.clone(),
            user_id: record.user_id.clone(),
            start_time: format_datetime(&record.start_time.with_timezone(&Utc)),
            start_offset_seconds: record.start_time.offset().local_minus_utc(),
            end_time: format_datetime(&record.end_time.with_timezone(&Utc)),
            end_offset_seconds: record.end_time.offset().local_minus_utc(),
            notes: record.notes.clone(),
            created_at: format_datetime(&record.created_at),
        }
    }

    pub fn into_record(self) -> AppResult<ShiftRecord> {
        Ok(ShiftRecord {
            start_time: with_offset(
                parse_datetime(&self.start_time)?,
                self.start_offset_seconds,
            )?,
            end_time: with_offset(
                parse_datetime(&self.end_time)?,
                self.end_offset_seconds,
            )?,
            created_at: parse_datetime(&self.created_at)?,
            id: self.id,
            user_id: self.user_id,
            notes: self.notes,
        })
    }
}

impl TryFrom<&Row<'_>> for ShiftRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            start_time: row.get("start_time")?,
            start_offset_seconds: row.get("start_offset_seconds")?,
            end_time: row.get("end_time")?,
            end_offset_seconds: row.get("end_offset_seconds")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

pub struct ShiftRepository;

impl ShiftRepository {
    pub fn insert(conn: &Connection, record: &ShiftRecord) -> AppResult<()> {
        let row = ShiftRow::from_record(record);

        conn.execute(
            r#"
                INSERT INTO shifts (
                    id,
                    user_id,
                    start_time,
                    start_offset_seconds,
                    end_time,
                    end_offset_seconds,
                    notes,
                    created_at
                ) VALUES (
                    :id,
                    :user_id,
                    :start_time,
                    :start_offset_seconds,
                    :end_time,
                    :end_offset_seconds,
                    :notes,
                    :created_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":user_id": &row.user_id,
                ":start_time": &row.start_time,
                ":start_offset_seconds": row.start_offset_seconds,
                ":end_time": &row.end_time,
                ":end_offset_seconds": row.end_offset_seconds,
                ":notes": &row.notes,
                ":created_at": &row.created_at,
            },
        )?;

        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<ShiftRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, user_id, start_time, start_offset_seconds, end_time, end_offset_seconds,
                       notes, created_at
                FROM shifts
                WHERE id = :id
            "#,
        )?;

        let row = stmt
            .query_row(named_params! {":id": id}, |row| ShiftRow::try_from(row))
            .optional()?;

        row.map(|row| row.into_record()).transpose()
    }

    /// Shifts for `user_id` starting at or after `since`, oldest first.
    pub fn list_for_user_since(
        conn: &Connection,
        user_id: &str,
        since: &DateTime<Utc>,
    ) -> AppResult<Vec<ShiftRecord>> {
        let mut stmt = conn.prepare(
            r#"
                SELECT id, user_id, start_time, start_offset_seconds, end_time, end_offset_seconds,
                       notes, created_at
                FROM shifts
                WHERE user_id = :user_id AND start_time >= :since
                ORDER BY start_time ASC
            "#,
        )?;

        let records = stmt
            .query_map(
                named_params! {":user_id": user_id, ":since": format_datetime(since)},
                |row| ShiftRow::try_from(row),
            )?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(records)
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM shifts WHERE id = :id", named_params! {":id": id})?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }
}
