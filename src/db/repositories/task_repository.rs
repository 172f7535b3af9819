use std::convert::TryFrom;

use rusqlite::{named_params, Connection, OptionalExtension, Row};

use super::{format_date, format_datetime, parse_date, parse_datetime};
use crate::error::{AppError, AppResult};
use crate::models::task::TaskRecord;

const BASE_SELECT: &str = r#"
    SELECT
        id,
        user_id,
        title,
        completed,
        due_date,
        created_at,
        updated_at
    FROM tasks
"#;

#[derive(Debug, Clone)]
pub struct TaskRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub completed: bool,
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskRow {
    pub fn from_record(record: &TaskRecord) -> Self {
        Self {
            id: record.id.clone(),
            user_id: record.user_id.clone(),
            title: record.title.clone(),
            completed: record.completed,
            due_date: record.due_date.as_ref().map(format_date),
            created_at: format_datetime(&record.created_at),
            updated_at: format_datetime(&record.updated_at),
        }
    }

    pub fn into_record(self) -> AppResult<TaskRecord> {
        Ok(TaskRecord {
            due_date: self.due_date.as_deref().map(parse_date).transpose()?,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            completed: self.completed,
        })
    }
}

impl TryFrom<&Row<'_>> for TaskRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            completed: row.get("completed")?,
            due_date: row.get("due_date")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

pub struct TaskRepository;

impl TaskRepository {
    pub fn insert(conn: &Connection, record: &TaskRecord) -> AppResult<()> {
        let row = TaskRow::from_record(record);

        conn.execute(
            r#"
                INSERT INTO tasks (
                    id,
                    user_id,
                    title,
                    completed,
                    due_date,
                    created_at,
                    updated_at
                ) VALUES (
                    :id,
                    :user_id,
                    :title,
                    :completed,
                    :due_date,
                    :created_at,
                    :updated_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":user_id": &row.user_id,
                ":title": &row.title,
                ":completed": row.completed,
                ":due_date": &row.due_date,
                ":created_at": &row.created_at,
                ":updated_at": &row.updated_at,
            },
        )?;

        Ok(())
    }

    pub fn update(conn: &Connection, record: &TaskRecord) -> AppResult<()> {
        let row = TaskRow::from_record(record);

        let affected = conn.execute(
            r#"
                UPDATE tasks SET
                    title = :title,
                    completed = :completed,
                    due_date = :due_date,
                    updated_at = :updated_at
                WHERE id = :id
            "#,
            named_params! {
                ":id": &row.id,
                ":title": &row.title,
                ":completed": row.completed,
                ":due_date": &row.due_date,
                ":updated_at": &row.updated_at,
            },
        )?;

        if affected == 0 {
            return Err(AppError::not_found());
        }

        Ok(())
    }

    pub fn delete(conn: &Connection, id: &str) -> AppResult<()> {
        let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(AppError::not_found());
        }
        Ok(())
    }

    pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<TaskRecord>> {
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", BASE_SELECT))?;
        let row = stmt
            .query_row([id], |row| TaskRow::try_from(row))
            .optional()?;
        row.map(|row| row.into_record()).transpose()
    }

    pub fn list_for_user(conn: &Connection, user_id: &str) -> AppResult<Vec<TaskRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{} WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
            BASE_SELECT
        ))?;
        let records = stmt
            .query_map([user_id], |row| TaskRow::try_from(row))?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(records)
    }
}
