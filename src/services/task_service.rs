use chrono::{NaiveDate, SubsecRound, Utc};
use tracing::info;
use uuid::Uuid;

use crate::db::repositories::task_repository::TaskRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::task::{TaskCreateInput, TaskRecord, TaskUpdateInput};
use crate::services::shift_service::normalize_user_id;
use crate::services::wellness_log_service::parse_log_date;

const MAX_TITLE_LENGTH: usize = 200;

pub struct TaskService {
    db: DbPool,
}

impl TaskService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub fn create_task(&self, input: TaskCreateInput) -> AppResult<TaskRecord> {
        let user_id = normalize_user_id(&input.user_id)?;
        let title = normalize_title(&input.title)?;
        let due_date = parse_due_date(input.due_date.as_deref())?;
        let now = Utc::now().trunc_subsecs(0);

        let record = TaskRecord {
            id: Uuid::new_v4().to_string(),
            user_id,
            title,
            completed: input.completed.unwrap_or(false),
            due_date,
            created_at: now,
            updated_at: now,
        };

        self.db
            .with_connection(|conn| TaskRepository::insert(conn, &record))?;

        info!(
            target: "app::tracking",
            task_id = %record.id,
            user_id = %record.user_id,
            due_date = ?record.due_date,
            "task created"
        );

        Ok(record)
    }

    pub fn get_task(&self, id: &str) -> AppResult<TaskRecord> {
        self.db
            .with_connection(|conn| TaskRepository::find_by_id(conn, id))?
            .ok_or_else(AppError::not_found)
    }

    /// Applies only the fields present in `input`. `due_date: Some(None)`
    /// clears the due date.
    pub fn update_task(&self, id: &str, input: TaskUpdateInput) -> AppResult<TaskRecord> {
        self.db.with_transaction(|conn| {
            let mut record = TaskRepository::find_by_id(conn, id)?.ok_or_else(AppError::not_found)?;

            if let Some(title) = input.title.as_deref() {
                record.title = normalize_title(title)?;
            }
            if let Some(completed) = input.completed {
                record.completed = completed;
            }
            if let Some(due_date) = input.due_date.as_ref() {
                record.due_date = parse_due_date(due_date.as_deref())?;
            }
            record.updated_at = Utc::now().trunc_subsecs(0);

            TaskRepository::update(conn, &record)?;
            info!(target: "app::tracking", task_id = %record.id, "task updated");
            Ok(record)
        })
    }

    pub fn complete_task(&self, id: &str) -> AppResult<TaskRecord> {
        self.update_task(
            id,
            TaskUpdateInput {
                completed: Some(true),
                ..TaskUpdateInput::default()
            },
        )
    }

    pub fn delete_task(&self, id: &str) -> AppResult<()> {
        self.db
            .with_connection(|conn| TaskRepository::delete(conn, id))?;
        info!(target: "app::tracking", task_id = id, "task deleted");
        Ok(())
    }

    pub fn list_for_user(&self, user_id: &str) -> AppResult<Vec<TaskRecord>> {
        self.db
            .with_connection(|conn| TaskRepository::list_for_user(conn, user_id))
    }
}

fn normalize_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation("task title must not be blank"));
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::validation_with_details(
            "task title is too long",
            serde_json::json!({ "maxLength": MAX_TITLE_LENGTH }),
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_due_date(value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_log_date(raw).map(Some),
    }
}
