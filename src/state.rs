use std::path::Path;
use std::sync::Arc;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::services::burnout_service::BurnoutService;
use crate::services::settings_service::SettingsService;
use crate::services::shift_service::ShiftService;
use crate::services::task_service::TaskService;
use crate::services::wellness_log_service::WellnessLogService;

/// Every service, wired around one database.
#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    shift_service: Arc<ShiftService>,
    wellness_log_service: Arc<WellnessLogService>,
    task_service: Arc<TaskService>,
    settings_service: Arc<SettingsService>,
    burnout_service: Arc<BurnoutService>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> Self {
        let shift_service = Arc::new(ShiftService::new(db_pool.clone()));
        let wellness_log_service = Arc::new(WellnessLogService::new(db_pool.clone()));
        let task_service = Arc::new(TaskService::new(db_pool.clone()));
        let settings_service = Arc::new(SettingsService::new(db_pool.clone()));
        let burnout_service = Arc::new(BurnoutService::new(
            db_pool.clone(),
            Arc::clone(&settings_service),
        ));

        Self {
            db_pool,
            shift_service,
            wellness_log_service,
            task_service,
            settings_service,
            burnout_service,
        }
    }

    /// Opens (or creates) the database at `path` and builds the state on it.
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let pool = DbPool::new(path.as_ref())?;
        Ok(Self::new(pool))
    }

    pub fn shifts(&self) -> Arc<ShiftService> {
        Arc::clone(&self.shift_service)
    }

    pub fn wellness_logs(&self) -> Arc<WellnessLogService> {
        Arc::clone(&self.wellness_log_service)
    }

    pub fn tasks(&self) -> Arc<TaskService> {
        Arc::clone(&self.task_service)
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings_service)
    }

    pub fn burnout(&self) -> Arc<BurnoutService> {
        Arc::clone(&self.burnout_service)
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }
}
