pub mod burnout_scorer;
pub mod burnout_service;
pub mod settings_service;
pub mod shift_service;
pub mod task_service;
pub mod wellness_log_service;
