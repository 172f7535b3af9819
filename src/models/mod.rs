pub mod burnout;
pub mod settings;
pub mod shift;
pub mod task;
pub mod wellness_log;
