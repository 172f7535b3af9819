//! Shift tracking, daily wellness check-ins and burnout-risk scoring for
//! healthcare shift workers.

pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use error::{AppError, AppResult};
pub use services::burnout_scorer::compute_burnout_analysis;
pub use state::AppState;
