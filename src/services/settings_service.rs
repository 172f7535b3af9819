use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{SecondsFormat, Utc};
use tracing::{info, warn};

use crate::db::repositories::settings_repository::{AppSettingRow, SettingsRepository};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::AppSettings;

const KEY_BURNOUT_ALERTS: &str = "burnout_alerts_enabled";
const KEY_SCORE_RETENTION: &str = "score_retention_days";

pub const DEFAULT_BURNOUT_ALERTS_ENABLED: bool = true;
pub const DEFAULT_SCORE_RETENTION_DAYS: i64 = 90;
pub const MIN_SCORE_RETENTION_DAYS: i64 = 7;
pub const MAX_SCORE_RETENTION_DAYS: i64 = 3650;

#[derive(Debug, Default, Clone)]
pub struct SettingsUpdateInput {
    pub burnout_alerts_enabled: Option<bool>,
    pub score_retention_days: Option<i64>,
}

pub struct SettingsService {
    db: DbPool,
    cache: RwLock<Option<AppSettings>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<AppSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.load_settings_from_db()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    pub fn update(&self, input: SettingsUpdateInput) -> AppResult<AppSettings> {
        let mut current = self.get()?;

        if let Some(days) = input.score_retention_days {
            ensure_valid_retention(days)?;
            current.score_retention_days = days;
        }

        if let Some(enabled) = input.burnout_alerts_enabled {
            current.burnout_alerts_enabled = enabled;
        }

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.db.with_transaction(|conn| {
            if let Some(enabled) = input.burnout_alerts_enabled {
                SettingsRepository::upsert(conn, KEY_BURNOUT_ALERTS, &enabled.to_string(), &now)?;
            }
            if let Some(days) = input.score_retention_days {
                SettingsRepository::upsert(conn, KEY_SCORE_RETENTION, &days.to_string(), &now)?;
            }
            Ok(())
        })?;
        current.updated_at = now;

        info!(
            target: "app::settings",
            alerts = current.burnout_alerts_enabled,
            retention_days = current.score_retention_days,
            "settings updated"
        );

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(current.clone());
        }

        Ok(current)
    }

    /// Drops stored overrides so every value returns to its default.
    pub fn reset(&self) -> AppResult<AppSettings> {
        self.db.with_connection(|conn| {
            SettingsRepository::delete(conn, KEY_BURNOUT_ALERTS)?;
            SettingsRepository::delete(conn, KEY_SCORE_RETENTION)?;
            Ok(())
        })?;

        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
        }
        info!(target: "app::settings", "settings reset to defaults");
        self.get()
    }

    fn load_settings_from_db(&self) -> AppResult<AppSettings> {
        self.db.with_connection(|conn| {
            let rows = SettingsRepository::list(conn)?;
            let mut map: HashMap<String, AppSettingRow> = HashMap::new();
            let mut latest_updated_at: Option<String> = None;

            for row in rows {
                latest_updated_at = match latest_updated_at {
                    Some(ref current) if current >= &row.updated_at => Some(current.clone()),
                    _ => Some(row.updated_at.clone()),
                };
                map.insert(row.key.clone(), row);
            }

            let burnout_alerts_enabled = match map.get(KEY_BURNOUT_ALERTS) {
                Some(row) => row.value.parse::<bool>().unwrap_or_else(|_| {
                    warn!(
                        target: "app::settings",
                        value = %row.value,
                        "stored alert flag invalid, falling back to default"
                    );
                    DEFAULT_BURNOUT_ALERTS_ENABLED
                }),
                None => DEFAULT_BURNOUT_ALERTS_ENABLED,
            };

            let score_retention_days = match map.get(KEY_SCORE_RETENTION) {
                Some(row) => row
                    .value
                    .parse::<i64>()
                    .ok()
                    .filter(|days| {
                        (MIN_SCORE_RETENTION_DAYS..=MAX_SCORE_RETENTION_DAYS).contains(days)
                    })
                    .unwrap_or_else(|| {
                        warn!(
                            target: "app::settings",
                            value = %row.value,
                            "stored retention invalid, falling back to default"
                        );
                        DEFAULT_SCORE_RETENTION_DAYS
                    }),
                None => DEFAULT_SCORE_RETENTION_DAYS,
            };

            let updated_at = latest_updated_at
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

            Ok(AppSettings {
                burnout_alerts_enabled,
                score_retention_days,
                updated_at,
            })
        })
    }
}

fn ensure_valid_retention(days: i64) -> AppResult<()> {
    if !(MIN_SCORE_RETENTION_DAYS..=MAX_SCORE_RETENTION_DAYS).contains(&days) {
        return Err(AppError::validation_with_details(
            format!(
                "score retention must be between {MIN_SCORE_RETENTION_DAYS} and {MAX_SCORE_RETENTION_DAYS} days"
            ),
            serde_json::json!({ "field": "scoreRetentionDays", "value": days }),
        ));
    }
    Ok(())
}
