use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Log a warning whenever an analysis lands in the high or critical band.
    pub burnout_alerts_enabled: bool,
    pub score_retention_days: i64,
    pub updated_at: String,
}
