use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodLogRecord {
    pub id: String,
    pub user_id: String,
    pub mood_score: i32,
    pub energy_level: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub log_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodLogInput {
    pub user_id: String,
    pub mood_score: i32,
    pub energy_level: i32,
    #[serde(default)]
    pub notes: Option<String>,
    /// `YYYY-MM-DD`
    pub log_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepLogRecord {
    pub id: String,
    pub user_id: String,
    pub sleep_hours: f64,
    pub sleep_quality: i32,
    pub log_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepLogInput {
    pub user_id: String,
    pub sleep_hours: f64,
    pub sleep_quality: i32,
    /// `YYYY-MM-DD`
    pub log_date: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MoodLog {
    pub mood_score: i32,
    pub energy_level: i32,
    pub log_date: NaiveDate,
}

impl From<&MoodLogRecord> for MoodLog {
    fn from(record: &MoodLogRecord) -> Self {
        Self {
            mood_score: record.mood_score,
            energy_level: record.energy_level,
            log_date: record.log_date,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SleepLog {
    pub sleep_hours: f64,
    pub sleep_quality: i32,
    pub log_date: NaiveDate,
}

impl From<&SleepLogRecord> for SleepLog {
    fn from(record: &SleepLogRecord) -> Self {
        Self {
            sleep_hours: record.sleep_hours,
            sleep_quality: record.sleep_quality,
            log_date: record.log_date,
        }
    }
}
