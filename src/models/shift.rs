use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRecord {
    pub id: String,
    pub user_id: String,
    /// Wall-clock time as recorded, offset included.
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftCreateInput {
    pub user_id: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One scheduled work period as seen by the scorer. Hours and calendar days
/// are read in the offset the shift was recorded with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
}

impl Shift {
    pub fn new<Tz: TimeZone>(start_time: DateTime<Tz>, end_time: DateTime<Tz>) -> Self {
        Self {
            start_time: start_time.fixed_offset(),
            end_time: end_time.fixed_offset(),
        }
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_seconds() as f64 / 3600.0
    }
}

impl From<&ShiftRecord> for Shift {
    fn from(record: &ShiftRecord) -> Self {
        Shift::new(record.start_time, record.end_time)
    }
}
