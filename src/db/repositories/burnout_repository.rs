use std::convert::TryFrom;

use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection, OptionalExtension, Row};

use super::{deserialize_json, format_datetime, parse_datetime, serialize_json};
use crate::error::{AppError, AppResult};
use crate::models::burnout::{BurnoutLevel, BurnoutScoreRecord, BurnoutTrend};

const BASE_SELECT: &str = r#"
    SELECT
        id,
        user_id,
        score,
        level,
        percentage,
        trend,
        factors,
        recommendations,
        early_warnings,
        calculated_at
    FROM burnout_scores
"#;

#[derive(Debug, Clone)]
pub struct BurnoutScoreRow {
    pub id: String,
    pub user_id: String,
    pub score: u32,
    pub level: String,
    pub percentage: f64,
    pub trend: String,
    pub factors: String,
    pub recommendations: String,
    pub early_warnings: String,
    pub calculated_at: String,
}

impl BurnoutScoreRow {
    pub fn from_record(record: &BurnoutScoreRecord) -> AppResult<Self> {
        Ok(Self {
            id: record.id.clone(),
            user_id: record.user_id.clone(),
            score: record.score,
            level: record.level.as_str().to_string(),
            percentage: record.percentage,
            trend: record.trend.as_str().to_string(),
            factors: serialize_json(&record.factors)?,
            recommendations: serialize_json(&record.recommendations)?,
            early_warnings: serialize_json(&record.early_warnings)?,
            calculated_at: format_datetime(&record.calculated_at),
        })
    }

    pub fn into_record(self) -> AppResult<BurnoutScoreRecord> {
        Ok(BurnoutScoreRecord {
            level: BurnoutLevel::try_from(self.level.as_str()).map_err(AppError::validation)?,
            trend: BurnoutTrend::try_from(self.trend.as_str()).map_err(AppError::validation)?,
            factors: deserialize_json(&self.factors)?,
            recommendations: deserialize_json(&self.recommendations)?,
            early_warnings: deserialize_json(&self.early_warnings)?,
            calculated_at: parse_datetime(&self.calculated_at)?,
            id: self.id,
            user_id: self.user_id,
            score: self.score,
            percentage: self.percentage,
        })
    }
}

impl TryFrom<&Row<'_>> for BurnoutScoreRow {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            score: row.get("score")?,
            level: row.get("level")?,
            percentage: row.get("percentage")?,
            trend: row.get("trend")?,
            factors: row.get("factors")?,
            recommendations: row.get("recommendations")?,
            early_warnings: row.get("early_warnings")?,
            calculated_at: row.get("calculated_at")?,
        })
    }
}

pub struct BurnoutRepository;

impl BurnoutRepository {
    pub fn insert(conn: &Connection, record: &BurnoutScoreRecord) -> AppResult<()> {
        let row = BurnoutScoreRow::from_record(record)?;

        conn.execute(
            r#"
                INSERT INTO burnout_scores (
                    id,
                    user_id,
                    score,
                    level,
                    percentage,
                    trend,
                    factors,
                    recommendations,
                    early_warnings,
                    calculated_at
                ) VALUES (
                    :id,
                    :user_id,
                    :score,
                    :level,
                    :percentage,
                    :trend,
                    :factors,
                    :recommendations,
                    :early_warnings,
                    :calculated_at
                )
            "#,
            named_params! {
                ":id": &row.id,
                ":user_id": &row.user_id,
                ":score": row.score,
                ":level": &row.level,
                ":percentage": row.percentage,
                ":trend": &row.trend,
                ":factors": &row.factors,
                ":recommendations": &row.recommendations,
                ":early_warnings": &row.early_warnings,
                ":calculated_at": &row.calculated_at,
            },
        )?;

        Ok(())
    }

    pub fn latest_for_user(
        conn: &Connection,
        user_id: &str,
    ) -> AppResult<Option<BurnoutScoreRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{BASE_SELECT} WHERE user_id = :user_id ORDER BY calculated_at DESC, rowid DESC LIMIT 1"
        ))?;

        let row = stmt
            .query_row(named_params! {":user_id": user_id}, |row| {
                BurnoutScoreRow::try_from(row)
            })
            .optional()?;

        row.map(|row| row.into_record()).transpose()
    }

    /// Most recent first.
    pub fn list_for_user(
        conn: &Connection,
        user_id: &str,
        limit: usize,
    ) -> AppResult<Vec<BurnoutScoreRecord>> {
        let mut stmt = conn.prepare(&format!(
            "{BASE_SELECT} WHERE user_id = :user_id ORDER BY calculated_at DESC, rowid DESC LIMIT :limit"
        ))?;

        let records = stmt
            .query_map(
                named_params! {":user_id": user_id, ":limit": limit as i64},
                |row| BurnoutScoreRow::try_from(row),
            )?
            .map(|row| {
                row.map_err(AppError::from)
                    .and_then(|row| row.into_record())
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(records)
    }

    pub fn delete_before(
        conn: &Connection,
        user_id: &str,
        cutoff: &DateTime<Utc>,
    ) -> AppResult<usize> {
        let deleted = conn.execute(
            r#"
                DELETE FROM burnout_scores
                WHERE user_id = :user_id AND calculated_at < :cutoff
            "#,
            named_params! {
                ":user_id": user_id,
                ":cutoff": format_datetime(cutoff),
            },
        )?;

        Ok(deleted)
    }
}
