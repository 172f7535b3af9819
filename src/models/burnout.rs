use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_BURNOUT_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BurnoutLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl BurnoutLevel {
    pub fn from_score(score: u32) -> Self {
        if score <= 25 {
            BurnoutLevel::Low
        } else if score <= 50 {
            BurnoutLevel::Moderate
        } else if score <= 75 {
            BurnoutLevel::High
        } else {
            BurnoutLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BurnoutLevel::Low => "low",
            BurnoutLevel::Moderate => "moderate",
            BurnoutLevel::High => "high",
            BurnoutLevel::Critical => "critical",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BurnoutLevel::Low => "You're maintaining excellent balance! Keep up the great work.",
            BurnoutLevel::Moderate => "Mild stress detected. Focus on self-care and rest this week.",
            BurnoutLevel::High => "High burnout risk! Take immediate action to reduce stress.",
            BurnoutLevel::Critical => {
                "CRITICAL: Burnout imminent. Consider taking time off immediately."
            }
        }
    }

    pub fn is_elevated(&self) -> bool {
        matches!(self, BurnoutLevel::High | BurnoutLevel::Critical)
    }
}

impl fmt::Display for BurnoutLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BurnoutLevel {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low" => Ok(BurnoutLevel::Low),
            "moderate" => Ok(BurnoutLevel::Moderate),
            "high" => Ok(BurnoutLevel::High),
            "critical" => Ok(BurnoutLevel::Critical),
            other => Err(format!("unsupported burnout level: {other}")),
        }
    }
}

/// The five weighted categories, in the order they appear in an analysis.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    WorkLoad,
    EmotionalHealth,
    SleepHealth,
    TaskLoad,
    RecoveryTime,
}

impl FactorCategory {
    pub const ALL: [FactorCategory; 5] = [
        FactorCategory::WorkLoad,
        FactorCategory::EmotionalHealth,
        FactorCategory::SleepHealth,
        FactorCategory::TaskLoad,
        FactorCategory::RecoveryTime,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FactorCategory::WorkLoad => "Work Load",
            FactorCategory::EmotionalHealth => "Emotional Health",
            FactorCategory::SleepHealth => "Sleep Health",
            FactorCategory::TaskLoad => "Task Load",
            FactorCategory::RecoveryTime => "Recovery Time",
        }
    }

    pub fn max_score(&self) -> u32 {
        match self {
            FactorCategory::WorkLoad => 25,
            FactorCategory::EmotionalHealth => 30,
            FactorCategory::SleepHealth => 25,
            FactorCategory::TaskLoad => 10,
            FactorCategory::RecoveryTime => 10,
        }
    }
}

impl fmt::Display for FactorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FactorImpact {
    Low,
    Medium,
    High,
    Critical,
}

impl FactorImpact {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactorImpact::Low => "low",
            FactorImpact::Medium => "medium",
            FactorImpact::High => "high",
            FactorImpact::Critical => "critical",
        }
    }
}

impl fmt::Display for FactorImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutFactor {
    pub category: FactorCategory,
    pub score: u32,
    pub max_score: u32,
    pub impact: FactorImpact,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    Immediate,
    High,
    Medium,
    Low,
}

impl RecommendationPriority {
    pub fn rank(&self) -> u8 {
        match self {
            RecommendationPriority::Immediate => 0,
            RecommendationPriority::High => 1,
            RecommendationPriority::Medium => 2,
            RecommendationPriority::Low => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationPriority::Immediate => "immediate",
            RecommendationPriority::High => "high",
            RecommendationPriority::Medium => "medium",
            RecommendationPriority::Low => "low",
        }
    }
}

impl fmt::Display for RecommendationPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: RecommendationPriority,
    pub title: String,
    pub action: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BurnoutTrend {
    Improving,
    Stable,
    Worsening,
}

impl BurnoutTrend {
    /// A swing of more than 10 points either way counts as a trend.
    pub fn from_scores(score: u32, previous_score: Option<f64>) -> Self {
        match previous_score {
            Some(previous) => {
                let diff = f64::from(score) - previous;
                if diff > 10.0 {
                    BurnoutTrend::Worsening
                } else if diff < -10.0 {
                    BurnoutTrend::Improving
                } else {
                    BurnoutTrend::Stable
                }
            }
            None => BurnoutTrend::Stable,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BurnoutTrend::Improving => "improving",
            BurnoutTrend::Stable => "stable",
            BurnoutTrend::Worsening => "worsening",
        }
    }
}

impl fmt::Display for BurnoutTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BurnoutTrend {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "improving" => Ok(BurnoutTrend::Improving),
            "stable" => Ok(BurnoutTrend::Stable),
            "worsening" => Ok(BurnoutTrend::Worsening),
            other => Err(format!("unsupported burnout trend: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutAnalysis {
    pub level: BurnoutLevel,
    pub score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub message: String,
    pub factors: Vec<BurnoutFactor>,
    pub recommendations: Vec<Recommendation>,
    pub trend: BurnoutTrend,
    pub early_warnings: Vec<String>,
}

impl BurnoutAnalysis {
    pub fn factor(&self, category: FactorCategory) -> Option<&BurnoutFactor> {
        self.factors.iter().find(|factor| factor.category == category)
    }
}

/// A persisted analysis snapshot for one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BurnoutScoreRecord {
    pub id: String,
    pub user_id: String,
    pub score: u32,
    pub level: BurnoutLevel,
    pub percentage: f64,
    pub trend: BurnoutTrend,
    pub factors: Vec<BurnoutFactor>,
    pub recommendations: Vec<Recommendation>,
    pub early_warnings: Vec<String>,
    pub calculated_at: DateTime<Utc>,
}

impl BurnoutScoreRecord {
    pub fn from_analysis(
        user_id: impl Into<String>,
        analysis: &BurnoutAnalysis,
        calculated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            score: analysis.score,
            level: analysis.level,
            percentage: analysis.percentage,
            trend: analysis.trend,
            factors: analysis.factors.clone(),
            recommendations: analysis.recommendations.clone(),
            early_warnings: analysis.early_warnings.clone(),
            calculated_at,
        }
    }
}
