use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::interview::{Difficulty, KnowledgeLevel, Role, TierCounts};

/// Per-skill scores (0–100) derived deterministically from the session's
/// sub-score breakdowns. No random jitter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillVector {
    pub technical: u32,
    pub communication: u32,
    pub problem_solving: u32,
    pub experience: u32,
    pub culture: u32,
}

/// Condensed session outcome stored alongside the headline score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub questions_count: usize,
    pub answered_count: usize,
    pub duration_ms: i64,
    pub knowledge_level: KnowledgeLevel,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub stats: TierCounts,
}

/// One persisted, completed session. Owned by the history store; capped at
/// 50 records overall, newest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub role: Role,
    pub difficulty: Difficulty,
    pub score: u32,
    pub skills: SkillVector,
    pub summary: SessionSummary,
}
