#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Interview role. A closed set of tracks plus an explicit `Custom` variant
/// carrying the free-text label. An unrecognized role string deserializes
/// to `Custom`, never silently to a default track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Frontend,
    Backend,
    Fullstack,
    DataScience,
    Devops,
    Mobile,
    #[serde(untagged)]
    Custom(String),
}

impl Role {
    pub fn label(&self) -> &str {
        match self {
            Role::Frontend => "Frontend Engineer",
            Role::Backend => "Backend Engineer",
            Role::Fullstack => "Fullstack Engineer",
            Role::DataScience => "Data Scientist",
            Role::Devops => "DevOps Engineer",
            Role::Mobile => "Mobile Engineer",
            Role::Custom(label) => label,
        }
    }
}

/// Difficulty of the interview session, fixed at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Junior,
    Mid,
    Senior,
}

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Junior => "junior",
            Difficulty::Mid => "mid-level",
            Difficulty::Senior => "senior",
        }
    }
}

/// A single interview question. Immutable once issued to the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub text: String,
    /// Concepts a good answer is expected to reference. Order matters for
    /// reporting; duplicates are removed at construction.
    pub expected_concepts: Vec<String>,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn new(text: impl Into<String>, concepts: &[&str], difficulty: Difficulty) -> Self {
        let mut expected_concepts: Vec<String> = Vec::new();
        for c in concepts {
            let c = c.trim();
            if !c.is_empty() && !expected_concepts.iter().any(|e| e.eq_ignore_ascii_case(c)) {
                expected_concepts.push(c.to_string());
            }
        }
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            expected_concepts,
            difficulty,
        }
    }
}

/// The user's answer to one question. One per question, never mutated;
/// resubmitting before advancing replaces the whole value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: Uuid,
    pub raw_text: String,
    pub cleaned_text: String,
    pub submitted_at: DateTime<Utc>,
}

/// Coarse correctness bucket, a pure function of the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectnessTier {
    Correct,
    Partial,
    Incorrect,
}

impl CorrectnessTier {
    /// ≥80 correct, 50–79 partial, else incorrect.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => CorrectnessTier::Correct,
            s if s >= 50 => CorrectnessTier::Partial,
            _ => CorrectnessTier::Incorrect,
        }
    }
}

/// The five weighted sub-scores behind a question's total. Kept on the
/// analysis so downstream derivations (skill vector) stay deterministic.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// 0–40 (flat 30 when the question lists no expected concepts).
    pub concepts: f64,
    /// 0–20, from word count.
    pub depth: f64,
    /// 0 or 15, exemplar-phrase bonus.
    pub examples: f64,
    /// 0 or 10, enumeration-marker bonus.
    pub structure: f64,
    /// 0 or 15, role-vocabulary bonus.
    pub vocabulary: f64,
}

impl ScoreBreakdown {
    /// Total capped at 100.
    pub fn total(&self) -> u32 {
        let sum = self.concepts + self.depth + self.examples + self.structure + self.vocabulary;
        (sum.round() as u32).min(100)
    }
}

/// Scorer output for one answered question. Derived, immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnalysis {
    pub question_id: Uuid,
    pub score: u32,
    pub tier: CorrectnessTier,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_concepts: Vec<String>,
    pub rationale: String,
    pub breakdown: ScoreBreakdown,
    pub word_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub correct: usize,
    pub partial: usize,
    pub incorrect: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.correct + self.partial + self.incorrect
    }
}

/// Coarse classification derived from overall score and answer depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnowledgeLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Aggregated report for one completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub overall_score: u32,
    pub tier_counts: TierCounts,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_concepts: Vec<String>,
    pub suggestions: Vec<String>,
    pub knowledge_level: KnowledgeLevel,
    pub per_question: Vec<QuestionAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries_exact() {
        assert_eq!(CorrectnessTier::from_score(80), CorrectnessTier::Correct);
        assert_eq!(CorrectnessTier::from_score(79), CorrectnessTier::Partial);
        assert_eq!(CorrectnessTier::from_score(50), CorrectnessTier::Partial);
        assert_eq!(CorrectnessTier::from_score(49), CorrectnessTier::Incorrect);
        assert_eq!(CorrectnessTier::from_score(0), CorrectnessTier::Incorrect);
        assert_eq!(CorrectnessTier::from_score(100), CorrectnessTier::Correct);
    }

    #[test]
    fn test_role_known_string_round_trips() {
        let role: Role = serde_json::from_str(r#""backend""#).unwrap();
        assert_eq!(role, Role::Backend);
        assert_eq!(serde_json::to_string(&role).unwrap(), r#""backend""#);
    }

    #[test]
    fn test_role_unknown_string_becomes_custom() {
        let role: Role = serde_json::from_str(r#""Embedded Wizard""#).unwrap();
        assert_eq!(role, Role::Custom("Embedded Wizard".to_string()));
        assert_eq!(role.label(), "Embedded Wizard");
    }

    #[test]
    fn test_question_dedupes_concepts_case_insensitively() {
        let q = Question::new(
            "What is caching?",
            &["cache", "Cache", "eviction", ""],
            Difficulty::Mid,
        );
        assert_eq!(q.expected_concepts, vec!["cache", "eviction"]);
    }

    #[test]
    fn test_breakdown_total_caps_at_100() {
        let b = ScoreBreakdown {
            concepts: 40.0,
            depth: 20.0,
            examples: 15.0,
            structure: 10.0,
            vocabulary: 15.0,
        };
        assert_eq!(b.total(), 100);
        let over = ScoreBreakdown {
            concepts: 41.0,
            ..b
        };
        assert_eq!(over.total(), 100);
    }
}
