//! Rolling statistics and chart series over the stored history.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::history::{HistoryRecord, SkillVector};

/// Trend needs two full windows of this size.
const TREND_WINDOW: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryStats {
    pub sessions: usize,
    pub average_score: u32,
    pub best_score: u32,
    /// Percent change of the last 5 scores vs the 5 before them. 0 with
    /// fewer than 10 records or a zero previous average.
    pub recent_trend: i32,
}

/// Chart-ready series, newest first, plus per-skill averages.
#[derive(Debug, Clone, Serialize)]
pub struct ChartSeries {
    pub dates: Vec<DateTime<Utc>>,
    pub scores: Vec<u32>,
    pub skill_averages: SkillVector,
}

pub fn compute_stats(records: &[HistoryRecord]) -> HistoryStats {
    let sessions = records.len();
    let average_score = if sessions == 0 {
        0
    } else {
        let sum: u32 = records.iter().map(|r| r.score).sum();
        ((sum as f64) / (sessions as f64)).round() as u32
    };
    let best_score = records.iter().map(|r| r.score).max().unwrap_or(0);
    let scores: Vec<u32> = records.iter().map(|r| r.score).collect();

    HistoryStats {
        sessions,
        average_score,
        best_score,
        recent_trend: recent_trend(&scores),
    }
}

/// `round(((avg(first 5) - avg(next 5)) / avg(next 5)) × 100)` over
/// newest-first scores. Falls back to 0 with fewer than 10 scores, and to
/// 0 when the previous-window average is zero rather than dividing by it.
pub fn recent_trend(scores_newest_first: &[u32]) -> i32 {
    if scores_newest_first.len() < 2 * TREND_WINDOW {
        return 0;
    }
    let avg = |window: &[u32]| -> f64 {
        window.iter().map(|s| *s as f64).sum::<f64>() / window.len() as f64
    };
    let recent = avg(&scores_newest_first[..TREND_WINDOW]);
    let previous = avg(&scores_newest_first[TREND_WINDOW..2 * TREND_WINDOW]);
    if previous == 0.0 {
        return 0;
    }
    (((recent - previous) / previous) * 100.0).round() as i32
}

pub fn chart_series(records: &[HistoryRecord]) -> ChartSeries {
    let dates = records.iter().map(|r| r.date).collect();
    let scores = records.iter().map(|r| r.score).collect();

    let skill_averages = if records.is_empty() {
        SkillVector::default()
    } else {
        let n = records.len() as f64;
        let avg = |f: fn(&SkillVector) -> u32| -> u32 {
            (records.iter().map(|r| f(&r.skills) as f64).sum::<f64>() / n).round() as u32
        };
        SkillVector {
            technical: avg(|s| s.technical),
            communication: avg(|s| s.communication),
            problem_solving: avg(|s| s.problem_solving),
            experience: avg(|s| s.experience),
            culture: avg(|s| s.culture),
        }
    };

    ChartSeries {
        dates,
        scores,
        skill_averages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::history::SessionSummary;
    use crate::models::interview::{Difficulty, KnowledgeLevel, Role, TierCounts};
    use uuid::Uuid;

    fn record(score: u32) -> HistoryRecord {
        HistoryRecord {
            id: Uuid::new_v4(),
            date: Utc::now(),
            role: Role::Frontend,
            difficulty: Difficulty::Junior,
            score,
            skills: SkillVector {
                technical: score,
                communication: 50,
                problem_solving: 50,
                experience: 50,
                culture: 50,
            },
            summary: SessionSummary {
                questions_count: 3,
                answered_count: 3,
                duration_ms: 1,
                knowledge_level: KnowledgeLevel::Beginner,
                strengths: Vec::new(),
                weaknesses: Vec::new(),
                stats: TierCounts::default(),
            },
        }
    }

    #[test]
    fn test_trend_formula_on_ten_scores() {
        // Newest five average 80, previous five average 60:
        // (80 - 60) / 60 × 100 = 33.33 → 33.
        let scores = [80, 80, 80, 80, 80, 60, 60, 60, 60, 60];
        assert_eq!(recent_trend(&scores), 33);
    }

    #[test]
    fn test_trend_negative_when_scores_drop() {
        let scores = [40, 40, 40, 40, 40, 80, 80, 80, 80, 80];
        assert_eq!(recent_trend(&scores), -50);
    }

    #[test]
    fn test_trend_zero_with_fewer_than_ten() {
        assert_eq!(recent_trend(&[90, 10, 90, 10, 90, 10, 90, 10, 90]), 0);
        assert_eq!(recent_trend(&[]), 0);
    }

    #[test]
    fn test_trend_zero_when_previous_average_is_zero() {
        let scores = [50, 50, 50, 50, 50, 0, 0, 0, 0, 0];
        assert_eq!(recent_trend(&scores), 0);
    }

    #[test]
    fn test_stats_average_and_best() {
        let records = vec![record(70), record(90), record(50)];
        let stats = compute_stats(&records);
        assert_eq!(stats.sessions, 3);
        assert_eq!(stats.average_score, 70);
        assert_eq!(stats.best_score, 90);
        assert_eq!(stats.recent_trend, 0);
    }

    #[test]
    fn test_stats_on_empty_history() {
        let stats = compute_stats(&[]);
        assert_eq!(stats.sessions, 0);
        assert_eq!(stats.average_score, 0);
        assert_eq!(stats.best_score, 0);
    }

    #[test]
    fn test_chart_series_aligns_with_records() {
        let records = vec![record(70), record(90)];
        let series = chart_series(&records);
        assert_eq!(series.scores, vec![70, 90]);
        assert_eq!(series.dates.len(), 2);
        assert_eq!(series.skill_averages.technical, 80);
        assert_eq!(series.skill_averages.communication, 50);
    }
}
