//! Session Controller: the explicit interview state machine.
//!
//! `Setup → Active { current } → Evaluating → Done`. Every transition is a
//! guarded method returning `Result`; illegal moves come back as
//! `AppError::Conflict` instead of mutating ad hoc flags. No state is
//! skippable, and a new session simply replaces the slot, discarding any
//! in-flight one.

use std::panic::{catch_unwind, AssertUnwindSafe};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::report::aggregate;
use crate::interview::scoring::score_answer;
use crate::models::history::{HistoryRecord, SessionSummary, SkillVector};
use crate::models::interview::{
    Answer, CorrectnessTier, Difficulty, Question, QuestionAnalysis, Role, ScoreBreakdown,
    SessionReport,
};
use crate::transcript;

/// Sessions hold between 1 and this many questions.
pub const MAX_QUESTIONS: usize = 10;

/// Placeholder score recorded when evaluation itself fails. Mid-Partial,
/// so a degraded session neither flatters nor punishes.
const FALLBACK_SCORE: u32 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum SessionState {
    Setup,
    Active { current: usize },
    Evaluating,
    Done,
}

/// One complete interview attempt, owned by the controller and passed to
/// collaborators by reference, never re-read from shared storage.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub role: Role,
    pub difficulty: Difficulty,
    pub started_at: DateTime<Utc>,
    pub state: SessionState,
    pub questions: Vec<Question>,
    answers: Vec<Option<Answer>>,
    report: Option<SessionReport>,
}

impl Session {
    /// Creates a session in `Setup`. Question count is validated by the
    /// caller; the question list itself comes from the question source and
    /// is never empty.
    pub fn new(role: Role, difficulty: Difficulty, questions: Vec<Question>) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            id: Uuid::new_v4(),
            role,
            difficulty,
            started_at: Utc::now(),
            state: SessionState::Setup,
            questions,
            answers,
            report: None,
        }
    }

    /// `Setup → Active { 0 }`.
    pub fn begin(&mut self) -> Result<(), AppError> {
        match self.state {
            SessionState::Setup => {
                self.state = SessionState::Active { current: 0 };
                info!(
                    "Session {} started: {} questions for {}",
                    self.id,
                    self.questions.len(),
                    self.role.label()
                );
                Ok(())
            }
            _ => Err(AppError::Conflict(
                "Session has already started".to_string(),
            )),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::Active { current } => self.questions.get(current),
            _ => None,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            SessionState::Active { current } => Some(current),
            _ => None,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn report(&self) -> Option<&SessionReport> {
        self.report.as_ref()
    }

    pub fn answer_for(&self, question_id: Uuid) -> Option<&Answer> {
        self.answers
            .iter()
            .flatten()
            .find(|a| a.question_id == question_id)
    }

    /// Records the answer for the current question. Allowed only in
    /// `Active`; resubmitting before advancing replaces the prior answer.
    pub fn submit_answer(&mut self, raw_text: &str) -> Result<&Answer, AppError> {
        let SessionState::Active { current } = self.state else {
            return Err(AppError::Conflict(
                "No question is awaiting an answer".to_string(),
            ));
        };
        let question_id = self.questions[current].id;
        let cleaned_text = transcript::normalize(raw_text);
        Ok(self.answers[current].insert(Answer {
            question_id,
            raw_text: raw_text.to_string(),
            cleaned_text,
            submitted_at: Utc::now(),
        }))
    }

    /// Advances past the current question. Requires an answer to exist;
    /// advancing past the last question moves to `Evaluating` and runs the
    /// evaluation immediately, landing in `Done`.
    pub fn advance(&mut self) -> Result<&SessionState, AppError> {
        let SessionState::Active { current } = self.state else {
            return Err(AppError::Conflict("Session is not active".to_string()));
        };
        if self.answers[current].is_none() {
            return Err(AppError::Validation(
                "Answer the current question before advancing".to_string(),
            ));
        }
        if current + 1 < self.questions.len() {
            self.state = SessionState::Active { current: current + 1 };
        } else {
            self.state = SessionState::Evaluating;
            self.evaluate();
        }
        Ok(&self.state)
    }

    /// `Evaluating → Done`. Scores each answered question and aggregates.
    /// A scorer or aggregator failure substitutes the fixed Partial
    /// placeholder per question; completion is never blocked.
    fn evaluate(&mut self) {
        debug_assert_eq!(self.state, SessionState::Evaluating);

        let analyses: Vec<QuestionAnalysis> = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter_map(|(question, answer)| answer.as_ref().map(|a| (question, a)))
            .map(|(question, answer)| {
                catch_unwind(AssertUnwindSafe(|| {
                    score_answer(question, &answer.cleaned_text, &self.role)
                }))
                .unwrap_or_else(|_| {
                    error!("Scorer failed for question {}; using placeholder", question.id);
                    placeholder_analysis(question)
                })
            })
            .collect();

        let report = catch_unwind(AssertUnwindSafe(|| aggregate(&analyses)))
            .unwrap_or_else(|_| {
                error!("Aggregation failed for session {}; using placeholder", self.id);
                aggregate(&self.questions.iter().map(placeholder_analysis).collect::<Vec<_>>())
            });

        self.report = Some(report);
        self.state = SessionState::Done;
        info!("Session {} evaluated", self.id);
    }

    /// Builds the persisted record for a completed session.
    pub fn history_record(&self) -> Option<HistoryRecord> {
        let report = self.report.as_ref()?;
        let skills = derive_skills(report);
        Some(HistoryRecord {
            id: self.id,
            date: Utc::now(),
            role: self.role.clone(),
            difficulty: self.difficulty,
            score: report.overall_score,
            skills,
            summary: SessionSummary {
                questions_count: self.questions.len(),
                answered_count: self.answered_count(),
                duration_ms: (Utc::now() - self.started_at).num_milliseconds(),
                knowledge_level: report.knowledge_level,
                strengths: report.strengths.clone(),
                weaknesses: report.weaknesses.clone(),
                stats: report.tier_counts,
            },
        })
    }
}

/// Fixed mid-Partial analysis used when evaluation fails.
fn placeholder_analysis(question: &Question) -> QuestionAnalysis {
    QuestionAnalysis {
        question_id: question.id,
        score: FALLBACK_SCORE,
        tier: CorrectnessTier::Partial,
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        missing_concepts: Vec::new(),
        rationale: "Evaluation was unavailable; a provisional score was recorded.".to_string(),
        breakdown: ScoreBreakdown::default(),
        word_count: 0,
    }
}

/// Deterministic skill vector from the averaged sub-score breakdowns.
/// Replaces the old score-plus-random-jitter stub: same report, same
/// skills, every time.
pub fn derive_skills(report: &SessionReport) -> SkillVector {
    if report.per_question.is_empty() {
        return SkillVector::default();
    }
    let n = report.per_question.len() as f64;
    let avg = |f: fn(&ScoreBreakdown) -> f64| -> f64 {
        report.per_question.iter().map(|a| f(&a.breakdown)).sum::<f64>() / n
    };

    let concepts = avg(|b| b.concepts);
    let depth = avg(|b| b.depth);
    let examples = avg(|b| b.examples);
    let structure = avg(|b| b.structure);
    let vocabulary = avg(|b| b.vocabulary);

    let percent = |value: f64, max: f64| -> u32 {
        ((value / max) * 100.0).round().clamp(0.0, 100.0) as u32
    };

    SkillVector {
        technical: percent(concepts + vocabulary, 55.0),
        communication: percent(depth + structure, 30.0),
        problem_solving: percent(examples + concepts, 55.0),
        experience: percent(examples + vocabulary, 30.0),
        culture: report.overall_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::questions::mock_questions;

    fn session(n: usize) -> Session {
        let questions = mock_questions(&Role::Backend, Difficulty::Mid, n);
        Session::new(Role::Backend, Difficulty::Mid, questions)
    }

    #[test]
    fn test_new_session_is_in_setup() {
        let s = session(3);
        assert_eq!(s.state, SessionState::Setup);
        assert!(s.current_question().is_none());
    }

    #[test]
    fn test_begin_moves_to_first_question() {
        let mut s = session(3);
        s.begin().unwrap();
        assert_eq!(s.state, SessionState::Active { current: 0 });
        assert!(s.current_question().is_some());
    }

    #[test]
    fn test_begin_twice_is_rejected() {
        let mut s = session(3);
        s.begin().unwrap();
        assert!(matches!(s.begin(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_advance_without_answer_is_rejected() {
        let mut s = session(3);
        s.begin().unwrap();
        assert!(matches!(s.advance(), Err(AppError::Validation(_))));
        assert_eq!(s.state, SessionState::Active { current: 0 });
    }

    #[test]
    fn test_submit_before_begin_is_rejected() {
        let mut s = session(3);
        assert!(matches!(
            s.submit_answer("hello"),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_resubmission_replaces_answer() {
        let mut s = session(2);
        s.begin().unwrap();
        s.submit_answer("first try").unwrap();
        let answer = s.submit_answer("second try").unwrap();
        assert_eq!(answer.raw_text, "second try");
        assert_eq!(s.answered_count(), 1);
    }

    #[test]
    fn test_answer_is_normalized_on_submission() {
        let mut s = session(1);
        s.begin().unwrap();
        let answer = s.submit_answer("um i would add an index").unwrap();
        assert_eq!(answer.cleaned_text, "I would add an index.");
    }

    #[test]
    fn test_full_run_reaches_done_with_report() {
        let mut s = session(3);
        s.begin().unwrap();
        for _ in 0..3 {
            s.submit_answer("I would use a cache with TTL based invalidation, for example Redis.")
                .unwrap();
            s.advance().unwrap();
        }
        assert_eq!(s.state, SessionState::Done);
        let report = s.report().expect("report after completion");
        assert_eq!(report.per_question.len(), 3);
        assert_eq!(report.tier_counts.total(), 3);
        assert!(report.overall_score <= 100);
    }

    #[test]
    fn test_no_state_is_skippable() {
        let mut s = session(2);
        s.begin().unwrap();
        s.submit_answer("an answer about indexes and caching").unwrap();
        // Advancing the non-final question stays Active.
        assert!(matches!(
            s.advance().unwrap(),
            SessionState::Active { current: 1 }
        ));
        // Submitting again only affects the new current question.
        assert!(matches!(s.submit_answer("done"), Ok(_)));
    }

    #[test]
    fn test_submit_after_done_is_rejected() {
        let mut s = session(1);
        s.begin().unwrap();
        s.submit_answer("short answer").unwrap();
        s.advance().unwrap();
        assert_eq!(s.state, SessionState::Done);
        assert!(matches!(s.submit_answer("late"), Err(AppError::Conflict(_))));
        assert!(matches!(s.advance(), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_history_record_reflects_report() {
        let mut s = session(2);
        s.begin().unwrap();
        for _ in 0..2 {
            s.submit_answer("First, add an index. For example a covering index cuts latency.")
                .unwrap();
            s.advance().unwrap();
        }
        let record = s.history_record().expect("record after completion");
        assert_eq!(record.id, s.id);
        assert_eq!(record.summary.questions_count, 2);
        assert_eq!(record.summary.answered_count, 2);
        assert_eq!(record.score, s.report().unwrap().overall_score);
        assert_eq!(record.summary.stats.total(), 2);
    }

    #[test]
    fn test_history_record_absent_before_completion() {
        let mut s = session(1);
        s.begin().unwrap();
        assert!(s.history_record().is_none());
    }

    #[test]
    fn test_skill_vector_is_deterministic() {
        let mut s = session(2);
        s.begin().unwrap();
        for _ in 0..2 {
            s.submit_answer("For example, caching with TTL invalidation helps latency.")
                .unwrap();
            s.advance().unwrap();
        }
        let report = s.report().unwrap();
        assert_eq!(derive_skills(report), derive_skills(report));
        let skills = derive_skills(report);
        assert!(skills.technical <= 100);
        assert_eq!(skills.culture, report.overall_score);
    }

    #[test]
    fn test_skill_vector_empty_report_is_zero() {
        let report = aggregate(&[]);
        assert_eq!(derive_skills(&report), SkillVector::default());
    }
}
