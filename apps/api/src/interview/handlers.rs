use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::prompts::{EXPLAIN_PROMPT_TEMPLATE, EXPLAIN_SYSTEM};
use crate::interview::questions::source_questions;
use crate::interview::session::{Session, SessionState, MAX_QUESTIONS};
use crate::models::interview::{Difficulty, Role, SessionReport};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct StartRequest {
    pub role: Role,
    pub difficulty: Difficulty,
    pub question_count: usize,
}

/// The candidate-facing view of a question. Expected concepts stay hidden
/// until the report.
#[derive(Serialize)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub text: String,
}

#[derive(Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub role: Role,
    pub difficulty: Difficulty,
    pub state: SessionState,
    pub question_count: usize,
    pub answered_count: usize,
    pub current_question: Option<QuestionView>,
}

impl SessionView {
    fn from_session(session: &Session) -> Self {
        let current_question = session.current_index().map(|index| QuestionView {
            index,
            total: session.questions.len(),
            text: session.questions[index].text.clone(),
        });
        Self {
            id: session.id,
            role: session.role.clone(),
            difficulty: session.difficulty,
            state: session.state,
            question_count: session.questions.len(),
            answered_count: session.answered_count(),
            current_question,
        }
    }
}

/// POST /api/v1/interview/start
///
/// Replaces any in-flight session. Question sourcing happens before the
/// slot is locked, so a concurrent start resolves last-write-wins.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Result<Json<SessionView>, AppError> {
    if req.question_count == 0 || req.question_count > MAX_QUESTIONS {
        return Err(AppError::Validation(format!(
            "question_count must be between 1 and {MAX_QUESTIONS}"
        )));
    }
    if req.role.label().trim().is_empty() {
        return Err(AppError::Validation("role must not be empty".to_string()));
    }

    let questions = source_questions(
        state.llm.as_ref(),
        &req.role,
        req.difficulty,
        req.question_count,
    )
    .await;

    let mut session = Session::new(req.role, req.difficulty, questions);
    session.begin()?;
    let view = SessionView::from_session(&session);

    *state.session.write().await = Some(session);
    Ok(Json(view))
}

/// GET /api/v1/interview
pub async fn handle_get_session(
    State(state): State<AppState>,
) -> Result<Json<SessionView>, AppError> {
    let slot = state.session.read().await;
    let session = slot
        .as_ref()
        .ok_or_else(|| AppError::NotFound("No active session".to_string()))?;
    Ok(Json(SessionView::from_session(session)))
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    pub question_id: Uuid,
    pub cleaned_text: String,
}

/// POST /api/v1/interview/answer
///
/// Empty submissions are blocked here at the boundary; the scorer keeps
/// its own zero-score path for completeness.
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("Answer must not be empty".to_string()));
    }
    let mut slot = state.session.write().await;
    let session = slot
        .as_mut()
        .ok_or_else(|| AppError::NotFound("No active session".to_string()))?;
    let answer = session.submit_answer(&req.text)?;
    Ok(Json(AnswerResponse {
        question_id: answer.question_id,
        cleaned_text: answer.cleaned_text.clone(),
    }))
}

#[derive(Serialize)]
pub struct AdvanceResponse {
    pub state: SessionState,
    pub next_question: Option<QuestionView>,
    /// Present once the session reached `Done`.
    pub report: Option<SessionReport>,
}

/// POST /api/v1/interview/next
///
/// Advancing past the last question evaluates the session and persists the
/// history record. Persistence failure degrades silently and the report is
/// still returned.
pub async fn handle_advance(
    State(state): State<AppState>,
) -> Result<Json<AdvanceResponse>, AppError> {
    let mut slot = state.session.write().await;
    let session = slot
        .as_mut()
        .ok_or_else(|| AppError::NotFound("No active session".to_string()))?;
    session.advance()?;

    if session.state == SessionState::Done {
        match session.history_record() {
            Some(record) => {
                if state.history.save(record).is_none() {
                    warn!("History record for session {} was not persisted", session.id);
                }
            }
            None => warn!("Completed session {} produced no history record", session.id),
        }
    }

    let next_question = session.current_index().map(|index| QuestionView {
        index,
        total: session.questions.len(),
        text: session.questions[index].text.clone(),
    });
    Ok(Json(AdvanceResponse {
        state: session.state,
        next_question,
        report: session.report().cloned(),
    }))
}

/// GET /api/v1/interview/report
pub async fn handle_report(
    State(state): State<AppState>,
) -> Result<Json<SessionReport>, AppError> {
    let slot = state.session.read().await;
    let session = slot
        .as_ref()
        .ok_or_else(|| AppError::NotFound("No active session".to_string()))?;
    session
        .report()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::Conflict("Session is not finished yet".to_string()))
}

#[derive(Deserialize)]
pub struct ExplainRequest {
    pub question_index: usize,
}

#[derive(Serialize)]
pub struct ExplainResponse {
    pub explanation: String,
    /// "llm" or "rubric", whichever backend produced the text.
    pub source: &'static str,
}

/// POST /api/v1/interview/explain
///
/// Coach-style phrasing of one question's result. The LLM call is
/// best-effort: any failure, or the session changing underneath the await,
/// falls back to the deterministic rubric rationale.
pub async fn handle_explain(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, AppError> {
    // Snapshot what the prompt needs, then release the lock for the await.
    let (session_id, question_text, answer_text, score, rationale) = {
        let slot = state.session.read().await;
        let session = slot
            .as_ref()
            .ok_or_else(|| AppError::NotFound("No active session".to_string()))?;
        let report = session
            .report()
            .ok_or_else(|| AppError::Conflict("Session is not finished yet".to_string()))?;
        let analysis = report.per_question.get(req.question_index).ok_or_else(|| {
            AppError::NotFound(format!("No question at index {}", req.question_index))
        })?;
        let question = session
            .questions
            .iter()
            .find(|q| q.id == analysis.question_id)
            .ok_or_else(|| AppError::NotFound("Question not found".to_string()))?;
        let answer_text = session
            .answer_for(analysis.question_id)
            .map(|a| a.cleaned_text.clone())
            .unwrap_or_default();
        (
            session.id,
            question.text.clone(),
            answer_text,
            analysis.score,
            analysis.rationale.clone(),
        )
    };

    if let Some(llm) = &state.llm {
        let prompt = EXPLAIN_PROMPT_TEMPLATE
            .replace("{question}", &question_text)
            .replace("{answer}", &answer_text)
            .replace("{score}", &score.to_string())
            .replace("{rationale}", &rationale);
        match llm.call_text(&prompt, EXPLAIN_SYSTEM).await {
            Ok(text) if !text.trim().is_empty() => {
                // A start may have replaced the session while we awaited;
                // a stale explanation is dropped by this state check.
                let slot = state.session.read().await;
                let still_current = slot.as_ref().is_some_and(|s| s.id == session_id);
                if still_current {
                    return Ok(Json(ExplainResponse {
                        explanation: text.trim().to_string(),
                        source: "llm",
                    }));
                }
                warn!("Discarding stale explanation for session {session_id}");
            }
            Ok(_) => warn!("LLM returned an empty explanation, using the rubric rationale"),
            Err(e) => warn!("Explanation call failed ({e}), using the rubric rationale"),
        }
    }

    Ok(Json(ExplainResponse {
        explanation: rationale,
        source: "rubric",
    }))
}
