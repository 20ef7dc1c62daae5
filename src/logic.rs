//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Serving question batches (direct and adaptive)
//!   - Evaluating free-text answers, with optional hints and recommendations
//!   - Tracking one learning event per evaluation and the latest result per question
//!
//! The evaluation verdict is always returned; hints, tracking and progress writes are
//! best-effort and only logged when they fail.

use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::adaptive::generate_adaptive_questions;
use crate::domain::GeneratedQuestion;
use crate::evaluator::{evaluate, generate_adaptive_hint, recommendations, should_request_hint, HintRequest};
use crate::protocol::{AdaptiveParams, FeedbackOut, FeedbackParams, QuestionsParams};
use crate::state::AppState;
use crate::store::LearningEvent;
use crate::util::{now_millis, trunc_for_log};

pub const ANSWER_EVALUATED: &str = "answer_evaluated";

pub fn progress_key(user_id: &str, question_id: &str) -> String {
  format!("progress:{}:{}", user_id, question_id)
}

#[instrument(level = "info", skip(state))]
pub fn serve_questions(state: &AppState, p: &QuestionsParams) -> Vec<GeneratedQuestion> {
  state
    .bank
    .generate_questions(&p.course_id, &p.topic_id, p.count, p.difficulty, &p.cultural_context)
}

#[instrument(level = "info", skip(state, p), fields(course_id = %p.course_id))]
pub fn serve_adaptive_questions(state: &AppState, p: &AdaptiveParams) -> Vec<GeneratedQuestion> {
  generate_adaptive_questions(
    &state.bank,
    &p.course_id,
    &p.performance,
    &p.cultural_background,
    p.preferred_language.as_deref(),
  )
}

#[instrument(level = "info", skip(state, p), fields(%user_id, question_id = %p.question_id, attempt = p.attempt_number))]
pub async fn evaluate_feedback(state: &AppState, user_id: &str, p: &FeedbackParams) -> FeedbackOut {
  let ev = evaluate(&p.user_answer, &p.correct_answer, p.attempt_number);
  info!(
    target: "feedback",
    similarity = ev.similarity,
    classification = ev.classification.as_str(),
    answer = %trunc_for_log(&p.user_answer, 40),
    "Answer evaluated"
  );

  // Appended before the hint await: the event must outlive a dropped request.
  let event = LearningEvent {
    id: Uuid::new_v4().to_string(),
    event_type: ANSWER_EVALUATED.into(),
    user_id: user_id.to_string(),
    course_id: p.course_id.clone(),
    question_id: p.question_id.clone(),
    subject: p.subject.clone(),
    concept: p.concept.clone(),
    similarity: ev.similarity,
    score: ev.score,
    classification: ev.classification.as_str().into(),
    attempt_number: ev.attempt_number,
    timestamp_ms: now_millis(),
  };
  if let Err(e) = state.store.append(event).await {
    error!(target: "feedback", error = %e, "Failed to track learning event");
  }

  let hint = match (&state.hints, should_request_hint(ev.classification, ev.attempt_number)) {
    (Some(generator), true) => {
      let req = HintRequest {
        user_answer: p.user_answer.clone(),
        correct_answer: p.correct_answer.clone(),
        concept: p.concept.clone(),
        attempt_number: ev.attempt_number,
        cultural_context: p.cultural_context.clone().unwrap_or_default(),
      };
      generate_adaptive_hint(generator.as_ref(), &state.prompts, &req, state.hint_timeout).await
    }
    _ => None,
  };

  let out = FeedbackOut::new(
    &ev,
    hint,
    recommendations(ev.classification, &p.concept, p.cultural_context.as_deref()),
  );

  match serde_json::to_value(&out) {
    Ok(record) => {
      if let Err(e) = state.store.set(&progress_key(user_id, &p.question_id), record).await {
        error!(target: "feedback", error = %e, "Failed to persist progress record");
      }
    }
    Err(e) => error!(target: "feedback", error = %e, "Failed to serialize progress record"),
  }

  out
}

/// Latest stored feedback for a caller/question pair.
#[instrument(level = "info", skip(state))]
pub async fn load_progress(state: &AppState, user_id: &str, question_id: &str) -> Result<Option<FeedbackOut>, String> {
  let Some(record) = state.store.get(&progress_key(user_id, question_id)).await? else {
    return Ok(None);
  };
  serde_json::from_value(record).map(Some).map_err(|e| e.to_string())
}
