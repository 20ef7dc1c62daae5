//! HTTP endpoint handlers. These are thin wrappers that validate input and forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  async_trait,
  extract::{rejection::JsonRejection, FromRequestParts, Path, Query, State},
  http::request::Parts,
  response::IntoResponse,
  Json,
};
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity supplied by the surrounding app. Rejects with 401 when absent.
#[derive(Debug)]
pub struct CallerId(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CallerId {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .headers
      .get(USER_ID_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .map(|v| CallerId(v.to_string()))
      .ok_or(ApiError::Unauthorized)
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_topics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(state.bank.topics())
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_questions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<QuestionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
  let params = q.validate()?;
  let questions = serve_questions(&state, &params);
  info!(target: "quiz", course_id = %params.course_id, topic = %params.topic_id, requested = params.count, served = questions.len(), "HTTP questions served");
  Ok(Json(questions))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_adaptive_questions(
  State(state): State<Arc<AppState>>,
  body: Result<Json<AdaptiveIn>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let params = body.validate()?;
  let questions = serve_adaptive_questions(&state, &params);
  info!(target: "quiz", course_id = %params.course_id, served = questions.len(), "HTTP adaptive questions served");
  Ok(Json(questions))
}

#[instrument(level = "info", skip(state, body), fields(user_id = %caller.0))]
pub async fn http_post_feedback(
  State(state): State<Arc<AppState>>,
  caller: CallerId,
  body: Result<Json<FeedbackIn>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(body) = body?;
  let params = body.validate()?;
  let out = evaluate_feedback(&state, &caller.0, &params).await;
  info!(target: "feedback", question_id = %params.question_id, classification = out.classification.as_str(), score = out.score, has_hint = out.hint.is_some(), "HTTP feedback evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state), fields(user_id = %caller.0))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  caller: CallerId,
  Path(question_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
  match load_progress(&state, &caller.0, &question_id).await {
    Ok(Some(record)) => Ok(Json(record)),
    Ok(None) => Err(ApiError::NotFound(format!("no progress for question '{}'", question_id))),
    Err(e) => {
      tracing::error!(target: "sea_bridge", error = %e, "Progress lookup failed");
      Err(ApiError::StoreUnavailable)
    }
  }
}
