//! Boundary errors. Caller-contract violations, missing identity and an unreachable
//! store reach the client; everything else downstream degrades to defaults instead.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use thiserror::Error;
use tracing::debug;

use crate::protocol::ErrorOut;

#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  InvalidInput(String),
  #[error("missing caller identity (x-user-id header)")]
  Unauthorized,
  #[error("{0}")]
  NotFound(String),
  /// Store lookup failed. The cause is logged, never echoed.
  #[error("progress store unavailable")]
  StoreUnavailable,
}

impl ApiError {
  fn parts(&self) -> (StatusCode, &'static str) {
    match self {
      ApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
      ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
      ApiError::StoreUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "STORE_UNAVAILABLE"),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, code) = self.parts();
    debug!(target: "sea_bridge", %status, error = %self, "Request rejected");
    (status, Json(ErrorOut { error: code.into(), message: self.to_string() })).into_response()
  }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
  fn from(e: axum::extract::rejection::JsonRejection) -> Self {
    ApiError::InvalidInput(e.body_text())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn maps_variants_to_status_codes() {
    assert_eq!(ApiError::InvalidInput("x".into()).into_response().status(), StatusCode::BAD_REQUEST);
    assert_eq!(ApiError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ApiError::NotFound("x".into()).into_response().status(), StatusCode::NOT_FOUND);
    assert_eq!(ApiError::StoreUnavailable.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
  }

  #[tokio::test]
  async fn store_failure_body_is_generic() {
    let resp = ApiError::StoreUnavailable.into_response();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let v: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["error"], "STORE_UNAVAILABLE");
    assert_eq!(v["message"], "progress store unavailable");
  }
}
