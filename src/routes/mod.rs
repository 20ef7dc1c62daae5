//! Router assembly: HTTP endpoints, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST-ish API under `/api/v1/...`
/// - CORS (allow any origin/method/headers), adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/topics", get(http::http_topics))
        .route("/api/v1/questions", get(http::http_get_questions))
        .route("/api/v1/questions/adaptive", post(http::http_post_adaptive_questions))
        .route("/api/v1/feedback", post(http::http_post_feedback))
        .route("/api/v1/progress/:question_id", get(http::http_get_progress))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    use async_trait::async_trait;

    use crate::bank::QuestionBank;
    use crate::store::{LearningEvent, MemoryStore, Store};

    struct DownStore;

    #[async_trait]
    impl Store for DownStore {
        async fn get(&self, _id: &str) -> Result<Option<Value>, String> {
            Err("connection refused".into())
        }
        async fn set(&self, _id: &str, _record: Value) -> Result<(), String> {
            Err("connection refused".into())
        }
        async fn append(&self, _event: LearningEvent) -> Result<(), String> {
            Err("connection refused".into())
        }
    }

    fn app() -> Router {
        let state = AppState::new(
            QuestionBank::with_config(None),
            Arc::new(MemoryStore::new()),
            None,
            Duration::from_millis(200),
        );
        build_router(Arc::new(state))
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let v = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
        (status, v)
    }

    fn post_json(uri: &str, user: Option<&str>, payload: Value) -> Request<Body> {
        let mut b = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(u) = user {
            b = b.header(http::USER_ID_HEADER, u);
        }
        b.body(Body::from(serde_json::to_vec(&payload).unwrap())).unwrap()
    }

    #[tokio::test]
    async fn questions_endpoint_serves_batch() {
        let req = Request::get("/api/v1/questions?courseId=1&topicId=water-cycle&count=3&difficulty=beginner&culturalContext=philippines")
            .body(Body::empty())
            .unwrap();
        let (status, v) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        let qs = v.as_array().unwrap();
        assert_eq!(qs.len(), 3);
        for q in qs {
            assert_eq!(q["topic"], "water-cycle");
            assert_eq!(q["difficultyLevel"], "beginner");
            assert_eq!(q["courseId"], "1");
            assert!(q["options"].as_array().unwrap().contains(&q["correctAnswer"]));
        }
    }

    #[tokio::test]
    async fn questions_endpoint_requires_course_id() {
        let req = Request::get("/api/v1/questions?topicId=water-cycle").body(Body::empty()).unwrap();
        let (status, v) = send(app(), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn unknown_topic_is_an_empty_list() {
        let req = Request::get("/api/v1/questions?courseId=1&topicId=nope").body(Body::empty()).unwrap();
        let (status, v) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v, json!([]));
    }

    #[tokio::test]
    async fn adaptive_endpoint_picks_tier_and_topic() {
        let payload = json!({
            "courseId": 4,
            "userPerformance": {"correct": 4, "total": 5},
            "culturalBackground": "Malaysia",
            "preferredLanguage": "ms"
        });
        let (status, v) = send(app(), post_json("/api/v1/questions/adaptive", None, payload)).await;
        assert_eq!(status, StatusCode::OK);
        let qs = v.as_array().unwrap();
        assert_eq!(qs.len(), 5);
        assert!(qs.iter().all(|q| q["difficultyLevel"] == "advanced" && q["topic"] == "sea-geography"));
    }

    #[tokio::test]
    async fn adaptive_endpoint_rejects_malformed_json() {
        let payload = json!({"courseId": 1, "userPerformance": {"correct": -1, "total": 2}});
        let (status, v) = send(app(), post_json("/api/v1/questions/adaptive", None, payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(v["error"], "INVALID_INPUT");
    }

    #[tokio::test]
    async fn feedback_requires_caller_identity() {
        let payload = json!({"userAnswer": "a", "correctAnswer": "a", "questionId": "q1"});
        let (status, v) = send(app(), post_json("/api/v1/feedback", None, payload)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(v["error"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn feedback_then_progress_roundtrip() {
        let app = app();
        let payload = json!({
            "userAnswer": "Heat makes water evaporate",
            "correctAnswer": "heat makes water evaporate quickly",
            "questionId": "q9",
            "subject": "science",
            "concept": "evaporation",
            "attemptNumber": 2
        });
        let (status, v) = send(app.clone(), post_json("/api/v1/feedback", Some("learner-1"), payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(v["classification"], "partial");
        assert_eq!(v["score"], 50);
        assert_eq!(v["attemptNumber"], 2);
        assert!(v.get("hint").is_none());
        assert!(!v["recommendations"].as_array().unwrap().is_empty());

        let req = Request::get("/api/v1/progress/q9")
            .header(http::USER_ID_HEADER, "learner-1")
            .body(Body::empty())
            .unwrap();
        let (status, saved) = send(app.clone(), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved["score"], 50);

        let req = Request::get("/api/v1/progress/q9")
            .header(http::USER_ID_HEADER, "someone-else")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(app, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn topics_lists_inventory() {
        let req = Request::get("/api/v1/topics").body(Body::empty()).unwrap();
        let (status, v) = send(app(), req).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = v.as_array().unwrap().iter().filter_map(|t| t["topic"].as_str()).collect();
        assert_eq!(names, vec!["sea-culture", "sea-geography", "sea-history", "water-cycle"]);
    }

    #[tokio::test]
    async fn progress_store_outage_is_a_503() {
        let state = AppState::new(
            QuestionBank::with_config(None),
            Arc::new(DownStore),
            None,
            Duration::from_millis(200),
        );
        let req = Request::get("/api/v1/progress/q1")
            .header(http::USER_ID_HEADER, "learner-1")
            .body(Body::empty())
            .unwrap();
        let (status, v) = send(build_router(Arc::new(state)), req).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(v["error"], "STORE_UNAVAILABLE");
        assert!(!v["message"].as_str().unwrap().contains("refused"));
    }
}
