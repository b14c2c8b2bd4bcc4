//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // Report generation pipeline
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/report/generate", post(http::http_post_generate))
        .route("/api/v1/report/state", get(http::http_get_generation_state))
        .route("/api/v1/report/reset", post(http::http_post_reset))
        // Simulated signup flow
        .route("/api/v1/auth/signup", post(http::http_post_signup))
        .route("/api/v1/auth/verify", post(http::http_post_verify))
        .route("/api/v1/auth/resend", post(http::http_post_resend))
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
        // Frontend fallback
        .fallback_service(static_service)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::AuthStore;
    use crate::config::Prompts;
    use crate::domain::GenerationState;

    fn test_app() -> Router {
        let state = AppState {
            generation: Arc::new(RwLock::new(GenerationState::Idle)),
            auth: AuthStore::new(),
            gemini: None,
            prompts: Prompts::default(),
        };
        build_router(Arc::new(state))
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let res = test_app()
            .oneshot(Request::builder().uri("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn generate_without_credential_reports_configuration_error() {
        let body = r#"{"labNumber":"4","labTitle":"Arrays","problems":[{"id":"1","code":"int main(){return 0;}"}]}"#;
        let res = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/report/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["kind"], "configuration");
        assert!(json["error"].as_str().unwrap().contains("API Key is missing"));
        assert!(json["result"].is_null());
    }

    #[tokio::test]
    async fn validation_errors_come_back_in_the_state_payload() {
        let body = r#"{"labNumber":"4","labTitle":"   ","problems":[{"id":"1","code":"x"}]}"#;
        let res = test_app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/report/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["error"], "Please enter Lab Number and Title.");
    }
}
