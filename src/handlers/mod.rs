pub mod classify;
mod error;

pub use error::ApiError;

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::services::{ClipClassifier, GuidanceService};

const FRONTEND_DIR: &str = "frontend";
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared per-process state. The classifier is written once at startup and
/// only read afterwards; `None` means initialization failed and /classify
/// must answer with a model-not-loaded error.
pub struct AppState {
    pub classifier: Option<Arc<ClipClassifier>>,
    pub guidance: Arc<dyn GuidanceService>,
    pub gemini_configured: bool,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/classify", post(classify::classify_waste))
        .nest_service("/static", ServeDir::new(FRONTEND_DIR))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the frontend shell if present, otherwise a plain-text pointer.
async fn home() -> Html<String> {
    match tokio::fs::read_to_string(format!("{FRONTEND_DIR}/index.html")).await {
        Ok(content) => Html(content),
        Err(_) => Html(
            "Frontend not found. Use GET /health for status and POST /classify for the API."
                .to_string(),
        ),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub clip_model: bool,
    pub gemini_api: bool,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        clip_model: state.classifier.is_some(),
        gemini_api: state.gemini_configured,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::Result;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::models::Category;

    struct CountingGuidance {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl GuidanceService for CountingGuidance {
        async fn generate_guidance(&self, category: Category) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("guidance for {category}"))
        }
    }

    fn state_without_model() -> (Arc<AppState>, Arc<CountingGuidance>) {
        let guidance = Arc::new(CountingGuidance {
            calls: AtomicUsize::new(0),
        });
        let state = Arc::new(AppState {
            classifier: None,
            guidance: guidance.clone(),
            gemini_configured: true,
        });
        (state, guidance)
    }

    fn multipart_request(field: &str, content_type: &str, payload: &[u8]) -> Request<Body> {
        let boundary = "test-boundary-7MA4YWxkTrZu0gW";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; \
                 filename=\"upload.bin\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/classify")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_missing_model() {
        let (state, _) = state_without_model();
        let response = create_router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["clip_model"], false);
        assert_eq!(json["gemini_api"], true);
    }

    #[tokio::test]
    async fn test_rejects_non_image_upload() {
        let (state, guidance) = state_without_model();
        let response = create_router(state)
            .oneshot(multipart_request("file", "text/plain", b"not an image"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("image"));

        // Rejected before any model or guidance work happens.
        assert_eq!(guidance.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejects_upload_without_file_field() {
        let (state, _) = state_without_model();
        let response = create_router(state)
            .oneshot(multipart_request("attachment", "image/png", b"\x89PNG"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_model_unavailable_is_server_error() {
        let (state, guidance) = state_without_model();
        let response = create_router(state)
            .oneshot(multipart_request("file", "image/jpeg", b"\xff\xd8\xff"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("not loaded"));
        assert_eq!(guidance.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_home_always_answers() {
        let (state, _) = state_without_model();
        let response = create_router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
