//! Axum router configuration with middleware.
//!
//! The page is served at `/`, JSON routes under `/api/v1/`.
//! Middleware: body limit and tracing. No CORS layer: the page is served
//! from the same origin, and other sites must not spend the API key.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Room for the question text and multipart framing on top of the image.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);

    let api_routes = Router::new()
        .route("/sessions", post(handlers::session::create_session))
        .route(
            "/sessions/{id}",
            get(handlers::session::get_session).delete(handlers::session::delete_session),
        )
        .route("/sessions/{id}/ask", post(handlers::ask::ask));

    Router::new()
        .route("/", get(handlers::page::index))
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use gemtalk_core::llm::box_provider::BoxLlmProvider;
    use gemtalk_core::llm::testing::MockProvider;
    use gemtalk_core::vision::decoder::ImageDecoder;
    use gemtalk_core::vision::history::separator;
    use gemtalk_core::vision::service::{VisionOptions, VisionService};
    use gemtalk_types::error::ImageError;
    use gemtalk_types::image::{DecodedImage, ImageFormat, ImageUpload};

    use super::*;
    use crate::state::SessionLimits;

    const BOUNDARY: &str = "gemtalk-test-boundary";
    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    /// Accepts anything starting with the PNG signature.
    struct SignatureDecoder;

    impl ImageDecoder for SignatureDecoder {
        fn decode(&self, upload: &ImageUpload) -> Result<DecodedImage, ImageError> {
            if upload.bytes.starts_with(PNG_MAGIC) {
                Ok(DecodedImage {
                    format: ImageFormat::Png,
                    width: 1,
                    height: 1,
                    bytes: upload.bytes.clone(),
                })
            } else {
                Err(ImageError::Decode("not a png".to_string()))
            }
        }
    }

    fn app_with(mock: MockProvider, max_upload_bytes: usize) -> (Router, AppState) {
        app_with_limits(mock, max_upload_bytes, SessionLimits::default())
    }

    fn app_with_limits(
        mock: MockProvider,
        max_upload_bytes: usize,
        limits: SessionLimits,
    ) -> (Router, AppState) {
        let vision = VisionService::new(
            BoxLlmProvider::new(mock),
            Box::new(SignatureDecoder),
            VisionOptions {
                model: "gemini-test".to_string(),
                temperature: None,
                max_tokens: None,
            },
        );
        let state = AppState::new(vision, max_upload_bytes).with_session_limits(limits);
        (build_router(state.clone()), state)
    }

    fn png() -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(b"rest of the file");
        bytes
    }

    fn multipart(question: Option<&str>, image: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(q) = question {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"question\"\r\n\r\n{q}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"cat.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn ask_request(id: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/v1/sessions/{id}/ask"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn new_session(app: &Router) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/sessions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["data"]["history"], "");
        json["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app_with(MockProvider::replying([]), 1024);
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_serves_page() {
        let (app, _) = app_with(MockProvider::replying([]), 1024);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(html.to_vec()).unwrap();
        for text in [
            "Talking With an Image",
            "Select an Image: ",
            "Talk with this image.",
            "Ask a question about this image: ",
            "Gemini Answer: ",
            "Chat History",
        ] {
            assert!(html.contains(text), "page is missing {text:?}");
        }
        assert!(html.contains(r#"method: "DELETE", keepalive: true"#));
    }

    #[tokio::test]
    async fn test_two_questions_build_newest_first_history() {
        let mock = MockProvider::replying(["A cat.", "Orange."]);
        let calls = mock.calls();
        let (app, _) = app_with(mock, 1024 * 1024);
        let id = new_session(&app).await;

        let first = app
            .clone()
            .oneshot(ask_request(&id, multipart(Some("What is it?"), Some(png().as_slice()))))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(json_body(first).await["data"]["answer"], "A cat.");

        let second = app
            .clone()
            .oneshot(ask_request(&id, multipart(Some("What color?"), Some(png().as_slice()))))
            .await
            .unwrap();
        let json = json_body(second).await;
        let sep = separator();
        let expected = format!(
            "Q: What color?\n\nA: Orange.\n\n{sep}Q: What is it?\n\nA: A cat.\n\n{sep}"
        );
        assert_eq!(json["data"]["answer"], "Orange.");
        assert_eq!(json["data"]["history"], expected.as_str());

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].messages[0].attachments[0].mime_type, "image/png");

        let fetched = app
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_body(fetched).await["data"]["history"], expected.as_str());
    }

    #[tokio::test]
    async fn test_incomplete_submission_returns_null_answer() {
        let mock = MockProvider::replying(["unused"]);
        let calls = mock.calls();
        let (app, _) = app_with(mock, 1024);
        let id = new_session(&app).await;

        let response = app
            .oneshot(ask_request(&id, multipart(Some("What is it?"), None)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert!(json["data"]["answer"].is_null());
        assert_eq!(json["data"]["history"], "");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_is_400_and_keeps_history() {
        let mock = MockProvider::replying(["unused"]);
        let calls = mock.calls();
        let (app, state) = app_with(mock, 1024);
        let id = new_session(&app).await;

        let response = app
            .oneshot(ask_request(&id, multipart(Some("What is it?"), Some(b"GIF89a...".as_slice()))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["errors"][0]["code"], "IMAGE_DECODE_ERROR");
        assert!(calls.lock().unwrap().is_empty());

        let slot = state.session(&id.parse().unwrap()).unwrap();
        assert!(slot.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_is_502_and_keeps_history() {
        let (app, state) = app_with(MockProvider::unavailable(), 1024);
        let id = new_session(&app).await;

        let response = app
            .oneshot(ask_request(&id, multipart(Some("What is it?"), Some(png().as_slice()))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["errors"][0]["code"], "LLM_ERROR");
        let slot = state.session(&id.parse().unwrap()).unwrap();
        assert!(slot.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_and_deleted_sessions_are_404() {
        let (app, _) = app_with(MockProvider::replying([]), 1024);

        let unknown = uuid::Uuid::now_v7();
        let response = app
            .clone()
            .oneshot(ask_request(&unknown.to_string(), multipart(Some("q"), Some(png().as_slice()))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let id = new_session(&app).await;
        let deleted = app
            .clone()
            .oneshot(
                Request::delete(format!("/api/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);

        let after = app
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(after.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_session_id_is_400() {
        let (app, _) = app_with(MockProvider::replying([]), 1024);
        let response = app
            .oneshot(
                Request::get("/api/v1/sessions/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_image_is_413() {
        let (app, _) = app_with(MockProvider::replying(["unused"]), 16);
        let id = new_session(&app).await;

        let mut big = png();
        big.extend(std::iter::repeat_n(0u8, 64));
        let response = app
            .oneshot(ask_request(&id, multipart(Some("q"), Some(big.as_slice()))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_foreign_origin_gets_no_cors_grant() {
        let (app, _) = app_with(MockProvider::replying([]), 1024);

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/v1/sessions")
                    .header(header::ORIGIN, "https://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );

        let preflight = app
            .oneshot(
                Request::options("/api/v1/sessions")
                    .header(header::ORIGIN, "https://elsewhere.example")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            preflight
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_is_swept_and_then_404() {
        let limits = SessionLimits {
            idle_ttl: Some(Duration::from_secs(60)),
            max_sessions: None,
        };
        let (app, state) = app_with_limits(MockProvider::replying([]), 1024, limits);
        let id = new_session(&app).await;

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(state.sweep_idle(), 1);

        let response = app
            .oneshot(
                Request::get(format!("/api/v1/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_cap_evicts_over_http() {
        let limits = SessionLimits {
            idle_ttl: None,
            max_sessions: Some(1),
        };
        let (app, state) = app_with_limits(MockProvider::replying([]), 1024, limits);
        let first = new_session(&app).await;
        let second = new_session(&app).await;

        assert_eq!(state.sessions.len(), 1);
        let gone = app
            .oneshot(
                Request::get(format!("/api/v1/sessions/{first}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
        assert!(state.session(&second.parse().unwrap()).is_some());
    }
}
