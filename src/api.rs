//! HTTP surface for the Smart Document Analyzer.
//!
//! The router exposes two endpoints:
//!
//! - `GET /` – Fixed welcome payload, useful as a liveness check.
//! - `POST /analyze` – Multipart upload with a `file` field. Responds with
//!   `{ "summary", "key_points", "sentiment", "topics" }` on success, `400` with
//!   `{ "detail": "Unsupported file format" }` for unknown extensions, and `500` with the error
//!   text for extraction, storage, or model failures.
//!
//! Error bodies always use the `{ "detail": ... }` shape. CORS is permissive and every request
//! is traced.

use crate::processing::{AnalysisResult, AnalyzerApi, AnalyzerError, UploadedFile};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const WELCOME_MESSAGE: &str = "Welcome to Smart Document Analyzer API";
const FILE_FIELD: &str = "file";

/// Build the HTTP router exposing the analysis API surface.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: AnalyzerApi + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/analyze", post(analyze_document::<S>))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(service)
}

/// Response body for `GET /`.
#[derive(Serialize)]
struct WelcomeResponse {
    message: &'static str,
}

async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE,
    })
}

/// Analyze an uploaded document.
///
/// Reads the `file` field of the multipart body, ignoring any other fields, then runs the full
/// pipeline. Exactly one result or one error is produced per request.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
async fn analyze_document<S>(
    State(service): State<Arc<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError>
where
    S: AnalyzerApi,
{
    let upload = read_upload(multipart?).await?;
    tracing::info!(filename = ?upload.filename, bytes = upload.bytes.len(), "Analyze request received");
    let result = service.analyze_document(upload).await?;
    Ok(Json(result))
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(UploadedFile {
            filename,
            bytes: bytes.to_vec(),
        });
    }
    Err(ApiError::MissingFile)
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

enum ApiError {
    Analyzer(AnalyzerError),
    MissingFile,
    Multipart { status: StatusCode, detail: String },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Analyzer(AnalyzerError::UnsupportedFormat(_)) => StatusCode::BAD_REQUEST,
            Self::Analyzer(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Multipart { status, .. } => *status,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Analyzer(error) => error.to_string(),
            Self::MissingFile => format!("Missing required multipart field '{FILE_FIELD}'"),
            Self::Multipart { detail, .. } => detail.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), detail = %detail, "Analyze request failed");
        } else {
            tracing::warn!(status = status.as_u16(), detail = %detail, "Analyze request rejected");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<AnalyzerError> for ApiError {
    fn from(inner: AnalyzerError) -> Self {
        Self::Analyzer(inner)
    }
}

impl From<MultipartError> for ApiError {
    fn from(inner: MultipartError) -> Self {
        Self::Multipart {
            status: inner.status(),
            detail: inner.body_text(),
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(inner: MultipartRejection) -> Self {
        Self::Multipart {
            status: inner.status(),
            detail: inner.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::create_router;
    use crate::documents::ExtractionError;
    use crate::processing::{AnalysisResult, AnalyzerApi, AnalyzerError, UploadedFile};
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "smartdoc-test-boundary";

    #[derive(Clone)]
    struct StubAnalyzer {
        calls: Arc<Mutex<Vec<UploadedFile>>>,
        outcome: fn(&UploadedFile) -> Result<AnalysisResult, AnalyzerError>,
    }

    impl StubAnalyzer {
        fn new(outcome: fn(&UploadedFile) -> Result<AnalysisResult, AnalyzerError>) -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
                outcome,
            }
        }

        async fn recorded_calls(&self) -> Vec<UploadedFile> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl AnalyzerApi for StubAnalyzer {
        async fn analyze_document(
            &self,
            upload: UploadedFile,
        ) -> Result<AnalysisResult, AnalyzerError> {
            let outcome = (self.outcome)(&upload);
            self.calls.lock().await.push(upload);
            outcome
        }
    }

    fn canned_result(_: &UploadedFile) -> Result<AnalysisResult, AnalyzerError> {
        Ok(AnalysisResult {
            summary: "A short test document.".into(),
            key_points: vec!["It is a test.".into()],
            sentiment: "Neutral".into(),
            topics: vec!["Testing".into()],
        })
    }

    fn multipart_body(field: &str, filename: &str, content: &str) -> String {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"note\"\r\n\r\n\
             ignored\r\n\
             --{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        )
    }

    async fn post_analyze(service: Arc<StubAnalyzer>, body: String) -> Response {
        create_router(service, 1024 * 1024)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/analyze")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("router response")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn root_returns_welcome_payload() {
        let app = create_router(Arc::new(StubAnalyzer::new(canned_result)), 1024);
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "message": "Welcome to Smart Document Analyzer API" })
        );
    }

    #[tokio::test]
    async fn analyze_forwards_file_field_and_returns_result() {
        let service = Arc::new(StubAnalyzer::new(canned_result));
        let response = post_analyze(
            service.clone(),
            multipart_body("file", "test.txt", "This is a test document."),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["summary"], "A short test document.");
        assert_eq!(json["key_points"], json!(["It is a test."]));
        assert_eq!(json["sentiment"], "Neutral");
        assert_eq!(json["topics"], json!(["Testing"]));
        assert_eq!(json.as_object().expect("object").len(), 4);

        let calls = service.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].filename, "test.txt");
        assert_eq!(calls[0].bytes, b"This is a test document.");
    }

    #[tokio::test]
    async fn unsupported_format_maps_to_bad_request() {
        let service = Arc::new(StubAnalyzer::new(|_| {
            Err(AnalyzerError::UnsupportedFormat("xyz".into()))
        }));
        let response =
            post_analyze(service, multipart_body("file", "test.xyz", "invalid content")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert!(
            json["detail"]
                .as_str()
                .expect("detail")
                .contains("Unsupported file format")
        );
    }

    #[tokio::test]
    async fn pipeline_failure_maps_to_server_error_with_text() {
        let service = Arc::new(StubAnalyzer::new(|_| {
            Err(AnalyzerError::Extraction(ExtractionError::Pdf(
                "invalid file header".into(),
            )))
        }));
        let response = post_analyze(service, multipart_body("file", "scan.pdf", "%PDF-")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert!(
            json["detail"]
                .as_str()
                .expect("detail")
                .contains("invalid file header")
        );
    }

    #[tokio::test]
    async fn missing_file_field_is_unprocessable() {
        let service = Arc::new(StubAnalyzer::new(canned_result));
        let response = post_analyze(
            service.clone(),
            multipart_body("document", "test.txt", "hello"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(service.recorded_calls().await.is_empty());
    }

    #[tokio::test]
    async fn non_multipart_request_is_rejected_with_detail() {
        let service = Arc::new(StubAnalyzer::new(canned_result));
        let response = create_router(service.clone(), 1024)
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["detail"].is_string());
        assert!(service.recorded_calls().await.is_empty());
    }
}
