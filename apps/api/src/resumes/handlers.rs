use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeSummaryRow};
use crate::resumes::upload::{ensure_pdf, process_upload, UploadResponse};
use crate::state::AppState;

/// Multipart field carrying the document.
const FILE_FIELD: &str = "file";

/// POST /api/v1/resumes
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;

        // Reject before buffering the body.
        ensure_pdf(&filename)?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let response =
            process_upload(&filename, bytes, &state.analyzer, state.store.as_ref()).await?;
        return Ok(Json(response));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{FILE_FIELD}' is required"
    )))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeSummaryRow>>, AppError> {
    let resumes = state.store.list_all().await?;
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(resume))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::service::testing::CannedGateway;
    use crate::analysis::ResumeAnalyzer;
    use crate::config::Config;
    use crate::resumes::store::testing::InMemoryResumeStore;
    use crate::resumes::store::{NewResume, ResumeStore};
    use crate::routes::build_router;
    use crate::state::AppState;

    const BOUNDARY: &str = "resume-api-test-boundary";

    fn app(gateway: Arc<CannedGateway>, store: Arc<InMemoryResumeStore>) -> Router {
        build_router(AppState {
            store,
            analyzer: ResumeAnalyzer::new(gateway),
            config: Config {
                database_url: "postgres://unused".to_string(),
                anthropic_api_key: None,
                port: 0,
                rust_log: "info".to_string(),
                max_upload_bytes: 1024 * 1024,
                cors_allowed_origin: None,
            },
        })
    }

    fn multipart_upload(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn new_resume(filename: &str) -> NewResume {
        NewResume {
            filename: filename.to_string(),
            name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: None,
            structured: json!({"name": "Ada Lovelace", "source": "heuristic", "llm_error": "x"}),
            critique: json!({"resume_rating": 5, "source": "heuristic", "llm_error": "x"}),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(
            Arc::new(CannedGateway::unavailable()),
            Arc::new(InMemoryResumeStore::default()),
        );

        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-api");
    }

    #[tokio::test]
    async fn test_upload_non_pdf_is_rejected_without_analysis() {
        let gateway = Arc::new(CannedGateway::unavailable());
        let store = Arc::new(InMemoryResumeStore::default());
        let app = app(gateway.clone(), store.clone());

        let response = app
            .oneshot(multipart_upload("file", "resume.txt", b"Jane Doe"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "UNSUPPORTED_FORMAT");
        assert!(gateway.prompts.lock().unwrap().is_empty());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let app = app(
            Arc::new(CannedGateway::unavailable()),
            Arc::new(InMemoryResumeStore::default()),
        );

        let response = app
            .oneshot(multipart_upload("attachment", "resume.pdf", b"%PDF-1.4"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_unreadable_pdf() {
        let gateway = Arc::new(CannedGateway::unavailable());
        let store = Arc::new(InMemoryResumeStore::default());
        let app = app(gateway.clone(), store.clone());

        let response = app
            .oneshot(multipart_upload("file", "resume.pdf", b"not really a pdf"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(gateway.prompts.lock().unwrap().is_empty());
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = Arc::new(InMemoryResumeStore::default());
        let first = store.save(new_resume("first.pdf")).await.unwrap();
        let second = store.save(new_resume("second.pdf")).await.unwrap();
        let app = app(Arc::new(CannedGateway::unavailable()), store);

        let response = app.oneshot(get("/api/v1/resumes")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], second.to_string());
        assert_eq!(items[1]["id"], first.to_string());
        assert_eq!(items[0]["email"], "ada@example.com");
        assert!(items[0].get("structured").is_none());
    }

    #[tokio::test]
    async fn test_get_resume_returns_full_record() {
        let store = Arc::new(InMemoryResumeStore::default());
        let id = store.save(new_resume("ada.pdf")).await.unwrap();
        let app = app(Arc::new(CannedGateway::unavailable()), store);

        let response = app
            .oneshot(get(&format!("/api/v1/resumes/{id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["filename"], "ada.pdf");
        assert_eq!(body["structured"]["name"], "Ada Lovelace");
        assert_eq!(body["critique"]["resume_rating"], 5);
    }

    #[tokio::test]
    async fn test_get_unknown_resume_is_not_found() {
        let app = app(
            Arc::new(CannedGateway::unavailable()),
            Arc::new(InMemoryResumeStore::default()),
        );

        let response = app
            .oneshot(get(&format!("/api/v1/resumes/{}", uuid::Uuid::new_v4())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
