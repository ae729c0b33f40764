//! HTTP routes.

use crate::catalog::Catalog;
use crate::error::{ApiError, ApiResult};
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pagemark_core::store::INVALID_FILE_TYPE;
use pagemark_core::{
    Annotation, DataElement, DocumentDescriptor, DocumentId, DocumentSummary, DocumentType, DocumentTypeId,
    DocumentUpload,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

pub struct AppState {
    pub catalog: Catalog,
    pub upload_folder: PathBuf,
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    let uploads = ServeDir::new(&state.upload_folder);
    Router::new()
        .route("/health", get(health))
        .route("/documents/", post(upload_document).get(list_documents))
        .route("/documents/{document_id}", get(get_document))
        .route("/documents_with_annotations", get(documents_with_annotations))
        .route("/annotations/", post(create_annotation))
        .route("/annotations/{document_id}", get(list_annotations))
        .route("/document_types", get(document_types))
        .route("/document_types/", get(document_types))
        .route(
            "/data_elements_by_document_type/{document_type_id}",
            get(data_elements_by_document_type),
        )
        .nest_service("/uploaded_files", uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn upload_document(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<DocumentDescriptor>)> {
    let mut file = None;
    let mut document_type_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                file = Some((file_name, bytes));
            }
            Some("document_type_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
                let text = text.trim();
                if !text.is_empty() {
                    let id = text.parse::<DocumentTypeId>().map_err(|_| {
                        ApiError::Unprocessable(format!("Invalid document_type_id: {text}"))
                    })?;
                    document_type_id = Some(id);
                }
            }
            _ => {}
        }
    }

    let Some((file_name, bytes)) = file else {
        return Err(ApiError::Unprocessable("Missing file field".to_string()));
    };
    let upload = DocumentUpload {
        file_name,
        bytes: bytes.to_vec(),
        document_type_id,
    };
    if !upload.is_pdf() {
        tracing::warn!("Rejected upload {:?}", upload.file_name);
        return Err(ApiError::BadRequest(INVALID_FILE_TYPE.to_string()));
    }

    let base_name = upload.base_name().to_string();
    let target = state.upload_folder.join(&base_name);
    tokio::fs::write(&target, &upload.bytes).await.map_err(|e| {
        ApiError::Internal(format!("Failed to store {}: {e}", target.display()))
    })?;

    let document = state.catalog.upsert_document(&base_name, upload.document_type_id)?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    100
}

async fn list_documents(
    State(state): State<SharedState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<DocumentDescriptor>>> {
    Ok(Json(state.catalog.documents(page.skip, page.limit)?))
}

async fn get_document(
    State(state): State<SharedState>,
    Path(document_id): Path<DocumentId>,
) -> ApiResult<Json<DocumentDescriptor>> {
    Ok(Json(state.catalog.document(document_id)?))
}

async fn documents_with_annotations(State(state): State<SharedState>) -> ApiResult<Json<Vec<DocumentSummary>>> {
    Ok(Json(state.catalog.documents_with_annotations()?))
}

async fn create_annotation(
    State(state): State<SharedState>,
    Json(annotation): Json<Annotation>,
) -> ApiResult<(StatusCode, Json<Annotation>)> {
    let stored = state.catalog.create_annotation(annotation)?;
    Ok((StatusCode::CREATED, Json(stored)))
}

async fn list_annotations(
    State(state): State<SharedState>,
    Path(document_id): Path<DocumentId>,
) -> Json<Vec<Annotation>> {
    Json(state.catalog.annotations(document_id))
}

async fn document_types(State(state): State<SharedState>) -> Json<Vec<DocumentType>> {
    Json(state.catalog.document_types().to_vec())
}

async fn data_elements_by_document_type(
    State(state): State<SharedState>,
    Path(document_type_id): Path<DocumentTypeId>,
) -> Json<Vec<DataElement>> {
    Json(state.catalog.data_elements(document_type_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "pagemark-test-boundary";

    fn test_app() -> (Router, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState {
            catalog: Catalog::seeded(),
            upload_folder: dir.path().to_path_buf(),
        });
        (router(state), dir)
    }

    fn upload_request(file_name: &str, content: &[u8], document_type_id: Option<i64>) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(id) = document_type_id {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document_type_id\"\r\n\r\n{id}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/documents/")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, value: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = send(app, request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn annotation_body(document_id: i64, value: &str) -> Value {
        json!({
            "document_id": document_id,
            "page": 1,
            "x": 72.0,
            "y": 100.0,
            "width": 120.0,
            "height": 18.0,
            "value": value,
            "annotation_value": "Acme Corp"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = test_app();
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_taxonomy_routes() {
        let (app, _dir) = test_app();
        for uri in ["/document_types", "/document_types/"] {
            let (status, types) = send_json(&app, get(uri)).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(types.as_array().unwrap().len(), 2);
        }

        let (_, elements) = send_json(&app, get("/data_elements_by_document_type/2")).await;
        let names: Vec<&str> = elements
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["name"].as_str().unwrap())
            .collect();
        assert_eq!(names.len(), 8);
        assert!(names.contains(&"Drawdown Amount"));

        let (status, elements) = send_json(&app, get("/data_elements_by_document_type/42")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(elements, json!([]));
    }

    #[tokio::test]
    async fn test_upload_rejects_non_pdf() {
        let (app, dir) = test_app();
        let (status, body) = send_json(&app, upload_request("notes.txt", b"hello", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], INVALID_FILE_TYPE);
        assert!(!dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_upload_stores_and_serves_file() {
        let (app, dir) = test_app();
        let (status, doc) = send_json(&app, upload_request("contracts/Deal.PDF", b"%PDF-1.7", Some(1))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(doc["file_path"], "Deal.PDF");
        assert_eq!(doc["document_type_id"], 1);
        assert_eq!(std::fs::read(dir.path().join("Deal.PDF")).unwrap(), b"%PDF-1.7");

        let (status, bytes) = send(&app, get("/uploaded_files/Deal.PDF")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"%PDF-1.7");

        let (status, again) = send_json(&app, upload_request("Deal.PDF", b"%PDF-1.7 v2", None)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(again["id"], doc["id"]);
        assert_eq!(again["document_type_id"], 1);

        let (_, listed) = send_json(&app, get("/documents/")).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_document_not_found() {
        let (app, _dir) = test_app();
        let (status, body) = send_json(&app, get("/documents/99")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Document not found.");
    }

    #[tokio::test]
    async fn test_annotation_lifecycle() {
        let (app, _dir) = test_app();
        let (_, doc) = send_json(&app, upload_request("loan.pdf", b"%PDF", Some(1))).await;
        let id = doc["id"].as_i64().unwrap();

        let (status, stored) = send_json(&app, post_json("/annotations/", &annotation_body(id, "Borrower Name"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(stored["id"].is_i64());
        assert!(stored["created_at"].is_string());

        let (_, listed) = send_json(&app, get(&format!("/annotations/{id}"))).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["annotation_value"], "Acme Corp");

        let (_, summary) = send_json(&app, get("/documents_with_annotations")).await;
        assert_eq!(summary[0]["annotation_count"], 1);
    }

    #[tokio::test]
    async fn test_annotation_errors() {
        let (app, _dir) = test_app();
        let (status, body) = send_json(&app, post_json("/annotations/", &annotation_body(5, "Borrower Name"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Document not found.");

        let (_, doc) = send_json(&app, upload_request("loan.pdf", b"%PDF", None)).await;
        let id = doc["id"].as_i64().unwrap();
        let (status, _) = send_json(&app, post_json("/annotations/", &annotation_body(id, ""))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, listed) = send_json(&app, get(&format!("/annotations/{id}"))).await;
        assert_eq!(listed, json!([]));
    }
}
