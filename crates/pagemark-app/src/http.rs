//! REST client for the document/annotation backend.

use pagemark_core::annotation::{Annotation, DocumentId};
use pagemark_core::document::{
    DataElement, DocumentDescriptor, DocumentSummary, DocumentType, DocumentTypeId, DocumentUpload,
};
use pagemark_core::store::{AnnotationBackend, BackendError, BackendResult, BoxFuture};
use reqwest::StatusCode;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_decode() {
        BackendError::Serialization(err.to_string())
    } else {
        BackendError::Transport(err.to_string())
    }
}

/// Map a non-success status and its body to a backend error, using the
/// `{"detail": ...}` body when there is one.
fn error_from(status: StatusCode, body: &str) -> BackendError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("").to_string(),
        Err(_) => body.to_string(),
    };
    if status == StatusCode::NOT_FOUND {
        BackendError::NotFound(message)
    } else {
        BackendError::Http {
            status: status.as_u16(),
            message,
        }
    }
}

fn check_status(response: Response) -> BackendResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(error_from(status, &body))
}

/// Backend reached over HTTP.
///
/// Requests block the calling thread; the returned futures complete on their
/// first poll.
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// `base` must end with a slash; see `AppConfig::backend_base`.
    pub fn new(base: Url) -> Self {
        Self {
            client: Client::new(),
            base,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> BackendResult<Url> {
        self.base
            .join(path)
            .map_err(|e| BackendError::Other(format!("Invalid endpoint {path}: {e}")))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> BackendResult<T> {
        let url = self.endpoint(path)?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().map_err(transport_error)?;
        check_status(response)?.json().map_err(transport_error)
    }

    fn post_upload(&self, upload: &DocumentUpload) -> BackendResult<DocumentDescriptor> {
        let url = self.endpoint("documents/")?;
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.base_name().to_string())
            .mime_str("application/pdf")
            .map_err(transport_error)?;
        let mut form = Form::new().part("file", part);
        if let Some(type_id) = upload.document_type_id {
            form = form.text("document_type_id", type_id.to_string());
        }
        log::debug!("POST {url} ({} bytes)", upload.bytes.len());
        let response = self.client.post(url).multipart(form).send().map_err(transport_error)?;
        check_status(response)?.json().map_err(transport_error)
    }

    fn post_annotation(&self, annotation: &Annotation) -> BackendResult<Annotation> {
        let url = self.endpoint("annotations/")?;
        log::debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .json(annotation)
            .send()
            .map_err(transport_error)?;
        check_status(response)?.json().map_err(transport_error)
    }
}

impl AnnotationBackend for HttpBackend {
    fn documents_with_annotations(&self) -> BoxFuture<'_, BackendResult<Vec<DocumentSummary>>> {
        Box::pin(async move { self.get_json("documents_with_annotations") })
    }

    fn upload_document(&self, upload: DocumentUpload) -> BoxFuture<'_, BackendResult<DocumentDescriptor>> {
        Box::pin(async move { self.post_upload(&upload) })
    }

    fn document(&self, id: DocumentId) -> BoxFuture<'_, BackendResult<DocumentDescriptor>> {
        Box::pin(async move { self.get_json(&format!("documents/{id}")) })
    }

    fn document_types(&self) -> BoxFuture<'_, BackendResult<Vec<DocumentType>>> {
        Box::pin(async move { self.get_json("document_types") })
    }

    fn data_elements(&self, document_type_id: DocumentTypeId) -> BoxFuture<'_, BackendResult<Vec<DataElement>>> {
        Box::pin(async move { self.get_json(&format!("data_elements_by_document_type/{document_type_id}")) })
    }

    fn annotations(&self, document_id: DocumentId) -> BoxFuture<'_, BackendResult<Vec<Annotation>>> {
        Box::pin(async move { self.get_json(&format!("annotations/{document_id}")) })
    }

    fn create_annotation(&self, annotation: &Annotation) -> BoxFuture<'_, BackendResult<Annotation>> {
        let annotation = annotation.clone();
        Box::pin(async move { self.post_annotation(&annotation) })
    }
}
