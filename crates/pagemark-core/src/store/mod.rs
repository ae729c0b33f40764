//! Backend abstraction and the annotation cache built on it.

mod annotations;
mod memory;

pub use annotations::AnnotationStore;
pub use memory::{INVALID_FILE_TYPE, MemoryBackend};

use crate::annotation::{Annotation, DocumentId};
use crate::document::{DataElement, DocumentDescriptor, DocumentSummary, DocumentType, DocumentTypeId, DocumentUpload};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Backend errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Backend error: {0}")]
    Other(String),
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Boxed future for backend calls.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// The document/annotation backend.
///
/// Implementations must be Send + Sync so they can be shared behind an `Arc`.
pub trait AnnotationBackend: Send + Sync {
    /// All documents with their annotation counts.
    fn documents_with_annotations(&self) -> BoxFuture<'_, BackendResult<Vec<DocumentSummary>>>;

    /// Upload a PDF. Uploading an existing path refreshes its timestamp.
    fn upload_document(&self, upload: DocumentUpload) -> BoxFuture<'_, BackendResult<DocumentDescriptor>>;

    /// A single document.
    fn document(&self, id: DocumentId) -> BoxFuture<'_, BackendResult<DocumentDescriptor>>;

    fn document_types(&self) -> BoxFuture<'_, BackendResult<Vec<DocumentType>>>;

    /// Data elements of a document type, offered as annotation labels.
    fn data_elements(&self, document_type_id: DocumentTypeId) -> BoxFuture<'_, BackendResult<Vec<DataElement>>>;

    /// Annotations of a document.
    fn annotations(&self, document_id: DocumentId) -> BoxFuture<'_, BackendResult<Vec<Annotation>>>;

    /// Store an annotation. The result carries its id and creation time.
    fn create_annotation(&self, annotation: &Annotation) -> BoxFuture<'_, BackendResult<Annotation>>;
}
