//! Document records exchanged with the backend.

use crate::annotation::DocumentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Backend-assigned document type identifier.
pub type DocumentTypeId = i64;

/// An uploaded document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    pub id: DocumentId,
    /// Path of the uploaded file, relative to the static file root.
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type_id: Option<DocumentTypeId>,
}

/// A document together with the number of annotations on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub file_path: String,
    pub uploaded_at: DateTime<Utc>,
    pub annotation_count: usize,
}

/// A kind of document (e.g. "Credit Agreement").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: DocumentTypeId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A named field that can be captured from documents of a type.
/// Its name is offered as an annotation label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataElement {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A file to upload as a new document.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub document_type_id: Option<DocumentTypeId>,
}

impl DocumentUpload {
    /// Only PDF files are accepted.
    pub fn is_pdf(&self) -> bool {
        self.file_name.to_lowercase().ends_with(".pdf")
    }

    /// The file name without any directory components.
    pub fn base_name(&self) -> &str {
        self.file_name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.file_name)
    }
}
