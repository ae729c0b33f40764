//! In-memory backend implementation.

use super::{AnnotationBackend, BackendError, BackendResult, BoxFuture};
use crate::annotation::{Annotation, AnnotationId, DocumentId};
use crate::document::{
    DataElement, DocumentDescriptor, DocumentSummary, DocumentType, DocumentTypeId, DocumentUpload,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Message returned for uploads that are not PDFs.
pub const INVALID_FILE_TYPE: &str = "Invalid file type. Only PDF files are allowed.";

#[derive(Debug, Default)]
struct MemoryState {
    documents: Vec<DocumentDescriptor>,
    document_types: Vec<DocumentType>,
    data_elements: HashMap<DocumentTypeId, Vec<DataElement>>,
    annotations: Vec<Annotation>,
    next_document_id: DocumentId,
    next_annotation_id: AnnotationId,
}

/// In-memory backend for testing and offline use.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    offline: AtomicBool,
    create_calls: AtomicUsize,
}

fn lock_error(e: impl std::fmt::Display) -> BackendError {
    BackendError::Other(format!("Lock error: {}", e))
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with a transport error, as if the network
    /// were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `create_annotation` calls that reached the backend.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Register a document type and its data elements.
    pub fn insert_document_type(&self, document_type: DocumentType, elements: Vec<DataElement>) -> BackendResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.data_elements.insert(document_type.id, elements);
        state.document_types.retain(|t| t.id != document_type.id);
        state.document_types.push(document_type);
        Ok(())
    }

    fn check_online(&self) -> BackendResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("backend offline".to_string()));
        }
        Ok(())
    }

    fn store_upload(&self, upload: &DocumentUpload) -> BackendResult<DocumentDescriptor> {
        self.check_online()?;
        if !upload.is_pdf() {
            return Err(BackendError::Http {
                status: 400,
                message: INVALID_FILE_TYPE.to_string(),
            });
        }
        let file_path = upload.base_name().to_string();
        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(existing) = state.documents.iter_mut().find(|d| d.file_path == file_path) {
            existing.uploaded_at = Utc::now();
            if upload.document_type_id.is_some() {
                existing.document_type_id = upload.document_type_id;
            }
            return Ok(existing.clone());
        }
        state.next_document_id += 1;
        let document = DocumentDescriptor {
            id: state.next_document_id,
            file_path,
            uploaded_at: Utc::now(),
            document_type_id: upload.document_type_id,
        };
        state.documents.push(document.clone());
        Ok(document)
    }

    fn store_annotation(&self, annotation: &Annotation) -> BackendResult<Annotation> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        annotation.validate().map_err(|e| BackendError::Http {
            status: 422,
            message: e.to_string(),
        })?;
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.documents.iter().any(|d| d.id == annotation.document_id) {
            return Err(BackendError::NotFound(format!("document {}", annotation.document_id)));
        }
        state.next_annotation_id += 1;
        let stored = Annotation {
            id: Some(state.next_annotation_id),
            created_at: Some(Utc::now()),
            ..annotation.clone()
        };
        state.annotations.push(stored.clone());
        Ok(stored)
    }
}

impl AnnotationBackend for MemoryBackend {
    fn documents_with_annotations(&self) -> BoxFuture<'_, BackendResult<Vec<DocumentSummary>>> {
        Box::pin(async move {
            self.check_online()?;
            let state = self.state.read().map_err(lock_error)?;
            Ok(state
                .documents
                .iter()
                .map(|d| DocumentSummary {
                    id: d.id,
                    file_path: d.file_path.clone(),
                    uploaded_at: d.uploaded_at,
                    annotation_count: state.annotations.iter().filter(|a| a.document_id == d.id).count(),
                })
                .collect())
        })
    }

    fn upload_document(&self, upload: DocumentUpload) -> BoxFuture<'_, BackendResult<DocumentDescriptor>> {
        Box::pin(async move { self.store_upload(&upload) })
    }

    fn document(&self, id: DocumentId) -> BoxFuture<'_, BackendResult<DocumentDescriptor>> {
        Box::pin(async move {
            self.check_online()?;
            let state = self.state.read().map_err(lock_error)?;
            state
                .documents
                .iter()
                .find(|d| d.id == id)
                .cloned()
                .ok_or_else(|| BackendError::NotFound(format!("document {id}")))
        })
    }

    fn document_types(&self) -> BoxFuture<'_, BackendResult<Vec<DocumentType>>> {
        Box::pin(async move {
            self.check_online()?;
            let state = self.state.read().map_err(lock_error)?;
            Ok(state.document_types.clone())
        })
    }

    fn data_elements(&self, document_type_id: DocumentTypeId) -> BoxFuture<'_, BackendResult<Vec<DataElement>>> {
        Box::pin(async move {
            self.check_online()?;
            let state = self.state.read().map_err(lock_error)?;
            Ok(state.data_elements.get(&document_type_id).cloned().unwrap_or_default())
        })
    }

    fn annotations(&self, document_id: DocumentId) -> BoxFuture<'_, BackendResult<Vec<Annotation>>> {
        Box::pin(async move {
            self.check_online()?;
            let state = self.state.read().map_err(lock_error)?;
            Ok(state
                .annotations
                .iter()
                .filter(|a| a.document_id == document_id)
                .cloned()
                .collect())
        })
    }

    fn create_annotation(&self, annotation: &Annotation) -> BoxFuture<'_, BackendResult<Annotation>> {
        let annotation = annotation.clone();
        Box::pin(async move { self.store_annotation(&annotation) })
    }
}
