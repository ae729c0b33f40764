//! Cache of the annotations of the loaded document.

use super::{AnnotationBackend, BackendResult};
use crate::annotation::{Annotation, DocumentId};
use crate::document::{DataElement, DocumentDescriptor, DocumentSummary, DocumentType, DocumentTypeId, DocumentUpload};
use std::sync::Arc;

/// Annotations of one document, kept in sync with the backend on load and
/// on save.
pub struct AnnotationStore<B: AnnotationBackend> {
    backend: Arc<B>,
    document_id: Option<DocumentId>,
    annotations: Vec<Annotation>,
}

impl<B: AnnotationBackend> AnnotationStore<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            document_id: None,
            annotations: Vec::new(),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Document whose annotations are cached.
    pub fn document_id(&self) -> Option<DocumentId> {
        self.document_id
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotations on a 1-based page.
    pub fn on_page(&self, page: u32) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().filter(move |a| a.page == page)
    }

    /// Replace the cache with the backend's annotations for `document_id`.
    ///
    /// On failure the cache is left empty for that document.
    pub async fn load(&mut self, document_id: DocumentId) -> BackendResult<usize> {
        self.document_id = Some(document_id);
        self.annotations.clear();
        self.annotations = self.backend.annotations(document_id).await?;
        log::debug!("Loaded {} annotations for document {document_id}", self.annotations.len());
        Ok(self.annotations.len())
    }

    /// Reload the cached document's annotations.
    pub async fn refresh(&mut self) -> BackendResult<usize> {
        match self.document_id {
            Some(id) => self.load(id).await,
            None => Ok(0),
        }
    }

    /// Store a new annotation and refresh the cache.
    ///
    /// If the refresh fails after a successful create, the stored record is
    /// kept in the cache and the create still counts as a success.
    pub async fn save(&mut self, annotation: &Annotation) -> BackendResult<Annotation> {
        let stored = self.backend.create_annotation(annotation).await?;
        log::info!(
            "Saved annotation {:?} ({}) on page {}",
            stored.id,
            stored.value,
            stored.page
        );
        if self.document_id != Some(stored.document_id) {
            return Ok(stored);
        }
        let fetched = self.backend.annotations(stored.document_id).await;
        match fetched {
            Ok(annotations) => self.annotations = annotations,
            Err(err) => {
                log::warn!("Refresh after save failed: {err}");
                self.annotations.push(stored.clone());
            }
        }
        Ok(stored)
    }

    /// Forget the cached document.
    pub fn clear(&mut self) {
        self.document_id = None;
        self.annotations.clear();
    }

    pub async fn documents_with_annotations(&self) -> BackendResult<Vec<DocumentSummary>> {
        self.backend.documents_with_annotations().await
    }

    pub async fn document(&self, id: DocumentId) -> BackendResult<DocumentDescriptor> {
        self.backend.document(id).await
    }

    pub async fn upload_document(&self, upload: DocumentUpload) -> BackendResult<DocumentDescriptor> {
        self.backend.upload_document(upload).await
    }

    pub async fn document_types(&self) -> BackendResult<Vec<DocumentType>> {
        self.backend.document_types().await
    }

    /// Label choices for documents of a type.
    pub async fn data_elements(&self, document_type_id: DocumentTypeId) -> BackendResult<Vec<DataElement>> {
        self.backend.data_elements(document_type_id).await
    }
}
