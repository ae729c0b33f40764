//! In-memory document, annotation and taxonomy catalog.

use crate::error::{ApiError, ApiResult};
use crate::seed::{SEED_TYPES, SeedType};
use chrono::Utc;
use dashmap::DashMap;
use pagemark_core::{
    Annotation, AnnotationId, DataElement, DocumentDescriptor, DocumentId, DocumentSummary, DocumentType,
    DocumentTypeId,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

pub const DOCUMENT_NOT_FOUND: &str = "Document not found.";

/// Shared server state. Documents live behind one lock so that
/// create-or-update by file path is atomic.
pub struct Catalog {
    documents: RwLock<BTreeMap<DocumentId, DocumentDescriptor>>,
    annotations: DashMap<DocumentId, Vec<Annotation>>,
    document_types: Vec<DocumentType>,
    data_elements: HashMap<DocumentTypeId, Vec<DataElement>>,
    next_document_id: AtomicI64,
    next_annotation_id: AtomicI64,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            annotations: DashMap::new(),
            document_types: Vec::new(),
            data_elements: HashMap::new(),
            next_document_id: AtomicI64::new(1),
            next_annotation_id: AtomicI64::new(1),
        }
    }

    /// A catalog holding the built-in document types.
    pub fn seeded() -> Self {
        let mut catalog = Self::new();
        for seed in SEED_TYPES {
            catalog.add_document_type(seed);
        }
        tracing::info!("Seeded {} document types", catalog.document_types.len());
        catalog
    }

    /// Registers a type and its elements. Element ids continue across types,
    /// so elements shared by name still get distinct ids.
    pub fn add_document_type(&mut self, seed: &SeedType) -> DocumentTypeId {
        let id = self.document_types.len() as DocumentTypeId + 1;
        let first_element = self.data_elements.values().map(Vec::len).sum::<usize>() as i64 + 1;
        self.document_types.push(DocumentType {
            id,
            name: seed.name.to_string(),
            description: Some(seed.description.to_string()),
        });
        let elements = seed
            .elements
            .iter()
            .zip(first_element..)
            .map(|(&(name, description), element_id)| DataElement {
                id: element_id,
                name: name.to_string(),
                description: Some(description.to_string()),
            })
            .collect();
        self.data_elements.insert(id, elements);
        id
    }

    /// Creates a record for `file_path`, or refreshes the upload time of the
    /// existing one. A given type overwrites the stored type.
    pub fn upsert_document(
        &self,
        file_path: &str,
        document_type_id: Option<DocumentTypeId>,
    ) -> ApiResult<DocumentDescriptor> {
        let mut documents = self.documents.write().map_err(ApiError::lock)?;
        let now = Utc::now();

        if let Some(existing) = documents.values_mut().find(|d| d.file_path == file_path) {
            existing.uploaded_at = now;
            if document_type_id.is_some() {
                existing.document_type_id = document_type_id;
            }
            tracing::info!("Updated document {} ({file_path})", existing.id);
            return Ok(existing.clone());
        }

        let id = self.next_document_id.fetch_add(1, Ordering::SeqCst);
        let document = DocumentDescriptor {
            id,
            file_path: file_path.to_string(),
            uploaded_at: now,
            document_type_id,
        };
        documents.insert(id, document.clone());
        tracing::info!("Created document {id} ({file_path})");
        Ok(document)
    }

    pub fn documents(&self, skip: usize, limit: usize) -> ApiResult<Vec<DocumentDescriptor>> {
        let documents = self.documents.read().map_err(ApiError::lock)?;
        Ok(documents.values().skip(skip).take(limit).cloned().collect())
    }

    pub fn document(&self, id: DocumentId) -> ApiResult<DocumentDescriptor> {
        let documents = self.documents.read().map_err(ApiError::lock)?;
        documents
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(DOCUMENT_NOT_FOUND.to_string()))
    }

    pub fn documents_with_annotations(&self) -> ApiResult<Vec<DocumentSummary>> {
        let documents = self.documents.read().map_err(ApiError::lock)?;
        Ok(documents
            .values()
            .map(|d| DocumentSummary {
                id: d.id,
                file_path: d.file_path.clone(),
                uploaded_at: d.uploaded_at,
                annotation_count: self.annotations.get(&d.id).map_or(0, |a| a.len()),
            })
            .collect())
    }

    /// Validates and stores an annotation, assigning its id and timestamp.
    pub fn create_annotation(&self, mut annotation: Annotation) -> ApiResult<Annotation> {
        annotation
            .validate()
            .map_err(|e| ApiError::Unprocessable(e.to_string()))?;
        self.document(annotation.document_id)?;

        let id: AnnotationId = self.next_annotation_id.fetch_add(1, Ordering::SeqCst);
        annotation.id = Some(id);
        annotation.created_at = Some(Utc::now());
        self.annotations
            .entry(annotation.document_id)
            .or_default()
            .push(annotation.clone());
        tracing::debug!(
            "Created annotation {id} on document {} page {}",
            annotation.document_id,
            annotation.page
        );
        Ok(annotation)
    }

    /// Annotations of a document in creation order. Unknown documents have none.
    pub fn annotations(&self, document_id: DocumentId) -> Vec<Annotation> {
        self.annotations
            .get(&document_id)
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    pub fn document_types(&self) -> &[DocumentType] {
        &self.document_types
    }

    pub fn data_elements(&self, document_type_id: DocumentTypeId) -> Vec<DataElement> {
        self.data_elements
            .get(&document_type_id)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(document_id: DocumentId, value: &str) -> Annotation {
        Annotation {
            id: None,
            document_id,
            page: 1,
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 15.0,
            value: value.to_string(),
            annotation_value: None,
            created_at: None,
        }
    }

    #[test]
    fn test_seeded_taxonomy() {
        let catalog = Catalog::seeded();
        let types = catalog.document_types();
        assert_eq!(types.len(), 2);
        assert_eq!(types[0].name, "Credit Agreement");
        assert_eq!(types[1].name, "Draw Notice");

        let credit = catalog.data_elements(1);
        assert_eq!(credit.len(), 20);
        assert_eq!(credit[0].id, 1);
        assert_eq!(credit[19].name, "Payment Instructions");

        let draw = catalog.data_elements(2);
        assert_eq!(draw.len(), 8);
        assert_eq!(draw[0].id, 21);
        assert_eq!(draw[0].name, "Borrower Name");

        assert!(catalog.data_elements(99).is_empty());
    }

    #[test]
    fn test_upsert_reuses_record() {
        let catalog = Catalog::new();
        let first = catalog.upsert_document("a.pdf", None).unwrap();
        let second = catalog.upsert_document("a.pdf", Some(2)).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.document_type_id, Some(2));
        assert!(second.uploaded_at >= first.uploaded_at);

        let third = catalog.upsert_document("a.pdf", None).unwrap();
        assert_eq!(third.document_type_id, Some(2));
        assert_eq!(catalog.documents(0, 100).unwrap().len(), 1);
    }

    #[test]
    fn test_pagination() {
        let catalog = Catalog::new();
        for name in ["a.pdf", "b.pdf", "c.pdf"] {
            catalog.upsert_document(name, None).unwrap();
        }
        let page = catalog.documents(1, 1).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].file_path, "b.pdf");
    }

    #[test]
    fn test_create_annotation() {
        let catalog = Catalog::new();
        let doc = catalog.upsert_document("a.pdf", None).unwrap();

        let stored = catalog.create_annotation(annotation(doc.id, "Borrower Name")).unwrap();
        assert_eq!(stored.id, Some(1));
        assert!(stored.created_at.is_some());
        assert_eq!(catalog.annotations(doc.id), vec![stored]);

        let summary = catalog.documents_with_annotations().unwrap();
        assert_eq!(summary[0].annotation_count, 1);
    }

    #[test]
    fn test_create_annotation_errors() {
        let catalog = Catalog::new();
        assert!(matches!(
            catalog.create_annotation(annotation(7, "Borrower Name")),
            Err(ApiError::NotFound(_))
        ));

        let doc = catalog.upsert_document("a.pdf", None).unwrap();
        assert!(matches!(
            catalog.create_annotation(annotation(doc.id, "  ")),
            Err(ApiError::Unprocessable(_))
        ));
        assert!(catalog.annotations(doc.id).is_empty());
    }
}
