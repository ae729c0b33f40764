//! Rectangular page annotations in document space.

use chrono::{DateTime, Utc};
use kurbo::{Rect, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend-assigned annotation identifier.
pub type AnnotationId = i64;

/// Backend-assigned document identifier.
pub type DocumentId = i64;

/// Minimum width and height of a new annotation, in device pixels at the
/// time it is drawn.
pub const MIN_ANNOTATION_SIZE: f64 = 10.0;

/// Annotation validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnotationError {
    #[error("Annotation is too small: {width:.1}x{height:.1} px (minimum {min} px)")]
    TooSmall { width: f64, height: f64, min: f64 },
    #[error("Annotation label is required")]
    EmptyLabel,
    #[error("Annotation geometry must be non-negative")]
    NegativeGeometry,
}

/// A labelled rectangle on one page of a document.
///
/// Geometry is in unscaled, unrotated document units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Absent until the backend has stored the annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AnnotationId>,
    pub document_id: DocumentId,
    /// 1-based page number.
    pub page: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Label, usually a data element name of the document type.
    pub value: String,
    /// Captured content for the label.
    #[serde(default)]
    pub annotation_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Annotation {
    /// Build an unsaved annotation from a document-space rectangle.
    pub fn proposal(
        document_id: DocumentId,
        page: u32,
        rect: Rect,
        value: impl Into<String>,
        annotation_value: Option<String>,
    ) -> Self {
        let rect = rect.abs();
        Self {
            id: None,
            document_id,
            page,
            x: rect.x0,
            y: rect.y0,
            width: rect.width(),
            height: rect.height(),
            value: value.into(),
            annotation_value,
            created_at: None,
        }
    }

    /// The annotation's rectangle in document space.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Whether the backend has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Check the invariants that must hold before submission.
    pub fn validate(&self) -> Result<(), AnnotationError> {
        if [self.x, self.y, self.width, self.height]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(AnnotationError::NegativeGeometry);
        }
        if self.value.trim().is_empty() {
            return Err(AnnotationError::EmptyLabel);
        }
        Ok(())
    }
}

/// Check a drawn rectangle's on-screen size against the minimum.
pub fn check_min_size(screen_size: Size, min: f64) -> Result<(), AnnotationError> {
    if screen_size.width < min || screen_size.height < min {
        return Err(AnnotationError::TooSmall {
            width: screen_size.width,
            height: screen_size.height,
            min,
        });
    }
    Ok(())
}
