//! Pagemark Core Library
//!
//! Platform-agnostic viewer logic: coordinate transforms, render scheduling,
//! the drag-to-draw interaction and the annotation cache.

pub mod annotation;
pub mod debounce;
pub mod document;
pub mod engine;
pub mod input;
pub mod interaction;
pub mod mode;
pub mod scheduler;
pub mod store;
pub mod surface;
pub mod transform;
pub mod viewport;

pub use annotation::{Annotation, AnnotationError, AnnotationId, DocumentId, MIN_ANNOTATION_SIZE};
pub use debounce::{DEFAULT_RESIZE_DEBOUNCE, Debouncer};
pub use document::{DataElement, DocumentDescriptor, DocumentSummary, DocumentType, DocumentTypeId, DocumentUpload};
pub use engine::{EngineError, RasterDocument, RasterEngine, RasterPage, RasterTask, RenderOutcome};
pub use input::{InputEvent, MouseButton, NavigationCommand, PointerEvent, ZoomCommand};
pub use interaction::{DrawState, InteractionController, InteractionOutcome};
pub use mode::ViewerMode;
pub use scheduler::{PageGeometry, RenderEvent, RenderScheduler, RenderTarget};
pub use store::{AnnotationBackend, AnnotationStore, BackendError, BackendResult, MemoryBackend};
pub use surface::{PageViewport, SizedSurface, Surface, SurfaceSize};
pub use transform::{Rotation, ViewportTransform};
pub use viewport::ViewportState;
