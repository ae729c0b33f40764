//! Raster engine abstraction.
//!
//! The engine that turns a page into pixels is an external collaborator.
//! Hosts plug one in through these traits; rendering is started
//! synchronously and its completion is observed by polling the task.

mod memory;

pub use memory::{MemoryEngine, MemoryPage, RenderLog, RenderRecord};

use crate::surface::{PageViewport, SurfaceSize};
use crate::transform::Rotation;
use thiserror::Error;

/// Raster engine errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Failed to open document {url}: {reason}")]
    Open { url: String, reason: String },
    #[error("Page {page} is out of range (document has {page_count} pages)")]
    PageOutOfRange { page: u32, page_count: u32 },
    #[error("Failed to load page {page}: {reason}")]
    PageLoad { page: u32, reason: String },
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// How a raster task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Success,
    /// The task was cancelled before it finished. Not an error.
    Cancelled,
    Failed(String),
}

/// Opens documents.
pub trait RasterEngine {
    /// Open the document at `url`.
    fn open(&mut self, url: &str) -> EngineResult<Box<dyn RasterDocument>>;
}

/// An opened document.
pub trait RasterDocument {
    fn page_count(&self) -> u32;

    /// Load a 1-based page.
    fn page(&mut self, page: u32) -> EngineResult<Box<dyn RasterPage>>;
}

/// A loaded page.
pub trait RasterPage {
    /// Intrinsic rotation stored in the document.
    fn rotation(&self) -> Rotation;

    /// Page dimensions in layout pixels at `scale`, rotated by the total
    /// rotation `rotation`.
    fn viewport(&self, scale: f64, rotation: Rotation) -> PageViewport;

    /// Start rasterizing `viewport` into a pixel buffer of `target` size.
    fn render(&mut self, viewport: PageViewport, target: SurfaceSize) -> Box<dyn RasterTask>;
}

/// An in-flight rasterization.
pub trait RasterTask {
    /// Request cancellation. The task later reports
    /// [`RenderOutcome::Cancelled`] unless it had already finished.
    fn cancel(&mut self);

    /// The outcome, once the task has settled. Reported at most once.
    fn poll_outcome(&mut self) -> Option<RenderOutcome>;
}
