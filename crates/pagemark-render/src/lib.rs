//! Pagemark Render Library
//!
//! Draws annotations onto the overlay surface that sits above the raster.
//! Drawing goes through the [`OverlaySurface`] trait; [`RecordingSurface`]
//! keeps a display list and serves as the headless backend.

mod overlay;
mod surface;

pub use overlay::{AnnotationOverlay, OverlayContext, OverlayStyle};
pub use surface::{DrawCommand, OverlaySurface, RecordingSurface, StrokeStyle, TextStyle};
