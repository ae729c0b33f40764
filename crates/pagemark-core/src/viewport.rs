//! Viewport state for a viewer session.

use crate::transform::{Rotation, ViewportTransform};
use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Smallest zoom factor.
pub const DEFAULT_MIN_SCALE: f64 = 0.5;
/// Largest zoom factor.
pub const DEFAULT_MAX_SCALE: f64 = 3.0;
/// Zoom factor of a freshly loaded document.
pub const DEFAULT_SCALE: f64 = 1.0;
/// Zoom increment for zoom in/out.
pub const DEFAULT_ZOOM_STEP: f64 = 0.25;

/// Zoom, density, rotation and page position of the viewer.
///
/// Only the navigation, zoom and resize handlers write to this; everything
/// else reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Current zoom factor, within `[min_scale, max_scale]`.
    pub scale: f64,
    /// Device pixels per layout pixel (at least 1).
    pub device_pixel_ratio: f64,
    /// User rotation applied on top of the page's own rotation.
    pub rotation: Rotation,
    /// Current page, 1-based, within `[1, page_count]`.
    pub current_page: u32,
    /// Number of pages in the loaded document.
    pub page_count: u32,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_step: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            device_pixel_ratio: 1.0,
            rotation: Rotation::Deg0,
            current_page: 1,
            page_count: 1,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_step: DEFAULT_ZOOM_STEP,
        }
    }
}

impl ViewportState {
    /// Create a viewport for a document with the given page count.
    pub fn new(page_count: u32) -> Self {
        Self {
            page_count: page_count.max(1),
            ..Self::default()
        }
    }

    /// Set the zoom limits and step, re-clamping the current scale.
    pub fn with_limits(mut self, min_scale: f64, max_scale: f64, zoom_step: f64) -> Self {
        self.min_scale = min_scale.min(max_scale);
        self.max_scale = max_scale.max(min_scale);
        self.zoom_step = zoom_step.abs();
        self.scale = self.scale.clamp(self.min_scale, self.max_scale);
        self
    }

    /// Set the zoom factor (clamped). Returns true if it changed.
    pub fn set_scale(&mut self, scale: f64) -> bool {
        if !scale.is_finite() {
            return false;
        }
        let new_scale = scale.clamp(self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }
        self.scale = new_scale;
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_scale(self.scale + self.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_scale(self.scale - self.zoom_step)
    }

    /// Set the device pixel ratio (values below 1 are raised to 1).
    /// Returns true if it changed.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) -> bool {
        let ratio = if ratio.is_finite() { ratio.max(1.0) } else { 1.0 };
        if (ratio - self.device_pixel_ratio).abs() < f64::EPSILON {
            return false;
        }
        self.device_pixel_ratio = ratio;
        true
    }

    /// Rotate the view a quarter turn clockwise.
    pub fn rotate_clockwise(&mut self) {
        self.rotation = self.rotation.clockwise();
    }

    /// Jump to a page (clamped). Returns true if the page changed.
    pub fn go_to_page(&mut self, page: u32) -> bool {
        let page = page.clamp(1, self.page_count.max(1));
        if page == self.current_page {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        self.go_to_page(self.page_count)
    }

    /// Build the document-to-screen transform for a page.
    ///
    /// `page_rotation` is the page's intrinsic rotation; the user rotation is
    /// composed on top of it.
    pub fn transform_for(&self, page_size: Size, page_rotation: Rotation) -> ViewportTransform {
        ViewportTransform::new(
            self.scale,
            self.device_pixel_ratio,
            page_rotation.compose(self.rotation),
            page_size,
        )
    }
}
