//! Surface sizing shared by the raster and overlay surfaces.
//!
//! Both surfaces of a viewer are always resized from the same
//! [`SurfaceSize`], which keeps annotations registered on top of the raster.

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Page dimensions in layout pixels, as resolved by the raster engine for a
/// given scale and rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageViewport {
    pub width: f64,
    pub height: f64,
}

impl PageViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Pixel-buffer and layout dimensions of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Pixel buffer width (device pixels).
    pub pixel_width: u32,
    /// Pixel buffer height (device pixels).
    pub pixel_height: u32,
    /// Layout size (CSS-style pixels).
    pub layout: Size,
}

impl SurfaceSize {
    /// Size a surface for a page viewport on a display with the given
    /// device pixel ratio.
    pub fn for_viewport(viewport: PageViewport, device_pixel_ratio: f64) -> Self {
        Self {
            pixel_width: to_pixels(viewport.width * device_pixel_ratio),
            pixel_height: to_pixels(viewport.height * device_pixel_ratio),
            layout: viewport.size(),
        }
    }

    /// Whether the surface has no drawable pixels.
    pub fn is_empty(&self) -> bool {
        self.pixel_width == 0 || self.pixel_height == 0
    }
}

fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// A drawable surface that can be resized.
pub trait Surface {
    /// Resize the surface. Resizing discards the current contents.
    fn resize(&mut self, size: SurfaceSize);

    /// Current size of the surface.
    fn size(&self) -> SurfaceSize;
}

/// A surface that only tracks its size (the raster engine owns the pixels).
#[derive(Debug, Clone, Default)]
pub struct SizedSurface {
    size: SurfaceSize,
    resizes: usize,
}

impl SizedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the surface has been resized.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }
}

impl Surface for SizedSurface {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.resizes += 1;
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }
}
