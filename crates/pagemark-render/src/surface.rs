//! Overlay drawing surface.

use kurbo::{Point, Rect};
use pagemark_core::surface::{Surface, SurfaceSize};
use peniko::Color;
use peniko::color::Rgba8;

/// Outline style for rectangles.
#[derive(Debug, Clone, Copy)]
pub struct StrokeStyle {
    pub color: Color,
    /// Line width in device pixels.
    pub width: f64,
}

/// Label style.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub color: Color,
    /// Font size in device pixels.
    pub font_size: f64,
}

/// A surface annotations can be drawn on. Coordinates are pixel-buffer
/// coordinates of the surface.
pub trait OverlaySurface: Surface {
    /// Erase everything.
    fn clear(&mut self);

    fn stroke_rect(&mut self, rect: Rect, style: &StrokeStyle);

    /// Draw text with its baseline starting at `origin`.
    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle);
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    StrokeRect { rect: Rect, color: Rgba8, width: f64 },
    Text { text: String, origin: Point, color: Rgba8, font_size: f64 },
}

/// Overlay surface that records a display list instead of pixels.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
    clears: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands drawn since the last clear or resize.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Number of clears, resizes included.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// Stroked rectangles with their colors and widths.
    pub fn stroked_rects(&self) -> Vec<(Rect, Rgba8, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokeRect { rect, color, width } => Some((*rect, *color, *width)),
                DrawCommand::Text { .. } => None,
            })
            .collect()
    }

    /// Drawn label texts.
    pub fn labels(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                DrawCommand::StrokeRect { .. } => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
        self.clear();
    }

    fn size(&self) -> SurfaceSize {
        self.size
    }
}

impl OverlaySurface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn stroke_rect(&mut self, rect: Rect, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokeRect {
            rect,
            color: style.color.to_rgba8(),
            width: style.width,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            color: style.color.to_rgba8(),
            font_size: style.font_size,
        });
    }
}
