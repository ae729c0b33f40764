//! Annotation overlay drawing.

use crate::surface::{OverlaySurface, StrokeStyle, TextStyle};
use kurbo::{Rect, Vec2};
use pagemark_core::annotation::{Annotation, AnnotationId};
use pagemark_core::transform::ViewportTransform;
use peniko::Color;

/// Colors and sizes used on the overlay.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyle {
    pub annotation: StrokeStyle,
    pub highlight: StrokeStyle,
    /// Live rectangle while dragging.
    pub proposal: StrokeStyle,
    pub label_font_size: f64,
    /// Label position relative to the rectangle's top-left screen corner.
    pub label_offset: Vec2,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            annotation: StrokeStyle {
                color: Color::from_rgba8(255, 0, 0, 255),
                width: 2.0,
            },
            highlight: StrokeStyle {
                color: Color::from_rgba8(255, 165, 0, 255),
                width: 3.0,
            },
            proposal: StrokeStyle {
                color: Color::from_rgba8(0, 0, 255, 255),
                width: 2.0,
            },
            label_font_size: 12.0,
            label_offset: Vec2::new(0.0, -5.0),
        }
    }
}

/// Inputs of one overlay redraw.
pub struct OverlayContext<'a> {
    /// All cached annotations of the document; only `page` is drawn.
    pub annotations: &'a [Annotation],
    pub page: u32,
    pub transform: ViewportTransform,
    pub annotations_visible: bool,
    pub highlighted: Option<AnnotationId>,
    /// Live drag rectangle in document space.
    pub proposal: Option<Rect>,
}

impl<'a> OverlayContext<'a> {
    pub fn new(annotations: &'a [Annotation], page: u32, transform: ViewportTransform) -> Self {
        Self {
            annotations,
            page,
            transform,
            annotations_visible: true,
            highlighted: None,
            proposal: None,
        }
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.annotations_visible = visible;
        self
    }

    pub fn with_highlight(mut self, id: Option<AnnotationId>) -> Self {
        self.highlighted = id;
        self
    }

    pub fn with_proposal(mut self, proposal: Option<Rect>) -> Self {
        self.proposal = proposal;
        self
    }
}

/// Redraws the annotation overlay from scratch.
#[derive(Debug, Clone, Default)]
pub struct AnnotationOverlay {
    pub style: OverlayStyle,
}

impl AnnotationOverlay {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Clear the surface and draw the page's annotations, then the live
    /// proposal if any. Returns the number of persisted annotations drawn.
    pub fn redraw(&self, surface: &mut dyn OverlaySurface, ctx: &OverlayContext<'_>) -> usize {
        surface.clear();

        let mut drawn = 0;
        if ctx.annotations_visible {
            for annotation in ctx.annotations.iter().filter(|a| a.page == ctx.page) {
                let highlighted = annotation.id.is_some() && annotation.id == ctx.highlighted;
                self.draw_annotation(surface, annotation, &ctx.transform, highlighted);
                drawn += 1;
            }
        }

        if let Some(proposal) = ctx.proposal {
            self.draw_proposal(surface, proposal, &ctx.transform);
        }

        log::trace!("Overlay redraw: {drawn} annotations on page {}", ctx.page);
        drawn
    }

    /// Draw the live drag rectangle on top of what is already there.
    pub fn draw_proposal(&self, surface: &mut dyn OverlaySurface, proposal: Rect, transform: &ViewportTransform) {
        surface.stroke_rect(transform.rect_to_screen(proposal), &self.style.proposal);
    }

    fn draw_annotation(
        &self,
        surface: &mut dyn OverlaySurface,
        annotation: &Annotation,
        transform: &ViewportTransform,
        highlighted: bool,
    ) {
        let stroke = if highlighted {
            &self.style.highlight
        } else {
            &self.style.annotation
        };
        let screen = transform.rect_to_screen(annotation.rect());
        surface.stroke_rect(screen, stroke);

        let text = TextStyle {
            color: stroke.color,
            font_size: self.style.label_font_size,
        };
        surface.fill_text(&annotation.value, screen.origin() + self.style.label_offset, &text);
    }
}
