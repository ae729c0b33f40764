//! Drag-to-draw interaction on the overlay surface.

use crate::annotation::{MIN_ANNOTATION_SIZE, check_min_size};
use crate::input::{MouseButton, PointerEvent};
use crate::mode::ViewerMode;
use crate::transform::ViewportTransform;
use kurbo::{Point, Rect};

/// A rectangle being dragged out, in document space. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragProposal {
    /// Where the drag started.
    pub start: Point,
    /// Where the pointer is now.
    pub current: Point,
}

impl DragProposal {
    /// The dragged rectangle with a non-negative width and height.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current).abs()
    }
}

/// State of the drag interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing(DragProposal),
}

/// What the session should do after a pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// Nothing changed.
    Ignored,
    /// A drag started.
    Started,
    /// The live rectangle moved: redraw persisted annotations, then this.
    Preview(Rect),
    /// The drag was abandoned: redraw persisted annotations.
    Cancelled,
    /// The drag ended below the minimum size and was discarded.
    TooSmall(Rect),
    /// The drag ended with a usable rectangle (document space).
    Proposal(Rect),
}

/// Turns overlay pointer events into annotation proposals.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: DrawState,
    /// Minimum width/height in device pixels.
    pub min_annotation_size: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(MIN_ANNOTATION_SIZE)
    }
}

impl InteractionController {
    pub fn new(min_annotation_size: f64) -> Self {
        Self {
            state: DrawState::Idle,
            min_annotation_size,
        }
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing(_))
    }

    /// The live proposal, if a drag is in progress.
    pub fn proposal(&self) -> Option<DragProposal> {
        match self.state {
            DrawState::Drawing(proposal) => Some(proposal),
            DrawState::Idle => None,
        }
    }

    /// Dispatch a pointer event. `transform` must be the transform the
    /// overlay is currently drawn with.
    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        mode: &ViewerMode,
        transform: &ViewportTransform,
    ) -> InteractionOutcome {
        match *event {
            PointerEvent::Down { position, button } => {
                if button != MouseButton::Left {
                    return InteractionOutcome::Ignored;
                }
                self.pointer_down(position, mode, transform)
            }
            PointerEvent::Move { position } => self.pointer_move(position, transform),
            PointerEvent::Up { position, button } => {
                if button != MouseButton::Left {
                    return InteractionOutcome::Ignored;
                }
                self.pointer_up(position, transform)
            }
            PointerEvent::Leave => self.pointer_leave(),
        }
    }

    /// Start a drag if annotation mode is on and no drag is running.
    pub fn pointer_down(
        &mut self,
        position: Point,
        mode: &ViewerMode,
        transform: &ViewportTransform,
    ) -> InteractionOutcome {
        if !mode.is_annotating() || self.is_drawing() {
            return InteractionOutcome::Ignored;
        }
        let start = transform.to_doc(position);
        self.state = DrawState::Drawing(DragProposal {
            start,
            current: start,
        });
        InteractionOutcome::Started
    }

    /// Update the live rectangle.
    pub fn pointer_move(&mut self, position: Point, transform: &ViewportTransform) -> InteractionOutcome {
        match &mut self.state {
            DrawState::Drawing(proposal) => {
                proposal.current = transform.to_doc(position);
                InteractionOutcome::Preview(proposal.rect())
            }
            DrawState::Idle => InteractionOutcome::Ignored,
        }
    }

    /// Finish the drag. Always returns to idle.
    pub fn pointer_up(&mut self, position: Point, transform: &ViewportTransform) -> InteractionOutcome {
        let DrawState::Drawing(mut proposal) = std::mem::take(&mut self.state) else {
            return InteractionOutcome::Ignored;
        };
        proposal.current = transform.to_doc(position);
        let rect = proposal.rect();
        let on_screen = transform.rect_to_screen(rect).size();
        match check_min_size(on_screen, self.min_annotation_size) {
            Ok(()) => InteractionOutcome::Proposal(rect),
            Err(err) => {
                log::debug!("Discarding drag: {err}");
                InteractionOutcome::TooSmall(rect)
            }
        }
    }

    /// The pointer left the overlay: abandon the drag.
    pub fn pointer_leave(&mut self) -> InteractionOutcome {
        if self.cancel() {
            InteractionOutcome::Cancelled
        } else {
            InteractionOutcome::Ignored
        }
    }

    /// Abandon any drag in progress. Returns true if one was running.
    pub fn cancel(&mut self) -> bool {
        let was_drawing = self.is_drawing();
        self.state = DrawState::Idle;
        was_drawing
    }
}
