//! Viewer mode: viewing with optional annotation visibility, or drawing.

use serde::{Deserialize, Serialize};

/// What the viewer is doing.
///
/// Annotations are always visible while drawing, so a freshly drawn
/// annotation can never end up hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewerMode {
    /// Browsing the document.
    Viewing {
        /// Whether persisted annotations are drawn on the overlay.
        annotations_visible: bool,
    },
    /// Drag-to-draw is active on the overlay.
    Annotating,
}

impl Default for ViewerMode {
    fn default() -> Self {
        ViewerMode::Viewing {
            annotations_visible: true,
        }
    }
}

impl ViewerMode {
    /// Whether the overlay should draw persisted annotations.
    pub fn annotations_visible(&self) -> bool {
        match self {
            ViewerMode::Viewing { annotations_visible } => *annotations_visible,
            ViewerMode::Annotating => true,
        }
    }

    /// Whether pointer events on the overlay draw annotations.
    pub fn is_annotating(&self) -> bool {
        matches!(self, ViewerMode::Annotating)
    }

    /// Whether the "show annotations" toggle is enabled.
    pub fn can_toggle_visibility(&self) -> bool {
        !self.is_annotating()
    }

    /// Start drawing. Forces annotations visible.
    pub fn enter_annotating(&mut self) {
        *self = ViewerMode::Annotating;
    }

    /// Stop drawing. The visibility toggle keeps the value it had while
    /// drawing (visible).
    pub fn exit_annotating(&mut self) {
        if self.is_annotating() {
            *self = ViewerMode::Viewing {
                annotations_visible: true,
            };
        }
    }

    /// Flip annotation visibility. Returns false (and does nothing) while
    /// drawing, where the toggle is disabled.
    pub fn toggle_annotations_visible(&mut self) -> bool {
        match self {
            ViewerMode::Viewing { annotations_visible } => {
                *annotations_visible = !*annotations_visible;
                true
            }
            ViewerMode::Annotating => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shows_annotations() {
        let mode = ViewerMode::default();
        assert!(mode.annotations_visible());
        assert!(mode.can_toggle_visibility());
        assert!(!mode.is_annotating());
    }

    #[test]
    fn test_annotating_forces_visible_and_locks_toggle() {
        let mut mode = ViewerMode::Viewing {
            annotations_visible: false,
        };
        mode.enter_annotating();
        assert!(mode.annotations_visible());
        assert!(!mode.can_toggle_visibility());
        assert!(!mode.toggle_annotations_visible());
        assert!(mode.annotations_visible());
    }

    #[test]
    fn test_exit_reenables_toggle_without_changing_value() {
        let mut mode = ViewerMode::default();
        mode.enter_annotating();
        mode.exit_annotating();
        assert!(mode.can_toggle_visibility());
        assert!(mode.annotations_visible());
    }

    #[test]
    fn test_exit_while_viewing_is_noop() {
        let mut mode = ViewerMode::Viewing {
            annotations_visible: false,
        };
        mode.exit_annotating();
        assert!(!mode.annotations_visible());
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut mode = ViewerMode::default();
        assert!(mode.toggle_annotations_visible());
        assert!(!mode.annotations_visible());
        assert!(mode.toggle_annotations_visible());
        assert!(mode.annotations_visible());
    }
}
