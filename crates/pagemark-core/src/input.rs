//! Abstract input events consumed by a viewer session.
//!
//! Hosts translate their concrete window/DOM events into these, with pointer
//! positions already in overlay pixel-buffer coordinates.

use crate::annotation::AnnotationId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer events on the overlay surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Move { position: Point },
    Up { position: Point, button: MouseButton },
    /// The pointer left the overlay surface.
    Leave,
}

/// Page navigation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationCommand {
    Next,
    Previous,
    First,
    Last,
    GoTo(u32),
}

/// Zoom requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoomCommand {
    In,
    Out,
    Set(f64),
}

/// Everything a viewer session reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Navigate(NavigationCommand),
    Zoom(ZoomCommand),
    /// Rotate the view a quarter turn clockwise.
    Rotate,
    /// The window was resized or moved to a display with another density.
    Resize { device_pixel_ratio: f64 },
    ToggleAnnotationMode,
    ToggleAnnotationsVisible,
    /// Highlight one annotation (e.g. hovered in a list), or none.
    Highlight(Option<AnnotationId>),
}

impl From<PointerEvent> for InputEvent {
    fn from(event: PointerEvent) -> Self {
        InputEvent::Pointer(event)
    }
}
