//! Keyboard shortcut registry and documentation.

use pagemark_core::input::{InputEvent, NavigationCommand, PointerEvent, ZoomCommand};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub event: InputEvent,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        event: InputEvent,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            event,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+0").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == ctrl && self.shift == shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use InputEvent::*;
        vec![
            Shortcut::new("ArrowRight", false, false, "Next page", Navigate(NavigationCommand::Next)),
            Shortcut::new("PageDown", false, false, "Next page", Navigate(NavigationCommand::Next)),
            Shortcut::new("ArrowLeft", false, false, "Previous page", Navigate(NavigationCommand::Previous)),
            Shortcut::new("PageUp", false, false, "Previous page", Navigate(NavigationCommand::Previous)),
            Shortcut::new("Home", false, false, "First page", Navigate(NavigationCommand::First)),
            Shortcut::new("End", false, false, "Last page", Navigate(NavigationCommand::Last)),
            Shortcut::new("=", true, false, "Zoom in", Zoom(ZoomCommand::In)),
            Shortcut::new("-", true, false, "Zoom out", Zoom(ZoomCommand::Out)),
            Shortcut::new("0", true, false, "Reset zoom", Zoom(ZoomCommand::Set(1.0))),
            Shortcut::new("R", false, false, "Rotate clockwise", Rotate),
            Shortcut::new("A", false, false, "Toggle annotation mode", ToggleAnnotationMode),
            Shortcut::new("H", false, false, "Show/hide annotations", ToggleAnnotationsVisible),
            Shortcut::new("Escape", false, false, "Cancel current drag", Pointer(PointerEvent::Leave)),
        ]
    }

    /// The event bound to a key press, if any.
    pub fn lookup(key: &str, ctrl: bool, shift: bool) -> Option<InputEvent> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, ctrl, shift))
            .map(|s| s.event)
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(ShortcutRegistry::lookup("a", false, false), Some(InputEvent::ToggleAnnotationMode));
        assert_eq!(ShortcutRegistry::lookup("R", false, false), Some(InputEvent::Rotate));
    }

    #[test]
    fn test_modifiers_must_match() {
        assert_eq!(ShortcutRegistry::lookup("0", false, false), None);
        assert_eq!(
            ShortcutRegistry::lookup("0", true, false),
            Some(InputEvent::Zoom(ZoomCommand::Set(1.0)))
        );
    }

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("=", true, false, "Zoom in", InputEvent::Zoom(ZoomCommand::In));
        assert_eq!(shortcut.format(), "Ctrl+=");
    }
}
