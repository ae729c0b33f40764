//! Trailing-edge debouncing against caller-supplied instants.

use std::time::{Duration, Instant};

/// Default resize debounce window.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Keeps the latest pushed value and releases it once no new value has
/// arrived for a whole window.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_RESIZE_DEBOUNCE)
    }
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a value, restarting the window.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the value if its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let (_, at) = self.pending.as_ref()?;
        if now.saturating_duration_since(*at) < self.window {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_window() {
        let start = Instant::now();
        let mut d = Debouncer::default();
        d.push(2.0, start);
        assert_eq!(d.poll(start + Duration::from_millis(149)), None);
        assert_eq!(d.poll(start + Duration::from_millis(150)), Some(2.0));
        assert!(!d.is_pending());
        assert_eq!(d.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_burst_keeps_latest_and_restarts_window() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.push(1, start);
        d.push(2, start + Duration::from_millis(80));
        d.push(3, start + Duration::from_millis(160));
        assert_eq!(d.poll(start + Duration::from_millis(200)), None);
        assert_eq!(d.poll(start + Duration::from_millis(260)), Some(3));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::ZERO);
        d.push("resize", start);
        d.cancel();
        assert_eq!(d.poll(start), None);
    }
}
