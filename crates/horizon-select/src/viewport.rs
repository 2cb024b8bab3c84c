//! Debounced scroll-into-view coalescing.
//!
//! Rapid key-repeat can move the active option many times per frame; the
//! coalescer collapses those movements into at most one scroll request per
//! debounce window, carrying the most recent target. It is a pure
//! presentation concern: it never influences which option becomes active,
//! and an engine built with `without_scroll_sync` drops it entirely for
//! headless use.
//!
//! There is no clock inside. The host pumps
//! [`process_at`](ScrollCoalescer::process_at) with its own `Instant`, the
//! same discipline the core [`TimerManager`] uses.

use std::time::{Duration, Instant};

use horizon_select_core::{TimerId, TimerManager};

use crate::snapshot::OptionKey;

/// The default debounce window for scroll-into-view requests.
pub const DEFAULT_SCROLL_DEBOUNCE: Duration = Duration::from_millis(50);

/// Coalesces scroll-into-view requests onto a timer window.
///
/// A request marks its row as the pending scroll target, replacing any
/// earlier pending target. The first pump after a request opens the debounce
/// window; the pump after the window elapses flushes the latest target.
#[derive(Debug)]
pub struct ScrollCoalescer {
    timers: TimerManager,
    window: Duration,
    pending: Option<OptionKey>,
    gate: Option<TimerId>,
}

impl ScrollCoalescer {
    /// Create a coalescer with the given debounce window.
    pub fn new(window: Duration) -> Self {
        Self {
            timers: TimerManager::new(),
            window,
            pending: None,
            gate: None,
        }
    }

    /// The debounce window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record `key` as the row to scroll into view.
    ///
    /// Replaces any earlier pending target; only the latest survives to the
    /// flush.
    pub fn request(&mut self, key: OptionKey) {
        tracing::trace!(
            target: "horizon_select::viewport",
            key = key.as_u64(),
            replaced = self.pending.is_some(),
            "scroll request pending"
        );
        self.pending = Some(key);
    }

    /// Whether a scroll request is waiting to be flushed.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending request and close the window.
    pub fn cancel(&mut self) {
        self.pending = None;
        if let Some(id) = self.gate.take() {
            let _ = self.timers.stop(id);
        }
    }

    /// Pump the coalescer at `now`.
    ///
    /// Returns the row to scroll into view when the debounce window has
    /// elapsed, `None` otherwise.
    pub fn process_at(&mut self, now: Instant) -> Option<OptionKey> {
        if let Some(id) = self.gate {
            if !self.timers.process_expired(now).contains(&id) {
                return None;
            }
            self.gate = None;
            return self.flush();
        }

        if self.pending.is_none() {
            return None;
        }

        if self.window.is_zero() {
            return self.flush();
        }

        // First pump after a request opens the window.
        self.gate = Some(self.timers.start_one_shot(now, self.window));
        None
    }

    /// The time from `now` until the open window elapses, if one is open.
    pub fn time_until_flush(&mut self, now: Instant) -> Option<Duration> {
        self.gate?;
        self.timers.time_until_next(now)
    }

    fn flush(&mut self) -> Option<OptionKey> {
        let key = self.pending.take()?;
        tracing::trace!(
            target: "horizon_select::viewport",
            key = key.as_u64(),
            "scroll request flushed"
        );
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flushes_after_window() {
        let mut coalescer = ScrollCoalescer::new(Duration::from_millis(50));
        let key = OptionKey::new();
        let t0 = Instant::now();

        coalescer.request(key);
        assert_eq!(coalescer.process_at(t0), None); // window opens
        assert_eq!(coalescer.process_at(t0 + Duration::from_millis(20)), None);
        assert_eq!(
            coalescer.process_at(t0 + Duration::from_millis(60)),
            Some(key)
        );
        assert!(!coalescer.has_pending());
    }

    #[test]
    fn test_coalesces_to_latest_request() {
        let mut coalescer = ScrollCoalescer::new(Duration::from_millis(50));
        let (first, second) = (OptionKey::new(), OptionKey::new());
        let t0 = Instant::now();

        coalescer.request(first);
        assert_eq!(coalescer.process_at(t0), None);
        coalescer.request(second);
        assert_eq!(
            coalescer.process_at(t0 + Duration::from_millis(60)),
            Some(second)
        );
        // Nothing left for a later pump.
        assert_eq!(coalescer.process_at(t0 + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_zero_window_flushes_immediately() {
        let mut coalescer = ScrollCoalescer::new(Duration::ZERO);
        let key = OptionKey::new();

        coalescer.request(key);
        assert_eq!(coalescer.process_at(Instant::now()), Some(key));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut coalescer = ScrollCoalescer::new(Duration::from_millis(50));
        let t0 = Instant::now();

        coalescer.request(OptionKey::new());
        assert_eq!(coalescer.process_at(t0), None);
        coalescer.cancel();
        assert_eq!(coalescer.process_at(t0 + Duration::from_millis(60)), None);
    }

    #[test]
    fn test_pump_without_request_is_idle() {
        let mut coalescer = ScrollCoalescer::new(Duration::from_millis(50));
        let now = Instant::now();
        assert_eq!(coalescer.process_at(now), None);
        assert_eq!(coalescer.time_until_flush(now), None);
    }

    #[test]
    fn test_time_until_flush_tracks_window() {
        let mut coalescer = ScrollCoalescer::new(Duration::from_millis(50));
        let t0 = Instant::now();

        coalescer.request(OptionKey::new());
        coalescer.process_at(t0);
        assert_eq!(
            coalescer.time_until_flush(t0 + Duration::from_millis(10)),
            Some(Duration::from_millis(40))
        );
    }
}
