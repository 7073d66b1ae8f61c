//! Per-rule debounce gate

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracks the last successful fire of each rule
///
/// Keys are rule ids, so rules sharing an id share a window. Times come
/// from the monotonic clock.
#[derive(Debug, Default)]
pub struct Debouncer {
    last_fire: HashMap<String, Instant>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `rule_id` may fire at `now`.
    ///
    /// A zero window always allows firing and records nothing. Otherwise the
    /// fire is allowed when no earlier fire lies within `window_ms`, and only
    /// an allowed fire moves the window forward.
    pub fn should_fire(&mut self, rule_id: &str, window_ms: u64, now: Instant) -> bool {
        if window_ms == 0 {
            return true;
        }

        let window = Duration::from_millis(window_ms);
        if let Some(last) = self.last_fire.get(rule_id) {
            if now.saturating_duration_since(*last) < window {
                return false;
            }
        }

        self.last_fire.insert(rule_id.to_string(), now);
        true
    }

    /// Forget every recorded fire
    pub fn reset(&mut self) {
        self.last_fire.clear();
    }

    /// Number of rules with a recorded fire
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.last_fire.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_window_blocks_then_reopens() {
        let mut debouncer = Debouncer::new();
        let t0 = Instant::now();

        assert!(debouncer.should_fire("wf_001", 100, t0));
        assert!(!debouncer.should_fire("wf_001", 100, t0 + ms(50)));
        assert!(debouncer.should_fire("wf_001", 100, t0 + ms(150)));
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let mut debouncer = Debouncer::new();
        let t0 = Instant::now();

        assert!(debouncer.should_fire("a", 100, t0));
        assert!(!debouncer.should_fire("a", 100, t0 + ms(99)));
        assert!(debouncer.should_fire("a", 100, t0 + ms(100)));
    }

    #[test]
    fn test_suppressed_fires_do_not_slide_the_window() {
        let mut debouncer = Debouncer::new();
        let t0 = Instant::now();

        assert!(debouncer.should_fire("a", 100, t0));
        for step in [20, 40, 60, 80, 99] {
            assert!(!debouncer.should_fire("a", 100, t0 + ms(step)));
        }
        assert!(debouncer.should_fire("a", 100, t0 + ms(101)));
    }

    #[test]
    fn test_zero_window_never_records() {
        let mut debouncer = Debouncer::new();
        let t0 = Instant::now();

        assert!(debouncer.should_fire("a", 0, t0));
        assert!(debouncer.should_fire("a", 0, t0));
        assert_eq!(debouncer.tracked(), 0);
    }

    #[test]
    fn test_rules_are_independent() {
        let mut debouncer = Debouncer::new();
        let t0 = Instant::now();

        assert!(debouncer.should_fire("a", 100, t0));
        assert!(debouncer.should_fire("b", 100, t0 + ms(10)));
        assert!(!debouncer.should_fire("a", 100, t0 + ms(20)));
    }

    #[test]
    fn test_reset_reopens_every_window() {
        let mut debouncer = Debouncer::new();
        let t0 = Instant::now();

        assert!(debouncer.should_fire("a", 1_000, t0));
        debouncer.reset();
        assert!(debouncer.should_fire("a", 1_000, t0 + ms(1)));
    }
}
