// Inactivity monitor
//
// An explicit state machine driven by two inputs: "activity observed" and
// the passage of time. It knows nothing about terminals or input devices;
// the TUI loop feeds it activity and polls it on every tick. One instance
// exists per authenticated session entry; dropping it on logout cancels
// everything, since there are no timer handles to leak.
//
// Tracking --(idle_limit - warn_lead elapsed)--> Warned --(idle_limit)--> Expired
// Any activity before Expired returns to Tracking and re-arms the warning.

use std::time::{Duration, Instant};

/// Monitor state. `Expired` is terminal; the controller tears the monitor
/// down when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    Tracking,
    Warned,
    Expired,
}

/// Transition produced by a poll. Each fires at most once per idle period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleEvent {
    /// `idle_limit - warn_lead` elapsed without activity.
    Warned,
    /// `idle_limit` elapsed without activity; the session must end.
    Expired,
}

#[derive(Debug)]
pub struct InactivityMonitor {
    idle_limit: Duration,
    warn_lead: Duration,
    last_activity: Instant,
    state: IdleState,
}

impl InactivityMonitor {
    /// Create a monitor with the counter starting at `now`.
    ///
    /// `warn_lead` must be shorter than `idle_limit`; a misconfigured lead
    /// is clamped to half the limit so the warning always precedes expiry.
    pub fn new(idle_limit: Duration, warn_lead: Duration, now: Instant) -> Self {
        let warn_lead = if warn_lead >= idle_limit {
            idle_limit / 2
        } else {
            warn_lead
        };
        Self {
            idle_limit,
            warn_lead,
            last_activity: now,
            state: IdleState::Tracking,
        }
    }

    pub fn state(&self) -> IdleState {
        self.state
    }

    /// A qualifying user-activity signal was observed: reset the elapsed
    /// counter and return to Tracking. Ignored once expired; a dead session
    /// cannot be revived by wiggling the pointer.
    pub fn record_activity(&mut self, now: Instant) {
        if self.state == IdleState::Expired {
            return;
        }
        self.last_activity = now;
        self.state = IdleState::Tracking;
    }

    /// Advance the machine to `now`, returning the transition that fired.
    ///
    /// If a single poll jumps past both thresholds (the loop stalled), only
    /// `Expired` fires, since warning about a logout that already happened would
    /// contradict the screen the user is about to see.
    pub fn poll(&mut self, now: Instant) -> Option<IdleEvent> {
        if self.state == IdleState::Expired {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.last_activity);

        if elapsed >= self.idle_limit {
            self.state = IdleState::Expired;
            return Some(IdleEvent::Expired);
        }

        if self.state == IdleState::Tracking && elapsed >= self.idle_limit - self.warn_lead {
            self.state = IdleState::Warned;
            return Some(IdleEvent::Warned);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_secs(60);

    fn monitor(now: Instant) -> InactivityMonitor {
        // idle_limit = 5m, warn_lead = 2m: warning at 3m, expiry at 5m
        InactivityMonitor::new(5 * MIN, 2 * MIN, now)
    }

    #[test]
    fn test_quiet_before_warning_threshold() {
        let start = Instant::now();
        let mut m = monitor(start);
        assert_eq!(m.poll(start + 2 * MIN), None);
        assert_eq!(m.state(), IdleState::Tracking);
    }

    #[test]
    fn test_warning_fires_exactly_once() {
        let start = Instant::now();
        let mut m = monitor(start);
        assert_eq!(m.poll(start + 3 * MIN), Some(IdleEvent::Warned));
        // Subsequent polls in the same idle period stay silent
        assert_eq!(m.poll(start + 3 * MIN + Duration::from_secs(1)), None);
        assert_eq!(m.poll(start + 4 * MIN), None);
        assert_eq!(m.state(), IdleState::Warned);
    }

    #[test]
    fn test_expiry_fires_exactly_once() {
        let start = Instant::now();
        let mut m = monitor(start);
        assert_eq!(m.poll(start + 3 * MIN), Some(IdleEvent::Warned));
        assert_eq!(m.poll(start + 5 * MIN), Some(IdleEvent::Expired));
        assert_eq!(m.poll(start + 6 * MIN), None);
        assert_eq!(m.state(), IdleState::Expired);
    }

    #[test]
    fn test_activity_resets_counter_and_rearms_warning() {
        let start = Instant::now();
        let mut m = monitor(start);
        assert_eq!(m.poll(start + 3 * MIN), Some(IdleEvent::Warned));

        // Activity after the warning returns to Tracking
        m.record_activity(start + 4 * MIN);
        assert_eq!(m.state(), IdleState::Tracking);

        // 5 minutes from the ORIGINAL start is only 1 minute after the
        // reset: nothing fires
        assert_eq!(m.poll(start + 5 * MIN), None);

        // The warning re-arms 3 minutes after the reset
        assert_eq!(m.poll(start + 7 * MIN), Some(IdleEvent::Warned));
        assert_eq!(m.poll(start + 9 * MIN), Some(IdleEvent::Expired));
    }

    #[test]
    fn test_stalled_loop_skips_straight_to_expired() {
        let start = Instant::now();
        let mut m = monitor(start);
        // First poll happens long after both thresholds passed
        assert_eq!(m.poll(start + 10 * MIN), Some(IdleEvent::Expired));
        assert_eq!(m.poll(start + 11 * MIN), None);
    }

    #[test]
    fn test_activity_after_expiry_is_ignored() {
        let start = Instant::now();
        let mut m = monitor(start);
        assert_eq!(m.poll(start + 5 * MIN), Some(IdleEvent::Expired));
        m.record_activity(start + 5 * MIN + Duration::from_secs(1));
        assert_eq!(m.state(), IdleState::Expired);
        assert_eq!(m.poll(start + 12 * MIN), None);
    }

    #[test]
    fn test_misconfigured_lead_is_clamped() {
        let start = Instant::now();
        // warn_lead >= idle_limit would put the warning before time zero;
        // the clamp moves it to half the limit (warning at 2m, expiry at 4m)
        let mut m = InactivityMonitor::new(4 * MIN, 10 * MIN, start);
        assert_eq!(m.poll(start + MIN), None);
        assert_eq!(m.poll(start + 2 * MIN), Some(IdleEvent::Warned));
        assert_eq!(m.poll(start + 4 * MIN), Some(IdleEvent::Expired));
    }
}
