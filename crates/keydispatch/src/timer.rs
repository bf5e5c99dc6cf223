//! # Inactivity timers
//!
//! ## Overview
//!
//! A pending sequence, count or operator is abandoned when no key arrives for a while (Vim's
//! `timeoutlen`). The engine doesn't schedule anything itself; instead, a
//! [KeySession](crate::KeySession) arms and cancels an [InactivityTimer] supplied by the host,
//! and the host calls [KeySession::expire](crate::KeySession::expire) when it fires.
//!
//! [Deadline] is a timer for hosts that poll for input with a timeout, like terminal
//! applications reading events with [crossterm](https://docs.rs/crossterm).
use std::time::{Duration, Instant};

/// A cancellable, single-shot timer.
pub trait InactivityTimer {
    /// Start the timer, replacing any previous deadline.
    fn arm(&mut self, timeout: Duration);

    /// Stop the timer without firing.
    fn cancel(&mut self);

    /// Whether the timer is currently running.
    fn is_armed(&self) -> bool;
}

/// An [InactivityTimer] that records when it should fire, for hosts that poll.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// Create a timer that isn't armed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer relative to a given point in time.
    ///
    /// Timeouts too large to represent never fire.
    pub fn arm_at(&mut self, now: Instant, timeout: Duration) {
        self.at = now.checked_add(timeout);
    }

    /// The instant at which the timer fires, if it's armed.
    pub fn instant(&self) -> Option<Instant> {
        self.at
    }

    /// How long until the timer fires, or [None] if it isn't armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(now))
    }

    /// Whether the timer is armed and its deadline has passed.
    pub fn fired(&self, now: Instant) -> bool {
        match self.at {
            Some(at) => now >= at,
            None => false,
        }
    }
}

impl InactivityTimer for Deadline {
    fn arm(&mut self, timeout: Duration) {
        self.arm_at(Instant::now(), timeout);
    }

    fn cancel(&mut self) {
        self.at = None;
    }

    fn is_armed(&self) -> bool {
        self.at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline() {
        let now = Instant::now();
        let mut timer = Deadline::new();

        assert_eq!(timer.is_armed(), false);
        assert_eq!(timer.remaining(now), None);
        assert_eq!(timer.fired(now), false);

        timer.arm_at(now, Duration::from_millis(1000));
        assert_eq!(timer.is_armed(), true);
        assert_eq!(timer.remaining(now), Some(Duration::from_millis(1000)));
        assert_eq!(timer.fired(now + Duration::from_millis(999)), false);
        assert_eq!(timer.fired(now + Duration::from_millis(1000)), true);

        // Past the deadline, nothing remains.
        assert_eq!(timer.remaining(now + Duration::from_secs(5)), Some(Duration::ZERO));

        timer.cancel();
        assert_eq!(timer.is_armed(), false);
        assert_eq!(timer.fired(now + Duration::from_secs(5)), false);
    }

    #[test]
    fn test_rearm_replaces() {
        let now = Instant::now();
        let mut timer = Deadline::new();

        timer.arm_at(now, Duration::from_millis(100));
        timer.arm_at(now + Duration::from_millis(50), Duration::from_millis(100));

        assert_eq!(timer.fired(now + Duration::from_millis(120)), false);
        assert_eq!(timer.fired(now + Duration::from_millis(150)), true);
    }

    #[test]
    fn test_huge_timeout_never_fires() {
        let now = Instant::now();
        let mut timer = Deadline::new();

        timer.arm_at(now, Duration::MAX);
        assert_eq!(timer.is_armed(), false);
        assert_eq!(timer.fired(now), false);
    }
}
