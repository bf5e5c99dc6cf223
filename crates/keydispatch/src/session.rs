//! # Key sessions
//!
//! ## Overview
//!
//! [KeySession] is the single mutable cell that a host keeps around between key presses. It
//! stores the [KeybindState] returned by each [dispatch], and keeps an [InactivityTimer] armed
//! only while there's something that can time out.
use std::time::{Duration, Instant};

use crate::dispatch::{dispatch, DispatchContext, DispatchResult};
use crate::key::KeyEvent;
use crate::state::{expire_pending, KeybindState};
use crate::timer::{Deadline, InactivityTimer};

/// Default inactivity timeout, matching Vim's `timeoutlen`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Owns the pending key state and its inactivity timer.
#[derive(Debug)]
pub struct KeySession<T: InactivityTimer> {
    state: KeybindState,
    timer: T,
    timeout: Option<Duration>,
}

impl<T: InactivityTimer> KeySession<T> {
    /// Create a session that expires pending keys after `timeout`, or never if it's [None].
    pub fn new(timer: T, timeout: Option<Duration>) -> Self {
        KeySession { state: KeybindState::default(), timer, timeout }
    }

    /// The current state.
    pub fn state(&self) -> &KeybindState {
        &self.state
    }

    /// The session's timer.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// The configured inactivity timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Dispatch a key press, store the resulting state, and arm or cancel the timer.
    ///
    /// The timer is armed whenever more input is pending, except when a motion is waiting for
    /// its character, which never times out. A key that passes through without touching the
    /// state, like a bare modifier, leaves a running timer alone. Every other result cancels it.
    pub fn handle_key(&mut self, event: &KeyEvent, ctx: &DispatchContext<'_>) -> DispatchResult {
        let (next, result) = dispatch(&self.state, event, ctx);

        self.state = next;

        let expirable = self.state.has_pending() && !self.state.is_char_pending();

        match (&result, self.timeout) {
            (DispatchResult::Pending { .. }, Some(timeout)) if expirable => {
                self.timer.arm(timeout);
            },
            (DispatchResult::None, Some(timeout)) if expirable => {
                if !self.timer.is_armed() {
                    self.timer.arm(timeout);
                }
            },
            _ => {
                self.timer.cancel();
            },
        }

        return result;
    }

    /// Handle the timer firing, returning whether any pending state was cleared.
    pub fn expire(&mut self) -> bool {
        self.timer.cancel();

        match expire_pending(&self.state) {
            Some(next) => {
                self.state = next;
                true
            },
            None => false,
        }
    }

    /// Drop all pending state.
    pub fn reset(&mut self) {
        self.timer.cancel();
        self.state = KeybindState::default();
    }

    /// The pending keys, as they should be shown in a status indicator.
    pub fn pending_keys_display(&self) -> String {
        self.state.to_string()
    }
}

impl KeySession<Deadline> {
    /// Create a session driven by a [Deadline].
    pub fn with_deadline(timeout: Option<Duration>) -> Self {
        KeySession::new(Deadline::new(), timeout)
    }

    /// How long a host may block waiting for input before it should call
    /// [expire_due](Self::expire_due).
    pub fn poll_timeout(&self, now: Instant) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Expire pending keys if the deadline has passed, returning whether anything changed.
    pub fn expire_due(&mut self, now: Instant) -> bool {
        if self.timer.fired(now) {
            return self.expire();
        }

        return false;
    }
}

impl Default for KeySession<Deadline> {
    fn default() -> Self {
        KeySession::with_deadline(Some(DEFAULT_TIMEOUT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionMap, ResolvedAction, TextRange};
    use crate::binding::KeyBinding;
    use crate::key::Modifiers;

    macro_rules! key {
        ($k: expr) => {
            KeyEvent::from($k)
        };
    }

    /// Records how the session drives its timer.
    #[derive(Debug, Default)]
    struct RecordingTimer {
        armed: Option<Duration>,
        arms: usize,
        cancels: usize,
    }

    impl InactivityTimer for RecordingTimer {
        fn arm(&mut self, timeout: Duration) {
            self.armed = Some(timeout);
            self.arms += 1;
        }

        fn cancel(&mut self) {
            self.armed = None;
            self.cancels += 1;
        }

        fn is_armed(&self) -> bool {
            self.armed.is_some()
        }
    }

    fn table() -> (Vec<KeyBinding>, ActionMap) {
        let bindings = vec![
            KeyBinding::new("normal", "g g", "cmd.gg").unwrap(),
            KeyBinding::new("normal", "d", "op.d").unwrap(),
            KeyBinding::new("normal", "f", "motion.find").unwrap(),
        ];

        let mut actions = ActionMap::new();

        for action in [
            ResolvedAction::command("cmd.gg", |_| ()),
            ResolvedAction::operator("op.d", |_| ()),
            ResolvedAction::char_motion("motion.find", |_, _| TextRange::default()),
        ] {
            actions.insert(action.id().to_string(), action);
        }

        return (bindings, actions);
    }

    #[test]
    fn test_timer_armed_while_pending() {
        let (bindings, actions) = table();
        let ctx = DispatchContext::new(&bindings, &actions, "normal");
        let timeout = Duration::from_millis(500);
        let mut session = KeySession::new(RecordingTimer::default(), Some(timeout));

        assert_eq!(session.handle_key(&key!('g'), &ctx).prevent_default(), true);
        assert_eq!(session.timer().armed, Some(timeout));
        assert_eq!(session.pending_keys_display(), "g");

        assert_eq!(session.handle_key(&key!('g'), &ctx).is_execute(), true);
        assert_eq!(session.timer().is_armed(), false);
        assert_eq!(session.pending_keys_display(), "");

        // Abandoned input cancels too.
        session.handle_key(&key!('2'), &ctx);
        assert_eq!(session.timer().is_armed(), true);
        assert_eq!(session.handle_key(&key!('q'), &ctx).prevent_default(), false);
        assert_eq!(session.timer().is_armed(), false);
        assert_eq!(session.timer().arms, 2);
        assert_eq!(session.timer().cancels, 2);
    }

    #[test]
    fn test_char_pending_not_armed() {
        let (bindings, actions) = table();
        let ctx = DispatchContext::new(&bindings, &actions, "normal");
        let mut session = KeySession::new(RecordingTimer::default(), Some(DEFAULT_TIMEOUT));

        session.handle_key(&key!('d'), &ctx);
        assert_eq!(session.timer().is_armed(), true);

        session.handle_key(&key!('f'), &ctx);
        assert_eq!(session.state().is_char_pending(), true);
        assert_eq!(session.timer().is_armed(), false);

        // Firing anyway changes nothing.
        assert_eq!(session.expire(), false);
        assert_eq!(session.state().is_char_pending(), true);
    }

    #[test]
    fn test_expire_clears_pending() {
        let (bindings, actions) = table();
        let ctx = DispatchContext::new(&bindings, &actions, "normal");
        let mut session = KeySession::new(RecordingTimer::default(), Some(DEFAULT_TIMEOUT));

        session.handle_key(&key!('3'), &ctx);
        session.handle_key(&key!('g'), &ctx);
        assert_eq!(session.pending_keys_display(), "3 g");

        assert_eq!(session.expire(), true);
        assert_eq!(session.state(), &KeybindState::default());
        assert_eq!(session.timer().is_armed(), false);

        // A late second firing is a no-op.
        assert_eq!(session.expire(), false);
    }

    #[test]
    fn test_modifier_keeps_timer() {
        let (bindings, actions) = table();
        let ctx = DispatchContext::new(&bindings, &actions, "normal");
        let mut session = KeySession::new(RecordingTimer::default(), Some(DEFAULT_TIMEOUT));

        session.handle_key(&key!('g'), &ctx);
        assert_eq!(session.timer().arms, 1);

        let shift = KeyEvent::new("Shift", Modifiers::SHIFT);
        assert_eq!(session.handle_key(&shift, &ctx), DispatchResult::None);
        assert_eq!(session.timer().is_armed(), true);
        assert_eq!(session.timer().arms, 1);
        assert_eq!(session.timer().cancels, 0);

        assert_eq!(session.expire(), true);
        assert_eq!(session.state(), &KeybindState::default());

        // Idle pass-through keys still cancel.
        assert_eq!(session.handle_key(&shift, &ctx), DispatchResult::None);
        assert_eq!(session.timer().is_armed(), false);
    }

    #[test]
    fn test_deadline_expires_after_modifier() {
        let (bindings, actions) = table();
        let ctx = DispatchContext::new(&bindings, &actions, "normal");
        let mut session = KeySession::with_deadline(Some(Duration::from_millis(10)));

        session.handle_key(&key!('g'), &ctx);
        session.handle_key(&KeyEvent::new("Control", Modifiers::CTRL), &ctx);
        assert_eq!(session.pending_keys_display(), "g");
        assert!(session.poll_timeout(Instant::now()).is_some());

        assert_eq!(session.expire_due(Instant::now() + Duration::from_secs(3600)), true);
        assert_eq!(session.pending_keys_display(), "");
    }

    #[test]
    fn test_timeout_disabled() {
        let (bindings, actions) = table();
        let ctx = DispatchContext::new(&bindings, &actions, "normal");
        let mut session = KeySession::new(RecordingTimer::default(), None);

        session.handle_key(&key!('g'), &ctx);
        assert_eq!(session.timer().arms, 0);
        assert_eq!(session.state().pending_keys.len(), 1);

        session.reset();
        assert_eq!(session.state(), &KeybindState::default());
    }

    #[test]
    fn test_deadline_session() {
        let (bindings, actions) = table();
        let ctx = DispatchContext::new(&bindings, &actions, "normal");
        let mut session = KeySession::with_deadline(Some(Duration::from_secs(60)));

        assert_eq!(session.poll_timeout(Instant::now()), None);

        session.handle_key(&key!('g'), &ctx);

        let now = Instant::now();
        let remaining = session.poll_timeout(now).unwrap();
        assert!(remaining <= Duration::from_secs(60));

        assert_eq!(session.expire_due(now), false);
        assert_eq!(session.expire_due(now + Duration::from_secs(61)), true);
        assert_eq!(session.state(), &KeybindState::default());
        assert_eq!(session.poll_timeout(now), None);
    }

    #[test]
    fn test_default_session() {
        let session: KeySession<Deadline> = KeySession::default();

        assert_eq!(session.timeout(), Some(DEFAULT_TIMEOUT));
        assert_eq!(session.timer().is_armed(), false);
    }
}
