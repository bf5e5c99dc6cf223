//! # Dispatch state
//!
//! ## Overview
//!
//! [KeybindState] holds everything the dispatcher remembers between keystrokes: the keys typed
//! towards a sequence, a leading count, an operator waiting for its motion, and a motion waiting
//! for its character argument. It is never modified in place; each dispatch produces a new value.
use std::fmt;

use crate::action::{MotionAction, OperatorAction};
use crate::key::KeyStroke;

/// An operator that has been typed and is waiting for a motion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingOperator {
    /// The operator to apply once a motion is typed.
    pub action: OperatorAction,

    /// The keys that triggered the operator, used to recognize doubled operators like `d d`.
    pub keys: Vec<KeyStroke>,

    /// The count typed before the operator.
    pub count: Option<usize>,
}

/// A motion that has been typed and is waiting for a character argument.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CharPending {
    /// The motion to complete.
    pub motion: MotionAction,

    /// The keys that triggered the motion, including any prefix typed before it.
    pub keys: Vec<KeyStroke>,

    /// The count typed before the motion.
    pub count: Option<usize>,
}

/// The pending interaction state threaded through each call to [dispatch](crate::dispatch()).
///
/// The [Default] value is the idle state.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeybindState {
    /// Keys typed so far towards a multi-key binding.
    pub pending_keys: Vec<KeyStroke>,

    /// The count accumulated from leading digits.
    pub count: Option<usize>,

    /// An operator waiting for a motion.
    pub pending_operator: Option<PendingOperator>,

    /// A motion waiting for a character.
    pub char_pending: Option<CharPending>,
}

impl KeybindState {
    /// Whether nothing is pending.
    pub fn is_idle(&self) -> bool {
        !self.has_pending()
    }

    /// Whether any keys, count, operator or character argument are pending.
    pub fn has_pending(&self) -> bool {
        if self.count.is_some() || self.pending_operator.is_some() || self.char_pending.is_some() {
            return true;
        }

        return !self.pending_keys.is_empty();
    }

    /// Whether a motion is waiting for a character argument.
    pub fn is_char_pending(&self) -> bool {
        self.char_pending.is_some()
    }
}

/// Shows the pending keys the way they were typed, for use in a status indicator.
impl fmt::Display for KeybindState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![];

        if let Some(op) = &self.pending_operator {
            if let Some(n) = op.count {
                parts.push(n.to_string());
            }

            parts.extend(op.keys.iter().map(ToString::to_string));
        }

        if let Some(cp) = &self.char_pending {
            if let Some(n) = cp.count {
                parts.push(n.to_string());
            }

            parts.extend(cp.keys.iter().map(ToString::to_string));
        }

        if let Some(n) = self.count {
            parts.push(n.to_string());
        }

        parts.extend(self.pending_keys.iter().map(ToString::to_string));

        f.write_str(&parts.join(" "))
    }
}

/// Clear the transient parts of a state after the inactivity timeout fires.
///
/// Returns [None] when there is nothing to clear, so that a timer firing after the state has
/// already moved on is a no-op. A motion waiting for a character never times out.
pub fn expire_pending(state: &KeybindState) -> Option<KeybindState> {
    if state.char_pending.is_some() {
        return None;
    }

    if state.has_pending() {
        tracing::debug!(target: "keydispatch", pending = %state, "expired pending keys");

        return Some(KeybindState::default());
    }

    return None;
}
