//! # Dispatching keys
//!
//! ## Overview
//!
//! [dispatch] is a pure transition function. Given the current [KeybindState], a [KeyEvent] and
//! the per-call [DispatchContext], it returns the next state along with a [DispatchResult] that
//! tells the host what to do with the key.
//!
//! The pending state moves between the following phases:
//!
//! * **Idle**: nothing pending.
//! * **Count**: digits have been typed (a leading `0` is a normal key, like Vim's `0` motion).
//! * **Sequence**: the keys typed so far are a prefix of one or more bindings.
//! * **Operator**: an operator is waiting for a motion, or for a doubled binding such as `d d`.
//! * **Character**: a motion is waiting for one printable character.
//!
//! Escape abandons whatever is pending, unless a binding claims it. Keys that cannot continue a
//! pending interaction reset it, and keys that match nothing while idle are passed through.
use tracing::{debug, trace};

use crate::action::{
    ActionKind,
    ActionMap,
    CommandAction,
    MotionAction,
    OperatorAction,
    ResolvedAction,
    TextRange,
};
use crate::binding::{match_binding, BindingMatch, KeyBinding};
use crate::key::{KeyEvent, KeyStroke};
use crate::state::{CharPending, KeybindState, PendingOperator};

/// What the host should do after a key has been dispatched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DispatchResult {
    /// The key was not handled, and should be passed through.
    None,

    /// The key was consumed, and more input is needed.
    Pending {
        /// Whether the host should suppress the key's default behaviour.
        prevent_default: bool,
    },

    /// Pending input was abandoned.
    Reset {
        /// Whether the host should suppress the key's default behaviour.
        prevent_default: bool,
    },

    /// Run a command.
    ExecuteCommand {
        /// The command to run.
        action: CommandAction,
        /// The count typed before the command.
        count: Option<usize>,
    },

    /// Perform a motion on its own.
    ExecuteMotion {
        /// The motion to perform.
        action: MotionAction,
        /// The count typed before the motion.
        count: Option<usize>,
        /// The character argument, for motions that wait for one.
        ch: Option<String>,
    },

    /// Apply an operator to the range produced by a motion.
    ExecuteOperatorMotion {
        /// The operator to apply.
        operator: OperatorAction,
        /// The motion that produces the range.
        motion: MotionAction,
        /// The count typed before the operator.
        operator_count: Option<usize>,
        /// The count typed between the operator and the motion.
        motion_count: Option<usize>,
        /// The character argument, for motions that wait for one.
        ch: Option<String>,
    },
}

impl DispatchResult {
    /// Whether the host should suppress the key's default behaviour.
    pub fn prevent_default(&self) -> bool {
        match self {
            DispatchResult::None => false,
            DispatchResult::Pending { prevent_default } => *prevent_default,
            DispatchResult::Reset { prevent_default } => *prevent_default,
            DispatchResult::ExecuteCommand { .. } => true,
            DispatchResult::ExecuteMotion { .. } => true,
            DispatchResult::ExecuteOperatorMotion { .. } => true,
        }
    }

    /// Whether this result runs an action.
    pub fn is_execute(&self) -> bool {
        match self {
            DispatchResult::ExecuteCommand { .. } => true,
            DispatchResult::ExecuteMotion { .. } => true,
            DispatchResult::ExecuteOperatorMotion { .. } => true,
            _ => false,
        }
    }

    /// Perform the side effects of an execute result.
    ///
    /// Commands are selected with their count. Motions compute their range, which operators then
    /// get applied to, using the product of the operator and motion counts. The computed range is
    /// returned, if there is one.
    pub fn run(&self) -> Option<TextRange> {
        match self {
            DispatchResult::ExecuteCommand { action, count } => {
                action.select(*count);

                return None;
            },
            DispatchResult::ExecuteMotion { action, count, ch } => {
                return Some(action.range(*count, ch.as_deref()));
            },
            DispatchResult::ExecuteOperatorMotion {
                operator,
                motion,
                operator_count,
                motion_count,
                ch,
            } => {
                let count = combine_counts(*operator_count, *motion_count);
                let range = motion.range(count, ch.as_deref());

                operator.apply(range);

                return Some(range);
            },
            DispatchResult::None | DispatchResult::Pending { .. } | DispatchResult::Reset { .. } => {
                return None;
            },
        }
    }
}

/// Combine the counts typed before an operator and before its motion by multiplying them.
pub fn combine_counts(operator: Option<usize>, motion: Option<usize>) -> Option<usize> {
    match (operator, motion) {
        (Some(a), Some(b)) => Some(a.saturating_mul(b)),
        (Some(n), None) | (None, Some(n)) => Some(n),
        (None, None) => None,
    }
}

/// Everything besides the state and the key that a call to [dispatch] depends on.
#[derive(Clone, Copy, Debug)]
pub struct DispatchContext<'a> {
    /// The binding table, in declaration order.
    pub bindings: &'a [KeyBinding],

    /// The currently available actions.
    pub actions: &'a ActionMap,

    /// The effective mode.
    pub mode: &'a str,

    /// The active scope, if any.
    pub scope: Option<&'a str>,

    /// Whether a text input has focus, in which case digits do not start counts.
    pub input_focused: bool,
}

impl<'a> DispatchContext<'a> {
    /// Create a context for the given mode, with no scope and no focused input.
    pub fn new(bindings: &'a [KeyBinding], actions: &'a ActionMap, mode: &'a str) -> Self {
        DispatchContext { bindings, actions, mode, scope: None, input_focused: false }
    }

    /// Set the active scope.
    pub fn with_scope(mut self, scope: Option<&'a str>) -> Self {
        self.scope = scope;
        self
    }

    /// Set whether a text input has focus.
    pub fn with_input_focused(mut self, input_focused: bool) -> Self {
        self.input_focused = input_focused;
        self
    }
}

struct Resolution {
    full: Option<ResolvedAction>,
    prefix: bool,
}

/// Scan the active bindings for a match on the pending keys plus the new key.
///
/// When `kind` is given, bindings whose action doesn't resolve to that kind are skipped. A full
/// match whose action is unavailable doesn't count, so later bindings for the same keys can
/// still fire. Scoped full matches win over global ones; otherwise the first declared wins.
fn scan(
    ctx: &DispatchContext<'_>,
    pending: &[KeyStroke],
    stroke: &KeyStroke,
    kind: Option<ActionKind>,
) -> Resolution {
    let mut scoped = None;
    let mut global = None;
    let mut prefix = false;

    for binding in ctx.bindings.iter().filter(|b| b.is_active(ctx.mode, ctx.scope)) {
        let m = match_binding(pending, stroke, binding);

        if m == BindingMatch::None {
            continue;
        }

        let action = ctx.actions.get(&binding.action);

        if let Some(kind) = kind {
            if action.map(ResolvedAction::kind) != Some(kind) {
                continue;
            }
        }

        match m {
            BindingMatch::Full => {
                let slot = if binding.is_scoped() { &mut scoped } else { &mut global };

                if slot.is_some() {
                    continue;
                }

                match action {
                    Some(action) => *slot = Some(action.clone()),
                    None => {
                        trace!(
                            target: "keydispatch",
                            action = %binding.action,
                            keys = %binding.keys,
                            "skipping binding for unavailable action"
                        );
                    },
                }
            },
            BindingMatch::Prefix => {
                prefix = true;
            },
            BindingMatch::None => {},
        }
    }

    Resolution { full: scoped.or(global), prefix }
}

/// Resolve a key typed while an operator is pending.
///
/// Motions are matched against the keys typed since the operator, while commands are matched
/// against the operator's own keys followed by those, so that a doubled operator like `d d` can
/// be bound as a command. A command wins when both complete.
fn scan_after_operator(
    ctx: &DispatchContext<'_>,
    state: &KeybindState,
    op: &PendingOperator,
    stroke: &KeyStroke,
) -> Resolution {
    let motions = scan(ctx, &state.pending_keys, stroke, Some(ActionKind::Motion));

    let mut typed = op.keys.clone();
    typed.extend(state.pending_keys.iter().cloned());

    let commands = scan(ctx, &typed, stroke, Some(ActionKind::Command));

    Resolution {
        full: commands.full.or(motions.full),
        prefix: motions.prefix || commands.prefix,
    }
}

fn complete_char(
    state: &KeybindState,
    pending: &CharPending,
    event: &KeyEvent,
) -> (KeybindState, DispatchResult) {
    if event.is_escape() {
        debug!(target: "keydispatch", motion = pending.motion.id(), "abandoned character argument");

        return (KeybindState::default(), DispatchResult::Reset { prevent_default: true });
    }

    let Some(ch) = event.grapheme() else {
        // Still waiting for a printable character.
        return (state.clone(), DispatchResult::None);
    };

    let ch = Some(ch.to_string());
    let result = match &state.pending_operator {
        Some(op) => {
            DispatchResult::ExecuteOperatorMotion {
                operator: op.action.clone(),
                motion: pending.motion.clone(),
                operator_count: op.count,
                motion_count: pending.count,
                ch,
            }
        },
        None => {
            DispatchResult::ExecuteMotion {
                action: pending.motion.clone(),
                count: pending.count,
                ch,
            }
        },
    };

    debug!(target: "keydispatch", motion = pending.motion.id(), "completed character argument");

    return (KeybindState::default(), result);
}

fn execute(
    state: &KeybindState,
    stroke: KeyStroke,
    action: ResolvedAction,
) -> (KeybindState, DispatchResult) {
    match action {
        ResolvedAction::Command(action) => {
            let count = match &state.pending_operator {
                Some(op) => op.count.or(state.count),
                None => state.count,
            };

            debug!(target: "keydispatch", command = action.id(), ?count, "execute command");

            let result = DispatchResult::ExecuteCommand { action, count };

            return (KeybindState::default(), result);
        },
        ResolvedAction::Motion(motion) if motion.awaits_char() => {
            trace!(target: "keydispatch", motion = motion.id(), "waiting for character");

            let mut keys = state.pending_keys.clone();
            keys.push(stroke);

            let next = KeybindState {
                pending_keys: vec![],
                count: None,
                pending_operator: state.pending_operator.clone(),
                char_pending: Some(CharPending { motion, keys, count: state.count }),
            };

            return (next, DispatchResult::Pending { prevent_default: true });
        },
        ResolvedAction::Motion(motion) => {
            let result = match &state.pending_operator {
                Some(op) => {
                    debug!(
                        target: "keydispatch",
                        operator = op.action.id(),
                        motion = motion.id(),
                        "execute operator with motion"
                    );

                    DispatchResult::ExecuteOperatorMotion {
                        operator: op.action.clone(),
                        motion,
                        operator_count: op.count,
                        motion_count: state.count,
                        ch: None,
                    }
                },
                None => {
                    debug!(target: "keydispatch", motion = motion.id(), "execute motion");

                    DispatchResult::ExecuteMotion { action: motion, count: state.count, ch: None }
                },
            };

            return (KeybindState::default(), result);
        },
        ResolvedAction::Operator(action) => {
            trace!(target: "keydispatch", operator = action.id(), "waiting for motion");

            let mut keys = state.pending_keys.clone();
            keys.push(stroke);

            let next = KeybindState {
                pending_operator: Some(PendingOperator { action, keys, count: state.count }),
                ..KeybindState::default()
            };

            return (next, DispatchResult::Pending { prevent_default: true });
        },
    }
}

/// Process a single key press.
///
/// The input state is never modified; the returned state replaces it.
pub fn dispatch(
    state: &KeybindState,
    event: &KeyEvent,
    ctx: &DispatchContext<'_>,
) -> (KeybindState, DispatchResult) {
    if event.is_modifier() {
        return (state.clone(), DispatchResult::None);
    }

    if let Some(pending) = &state.char_pending {
        return complete_char(state, pending, event);
    }

    if !ctx.input_focused {
        let count = match (state.count, event.digit()) {
            (None, Some(0)) => None,
            (None, Some(d)) => Some(d),
            (Some(n), Some(d)) => Some(n.saturating_mul(10).saturating_add(d)),
            (_, None) => None,
        };

        if let Some(count) = count {
            trace!(target: "keydispatch", count, "count");

            let next = KeybindState { count: Some(count), ..state.clone() };

            return (next, DispatchResult::Pending { prevent_default: true });
        }
    }

    let stroke = event.stroke();
    let found = match &state.pending_operator {
        Some(op) => scan_after_operator(ctx, state, op, &stroke),
        None => scan(ctx, &state.pending_keys, &stroke, None),
    };

    if event.is_escape() && found.full.is_none() && state.has_pending() {
        debug!(target: "keydispatch", pending = %state, "escape");

        return (KeybindState::default(), DispatchResult::Reset { prevent_default: true });
    }

    if let Some(action) = found.full {
        return execute(state, stroke, action);
    }

    if found.prefix {
        trace!(target: "keydispatch", key = %stroke, "prefix");

        let mut next = state.clone();
        next.pending_keys.push(stroke);

        return (next, DispatchResult::Pending { prevent_default: true });
    }

    if state.has_pending() {
        debug!(target: "keydispatch", pending = %state, key = %stroke, "unmapped");

        return (KeybindState::default(), DispatchResult::Reset { prevent_default: false });
    }

    return (state.clone(), DispatchResult::None);
}
