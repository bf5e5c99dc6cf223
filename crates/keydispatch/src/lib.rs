//! # keydispatch
//!
//! ## Overview
//!
//! This crate provides a deterministic, environment-agnostic engine for dispatching modal key
//! presses, in the style of applications descended from [vi](https://en.wikipedia.org/wiki/Vi).
//!
//! Hosts describe their keybindings as a list of [KeyBinding]s, each mapping a [KeySequence]
//! typed in some mode (and, optionally, while some scope is active) to an action id. On every key
//! press, the host calls [dispatch] with the current [KeybindState], the [KeyEvent], and a
//! [DispatchContext] holding the binding table, the [ActionMap] of currently available actions,
//! the mode and the scope. It gets back the next state, and a [DispatchResult] saying whether to
//! run an action, keep waiting for more keys, abandon what's pending, or pass the key through.
//!
//! The engine supports:
//!
//! * Leading counts (`3 x`), where a bare `0` stays an ordinary key
//! * Multi-key sequences and leader keys (`Space Space`)
//! * Operators waiting for motions (`d w`), each with their own count (`3 d 2 w`)
//! * Doubled operators bound as commands (`d d`)
//! * Motions that wait for a character argument (`f x`)
//! * Scoped bindings that take precedence over global ones while their scope is active
//!
//! [dispatch] never mutates its input, and never fails. Hosts that want a single mutable cell
//! with an inactivity timeout can use a [KeySession].
//!
//! ## Example
//!
//! ```
//! use keydispatch::{
//!     dispatch,
//!     ActionMap,
//!     DispatchContext,
//!     DispatchResult,
//!     KeyBinding,
//!     KeyEvent,
//!     KeybindState,
//!     ResolvedAction,
//!     TextRange,
//! };
//!
//! let bindings = vec![
//!     KeyBinding::new("normal", "d", "op.delete").unwrap(),
//!     KeyBinding::new("normal", "w", "motion.word").unwrap(),
//!     KeyBinding::new("normal", "d d", "cmd.delete-line").unwrap(),
//! ];
//!
//! let mut actions = ActionMap::new();
//! for action in [
//!     ResolvedAction::operator("op.delete", |_| ()),
//!     ResolvedAction::motion("motion.word", |count, _| TextRange::new(0, count.unwrap_or(1))),
//!     ResolvedAction::command("cmd.delete-line", |_| ()),
//! ] {
//!     actions.insert(action.id().to_string(), action);
//! }
//!
//! let ctx = DispatchContext::new(&bindings, &actions, "normal");
//! let state = KeybindState::default();
//!
//! // "3" starts a count.
//! let (state, res) = dispatch(&state, &KeyEvent::from('3'), &ctx);
//! assert_eq!(res, DispatchResult::Pending { prevent_default: true });
//!
//! // "d" is an operator, and waits for a motion.
//! let (state, res) = dispatch(&state, &KeyEvent::from('d'), &ctx);
//! assert_eq!(res, DispatchResult::Pending { prevent_default: true });
//! assert_eq!(state.to_string(), "3 d");
//!
//! // "w" completes it.
//! let (state, res) = dispatch(&state, &KeyEvent::from('w'), &ctx);
//! assert_eq!(res.run(), Some(TextRange::new(0, 3)));
//! assert_eq!(state, KeybindState::default());
//!
//! // A second "d" instead runs the doubled-operator command.
//! let (state, _) = dispatch(&state, &KeyEvent::from('d'), &ctx);
//! let (_, res) = dispatch(&state, &KeyEvent::from('d'), &ctx);
//! match res {
//!     DispatchResult::ExecuteCommand { action, count } => {
//!         assert_eq!(action.id(), "cmd.delete-line");
//!         assert_eq!(count, None);
//!     },
//!     res => panic!("unexpected result: {res:?}"),
//! }
//! ```

// Require docs for public APIs, and disable the more annoying clippy lints.
#![deny(missing_docs)]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::match_like_matches_macro)]
#![allow(clippy::needless_return)]
#![allow(clippy::type_complexity)]

pub mod action;
pub mod binding;
pub mod dispatch;
pub mod key;
pub mod registry;
pub mod session;
pub mod state;
pub mod timer;

pub use self::action::{
    ActionKind,
    ActionMap,
    CommandAction,
    MotionAction,
    OperatorAction,
    ResolvedAction,
    TextRange,
};
pub use self::binding::{match_binding, match_sequence, BindingMatch, KeyBinding};
pub use self::dispatch::{combine_counts, dispatch, DispatchContext, DispatchResult};
pub use self::key::{KeyError, KeyEvent, KeySequence, KeyStep, KeyStroke, Modifiers, ESCAPE};
pub use self::registry::{ActionRegistry, RegistrationId, RegistryEntry, RegistryError};
pub use self::session::{KeySession, DEFAULT_TIMEOUT};
pub use self::state::{expire_pending, CharPending, KeybindState, PendingOperator};
pub use self::timer::{Deadline, InactivityTimer};
