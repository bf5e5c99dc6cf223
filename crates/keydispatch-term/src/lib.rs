//! # keydispatch-term
//!
//! ## Overview
//!
//! This crate connects the [keydispatch] engine to the terminal.
//!
//! The [key] module converts [crossterm] key events into engine [KeyEvents](keydispatch::KeyEvent),
//! and the [config] module loads binding tables and the inactivity timeout from TOML files.
//!
//! A host typically loads its [Config](config::Config), registers its actions with an
//! [ActionRegistry](keydispatch::ActionRegistry), and then feeds each terminal key through a
//! [KeySession](keydispatch::KeySession), polling for input no longer than the session's
//! deadline allows.
//!
//! ## Examples
//!
//! For a complete program, check out the `read-loop` example in this crate, which prints the
//! result of dispatching every key typed into the terminal.
//!
//! ```
//! use crossterm::event::{KeyCode, KeyEvent as TerminalKeyEvent, KeyModifiers};
//! use keydispatch::{ActionRegistry, DispatchContext, KeySession, ResolvedAction};
//! use keydispatch_term::{config::Config, errors::HostResult, key::convert_key};
//!
//! fn main() -> HostResult<()> {
//!     let config = Config::from_toml_str(r#"
//!         [[bindings]]
//!         mode = "normal"
//!         keys = "Z Z"
//!         action = "app.quit"
//!     "#)?;
//!     let bindings = config.bindings()?;
//!
//!     let mut registry = ActionRegistry::new();
//!     registry.register("app", 0, vec![ResolvedAction::command("app.quit", |_| ())])?;
//!     let actions = registry.action_map();
//!
//!     let ctx = DispatchContext::new(&bindings, &actions, "normal");
//!     let mut session = KeySession::with_deadline(config.input.timeout_duration());
//!
//!     let z = TerminalKeyEvent::new(KeyCode::Char('Z'), KeyModifiers::SHIFT);
//!     let key = convert_key(&z).unwrap();
//!
//!     assert!(session.handle_key(&key, &ctx).prevent_default());
//!     assert_eq!(session.pending_keys_display(), "Shift+Z");
//!     assert!(session.handle_key(&key, &ctx).is_execute());
//!
//!     Ok(())
//! }
//! ```

// Require docs for public APIs, and disable the more annoying clippy lints.
#![deny(missing_docs)]
#![allow(clippy::bool_assert_comparison)]
#![allow(clippy::needless_return)]

pub mod config;
pub mod errors;
pub mod key;

pub use crossterm;
pub use keydispatch;
