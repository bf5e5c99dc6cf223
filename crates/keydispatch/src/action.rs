//! # Actions
//!
//! ## Overview
//!
//! Bindings refer to actions by id. Before each dispatch, the host supplies an [ActionMap] that
//! resolves those ids into one of three kinds of [ResolvedAction]:
//!
//! * [CommandAction]s run immediately, given an optional count.
//! * [MotionAction]s compute a [TextRange], optionally after waiting for a character argument.
//! * [OperatorAction]s wait for a motion, and then act on the range it produces.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type SelectFn = dyn Fn(Option<usize>) + Send + Sync;
type RangeFn = dyn Fn(Option<usize>, Option<&str>) -> TextRange + Send + Sync;
type ApplyFn = dyn Fn(TextRange) + Send + Sync;

/// Lookup table from action ids to their handlers.
pub type ActionMap = HashMap<String, ResolvedAction>;

/// The span of content produced by a motion.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct TextRange {
    /// Where the range starts.
    pub from: usize,
    /// Where the range ends.
    pub to: usize,
}

impl TextRange {
    /// Create a new range.
    pub fn new(from: usize, to: usize) -> Self {
        TextRange { from, to }
    }
}

/// The different kinds of [ResolvedAction].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ActionKind {
    /// See [CommandAction].
    Command,
    /// See [MotionAction].
    Motion,
    /// See [OperatorAction].
    Operator,
}

/// An action that runs as soon as its binding is typed.
#[derive(Clone)]
pub struct CommandAction {
    id: Arc<str>,
    on_select: Arc<SelectFn>,
}

impl CommandAction {
    /// Create a new command.
    pub fn new<F>(id: &str, on_select: F) -> Self
    where
        F: Fn(Option<usize>) + Send + Sync + 'static,
    {
        CommandAction { id: id.into(), on_select: Arc::new(on_select) }
    }

    /// The id this command is registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run this command.
    pub fn select(&self, count: Option<usize>) {
        (self.on_select)(count)
    }
}

/// An action that produces a range, either on its own or as the target of an operator.
#[derive(Clone)]
pub struct MotionAction {
    id: Arc<str>,
    range: Arc<RangeFn>,
    await_char: bool,
}

impl MotionAction {
    /// Create a new motion.
    pub fn new<F>(id: &str, range: F) -> Self
    where
        F: Fn(Option<usize>, Option<&str>) -> TextRange + Send + Sync + 'static,
    {
        MotionAction { id: id.into(), range: Arc::new(range), await_char: false }
    }

    /// Make this motion wait for a single character argument before it completes (like Vim's
    /// `f`).
    pub fn awaiting_char(mut self) -> Self {
        self.await_char = true;
        self
    }

    /// The id this motion is registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this motion needs a character argument.
    pub fn awaits_char(&self) -> bool {
        self.await_char
    }

    /// Compute the range covered by this motion.
    pub fn range(&self, count: Option<usize>, ch: Option<&str>) -> TextRange {
        (self.range)(count, ch)
    }
}

/// An action that acts upon the range produced by a following motion.
#[derive(Clone)]
pub struct OperatorAction {
    id: Arc<str>,
    apply: Arc<ApplyFn>,
}

impl OperatorAction {
    /// Create a new operator.
    pub fn new<F>(id: &str, apply: F) -> Self
    where
        F: Fn(TextRange) + Send + Sync + 'static,
    {
        OperatorAction { id: id.into(), apply: Arc::new(apply) }
    }

    /// The id this operator is registered under.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Apply this operator to a range.
    pub fn apply(&self, range: TextRange) {
        (self.apply)(range)
    }
}

macro_rules! handler_impls {
    ($t: ty, $field: ident) => {
        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($t)).field("id", &self.id).finish_non_exhaustive()
            }
        }

        impl PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id && Arc::ptr_eq(&self.$field, &other.$field)
            }
        }

        impl Eq for $t {}
    };
}

handler_impls!(CommandAction, on_select);
handler_impls!(MotionAction, range);
handler_impls!(OperatorAction, apply);

/// An action id resolved into its handler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResolvedAction {
    /// A command.
    Command(CommandAction),
    /// A motion.
    Motion(MotionAction),
    /// An operator.
    Operator(OperatorAction),
}

impl ResolvedAction {
    /// Shorthand for creating a [ResolvedAction::Command].
    pub fn command<F>(id: &str, on_select: F) -> Self
    where
        F: Fn(Option<usize>) + Send + Sync + 'static,
    {
        ResolvedAction::Command(CommandAction::new(id, on_select))
    }

    /// Shorthand for creating a [ResolvedAction::Motion].
    pub fn motion<F>(id: &str, range: F) -> Self
    where
        F: Fn(Option<usize>, Option<&str>) -> TextRange + Send + Sync + 'static,
    {
        ResolvedAction::Motion(MotionAction::new(id, range))
    }

    /// Shorthand for creating a [ResolvedAction::Motion] that waits for a character.
    pub fn char_motion<F>(id: &str, range: F) -> Self
    where
        F: Fn(Option<usize>, Option<&str>) -> TextRange + Send + Sync + 'static,
    {
        ResolvedAction::Motion(MotionAction::new(id, range).awaiting_char())
    }

    /// Shorthand for creating a [ResolvedAction::Operator].
    pub fn operator<F>(id: &str, apply: F) -> Self
    where
        F: Fn(TextRange) + Send + Sync + 'static,
    {
        ResolvedAction::Operator(OperatorAction::new(id, apply))
    }

    /// The id of this action.
    pub fn id(&self) -> &str {
        match self {
            ResolvedAction::Command(c) => c.id(),
            ResolvedAction::Motion(m) => m.id(),
            ResolvedAction::Operator(o) => o.id(),
        }
    }

    /// What kind of action this is.
    pub fn kind(&self) -> ActionKind {
        match self {
            ResolvedAction::Command(_) => ActionKind::Command,
            ResolvedAction::Motion(_) => ActionKind::Motion,
            ResolvedAction::Operator(_) => ActionKind::Operator,
        }
    }
}
