//! # Key bindings
//!
//! ## Overview
//!
//! A [KeyBinding] maps a [KeySequence] typed in a given mode (and, optionally, while a given
//! scope is active) to the id of an action. Binding tables are plain ordered lists; matching is
//! a linear scan per keystroke via [match_binding].
use std::str::FromStr;

use serde::Deserialize;

use crate::key::{KeyError, KeySequence, KeyStroke};

/// A single entry in a binding table.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct KeyBinding {
    /// The mode this binding is active in.
    pub mode: String,

    /// The keys that must be typed, in order.
    pub keys: KeySequence,

    /// The id of the action to run.
    pub action: String,

    /// When set, the binding is only active while the host reports this scope.
    #[serde(default)]
    pub scope: Option<String>,

    /// A short, human-readable description.
    #[serde(default)]
    pub description: Option<String>,
}

impl KeyBinding {
    /// Create a global binding, parsing `keys` as a whitespace-separated sequence of steps.
    pub fn new<M, A>(mode: M, keys: &str, action: A) -> Result<Self, KeyError>
    where
        M: Into<String>,
        A: Into<String>,
    {
        let keys = KeySequence::from_str(keys)?;

        Ok(KeyBinding {
            mode: mode.into(),
            keys,
            action: action.into(),
            scope: None,
            description: None,
        })
    }

    /// Restrict this binding to a scope.
    pub fn scoped<S: Into<String>>(mut self, scope: S) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Attach a description to this binding.
    pub fn described<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this binding participates in matching for the given mode and scope.
    ///
    /// Bindings without a scope are global; scoped bindings require the host's current scope to
    /// be the same.
    pub fn is_active(&self, mode: &str, scope: Option<&str>) -> bool {
        if self.mode != mode {
            return false;
        }

        match &self.scope {
            None => true,
            Some(s) => scope == Some(s.as_str()),
        }
    }

    /// Whether this binding is restricted to a scope.
    pub fn is_scoped(&self) -> bool {
        self.scope.is_some()
    }
}

/// How far a key sequence has progressed towards a binding.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BindingMatch {
    /// The new key completes the binding.
    Full,
    /// The new key continues the binding, but more keys are needed.
    Prefix,
    /// The keys typed so far cannot reach the binding.
    None,
}

/// Compare previously typed keys plus a new key against a sequence of steps.
pub fn match_sequence(pending: &[KeyStroke], stroke: &KeyStroke, keys: &KeySequence) -> BindingMatch {
    let steps = keys.steps();
    let n = pending.len();

    if n >= steps.len() {
        return BindingMatch::None;
    }

    let typed = pending.iter().zip(steps.iter()).all(|(p, s)| s.matches(p));

    if !typed || !steps[n].matches(stroke) {
        return BindingMatch::None;
    }

    if n + 1 == steps.len() {
        BindingMatch::Full
    } else {
        BindingMatch::Prefix
    }
}

/// Compare previously typed keys plus a new key against a binding.
pub fn match_binding(pending: &[KeyStroke], stroke: &KeyStroke, binding: &KeyBinding) -> BindingMatch {
    match_sequence(pending, stroke, &binding.keys)
}
