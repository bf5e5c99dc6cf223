//! # Keys
//!
//! ## Overview
//!
//! This module contains the canonical representation of key presses.
//!
//! Hosts describe a press as a [KeyEvent]: a DOM-style key value (`"a"`, `"G"`, `" "`,
//! `"ArrowUp"`, `"Escape"`) and the held [Modifiers]. The engine normalizes every event into a
//! [KeyStroke], whose printed form is the token stored while a sequence is pending (`"Ctrl+n"`,
//! `"Shift+G"`, `"Space"`).
//!
//! Bindings describe what they accept as a [KeySequence] of [KeySteps](KeyStep), written as
//! whitespace-separated steps of the form `Modifier+...+key`:
//!
//! ```
//! use keydispatch::{KeyEvent, KeySequence, Modifiers};
//!
//! let seq: KeySequence = "Ctrl+w Space".parse().unwrap();
//! assert_eq!(seq.len(), 2);
//!
//! let stroke = KeyEvent::new("w", Modifiers::CTRL).stroke();
//! assert!(seq.steps()[0].matches(&stroke));
//! assert_eq!(stroke.to_string(), "Ctrl+w");
//! ```
use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::char,
    combinator::{eof, rest, value, verify},
    multi::fold_many0,
    IResult,
};
use serde::Deserialize;
use unicode_segmentation::UnicodeSegmentation;

/// Key value for the Escape key.
pub const ESCAPE: &str = "Escape";

/// Readable name used for the space bar in tokens and binding steps.
const SPACE_NAME: &str = "Space";

/// Key values reported when a modifier is pressed on its own.
const MODIFIER_KEYS: [&str; 4] = ["Control", "Meta", "Alt", "Shift"];

/// Errors that occur while parsing key tokens and binding sequences.
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum KeyError {
    /// An empty string was given where a key was expected.
    #[error("Empty key")]
    EmptyKey,

    /// A step could not be interpreted as a key with modifiers.
    #[error("Invalid key step: {0:?}")]
    InvalidStep(String),

    /// A binding sequence contained no steps.
    #[error("Empty key sequence")]
    EmptySequence,
}

bitflags! {
    /// Modifier keys held during a key press.
    #[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
    pub struct Modifiers: u8 {
        /// The Control key.
        const CTRL = 0b0001;
        /// The Meta (Command, Super) key.
        const META = 0b0010;
        /// The Alt (Option) key.
        const ALT = 0b0100;
        /// The Shift key.
        const SHIFT = 0b1000;
    }
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers::empty();

    /// Modifiers that must agree exactly between a binding step and a key press.
    const EXACT: Modifiers = Modifiers::CTRL.union(Modifiers::META).union(Modifiers::ALT);

    fn push_names(&self, out: &mut String) {
        if self.contains(Modifiers::CTRL) {
            out.push_str("Ctrl+");
        }

        if self.contains(Modifiers::META) {
            out.push_str("Meta+");
        }

        if self.contains(Modifiers::ALT) {
            out.push_str("Alt+");
        }

        if self.contains(Modifiers::SHIFT) {
            out.push_str("Shift+");
        }
    }
}

/// Whether a key value names a single printable character rather than a named key.
fn is_single_char(key: &str) -> bool {
    let mut graphemes = key.graphemes(true);

    graphemes.next().is_some() && graphemes.next().is_none()
}

fn key_from_name(name: &str) -> &str {
    if name == SPACE_NAME {
        " "
    } else {
        name
    }
}

fn push_key_name(out: &mut String, key: &str) {
    if key == " " {
        out.push_str(SPACE_NAME);
    } else {
        out.push_str(key);
    }
}

fn parse_modifier(input: &str) -> IResult<&str, Modifiers> {
    let (input, m) = alt((
        value(Modifiers::CTRL, tag("Ctrl")),
        value(Modifiers::META, tag("Meta")),
        value(Modifiers::ALT, tag("Alt")),
        value(Modifiers::SHIFT, tag("Shift")),
    ))(input)?;
    let (input, _) = char('+')(input)?;

    Ok((input, m))
}

fn parse_key_name(input: &str) -> IResult<&str, &str> {
    verify(rest, |k: &str| k == "+" || (!k.is_empty() && !k.contains('+')))(input)
}

fn parse_step(input: &str) -> IResult<&str, (Modifiers, &str)> {
    let (input, mods) = fold_many0(parse_modifier, Modifiers::empty, |acc, m| acc | m)(input)?;
    let (input, key) = parse_key_name(input)?;
    let (input, _) = eof(input)?;

    Ok((input, (mods, key_from_name(key))))
}

fn parse_step_str(input: &str) -> Result<(Modifiers, String), KeyError> {
    if input.is_empty() {
        return Err(KeyError::EmptyKey);
    }

    match parse_step(input) {
        Ok((_, (mods, key))) => Ok((mods, key.to_string())),
        Err(_) => Err(KeyError::InvalidStep(input.to_string())),
    }
}

/// A raw key press, as reported by the host.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyEvent {
    key: String,
    modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key press from a DOM-style key value and the held modifiers.
    pub fn new<K: Into<String>>(key: K, modifiers: Modifiers) -> Self {
        KeyEvent { key: key.into(), modifiers }
    }

    /// The key value for this press.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// The modifiers held during this press.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether this press is a modifier key on its own.
    pub fn is_modifier(&self) -> bool {
        MODIFIER_KEYS.contains(&self.key.as_str())
    }

    /// Whether this press is the Escape key.
    pub fn is_escape(&self) -> bool {
        self.key == ESCAPE
    }

    /// Return the printable character typed by this press, if the key is a single character.
    pub fn grapheme(&self) -> Option<&str> {
        if is_single_char(&self.key) {
            Some(self.key.as_str())
        } else {
            None
        }
    }

    /// Return the value of a decimal digit typed without Ctrl, Meta or Alt.
    pub fn digit(&self) -> Option<usize> {
        if self.modifiers.intersects(Modifiers::EXACT) {
            return None;
        }

        let mut chars = self.key.chars();

        match (chars.next(), chars.next()) {
            (Some(c @ '0'..='9'), None) => c.to_digit(10).map(|d| d as usize),
            _ => None,
        }
    }

    /// Normalize this press into its canonical [KeyStroke].
    ///
    /// Shift is only kept for single-character keys, since named keys like `"ArrowUp"` never
    /// need it spelled out.
    pub fn stroke(&self) -> KeyStroke {
        let mut modifiers = self.modifiers;

        if !is_single_char(&self.key) {
            modifiers -= Modifiers::SHIFT;
        }

        KeyStroke { key: self.key.clone(), modifiers }
    }
}

impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        let modifiers = if c.is_uppercase() { Modifiers::SHIFT } else { Modifiers::NONE };

        KeyEvent::new(c.to_string(), modifiers)
    }
}

impl From<&str> for KeyEvent {
    fn from(key: &str) -> Self {
        let mut chars = key.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => KeyEvent::from(c),
            _ => KeyEvent::new(key, Modifiers::NONE),
        }
    }
}

/// The canonical, normalized form of a key press.
///
/// Printing a [KeyStroke] produces its token (`"Ctrl+n"`, `"Shift+G"`, `"Space"`), and parsing a
/// token produces the [KeyStroke] again.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyStroke {
    key: String,
    modifiers: Modifiers,
}

impl KeyStroke {
    /// The key value, with the space bar represented as `" "`.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// The modifiers that are part of this stroke.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl fmt::Display for KeyStroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut res = String::new();

        self.modifiers.push_names(&mut res);
        push_key_name(&mut res, &self.key);

        f.write_str(&res)
    }
}

impl FromStr for KeyStroke {
    type Err = KeyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (modifiers, key) = parse_step_str(input)?;

        Ok(KeyEvent::new(key, modifiers).stroke())
    }
}

/// One step of a binding's key sequence.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyStep {
    key: String,
    modifiers: Modifiers,
}

impl KeyStep {
    /// The key value this step accepts.
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// The modifiers declared by this step.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Check whether a normalized key press satisfies this step.
    ///
    /// Ctrl, Meta and Alt must agree exactly. Shift is only checked for single-character keys
    /// that declare it, since the character itself already says whether Shift was held (`"G"`
    /// rather than `"Shift+g"`), and named keys ignore it.
    pub fn matches(&self, stroke: &KeyStroke) -> bool {
        if self.key != stroke.key {
            return false;
        }

        if (self.modifiers & Modifiers::EXACT) != (stroke.modifiers & Modifiers::EXACT) {
            return false;
        }

        if self.modifiers.contains(Modifiers::SHIFT) && is_single_char(&self.key) {
            return stroke.modifiers.contains(Modifiers::SHIFT);
        }

        return true;
    }
}

impl fmt::Display for KeyStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut res = String::new();

        self.modifiers.push_names(&mut res);
        push_key_name(&mut res, &self.key);

        f.write_str(&res)
    }
}

impl FromStr for KeyStep {
    type Err = KeyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (modifiers, key) = parse_step_str(input)?;

        Ok(KeyStep { key, modifiers })
    }
}

/// The series of steps that must be typed to reach a binding's action.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(try_from = "String")]
pub struct KeySequence {
    steps: Vec<KeyStep>,
}

impl KeySequence {
    /// The steps in this sequence.
    pub fn steps(&self) -> &[KeyStep] {
        self.steps.as_slice()
    }

    /// The number of steps in this sequence.
    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for step in self.steps.iter() {
            if !first {
                f.write_str(" ")?;
            }

            write!(f, "{step}")?;
            first = false;
        }

        Ok(())
    }
}

impl FromStr for KeySequence {
    type Err = KeyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let steps = input
            .split_whitespace()
            .map(KeyStep::from_str)
            .collect::<Result<Vec<_>, _>>()?;

        if steps.is_empty() {
            return Err(KeyError::EmptySequence);
        }

        Ok(KeySequence { steps })
    }
}

impl TryFrom<String> for KeySequence {
    type Error = KeyError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        KeySequence::from_str(&input)
    }
}
