//! # Terminal keys
//!
//! ## Overview
//!
//! This module converts [crossterm] key events into the DOM-style [KeyEvent]s understood by
//! [keydispatch](crate::keydispatch).
//!
//! ```
//! use crossterm::event::{KeyCode, KeyEvent as TerminalKeyEvent, KeyModifiers};
//! use keydispatch_term::key::convert_key;
//!
//! let ke = TerminalKeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
//! let key = convert_key(&ke).unwrap();
//!
//! assert_eq!(key.stroke().to_string(), "Ctrl+n");
//! ```
use crossterm::event::{
    KeyCode,
    KeyEvent as TerminalKeyEvent,
    KeyEventKind,
    KeyModifiers,
    MediaKeyCode,
    ModifierKeyCode,
};
use keydispatch::{KeyEvent, Modifiers};

/// Map crossterm's modifier flags onto the engine's.
pub fn convert_modifiers(modifiers: KeyModifiers) -> Modifiers {
    let mut res = Modifiers::NONE;

    if modifiers.contains(KeyModifiers::CONTROL) {
        res |= Modifiers::CTRL;
    }

    if modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        res |= Modifiers::META;
    }

    if modifiers.contains(KeyModifiers::ALT) {
        res |= Modifiers::ALT;
    }

    if modifiers.contains(KeyModifiers::SHIFT) {
        res |= Modifiers::SHIFT;
    }

    return res;
}

fn modifier_name(code: ModifierKeyCode) -> Option<&'static str> {
    let name = match code {
        ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => "Shift",
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => "Control",
        ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => "Alt",
        ModifierKeyCode::LeftSuper | ModifierKeyCode::RightSuper => "Meta",
        ModifierKeyCode::LeftHyper | ModifierKeyCode::RightHyper => "Meta",
        ModifierKeyCode::LeftMeta | ModifierKeyCode::RightMeta => "Meta",
        ModifierKeyCode::IsoLevel3Shift | ModifierKeyCode::IsoLevel5Shift => {
            return None;
        },
    };

    Some(name)
}

fn media_name(code: MediaKeyCode) -> &'static str {
    match code {
        MediaKeyCode::PlayPause => "MediaPlayPause",
        MediaKeyCode::Play => "MediaPlay",
        MediaKeyCode::Pause => "MediaPause",
        MediaKeyCode::Reverse => "MediaReverse",
        MediaKeyCode::Stop => "MediaStop",
        MediaKeyCode::FastForward => "MediaFastForward",
        MediaKeyCode::Rewind => "MediaRewind",
        MediaKeyCode::TrackNext => "MediaTrackNext",
        MediaKeyCode::TrackPrevious => "MediaTrackPrevious",
        MediaKeyCode::Record => "MediaRecord",
        MediaKeyCode::LowerVolume => "AudioVolumeDown",
        MediaKeyCode::RaiseVolume => "AudioVolumeUp",
        MediaKeyCode::MuteVolume => "AudioVolumeMute",
    }
}

/// Return the DOM-style key value for a crossterm key code.
///
/// Codes that have no sensible key value, like [KeyCode::Null], return [None].
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => {
            return Some(c.to_string());
        },
        KeyCode::F(n) => {
            return Some(format!("F{n}"));
        },
        KeyCode::Modifier(m) => {
            return modifier_name(m).map(String::from);
        },
        KeyCode::Media(m) => media_name(m),
        KeyCode::Esc => keydispatch::ESCAPE,
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Enter => "Enter",
        KeyCode::Tab | KeyCode::BackTab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Delete => "Delete",
        KeyCode::Insert => "Insert",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::CapsLock => "CapsLock",
        KeyCode::ScrollLock => "ScrollLock",
        KeyCode::NumLock => "NumLock",
        KeyCode::PrintScreen => "PrintScreen",
        KeyCode::Pause => "Pause",
        KeyCode::Menu => "ContextMenu",
        KeyCode::Null | KeyCode::KeypadBegin => {
            return None;
        },
    };

    Some(name.to_string())
}

/// Convert a terminal key event into the engine's representation.
///
/// Release events are dropped, since the engine only acts on presses.
pub fn convert_key(ke: &TerminalKeyEvent) -> Option<KeyEvent> {
    if ke.kind == KeyEventKind::Release {
        return None;
    }

    let key = key_name(ke.code)?;
    let mut modifiers = convert_modifiers(ke.modifiers);

    match ke.code {
        KeyCode::BackTab => {
            modifiers |= Modifiers::SHIFT;
        },
        KeyCode::Char(c) if c.is_uppercase() => {
            // Not every terminal reports Shift alongside uppercase characters.
            modifiers |= Modifiers::SHIFT;
        },
        _ => {},
    }

    Some(KeyEvent::new(key, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! term {
        ($c: expr) => {
            TerminalKeyEvent::new($c, KeyModifiers::NONE)
        };
        ($c: expr, $km: expr) => {
            TerminalKeyEvent::new($c, $km)
        };
    }

    macro_rules! token {
        ($ke: expr) => {
            convert_key(&$ke).unwrap().stroke().to_string()
        };
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(token!(term!(KeyCode::Esc)), "Escape");
        assert_eq!(token!(term!(KeyCode::Up)), "ArrowUp");
        assert_eq!(token!(term!(KeyCode::Down)), "ArrowDown");
        assert_eq!(token!(term!(KeyCode::Left)), "ArrowLeft");
        assert_eq!(token!(term!(KeyCode::Right)), "ArrowRight");
        assert_eq!(token!(term!(KeyCode::Enter)), "Enter");
        assert_eq!(token!(term!(KeyCode::F(5))), "F5");
        assert_eq!(token!(term!(KeyCode::Menu)), "ContextMenu");
        assert_eq!(token!(term!(KeyCode::PageDown, KeyModifiers::CONTROL)), "Ctrl+PageDown");
    }

    #[test]
    fn test_characters() {
        assert_eq!(token!(term!(KeyCode::Char('g'))), "g");
        assert_eq!(token!(term!(KeyCode::Char(' '))), "Space");
        assert_eq!(token!(term!(KeyCode::Char('n'), KeyModifiers::CONTROL)), "Ctrl+n");
        assert_eq!(token!(term!(KeyCode::Char('x'), KeyModifiers::ALT)), "Alt+x");

        // Uppercase letters always carry Shift, however the terminal reports them.
        assert_eq!(token!(term!(KeyCode::Char('G'))), "Shift+G");
        assert_eq!(token!(term!(KeyCode::Char('G'), KeyModifiers::SHIFT)), "Shift+G");
    }

    #[test]
    fn test_backtab() {
        let key = convert_key(&term!(KeyCode::BackTab, KeyModifiers::SHIFT)).unwrap();

        assert_eq!(key.key(), "Tab");
        assert_eq!(key.modifiers(), Modifiers::SHIFT);
        assert_eq!(key.stroke().to_string(), "Tab");
    }

    #[test]
    fn test_modifier_keys() {
        let shift = convert_key(&term!(KeyCode::Modifier(ModifierKeyCode::LeftShift))).unwrap();
        assert_eq!(shift.key(), "Shift");
        assert_eq!(shift.is_modifier(), true);

        let ctrl = convert_key(&term!(KeyCode::Modifier(ModifierKeyCode::RightControl))).unwrap();
        assert_eq!(ctrl.key(), "Control");

        let sup = convert_key(&term!(KeyCode::Modifier(ModifierKeyCode::LeftSuper))).unwrap();
        assert_eq!(sup.key(), "Meta");

        assert_eq!(convert_key(&term!(KeyCode::Modifier(ModifierKeyCode::IsoLevel3Shift))), None);
    }

    #[test]
    fn test_modifier_flags() {
        let all = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;

        assert_eq!(convert_modifiers(KeyModifiers::NONE), Modifiers::NONE);
        assert_eq!(convert_modifiers(KeyModifiers::SUPER), Modifiers::META);
        assert_eq!(convert_modifiers(KeyModifiers::META), Modifiers::META);
        assert_eq!(convert_modifiers(all), Modifiers::CTRL | Modifiers::ALT | Modifiers::SHIFT);
    }

    #[test]
    fn test_release_ignored() {
        let press = term!(KeyCode::Char('d'));
        let release =
            TerminalKeyEvent::new_with_kind(KeyCode::Char('d'), KeyModifiers::NONE, KeyEventKind::Release);
        let repeat =
            TerminalKeyEvent::new_with_kind(KeyCode::Char('d'), KeyModifiers::NONE, KeyEventKind::Repeat);

        assert_eq!(convert_key(&press).is_some(), true);
        assert_eq!(convert_key(&release), None);
        assert_eq!(convert_key(&repeat).is_some(), true);
    }

    #[test]
    fn test_unnamed_codes() {
        assert_eq!(convert_key(&term!(KeyCode::Null)), None);
        assert_eq!(convert_key(&term!(KeyCode::KeypadBegin)), None);
    }
}
