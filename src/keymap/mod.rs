//! Resolves user-configured key names into bindings.
//!
//! A configured list such as `["j", "Up", "Ctrl+N"]` is split into single
//! characters (`runes`), named key codes (`codes`) and modifier chords
//! (`chords`). Names that cannot be decoded are dropped with a warning;
//! resolution itself never fails.

use crate::config::Settings;
use crate::core::event::{folded_char, KeyCode, KeyEvent, KeyModifiers};

pub const DEFAULT_UP_KEYS: [&str; 2] = ["j", "Up"];
pub const DEFAULT_DOWN_KEYS: [&str; 2] = ["k", "Down"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyBinding {
    Rune(char),
    Code(KeyCode),
    Chord(KeyCode, KeyModifiers),
}

impl KeyBinding {
    /// Classifies a single configured string.
    pub fn parse(value: &str) -> Option<Self> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => ch.to_lowercase().next().map(KeyBinding::Rune),
            (Some(_), Some(_)) if value.contains('+') => {
                decode_chord(value).map(|(code, modifiers)| KeyBinding::Chord(code, modifiers))
            }
            (Some(_), Some(_)) => decode_key_name(value).map(KeyBinding::Code),
            (None, _) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyBindingSet {
    runes: Vec<char>,
    codes: Vec<KeyCode>,
    chords: Vec<(KeyCode, KeyModifiers)>,
}

impl KeyBindingSet {
    pub fn resolve<S: AsRef<str>>(keys: &[S]) -> Self {
        let mut set = Self::default();
        for key in keys {
            let key = key.as_ref();
            match KeyBinding::parse(key) {
                Some(KeyBinding::Rune(ch)) => {
                    if !set.runes.contains(&ch) {
                        set.runes.push(ch);
                    }
                }
                Some(KeyBinding::Code(code)) => {
                    if !set.codes.contains(&code) {
                        set.codes.push(code);
                    }
                }
                Some(KeyBinding::Chord(code, modifiers)) => {
                    if !set.chords.contains(&(code, modifiers)) {
                        set.chords.push((code, modifiers));
                    }
                }
                None => tracing::warn!(key, "unknown key name in key bindings, ignoring"),
            }
        }
        set
    }

    /// Like [`resolve`](Self::resolve), but seeds `defaults` when the
    /// configured list yields no binding at all.
    pub fn resolve_or<S: AsRef<str>>(keys: &[S], defaults: &[&str]) -> Self {
        let set = Self::resolve(keys);
        if set.is_empty() {
            if !keys.is_empty() {
                tracing::warn!(?defaults, "no usable key bindings configured, using defaults");
            }
            return Self::resolve(defaults);
        }
        set
    }

    pub fn runes(&self) -> &[char] {
        &self.runes
    }

    pub fn codes(&self) -> &[KeyCode] {
        &self.codes
    }

    pub fn chords(&self) -> &[(KeyCode, KeyModifiers)] {
        &self.chords
    }

    pub fn is_empty(&self) -> bool {
        self.runes.is_empty() && self.codes.is_empty() && self.chords.is_empty()
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        if !self.chords.is_empty() && self.chords.contains(&chord_key(event.code, event.modifiers)) {
            return true;
        }
        if let Some(ch) = folded_char(event) {
            if self.runes.contains(&ch) {
                return true;
            }
        }
        if event
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return false;
        }
        self.codes.contains(&event.code)
    }
}

/// Bindings for every remappable purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: KeyBindingSet,
    pub down: KeyBindingSet,
}

impl KeyBindings {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            up: KeyBindingSet::resolve_or(settings.up_keys.as_slice(), &DEFAULT_UP_KEYS),
            down: KeyBindingSet::resolve_or(settings.down_keys.as_slice(), &DEFAULT_DOWN_KEYS),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: KeyBindingSet::resolve(&DEFAULT_UP_KEYS),
            down: KeyBindingSet::resolve(&DEFAULT_DOWN_KEYS),
        }
    }
}

/// Decodes a key name such as `"Up"`, `"PageDown"` or `"F5"`.
/// Matching is case-insensitive.
pub fn decode_key_name(value: &str) -> Option<KeyCode> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }

    let v_lc = v.to_ascii_lowercase();
    let code = match v_lc.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" | "backspace2" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" | "ins" => KeyCode::Insert,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" | "pgup" => KeyCode::PageUp,
        "pagedown" | "pgdn" => KeyCode::PageDown,
        "space" => KeyCode::Char(' '),
        _ if v_lc.starts_with('f') => {
            let n = v_lc.strip_prefix('f')?.parse::<u8>().ok()?;
            if !(1..=24).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
        _ => return None,
    };

    Some(code)
}

/// Decodes a modifier chord such as `"Ctrl+J"`, `"Alt+Up"` or
/// `"ctrl+shift+f5"`. Letters are case-insensitive, so `"Ctrl+J"` is the
/// same chord as `"Ctrl+j"`.
pub fn decode_chord(value: &str) -> Option<(KeyCode, KeyModifiers)> {
    let mut modifiers = KeyModifiers::NONE;
    let mut key_part = None;
    for part in value.split('+').map(str::trim) {
        match part.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "alt" | "meta" | "option" => modifiers |= KeyModifiers::ALT,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            _ if key_part.is_none() && !part.is_empty() => key_part = Some(part),
            _ => return None,
        }
    }
    let key_part = key_part?;
    if modifiers.is_empty() {
        return None;
    }

    let mut chars = key_part.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(ch), None) => KeyCode::Char(ch),
        _ => decode_key_name(key_part)?,
    };
    Some(chord_key(code, modifiers))
}

/// Canonical form shared by configured chords and incoming events. Shift
/// only counts for named keys; letters fold to lower case.
fn chord_key(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    let modifiers =
        modifiers.intersection(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
    match code {
        KeyCode::Char(ch) => (
            KeyCode::Char(ch.to_lowercase().next().unwrap_or(ch)),
            modifiers.difference(KeyModifiers::SHIFT),
        ),
        other => (other, modifiers),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/keymap.rs"]
mod tests;
