use std::fmt;
use std::str::FromStr;

use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use winit::keyboard::{KeyCode, ModifiersState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            ctrl: state.control_key(),
            shift: state.shift_key(),
            alt: state.alt_key(),
            meta: state.super_key(),
        }
    }
}

/// A single keyboard event as delivered to the command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub phase: KeyPhase,
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn down(key: KeyCode) -> Self {
        Self {
            phase: KeyPhase::Down,
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn up(key: KeyCode) -> Self {
        Self {
            phase: KeyPhase::Up,
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HotkeyParseError {
    #[error("hotkey text is empty")]
    Empty,
    #[error("unknown modifier '{0}' (expected Ctrl, Shift, Alt or Meta)")]
    UnknownModifier(String),
    #[error("duplicate modifier '{0}'")]
    DuplicateModifier(String),
    #[error("unknown key name '{name}': {reason}")]
    UnknownKey { name: String, reason: String },
}

/// Key chord that a logical action can be bound to. The textual form is
/// `Ctrl+Shift+KeyS`, where the last segment is a winit `KeyCode` name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hotkey {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl Hotkey {
    pub const fn new(key: KeyCode) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub const fn with_modifiers(key: KeyCode, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn from_key_input(input: &KeyInput) -> Self {
        Self {
            key: input.key,
            modifiers: input.modifiers,
        }
    }

    pub fn parse(text: &str) -> Result<Self, HotkeyParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut segments = trimmed.split('+').map(str::trim).collect::<Vec<_>>();
        let key_name = segments.pop().ok_or(HotkeyParseError::Empty)?;
        if key_name.is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut modifiers = Modifiers::NONE;
        for segment in segments {
            let flag = match segment.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => &mut modifiers.ctrl,
                "shift" => &mut modifiers.shift,
                "alt" => &mut modifiers.alt,
                "meta" | "super" | "cmd" => &mut modifiers.meta,
                _ => return Err(HotkeyParseError::UnknownModifier(segment.to_string())),
            };
            if *flag {
                return Err(HotkeyParseError::DuplicateModifier(segment.to_string()));
            }
            *flag = true;
        }

        Ok(Self {
            key: parse_key_code(key_name)?,
            modifiers,
        })
    }
}

fn parse_key_code(name: &str) -> Result<KeyCode, HotkeyParseError> {
    let deserializer: StrDeserializer<'_, ValueError> = name.into_deserializer();
    KeyCode::deserialize(deserializer).map_err(|error| HotkeyParseError::UnknownKey {
        name: name.to_string(),
        reason: error.to_string(),
    })
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.shift {
            f.write_str("Shift+")?;
        }
        if self.modifiers.alt {
            f.write_str("Alt+")?;
        }
        if self.modifiers.meta {
            f.write_str("Meta+")?;
        }
        // KeyCode's Debug output is its variant name, which is also what parse accepts.
        write!(f, "{:?}", self.key)
    }
}

impl FromStr for Hotkey {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Hotkey {
    type Error = HotkeyParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Hotkey> for String {
    fn from(value: Hotkey) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_key() {
        let hotkey = Hotkey::parse("KeyS").expect("parse");
        assert_eq!(hotkey, Hotkey::new(KeyCode::KeyS));
    }

    #[test]
    fn parse_modifiers_in_any_case() {
        let hotkey = Hotkey::parse("ctrl+Shift+F5").expect("parse");
        assert_eq!(hotkey.key, KeyCode::F5);
        assert!(hotkey.modifiers.ctrl);
        assert!(hotkey.modifiers.shift);
        assert!(!hotkey.modifiers.alt);
        assert!(!hotkey.modifiers.meta);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let hotkey = Hotkey::with_modifiers(
            KeyCode::Backspace,
            Modifiers {
                alt: true,
                ..Modifiers::NONE
            },
        );
        assert_eq!(hotkey.to_string(), "Alt+Backspace");
        assert_eq!(Hotkey::parse(&hotkey.to_string()).expect("parse"), hotkey);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(Hotkey::parse("  "), Err(HotkeyParseError::Empty));
        assert_eq!(Hotkey::parse("Ctrl+"), Err(HotkeyParseError::Empty));
        assert!(matches!(
            Hotkey::parse("Hyper+KeyA"),
            Err(HotkeyParseError::UnknownModifier(_))
        ));
        assert!(matches!(
            Hotkey::parse("Ctrl+Ctrl+KeyA"),
            Err(HotkeyParseError::DuplicateModifier(_))
        ));
        assert!(matches!(
            Hotkey::parse("NotAKey"),
            Err(HotkeyParseError::UnknownKey { .. })
        ));
    }

    #[test]
    fn hotkey_from_key_input_keeps_modifiers() {
        let modifiers = Modifiers {
            shift: true,
            ..Modifiers::NONE
        };
        let input = KeyInput::down(KeyCode::Tab).with_modifiers(modifiers);
        let hotkey = Hotkey::from_key_input(&input);
        assert_eq!(hotkey, Hotkey::with_modifiers(KeyCode::Tab, modifiers));
        assert_ne!(hotkey, Hotkey::new(KeyCode::Tab));
    }

    #[test]
    fn modifiers_convert_from_winit_state() {
        let state = ModifiersState::CONTROL | ModifiersState::ALT;
        let modifiers = Modifiers::from(state);
        assert!(modifiers.ctrl);
        assert!(modifiers.alt);
        assert!(!modifiers.shift);
        assert!(!modifiers.meta);
        assert!(Modifiers::from(ModifiersState::empty()).is_empty());
    }
}
