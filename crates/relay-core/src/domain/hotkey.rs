//! Capture toggle hotkey: binding model and `[MOD(+MOD)*+]KEY` parser.
//!
//! A binding is evaluated on two paths.  The low-level keyboard path tracks
//! ctrl/shift/alt/win itself and calls [`HotkeyBinding::matches`]; the
//! OS-global registration path hands [`HotkeyBinding::os_modifier_bits`] to
//! the platform.  Both paths require the same modifier set.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::keymap::windows_vk::{alphanumeric_key, function_key, VK_0, VK_F1, VK_F12};
use crate::keymap::{key_name, ModifierState};

// Modifier bits accepted by the global hotkey registration API.
pub const MOD_ALT: u32 = 0x0001;
pub const MOD_CONTROL: u32 = 0x0002;
pub const MOD_SHIFT: u32 = 0x0004;
pub const MOD_WIN: u32 = 0x0008;

/// Errors returned when a hotkey string cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotkeyParseError {
    #[error("hotkey string is empty")]
    Empty,

    #[error("unknown modifier '{0}' (expected CTRL, SHIFT, ALT or WIN)")]
    UnknownModifier(String),

    #[error("unknown key '{0}' (expected A-Z, 0-9 or F1-F12)")]
    UnknownKey(String),

    #[error("hotkey has no key, only modifiers")]
    MissingKey,

    #[error("hotkey names more than one key: '{first}' and '{second}'")]
    DuplicateKey { first: String, second: String },
}

/// The set of modifiers a binding requires.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModifierSet {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub win: bool,
}

/// A toggle hotkey: required modifiers plus one virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    pub modifiers: ModifierSet,
    pub key: u16,
}

impl Default for HotkeyBinding {
    /// `ALT+1`.
    fn default() -> Self {
        Self {
            modifiers: ModifierSet {
                alt: true,
                ..ModifierSet::default()
            },
            key: VK_0 + 1,
        }
    }
}

impl HotkeyBinding {
    /// Returns `true` when `vk` is the bound key and every required
    /// modifier is held.  Extra held modifiers do not block the match.
    pub fn matches(&self, vk: u16, held: &ModifierState) -> bool {
        vk == self.key
            && (!self.modifiers.ctrl || held.ctrl)
            && (!self.modifiers.shift || held.shift)
            && (!self.modifiers.alt || held.alt)
            && (!self.modifiers.win || held.win)
    }

    /// Modifier bitmask for the OS-global hotkey registration.
    pub fn os_modifier_bits(&self) -> u32 {
        let mut bits = 0;
        if self.modifiers.alt {
            bits |= MOD_ALT;
        }
        if self.modifiers.ctrl {
            bits |= MOD_CONTROL;
        }
        if self.modifiers.shift {
            bits |= MOD_SHIFT;
        }
        if self.modifiers.win {
            bits |= MOD_WIN;
        }
        bits
    }
}

impl FromStr for HotkeyBinding {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut modifiers = ModifierSet::default();
        let mut key: Option<(u16, String)> = None;

        for raw in s.split('+') {
            let token = raw.trim().to_ascii_uppercase();
            match token.as_str() {
                "" => return Err(HotkeyParseError::MissingKey),
                "CTRL" | "CONTROL" => modifiers.ctrl = true,
                "SHIFT" => modifiers.shift = true,
                "ALT" => modifiers.alt = true,
                "WIN" => modifiers.win = true,
                _ => {
                    let code = parse_key(&token)?;
                    if let Some((_, first)) = key.take() {
                        return Err(HotkeyParseError::DuplicateKey {
                            first,
                            second: token,
                        });
                    }
                    key = Some((code, token));
                }
            }
        }

        match key {
            Some((key, _)) => Ok(Self { modifiers, key }),
            None => Err(HotkeyParseError::MissingKey),
        }
    }
}

/// Parses the key token of a binding.  Multi-character tokens that are not a
/// function key are reported as unknown modifiers when they sit before the
/// last `+`, so the error names what the user most likely meant.
fn parse_key(token: &str) -> Result<u16, HotkeyParseError> {
    let mut chars = token.chars();
    let first = chars.next();
    let rest = chars.as_str();

    if let (Some(c), true) = (first, rest.is_empty()) {
        return alphanumeric_key(c).ok_or_else(|| HotkeyParseError::UnknownKey(token.to_string()));
    }

    if first == Some('F') {
        if let Some(code) = rest.parse::<u8>().ok().and_then(function_key) {
            return Ok(code);
        }
        return Err(HotkeyParseError::UnknownKey(token.to_string()));
    }

    if token.chars().all(|c| c.is_ascii_alphabetic()) {
        Err(HotkeyParseError::UnknownModifier(token.to_string()))
    } else {
        Err(HotkeyParseError::UnknownKey(token.to_string()))
    }
}

impl fmt::Display for HotkeyBinding {
    /// Canonical form, modifiers in `CTRL+SHIFT+ALT+WIN` order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (held, name) in [
            (m.ctrl, "CTRL"),
            (m.shift, "SHIFT"),
            (m.alt, "ALT"),
            (m.win, "WIN"),
        ] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        if (VK_F1..=VK_F12).contains(&self.key) {
            write!(f, "F{}", self.key - VK_F1 + 1)
        } else {
            f.write_str(&key_name(self.key))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::windows_vk::{VK_A, VK_F1};

    #[test]
    fn test_default_binding_is_alt_1() {
        let binding = HotkeyBinding::default();
        assert_eq!(binding.to_string(), "ALT+1");
        assert_eq!(binding.key, 0x31);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_ignores_whitespace() {
        // Act
        let binding: HotkeyBinding = " ctrl + Shift +k ".parse().expect("parse");

        // Assert
        assert!(binding.modifiers.ctrl);
        assert!(binding.modifiers.shift);
        assert!(!binding.modifiers.alt);
        assert_eq!(binding.key, 0x4B);
        assert_eq!(binding.to_string(), "CTRL+SHIFT+K");
    }

    #[test]
    fn test_parse_control_alias_and_win() {
        let binding: HotkeyBinding = "CONTROL+WIN+F10".parse().expect("parse");
        assert!(binding.modifiers.ctrl);
        assert!(binding.modifiers.win);
        assert_eq!(binding.key, 0x79);
        assert_eq!(binding.to_string(), "CTRL+WIN+F10");
    }

    #[test]
    fn test_parse_bare_key_has_no_modifiers() {
        let binding: HotkeyBinding = "F1".parse().expect("parse");
        assert_eq!(binding.modifiers, ModifierSet::default());
        assert_eq!(binding.key, VK_F1);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<HotkeyBinding>(), Err(HotkeyParseError::Empty));
        assert_eq!("   ".parse::<HotkeyBinding>(), Err(HotkeyParseError::Empty));
        assert_eq!(
            "ALT+".parse::<HotkeyBinding>(),
            Err(HotkeyParseError::MissingKey)
        );
        assert_eq!(
            "CTRL+ALT".parse::<HotkeyBinding>(),
            Err(HotkeyParseError::MissingKey)
        );
        assert_eq!(
            "HYPER+A".parse::<HotkeyBinding>(),
            Err(HotkeyParseError::UnknownModifier("HYPER".into()))
        );
        assert_eq!(
            "ALT+F13".parse::<HotkeyBinding>(),
            Err(HotkeyParseError::UnknownKey("F13".into()))
        );
        assert_eq!(
            "ALT+#".parse::<HotkeyBinding>(),
            Err(HotkeyParseError::UnknownKey("#".into()))
        );
        assert!(matches!(
            "A+B".parse::<HotkeyBinding>(),
            Err(HotkeyParseError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_matches_requires_all_tracked_modifiers() {
        // Arrange
        let binding: HotkeyBinding = "CTRL+ALT+A".parse().expect("parse");
        let only_ctrl = ModifierState {
            ctrl: true,
            ..ModifierState::default()
        };
        let ctrl_alt = ModifierState {
            ctrl: true,
            alt: true,
            ..ModifierState::default()
        };

        // Act / Assert
        assert!(!binding.matches(VK_A, &only_ctrl));
        assert!(binding.matches(VK_A, &ctrl_alt));
        assert!(!binding.matches(VK_A + 1, &ctrl_alt));
    }

    #[test]
    fn test_matches_tolerates_extra_modifiers() {
        let binding = HotkeyBinding::default();
        let held = ModifierState {
            ctrl: true,
            shift: true,
            alt: true,
            win: true,
        };
        assert!(binding.matches(0x31, &held));
    }

    #[test]
    fn test_win_binding_needs_win_held() {
        // Arrange
        let binding: HotkeyBinding = "WIN+A".parse().expect("parse");
        let win = ModifierState {
            win: true,
            ..ModifierState::default()
        };

        // Act / Assert
        assert!(!binding.matches(VK_A, &ModifierState::default()));
        assert!(binding.matches(VK_A, &win));
    }

    #[test]
    fn test_os_modifier_bits() {
        let binding: HotkeyBinding = "CTRL+SHIFT+ALT+WIN+Z".parse().expect("parse");
        assert_eq!(
            binding.os_modifier_bits(),
            MOD_ALT | MOD_CONTROL | MOD_SHIFT | MOD_WIN
        );
        assert_eq!(HotkeyBinding::default().os_modifier_bits(), MOD_ALT);
    }
}
