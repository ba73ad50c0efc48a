//! Virtual-key helpers: modifier classification and diagnostic key names.
//!
//! Key codes travel over the wire in the platform virtual-key space (see
//! [`windows_vk`]); no translation happens between the endpoints.

pub mod windows_vk;

use windows_vk::*;

/// A modifier whose held state the capture side tracks.
///
/// Left/right variants fold onto the generic modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Win,
}

impl Modifier {
    /// All tracked modifiers, in the order their releases are sent.
    pub const ALL: [Modifier; 4] = [
        Modifier::Ctrl,
        Modifier::Shift,
        Modifier::Alt,
        Modifier::Win,
    ];

    /// Classifies a VK code as one of the tracked modifiers.
    pub fn from_vk(vk: u16) -> Option<Self> {
        match vk {
            VK_CONTROL | VK_LCONTROL | VK_RCONTROL => Some(Modifier::Ctrl),
            VK_SHIFT | VK_LSHIFT | VK_RSHIFT => Some(Modifier::Shift),
            VK_MENU | VK_LMENU | VK_RMENU => Some(Modifier::Alt),
            VK_LWIN | VK_RWIN => Some(Modifier::Win),
            _ => None,
        }
    }

    /// The VK code used when synthesising a release for this modifier.
    /// WIN has no generic code; the left key stands in for both.
    pub fn generic_vk(self) -> u16 {
        match self {
            Modifier::Ctrl => VK_CONTROL,
            Modifier::Shift => VK_SHIFT,
            Modifier::Alt => VK_MENU,
            Modifier::Win => VK_LWIN,
        }
    }
}

/// Snapshot of which tracked modifiers are held.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ModifierState {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub win: bool,
}

impl ModifierState {
    pub fn is_held(&self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::Ctrl => self.ctrl,
            Modifier::Shift => self.shift,
            Modifier::Alt => self.alt,
            Modifier::Win => self.win,
        }
    }

    pub fn set(&mut self, modifier: Modifier, held: bool) {
        match modifier {
            Modifier::Ctrl => self.ctrl = held,
            Modifier::Shift => self.shift = held,
            Modifier::Alt => self.alt = held,
            Modifier::Win => self.win = held,
        }
    }
}

/// Human-readable name of a VK code, for diagnostics.
pub fn key_name(vk: u16) -> String {
    match vk {
        VK_A..=VK_Z | VK_0..=VK_9 => char::from(vk as u8).to_string(),
        VK_F1..=VK_F12 => format!("F{}", vk - VK_F1 + 1),
        VK_SPACE => "SPACE".to_string(),
        VK_RETURN => "ENTER".to_string(),
        VK_BACK => "BACKSPACE".to_string(),
        VK_TAB => "TAB".to_string(),
        VK_ESCAPE => "ESC".to_string(),
        VK_SHIFT | VK_LSHIFT | VK_RSHIFT => "SHIFT".to_string(),
        VK_CONTROL | VK_LCONTROL | VK_RCONTROL => "CTRL".to_string(),
        VK_MENU | VK_LMENU | VK_RMENU => "ALT".to_string(),
        VK_LWIN | VK_RWIN => "WIN".to_string(),
        other => format!("VK_0x{other:02X}"),
    }
}
