//! Windows Virtual-Key (VK) codes used by the relay.
//!
//! The relay forwards keys in the VK numeric space unchanged; both endpoints
//! interpret the code the same way.  Only the codes the core has to recognise
//! (modifiers, hotkey keys) are named here.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).

pub const VK_BACK: u16 = 0x08;
pub const VK_TAB: u16 = 0x09;
pub const VK_RETURN: u16 = 0x0D;
pub const VK_SHIFT: u16 = 0x10;
pub const VK_CONTROL: u16 = 0x11;
/// The Alt key.
pub const VK_MENU: u16 = 0x12;
pub const VK_ESCAPE: u16 = 0x1B;
pub const VK_SPACE: u16 = 0x20;

pub const VK_0: u16 = 0x30;
pub const VK_9: u16 = 0x39;
pub const VK_A: u16 = 0x41;
pub const VK_Z: u16 = 0x5A;

pub const VK_LWIN: u16 = 0x5B;
pub const VK_RWIN: u16 = 0x5C;

pub const VK_F1: u16 = 0x70;
pub const VK_F12: u16 = 0x7B;

pub const VK_LSHIFT: u16 = 0xA0;
pub const VK_RSHIFT: u16 = 0xA1;
pub const VK_LCONTROL: u16 = 0xA2;
pub const VK_RCONTROL: u16 = 0xA3;
pub const VK_LMENU: u16 = 0xA4;
pub const VK_RMENU: u16 = 0xA5;

/// Returns the VK code of function key `F{n}` for `n` in `1..=12`.
pub fn function_key(n: u8) -> Option<u16> {
    if (1..=12).contains(&n) {
        Some(VK_F1 + u16::from(n) - 1)
    } else {
        None
    }
}

/// Returns the VK code for an ASCII letter or digit (`'a'` and `'A'` both map
/// to `VK_A`).
pub fn alphanumeric_key(c: char) -> Option<u16> {
    let c = c.to_ascii_uppercase();
    if c.is_ascii_uppercase() || c.is_ascii_digit() {
        // Letters and digits share their ASCII value with their VK code.
        Some(c as u16)
    } else {
        None
    }
}
