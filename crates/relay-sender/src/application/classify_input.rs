//! Turns raw capture notifications into relay events.
//!
//! A raw mouse notification can carry motion, several button edges and a
//! wheel tick at once.  [`classify_raw_mouse`] splits it into individual
//! [`InputEvent`]s in a fixed order: motion, left, right, middle, wheel.

use relay_core::{InputEvent, MouseButton};

// Raw mouse state flags (`usFlags`).
pub const MOUSE_MOVE_ABSOLUTE: u16 = 0x0001;

// Raw mouse button transition flags (`usButtonFlags`).
pub const RI_MOUSE_LEFT_BUTTON_DOWN: u16 = 0x0001;
pub const RI_MOUSE_LEFT_BUTTON_UP: u16 = 0x0002;
pub const RI_MOUSE_RIGHT_BUTTON_DOWN: u16 = 0x0004;
pub const RI_MOUSE_RIGHT_BUTTON_UP: u16 = 0x0008;
pub const RI_MOUSE_MIDDLE_BUTTON_DOWN: u16 = 0x0010;
pub const RI_MOUSE_MIDDLE_BUTTON_UP: u16 = 0x0020;
pub const RI_MOUSE_WHEEL: u16 = 0x0400;

/// The fields of one raw mouse notification the relay reads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawMouseNotification {
    /// Mouse state flags; motion is forwarded only when relative.
    pub flags: u16,
    /// Button transition flags.
    pub button_flags: u16,
    /// Wheel delta, a signed 16-bit value carried in an unsigned field.
    pub button_data: u16,
    pub last_x: i32,
    pub last_y: i32,
}

const BUTTON_FLAGS: [(MouseButton, u16, u16); 3] = [
    (
        MouseButton::Left,
        RI_MOUSE_LEFT_BUTTON_DOWN,
        RI_MOUSE_LEFT_BUTTON_UP,
    ),
    (
        MouseButton::Right,
        RI_MOUSE_RIGHT_BUTTON_DOWN,
        RI_MOUSE_RIGHT_BUTTON_UP,
    ),
    (
        MouseButton::Middle,
        RI_MOUSE_MIDDLE_BUTTON_DOWN,
        RI_MOUSE_MIDDLE_BUTTON_UP,
    ),
];

/// Splits a raw mouse notification into relay events.
///
/// Absolute-mode motion (tablets, remote desktop) and `(0, 0)` motion produce
/// no event.  A button whose down and up flags are both set yields a down
/// edge followed by an up edge.
pub fn classify_raw_mouse(n: &RawMouseNotification) -> Vec<InputEvent> {
    let mut events = Vec::with_capacity(2);

    if n.flags & MOUSE_MOVE_ABSOLUTE == 0 {
        events.extend(InputEvent::mouse_move(n.last_x, n.last_y));
    }

    for (button, down_flag, up_flag) in BUTTON_FLAGS {
        if n.button_flags & down_flag != 0 {
            events.push(InputEvent::button(button, true));
        }
        if n.button_flags & up_flag != 0 {
            events.push(InputEvent::button(button, false));
        }
    }

    if n.button_flags & RI_MOUSE_WHEEL != 0 {
        events.push(InputEvent::MouseWheel {
            delta: i32::from(n.button_data as i16),
        });
    }

    events
}
