//! Windows input emulation via the SendInput API.
//!
//! Absolute moves use `MOUSEEVENTF_VIRTUALDESK`, so normalized coordinates
//! span every monitor.  Keys are injected by virtual-key code, exactly as
//! received.

#![cfg(target_os = "windows")]

use relay_core::MouseButton;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN, MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_MOVE,
    MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_VIRTUALDESK, MOUSEEVENTF_WHEEL,
    MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};

use crate::application::inject_input::{EmulationError, PlatformInputEmulator};

/// Virtual keys that live on the extended part of the keyboard.
const EXTENDED_VKS: &[u16] = &[
    0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27, 0x28, // PgUp, PgDn, End, Home, arrows
    0x2D, 0x2E, // Insert, Delete
    0x5B, 0x5C, // Win keys
    0xA3, 0xA5, // Right Ctrl, Right Alt
];

/// Windows implementation of [`PlatformInputEmulator`] using SendInput.
#[derive(Debug, Default)]
pub struct WindowsInputEmulator;

impl WindowsInputEmulator {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformInputEmulator for WindowsInputEmulator {
    fn emit_absolute_move(&self, norm_x: i32, norm_y: i32) -> Result<(), EmulationError> {
        send_mouse(
            norm_x,
            norm_y,
            0,
            MOUSEEVENTF_MOVE | MOUSEEVENTF_ABSOLUTE | MOUSEEVENTF_VIRTUALDESK,
        )
    }

    fn emit_mouse_button(&self, button: MouseButton, down: bool) -> Result<(), EmulationError> {
        let flags = match (button, down) {
            (MouseButton::Left, true) => MOUSEEVENTF_LEFTDOWN,
            (MouseButton::Left, false) => MOUSEEVENTF_LEFTUP,
            (MouseButton::Right, true) => MOUSEEVENTF_RIGHTDOWN,
            (MouseButton::Right, false) => MOUSEEVENTF_RIGHTUP,
            (MouseButton::Middle, true) => MOUSEEVENTF_MIDDLEDOWN,
            (MouseButton::Middle, false) => MOUSEEVENTF_MIDDLEUP,
        };
        send_mouse(0, 0, 0, flags)
    }

    fn emit_key(&self, vk: u16, down: bool) -> Result<(), EmulationError> {
        let mut flags = KEYBD_EVENT_FLAGS(0);
        if !down {
            flags |= KEYEVENTF_KEYUP;
        }
        if EXTENDED_VKS.contains(&vk) {
            flags |= KEYEVENTF_EXTENDEDKEY;
        }

        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(vk),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };
        send(input)
    }

    fn emit_wheel(&self, delta: i32) -> Result<(), EmulationError> {
        // mouseData carries the signed delta reinterpreted as u32.
        send_mouse(0, 0, delta as u32, MOUSEEVENTF_WHEEL)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn send_mouse(
    dx: i32,
    dy: i32,
    mouse_data: u32,
    flags: MOUSE_EVENT_FLAGS,
) -> Result<(), EmulationError> {
    send(INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx,
                dy,
                mouseData: mouse_data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    })
}

fn send(input: INPUT) -> Result<(), EmulationError> {
    // SAFETY: `input` is a fully initialised INPUT on the stack and the size
    // argument matches its type.
    let inserted = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if inserted == 1 {
        Ok(())
    } else {
        Err(EmulationError::Platform(format!(
            "SendInput inserted {inserted} events: {}",
            windows::core::Error::from_win32()
        )))
    }
}
