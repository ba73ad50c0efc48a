//! # relay-core
//!
//! Shared library for the input relay: the wire codec, the virtual-key table,
//! the capture hotkey model, coordinate mapping, and config-file plumbing.
//!
//! This crate is used by both the sender and the receiver.
//! It has no dependencies on OS input APIs or network sockets.
//!
//! # Architecture overview
//!
//! The relay forwards keyboard and mouse activity from a *source* host to a
//! *target* host over UDP.  The sender intercepts local input while capture is
//! active and ships each event as one fixed-size datagram; the receiver decodes
//! each datagram and replays it through the target's synthetic input API.
//!
//! - **`protocol`** – The four event kinds and their 9-byte wire encoding.
//!
//! - **`domain`** – Pure rules: how a pixel maps into the normalized space of
//!   absolute injection, and how the capture hotkey is parsed and matched.
//!
//! - **`keymap`** – Virtual-key constants and modifier classification.  Keys
//!   travel over the wire as platform virtual-key codes, untranslated.
//!
//! - **`config`** – Locating, loading and saving TOML config files.

pub mod config;
pub mod domain;
pub mod keymap;
pub mod protocol;

// `relay_core::hotkey::HotkeyBinding` reads better at call sites than the
// full domain path.
pub use domain::hotkey;

pub use config::ConfigError;
pub use domain::coords::{clamp_to_area, to_normalized, DesktopArea, NORMALIZED_MAX};
pub use domain::hotkey::{HotkeyBinding, HotkeyParseError, ModifierSet};
pub use keymap::{key_name, Modifier, ModifierState};
pub use protocol::codec::{decode_event, encode_event, DecodeError};
pub use protocol::messages::{
    EventKind, InputEvent, MouseButton, DEFAULT_PORT, PACKET_SIZE, WHEEL_DELTA,
};
