//! Domain rules shared by both relay endpoints.
//!
//! Nothing in here touches sockets or OS input APIs, so every rule can be
//! tested on any platform.

/// Pixel to normalized coordinate mapping used for absolute injection.
pub mod coords;

/// The capture toggle hotkey and its parser.
pub mod hotkey;
