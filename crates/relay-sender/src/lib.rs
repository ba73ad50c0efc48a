//! relay-sender library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the sender do?
//!
//! The sender runs on the *source* host.  It sits idle, letting local input
//! reach the local desktop, until the toggle hotkey is pressed.  While capture
//! is active it suppresses local keyboard and mouse input and ships every
//! event to the target host as one UDP datagram:
//!
//! 1. Raw mouse notifications are classified into motion, button and wheel
//!    events.
//! 2. Low-level key edges are forwarded as key events, except the toggle
//!    chord, which is consumed.
//! 3. Leaving capture releases any modifier still held on the target.

/// Application layer: capture session and event classification.
pub mod application;

/// Infrastructure layer: capture hooks, datagram sink, and storage.
pub mod infrastructure;
