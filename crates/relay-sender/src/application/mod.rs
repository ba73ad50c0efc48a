//! Application layer use cases for the sender.
//!
//! Nothing here calls the OS directly: the session drives a
//! [`capture_session::CapturePlatform`] and writes to an
//! [`capture_session::EventSink`], both supplied by the infrastructure layer.
//!
//! # Sub-modules
//!
//! - **`capture_session`** – The Idle/Active state machine, hotkey chord
//!   recognition, modifier tracking and cleanup on exit from capture.  Runs on
//!   every keystroke and mouse notification.
//!
//! - **`classify_input`** – Splits one raw mouse notification into individual
//!   relay events.

pub mod capture_session;
pub mod classify_input;
