//! Capture platform adapters for the sender.
//!
//! On Windows the capture thread owns a message-only window, a permanent
//! `WH_KEYBOARD_LL` hook (so the toggle chord is seen in both states), and,
//! while capture is Active, a `WH_MOUSE_LL` hook plus a raw-input
//! subscription for relative motion.  The OS-global hotkey is registered
//! against the same window.
//!
//! Hook callbacks must return quickly or Windows silently removes the hook, so
//! each callback does no more than one [`CaptureSession`] call and, at most,
//! one non-blocking datagram send.
//!
//! # Testability
//!
//! [`mock::MockCapturePlatform`] records every platform call so the session's
//! transition ordering can be asserted without hooks.
//!
//! [`CaptureSession`]: crate::application::capture_session::CaptureSession

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
