//! Synthetic input injection seam used by the receiver.
//!
//! The application layer only ever talks to [`PlatformInputEmulator`]; the
//! OS-specific implementation lives in `infrastructure::input_emulation` and
//! is injected at construction time.

use relay_core::MouseButton;
use thiserror::Error;

/// Error type for input emulation operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmulationError {
    /// The OS rejected or only partially accepted the injected input.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Platform-agnostic input injection.
///
/// Every method injects exactly one synthetic event and returns once the OS
/// has accepted it.  No method accumulates, deduplicates or reorders.
pub trait PlatformInputEmulator: Send + Sync {
    /// Places the pointer at an absolute position in normalized desktop
    /// coordinates (`0..=relay_core::NORMALIZED_MAX` on each axis).
    fn emit_absolute_move(&self, norm_x: i32, norm_y: i32) -> Result<(), EmulationError>;

    /// Presses or releases a mouse button.
    fn emit_mouse_button(&self, button: MouseButton, down: bool) -> Result<(), EmulationError>;

    /// Presses or releases a key identified by its virtual-key code.
    fn emit_key(&self, vk: u16, down: bool) -> Result<(), EmulationError>;

    /// Scrolls the vertical wheel by `delta` (±120 per notch).
    fn emit_wheel(&self, delta: i32) -> Result<(), EmulationError>;
}
