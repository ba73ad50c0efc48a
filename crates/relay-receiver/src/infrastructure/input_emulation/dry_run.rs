//! An emulator that logs instead of injecting.
//!
//! Used by `relay-receiver --dry-run` and on platforms without a native
//! injector, so the receive path can be exercised without touching the
//! desktop.

use relay_core::{key_name, MouseButton};
use tracing::debug;

use crate::application::inject_input::{EmulationError, PlatformInputEmulator};

#[derive(Debug, Default)]
pub struct DryRunEmulator;

impl PlatformInputEmulator for DryRunEmulator {
    fn emit_absolute_move(&self, norm_x: i32, norm_y: i32) -> Result<(), EmulationError> {
        debug!(norm_x, norm_y, "dry-run: absolute move");
        Ok(())
    }

    fn emit_mouse_button(&self, button: MouseButton, down: bool) -> Result<(), EmulationError> {
        debug!(?button, down, "dry-run: mouse button");
        Ok(())
    }

    fn emit_key(&self, vk: u16, down: bool) -> Result<(), EmulationError> {
        debug!(key = %key_name(vk), vk, down, "dry-run: key");
        Ok(())
    }

    fn emit_wheel(&self, delta: i32) -> Result<(), EmulationError> {
        debug!(delta, "dry-run: wheel");
        Ok(())
    }
}
