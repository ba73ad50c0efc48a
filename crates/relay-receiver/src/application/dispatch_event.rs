//! Decode-and-route for received datagrams.
//!
//! Motion goes to the [`MotionWriter`]; buttons, keys and wheel ticks are
//! injected synchronously in receipt order, one call per event.

use std::sync::Arc;

use relay_core::{decode_event, DecodeError, EventKind, InputEvent, MouseButton};
use tracing::{debug, trace, warn};

use crate::application::actuate_motion::MotionWriter;
use crate::application::inject_input::{EmulationError, PlatformInputEmulator};

/// What happened to one datagram.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A motion delta was added to the accumulator.  `scheduled` is `true` if
    /// this datagram scheduled the next actuation pass.
    Accumulated { scheduled: bool },
    /// A one-shot event was injected.
    Injected(EventKind),
    /// A button id outside the known range; nothing was injected.
    IgnoredButton(u8),
    /// The datagram could not be decoded and was dropped.
    Dropped(DecodeError),
    /// The event decoded but the OS rejected the injection.
    InjectionFailed(EmulationError),
}

/// Routes decoded events to the actuation engine or to direct injection.
pub struct EventDispatcher {
    motion: MotionWriter,
    emulator: Arc<dyn PlatformInputEmulator>,
}

impl EventDispatcher {
    pub fn new(motion: MotionWriter, emulator: Arc<dyn PlatformInputEmulator>) -> Self {
        Self { motion, emulator }
    }

    /// Handles one datagram.  Never fails: every problem is reported in the
    /// returned outcome so the receive loop can keep going.
    pub fn dispatch(&self, bytes: &[u8]) -> DispatchOutcome {
        let event = match decode_event(bytes) {
            Ok(event) => event,
            Err(e) => {
                debug!("dropping datagram: {e}");
                return DispatchOutcome::Dropped(e);
            }
        };
        trace!(?event, "dispatching");

        let result = match event {
            InputEvent::MouseMove { dx, dy } => {
                let scheduled = self.motion.submit(dx, dy);
                return DispatchOutcome::Accumulated { scheduled };
            }
            InputEvent::MouseButton { id, down } => match MouseButton::try_from(id) {
                Ok(button) => self.emulator.emit_mouse_button(button, down),
                Err(()) => {
                    debug!(id, "ignoring unknown mouse button");
                    return DispatchOutcome::IgnoredButton(id);
                }
            },
            InputEvent::Key { code, down } => self.emulator.emit_key(code, down),
            InputEvent::MouseWheel { delta } => self.emulator.emit_wheel(delta),
        };

        match result {
            Ok(()) => DispatchOutcome::Injected(event.kind()),
            Err(e) => {
                warn!("failed to inject {}: {e}", event.kind().name());
                DispatchOutcome::InjectionFailed(e)
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
