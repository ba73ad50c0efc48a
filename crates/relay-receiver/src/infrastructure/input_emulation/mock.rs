//! Mock platform input emulator for unit testing.
//!
//! The real emulator moves the cursor and presses keys on the machine running
//! the tests, and its effect cannot be observed from Rust.  The
//! `MockInputEmulator` replaces every OS call with in-memory recording so
//! assertions can inspect exactly what was injected and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let emulator = Arc::new(MockInputEmulator::new());
//! let dispatcher = EventDispatcher::new(writer, emulator.clone());
//!
//! dispatcher.dispatch(&encode_event(&InputEvent::key(0x41, true)));
//!
//! assert_eq!(emulator.events(), vec![EmittedInput::Key { vk: 0x41, down: true }]);
//! ```
//!
//! A mock can be linked to a [`MockDesktop`] so absolute moves also update
//! the desktop's pointer position, closing the read-modify-write loop the
//! actuator performs against a real OS.

use std::sync::{Arc, Mutex};

use relay_core::MouseButton;

use crate::application::inject_input::{EmulationError, PlatformInputEmulator};
use crate::infrastructure::screen_info::mock::MockDesktop;

/// One recorded injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmittedInput {
    AbsoluteMove(i32, i32),
    Button { button: MouseButton, down: bool },
    Key { vk: u16, down: bool },
    Wheel(i32),
}

/// A mock emulator that records all calls without performing OS API calls.
#[derive(Default)]
pub struct MockInputEmulator {
    events: Mutex<Vec<EmittedInput>>,
    linked_desktop: Option<Arc<MockDesktop>>,
    /// When `true`, every method returns `EmulationError::Platform`.
    pub should_fail: bool,
}

impl MockInputEmulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An emulator whose every call fails.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// An emulator that moves `desktop`'s pointer on every absolute move.
    pub fn linked_to(desktop: Arc<MockDesktop>) -> Self {
        Self {
            linked_desktop: Some(desktop),
            ..Self::default()
        }
    }

    /// Every recorded injection, in order.
    pub fn events(&self) -> Vec<EmittedInput> {
        self.events.lock().unwrap().clone()
    }

    /// Only the recorded absolute moves, as normalized coordinates.
    pub fn absolute_moves(&self) -> Vec<(i32, i32)> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match *e {
                EmittedInput::AbsoluteMove(x, y) => Some((x, y)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: EmittedInput) -> Result<(), EmulationError> {
        if self.should_fail {
            return Err(EmulationError::Platform("mock failure".into()));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

impl PlatformInputEmulator for MockInputEmulator {
    fn emit_absolute_move(&self, norm_x: i32, norm_y: i32) -> Result<(), EmulationError> {
        self.record(EmittedInput::AbsoluteMove(norm_x, norm_y))?;
        if let Some(desktop) = &self.linked_desktop {
            desktop.place_normalized(norm_x, norm_y);
        }
        Ok(())
    }

    fn emit_mouse_button(&self, button: MouseButton, down: bool) -> Result<(), EmulationError> {
        self.record(EmittedInput::Button { button, down })
    }

    fn emit_key(&self, vk: u16, down: bool) -> Result<(), EmulationError> {
        self.record(EmittedInput::Key { vk, down })
    }

    fn emit_wheel(&self, delta: i32) -> Result<(), EmulationError> {
        self.record(EmittedInput::Wheel(delta))
    }
}
