//! Capture session: the Idle/Active toggle on the source host.
//!
//! While **Active**, local keyboard and mouse input is suppressed and every
//! event is forwarded to the target instead.  While **Idle**, input flows to
//! the local desktop untouched; only the toggle hotkey is watched for.
//!
//! # Transitions
//!
//! ```text
//! Idle ──start_capture──▶ Active
//!   subscribe raw motion (failure: stay Idle)
//!   release ctrl/shift/alt locally
//!   install local suppression (failure: undo, stay Idle)
//!   pin cursor (optional, best effort)
//!
//! Active ──stop_capture──▶ Idle
//!   send Key{down:false} for each tracked modifier still held
//!   unsubscribe raw motion, remove suppression, unpin cursor
//! ```
//!
//! Both transitions are idempotent and run under one transition lock, so a
//! toggle arriving from the low-level key path and from the global hotkey at
//! the same time runs one full transition after the other.  The Active flag is
//! published only once a start has fully succeeded.
//!
//! # Callbacks
//!
//! The platform layer feeds the session from its event loop:
//! [`CaptureSession::on_key`] for every low-level key edge,
//! [`CaptureSession::on_mouse_hook`] for every low-level mouse event and
//! [`CaptureSession::on_raw_mouse`] for every raw mouse notification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use relay_core::{HotkeyBinding, InputEvent, Modifier, ModifierState};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::classify_input::{classify_raw_mouse, RawMouseNotification};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Failure of a capture platform operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("failed to subscribe to raw mouse input: {0}")]
    RawInputSubscribe(String),

    #[error("failed to install input suppression: {0}")]
    SuppressionInstall(String),

    #[error("failed to pin cursor: {0}")]
    CursorPin(String),
}

/// Failure of the OS-global hotkey registration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotkeyError {
    /// Another application already owns this key combination.
    #[error("hotkey {0} is already registered by another application")]
    AlreadyBound(String),

    #[error("failed to register hotkey {binding}: {reason}")]
    RegistrationFailed { binding: String, reason: String },
}

// ── Collaborator seams ────────────────────────────────────────────────────────

/// OS primitives the session drives on each transition.
pub trait CapturePlatform {
    fn subscribe_raw_motion(&self) -> Result<(), CaptureError>;
    fn unsubscribe_raw_motion(&self);
    fn install_suppression(&self) -> Result<(), CaptureError>;
    fn remove_suppression(&self);
    /// Synthesises local key-ups for ctrl, shift and alt.
    fn release_local_modifiers(&self);
    fn pin_cursor(&self) -> Result<(), CaptureError>;
    fn unpin_cursor(&self);
}

/// Fire-and-forget delivery of one event to the target.
///
/// Implementations must not block and must not fail: delivery problems are
/// logged and the event is lost.
#[cfg_attr(test, mockall::automock)]
pub trait EventSink {
    fn send(&self, event: &InputEvent);
}

/// OS-global registration of the toggle hotkey.
pub trait HotkeyRegistrar {
    /// # Errors
    ///
    /// [`HotkeyError::AlreadyBound`] if another process owns the chord.
    fn register(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError>;
    fn unregister(&self);
}

// ── Session ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Active,
}

/// What the low-level key callback must do with the key it just saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyVerdict {
    /// Let the key reach the local desktop.
    PassThrough,
    /// Swallow the key locally (it was forwarded, or is the hotkey's release).
    Suppress,
    /// The hotkey chord was pressed: swallow the key and post a toggle.
    Toggle,
}

/// Tracked ctrl/shift/alt/win, updated from the low-level key path.
#[derive(Debug, Default)]
struct TrackedModifiers {
    ctrl: AtomicBool,
    shift: AtomicBool,
    alt: AtomicBool,
    win: AtomicBool,
}

impl TrackedModifiers {
    fn flag(&self, modifier: Modifier) -> &AtomicBool {
        match modifier {
            Modifier::Ctrl => &self.ctrl,
            Modifier::Shift => &self.shift,
            Modifier::Alt => &self.alt,
            Modifier::Win => &self.win,
        }
    }

    fn snapshot(&self) -> ModifierState {
        ModifierState {
            ctrl: self.ctrl.load(Ordering::Relaxed),
            shift: self.shift.load(Ordering::Relaxed),
            alt: self.alt.load(Ordering::Relaxed),
            win: self.win.load(Ordering::Relaxed),
        }
    }
}

/// The capture state machine.
pub struct CaptureSession<P, S> {
    platform: P,
    sink: S,
    binding: HotkeyBinding,
    pin_cursor: bool,
    active: AtomicBool,
    /// Held for the whole of every start, stop and toggle.
    transition: Mutex<()>,
    modifiers: TrackedModifiers,
    /// Set while the hotkey's key is held after triggering a toggle, so its
    /// release is swallowed too.
    hotkey_held: AtomicBool,
}

impl<P: CapturePlatform, S: EventSink> CaptureSession<P, S> {
    pub fn new(platform: P, sink: S, binding: HotkeyBinding, pin_cursor: bool) -> Self {
        Self {
            platform,
            sink,
            binding,
            pin_cursor,
            active: AtomicBool::new(false),
            transition: Mutex::new(()),
            modifiers: TrackedModifiers::default(),
            hotkey_held: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> CaptureState {
        if self.active.load(Ordering::Acquire) {
            CaptureState::Active
        } else {
            CaptureState::Idle
        }
    }

    pub fn binding(&self) -> &HotkeyBinding {
        &self.binding
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Currently tracked modifier state.
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers.snapshot()
    }

    /// Idle → Active.  A no-op when already Active.
    ///
    /// # Errors
    ///
    /// Returns the [`CaptureError`] that aborted the transition; the session
    /// is Idle afterwards.
    pub fn start_capture(&self) -> Result<(), CaptureError> {
        let _transition = self.lock_transition();
        self.start_locked()
    }

    /// Active → Idle.  A no-op when already Idle.
    ///
    /// Held modifiers are released on the target before local suppression is
    /// torn down.
    pub fn stop_capture(&self) {
        let _transition = self.lock_transition();
        self.stop_locked();
    }

    /// Flips the state.  Returns the state after the attempt.
    pub fn toggle(&self) -> CaptureState {
        let _transition = self.lock_transition();
        match self.state() {
            CaptureState::Active => self.stop_locked(),
            CaptureState::Idle => {
                // Failure is already logged; the session stays Idle.
                let _ = self.start_locked();
            }
        }
        self.state()
    }

    fn lock_transition(&self) -> MutexGuard<'_, ()> {
        // Guards no data; a poisoned lock is still usable.
        self.transition.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start_locked(&self) -> Result<(), CaptureError> {
        if self.active.load(Ordering::Acquire) {
            debug!("start_capture ignored: already active");
            return Ok(());
        }

        if let Err(e) = self.platform.subscribe_raw_motion() {
            warn!("capture not started: {e}");
            return Err(e);
        }

        self.platform.release_local_modifiers();
        for modifier in Modifier::ALL {
            self.modifiers.flag(modifier).store(false, Ordering::Relaxed);
        }

        if let Err(e) = self.platform.install_suppression() {
            self.platform.unsubscribe_raw_motion();
            warn!("capture not started: {e}");
            return Err(e);
        }
        self.active.store(true, Ordering::Release);

        if self.pin_cursor {
            if let Err(e) = self.platform.pin_cursor() {
                warn!("continuing without cursor pin: {e}");
            }
        }

        info!("capture ON: local input is forwarded ({} to stop)", self.binding);
        Ok(())
    }

    fn stop_locked(&self) {
        if !self.active.load(Ordering::Acquire) {
            debug!("stop_capture ignored: already idle");
            return;
        }

        for modifier in Modifier::ALL {
            if self.modifiers.flag(modifier).swap(false, Ordering::Relaxed) {
                debug!(?modifier, "releasing held modifier on target");
                self.sink
                    .send(&InputEvent::key(modifier.generic_vk(), false));
            }
        }
        self.active.store(false, Ordering::Release);

        self.platform.unsubscribe_raw_motion();
        self.platform.remove_suppression();
        self.platform.unpin_cursor();

        info!("capture OFF: local input restored");
    }

    /// Forces Idle before the process exits.
    pub fn shutdown(&self) {
        self.stop_capture();
    }

    /// Low-level key edge.
    pub fn on_key(&self, vk: u16, down: bool) -> KeyVerdict {
        if let Some(modifier) = Modifier::from_vk(vk) {
            self.modifiers.flag(modifier).store(down, Ordering::Relaxed);
        }

        if down && self.binding.matches(vk, &self.modifiers.snapshot()) {
            self.hotkey_held.store(true, Ordering::Relaxed);
            return KeyVerdict::Toggle;
        }
        if !down && vk == self.binding.key && self.hotkey_held.swap(false, Ordering::Relaxed) {
            return KeyVerdict::Suppress;
        }

        if self.state() == CaptureState::Active {
            self.sink.send(&InputEvent::key(vk, down));
            KeyVerdict::Suppress
        } else {
            KeyVerdict::PassThrough
        }
    }

    /// Low-level mouse event.  Returns `true` if it must be swallowed.
    pub fn on_mouse_hook(&self) -> bool {
        self.state() == CaptureState::Active
    }

    /// Raw mouse notification.  Returns the number of events forwarded.
    pub fn on_raw_mouse(&self, notification: &RawMouseNotification) -> usize {
        if self.state() != CaptureState::Active {
            return 0;
        }
        let events = classify_raw_mouse(notification);
        for event in &events {
            self.sink.send(event);
        }
        events.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
