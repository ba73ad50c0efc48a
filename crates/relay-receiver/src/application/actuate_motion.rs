//! Motion actuation: coalesce relative deltas, place the pointer absolutely,
//! and hold the placement for a short window.
//!
//! # Actors
//!
//! Two actors share one [`MotionAccumulator`]:
//!
//! - The **receive actor** calls [`MotionWriter::submit`] for every decoded
//!   motion packet.  It adds the delta with lock-free `fetch_add` and, if no
//!   wake is outstanding, schedules exactly one.  It never waits on the
//!   actuation actor.
//!
//! - The **actuation actor** (see [`spawn_actuation_actor`]) runs
//!   [`Actuator::move_once`] per wake.  A pass drains the pending delta,
//!   computes `current + delta` clamped to the desktop, and then runs the
//!   stickiness protocol:
//!
//!   ```text
//!   assert(target)
//!   yield
//!   assert(target)
//!   until window elapsed (measured from pass start):
//!       yield
//!       assert(target)
//!   ```
//!
//!   Each `assert` places the pointer at the same absolute target, which is
//!   idempotent, so a competing writer inside the window is always followed by
//!   one more assertion of ours.
//!
//! # Wake flag
//!
//! `wake_scheduled` is a single-slot mailbox.  It is set by the writer that
//! wins the `false → true` exchange and cleared by the actor at the end of a
//! pass.  If deltas arrived during the pass, the actor re-arms the flag itself
//! and runs again, so sustained input drains in back-to-back passes and
//! quiescence ends in a clean stop.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use relay_core::{clamp_to_area, to_normalized, DesktopArea};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::application::inject_input::{EmulationError, PlatformInputEmulator};

/// Default length of the stickiness window.
pub const DEFAULT_STICKINESS_WINDOW: Duration = Duration::from_millis(10);

/// Default number of back-to-back injections per assertion.
pub const DEFAULT_INJECTIONS_PER_ASSERT: u8 = 2;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Failure to read the pointer position or the desktop bounds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("platform error: {0}")]
    Platform(String),
}

/// Failure to deliver a wake to the actuation actor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WakeError {
    /// The actor's mailbox already holds a wake.
    #[error("actuation mailbox is full")]
    Full,

    /// The actor is not running.
    #[error("actuation actor is not running")]
    Disconnected,
}

/// Failure of a single actuation pass.
#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("could not read desktop geometry: {0}")]
    Geometry(#[from] GeometryError),

    #[error("could not inject pointer placement: {0}")]
    Emulation(#[from] EmulationError),
}

// ── Collaborator seams ────────────────────────────────────────────────────────

/// Pointer and desktop queries the actuator needs.
pub trait DesktopGeometry: Send + Sync {
    /// Current pointer position in desktop pixels.
    fn cursor_position(&self) -> Result<(i32, i32), GeometryError>;

    /// Bounds of the whole addressable desktop (all monitors).
    fn desktop_area(&self) -> Result<DesktopArea, GeometryError>;
}

/// Delivers one wake to the actuation actor.
pub trait WakeSignal: Send + Sync {
    fn wake(&self) -> Result<(), WakeError>;
}

/// [`WakeSignal`] backed by a one-slot channel.
///
/// Dropping every `ChannelWake` closes the mailbox and stops the actor.
#[derive(Clone)]
pub struct ChannelWake {
    tx: SyncSender<()>,
}

impl WakeSignal for ChannelWake {
    fn wake(&self) -> Result<(), WakeError> {
        self.tx.try_send(()).map_err(|e| match e {
            TrySendError::Full(()) => WakeError::Full,
            TrySendError::Disconnected(()) => WakeError::Disconnected,
        })
    }
}

// ── Tuning ────────────────────────────────────────────────────────────────────

/// Empirical tuning of the stickiness protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickinessConfig {
    /// How long a pass keeps re-asserting, measured from pass start.
    pub window: Duration,
    /// Synthetic absolute moves issued back to back per assertion (min 1).
    pub injections_per_assert: u8,
}

impl Default for StickinessConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_STICKINESS_WINDOW,
            injections_per_assert: DEFAULT_INJECTIONS_PER_ASSERT,
        }
    }
}

// ── Accumulator ───────────────────────────────────────────────────────────────

/// Pending relative motion plus the single-slot wake flag.
///
/// All fields are atomics: writers only add, the actuation actor only
/// drains, and neither side ever blocks the other.
#[derive(Debug, Default)]
pub struct MotionAccumulator {
    pending_dx: AtomicI32,
    pending_dy: AtomicI32,
    wake_scheduled: AtomicBool,
}

impl MotionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a delta.  Returns `true` when this call armed the wake flag and
    /// the caller must deliver the wake.
    pub fn add(&self, dx: i32, dy: i32) -> bool {
        self.pending_dx.fetch_add(dx, Ordering::SeqCst);
        self.pending_dy.fetch_add(dy, Ordering::SeqCst);
        self.try_arm()
    }

    /// Takes the pending delta, leaving zero behind.
    pub fn drain(&self) -> (i32, i32) {
        (
            self.pending_dx.swap(0, Ordering::AcqRel),
            self.pending_dy.swap(0, Ordering::AcqRel),
        )
    }

    /// Pending delta without draining it.
    pub fn pending(&self) -> (i32, i32) {
        (
            self.pending_dx.load(Ordering::Acquire),
            self.pending_dy.load(Ordering::Acquire),
        )
    }

    pub fn is_wake_scheduled(&self) -> bool {
        self.wake_scheduled.load(Ordering::Acquire)
    }

    /// Ends a pass: clears the wake flag, then re-arms it if motion arrived
    /// meanwhile.  Returns `true` when the caller must run another pass.
    ///
    /// Sequentially consistent with [`add`](Self::add): a concurrent writer
    /// either arms the flag itself or its delta is seen here.
    pub fn finish_pass(&self) -> bool {
        self.wake_scheduled.swap(false, Ordering::SeqCst);
        let pending = (
            self.pending_dx.load(Ordering::SeqCst),
            self.pending_dy.load(Ordering::SeqCst),
        );
        pending != (0, 0) && self.try_arm()
    }

    /// Clears the wake flag after a wake could not be delivered, so a later
    /// motion packet can schedule again.
    pub fn abandon_wake(&self) {
        self.wake_scheduled.store(false, Ordering::Release);
    }

    fn try_arm(&self) -> bool {
        self.wake_scheduled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

// ── Writer (receive actor side) ───────────────────────────────────────────────

/// The receive actor's handle on the accumulator.
#[derive(Clone)]
pub struct MotionWriter {
    accumulator: Arc<MotionAccumulator>,
    signal: Arc<dyn WakeSignal>,
}

impl MotionWriter {
    pub fn new(accumulator: Arc<MotionAccumulator>, signal: Arc<dyn WakeSignal>) -> Self {
        Self {
            accumulator,
            signal,
        }
    }

    /// Accumulates one motion delta and schedules a pass if none is pending.
    ///
    /// Returns `true` if this call scheduled the pass.
    pub fn submit(&self, dx: i32, dy: i32) -> bool {
        if !self.accumulator.add(dx, dy) {
            trace!(dx, dy, "motion coalesced into pending pass");
            return false;
        }

        if self.signal.wake().is_ok() {
            return true;
        }

        // The actor may not be listening yet; one retry after a yield.
        thread::yield_now();
        match self.signal.wake() {
            Ok(()) => true,
            Err(e) => {
                warn!("dropping actuation pass, wake failed twice: {e}");
                self.accumulator.abandon_wake();
                false
            }
        }
    }
}

// ── Actuator (actuation actor side) ───────────────────────────────────────────

/// What one non-empty pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    /// The delta drained at pass start.
    pub delta: (i32, i32),
    /// Clamped absolute target in desktop pixels.
    pub target: (i32, i32),
    /// Number of assertions made (each is `injections_per_assert` injections).
    pub assertions: u32,
}

/// Runs actuation passes against the injection and geometry seams.
pub struct Actuator {
    accumulator: Arc<MotionAccumulator>,
    emulator: Arc<dyn PlatformInputEmulator>,
    geometry: Arc<dyn DesktopGeometry>,
    config: StickinessConfig,
}

impl Actuator {
    pub fn new(
        accumulator: Arc<MotionAccumulator>,
        emulator: Arc<dyn PlatformInputEmulator>,
        geometry: Arc<dyn DesktopGeometry>,
        config: StickinessConfig,
    ) -> Self {
        Self {
            accumulator,
            emulator,
            geometry,
            config,
        }
    }

    pub fn accumulator(&self) -> &Arc<MotionAccumulator> {
        &self.accumulator
    }

    /// One actuation pass.  Returns `Ok(None)` when there was nothing to
    /// drain.
    ///
    /// # Errors
    ///
    /// Returns [`ActuationError`] if the geometry query or an injection
    /// fails; the drained delta is lost in that case.
    pub fn move_once(&self) -> Result<Option<PassReport>, ActuationError> {
        let started = Instant::now();

        let delta = self.accumulator.drain();
        if delta == (0, 0) {
            return Ok(None);
        }

        let (cx, cy) = self.geometry.cursor_position()?;
        let area = self.geometry.desktop_area()?;
        let target = clamp_to_area(
            &area,
            cx.saturating_add(delta.0),
            cy.saturating_add(delta.1),
        );
        let normalized = to_normalized(&area, target.0, target.1);

        self.assert_placement(normalized)?;
        thread::yield_now();
        self.assert_placement(normalized)?;
        let mut assertions = 2;

        while started.elapsed() < self.config.window {
            thread::yield_now();
            self.assert_placement(normalized)?;
            assertions += 1;
        }

        trace!(?delta, ?target, assertions, "actuation pass complete");
        Ok(Some(PassReport {
            delta,
            target,
            assertions,
        }))
    }

    fn assert_placement(&self, (nx, ny): (i32, i32)) -> Result<(), EmulationError> {
        for _ in 0..self.config.injections_per_assert.max(1) {
            self.emulator.emit_absolute_move(nx, ny)?;
        }
        Ok(())
    }

    /// Runs passes until the accumulator stays drained.  Called once per wake.
    pub fn run_until_drained(&self) -> u32 {
        let mut passes = 0;
        loop {
            passes += 1;
            if let Err(e) = self.move_once() {
                warn!("actuation pass failed: {e}");
            }
            if !self.accumulator.finish_pass() {
                return passes;
            }
        }
    }
}

// ── Actor ─────────────────────────────────────────────────────────────────────

/// Spawns the actuation actor thread.
///
/// `on_start` runs first on the new thread (e.g. to raise its priority).  The
/// actor exits once every clone of the returned [`ChannelWake`] is dropped.
///
/// # Errors
///
/// Returns the I/O error if the thread cannot be spawned.
pub fn spawn_actuation_actor<F>(
    actuator: Actuator,
    on_start: F,
) -> std::io::Result<(ChannelWake, JoinHandle<()>)>
where
    F: FnOnce() + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);
    let handle = thread::Builder::new()
        .name("relay-actuation".to_string())
        .spawn(move || {
            on_start();
            actuation_loop(&actuator, rx);
        })?;
    Ok((ChannelWake { tx }, handle))
}

fn actuation_loop(actuator: &Actuator, wakes: Receiver<()>) {
    info!("actuation actor started");
    for () in wakes.iter() {
        let passes = actuator.run_until_drained();
        if passes > 1 {
            debug!(passes, "drained sustained motion");
        }
    }
    info!("actuation actor stopped");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
