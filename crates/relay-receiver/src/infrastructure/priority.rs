//! Raises the calling thread's scheduling priority.
//!
//! The actuation actor calls this once at start-up so its re-assertions win
//! CPU time over ordinary desktop processes during the stickiness window.

use tracing::{info, warn};

/// Raises the current thread to the highest non-realtime-class priority.
/// Failure is logged and otherwise ignored.
pub fn boost_current_thread() {
    match platform_boost() {
        Ok(()) => info!("actuation thread priority raised"),
        Err(e) => warn!("could not raise actuation thread priority: {e}"),
    }
}

#[cfg(target_os = "windows")]
fn platform_boost() -> Result<(), String> {
    use windows::Win32::System::Threading::{
        GetCurrentThread, SetThreadPriority, THREAD_PRIORITY_TIME_CRITICAL,
    };

    // SAFETY: GetCurrentThread returns a pseudo-handle valid for this thread.
    unsafe { SetThreadPriority(GetCurrentThread(), THREAD_PRIORITY_TIME_CRITICAL) }
        .map_err(|e| e.to_string())
}

#[cfg(not(target_os = "windows"))]
fn platform_boost() -> Result<(), String> {
    Err("not supported on this platform".to_string())
}
