//! Pointer position and desktop bounds.
//!
//! Implements [`DesktopGeometry`](crate::application::actuate_motion::DesktopGeometry),
//! which the actuator reads at the start of every pass.
//!
//! | Module    | OS      | API used                                          |
//! |-----------|---------|---------------------------------------------------|
//! | `windows` | Windows | `GetCursorPos` + `GetSystemMetrics(SM_*VIRTUAL*)` |
//!
//! [`mock::MockDesktop`] and [`dry_run::DryRunDesktop`] are always compiled
//! (not guarded by `#[cfg]`): the first backs tests, the second `--dry-run`.

pub mod dry_run;
pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
