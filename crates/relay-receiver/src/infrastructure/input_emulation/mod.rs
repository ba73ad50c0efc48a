//! Platform-specific input emulation implementations.
//!
//! The correct implementation is selected at compile time via `#[cfg(target_os = ...)]`.
//! [`mock::MockInputEmulator`] and [`dry_run::DryRunEmulator`] are always
//! compiled: the first records for tests, the second only logs.

pub mod dry_run;
pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;
