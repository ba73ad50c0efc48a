//! Infrastructure layer for the receiver.
//!
//! Contains OS-facing adapters: input injection, pointer/desktop queries,
//! the UDP receive loop, thread priority and config storage.
//!
//! **Dependency rule**: this layer may depend on `application` and `relay_core`,
//! but MUST NOT be imported by the `application` layer outside of tests.
//!
//! # Sub-modules
//!
//! - **`input_emulation`** – Implementations of `PlatformInputEmulator`:
//!   `SendInput` on Windows, a logging dry-run emulator, and a recording mock.
//!
//! - **`network`** – Binds the UDP endpoint and runs the receive loop.
//!
//! - **`priority`** – Raises the actuation thread's scheduling priority.
//!
//! - **`screen_info`** – Implementations of `DesktopGeometry`.
//!
//! - **`storage`** – `relay-receiver.toml` schema and loading.

pub mod input_emulation;
pub mod network;
pub mod priority;
pub mod screen_info;
pub mod storage;
