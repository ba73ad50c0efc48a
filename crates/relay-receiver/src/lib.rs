//! relay-receiver library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binaries in `main.rs` and `bin/` share the same module tree.
//!
//! # What does the receiver do?
//!
//! The receiver runs on the *target* host.  It listens on a UDP port for the
//! 9-byte event datagrams the sender emits and replays them as synthetic
//! input:
//!
//! 1. The receive loop reads one datagram at a time and hands it to the
//!    `EventDispatcher`.
//! 2. Buttons, keys and wheel ticks are injected immediately, in order.
//! 3. Relative motion is summed into a lock-free accumulator.  A dedicated
//!    actuation thread turns the sum into one absolute pointer placement and
//!    keeps re-asserting it for a short window, so residual motion from a
//!    local mouse cannot pull the pointer away.

/// Application layer: use cases for the receiver.
pub mod application;

/// Infrastructure layer: OS adapters, network, and storage.
pub mod infrastructure;
