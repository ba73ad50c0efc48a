//! Infrastructure layer for the sender.
//!
//! Contains OS-facing adapters: input capture hooks and raw input, the UDP
//! datagram sink, and config storage.
//!
//! **Dependency rule**: this layer may depend on `application` and `relay_core`,
//! but MUST NOT be imported by the `application` layer outside of tests.

pub mod input_capture;
pub mod network;
pub mod storage;
