//! Persistent configuration for the receiver.

pub mod config;
