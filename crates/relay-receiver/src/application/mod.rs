//! Application layer use cases for the receiver.
//!
//! - **`actuate_motion`** – Coalesces relative motion into absolute pointer
//!   placements and re-asserts each placement for a short window so competing
//!   writers cannot displace it.
//!
//! - **`dispatch_event`** – Decodes each datagram and routes it either to the
//!   motion accumulator or straight to one-shot injection.
//!
//! - **`inject_input`** – The [`inject_input::PlatformInputEmulator`] seam the
//!   two use cases inject through.
//!
//! - **`describe_packet`** – Renders datagrams for the `relay-dump` tool.

pub mod actuate_motion;
pub mod describe_packet;
pub mod dispatch_event;
pub mod inject_input;
