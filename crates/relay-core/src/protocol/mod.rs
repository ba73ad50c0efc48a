//! Protocol module containing the event types and the fixed-layout codec.

pub mod codec;
pub mod messages;

pub use codec::{decode_event, encode_event, DecodeError};
pub use messages::*;
