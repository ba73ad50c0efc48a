//! Fixed-layout binary codec for relay packets.
//!
//! Wire format (9 bytes, every event kind):
//! ```text
//! [tag:1][payload:8]
//!
//! MouseMove    [dx:i32][dy:i32]
//! MouseButton  [id:u8][down:u8][pad:6]
//! Key          [code:u16][down:u8][pad:5]
//! MouseWheel   [delta:i32][pad:4]
//! ```
//! Multi-byte integers use the host's native byte order.  Both endpoints are
//! assumed to share it; there is no endianness negotiation.  Padding bytes are
//! written as zero and ignored on decode.

use thiserror::Error;

use crate::protocol::messages::{EventKind, InputEvent, PACKET_SIZE};

/// Errors that can occur while decoding a datagram.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The datagram is not exactly one packet long.
    #[error("wrong packet length: expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// The tag byte does not name a known event kind.
    #[error("unknown packet tag: 0x{0:02X}")]
    UnknownTag(u8),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes an [`InputEvent`] into its fixed-size wire representation.
///
/// # Examples
///
/// ```rust
/// use relay_core::protocol::{decode_event, encode_event, InputEvent};
///
/// let event = InputEvent::MouseMove { dx: 4, dy: -2 };
/// let bytes = encode_event(&event);
/// assert_eq!(decode_event(&bytes), Ok(event));
/// ```
pub fn encode_event(event: &InputEvent) -> [u8; PACKET_SIZE] {
    let mut buf = [0u8; PACKET_SIZE];
    buf[0] = event.kind() as u8;
    let payload = &mut buf[1..];
    match *event {
        InputEvent::MouseMove { dx, dy } => {
            payload[0..4].copy_from_slice(&dx.to_ne_bytes());
            payload[4..8].copy_from_slice(&dy.to_ne_bytes());
        }
        InputEvent::MouseButton { id, down } => {
            payload[0] = id;
            payload[1] = u8::from(down);
        }
        InputEvent::Key { code, down } => {
            payload[0..2].copy_from_slice(&code.to_ne_bytes());
            payload[2] = u8::from(down);
        }
        InputEvent::MouseWheel { delta } => {
            payload[0..4].copy_from_slice(&delta.to_ne_bytes());
        }
    }
    buf
}

/// Decodes one datagram into an [`InputEvent`].
///
/// Payload values are not range-checked: an out-of-range button id decodes
/// successfully and is left for the receiver to ignore.
///
/// # Errors
///
/// Returns [`DecodeError::WrongLength`] unless `bytes` is exactly
/// [`PACKET_SIZE`] long, and [`DecodeError::UnknownTag`] for an unrecognised
/// tag byte.
pub fn decode_event(bytes: &[u8]) -> Result<InputEvent, DecodeError> {
    if bytes.len() != PACKET_SIZE {
        return Err(DecodeError::WrongLength {
            expected: PACKET_SIZE,
            actual: bytes.len(),
        });
    }

    let tag = bytes[0];
    let kind = EventKind::try_from(tag).map_err(|_| DecodeError::UnknownTag(tag))?;
    let p = &bytes[1..];

    let event = match kind {
        EventKind::MouseMove => InputEvent::MouseMove {
            dx: read_i32(p, 0),
            dy: read_i32(p, 4),
        },
        EventKind::MouseButton => InputEvent::MouseButton {
            id: p[0],
            down: p[1] != 0,
        },
        EventKind::Key => InputEvent::Key {
            code: u16::from_ne_bytes([p[0], p[1]]),
            down: p[2] != 0,
        },
        EventKind::MouseWheel => InputEvent::MouseWheel {
            delta: read_i32(p, 0),
        },
    };
    Ok(event)
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Reads a native-endian `i32`; the caller guarantees `offset + 4 <= buf.len()`.
fn read_i32(buf: &[u8], offset: usize) -> i32 {
    i32::from_ne_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::messages::MouseButton;

    fn round_trip(event: InputEvent) -> InputEvent {
        let encoded = encode_event(&event);
        assert_eq!(encoded.len(), PACKET_SIZE);
        decode_event(&encoded).expect("decode failed")
    }

    #[test]
    fn test_mouse_move_round_trip_preserves_negative_deltas() {
        let event = InputEvent::MouseMove { dx: -17, dy: 250 };
        assert_eq!(round_trip(event), event);
    }

    #[test]
    fn test_mouse_move_round_trip_extreme_values() {
        let event = InputEvent::MouseMove {
            dx: i32::MIN,
            dy: i32::MAX,
        };
        assert_eq!(round_trip(event), event);
    }

    #[test]
    fn test_button_round_trip() {
        let event = InputEvent::button(MouseButton::Right, false);
        assert_eq!(round_trip(event), event);
    }

    #[test]
    fn test_key_round_trip_uses_full_u16_range() {
        let event = InputEvent::Key {
            code: 0xFFFE,
            down: true,
        };
        assert_eq!(round_trip(event), event);
    }

    #[test]
    fn test_wheel_round_trip() {
        let event = InputEvent::MouseWheel { delta: -240 };
        assert_eq!(round_trip(event), event);
    }

    // ── Layout ───────────────────────────────────────────────────────────────

    #[test]
    fn test_tag_byte_is_first() {
        assert_eq!(encode_event(&InputEvent::MouseMove { dx: 1, dy: 0 })[0], 0);
        assert_eq!(encode_event(&InputEvent::button(MouseButton::Left, true))[0], 1);
        assert_eq!(encode_event(&InputEvent::key(0x41, true))[0], 2);
        assert_eq!(encode_event(&InputEvent::MouseWheel { delta: 120 })[0], 3);
    }

    #[test]
    fn test_mouse_move_payload_is_native_endian() {
        let bytes = encode_event(&InputEvent::MouseMove { dx: 5, dy: -1 });
        assert_eq!(&bytes[1..5], &5i32.to_ne_bytes());
        assert_eq!(&bytes[5..9], &(-1i32).to_ne_bytes());
    }

    #[test]
    fn test_button_payload_is_zero_padded() {
        let bytes = encode_event(&InputEvent::button(MouseButton::Middle, true));
        assert_eq!(bytes[1], 2);
        assert_eq!(bytes[2], 1);
        assert!(bytes[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_key_down_flag_follows_code() {
        let bytes = encode_event(&InputEvent::key(0x12, true));
        assert_eq!(&bytes[1..3], &0x12u16.to_ne_bytes());
        assert_eq!(bytes[3], 1);
    }

    // ── Error conditions ──────────────────────────────────────────────────────

    #[test]
    fn test_decode_empty_bytes_returns_wrong_length() {
        assert_eq!(
            decode_event(&[]),
            Err(DecodeError::WrongLength {
                expected: PACKET_SIZE,
                actual: 0
            })
        );
    }

    #[test]
    fn test_decode_oversized_datagram_returns_wrong_length() {
        let bytes = [0u8; PACKET_SIZE + 3];
        assert!(matches!(
            decode_event(&bytes),
            Err(DecodeError::WrongLength { actual: 12, .. })
        ));
    }

    #[test]
    fn test_decode_unknown_tag_returns_error() {
        let mut bytes = [0u8; PACKET_SIZE];
        bytes[0] = 0x7F;
        assert_eq!(decode_event(&bytes), Err(DecodeError::UnknownTag(0x7F)));
    }

    #[test]
    fn test_decode_passes_out_of_range_button_id_through() {
        let mut bytes = [0u8; PACKET_SIZE];
        bytes[0] = EventKind::MouseButton as u8;
        bytes[1] = 5;
        bytes[2] = 1;
        assert_eq!(
            decode_event(&bytes),
            Ok(InputEvent::MouseButton { id: 5, down: true })
        );
    }

    #[test]
    fn test_decode_treats_any_nonzero_down_byte_as_pressed() {
        let mut bytes = encode_event(&InputEvent::key(0x20, false));
        bytes[3] = 0xFF;
        assert_eq!(decode_event(&bytes), Ok(InputEvent::key(0x20, true)));
    }
}
