//! Human-readable rendering of datagrams for the `relay-dump` tool.

use relay_core::{decode_event, key_name, DecodeError, InputEvent, PACKET_SIZE};

/// Describes one datagram as `Type: KIND - <payload>`, or explains why it
/// could not be decoded.
pub fn describe_datagram(bytes: &[u8]) -> String {
    match decode_event(bytes) {
        Ok(event) => describe_event(&event),
        Err(DecodeError::WrongLength { actual, .. }) => {
            format!("unexpected size {actual} (expected {PACKET_SIZE})")
        }
        Err(DecodeError::UnknownTag(tag)) => format!("unknown type {tag}"),
    }
}

pub fn describe_event(event: &InputEvent) -> String {
    let kind = event.kind().name();
    match *event {
        InputEvent::MouseMove { dx, dy } => format!("Type: {kind} - Delta: ({dx}, {dy})"),
        InputEvent::MouseButton { id, down } => {
            format!("Type: {kind} - Button: {id} {}", edge(down))
        }
        InputEvent::Key { code, down } => format!(
            "Type: {kind} - Key: {} ({code}) {}",
            key_name(code),
            edge(down)
        ),
        InputEvent::MouseWheel { delta } => format!("Type: {kind} - Delta: {delta}"),
    }
}

fn edge(down: bool) -> &'static str {
    if down {
        "DOWN"
    } else {
        "UP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{encode_event, MouseButton};

    #[test]
    fn test_describes_each_kind() {
        assert_eq!(
            describe_event(&InputEvent::MouseMove { dx: 3, dy: -4 }),
            "Type: MOUSE_MOVE - Delta: (3, -4)"
        );
        assert_eq!(
            describe_event(&InputEvent::button(MouseButton::Left, true)),
            "Type: MOUSE_BUTTON - Button: 0 DOWN"
        );
        assert_eq!(
            describe_event(&InputEvent::key(0x41, false)),
            "Type: KEYBOARD - Key: A (65) UP"
        );
        assert_eq!(
            describe_event(&InputEvent::MouseWheel { delta: -120 }),
            "Type: MOUSE_WHEEL - Delta: -120"
        );
    }

    #[test]
    fn test_describes_undecodable_datagrams() {
        assert_eq!(describe_datagram(&[0; 4]), "unexpected size 4 (expected 9)");
        let mut bytes = encode_event(&InputEvent::key(1, true));
        bytes[0] = 42;
        assert_eq!(describe_datagram(&bytes), "unknown type 42");
    }
}
