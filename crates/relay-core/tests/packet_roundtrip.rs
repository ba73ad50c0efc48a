//! Integration tests for the relay-core public API.
//!
//! These exercise the codec through the crate-root re-exports together with
//! the hotkey and coordinate helpers, the way the two binaries use them.

use relay_core::{
    decode_event, encode_event, to_normalized, DecodeError, DesktopArea, EventKind,
    HotkeyBinding, InputEvent, Modifier, ModifierState, MouseButton, PACKET_SIZE, WHEEL_DELTA,
};

fn roundtrip(event: InputEvent) -> InputEvent {
    let bytes = encode_event(&event);
    decode_event(&bytes).expect("decode must succeed")
}

#[test]
fn test_roundtrip_every_constructible_event() {
    let events = [
        InputEvent::mouse_move(1, 0).expect("nonzero motion"),
        InputEvent::mouse_move(-300, 42).expect("nonzero motion"),
        InputEvent::button(MouseButton::Left, true),
        InputEvent::button(MouseButton::Right, false),
        InputEvent::button(MouseButton::Middle, true),
        InputEvent::key(0x12, true),
        InputEvent::key(0x5A, false),
        InputEvent::MouseWheel { delta: WHEEL_DELTA },
        InputEvent::MouseWheel { delta: -2 * WHEEL_DELTA },
    ];

    for event in events {
        assert_eq!(roundtrip(event), event, "round trip of {event:?}");
    }
}

#[test]
fn test_every_kind_encodes_to_the_same_size() {
    let sizes: Vec<usize> = [
        InputEvent::MouseMove { dx: 1, dy: 1 },
        InputEvent::button(MouseButton::Left, true),
        InputEvent::key(1, true),
        InputEvent::MouseWheel { delta: 1 },
    ]
    .iter()
    .map(|e| encode_event(e).len())
    .collect();

    assert!(sizes.iter().all(|&s| s == PACKET_SIZE));
}

#[test]
fn test_truncated_datagram_is_rejected() {
    let bytes = encode_event(&InputEvent::key(0x41, true));
    assert_eq!(
        decode_event(&bytes[..4]),
        Err(DecodeError::WrongLength {
            expected: PACKET_SIZE,
            actual: 4
        })
    );
}

#[test]
fn test_event_kind_names_for_diagnostics() {
    let names: Vec<&str> = [
        EventKind::MouseMove,
        EventKind::MouseButton,
        EventKind::Key,
        EventKind::MouseWheel,
    ]
    .iter()
    .map(|k| k.name())
    .collect();
    assert_eq!(names, ["MOUSE_MOVE", "MOUSE_BUTTON", "KEYBOARD", "MOUSE_WHEEL"]);
}

#[test]
fn test_hotkey_chord_built_from_tracked_key_edges() {
    // Arrange: replay the key-downs a user makes for CTRL+SHIFT+F5.
    let binding: HotkeyBinding = "ctrl+shift+f5".parse().expect("parse");
    let mut held = ModifierState::default();

    // Act
    for vk in [0xA2u16, 0xA0] {
        if let Some(modifier) = Modifier::from_vk(vk) {
            held.set(modifier, true);
        }
    }

    // Assert
    assert!(binding.matches(0x74, &held));
}

#[test]
fn test_full_hd_midpoint_literal_case() {
    let area = DesktopArea::new(0, 0, 1920, 1080);
    let (nx, ny) = to_normalized(&area, 960, 540);
    assert!((32767..=32768).contains(&nx));
    assert!((32767..=32768).contains(&ny));
}
