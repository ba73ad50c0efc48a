//! Input event types carried by the relay protocol.
//!
//! One datagram carries exactly one [`InputEvent`].  There is no header, no
//! sequence number and no timestamp: the protocol is a raw, unordered event
//! relay and the loss of any single event is tolerated.

// ── Protocol constants ────────────────────────────────────────────────────────

/// Well-known UDP port the receiver listens on.
pub const DEFAULT_PORT: u16 = 7777;

/// Size of the largest payload (`MouseMove`: two 4-byte signed integers).
pub const PAYLOAD_SIZE: usize = 8;

/// Fixed size of every packet on the wire: one tag byte plus the payload union.
pub const PACKET_SIZE: usize = 1 + PAYLOAD_SIZE;

/// Conventional wheel magnitude of one notch.
pub const WHEEL_DELTA: i32 = 120;

// ── Packet tags ───────────────────────────────────────────────────────────────

/// Discriminant byte at offset 0 of every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
    MouseMove = 0,
    MouseButton = 1,
    Key = 2,
    MouseWheel = 3,
}

impl TryFrom<u8> for EventKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EventKind::MouseMove),
            1 => Ok(EventKind::MouseButton),
            2 => Ok(EventKind::Key),
            3 => Ok(EventKind::MouseWheel),
            _ => Err(()),
        }
    }
}

impl EventKind {
    /// Upper-case name used by diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::MouseMove => "MOUSE_MOVE",
            EventKind::MouseButton => "MOUSE_BUTTON",
            EventKind::Key => "KEYBOARD",
            EventKind::MouseWheel => "MOUSE_WHEEL",
        }
    }
}

// ── Mouse buttons ─────────────────────────────────────────────────────────────

/// The three buttons the relay forwards.
///
/// On the wire a button is a raw `u8` id; ids outside `0..=2` decode fine and
/// are ignored by the receiver so that newer senders stay compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
}

impl TryFrom<u8> for MouseButton {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MouseButton::Left),
            1 => Ok(MouseButton::Right),
            2 => Ok(MouseButton::Middle),
            _ => Err(()),
        }
    }
}

// ── Input event ───────────────────────────────────────────────────────────────

/// One relayed input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Relative pointer motion.  A `(0, 0)` motion is never constructed by the
    /// sender; use [`InputEvent::mouse_move`].
    MouseMove { dx: i32, dy: i32 },
    /// A single button edge.  `id` is the raw wire id (see [`MouseButton`]).
    MouseButton { id: u8, down: bool },
    /// A virtual-key edge in the platform's virtual-key space.
    Key { code: u16, down: bool },
    /// Signed wheel ticks, ±[`WHEEL_DELTA`] per notch.
    MouseWheel { delta: i32 },
}

impl InputEvent {
    /// Builds a motion event, or `None` when both axes are stationary.
    pub fn mouse_move(dx: i32, dy: i32) -> Option<Self> {
        if dx == 0 && dy == 0 {
            None
        } else {
            Some(InputEvent::MouseMove { dx, dy })
        }
    }

    /// Builds a button edge for one of the known buttons.
    pub fn button(button: MouseButton, down: bool) -> Self {
        InputEvent::MouseButton {
            id: button as u8,
            down,
        }
    }

    /// Builds a key edge.
    pub fn key(code: u16, down: bool) -> Self {
        InputEvent::Key { code, down }
    }

    /// Returns the wire tag of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::MouseMove { .. } => EventKind::MouseMove,
            InputEvent::MouseButton { .. } => EventKind::MouseButton,
            InputEvent::Key { .. } => EventKind::Key,
            InputEvent::MouseWheel { .. } => EventKind::MouseWheel,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_size_is_tag_plus_largest_payload() {
        assert_eq!(PACKET_SIZE, 9);
    }

    #[test]
    fn test_mouse_move_with_zero_delta_is_not_constructed() {
        assert_eq!(InputEvent::mouse_move(0, 0), None);
    }

    #[test]
    fn test_mouse_move_with_single_axis_is_constructed() {
        assert_eq!(
            InputEvent::mouse_move(0, -3),
            Some(InputEvent::MouseMove { dx: 0, dy: -3 })
        );
    }

    #[test]
    fn test_button_constructor_uses_wire_id() {
        assert_eq!(
            InputEvent::button(MouseButton::Middle, true),
            InputEvent::MouseButton { id: 2, down: true }
        );
    }

    #[test]
    fn test_event_kind_try_from_rejects_unknown_tag() {
        assert_eq!(EventKind::try_from(3), Ok(EventKind::MouseWheel));
        assert!(EventKind::try_from(4).is_err());
    }

    #[test]
    fn test_mouse_button_try_from_rejects_out_of_range_id() {
        assert_eq!(MouseButton::try_from(1), Ok(MouseButton::Right));
        assert!(MouseButton::try_from(5).is_err());
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(InputEvent::key(0x41, true).kind(), EventKind::Key);
        assert_eq!(
            InputEvent::MouseWheel { delta: -120 }.kind(),
            EventKind::MouseWheel
        );
    }
}
