//! Integration tests for the send side: capture session, mock capture
//! platform and a real UDP sink talking to a localhost socket.

use std::io::ErrorKind;
use std::net::UdpSocket;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use relay_core::keymap::windows_vk::{VK_A, VK_LSHIFT, VK_MENU, VK_SHIFT};
use relay_core::{decode_event, HotkeyBinding, InputEvent, MouseButton, PACKET_SIZE};
use relay_sender::application::capture_session::{
    CaptureSession, CaptureState, HotkeyError, HotkeyRegistrar, KeyVerdict,
};
use relay_sender::application::classify_input::{
    RawMouseNotification, MOUSE_MOVE_ABSOLUTE, RI_MOUSE_LEFT_BUTTON_DOWN, RI_MOUSE_WHEEL,
};
use relay_sender::infrastructure::input_capture::mock::{
    MockCapturePlatform, MockHotkeyRegistrar, PlatformCall,
};
use relay_sender::infrastructure::network::UdpEventSink;

const VK_1: u16 = 0x31;

type Session = CaptureSession<MockCapturePlatform, UdpEventSink>;

fn wired_session() -> (Session, UdpSocket) {
    let receiver = UdpSocket::bind("127.0.0.1:0").expect("bind receiver");
    let target = receiver.local_addr().expect("local addr");
    let sink = UdpEventSink::connect(target).expect("connect sink");
    let session = CaptureSession::new(
        MockCapturePlatform::new(),
        sink,
        HotkeyBinding::default(),
        true,
    );
    (session, receiver)
}

/// Reads datagrams until none arrives within `quiet`.
fn drain(receiver: &UdpSocket, quiet: Duration) -> Vec<InputEvent> {
    receiver.set_read_timeout(Some(quiet)).expect("timeout");
    let mut events = Vec::new();
    let mut buf = [0u8; 64];
    loop {
        match receiver.recv(&mut buf) {
            Ok(n) => {
                assert_eq!(n, PACKET_SIZE, "every datagram is exactly one packet");
                events.push(decode_event(&buf[..n]).expect("decodable packet"));
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return events;
            }
            Err(e) => panic!("recv failed: {e}"),
        }
    }
}

#[test]
fn test_full_capture_cycle_puts_expected_packets_on_the_wire() {
    // Arrange
    let (session, receiver) = wired_session();

    // Act: ALT+1 while idle, then the release of both keys.
    assert_eq!(session.on_key(VK_MENU, true), KeyVerdict::PassThrough);
    assert_eq!(session.on_key(VK_1, true), KeyVerdict::Toggle);
    assert_eq!(session.toggle(), CaptureState::Active);
    assert_eq!(session.on_key(VK_1, false), KeyVerdict::Suppress);
    assert_eq!(session.on_key(VK_MENU, false), KeyVerdict::Suppress);

    // Act: typing and mousing while active.
    session.on_key(VK_A, true);
    session.on_key(VK_A, false);
    session.on_raw_mouse(&RawMouseNotification {
        button_flags: RI_MOUSE_LEFT_BUTTON_DOWN,
        last_x: 3,
        last_y: -2,
        ..Default::default()
    });
    session.on_raw_mouse(&RawMouseNotification {
        button_flags: RI_MOUSE_WHEEL,
        button_data: (-120i16) as u16,
        ..Default::default()
    });

    // Act: leave capture with shift still held.
    session.on_key(VK_LSHIFT, true);
    assert_eq!(session.toggle(), CaptureState::Idle);

    // Assert
    let events = drain(&receiver, Duration::from_millis(300));
    assert_eq!(
        events,
        vec![
            InputEvent::key(VK_MENU, false),
            InputEvent::key(VK_A, true),
            InputEvent::key(VK_A, false),
            InputEvent::MouseMove { dx: 3, dy: -2 },
            InputEvent::button(MouseButton::Left, true),
            InputEvent::MouseWheel { delta: -120 },
            InputEvent::key(VK_LSHIFT, true),
            InputEvent::key(VK_SHIFT, false),
        ]
    );
}

#[test]
fn test_idle_session_sends_nothing() {
    // Arrange
    let (session, receiver) = wired_session();

    // Act
    assert_eq!(session.on_key(VK_A, true), KeyVerdict::PassThrough);
    assert_eq!(
        session.on_raw_mouse(&RawMouseNotification {
            last_x: 10,
            ..Default::default()
        }),
        0
    );
    assert!(!session.on_mouse_hook());

    // Assert
    assert!(drain(&receiver, Duration::from_millis(100)).is_empty());
}

#[test]
fn test_absolute_mode_motion_is_not_forwarded() {
    let (session, receiver) = wired_session();
    session.start_capture().expect("start");

    let forwarded = session.on_raw_mouse(&RawMouseNotification {
        flags: MOUSE_MOVE_ABSOLUTE,
        last_x: 30000,
        last_y: 30000,
        ..Default::default()
    });

    assert_eq!(forwarded, 0);
    assert!(drain(&receiver, Duration::from_millis(100)).is_empty());
}

#[test]
fn test_failed_start_leaves_no_platform_state_behind() {
    // Arrange
    let (session, receiver) = wired_session();
    session.platform().fail_suppression(true);

    // Act
    let state = session.toggle();

    // Assert
    assert_eq!(state, CaptureState::Idle);
    let calls = session.platform().calls();
    assert!(!calls.contains(&PlatformCall::PinCursor));
    assert_eq!(calls.last(), Some(&PlatformCall::UnsubscribeRawMotion));
    assert!(drain(&receiver, Duration::from_millis(100)).is_empty());
}

#[test]
fn test_shutdown_from_active_restores_idle_and_releases_modifiers() {
    // Arrange
    let (session, receiver) = wired_session();
    session.start_capture().expect("start");
    session.on_key(VK_SHIFT, true);

    // Act
    session.shutdown();
    session.shutdown();

    // Assert
    assert_eq!(session.state(), CaptureState::Idle);
    assert_eq!(
        drain(&receiver, Duration::from_millis(300)),
        vec![InputEvent::key(VK_SHIFT, true), InputEvent::key(VK_SHIFT, false)]
    );
    let calls = session.platform().calls();
    assert_eq!(
        calls.iter().filter(|c| **c == PlatformCall::UnpinCursor).count(),
        1
    );
}

#[test]
fn test_concurrent_toggles_run_whole_transitions_one_at_a_time() {
    // Arrange
    const TOGGLES: usize = 8;
    let (session, receiver) = wired_session();
    let barrier = Barrier::new(TOGGLES);

    // Act
    thread::scope(|scope| {
        for _ in 0..TOGGLES {
            scope.spawn(|| {
                barrier.wait();
                session.toggle();
            });
        }
    });

    // Assert: an even number of toggles, each a complete start or stop.
    assert_eq!(session.state(), CaptureState::Idle);
    let cycle = [
        PlatformCall::SubscribeRawMotion,
        PlatformCall::ReleaseLocalModifiers,
        PlatformCall::InstallSuppression,
        PlatformCall::PinCursor,
        PlatformCall::UnsubscribeRawMotion,
        PlatformCall::RemoveSuppression,
        PlatformCall::UnpinCursor,
    ];
    let calls = session.platform().calls();
    assert_eq!(calls.len(), cycle.len() * TOGGLES / 2);
    for chunk in calls.chunks(cycle.len()) {
        assert_eq!(chunk, cycle);
    }
    assert!(drain(&receiver, Duration::from_millis(100)).is_empty());
}

#[test]
fn test_conflicting_global_hotkey_is_reported_as_already_bound() {
    // Arrange
    let binding: HotkeyBinding = "CTRL+SHIFT+K".parse().expect("valid");
    let registrar = MockHotkeyRegistrar::with_taken(binding);

    // Act
    let conflict = registrar.register(&binding);
    let fallback = registrar.register(&HotkeyBinding::default());

    // Assert
    assert_eq!(
        conflict,
        Err(HotkeyError::AlreadyBound("CTRL+SHIFT+K".to_string()))
    );
    assert!(fallback.is_ok());
    assert_eq!(registrar.registered(), Some(HotkeyBinding::default()));
}
