//! Recording mocks for the capture platform and hotkey registration.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use relay_core::HotkeyBinding;

use crate::application::capture_session::{
    CaptureError, CapturePlatform, HotkeyError, HotkeyRegistrar,
};

/// One recorded call on [`MockCapturePlatform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformCall {
    SubscribeRawMotion,
    UnsubscribeRawMotion,
    InstallSuppression,
    RemoveSuppression,
    ReleaseLocalModifiers,
    PinCursor,
    UnpinCursor,
}

/// A [`CapturePlatform`] that records calls and fails on request.
#[derive(Debug, Default)]
pub struct MockCapturePlatform {
    calls: Mutex<Vec<PlatformCall>>,
    fail_subscribe: AtomicBool,
    fail_suppression: AtomicBool,
    fail_pin: AtomicBool,
}

impl MockCapturePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `subscribe_raw_motion` fail.
    pub fn fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::Relaxed);
    }

    /// Makes `install_suppression` fail.
    pub fn fail_suppression(&self, fail: bool) {
        self.fail_suppression.store(fail, Ordering::Relaxed);
    }

    /// Makes `pin_cursor` fail.
    pub fn fail_pin(&self, fail: bool) {
        self.fail_pin.store(fail, Ordering::Relaxed);
    }

    /// Every call recorded so far, oldest first.
    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CapturePlatform for MockCapturePlatform {
    fn subscribe_raw_motion(&self) -> Result<(), CaptureError> {
        self.record(PlatformCall::SubscribeRawMotion);
        if self.fail_subscribe.load(Ordering::Relaxed) {
            return Err(CaptureError::RawInputSubscribe("mock failure".to_string()));
        }
        Ok(())
    }

    fn unsubscribe_raw_motion(&self) {
        self.record(PlatformCall::UnsubscribeRawMotion);
    }

    fn install_suppression(&self) -> Result<(), CaptureError> {
        self.record(PlatformCall::InstallSuppression);
        if self.fail_suppression.load(Ordering::Relaxed) {
            return Err(CaptureError::SuppressionInstall("mock failure".to_string()));
        }
        Ok(())
    }

    fn remove_suppression(&self) {
        self.record(PlatformCall::RemoveSuppression);
    }

    fn release_local_modifiers(&self) {
        self.record(PlatformCall::ReleaseLocalModifiers);
    }

    fn pin_cursor(&self) -> Result<(), CaptureError> {
        self.record(PlatformCall::PinCursor);
        if self.fail_pin.load(Ordering::Relaxed) {
            return Err(CaptureError::CursorPin("mock failure".to_string()));
        }
        Ok(())
    }

    fn unpin_cursor(&self) {
        self.record(PlatformCall::UnpinCursor);
    }
}

/// A [`HotkeyRegistrar`] that keeps a single slot, like the OS registration.
#[derive(Debug, Default)]
pub struct MockHotkeyRegistrar {
    registered: Mutex<Option<HotkeyBinding>>,
    /// A chord already owned by "another application".
    taken: Option<HotkeyBinding>,
}

impl MockHotkeyRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registrar on which `taken` is already bound elsewhere.
    pub fn with_taken(taken: HotkeyBinding) -> Self {
        Self {
            registered: Mutex::new(None),
            taken: Some(taken),
        }
    }

    pub fn registered(&self) -> Option<HotkeyBinding> {
        *self.registered.lock().unwrap()
    }
}

impl HotkeyRegistrar for MockHotkeyRegistrar {
    fn register(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
        if self.taken.as_ref() == Some(binding) {
            return Err(HotkeyError::AlreadyBound(binding.to_string()));
        }
        *self.registered.lock().unwrap() = Some(*binding);
        Ok(())
    }

    fn unregister(&self) {
        *self.registered.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_platform_records_calls_in_order() {
        // Arrange
        let platform = MockCapturePlatform::new();

        // Act
        platform.subscribe_raw_motion().expect("subscribe");
        platform.pin_cursor().expect("pin");
        platform.unpin_cursor();

        // Assert
        assert_eq!(
            platform.calls(),
            vec![
                PlatformCall::SubscribeRawMotion,
                PlatformCall::PinCursor,
                PlatformCall::UnpinCursor,
            ]
        );
    }

    #[test]
    fn test_mock_platform_failure_is_still_recorded() {
        let platform = MockCapturePlatform::new();
        platform.fail_suppression(true);

        assert!(platform.install_suppression().is_err());
        assert_eq!(platform.calls(), vec![PlatformCall::InstallSuppression]);
    }

    #[test]
    fn test_mock_registrar_rejects_taken_chord() {
        // Arrange
        let binding = HotkeyBinding::default();
        let registrar = MockHotkeyRegistrar::with_taken(binding);

        // Act
        let result = registrar.register(&binding);

        // Assert
        assert_eq!(result, Err(HotkeyError::AlreadyBound("ALT+1".to_string())));
        assert_eq!(registrar.registered(), None);
    }

    #[test]
    fn test_mock_registrar_unregister_clears_slot() {
        let registrar = MockHotkeyRegistrar::new();
        registrar.register(&HotkeyBinding::default()).expect("register");

        registrar.unregister();

        assert_eq!(registrar.registered(), None);
    }
}
