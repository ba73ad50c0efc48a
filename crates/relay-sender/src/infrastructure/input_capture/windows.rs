//! Windows capture thread: hooks, raw input, global hotkey, cursor clip.
//!
//! Everything runs on one dedicated thread that owns a message-only window
//! and pumps its message queue.  Low-level hook callbacks, `WM_INPUT` and
//! `WM_HOTKEY` are all delivered on that thread, so the [`CaptureSession`]
//! lives in a thread-local and is never shared across threads.
//!
//! ```text
//! capture thread
//!  ├─ message-only window        WM_INPUT / WM_HOTKEY / WM_APP_TOGGLE
//!  ├─ WH_KEYBOARD_LL (always)    -> CaptureSession::on_key
//!  ├─ WH_MOUSE_LL (Active only)  -> CaptureSession::on_mouse_hook
//!  └─ GetMessageW loop           ends on WM_QUIT from request_quit()
//! ```
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::{Cell, RefCell};
use std::ffi::c_void;
use std::io;
use std::mem::size_of;
use std::rc::Rc;
use std::thread::{self, JoinHandle};

use relay_core::HotkeyBinding;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use windows::core::w;
use windows::Win32::Foundation::{
    ERROR_HOTKEY_ALREADY_REGISTERED, HINSTANCE, HWND, LPARAM, LRESULT, POINT, RECT, WPARAM,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, SendInput, UnregisterHotKey, HOT_KEY_MODIFIERS, INPUT, INPUT_0,
    INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_KEYUP, MOD_NOREPEAT, VIRTUAL_KEY,
};
use windows::Win32::UI::Input::{
    GetRawInputData, RegisterRawInputDevices, HRAWINPUT, RAWINPUT, RAWINPUTDEVICE,
    RAWINPUTDEVICE_FLAGS, RAWINPUTHEADER, RIDEV_INPUTSINK, RIDEV_REMOVE, RID_INPUT, RIM_TYPEMOUSE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, ClipCursor, CreateWindowExW, DefWindowProcW, DestroyWindow,
    DispatchMessageW, GetCursorPos, GetMessageW, PostMessageW, PostThreadMessageW,
    RegisterClassW, SetWindowsHookExW, UnhookWindowsHookEx, HC_ACTION, HHOOK, HWND_MESSAGE,
    KBDLLHOOKSTRUCT, KBDLLHOOKSTRUCT_FLAGS, LLKHF_INJECTED, MSG, WH_KEYBOARD_LL, WH_MOUSE_LL,
    WINDOW_EX_STYLE, WINDOW_STYLE, WM_APP, WM_HOTKEY, WM_INPUT, WM_KEYDOWN, WM_KEYUP, WM_QUIT,
    WM_SYSKEYDOWN, WM_SYSKEYUP, WNDCLASSW,
};

use crate::application::capture_session::{
    CaptureError, CapturePlatform, CaptureSession, HotkeyError, HotkeyRegistrar, KeyVerdict,
};
use crate::application::classify_input::RawMouseNotification;
use crate::infrastructure::network::UdpEventSink;
use relay_core::keymap::windows_vk::{VK_CONTROL, VK_MENU, VK_SHIFT};

/// Posted by the keyboard hook when it recognises the toggle chord.
const WM_APP_TOGGLE: u32 = WM_APP + 1;

/// Id of the single global hotkey this process registers.
const HOTKEY_ID: i32 = 1;

// Generic desktop page, mouse usage.
const HID_USAGE_PAGE_GENERIC: u16 = 0x01;
const HID_USAGE_GENERIC_MOUSE: u16 = 0x02;

type WindowsSession = CaptureSession<WindowsCapturePlatform, UdpEventSink>;

thread_local! {
    static SESSION: RefCell<Option<Rc<WindowsSession>>> = const { RefCell::new(None) };
}

fn current_session() -> Option<Rc<WindowsSession>> {
    SESSION.with(|s| s.borrow().clone())
}

/// Errors that stop the capture thread before its message loop starts.
#[derive(Debug, Error)]
pub enum CaptureLoopError {
    #[error("failed to create message window: {0}")]
    Window(String),

    #[error(transparent)]
    Hotkey(#[from] HotkeyError),

    #[error("failed to install keyboard hook: {0}")]
    KeyboardHook(String),
}

// ── Capture platform ──────────────────────────────────────────────────────────

/// [`CapturePlatform`] backed by raw input, `WH_MOUSE_LL` and `ClipCursor`.
///
/// Only usable on the capture thread.
pub struct WindowsCapturePlatform {
    hwnd: HWND,
    hinstance: HINSTANCE,
    mouse_hook: Cell<Option<HHOOK>>,
}

impl WindowsCapturePlatform {
    fn new(hwnd: HWND, hinstance: HINSTANCE) -> Self {
        Self {
            hwnd,
            hinstance,
            mouse_hook: Cell::new(None),
        }
    }

    fn register_mouse(
        &self,
        flags: RAWINPUTDEVICE_FLAGS,
        target: HWND,
    ) -> windows::core::Result<()> {
        let device = RAWINPUTDEVICE {
            usUsagePage: HID_USAGE_PAGE_GENERIC,
            usUsage: HID_USAGE_GENERIC_MOUSE,
            dwFlags: flags,
            hwndTarget: target,
        };
        // SAFETY: `device` is a fully initialised RAWINPUTDEVICE and the size
        // argument matches its layout.
        unsafe { RegisterRawInputDevices(&[device], size_of::<RAWINPUTDEVICE>() as u32) }
    }
}

impl CapturePlatform for WindowsCapturePlatform {
    fn subscribe_raw_motion(&self) -> Result<(), CaptureError> {
        self.register_mouse(RIDEV_INPUTSINK, self.hwnd)
            .map_err(|e| CaptureError::RawInputSubscribe(e.to_string()))
    }

    fn unsubscribe_raw_motion(&self) {
        if let Err(e) = self.register_mouse(RIDEV_REMOVE, HWND::default()) {
            warn!("failed to remove raw mouse subscription: {e}");
        }
    }

    fn install_suppression(&self) -> Result<(), CaptureError> {
        if self.mouse_hook.get().is_some() {
            return Ok(());
        }
        // SAFETY: the hook procedure is a valid `extern "system"` fn for the
        // lifetime of the process; this thread pumps messages.
        let hook =
            unsafe { SetWindowsHookExW(WH_MOUSE_LL, Some(mouse_hook_proc), self.hinstance, 0) }
                .map_err(|e| CaptureError::SuppressionInstall(e.to_string()))?;
        self.mouse_hook.set(Some(hook));
        Ok(())
    }

    fn remove_suppression(&self) {
        if let Some(hook) = self.mouse_hook.take() {
            // SAFETY: `hook` was returned by SetWindowsHookExW on this thread.
            if let Err(e) = unsafe { UnhookWindowsHookEx(hook) } {
                warn!("failed to remove mouse hook: {e}");
            }
        }
    }

    fn release_local_modifiers(&self) {
        let inputs = [VK_CONTROL, VK_SHIFT, VK_MENU].map(|vk| INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(vk),
                    wScan: 0,
                    dwFlags: KEYEVENTF_KEYUP,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        });
        // SAFETY: `inputs` is a valid INPUT array and the size matches.
        let sent = unsafe { SendInput(&inputs, size_of::<INPUT>() as i32) };
        if sent as usize != inputs.len() {
            warn!(sent, "local modifier release was partially blocked");
        }
    }

    fn pin_cursor(&self) -> Result<(), CaptureError> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid out-pointer for the duration of the call.
        unsafe { GetCursorPos(&mut point) }.map_err(|e| CaptureError::CursorPin(e.to_string()))?;
        let rect = RECT {
            left: point.x,
            top: point.y,
            right: point.x + 1,
            bottom: point.y + 1,
        };
        // SAFETY: `rect` outlives the call.
        unsafe { ClipCursor(Some(&rect as *const RECT)) }
            .map_err(|e| CaptureError::CursorPin(e.to_string()))
    }

    fn unpin_cursor(&self) {
        // SAFETY: a null rectangle releases the clip.
        if let Err(e) = unsafe { ClipCursor(None) } {
            warn!("failed to release cursor clip: {e}");
        }
    }
}

// ── Global hotkey ─────────────────────────────────────────────────────────────

/// [`HotkeyRegistrar`] backed by `RegisterHotKey` on the capture window.
pub struct WindowsHotkeyRegistrar {
    hwnd: HWND,
}

impl HotkeyRegistrar for WindowsHotkeyRegistrar {
    fn register(&self, binding: &HotkeyBinding) -> Result<(), HotkeyError> {
        let modifiers = HOT_KEY_MODIFIERS(binding.os_modifier_bits()) | MOD_NOREPEAT;
        // SAFETY: `hwnd` is the live capture window owned by this thread.
        unsafe { RegisterHotKey(self.hwnd, HOTKEY_ID, modifiers, u32::from(binding.key)) }.map_err(
            |e| {
                if e.code() == ERROR_HOTKEY_ALREADY_REGISTERED.to_hresult() {
                    HotkeyError::AlreadyBound(binding.to_string())
                } else {
                    HotkeyError::RegistrationFailed {
                        binding: binding.to_string(),
                        reason: e.to_string(),
                    }
                }
            },
        )
    }

    fn unregister(&self) {
        // SAFETY: unregistering an id that is not registered is harmless.
        if let Err(e) = unsafe { UnregisterHotKey(self.hwnd, HOTKEY_ID) } {
            debug!("UnregisterHotKey: {e}");
        }
    }
}

// ── Thread lifecycle ──────────────────────────────────────────────────────────

/// Spawns the capture thread.
///
/// The returned receiver resolves once the thread is ready (with its thread
/// id, for [`request_quit`]) or has failed to start.
///
/// # Errors
///
/// Returns an I/O error if the OS refuses to spawn the thread.
pub fn spawn_capture_thread(
    binding: HotkeyBinding,
    pin_cursor: bool,
    sink: UdpEventSink,
) -> io::Result<(oneshot::Receiver<Result<u32, CaptureLoopError>>, JoinHandle<()>)> {
    let (ready_tx, ready_rx) = oneshot::channel();
    let handle = thread::Builder::new()
        .name("relay-capture".to_string())
        .spawn(move || run_capture_loop(binding, pin_cursor, sink, ready_tx))?;
    Ok((ready_rx, handle))
}

/// Asks the capture thread to leave its message loop.  The thread forces the
/// session to Idle and releases every OS resource before it exits.
pub fn request_quit(thread_id: u32) {
    // SAFETY: posting to a thread id has no memory-safety preconditions.
    if let Err(e) = unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) } {
        error!("failed to stop capture thread: {e}");
    }
}

fn run_capture_loop(
    binding: HotkeyBinding,
    pin_cursor: bool,
    sink: UdpEventSink,
    ready: oneshot::Sender<Result<u32, CaptureLoopError>>,
) {
    let (hwnd, hinstance) = match create_message_window() {
        Ok(window) => window,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let registrar = WindowsHotkeyRegistrar { hwnd };
    if let Err(e) = registrar.register(&binding) {
        destroy_window(hwnd);
        let _ = ready.send(Err(e.into()));
        return;
    }

    let session = Rc::new(CaptureSession::new(
        WindowsCapturePlatform::new(hwnd, hinstance),
        sink,
        binding,
        pin_cursor,
    ));
    SESSION.with(|s| *s.borrow_mut() = Some(Rc::clone(&session)));

    // SAFETY: the hook procedure is a valid `extern "system"` fn for the
    // lifetime of the process; this thread pumps messages below.
    let keyboard_hook =
        match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), hinstance, 0) } {
            Ok(hook) => hook,
            Err(e) => {
                SESSION.with(|s| s.borrow_mut().take());
                registrar.unregister();
                destroy_window(hwnd);
                let _ = ready.send(Err(CaptureLoopError::KeyboardHook(e.to_string())));
                return;
            }
        };

    // SAFETY: no preconditions.
    let thread_id = unsafe { GetCurrentThreadId() };
    info!("capture ready: press {binding} to toggle");
    if ready.send(Ok(thread_id)).is_err() {
        debug!("capture owner went away before start-up finished");
    }

    let mut msg = MSG::default();
    // SAFETY: standard Win32 GetMessage/DispatchMessage loop; `msg` outlives
    // each call.  GetMessageW returns 0 on WM_QUIT and -1 on error.
    unsafe {
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            DispatchMessageW(&msg);
        }
    }

    session.shutdown();
    registrar.unregister();
    // SAFETY: `keyboard_hook` was installed by this thread.
    if let Err(e) = unsafe { UnhookWindowsHookEx(keyboard_hook) } {
        warn!("failed to remove keyboard hook: {e}");
    }
    SESSION.with(|s| s.borrow_mut().take());
    destroy_window(hwnd);
    info!("capture thread stopped");
}

fn create_message_window() -> Result<(HWND, HINSTANCE), CaptureLoopError> {
    let class_name = w!("InputRelayCaptureWindow");
    // SAFETY: a null module name yields the handle of the current executable.
    let hinstance: HINSTANCE = unsafe { GetModuleHandleW(None) }
        .map_err(|e| CaptureLoopError::Window(e.to_string()))?
        .into();

    let class = WNDCLASSW {
        lpfnWndProc: Some(window_proc),
        hInstance: hinstance,
        lpszClassName: class_name,
        ..Default::default()
    };
    // SAFETY: `class` is fully initialised and the class name is a static
    // wide string.
    if unsafe { RegisterClassW(&class) } == 0 {
        return Err(CaptureLoopError::Window(
            io::Error::last_os_error().to_string(),
        ));
    }

    // SAFETY: the class was registered above; HWND_MESSAGE creates a
    // message-only window with no visible surface.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            class_name,
            w!("input-relay"),
            WINDOW_STYLE(0),
            0,
            0,
            0,
            0,
            HWND_MESSAGE,
            None,
            hinstance,
            None,
        )
    }
    .map_err(|e| CaptureLoopError::Window(e.to_string()))?;

    Ok((hwnd, hinstance))
}

fn destroy_window(hwnd: HWND) {
    // SAFETY: `hwnd` was created by this thread.
    if let Err(e) = unsafe { DestroyWindow(hwnd) } {
        debug!("DestroyWindow: {e}");
    }
}

// ── Callbacks ─────────────────────────────────────────────────────────────────

fn toggle_from_message() {
    if let Some(session) = current_session() {
        session.toggle();
    }
}

/// Window procedure of the capture window.
///
/// # Safety
///
/// Called by Windows on the capture thread during `DispatchMessageW`.
unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    match msg {
        WM_INPUT => {
            let notification = read_raw_mouse(l_param);
            if let (Some(session), Some(notification)) = (current_session(), notification) {
                session.on_raw_mouse(&notification);
            }
            // SAFETY: WM_INPUT must reach DefWindowProc so the system can
            // release the raw input buffer.
            DefWindowProcW(hwnd, msg, w_param, l_param)
        }
        WM_HOTKEY if w_param.0 == HOTKEY_ID as usize => {
            debug!("toggle via global hotkey");
            toggle_from_message();
            LRESULT(0)
        }
        WM_APP_TOGGLE => {
            debug!("toggle via keyboard hook");
            toggle_from_message();
            LRESULT(0)
        }
        // SAFETY: default processing for every other message.
        _ => DefWindowProcW(hwnd, msg, w_param, l_param),
    }
}

/// Copies the mouse part of a `WM_INPUT` payload.
///
/// # Safety
///
/// `l_param` must be the `HRAWINPUT` of a `WM_INPUT` message being handled.
unsafe fn read_raw_mouse(l_param: LPARAM) -> Option<RawMouseNotification> {
    let mut raw = RAWINPUT::default();
    let mut size = size_of::<RAWINPUT>() as u32;
    // SAFETY: `raw` is large enough for a mouse RAWINPUT and `size` holds its
    // capacity.
    let copied = GetRawInputData(
        HRAWINPUT(l_param.0 as _),
        RID_INPUT,
        Some(&mut raw as *mut RAWINPUT as *mut c_void),
        &mut size,
        size_of::<RAWINPUTHEADER>() as u32,
    );
    if copied == u32::MAX || raw.header.dwType != RIM_TYPEMOUSE.0 {
        return None;
    }

    // SAFETY: dwType says the `mouse` arm of the union is the active one.
    let mouse = &raw.data.mouse;
    let buttons = mouse.Anonymous.Anonymous;
    Some(RawMouseNotification {
        flags: mouse.usFlags.0,
        button_flags: buttons.usButtonFlags,
        button_data: buttons.usButtonData,
        last_x: mouse.lLastX,
        last_y: mouse.lLastY,
    })
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// Called by Windows on the capture thread.  It must return quickly (< ~300ms)
/// to avoid hook removal by the OS.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: Must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
    let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);

    // Synthetic input (our own modifier release included) is never captured.
    if (kbs.flags & LLKHF_INJECTED) != KBDLLHOOKSTRUCT_FLAGS(0) {
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    let down = match w_param.0 as u32 {
        WM_KEYDOWN | WM_SYSKEYDOWN => true,
        WM_KEYUP | WM_SYSKEYUP => false,
        _ => return CallNextHookEx(None, n_code, w_param, l_param),
    };

    let Some(session) = current_session() else {
        return CallNextHookEx(None, n_code, w_param, l_param);
    };

    match session.on_key(kbs.vkCode as u16, down) {
        KeyVerdict::PassThrough => CallNextHookEx(None, n_code, w_param, l_param),
        KeyVerdict::Suppress => LRESULT(1),
        KeyVerdict::Toggle => {
            // The transition itself runs from the message loop, outside the
            // hook's time budget.
            let hwnd = session.platform().hwnd;
            if let Err(e) = PostMessageW(hwnd, WM_APP_TOGGLE, WPARAM(0), LPARAM(0)) {
                warn!("failed to post toggle request: {e}");
            }
            LRESULT(1)
        }
    }
}

/// Low-level mouse hook callback.  Installed only while capture is Active.
///
/// # Safety
///
/// Called by Windows on the capture thread; must return quickly.
unsafe extern "system" fn mouse_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code == HC_ACTION as i32 && current_session().is_some_and(|s| s.on_mouse_hook()) {
        return LRESULT(1);
    }
    // SAFETY: Forward to the next hook in the chain.
    CallNextHookEx(None, n_code, w_param, l_param)
}
