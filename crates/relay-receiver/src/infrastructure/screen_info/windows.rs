//! Windows pointer and virtual-desktop queries.

#![cfg(target_os = "windows")]

use relay_core::DesktopArea;
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::WindowsAndMessaging::{
    GetCursorPos, GetSystemMetrics, SM_CXVIRTUALSCREEN, SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN,
    SM_YVIRTUALSCREEN,
};

use crate::application::actuate_motion::{DesktopGeometry, GeometryError};

/// Windows implementation of [`DesktopGeometry`].
#[derive(Debug, Default)]
pub struct WindowsDesktop;

impl WindowsDesktop {
    pub fn new() -> Self {
        Self
    }
}

impl DesktopGeometry for WindowsDesktop {
    fn cursor_position(&self) -> Result<(i32, i32), GeometryError> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid out-pointer for the duration of the call.
        unsafe { GetCursorPos(&mut point) }
            .map_err(|e| GeometryError::Platform(format!("GetCursorPos failed: {e}")))?;
        Ok((point.x, point.y))
    }

    fn desktop_area(&self) -> Result<DesktopArea, GeometryError> {
        // SAFETY: GetSystemMetrics has no preconditions.
        let area = unsafe {
            DesktopArea::new(
                GetSystemMetrics(SM_XVIRTUALSCREEN),
                GetSystemMetrics(SM_YVIRTUALSCREEN),
                GetSystemMetrics(SM_CXVIRTUALSCREEN),
                GetSystemMetrics(SM_CYVIRTUALSCREEN),
            )
        };
        if area.width <= 0 || area.height <= 0 {
            return Err(GeometryError::Platform(
                "virtual screen has no extent".to_string(),
            ));
        }
        Ok(area)
    }
}
