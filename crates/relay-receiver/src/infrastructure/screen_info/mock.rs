//! In-memory desktop for tests.

use std::sync::Mutex;

use relay_core::{DesktopArea, NORMALIZED_MAX};

use crate::application::actuate_motion::{DesktopGeometry, GeometryError};

/// A desktop with a fixed area and a settable pointer.
#[derive(Debug)]
pub struct MockDesktop {
    area: DesktopArea,
    position: Mutex<(i32, i32)>,
}

impl MockDesktop {
    /// A desktop covering `area`, pointer at its origin.
    pub fn new(area: DesktopArea) -> Self {
        Self {
            area,
            position: Mutex::new((area.x, area.y)),
        }
    }

    /// A desktop whose span equals the normalized range, so pixel and
    /// normalized coordinates coincide.
    pub fn identity() -> Self {
        Self::new(DesktopArea::new(0, 0, NORMALIZED_MAX, NORMALIZED_MAX))
    }

    pub fn set_position(&self, x: i32, y: i32) {
        *self.position.lock().unwrap() = (x, y);
    }

    pub fn position(&self) -> (i32, i32) {
        *self.position.lock().unwrap()
    }

    /// Moves the pointer to the pixel a normalized coordinate lands on.
    pub fn place_normalized(&self, norm_x: i32, norm_y: i32) {
        let x = self.area.x + denormalize(norm_x, self.area.width);
        let y = self.area.y + denormalize(norm_y, self.area.height);
        self.set_position(x, y);
    }
}

fn denormalize(norm: i32, span: i32) -> i32 {
    let max = i64::from(NORMALIZED_MAX);
    ((i64::from(norm) * i64::from(span) * 2 + max) / (2 * max)) as i32
}

impl DesktopGeometry for MockDesktop {
    fn cursor_position(&self) -> Result<(i32, i32), GeometryError> {
        Ok(self.position())
    }

    fn desktop_area(&self) -> Result<DesktopArea, GeometryError> {
        Ok(self.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::to_normalized;

    #[test]
    fn test_identity_desktop_round_trips_normalized_coordinates() {
        let desktop = MockDesktop::identity();
        desktop.place_normalized(12_345, 54_321);
        assert_eq!(desktop.position(), (12_345, 54_321));
    }

    #[test]
    fn test_place_normalized_inverts_to_normalized_on_full_hd() {
        // Arrange
        let area = DesktopArea::new(0, 0, 1920, 1080);
        let desktop = MockDesktop::new(area);
        let (nx, ny) = to_normalized(&area, 960, 540);

        // Act
        desktop.place_normalized(nx, ny);

        // Assert
        assert_eq!(desktop.position(), (960, 540));
    }
}
