//! A fixed virtual desktop for `relay-receiver --dry-run`.
//!
//! Nothing is injected during a dry run, so the pointer never moves: every
//! actuation pass starts from the centre of the virtual area.

use relay_core::{DesktopArea, NORMALIZED_MAX};

use crate::application::actuate_motion::{DesktopGeometry, GeometryError};

#[derive(Debug, Clone, Copy)]
pub struct DryRunDesktop {
    area: DesktopArea,
}

impl DryRunDesktop {
    pub fn new(area: DesktopArea) -> Self {
        Self { area }
    }
}

impl Default for DryRunDesktop {
    /// Spans the normalized range, so logged coordinates read as pixels.
    fn default() -> Self {
        Self::new(DesktopArea::new(0, 0, NORMALIZED_MAX, NORMALIZED_MAX))
    }
}

impl DesktopGeometry for DryRunDesktop {
    fn cursor_position(&self) -> Result<(i32, i32), GeometryError> {
        Ok((
            self.area.x + self.area.width / 2,
            self.area.y + self.area.height / 2,
        ))
    }

    fn desktop_area(&self) -> Result<DesktopArea, GeometryError> {
        Ok(self.area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_rests_at_centre_of_area() {
        // Arrange
        let desktop = DryRunDesktop::new(DesktopArea::new(-1920, 0, 3840, 1080));

        // Act
        let position = desktop.cursor_position().expect("position");

        // Assert
        assert_eq!(position, (0, 540));
        assert_eq!(
            desktop.desktop_area().expect("area"),
            DesktopArea::new(-1920, 0, 3840, 1080)
        );
    }

    #[test]
    fn test_default_area_spans_normalized_range() {
        let area = DryRunDesktop::default().desktop_area().expect("area");
        assert_eq!(area, DesktopArea::new(0, 0, NORMALIZED_MAX, NORMALIZED_MAX));
    }
}
