//! Grid snapping.

use crate::element::{Position, Size};

/// Snap settings for the canvas grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub size: f64,
    pub snap: bool,
}

impl Grid {
    /// Round a single coordinate to the nearest grid multiple.
    ///
    /// Returns the raw value when snapping is off or the grid is degenerate.
    pub fn snap_value(&self, value: f64) -> f64 {
        if !self.snap || !(self.size > 0.0) {
            return value;
        }
        (value / self.size).round() * self.size
    }

    pub fn snap_position(&self, position: Position) -> Position {
        Position::new(self.snap_value(position.x), self.snap_value(position.y))
    }

    pub fn snap_size(&self, size: Size) -> Size {
        Size::new(self.snap_value(size.width), self.snap_value(size.height))
    }
}
