//! Grid snapping for positions and sizes.

use crate::geometry::Rect;
use kurbo::Point;

/// Default grid size for snapping (matches the editor's visual grid).
pub const DEFAULT_GRID_SIZE: f64 = 8.0;

/// Grid snapping settings passed into the engines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSettings {
    /// Whether snapping to the grid is on.
    pub enabled: bool,
    /// Grid cell size in mockup units.
    pub size: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::disabled()
    }
}

impl GridSettings {
    /// Grid snapping with the given cell size.
    pub fn enabled(size: f64) -> Self {
        Self { enabled: true, size }
    }

    /// No grid snapping.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            size: DEFAULT_GRID_SIZE,
        }
    }

    /// Snap a value if the grid is enabled.
    pub fn apply(&self, value: f64) -> f64 {
        if self.enabled {
            snap_value(value, self.size)
        } else {
            value
        }
    }
}

fn usable_grid(grid_size: f64) -> bool {
    grid_size.is_finite() && grid_size > 0.0
}

/// Round a value to the nearest multiple of `grid_size`.
///
/// A non-positive or non-finite grid size leaves the value untouched.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if !usable_grid(grid_size) {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap both coordinates of a point to the grid.
pub fn snap_point(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Snap every component of a rectangle independently.
pub fn snap_rect(rect: Rect, grid_size: f64) -> Rect {
    Rect::new(
        snap_value(rect.x, grid_size),
        snap_value(rect.y, grid_size),
        snap_value(rect.width, grid_size),
        snap_value(rect.height, grid_size),
    )
}
