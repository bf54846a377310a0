//! Drag (move) engine: pointer gesture to element position.

use crate::snap::GridSettings;
use kurbo::{Point, Vec2};

/// State captured when a move gesture starts.
///
/// Lives for exactly one gesture and is owned by whoever drives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Pointer position at gesture start (mockup units).
    pub start_pointer: Point,
    /// Element top-left at gesture start.
    pub start_element: Point,
}

impl DragSession {
    /// Create a new drag session.
    pub fn new(start_pointer: Point, start_element: Point) -> Self {
        Self {
            start_pointer,
            start_element,
        }
    }

    /// Compute the element position for the current pointer.
    pub fn position_at(&self, current_pointer: Point, shift_held: bool, grid: GridSettings) -> Point {
        compute_drag_result(self.start_element, self.start_pointer, current_pointer, shift_held, grid)
    }
}

/// Keep only the dominant axis of a pointer displacement.
///
/// Ties go to the horizontal axis.
pub fn constrain_to_axis(delta: Vec2) -> Vec2 {
    if delta.x.abs() >= delta.y.abs() {
        Vec2::new(delta.x, 0.0)
    } else {
        Vec2::new(0.0, delta.y)
    }
}

/// Convert a drag gesture into the element's new top-left position.
///
/// Holding shift locks movement to the dominant pointer axis. Grid snapping
/// rounds each axis independently, and the result never goes above or left
/// of the canvas origin.
pub fn compute_drag_result(
    start_element: Point,
    start_pointer: Point,
    current_pointer: Point,
    shift_held: bool,
    grid: GridSettings,
) -> Point {
    let mut delta = current_pointer - start_pointer;
    if shift_held {
        delta = constrain_to_axis(delta);
    }

    let candidate = start_element + delta;
    let x = grid.apply(candidate.x).max(0.0);
    let y = grid.apply(candidate.y).max(0.0);

    log::trace!("drag {:?} -> ({}, {})", delta, x, y);
    Point::new(x, y)
}
