//! Resize handles around a selected element's bounding box.

use crate::geometry::Rect;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Handle hit tolerance in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 6.0;

/// One of the eight compass anchors used to drive a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl ResizeHandle {
    /// All handles, clockwise from the top-left corner.
    pub const ALL: [ResizeHandle; 8] = [
        ResizeHandle::Nw,
        ResizeHandle::N,
        ResizeHandle::Ne,
        ResizeHandle::E,
        ResizeHandle::Se,
        ResizeHandle::S,
        ResizeHandle::Sw,
        ResizeHandle::W,
    ];

    /// Compass name (`"nw"`, `"n"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::Nw => "nw",
            ResizeHandle::N => "n",
            ResizeHandle::Ne => "ne",
            ResizeHandle::E => "e",
            ResizeHandle::Se => "se",
            ResizeHandle::S => "s",
            ResizeHandle::Sw => "sw",
            ResizeHandle::W => "w",
        }
    }

    /// Whether dragging this handle moves the left edge.
    pub fn moves_left(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Sw | ResizeHandle::W)
    }

    /// Whether dragging this handle moves the right edge.
    pub fn moves_right(self) -> bool {
        matches!(self, ResizeHandle::Ne | ResizeHandle::E | ResizeHandle::Se)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn moves_top(self) -> bool {
        matches!(self, ResizeHandle::Nw | ResizeHandle::N | ResizeHandle::Ne)
    }

    /// Whether dragging this handle moves the bottom edge.
    pub fn moves_bottom(self) -> bool {
        matches!(self, ResizeHandle::Sw | ResizeHandle::S | ResizeHandle::Se)
    }

    /// Where this handle sits on the given rectangle.
    pub fn position_on(self, rect: &Rect) -> Point {
        let x = if self.moves_left() {
            rect.left()
        } else if self.moves_right() {
            rect.right()
        } else {
            rect.center_x()
        };
        let y = if self.moves_top() {
            rect.top()
        } else if self.moves_bottom() {
            rect.bottom()
        } else {
            rect.center_y()
        };
        Point::new(x, y)
    }

    /// CSS cursor name shown while hovering the handle.
    pub fn cursor(self) -> &'static str {
        match self {
            ResizeHandle::Nw | ResizeHandle::Se => "nwse-resize",
            ResizeHandle::Ne | ResizeHandle::Sw => "nesw-resize",
            ResizeHandle::N | ResizeHandle::S => "ns-resize",
            ResizeHandle::E | ResizeHandle::W => "ew-resize",
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown handle name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown resize handle: {0}")]
pub struct ParseHandleError(String);

impl FromStr for ResizeHandle {
    type Err = ParseHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResizeHandle::ALL
            .into_iter()
            .find(|handle| handle.as_str() == s)
            .ok_or_else(|| ParseHandleError(s.to_string()))
    }
}

/// Find which handle (if any) is hit at the given point.
///
/// `tolerance` is in mockup units; callers divide screen tolerance by the
/// current view scale. Corners win over edge midpoints when they overlap.
pub fn hit_test_handles(rect: &Rect, point: Point, tolerance: f64) -> Option<ResizeHandle> {
    let corners = [ResizeHandle::Nw, ResizeHandle::Ne, ResizeHandle::Se, ResizeHandle::Sw];
    let edges = [ResizeHandle::N, ResizeHandle::E, ResizeHandle::S, ResizeHandle::W];
    corners.into_iter().chain(edges).find(|handle| {
        let pos = handle.position_on(rect);
        let dx = point.x - pos.x;
        let dy = point.y - pos.y;
        dx * dx + dy * dy <= tolerance * tolerance
    })
}
