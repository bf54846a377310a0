//! Geometry primitives shared by the manipulation engines.
//!
//! Coordinates are in the mockup's own space, not device pixels. Pointer
//! deltas coming from the display must be divided by the view scale before
//! they reach anything in this module.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Size of the canvas (screen) an element lives on.
pub type CanvasSize = kurbo::Size;

/// Opaque identifier of an element on a screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a fresh identifier for a newly created element.
    pub fn generate() -> Self {
        Self(format!("el_{}", Uuid::new_v4().simple()))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (treated as "no element").
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// An axis-aligned element rectangle stored as origin plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    pub fn size(&self) -> kurbo::Size {
        kurbo::Size::new(self.width, self.height)
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Same size, moved so the top-left corner sits at `origin`.
    pub fn with_origin(self, origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            ..self
        }
    }

    /// Same size, shifted by `delta`.
    pub fn translated(self, delta: Vec2) -> Self {
        self.with_origin(self.origin() + delta)
    }

    /// Check whether a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Convert to a kurbo rectangle (two-corner form).
    pub fn to_kurbo(self) -> kurbo::Rect {
        kurbo::Rect::new(self.x, self.y, self.right(), self.bottom())
    }

    /// Build from a kurbo rectangle, normalizing inverted corners.
    pub fn from_kurbo(rect: kurbo::Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

/// A rectangle tagged with the element it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedRect {
    pub id: ElementId,
    #[serde(flatten)]
    pub rect: Rect,
}

impl IdentifiedRect {
    pub fn new(id: impl Into<ElementId>, rect: Rect) -> Self {
        Self { id: id.into(), rect }
    }
}
