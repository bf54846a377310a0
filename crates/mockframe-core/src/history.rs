//! Reversible edit history.
//!
//! The stack only records operations and knows how to invert them. Applying
//! an operation against persisted state is the caller's job: after `undo`
//! apply the inverse of the returned operation, after `redo` apply it as is.

use crate::geometry::{ElementId, Rect};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::VecDeque;

/// Maximum number of undo entries kept by default.
pub const MAX_UNDO_HISTORY: usize = 50;

/// Kind of edit an operation records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Move,
    Resize,
    Update,
    Add,
    Delete,
}

/// One reversible unit of edit history.
///
/// For `Add`, `before` is `None` and `after` holds the full element; `Delete`
/// is the reverse. `Move`, `Resize` and `Update` carry only the changed
/// fields on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(rename = "type")]
    kind: OperationKind,
    element_id: ElementId,
    before: Option<Value>,
    after: Option<Value>,
}

const GEOMETRY_FIELDS: [&str; 4] = ["x", "y", "width", "height"];

fn rect_field(rect: &Rect, field: &str) -> f64 {
    match field {
        "x" => rect.x,
        "y" => rect.y,
        "width" => rect.width,
        _ => rect.height,
    }
}

/// Changed geometry fields between two rectangles, as (before, after) maps.
fn changed_fields(from: &Rect, to: &Rect, fields: &[&str]) -> (Value, Value) {
    let mut before = Map::new();
    let mut after = Map::new();
    for &field in fields {
        let old = rect_field(from, field);
        let new = rect_field(to, field);
        if old != new {
            before.insert(field.to_string(), Value::from(old));
            after.insert(field.to_string(), Value::from(new));
        }
    }
    (Value::Object(before), Value::Object(after))
}

impl Operation {
    /// Build an operation from raw parts.
    pub fn new(kind: OperationKind, element_id: ElementId, before: Option<Value>, after: Option<Value>) -> Self {
        Self {
            kind,
            element_id,
            before,
            after,
        }
    }

    /// A move from one top-left position to another.
    pub fn moved(element_id: ElementId, from: Point, to: Point) -> Self {
        let from = Rect::new(from.x, from.y, 0.0, 0.0);
        let to = Rect::new(to.x, to.y, 0.0, 0.0);
        let (before, after) = changed_fields(&from, &to, &GEOMETRY_FIELDS[..2]);
        Self::new(OperationKind::Move, element_id, Some(before), Some(after))
    }

    /// A resize between two rectangles.
    pub fn resized(element_id: ElementId, from: Rect, to: Rect) -> Self {
        let (before, after) = changed_fields(&from, &to, &GEOMETRY_FIELDS);
        Self::new(OperationKind::Resize, element_id, Some(before), Some(after))
    }

    /// A property update; `before` and `after` hold the changed fields.
    pub fn updated(element_id: ElementId, before: Value, after: Value) -> Self {
        Self::new(OperationKind::Update, element_id, Some(before), Some(after))
    }

    /// Creation of an element; `element` is its full snapshot.
    pub fn added(element_id: ElementId, element: Value) -> Self {
        Self::new(OperationKind::Add, element_id, None, Some(element))
    }

    /// Deletion of an element; `element` is its full snapshot.
    pub fn deleted(element_id: ElementId, element: Value) -> Self {
        Self::new(OperationKind::Delete, element_id, Some(element), None)
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn element_id(&self) -> &ElementId {
        &self.element_id
    }

    pub fn before(&self) -> Option<&Value> {
        self.before.as_ref()
    }

    pub fn after(&self) -> Option<&Value> {
        self.after.as_ref()
    }

    /// Whether the operation changes nothing (empty field sets).
    pub fn is_noop(&self) -> bool {
        let empty = |v: &Option<Value>| match v {
            Some(Value::Object(map)) => map.is_empty(),
            Some(_) => false,
            None => true,
        };
        matches!(self.kind, OperationKind::Move | OperationKind::Resize | OperationKind::Update)
            && empty(&self.before)
            && empty(&self.after)
    }

    /// Structural inverse of this operation.
    ///
    /// `Add` and `Delete` swap kinds; every kind swaps `before` and `after`.
    pub fn inverted(&self) -> Self {
        let kind = match self.kind {
            OperationKind::Add => OperationKind::Delete,
            OperationKind::Delete => OperationKind::Add,
            other => other,
        };
        Self {
            kind,
            element_id: self.element_id.clone(),
            before: self.after.clone(),
            after: self.before.clone(),
        }
    }

    /// Apply the geometry fields in `after` to a rectangle.
    ///
    /// Non-geometry fields are ignored; a missing `after` leaves the rect as is.
    pub fn apply_geometry(&self, rect: Rect) -> Rect {
        let Some(Value::Object(fields)) = &self.after else {
            return rect;
        };
        let get = |name: &str, current: f64| fields.get(name).and_then(Value::as_f64).unwrap_or(current);
        Rect::new(
            get("x", rect.x),
            get("y", rect.y),
            get("width", rect.width),
            get("height", rect.height),
        )
    }
}

/// Bounded undo/redo stacks of operations.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    undo_stack: VecDeque<Operation>,
    redo_stack: Vec<Operation>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack {
    /// Create a history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_UNDO_HISTORY)
    }

    /// Create a history keeping at most `capacity` undo entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a new operation. Always invalidates the redo branch.
    pub fn push(&mut self, op: Operation) {
        log::debug!("history push {:?} {}", op.kind(), op.element_id());
        self.undo_stack.push_back(op);
        while self.undo_stack.len() > self.capacity {
            if let Some(evicted) = self.undo_stack.pop_front() {
                log::debug!("history evict {:?} {}", evicted.kind(), evicted.element_id());
            }
        }
        self.redo_stack.clear();
    }

    /// Pop the latest operation for undoing. `None` means nothing to undo.
    pub fn undo(&mut self) -> Option<Operation> {
        let op = self.undo_stack.pop_back()?;
        self.redo_stack.push(op.clone());
        Some(op)
    }

    /// Pop the latest undone operation for redoing. `None` means nothing to redo.
    pub fn redo(&mut self) -> Option<Operation> {
        let op = self.redo_stack.pop()?;
        self.undo_stack.push_back(op.clone());
        Some(op)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Structural inverse of an operation.
    pub fn invert(op: &Operation) -> Operation {
        op.inverted()
    }

    /// The operation the next `undo` would return.
    pub fn peek_undo(&self) -> Option<&Operation> {
        self.undo_stack.back()
    }

    /// Number of undo entries.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Number of redo entries.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
