//! In-memory screen geometry.

use crate::geometry::{CanvasSize, ElementId, IdentifiedRect, Rect};
use crate::history::{Operation, OperationKind};
use crate::session::{GeometrySource, PersistenceSink, SinkError};

/// Flat list of element rectangles on one screen, for testing and ephemeral use.
///
/// Every element is treated as a sibling of every other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryScreen {
    canvas: CanvasSize,
    elements: Vec<IdentifiedRect>,
}

impl MemoryScreen {
    /// Create an empty screen of the given size.
    pub fn new(canvas: CanvasSize) -> Self {
        Self {
            canvas,
            elements: Vec::new(),
        }
    }

    /// Insert an element, replacing any element with the same id.
    pub fn insert(&mut self, element: IdentifiedRect) {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(existing) => existing.rect = element.rect,
            None => self.elements.push(element),
        }
    }

    /// Remove an element. Returns whether it existed.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.elements.len();
        self.elements.retain(|e| e.id != *id);
        self.elements.len() != before
    }

    pub fn elements(&self) -> &[IdentifiedRect] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl GeometrySource for MemoryScreen {
    fn rect_of(&self, id: &ElementId) -> Option<Rect> {
        self.elements.iter().find(|e| e.id == *id).map(|e| e.rect)
    }

    fn siblings_of(&self, id: &ElementId) -> Vec<IdentifiedRect> {
        self.elements.iter().filter(|e| e.id != *id).cloned().collect()
    }

    fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }
}

impl PersistenceSink for MemoryScreen {
    fn apply(&mut self, op: &Operation) -> Result<(), SinkError> {
        let id = op.element_id();
        match op.kind() {
            OperationKind::Move | OperationKind::Resize | OperationKind::Update => {
                let element = self
                    .elements
                    .iter_mut()
                    .find(|e| e.id == *id)
                    .ok_or_else(|| SinkError::NotFound(id.clone()))?;
                element.rect = op.apply_geometry(element.rect);
            }
            OperationKind::Add => {
                let snapshot = op
                    .after()
                    .ok_or_else(|| SinkError::Rejected(format!("add of {} carries no element", id)))?;
                let rect: Rect = serde_json::from_value(snapshot.clone())
                    .map_err(|e| SinkError::Rejected(format!("add of {}: {}", id, e)))?;
                self.insert(IdentifiedRect::new(id.clone(), rect));
            }
            OperationKind::Delete => {
                // Deleting twice is fine
                self.remove(id);
            }
        }
        log::trace!("applied {:?} to {}", op.kind(), id);
        Ok(())
    }
}
