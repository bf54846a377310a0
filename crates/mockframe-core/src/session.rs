//! Editing session: selection, history and the active gesture for one screen.
//!
//! A session is created per screen and handed to every consumer explicitly.
//! Navigating to another screen should call [`EditingSession::reset`].

use crate::config::EditorConfig;
use crate::geometry::{CanvasSize, ElementId, IdentifiedRect, Rect};
use crate::gesture::{GestureContext, GestureFrame, GestureKind, GestureMachine, GestureOutcome, Modifiers};
use crate::history::{HistoryStack, Operation};
use crate::selection::SelectionState;
use kurbo::Point;
use thiserror::Error;

/// Read access to element geometry owned by the host.
pub trait GeometrySource {
    /// Current rectangle of an element.
    fn rect_of(&self, id: &ElementId) -> Option<Rect>;

    /// Elements that share a parent with `id`, for alignment.
    fn siblings_of(&self, id: &ElementId) -> Vec<IdentifiedRect>;

    /// Size of the canvas the elements live on.
    fn canvas_size(&self) -> CanvasSize;
}

/// Errors reported by a persistence sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Element not found: {0}")]
    NotFound(ElementId),
    #[error("Operation rejected: {0}")]
    Rejected(String),
    #[error("Persistence error: {0}")]
    Other(String),
}

/// Durable storage for finalized operations.
///
/// Applying the same operation twice must be safe; callers may retry.
pub trait PersistenceSink {
    fn apply(&mut self, op: &Operation) -> Result<(), SinkError>;
}

/// State for editing one screen.
#[derive(Debug, Default)]
pub struct EditingSession {
    config: EditorConfig,
    selection: SelectionState,
    history: HistoryStack,
    gesture: GestureMachine,
}

impl EditingSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            selection: SelectionState::new(),
            history: HistoryStack::with_capacity(config.history_capacity),
            gesture: GestureMachine::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replace the settings. History capacity applies to the next reset.
    pub fn set_config(&mut self, config: EditorConfig) {
        self.gesture.set_config(config.clone());
        self.config = config;
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn gesture(&self) -> &GestureMachine {
        &self.gesture
    }

    /// Pointer-down on an element. Selects it unless it is already selected.
    pub fn begin_gesture(&mut self, element_id: ElementId, rect: Rect, kind: GestureKind, pointer: Point) -> bool {
        if !self.gesture.is_idle() {
            return false;
        }
        if !self.selection.is_selected(&element_id) {
            self.selection.select(Some(element_id.clone()), false);
        }
        self.gesture.pointer_down(element_id, rect, kind, pointer)
    }

    /// Pointer-down, reading the element's rectangle from the host.
    pub fn begin_gesture_from<S: GeometrySource + ?Sized>(
        &mut self,
        source: &S,
        element_id: ElementId,
        kind: GestureKind,
        pointer: Point,
    ) -> bool {
        match source.rect_of(&element_id) {
            Some(rect) => self.begin_gesture(element_id, rect, kind, pointer),
            None => {
                log::debug!("pointer down on unknown element {}", element_id);
                false
            }
        }
    }

    /// Pointer-move; returns the live geometry while a drag or resize is active.
    pub fn update_gesture(
        &mut self,
        pointer: Point,
        modifiers: Modifiers,
        context: &GestureContext,
        scale: f64,
    ) -> Option<GestureFrame> {
        self.gesture.pointer_move(pointer, modifiers, context, scale)
    }

    /// Pointer-up; committed geometry changes are pushed onto the history.
    pub fn end_gesture(&mut self) -> GestureOutcome {
        let outcome = self.gesture.pointer_up();
        if let GestureOutcome::Committed(op) = &outcome {
            self.history.push(op.clone());
        }
        outcome
    }

    /// Abort the gesture; returns the geometry the host should restore.
    pub fn cancel_gesture(&mut self) -> Option<Rect> {
        self.gesture.cancel()
    }

    /// Record an edit that did not come from a gesture (property update, add, delete).
    pub fn record(&mut self, op: Operation) {
        if op.is_noop() {
            log::debug!("skipping no-op {:?} on {}", op.kind(), op.element_id());
            return;
        }
        self.history.push(op);
    }

    /// Undo the latest edit. Returns the operation to apply (already inverted).
    pub fn undo(&mut self) -> Option<Operation> {
        let op = self.history.undo()?;
        log::debug!("undo {:?} on {}", op.kind(), op.element_id());
        Some(op.inverted())
    }

    /// Redo the latest undone edit. Returns the operation to apply.
    pub fn redo(&mut self) -> Option<Operation> {
        let op = self.history.redo()?;
        log::debug!("redo {:?} on {}", op.kind(), op.element_id());
        Some(op)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Persist an operation. Failures are returned to the caller; the history
    /// entry stays in place.
    pub fn commit<P: PersistenceSink + ?Sized>(&self, op: &Operation, sink: &mut P) -> Result<(), SinkError> {
        sink.apply(op).inspect_err(|e| {
            log::warn!("Failed to persist {:?} on {}: {}", op.kind(), op.element_id(), e);
        })
    }

    /// Forget everything tied to the current screen.
    pub fn reset(&mut self) {
        self.gesture.cancel();
        self.selection.clear();
        self.history = HistoryStack::with_capacity(self.config.history_capacity);
        log::debug!("editing session reset");
    }
}
