//! Pointer gesture state machine.
//!
//! The host adapter feeds pointer-down/move/up events; this module decides
//! when a press turns into a drag or resize and runs the engines for each
//! frame. Pointer positions arrive in screen pixels together with the view
//! scale, and are converted to mockup units here.

use crate::config::EditorConfig;
use crate::drag::{DragSession, constrain_to_axis};
use crate::geometry::{CanvasSize, ElementId, IdentifiedRect, Rect};
use crate::guides::{AlignmentResult, Guide, find_alignment_guides};
use crate::handles::ResizeHandle;
use crate::history::Operation;
use crate::resize::{ResizeSession, resize_with_min_size};
use crate::session::GeometrySource;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Only shift held.
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// What a pointer-down started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GestureKind {
    /// Press on an element body.
    Move,
    /// Press on one of the resize handles.
    Resize(ResizeHandle),
}

/// Sibling geometry and canvas bounds captured for one gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestureContext {
    pub siblings: Vec<IdentifiedRect>,
    pub canvas: CanvasSize,
}

impl GestureContext {
    pub fn new(siblings: Vec<IdentifiedRect>, canvas: CanvasSize) -> Self {
        Self { siblings, canvas }
    }

    /// Snapshot the siblings of `element_id` from a geometry source.
    pub fn from_source<S: GeometrySource + ?Sized>(source: &S, element_id: &ElementId) -> Self {
        Self {
            siblings: source.siblings_of(element_id),
            canvas: source.canvas_size(),
        }
    }

    fn siblings_except(&self, element_id: &ElementId) -> Vec<IdentifiedRect> {
        self.siblings
            .iter()
            .filter(|s| s.id != *element_id)
            .cloned()
            .collect()
    }
}

/// A press that has not travelled far enough to be a drag or resize.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingGesture {
    pub element_id: ElementId,
    pub start_rect: Rect,
    pub kind: GestureKind,
    /// Pointer-down position in screen pixels.
    pub pointer_origin: Point,
}

/// A drag or resize in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGesture<S> {
    pub element_id: ElementId,
    pub start_rect: Rect,
    /// Pointer-down position in screen pixels.
    pub pointer_origin: Point,
    pub session: S,
    /// Geometry of the latest frame.
    pub current: Rect,
}

/// State of the gesture machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Pending(PendingGesture),
    Dragging(ActiveGesture<DragSession>),
    Resizing(ActiveGesture<ResizeSession>),
}

/// Geometry computed for one gesture frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureFrame {
    pub element_id: ElementId,
    pub rect: Rect,
    pub guides: Vec<Guide>,
}

/// How a gesture ended on pointer-up.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// No gesture was in progress.
    Idle,
    /// Released before the drag threshold: a click, no geometry change.
    Click(ElementId),
    /// Active gesture that ended where it started.
    Unchanged(ElementId),
    /// Finalized geometry change to record in history.
    Committed(Operation),
}

/// Treat a missing or broken scale as 1:1.
pub fn effective_scale(scale: f64) -> f64 {
    if scale.is_finite() && scale > 0.0 { scale } else { 1.0 }
}

/// Convert a screen-space displacement to mockup units.
pub fn screen_to_canvas_delta(delta: Vec2, scale: f64) -> Vec2 {
    delta / effective_scale(scale)
}

/// Drives one gesture at a time through idle, pending and active states.
#[derive(Debug, Clone, Default)]
pub struct GestureMachine {
    state: GestureState,
    config: EditorConfig,
}

impl GestureMachine {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            state: GestureState::Idle,
            config,
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, GestureState::Idle)
    }

    /// Whether a drag or resize is active (past the threshold).
    pub fn is_active(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_) | GestureState::Resizing(_))
    }

    /// Element the current gesture targets.
    pub fn element_id(&self) -> Option<&ElementId> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Pending(p) => Some(&p.element_id),
            GestureState::Dragging(a) => Some(&a.element_id),
            GestureState::Resizing(a) => Some(&a.element_id),
        }
    }

    /// Geometry of the latest active frame.
    pub fn current_rect(&self) -> Option<Rect> {
        match &self.state {
            GestureState::Dragging(a) => Some(a.current),
            GestureState::Resizing(a) => Some(a.current),
            _ => None,
        }
    }

    /// Start a gesture. Ignored unless idle.
    pub fn pointer_down(&mut self, element_id: ElementId, rect: Rect, kind: GestureKind, pointer: Point) -> bool {
        if !self.is_idle() {
            log::debug!("pointer down ignored, gesture already in progress");
            return false;
        }
        log::debug!("gesture pending: {:?} on {}", kind, element_id);
        self.state = GestureState::Pending(PendingGesture {
            element_id,
            start_rect: rect,
            kind,
            pointer_origin: pointer,
        });
        true
    }

    /// Feed a pointer move. Returns the frame geometry while active.
    pub fn pointer_move(
        &mut self,
        pointer: Point,
        modifiers: Modifiers,
        context: &GestureContext,
        scale: f64,
    ) -> Option<GestureFrame> {
        let scale = effective_scale(scale);

        let promote = match &self.state {
            GestureState::Pending(pending) => {
                let travelled = (pointer - pending.pointer_origin).hypot();
                if travelled <= self.config.drag_threshold {
                    return None;
                }
                Some(pending.clone())
            }
            _ => None,
        };
        if let Some(pending) = promote {
            self.state = activate(pending, scale);
        }

        match &mut self.state {
            GestureState::Dragging(active) => Some(drag_frame(&self.config, active, pointer, modifiers, context, scale)),
            GestureState::Resizing(active) => {
                Some(resize_frame(&self.config, active, pointer, modifiers, context, scale))
            }
            _ => None,
        }
    }

    /// Finish the gesture and return to idle.
    pub fn pointer_up(&mut self) -> GestureOutcome {
        let outcome = match std::mem::take(&mut self.state) {
            GestureState::Idle => GestureOutcome::Idle,
            GestureState::Pending(pending) => GestureOutcome::Click(pending.element_id),
            GestureState::Dragging(active) => {
                if active.current.origin() == active.start_rect.origin() {
                    GestureOutcome::Unchanged(active.element_id)
                } else {
                    GestureOutcome::Committed(Operation::moved(
                        active.element_id,
                        active.start_rect.origin(),
                        active.current.origin(),
                    ))
                }
            }
            GestureState::Resizing(active) => {
                if active.current == active.start_rect {
                    GestureOutcome::Unchanged(active.element_id)
                } else {
                    GestureOutcome::Committed(Operation::resized(active.element_id, active.start_rect, active.current))
                }
            }
        };
        log::debug!("gesture finished: {:?}", outcome);
        outcome
    }

    /// Abort the gesture. Returns the geometry to restore, if any.
    pub fn cancel(&mut self) -> Option<Rect> {
        let restore = match std::mem::take(&mut self.state) {
            GestureState::Idle => None,
            GestureState::Pending(pending) => Some(pending.start_rect),
            GestureState::Dragging(active) => Some(active.start_rect),
            GestureState::Resizing(active) => Some(active.start_rect),
        };
        if restore.is_some() {
            log::debug!("gesture cancelled");
        }
        restore
    }
}

/// One-way promotion from pending to dragging/resizing.
fn activate(pending: PendingGesture, scale: f64) -> GestureState {
    log::debug!("gesture active: {:?} on {}", pending.kind, pending.element_id);
    let PendingGesture {
        element_id,
        start_rect,
        kind,
        pointer_origin,
    } = pending;
    match kind {
        GestureKind::Move => {
            let start_pointer = Point::ZERO + screen_to_canvas_delta(pointer_origin.to_vec2(), scale);
            GestureState::Dragging(ActiveGesture {
                element_id,
                start_rect,
                pointer_origin,
                session: DragSession::new(start_pointer, start_rect.origin()),
                current: start_rect,
            })
        }
        GestureKind::Resize(handle) => GestureState::Resizing(ActiveGesture {
            element_id,
            start_rect,
            pointer_origin,
            session: ResizeSession::new(handle, start_rect),
            current: start_rect,
        }),
    }
}

fn drag_frame(
    config: &EditorConfig,
    active: &mut ActiveGesture<DragSession>,
    pointer: Point,
    modifiers: Modifiers,
    context: &GestureContext,
    scale: f64,
) -> GestureFrame {
    let delta = screen_to_canvas_delta(pointer - active.pointer_origin, scale);
    let current_pointer = active.session.start_pointer + delta;
    let position = active.session.position_at(current_pointer, modifiers.shift, config.grid());
    let mut rect = active.start_rect.with_origin(position);

    let mut guides = Vec::new();
    if config.guides_enabled {
        let siblings = context.siblings_except(&active.element_id);
        let alignment = find_alignment_guides(&rect, &siblings, context.canvas, config.guide_threshold / scale);

        // The axis pinned by shift keeps its start value
        let (x_free, y_free) = match modifiers.shift.then(|| constrain_to_axis(delta)) {
            None => (true, true),
            Some(locked) if locked.y == 0.0 => (true, false),
            Some(_) => (false, true),
        };
        let alignment = AlignmentResult {
            snapped_x: alignment.snapped_x.filter(|_| x_free),
            snapped_y: alignment.snapped_y.filter(|_| y_free),
            ..alignment
        };
        rect = alignment.apply_to(rect);
        rect.x = rect.x.max(0.0);
        rect.y = rect.y.max(0.0);
        guides = alignment.guides;
    }

    active.current = rect;
    GestureFrame {
        element_id: active.element_id.clone(),
        rect,
        guides,
    }
}

fn resize_frame(
    config: &EditorConfig,
    active: &mut ActiveGesture<ResizeSession>,
    pointer: Point,
    modifiers: Modifiers,
    context: &GestureContext,
    scale: f64,
) -> GestureFrame {
    let delta = screen_to_canvas_delta(pointer - active.pointer_origin, scale);
    let session = active.session;
    let rect = resize_with_min_size(
        session.handle,
        session.start_rect,
        delta,
        modifiers.shift,
        config.grid(),
        config.min_size,
    );

    let guides = if config.guides_enabled {
        let siblings = context.siblings_except(&active.element_id);
        find_alignment_guides(&rect, &siblings, context.canvas, config.guide_threshold / scale).guides
    } else {
        Vec::new()
    };

    active.current = rect;
    GestureFrame {
        element_id: active.element_id.clone(),
        rect,
        guides,
    }
}

/// Coalesces bursts of pointer moves to one recomputation per frame.
///
/// Leading edge: the first move schedules a frame, later moves only replace
/// the pending position until the frame runs.
#[derive(Debug, Clone, Default)]
pub struct MoveCoalescer {
    latest: Option<Point>,
    in_flight: bool,
}

impl MoveCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer position. Returns `true` if a frame should be scheduled.
    pub fn offer(&mut self, pointer: Point) -> bool {
        self.latest = Some(pointer);
        if self.in_flight {
            false
        } else {
            self.in_flight = true;
            true
        }
    }

    /// Latest position for the running frame.
    pub fn take(&mut self) -> Option<Point> {
        self.latest.take()
    }

    /// Mark the frame as done. Returns `true` if a newer position arrived
    /// meanwhile and another frame should be scheduled.
    pub fn frame_done(&mut self) -> bool {
        self.in_flight = self.latest.is_some();
        self.in_flight
    }

    /// Drop any pending position (gesture ended or was cancelled).
    pub fn reset(&mut self) {
        self.latest = None;
        self.in_flight = false;
    }
}
