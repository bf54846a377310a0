//! Mockframe Core Library
//!
//! Direct-manipulation geometry for the Mockframe mockup editor: dragging,
//! resizing, alignment guides, selection and undo history. Rendering and
//! persistence live in the host; this crate only computes geometry.

pub mod config;
pub mod drag;
pub mod geometry;
pub mod gesture;
pub mod guides;
pub mod handles;
pub mod history;
pub mod memory;
pub mod resize;
pub mod selection;
pub mod session;
pub mod snap;

pub use config::{ConfigError, EditorConfig};
pub use drag::{DragSession, compute_drag_result, constrain_to_axis};
pub use geometry::{CanvasSize, ElementId, IdentifiedRect, Rect};
pub use gesture::{GestureContext, GestureFrame, GestureKind, GestureMachine, GestureOutcome, Modifiers, MoveCoalescer};
pub use guides::{AlignmentResult, Guide, GuideAxis, GuideKind, find_alignment_guides};
pub use handles::{ResizeHandle, hit_test_handles};
pub use history::{HistoryStack, Operation, OperationKind};
pub use memory::MemoryScreen;
pub use resize::{ResizeSession, compute_resize_result};
pub use selection::SelectionState;
pub use session::{EditingSession, GeometrySource, PersistenceSink, SinkError};
pub use snap::{GridSettings, snap_point, snap_rect, snap_value};
