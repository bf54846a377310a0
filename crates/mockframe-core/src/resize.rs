//! Resize engine: handle drag to element rectangle.

use crate::geometry::Rect;
use crate::handles::ResizeHandle;
use crate::snap::GridSettings;
use kurbo::Vec2;

/// Minimum width and height an element can be resized to.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// State captured when a resize gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    /// The handle being dragged.
    pub handle: ResizeHandle,
    /// Element rectangle at gesture start.
    pub start_rect: Rect,
}

impl ResizeSession {
    /// Create a new resize session.
    pub fn new(handle: ResizeHandle, start_rect: Rect) -> Self {
        Self { handle, start_rect }
    }

    /// Compute the rectangle for the given pointer delta.
    pub fn rect_for(&self, delta: Vec2, shift_held: bool, grid: GridSettings) -> Rect {
        compute_resize_result(self.handle, self.start_rect, delta, shift_held, grid)
    }
}

/// Move the edges controlled by `handle` by the pointer delta.
///
/// The result may have negative size; clamping happens afterwards.
pub fn apply_handle_delta(handle: ResizeHandle, start: Rect, delta: Vec2) -> Rect {
    let mut rect = start;
    if handle.moves_left() {
        rect.x += delta.x;
        rect.width -= delta.x;
    }
    if handle.moves_right() {
        rect.width += delta.x;
    }
    if handle.moves_top() {
        rect.y += delta.y;
        rect.height -= delta.y;
    }
    if handle.moves_bottom() {
        rect.height += delta.y;
    }
    rect
}

/// Lock the rectangle to the aspect ratio of `start`.
///
/// The dimension that changed by the larger absolute amount drives the other
/// one; ties go to width. A start rectangle without a usable ratio leaves the
/// rectangle as is.
pub fn lock_aspect_ratio(rect: Rect, start: Rect) -> Rect {
    let ratio = start.width / start.height;
    if !ratio.is_finite() || ratio <= 0.0 {
        return rect;
    }

    let mut rect = rect;
    let width_change = (rect.width - start.width).abs();
    let height_change = (rect.height - start.height).abs();
    if width_change >= height_change {
        rect.height = (rect.width / ratio).round();
    } else {
        rect.width = (rect.height * ratio).round();
    }
    rect
}

/// Grow a ratio-locked rectangle until both sides reach `min_size`.
fn enforce_min_with_ratio(mut rect: Rect, start: Rect, min_size: f64) -> Rect {
    let ratio = start.width / start.height;
    if rect.height < min_size {
        rect.height = min_size;
        rect.width = (min_size * ratio).round().max(min_size);
    }
    if rect.width < min_size {
        rect.width = min_size;
        rect.height = (min_size / ratio).round().max(min_size);
    }
    rect
}

/// Snap a size to the grid without letting it drop below `min_size`.
fn snap_size(value: f64, grid: GridSettings, min_size: f64) -> f64 {
    let snapped = grid.apply(value);
    if snapped >= min_size || !grid.enabled || grid.size <= 0.0 {
        return snapped.max(min_size);
    }
    (min_size / grid.size).ceil() * grid.size
}

/// Convert a resize gesture into the element's new rectangle.
///
/// Steps run in a fixed order: edge algebra, minimum-size clamp, aspect-ratio
/// lock (shift), grid snap, canvas-origin clamp.
pub fn compute_resize_result(
    handle: ResizeHandle,
    start: Rect,
    delta: Vec2,
    shift_held: bool,
    grid: GridSettings,
) -> Rect {
    resize_with_min_size(handle, start, delta, shift_held, grid, MIN_ELEMENT_SIZE)
}

/// Same as [`compute_resize_result`] with a configurable minimum size.
pub fn resize_with_min_size(
    handle: ResizeHandle,
    start: Rect,
    delta: Vec2,
    shift_held: bool,
    grid: GridSettings,
    min_size: f64,
) -> Rect {
    let mut rect = apply_handle_delta(handle, start, delta);

    rect.width = rect.width.max(min_size);
    rect.height = rect.height.max(min_size);

    if shift_held {
        rect = lock_aspect_ratio(rect, start);
        rect = enforce_min_with_ratio(rect, start, min_size);
    }

    if grid.enabled {
        rect.x = grid.apply(rect.x);
        rect.y = grid.apply(rect.y);
        rect.width = snap_size(rect.width, grid, min_size);
        rect.height = snap_size(rect.height, grid, min_size);
    }

    rect.x = rect.x.max(0.0);
    rect.y = rect.y.max(0.0);

    log::trace!("resize {} {:?} -> {:?}", handle, delta, rect);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_grid() -> GridSettings {
        GridSettings::disabled()
    }

    #[test]
    fn test_se_resize() {
        let rect = compute_resize_result(
            ResizeHandle::Se,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Vec2::new(10.0, 5.0),
            false,
            no_grid(),
        );
        assert_eq!(rect, Rect::new(0.0, 0.0, 110.0, 55.0));
    }

    #[test]
    fn test_edge_algebra_per_handle() {
        let start = Rect::new(100.0, 100.0, 200.0, 100.0);
        let d = Vec2::new(10.0, 20.0);
        let cases = [
            (ResizeHandle::Nw, Rect::new(110.0, 120.0, 190.0, 80.0)),
            (ResizeHandle::N, Rect::new(100.0, 120.0, 200.0, 80.0)),
            (ResizeHandle::Ne, Rect::new(100.0, 120.0, 210.0, 80.0)),
            (ResizeHandle::E, Rect::new(100.0, 100.0, 210.0, 100.0)),
            (ResizeHandle::Se, Rect::new(100.0, 100.0, 210.0, 120.0)),
            (ResizeHandle::S, Rect::new(100.0, 100.0, 200.0, 120.0)),
            (ResizeHandle::Sw, Rect::new(110.0, 100.0, 190.0, 120.0)),
            (ResizeHandle::W, Rect::new(110.0, 100.0, 190.0, 100.0)),
        ];
        for (handle, expected) in cases {
            assert_eq!(apply_handle_delta(handle, start, d), expected, "handle {handle}");
        }
    }

    #[test]
    fn test_min_size_clamp() {
        let rect = compute_resize_result(
            ResizeHandle::Se,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Vec2::new(-500.0, -500.0),
            false,
            no_grid(),
        );
        assert_eq!(rect.width, MIN_ELEMENT_SIZE);
        assert_eq!(rect.height, MIN_ELEMENT_SIZE);
    }

    #[test]
    fn test_min_size_invariant_all_handles() {
        let start = Rect::new(50.0, 50.0, 120.0, 40.0);
        for handle in ResizeHandle::ALL {
            for dx in (-300..=300).step_by(37) {
                for dy in (-300..=300).step_by(41) {
                    for shift in [false, true] {
                        for grid in [no_grid(), GridSettings::enabled(8.0), GridSettings::enabled(50.0)] {
                            let rect = compute_resize_result(
                                handle,
                                start,
                                Vec2::new(dx as f64, dy as f64),
                                shift,
                                grid,
                            );
                            assert!(rect.width >= MIN_ELEMENT_SIZE, "{handle} {dx} {dy} {rect:?}");
                            assert!(rect.height >= MIN_ELEMENT_SIZE, "{handle} {dx} {dy} {rect:?}");
                            assert!(rect.x >= 0.0 && rect.y >= 0.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_aspect_ratio_width_drives() {
        let rect = compute_resize_result(
            ResizeHandle::Se,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Vec2::new(100.0, 10.0),
            true,
            no_grid(),
        );
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 100.0);
    }

    #[test]
    fn test_aspect_ratio_height_drives() {
        let rect = compute_resize_result(
            ResizeHandle::Se,
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Vec2::new(5.0, 50.0),
            true,
            no_grid(),
        );
        assert_eq!(rect.height, 100.0);
        assert_eq!(rect.width, 200.0);
    }

    #[test]
    fn test_aspect_ratio_edge_handle() {
        // Only height moves on the south handle, so height drives width
        let rect = compute_resize_result(
            ResizeHandle::S,
            Rect::new(0.0, 0.0, 90.0, 30.0),
            Vec2::new(0.0, 30.0),
            true,
            no_grid(),
        );
        assert_eq!(rect, Rect::new(0.0, 0.0, 180.0, 60.0));
    }

    #[test]
    fn test_aspect_ratio_zero_height_start_is_skipped() {
        let rect = compute_resize_result(
            ResizeHandle::E,
            Rect::new(0.0, 0.0, 100.0, 0.0),
            Vec2::new(20.0, 0.0),
            true,
            no_grid(),
        );
        assert_eq!(rect, Rect::new(0.0, 0.0, 120.0, MIN_ELEMENT_SIZE));
    }

    #[test]
    fn test_grid_snap() {
        let rect = compute_resize_result(
            ResizeHandle::Se,
            Rect::new(3.0, 5.0, 100.0, 50.0),
            Vec2::new(7.0, 3.0),
            false,
            GridSettings::enabled(8.0),
        );
        assert_eq!(rect, Rect::new(0.0, 8.0, 104.0, 56.0));
    }

    #[test]
    fn test_canvas_clamp() {
        let rect = compute_resize_result(
            ResizeHandle::Nw,
            Rect::new(10.0, 10.0, 100.0, 100.0),
            Vec2::new(-30.0, -15.0),
            false,
            no_grid(),
        );
        assert_eq!(rect.x, 0.0);
        assert_eq!(rect.y, 0.0);
        assert_eq!(rect.width, 130.0);
        assert_eq!(rect.height, 115.0);
    }

    #[test]
    fn test_zero_delta_is_unchanged() {
        let start = Rect::new(40.0, 40.0, 60.0, 30.0);
        for handle in ResizeHandle::ALL {
            let rect = compute_resize_result(handle, start, Vec2::ZERO, true, no_grid());
            assert_eq!(rect, start);
        }
    }

    #[test]
    fn test_session_rect_for() {
        let session = ResizeSession::new(ResizeHandle::W, Rect::new(50.0, 0.0, 100.0, 40.0));
        let rect = session.rect_for(Vec2::new(-10.0, 99.0), false, no_grid());
        assert_eq!(rect, Rect::new(40.0, 0.0, 110.0, 40.0));
    }

    #[test]
    fn test_configurable_min_size() {
        let rect = resize_with_min_size(
            ResizeHandle::Se,
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Vec2::new(-99.0, -99.0),
            false,
            no_grid(),
            5.0,
        );
        assert_eq!(rect.width, 5.0);
        assert_eq!(rect.height, 5.0);
    }
}
