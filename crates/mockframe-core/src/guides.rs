//! Alignment guides between a dragged element, its siblings and the canvas.
//!
//! Guides are derived data: they are recomputed on every gesture frame from
//! current geometry and never stored.

use crate::geometry::{CanvasSize, IdentifiedRect, Rect};
use serde::{Deserialize, Serialize};

/// Distance (in screen pixels) within which an alignment is proposed.
///
/// Gesture code divides it by the view scale before calling
/// [`find_alignment_guides`], which works in mockup units.
pub const DEFAULT_GUIDE_THRESHOLD: f64 = 5.0;

/// Axis a guide constrains. An `X` guide is a vertical line at `x = position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    X,
    Y,
}

/// What produced a guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuideKind {
    /// Edge of a sibling element.
    Edge,
    /// Center of a sibling element.
    Center,
    /// Edge of the canvas.
    ScreenEdge,
    /// Center of the canvas.
    ScreenCenter,
}

impl GuideKind {
    /// Rank used when two guides land on the same line; higher wins.
    pub fn priority(self) -> u8 {
        match self {
            GuideKind::Center => 3,
            GuideKind::Edge => 2,
            GuideKind::ScreenCenter => 1,
            GuideKind::ScreenEdge => 0,
        }
    }
}

/// A proposed alignment line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub axis: GuideAxis,
    pub position: f64,
    #[serde(rename = "type")]
    pub kind: GuideKind,
}

/// Output of [`find_alignment_guides`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentResult {
    /// Deduplicated guides to render.
    pub guides: Vec<Guide>,
    /// Proposed left edge for the dragged rect, if an X alignment was found.
    pub snapped_x: Option<f64>,
    /// Proposed top edge for the dragged rect, if a Y alignment was found.
    pub snapped_y: Option<f64>,
}

impl AlignmentResult {
    /// Check if either axis snapped.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x.is_some() || self.snapped_y.is_some()
    }

    /// Apply the proposed snaps to a rectangle, keeping its size.
    pub fn apply_to(&self, rect: Rect) -> Rect {
        Rect {
            x: self.snapped_x.unwrap_or(rect.x),
            y: self.snapped_y.unwrap_or(rect.y),
            ..rect
        }
    }
}

/// Which part of the dragged rect matched.
#[derive(Debug, Clone, Copy)]
enum Anchor {
    Start,
    End,
    Center,
}

/// The three key points of a rect along one axis, plus its extent.
#[derive(Debug, Clone, Copy)]
struct AxisKeys {
    start: f64,
    end: f64,
    center: f64,
    extent: f64,
}

impl AxisKeys {
    fn of(rect: &Rect, axis: GuideAxis) -> Self {
        match axis {
            GuideAxis::X => Self {
                start: rect.left(),
                end: rect.right(),
                center: rect.center_x(),
                extent: rect.width,
            },
            GuideAxis::Y => Self {
                start: rect.top(),
                end: rect.bottom(),
                center: rect.center_y(),
                extent: rect.height,
            },
        }
    }

    fn value(&self, anchor: Anchor) -> f64 {
        match anchor {
            Anchor::Start => self.start,
            Anchor::End => self.end,
            Anchor::Center => self.center,
        }
    }

    /// Origin coordinate that puts `anchor` exactly on `position`.
    fn origin_for(&self, anchor: Anchor, position: f64) -> f64 {
        match anchor {
            Anchor::Start => position,
            Anchor::End => position - self.extent,
            Anchor::Center => position - self.extent / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    origin: f64,
}

/// Per-axis accumulator for guides and the closest snap.
struct AxisMatcher {
    axis: GuideAxis,
    dragged: AxisKeys,
    threshold: f64,
    guides: Vec<Guide>,
    best: Option<Candidate>,
}

impl AxisMatcher {
    fn new(axis: GuideAxis, dragged: &Rect, threshold: f64) -> Self {
        Self {
            axis,
            dragged: AxisKeys::of(dragged, axis),
            threshold,
            guides: Vec::new(),
            best: None,
        }
    }

    fn compare(&mut self, anchor: Anchor, position: f64, kind: GuideKind) {
        let distance = (self.dragged.value(anchor) - position).abs();
        if distance.is_nan() || distance > self.threshold {
            return;
        }

        self.guides.push(Guide {
            axis: self.axis,
            position,
            kind,
        });

        // Closer wins; on a tie the first match stays
        if self.best.is_none_or(|best| distance < best.distance) {
            self.best = Some(Candidate {
                distance,
                origin: self.dragged.origin_for(anchor, position),
            });
        }
    }

    fn compare_sibling(&mut self, sibling: &Rect) {
        let other = AxisKeys::of(sibling, self.axis);
        self.compare(Anchor::Start, other.start, GuideKind::Edge);
        self.compare(Anchor::Start, other.end, GuideKind::Edge);
        self.compare(Anchor::End, other.end, GuideKind::Edge);
        self.compare(Anchor::End, other.start, GuideKind::Edge);
        self.compare(Anchor::Center, other.center, GuideKind::Center);
    }

    fn compare_canvas(&mut self, extent: f64) {
        if extent.is_nan() || extent <= 0.0 {
            return;
        }
        self.compare(Anchor::Start, 0.0, GuideKind::ScreenEdge);
        self.compare(Anchor::End, extent, GuideKind::ScreenEdge);
        self.compare(Anchor::Center, extent / 2.0, GuideKind::ScreenCenter);
    }
}

/// Keep one guide per `(axis, position)`, preferring the higher-priority kind.
///
/// Order of first appearance is preserved.
pub fn dedup_guides(guides: impl IntoIterator<Item = Guide>) -> Vec<Guide> {
    let mut out: Vec<Guide> = Vec::new();
    for guide in guides {
        match out
            .iter_mut()
            .find(|g| g.axis == guide.axis && g.position == guide.position)
        {
            Some(existing) => {
                if guide.kind.priority() > existing.kind.priority() {
                    existing.kind = guide.kind;
                }
            }
            None => out.push(guide),
        }
    }
    out
}

/// Find near-alignments between `dragged` and its siblings or the canvas.
///
/// Every pairing within `threshold` produces a guide; per axis the closest
/// pairing decides the proposed origin. A canvas with non-positive extent on
/// an axis contributes no guides on that axis.
pub fn find_alignment_guides(
    dragged: &Rect,
    siblings: &[IdentifiedRect],
    canvas: CanvasSize,
    threshold: f64,
) -> AlignmentResult {
    let mut x = AxisMatcher::new(GuideAxis::X, dragged, threshold);
    let mut y = AxisMatcher::new(GuideAxis::Y, dragged, threshold);

    for sibling in siblings {
        x.compare_sibling(&sibling.rect);
        y.compare_sibling(&sibling.rect);
    }
    x.compare_canvas(canvas.width);
    y.compare_canvas(canvas.height);

    let result = AlignmentResult {
        snapped_x: x.best.map(|c| c.origin),
        snapped_y: y.best.map(|c| c.origin),
        guides: dedup_guides(x.guides.into_iter().chain(y.guides)),
    };
    if result.is_snapped() {
        log::trace!(
            "guides: {} found, snap x={:?} y={:?}",
            result.guides.len(),
            result.snapped_x,
            result.snapped_y
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sibling(id: &str, x: f64, y: f64, w: f64, h: f64) -> IdentifiedRect {
        IdentifiedRect::new(id, Rect::new(x, y, w, h))
    }

    fn no_canvas() -> CanvasSize {
        CanvasSize::ZERO
    }

    #[test]
    fn test_empty_input() {
        let result = find_alignment_guides(&Rect::default(), &[], no_canvas(), DEFAULT_GUIDE_THRESHOLD);
        assert!(result.guides.is_empty());
        assert_eq!(result.snapped_x, None);
        assert_eq!(result.snapped_y, None);
    }

    #[test]
    fn test_left_edge_alignment() {
        let dragged = Rect::new(103.0, 500.0, 50.0, 50.0);
        let siblings = [sibling("a", 100.0, 0.0, 80.0, 40.0)];
        let result = find_alignment_guides(&dragged, &siblings, no_canvas(), 5.0);
        assert_eq!(result.snapped_x, Some(100.0));
        assert_eq!(result.snapped_y, None);
        assert!(result.guides.contains(&Guide {
            axis: GuideAxis::X,
            position: 100.0,
            kind: GuideKind::Edge,
        }));
    }

    #[test]
    fn test_right_edge_match_inverts_by_width() {
        // Dragged right edge (x=198) near sibling right edge (x=200)
        let dragged = Rect::new(148.0, 500.0, 50.0, 50.0);
        let siblings = [sibling("a", 120.0, 0.0, 80.0, 40.0)];
        let result = find_alignment_guides(&dragged, &siblings, no_canvas(), 5.0);
        assert_eq!(result.snapped_x, Some(150.0));
    }

    #[test]
    fn test_center_match_inverts_by_half_extent() {
        // Sibling center y = 100, dragged center y = 97
        let dragged = Rect::new(500.0, 77.0, 10.0, 40.0);
        let siblings = [sibling("a", 0.0, 50.0, 30.0, 100.0)];
        let result = find_alignment_guides(&dragged, &siblings, no_canvas(), 5.0);
        assert_eq!(result.snapped_y, Some(80.0));
        assert!(result.guides.iter().any(|g| g.axis == GuideAxis::Y
            && g.position == 100.0
            && g.kind == GuideKind::Center));
    }

    #[test]
    fn test_closest_candidate_wins() {
        let dragged = Rect::new(104.0, 500.0, 50.0, 50.0);
        let siblings = [
            sibling("far", 100.0, 0.0, 10.0, 10.0),
            sibling("near", 105.0, 0.0, 10.0, 10.0),
        ];
        let result = find_alignment_guides(&dragged, &siblings, no_canvas(), 5.0);
        assert_eq!(result.snapped_x, Some(105.0));
    }

    #[test]
    fn test_tie_keeps_first_found() {
        let dragged = Rect::new(102.0, 500.0, 50.0, 50.0);
        let siblings = [
            sibling("first", 100.0, 0.0, 10.0, 10.0),
            sibling("second", 104.0, 0.0, 10.0, 10.0),
        ];
        let result = find_alignment_guides(&dragged, &siblings, no_canvas(), 5.0);
        assert_eq!(result.snapped_x, Some(100.0));
    }

    #[test]
    fn test_shared_edge_is_deduplicated() {
        let dragged = Rect::new(52.0, 500.0, 30.0, 30.0);
        let siblings = [
            sibling("a", 50.0, 0.0, 100.0, 20.0),
            sibling("b", 50.0, 200.0, 60.0, 20.0),
        ];
        let result = find_alignment_guides(&dragged, &siblings, no_canvas(), 5.0);
        let at_50: Vec<_> = result
            .guides
            .iter()
            .filter(|g| g.axis == GuideAxis::X && g.position == 50.0)
            .collect();
        assert_eq!(at_50.len(), 1);
    }

    #[test]
    fn test_dedup_keeps_highest_priority() {
        let guides = [
            Guide { axis: GuideAxis::X, position: 10.0, kind: GuideKind::ScreenEdge },
            Guide { axis: GuideAxis::X, position: 10.0, kind: GuideKind::Edge },
            Guide { axis: GuideAxis::X, position: 10.0, kind: GuideKind::ScreenCenter },
            Guide { axis: GuideAxis::Y, position: 10.0, kind: GuideKind::ScreenCenter },
            Guide { axis: GuideAxis::Y, position: 10.0, kind: GuideKind::Center },
        ];
        let out = dedup_guides(guides);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].kind, GuideKind::Edge);
        assert_eq!(out[1].kind, GuideKind::Center);
    }

    #[test]
    fn test_canvas_edges_and_center() {
        let canvas = CanvasSize::new(400.0, 300.0);

        let near_left = Rect::new(3.0, 100.0, 50.0, 50.0);
        let result = find_alignment_guides(&near_left, &[], canvas, 5.0);
        assert_eq!(result.snapped_x, Some(0.0));
        assert_eq!(result.guides[0].kind, GuideKind::ScreenEdge);

        let near_right = Rect::new(348.0, 100.0, 50.0, 50.0);
        let result = find_alignment_guides(&near_right, &[], canvas, 5.0);
        assert_eq!(result.snapped_x, Some(350.0));

        // Center y: 150; dragged center y = 128 + 25 = 153
        let near_middle = Rect::new(100.0, 128.0, 50.0, 50.0);
        let result = find_alignment_guides(&near_middle, &[], canvas, 5.0);
        assert_eq!(result.snapped_y, Some(125.0));
        assert!(result
            .guides
            .iter()
            .any(|g| g.axis == GuideAxis::Y && g.kind == GuideKind::ScreenCenter));
    }

    #[test]
    fn test_sibling_center_beats_canvas_center_on_same_line() {
        // Sibling center x and canvas center x are both 200
        let canvas = CanvasSize::new(400.0, 300.0);
        let dragged = Rect::new(173.0, 10.0, 50.0, 20.0);
        let siblings = [sibling("a", 180.0, 200.0, 40.0, 20.0)];
        let result = find_alignment_guides(&dragged, &siblings, canvas, 5.0);
        let at_200: Vec<_> = result
            .guides
            .iter()
            .filter(|g| g.axis == GuideAxis::X && g.position == 200.0)
            .collect();
        assert_eq!(at_200.len(), 1);
        assert_eq!(at_200[0].kind, GuideKind::Center);
        assert_eq!(result.snapped_x, Some(175.0));
    }

    #[test]
    fn test_outside_threshold_is_ignored() {
        let dragged = Rect::new(110.0, 500.0, 50.0, 50.0);
        let siblings = [sibling("a", 100.0, 0.0, 2.0, 2.0)];
        let result = find_alignment_guides(&dragged, &siblings, no_canvas(), 5.0);
        assert!(result.guides.is_empty());
        assert!(!result.is_snapped());
    }

    #[test]
    fn test_apply_to_keeps_size() {
        let result = AlignmentResult {
            guides: Vec::new(),
            snapped_x: Some(10.0),
            snapped_y: None,
        };
        let rect = result.apply_to(Rect::new(12.0, 30.0, 5.0, 6.0));
        assert_eq!(rect, Rect::new(10.0, 30.0, 5.0, 6.0));
    }

    #[test]
    fn test_guide_json_shape() {
        let guide = Guide { axis: GuideAxis::X, position: 4.0, kind: GuideKind::ScreenCenter };
        let json = serde_json::to_value(guide).unwrap();
        assert_eq!(json["axis"], "x");
        assert_eq!(json["type"], "screen-center");
    }
}
