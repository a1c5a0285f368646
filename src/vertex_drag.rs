//! Grab-nearest-point drag gesture over a caller-owned vertex list.
//!
//! Demos that expose editable geometry (polygon outlines, curve control
//! points, gradient focal points) hand their points to a [`VertexDragger`]
//! and call it from their pointer handlers. On pointer-down the nearest
//! point within the grab threshold starts a session; the offset between
//! pointer and point is recorded so the point does not snap to the cursor,
//! and subtracting it consistently on every move makes the drag land
//! exactly where the pointer says.
//!
//! With [`VertexDragger::drag_all`] enabled, a down that misses every point
//! but falls inside the shape (at least 3 points) grabs the whole set,
//! anchored on point 0; the delta implied by point 0's new position is
//! applied to every point, so relative shape is preserved exactly.
//!
//! One session per pointer, as in the control layer: while a session is
//! held, downs and moves from any other pointer id are ignored, and only
//! the owning pointer's release ends the session.

use tracing::debug;

use crate::coords::{calc_distance, Point, BUTTON_PRIMARY};

enum Session {
    Single { index: usize, offset: Point },
    All { offset: Point },
}

/// Drag state for one vertex list. Points stay owned by the caller; the
/// dragger only mutates them inside [`VertexDragger::pointer_move`].
pub struct VertexDragger {
    threshold: f64,
    drag_all: bool,
    session: Option<Session>,
    pointer: Option<i32>,
}

impl VertexDragger {
    /// `threshold` is the grab distance in logical pixels.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            drag_all: false,
            session: None,
            pointer: None,
        }
    }

    /// Also grab the whole point set when the down misses every point
    /// (needs at least 3 points).
    pub fn drag_all(mut self, yes: bool) -> Self {
        self.drag_all = yes;
        self
    }

    pub fn active(&self) -> bool {
        self.session.is_some()
    }

    /// Index of the dragged vertex, if a single-vertex session is active.
    pub fn dragged_index(&self) -> Option<usize> {
        match self.session {
            Some(Session::Single { index, .. }) => Some(index),
            _ => None,
        }
    }

    /// Offer a pointer-down. Only the primary button starts a session, and
    /// a down from a second pointer while a session is held is ignored.
    /// Returns whether a session began.
    pub fn pointer_down(
        &mut self,
        pointer_id: i32,
        p: Point,
        button: i16,
        points: &[Point],
    ) -> bool {
        if button != BUTTON_PRIMARY {
            return false;
        }
        if self.session.is_some() && self.pointer != Some(pointer_id) {
            return false;
        }
        // Nearest point within the threshold; strict less-than keeps the
        // earliest point on an exact distance tie.
        let mut best = f64::INFINITY;
        let mut hit = None;
        for (i, &pt) in points.iter().enumerate() {
            let d = calc_distance(p, pt);
            if d <= self.threshold && d < best {
                best = d;
                hit = Some(i);
            }
        }
        if let Some(index) = hit {
            debug!(index, "vertex drag begins");
            self.session = Some(Session::Single {
                index,
                offset: Point::new(p.x - points[index].x, p.y - points[index].y),
            });
            self.pointer = Some(pointer_id);
            return true;
        }
        if self.drag_all && points.len() >= 3 {
            debug!("all-points drag begins");
            self.session = Some(Session::All {
                offset: Point::new(p.x - points[0].x, p.y - points[0].y),
            });
            self.pointer = Some(pointer_id);
            return true;
        }
        false
    }

    /// Start a session on an externally resolved index (for example an
    /// engine-side vertex pick). Same contract as
    /// [`VertexDragger::pointer_down`]: primary button only, one session
    /// per pointer. An out-of-range index is a no-op.
    pub fn begin_at(
        &mut self,
        pointer_id: i32,
        index: usize,
        p: Point,
        button: i16,
        points: &[Point],
    ) -> bool {
        if button != BUTTON_PRIMARY {
            return false;
        }
        if self.session.is_some() && self.pointer != Some(pointer_id) {
            return false;
        }
        if index >= points.len() {
            return false;
        }
        self.session = Some(Session::Single {
            index,
            offset: Point::new(p.x - points[index].x, p.y - points[index].y),
        });
        self.pointer = Some(pointer_id);
        true
    }

    /// Drive the session. Returns whether `points` mutated; the caller
    /// redraws synchronously when it did. A move without a session, or from
    /// a pointer that does not own the session, is a no-op.
    pub fn pointer_move(&mut self, pointer_id: i32, p: Point, points: &mut [Point]) -> bool {
        if self.pointer != Some(pointer_id) {
            return false;
        }
        match self.session {
            None => false,
            Some(Session::Single { index, offset }) => {
                points[index] = Point::new(p.x - offset.x, p.y - offset.y);
                true
            }
            Some(Session::All { offset }) => {
                let desired = Point::new(p.x - offset.x, p.y - offset.y);
                let dx = desired.x - points[0].x;
                let dy = desired.y - points[0].y;
                for pt in points.iter_mut() {
                    pt.x += dx;
                    pt.y += dy;
                }
                true
            }
        }
    }

    /// End the session for `pointer_id` (release or cancel). A release from
    /// a non-owning pointer leaves the session alive. Never mutates points.
    pub fn pointer_up(&mut self, pointer_id: i32) {
        if self.pointer == Some(pointer_id) {
            self.session = None;
            self.pointer = None;
        }
    }

    /// Drop any session regardless of pointer (demo teardown).
    pub fn reset(&mut self) {
        self.session = None;
        self.pointer = None;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::BUTTON_SECONDARY;

    const PTR: i32 = 1;

    fn triangle() -> Vec<Point> {
        vec![
            Point::new(57.0, 60.0),
            Point::new(369.0, 170.0),
            Point::new(243.0, 310.0),
        ]
    }

    #[test]
    fn test_grab_and_drag_lands_exactly() {
        let mut points = triangle();
        let mut drag = VertexDragger::new(10.0);
        assert!(drag.pointer_down(PTR, Point::new(369.0, 170.0), BUTTON_PRIMARY, &points));
        assert_eq!(drag.dragged_index(), Some(1));
        assert!(drag.pointer_move(PTR, Point::new(400.0, 200.0), &mut points));
        assert_eq!(points[1], Point::new(400.0, 200.0));
        drag.pointer_up(PTR);
        assert!(!drag.pointer_move(PTR, Point::new(0.0, 0.0), &mut points));
    }

    #[test]
    fn test_grab_offset_is_subtracted_consistently() {
        let mut points = triangle();
        let mut drag = VertexDragger::new(10.0);
        // Grab 4px off-center: the point must not snap to the pointer
        assert!(drag.pointer_down(PTR, Point::new(373.0, 170.0), BUTTON_PRIMARY, &points));
        drag.pointer_move(PTR, Point::new(373.0, 170.0), &mut points);
        assert_eq!(points[1], Point::new(369.0, 170.0));
        // ...and a later move keeps the same offset
        drag.pointer_move(PTR, Point::new(404.0, 200.0), &mut points);
        assert_eq!(points[1], Point::new(400.0, 200.0));
    }

    #[test]
    fn test_outside_threshold_is_ignored() {
        let points = triangle();
        let mut drag = VertexDragger::new(10.0);
        assert!(!drag.pointer_down(PTR, Point::new(369.0, 190.0), BUTTON_PRIMARY, &points));
        assert!(!drag.active());
    }

    #[test]
    fn test_exact_tie_keeps_earliest_point() {
        let points = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let mut drag = VertexDragger::new(10.0);
        // Equidistant from both points
        assert!(drag.pointer_down(PTR, Point::new(5.0, 0.0), BUTTON_PRIMARY, &points));
        assert_eq!(drag.dragged_index(), Some(0));
    }

    #[test]
    fn test_secondary_button_ignored() {
        let points = triangle();
        let mut drag = VertexDragger::new(10.0);
        assert!(!drag.pointer_down(PTR, Point::new(369.0, 170.0), BUTTON_SECONDARY, &points));
    }

    #[test]
    fn test_drag_all_preserves_relative_shape() {
        let mut points = triangle();
        let before = points.clone();
        let mut drag = VertexDragger::new(10.0).drag_all(true);
        assert!(drag.pointer_down(PTR, Point::new(200.0, 180.0), BUTTON_PRIMARY, &points));
        drag.pointer_move(PTR, Point::new(217.0, 203.0), &mut points);
        for (a, b) in before.iter().zip(points.iter()) {
            assert!((b.x - a.x - 17.0).abs() < 1e-9);
            assert!((b.y - a.y - 23.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_drag_all_needs_three_points() {
        let points = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let mut drag = VertexDragger::new(5.0).drag_all(true);
        assert!(!drag.pointer_down(PTR, Point::new(50.0, 50.0), BUTTON_PRIMARY, &points));
    }

    #[test]
    fn test_begin_at_rejects_out_of_range() {
        let mut points = triangle();
        let mut drag = VertexDragger::new(10.0);
        assert!(!drag.begin_at(PTR, 5, Point::new(0.0, 0.0), BUTTON_PRIMARY, &points));
        assert!(!drag.active());
        assert!(drag.begin_at(PTR, 2, Point::new(243.0, 310.0), BUTTON_PRIMARY, &points));
        drag.pointer_move(PTR, Point::new(250.0, 300.0), &mut points);
        assert_eq!(points[2], Point::new(250.0, 300.0));
    }

    #[test]
    fn test_begin_at_requires_primary_button() {
        // Externally resolved grabs (engine-side picks) obey the same
        // button contract as local hit-testing.
        let points = triangle();
        let mut drag = VertexDragger::new(10.0);
        assert!(!drag.begin_at(PTR, 1, Point::new(369.0, 170.0), BUTTON_SECONDARY, &points));
        assert!(!drag.active());
    }

    #[test]
    fn test_second_pointer_cannot_steal_or_end_session() {
        let mut points = triangle();
        let mut drag = VertexDragger::new(10.0);
        assert!(drag.pointer_down(PTR, Point::new(369.0, 170.0), BUTTON_PRIMARY, &points));
        // A second pointer's down over another vertex is ignored
        assert!(!drag.pointer_down(PTR + 1, Point::new(57.0, 60.0), BUTTON_PRIMARY, &points));
        assert_eq!(drag.dragged_index(), Some(1));
        // ...its moves do nothing
        assert!(!drag.pointer_move(PTR + 1, Point::new(0.0, 0.0), &mut points));
        assert_eq!(points[1], Point::new(369.0, 170.0));
        // ...and its release leaves the session alive
        drag.pointer_up(PTR + 1);
        assert!(drag.active());
        assert!(drag.pointer_move(PTR, Point::new(400.0, 200.0), &mut points));
        assert_eq!(points[1], Point::new(400.0, 200.0));
        drag.pointer_up(PTR);
        assert!(!drag.active());
    }
}
