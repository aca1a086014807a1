//! Segment versus rectangle collision checks
//!
//! Two predicates are provided. The bounding-box check is cheap and
//! conservative: it tests the segment's axis-aligned bounding rectangle, so a
//! diagonal segment that merely passes near a corner is reported blocked. The
//! exact check intersects the segment with each boundary edge and also yields
//! the first point of contact.

use ordered_float::OrderedFloat;

use crate::common::{Point2D, RectObstacle};

/// Determinants below this magnitude are treated as parallel lines
pub const PARALLEL_TOLERANCE: f64 = 1e-9;

/// Which predicate a planner uses to accept a tree extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionCheck {
    BoundingBox,
    Exact,
}

impl CollisionCheck {
    pub fn is_free(&self, p1: Point2D, p2: Point2D, obstacles: &[RectObstacle]) -> bool {
        match self {
            CollisionCheck::BoundingBox => !bounding_box_blocked(p1, p2, obstacles),
            CollisionCheck::Exact => exact_intersection(p1, p2, obstacles).is_none(),
        }
    }
}

/// True if the bounding rectangle of `p1 -> p2` overlaps any obstacle
pub fn bounding_box_blocked(p1: Point2D, p2: Point2D, obstacles: &[RectObstacle]) -> bool {
    let bounds = RectObstacle::bounding(p1, p2);
    obstacles.iter().any(|obs| obs.overlaps(&bounds))
}

fn cross(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ax * by - ay * bx
}

/// Intersection of segments `p1 -> p2` and `p3 -> p4`.
///
/// Parallel segments only intersect when they are collinear and overlap, in
/// which case `p1` is returned.
pub fn segment_intersection(p1: Point2D, p2: Point2D, p3: Point2D, p4: Point2D) -> Option<Point2D> {
    let (d1x, d1y) = (p2.x - p1.x, p2.y - p1.y);
    let (d2x, d2y) = (p4.x - p3.x, p4.y - p3.y);
    let (wx, wy) = (p3.x - p1.x, p3.y - p1.y);

    let det = cross(d1x, d1y, d2x, d2y);
    if det.abs() < PARALLEL_TOLERANCE {
        let len_sq = d1x * d1x + d1y * d1y;
        if len_sq < PARALLEL_TOLERANCE || cross(wx, wy, d1x, d1y).abs() > PARALLEL_TOLERANCE * len_sq.sqrt() {
            return None;
        }
        // collinear: compare the parameter ranges along p1 -> p2
        let t3 = (wx * d1x + wy * d1y) / len_sq;
        let t4 = ((p4.x - p1.x) * d1x + (p4.y - p1.y) * d1y) / len_sq;
        let lo = t3.min(t4).max(0.0);
        let hi = t3.max(t4).min(1.0);
        return if lo <= hi { Some(p1) } else { None };
    }

    let t = cross(wx, wy, d2x, d2y) / det;
    let u = cross(wx, wy, d1x, d1y) / det;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point2D::new(p1.x + t * d1x, p1.y + t * d1y))
    } else {
        None
    }
}

/// First point where `p1 -> p2` touches `rect`, measured from `p1`
pub fn segment_rect_intersection(p1: Point2D, p2: Point2D, rect: &RectObstacle) -> Option<Point2D> {
    if rect.contains(&p1) {
        return Some(p1);
    }
    rect.edges()
        .iter()
        .filter_map(|&(a, b)| segment_intersection(p1, p2, a, b))
        .min_by_key(|hit| OrderedFloat(hit.distance_squared(&p1)))
}

/// Closest contact point between `p1 -> p2` and any obstacle, or `None` if the
/// segment is collision-free. A zero-length segment is always free.
pub fn exact_intersection(p1: Point2D, p2: Point2D, obstacles: &[RectObstacle]) -> Option<Point2D> {
    if p1 == p2 {
        return None;
    }
    obstacles
        .iter()
        .filter_map(|obs| segment_rect_intersection(p1, p2, obs))
        .min_by_key(|hit| OrderedFloat(hit.distance_squared(&p1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point2D, b: Point2D) -> bool {
        a.distance(&b) < 1e-9
    }

    #[test]
    fn test_crossing_segments() {
        let hit = segment_intersection(
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 0.0),
        );
        assert!(close(hit.unwrap(), Point2D::new(5.0, 5.0)));
    }

    #[test]
    fn test_disjoint_segments() {
        let hit = segment_intersection(
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(10.0, 0.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_parallel_segments_are_defined() {
        // parallel, offset
        let hit = segment_intersection(
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(0.0, 1.0),
            Point2D::new(10.0, 1.0),
        );
        assert!(hit.is_none());

        // collinear and overlapping: start point is reported
        let p1 = Point2D::new(2.0, 0.0);
        let hit = segment_intersection(p1, Point2D::new(8.0, 0.0), Point2D::new(5.0, 0.0), Point2D::new(20.0, 0.0));
        assert_eq!(hit, Some(p1));

        // collinear but apart
        let hit = segment_intersection(p1, Point2D::new(4.0, 0.0), Point2D::new(5.0, 0.0), Point2D::new(20.0, 0.0));
        assert!(hit.is_none());
    }

    #[test]
    fn test_exact_returns_nearest_hit() {
        let obstacles = vec![
            RectObstacle::new(60.0, -10.0, 10.0, 20.0),
            RectObstacle::new(20.0, -10.0, 10.0, 20.0),
        ];
        let hit = exact_intersection(Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0), &obstacles);
        assert!(close(hit.unwrap(), Point2D::new(20.0, 0.0)));

        let hit = exact_intersection(Point2D::new(100.0, 0.0), Point2D::new(0.0, 0.0), &obstacles);
        assert!(close(hit.unwrap(), Point2D::new(70.0, 0.0)));
    }

    #[test]
    fn test_exact_misses() {
        let obstacles = vec![RectObstacle::new(20.0, 20.0, 10.0, 10.0)];
        assert!(exact_intersection(Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0), &obstacles).is_none());
        assert!(exact_intersection(Point2D::new(0.0, 0.0), Point2D::new(0.0, 0.0), &obstacles).is_none());
        assert!(exact_intersection(Point2D::new(0.0, 0.0), Point2D::new(50.0, 0.0), &[]).is_none());
    }

    #[test]
    fn test_segment_starting_inside_is_blocked_at_start() {
        let rect = RectObstacle::new(0.0, 0.0, 10.0, 10.0);
        let p1 = Point2D::new(5.0, 5.0);
        assert_eq!(exact_intersection(p1, Point2D::new(6.0, 6.0), &[rect]), Some(p1));
    }

    #[test]
    fn test_bounding_box_approximation_gap() {
        // the diagonal passes well above the rectangle, but its bounding box covers it
        let obstacles = vec![RectObstacle::new(70.0, 10.0, 20.0, 20.0)];
        let p1 = Point2D::new(0.0, 0.0);
        let p2 = Point2D::new(100.0, 100.0);

        assert!(bounding_box_blocked(p1, p2, &obstacles));
        assert!(exact_intersection(p1, p2, &obstacles).is_none());
        assert!(!CollisionCheck::BoundingBox.is_free(p1, p2, &obstacles));
        assert!(CollisionCheck::Exact.is_free(p1, p2, &obstacles));
    }

    #[test]
    fn test_bounding_box_blocks_axis_aligned_crossing() {
        let obstacles = vec![RectObstacle::new(40.0, -5.0, 10.0, 10.0)];
        assert!(bounding_box_blocked(Point2D::new(0.0, 0.0), Point2D::new(100.0, 0.0), &obstacles));
        assert!(!bounding_box_blocked(Point2D::new(0.0, 20.0), Point2D::new(100.0, 20.0), &obstacles));
    }

    #[test]
    fn test_predicates_do_not_mutate_obstacles() {
        let obstacles = vec![RectObstacle::new(1.0, 2.0, 3.0, 4.0)];
        let before = obstacles.clone();
        let _ = bounding_box_blocked(Point2D::new(0.0, 0.0), Point2D::new(9.0, 9.0), &obstacles);
        let _ = exact_intersection(Point2D::new(0.0, 0.0), Point2D::new(9.0, 9.0), &obstacles);
        assert_eq!(obstacles, before);
    }
}
