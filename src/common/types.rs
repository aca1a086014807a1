//! Common types used throughout rrt_planning

use itertools::Itertools;
use nalgebra::Vector2;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Squared Euclidean distance, for comparisons that never need the root
    pub fn distance_squared(&self, other: &Point2D) -> f64 {
        (self.x - other.x).powi(2) + (self.y - other.y).powi(2)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(tuple: (f64, f64)) -> Self {
        Self { x: tuple.0, y: tuple.1 }
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// Path represented as a sequence of 2D points
#[derive(Debug, Clone, PartialEq)]
pub struct Path2D {
    pub points: Vec<Point2D>,
}

impl Path2D {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn from_xy(x: &[f64], y: &[f64]) -> Self {
        assert_eq!(x.len(), y.len());
        let points = x.iter().zip(y.iter())
            .map(|(&x, &y)| Point2D::new(x, y))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2D> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2D> {
        self.points.last()
    }

    pub fn x_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn y_coords(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    /// Consecutive waypoint pairs
    pub fn segments(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        self.points.iter().copied().tuple_windows()
    }

    pub fn total_length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance(&b)).sum()
    }
}

impl Default for Path2D {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned rectangular obstacle.
///
/// `x`, `y` is the minimum corner; `width` and `height` extend along +x and +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectObstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl RectObstacle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Square of side `size` centred on `center`
    pub fn square_at(center: Point2D, size: f64) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    /// Smallest rectangle enclosing both points, in any order
    pub fn bounding(p1: Point2D, p2: Point2D) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        Self::new(x, y, (p1.x - p2.x).abs(), (p1.y - p2.y).abs())
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closed-interval overlap test; touching boundaries count as overlap
    pub fn overlaps(&self, other: &RectObstacle) -> bool {
        self.min_x().max(other.min_x()) <= self.max_x().min(other.max_x())
            && self.min_y().max(other.min_y()) <= self.max_y().min(other.max_y())
    }

    /// Strict interior containment
    pub fn contains(&self, p: &Point2D) -> bool {
        p.x > self.min_x() && p.x < self.max_x() && p.y > self.min_y() && p.y < self.max_y()
    }

    /// The four boundary edges: top, right, bottom, left
    pub fn edges(&self) -> [(Point2D, Point2D); 4] {
        let a = Point2D::new(self.min_x(), self.min_y());
        let b = Point2D::new(self.max_x(), self.min_y());
        let c = Point2D::new(self.max_x(), self.max_y());
        let d = Point2D::new(self.min_x(), self.max_y());
        [(a, b), (b, c), (c, d), (d, a)]
    }

    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// Area bounds for the sampling workspace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaBounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl AreaBounds {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        AreaBounds { xmin, xmax, ymin, ymax }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn contains(&self, p: &Point2D) -> bool {
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }

    /// Finite and with a strictly positive, finite extent on both axes
    pub fn is_valid(&self) -> bool {
        [self.xmin, self.xmax, self.ymin, self.ymax].iter().all(|v| v.is_finite())
            && self.xmin < self.xmax
            && self.ymin < self.ymax
            && self.width().is_finite()
            && self.height().is_finite()
    }
}

impl Default for AreaBounds {
    /// The 800 x 600 demo window
    fn default() -> Self {
        Self::new(0.0, 800.0, 0.0, 600.0)
    }
}
