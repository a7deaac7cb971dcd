//! Geometric primitives for scene description and connector routing.
//!
//! This module provides the small set of value types every other part of
//! Infragram is expressed in.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate (or vector) in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Infragram uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner of the canvas at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! All lengths are expressed in canvas units. Export backends decide how many
//! output pixels a canvas unit covers.

/// A 2D point in canvas space.
///
/// Points double as direction vectors for connector routing, so a handful of
/// vector operations live here as well.
///
/// # Examples
///
/// ```
/// # use infragram_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 7.5);
/// assert_eq!(mid.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns true if both coordinates are finite numbers
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the Euclidean length of this point treated as a vector
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance between two points
    pub fn distance(self, other: Point) -> f32 {
        other.sub_point(self).hypot()
    }

    /// Multiplies both coordinates by the given factor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use infragram_core::geometry::Point;
    /// let point = Point::new(10.0, 20.0);
    ///
    /// let doubled = point.scale(2.0);
    /// assert_eq!(doubled.x(), 20.0);
    /// assert_eq!(doubled.y(), 40.0);
    /// ```
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns the unit vector pointing in the same direction.
    ///
    /// Returns `None` for vectors too short to carry a direction.
    ///
    /// # Examples
    ///
    /// ```
    /// # use infragram_core::geometry::Point;
    /// let unit = Point::new(3.0, 4.0).normalize().unwrap();
    /// assert!((unit.x() - 0.6).abs() < 1e-6);
    /// assert!((unit.y() - 0.8).abs() < 1e-6);
    ///
    /// assert!(Point::new(0.0, 0.0).normalize().is_none());
    /// ```
    pub fn normalize(self) -> Option<Self> {
        let length = self.hypot();
        if length < f32::EPSILON || !length.is_finite() {
            return None;
        }
        Some(self.scale(1.0 / length))
    }

    /// Returns the vector rotated by 90 degrees (clockwise on screen)
    pub fn perpendicular(self) -> Self {
        Self {
            x: -self.y,
            y: self.x,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Multiplies both dimensions by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// An axis-aligned rectangle with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Returns true if `other` lies entirely inside these bounds (edges inclusive).
    ///
    /// # Examples
    ///
    /// ```
    /// # use infragram_core::geometry::{Bounds, Point, Size};
    /// let canvas = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
    /// let inside = Bounds::new_from_top_left(Point::new(8.0, 0.0), Size::new(2.0, 1.0));
    /// let outside = Bounds::new_from_top_left(Point::new(9.0, 0.0), Size::new(2.0, 1.0));
    ///
    /// assert!(canvas.contains(&inside));
    /// assert!(!canvas.contains(&outside));
    /// ```
    pub fn contains(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.0, 4.0);
        assert_eq!(point.x(), 3.0);
        assert_eq!(point.y(), 4.0);
        assert!(point.is_finite());
        assert!(!Point::new(f32::NAN, 0.0).is_finite());
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(1.0, 1.0);
        let b = Point::new(4.0, 5.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn test_point_normalize_axis_aligned() {
        let right = Point::new(10.0, 0.0).normalize().unwrap();
        assert_eq!(right, Point::new(1.0, 0.0));

        let down = Point::new(0.0, 0.5).normalize().unwrap();
        assert_eq!(down, Point::new(0.0, 1.0));
    }

    #[test]
    fn test_point_perpendicular() {
        let dir = Point::new(1.0, 0.0);
        assert_eq!(dir.perpendicular(), Point::new(-0.0, 1.0));
    }

    #[test]
    fn test_bounds_new_from_top_left() {
        let bounds = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(2.0, 1.0));
        assert_eq!(bounds.min_x(), 1.0);
        assert_eq!(bounds.min_y(), 2.0);
        assert_eq!(bounds.max_x(), 3.0);
        assert_eq!(bounds.max_y(), 3.0);
        assert_eq!(bounds.center(), Point::new(2.0, 2.5));
    }

    #[test]
    fn test_bounds_new_from_center() {
        let bounds = Bounds::new_from_center(Point::new(5.0, 5.0), Size::new(2.0, 2.0));
        assert_eq!(bounds.min_point(), Point::new(4.0, 4.0));
        assert_eq!(bounds.max_x(), 6.0);
        assert_eq!(bounds.max_y(), 6.0);
    }

    #[test]
    fn test_bounds_contains_edges_inclusive() {
        let canvas = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(canvas.contains(&canvas));

        let negative = Bounds::new_from_top_left(Point::new(-0.5, 0.0), Size::new(1.0, 1.0));
        assert!(!canvas.contains(&negative));
    }

}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Midpoint should always be between (or equal to) both points.
    fn check_midpoint_is_between_points(p1: Point, p2: Point) -> Result<(), TestCaseError> {
        let mid = p1.midpoint(p2);

        prop_assert!(mid.x() >= p1.x().min(p2.x()) && mid.x() <= p1.x().max(p2.x()));
        prop_assert!(mid.y() >= p1.y().min(p2.y()) && mid.y() <= p1.y().max(p2.y()));
        Ok(())
    }

    /// A normalized vector has unit length.
    fn check_normalize_has_unit_length(p: Point) -> Result<(), TestCaseError> {
        if let Some(unit) = p.normalize() {
            prop_assert!(approx_eq!(f32, unit.hypot(), 1.0, epsilon = 0.0001));
        } else {
            prop_assert!(p.hypot() < 0.001);
        }
        Ok(())
    }

    /// Rebuilding bounds around their own center gives back the same box.
    fn check_center_rebuild(bounds: Bounds) -> Result<(), TestCaseError> {
        let size = Size::new(bounds.width(), bounds.height());
        let rebuilt = Bounds::new_from_center(bounds.center(), size);

        prop_assert!(approx_eq!(f32, rebuilt.min_x(), bounds.min_x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, rebuilt.min_y(), bounds.min_y(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, rebuilt.max_x(), bounds.max_x(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, rebuilt.max_y(), bounds.max_y(), epsilon = 0.001));
        Ok(())
    }

    /// Bounds contain themselves and their center point's degenerate box.
    fn check_contains_self_and_center(bounds: Bounds) -> Result<(), TestCaseError> {
        let center = Bounds::new_from_center(bounds.center(), Size::default());

        prop_assert!(bounds.contains(&bounds));
        prop_assert!(bounds.contains(&center));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn midpoint_is_between_points(p1 in point_strategy(), p2 in point_strategy()) {
            check_midpoint_is_between_points(p1, p2)?;
        }

        #[test]
        fn normalize_has_unit_length(p in point_strategy()) {
            check_normalize_has_unit_length(p)?;
        }

        #[test]
        fn center_rebuild(bounds in bounds_strategy()) {
            check_center_rebuild(bounds)?;
        }

        #[test]
        fn contains_self_and_center(bounds in bounds_strategy()) {
            check_contains_self_and_center(bounds)?;
        }
    }
}
