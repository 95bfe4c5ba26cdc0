//! Geometric primitives used by the plotting pipeline.
//!
//! All coordinate work is two-dimensional. Rectangles carry a signed size so
//! axis flips (display y grows downward, figure y grows upward) stay
//! representable as plain value types.

use std::ops::{Add, Mul, Sub};

/// Dimension selector for two-dimensional plot state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dim {
    /// Horizontal dimension.
    X,
    /// Vertical dimension.
    Y,
}

impl Dim {
    /// Both dimensions, in x-then-y order.
    pub const ALL: [Dim; 2] = [Dim::X, Dim::Y];

    /// Positional index of the dimension.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
        }
    }

    /// The other dimension.
    pub fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }

    /// Unit vector along the dimension.
    pub fn unit(self) -> Vec2 {
        match self {
            Self::X => Vec2::new(1.0, 0.0),
            Self::Y => Vec2::new(0.0, 1.0),
        }
    }
}

/// A point in some plot coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Access a component by dimension.
    pub fn get(self, dim: Dim) -> f64 {
        match dim {
            Dim::X => self.x,
            Dim::Y => self.y,
        }
    }

    /// Set a component by dimension.
    pub fn set(&mut self, dim: Dim, value: f64) {
        match dim {
            Dim::X => self.x = value,
            Dim::Y => self.y = value,
        }
    }

    /// Linear interpolation between two points.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        Self::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }

    /// Check whether both components are finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add<Vec2> for Point {
    type Output = Point;

    fn add(self, rhs: Vec2) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Point> for Point {
    type Output = Vec2;

    fn sub(self, rhs: Point) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A displacement or size in some plot coordinate system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Access a component by dimension.
    pub fn get(self, dim: Dim) -> f64 {
        match dim {
            Dim::X => self.x,
            Dim::Y => self.y,
        }
    }
}

impl Add<Vec2> for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

/// Numeric range with inclusive bounds.
///
/// Bounds are kept in the order given; a reversed range flips the direction
/// of any transform derived from it. NaN bounds mean "unset" and adopt the
/// first value pushed through [`Range::widen_to`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Range {
    /// Create a new range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// A range with both bounds unset.
    pub fn unset() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether either bound is unset.
    pub fn is_unset(&self) -> bool {
        self.min.is_nan() || self.max.is_nan()
    }

    /// Widen the range to include a value, reporting whether it changed.
    ///
    /// Comparisons are negated so unset (NaN) bounds adopt the first finite
    /// value instead of sticking.
    pub fn widen_to(&mut self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        let mut changed = false;
        if !(self.min <= value) {
            self.min = value;
            changed = true;
        }
        if !(value <= self.max) {
            self.max = value;
            changed = true;
        }
        changed
    }
}

/// A rectangle given as position plus signed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Origin corner.
    pub pos: Point,
    /// Signed extent from the origin corner.
    pub size: Vec2,
}

impl Rect {
    /// Create a rectangle from origin and signed size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            pos: Point::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Rectangle covering an extent, sized min-to-max per dimension.
    pub fn from_extent(extent: &Extent) -> Self {
        Self::new(
            extent.x.min,
            extent.y.min,
            extent.x.span(),
            extent.y.span(),
        )
    }

    /// Extent covered by the rectangle, preserving direction.
    pub fn as_extent(&self) -> Extent {
        Extent::new(
            Range::new(self.pos.x, self.pos.x + self.size.x),
            Range::new(self.pos.y, self.pos.y + self.size.y),
        )
    }
}

/// Per-dimension bounds of a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Horizontal bounds.
    pub x: Range,
    /// Vertical bounds.
    pub y: Range,
}

impl Extent {
    /// Create an extent from per-dimension ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// Create an extent from flat bounds.
    pub fn from_bounds(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self::new(Range::new(x_min, x_max), Range::new(y_min, y_max))
    }

    /// An extent with all bounds unset.
    pub fn unset() -> Self {
        Self::new(Range::unset(), Range::unset())
    }

    /// Access one dimension's range.
    pub fn get(&self, dim: Dim) -> Range {
        match dim {
            Dim::X => self.x,
            Dim::Y => self.y,
        }
    }

    /// Access one dimension's range mutably.
    pub fn get_mut(&mut self, dim: Dim) -> &mut Range {
        match dim {
            Dim::X => &mut self.x,
            Dim::Y => &mut self.y,
        }
    }

    /// Check whether all bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widen_to_grows_only_outward() {
        let mut range = Range::new(0.0, 1.0);
        assert!(!range.widen_to(0.5));
        assert!(!range.widen_to(0.0));
        assert!(!range.widen_to(1.0));
        assert!(range.widen_to(2.0));
        assert_eq!(range, Range::new(0.0, 2.0));
        assert!(range.widen_to(-1.0));
        assert_eq!(range, Range::new(-1.0, 2.0));
    }

    #[test]
    fn unset_range_adopts_first_value() {
        let mut range = Range::unset();
        assert!(range.is_unset());
        assert!(range.widen_to(3.0));
        assert_eq!(range, Range::new(3.0, 3.0));
        assert!(!range.is_unset());
    }

    #[test]
    fn widen_to_ignores_non_finite_values() {
        let mut range = Range::new(0.0, 1.0);
        assert!(!range.widen_to(f64::NAN));
        assert!(!range.widen_to(f64::INFINITY));
        assert_eq!(range, Range::new(0.0, 1.0));
    }

    #[test]
    fn rect_extent_roundtrip_preserves_direction() {
        let rect = Rect::new(0.0, 10.0, 5.0, -10.0);
        let extent = rect.as_extent();
        assert_eq!(extent.x, Range::new(0.0, 5.0));
        assert_eq!(extent.y, Range::new(10.0, 0.0));
        let back = Rect::from_extent(&Extent::from_bounds(0.0, 5.0, 0.0, 10.0));
        assert_eq!(back, Rect::new(0.0, 0.0, 5.0, 10.0));
    }

    #[test]
    fn point_component_access_by_dim() {
        let mut point = Point::new(1.0, 2.0);
        assert_eq!(point.get(Dim::X), 1.0);
        point.set(Dim::Y, 5.0);
        assert_eq!(point, Point::new(1.0, 5.0));
        assert_eq!(Dim::Y.unit(), Vec2::new(0.0, 1.0));
        assert_eq!(Dim::Y.other(), Dim::X);
    }

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 4.0);
        assert_eq!(Point::lerp(a, b, 0.0), a);
        assert_eq!(Point::lerp(a, b, 1.0), b);
        assert_eq!(Point::lerp(a, b, 0.5), Point::new(1.0, 2.0));
    }
}
