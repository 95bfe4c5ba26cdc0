//! Affine transforms between nested plot coordinate systems.

use crate::geom::{Extent, Point, Rect, Vec2};

/// 2D affine transform stored as six scalars `[m00, m10, m01, m11, tx, ty]`
/// (column-major linear part followed by the translation):
/// `x' = m00·x + m01·y + tx` and `y' = m10·x + m11·y + ty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform([f64; 6]);

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// Create a transform from raw entries.
    pub fn new(entries: [f64; 6]) -> Self {
        Self(entries)
    }

    /// Axis-aligned scale followed by a translation.
    pub fn from_scale_offset(sx: f64, sy: f64, tx: f64, ty: f64) -> Self {
        Self([sx, 0.0, 0.0, sy, tx, ty])
    }

    /// Counterclockwise rotation about the origin, angle in radians.
    pub fn from_rotation(theta: f64) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self([cos, sin, -sin, cos, 0.0, 0.0])
    }

    /// Map the unit square onto a rectangle.
    pub fn unit_to_rect(rect: &Rect) -> Self {
        Self::from_scale_offset(rect.size.x, rect.size.y, rect.pos.x, rect.pos.y)
    }

    /// Map a rectangle onto the unit square.
    ///
    /// A zero-sized rectangle yields non-finite entries; guard with
    /// [`Transform::is_rank_deficient`] before trusting the result.
    pub fn rect_to_unit(rect: &Rect) -> Self {
        Self::from_scale_offset(
            1.0 / rect.size.x,
            1.0 / rect.size.y,
            -rect.pos.x / rect.size.x,
            -rect.pos.y / rect.size.y,
        )
    }

    /// Map the unit square onto an extent.
    pub fn unit_to_extent(extent: &Extent) -> Self {
        Self::from_scale_offset(
            extent.x.span(),
            extent.y.span(),
            extent.x.min,
            extent.y.min,
        )
    }

    /// Map an extent onto the unit square.
    pub fn extent_to_unit(extent: &Extent) -> Self {
        Self::rect_to_unit(&Rect::from_extent(extent))
    }

    /// Compose two transforms: `t` applied after `u`.
    pub fn compose(t: Self, u: Self) -> Self {
        let t = t.0;
        let u = u.0;
        Self([
            t[0] * u[0] + t[2] * u[1],
            t[1] * u[0] + t[3] * u[1],
            t[0] * u[2] + t[2] * u[3],
            t[1] * u[2] + t[3] * u[3],
            t[0] * u[4] + t[2] * u[5] + t[4],
            t[1] * u[4] + t[3] * u[5] + t[5],
        ])
    }

    /// Compose a sequence of transforms in function-composition order:
    /// the last listed transform is applied first.
    pub fn compose_many(transforms: &[Self]) -> Self {
        transforms
            .iter()
            .rev()
            .copied()
            .fold(Self::IDENTITY, |acc, t| Self::compose(t, acc))
    }

    /// Apply the transform to a point.
    pub fn apply(&self, point: Point) -> Point {
        let m = &self.0;
        Point::new(
            point.x * m[0] + point.y * m[2] + m[4],
            point.x * m[1] + point.y * m[3] + m[5],
        )
    }

    /// Apply only the linear part to a displacement.
    pub fn apply_vec(&self, vec: Vec2) -> Vec2 {
        let m = &self.0;
        Vec2::new(vec.x * m[0] + vec.y * m[2], vec.x * m[1] + vec.y * m[3])
    }

    /// Apply the transform to a batch of points.
    pub fn apply_many(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|point| self.apply(*point)).collect()
    }

    /// Determinant of the linear part.
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0] * m[3] - m[1] * m[2]
    }

    /// Invert the transform.
    ///
    /// A singular transform yields non-finite entries; callers guard with
    /// [`Transform::is_rank_deficient`] or use [`Transform::checked_invert`].
    pub fn invert(&self) -> Self {
        let m = &self.0;
        let det = self.determinant();
        Self([
            m[3] / det,
            -m[1] / det,
            -m[2] / det,
            m[0] / det,
            (m[2] * m[5] - m[3] * m[4]) / det,
            (m[1] * m[4] - m[0] * m[5]) / det,
        ])
    }

    /// Invert the transform, rejecting singular input.
    pub fn checked_invert(&self) -> Option<Self> {
        let inverse = self.invert();
        inverse.is_finite().then_some(inverse)
    }

    /// Check whether the linear part fails to span both dimensions.
    pub fn is_rank_deficient(&self) -> bool {
        let det = self.determinant();
        det == 0.0 || !det.is_finite()
    }

    /// Check whether all entries are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|entry| entry.is_finite())
    }

    /// The diagonal scale factors of the linear part.
    pub fn scale(&self) -> Vec2 {
        Vec2::new(self.0[0], self.0[3])
    }

    /// Access the raw entries.
    pub fn entries(&self) -> &[f64; 6] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_leaves_points_unchanged() {
        let point = Point::new(3.5, -2.0);
        assert_eq!(Transform::IDENTITY.apply(point), point);
    }

    #[test]
    fn invert_roundtrips_full_rank_transform() {
        let transform = Transform::new([2.0, 0.5, -1.0, 3.0, 4.0, -2.5]);
        let inverse = transform.invert();
        let point = Point::new(1.25, -0.75);
        let roundtrip = inverse.apply(transform.apply(point));
        assert_relative_eq!(roundtrip.x, point.x, max_relative = 1e-12);
        assert_relative_eq!(roundtrip.y, point.y, max_relative = 1e-12);
    }

    #[test]
    fn compose_applies_second_argument_first() {
        let translate = Transform::from_scale_offset(1.0, 1.0, 1.0, 0.0);
        let scale = Transform::from_scale_offset(2.0, 2.0, 0.0, 0.0);
        // Translate, then scale.
        let composed = Transform::compose(scale, translate);
        assert_eq!(composed.apply(Point::new(1.0, 0.0)), Point::new(4.0, 0.0));
    }

    #[test]
    fn compose_many_matches_pairwise_composition() {
        let a = Transform::from_rotation(0.3);
        let b = Transform::from_scale_offset(2.0, 0.5, 1.0, -1.0);
        let c = Transform::from_scale_offset(1.0, 1.0, -3.0, 2.0);
        let chained = Transform::compose_many(&[a, b, c]);
        let pairwise = Transform::compose(a, Transform::compose(b, c));
        let point = Point::new(0.7, -1.1);
        let left = chained.apply(point);
        let right = pairwise.apply(point);
        assert_relative_eq!(left.x, right.x, max_relative = 1e-12);
        assert_relative_eq!(left.y, right.y, max_relative = 1e-12);
    }

    #[test]
    fn rotation_quarter_turn() {
        let transform = Transform::from_rotation(std::f64::consts::FRAC_PI_2);
        let rotated = transform.apply(Point::new(1.0, 0.0));
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn singular_invert_is_non_finite() {
        let singular = Transform::from_scale_offset(1.0, 0.0, 0.0, 0.0);
        assert!(singular.is_rank_deficient());
        assert!(!singular.invert().is_finite());
        assert!(singular.checked_invert().is_none());
    }

    #[test]
    fn unit_square_maps_onto_rect_corners() {
        let rect = Rect::new(2.0, 10.0, 4.0, -8.0);
        let transform = Transform::unit_to_rect(&rect);
        assert_eq!(transform.apply(Point::new(0.0, 0.0)), Point::new(2.0, 10.0));
        assert_eq!(transform.apply(Point::new(1.0, 1.0)), Point::new(6.0, 2.0));
        let back = Transform::rect_to_unit(&rect);
        let unit = back.apply(Point::new(6.0, 2.0));
        assert_relative_eq!(unit.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(unit.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn extent_transform_matches_scale_and_offset() {
        let extent = Extent::from_bounds(-1.0, 3.0, 0.0, 10.0);
        let transform = Transform::unit_to_extent(&extent);
        assert_eq!(
            transform.apply(Point::new(0.5, 0.5)),
            Point::new(1.0, 5.0)
        );
        let inverse = Transform::extent_to_unit(&extent);
        let unit = inverse.apply(Point::new(3.0, 10.0));
        assert_relative_eq!(unit.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(unit.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn apply_vec_ignores_translation() {
        let transform = Transform::from_scale_offset(2.0, 3.0, 100.0, 200.0);
        assert_eq!(transform.apply_vec(Vec2::new(1.0, 1.0)), Vec2::new(2.0, 3.0));
    }
}
