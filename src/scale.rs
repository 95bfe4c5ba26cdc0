//! Nonlinear display scales applied inside the unit square.

use crate::geom::Point;

/// Default base for the pseudo-log scale.
pub const DEFAULT_PSEUDO_LOG_BASE: f64 = 1000.0;

/// Nonlinear warp applied to the y component between the affine data stage
/// and the frame transform.
///
/// Both variants fix the unit interval endpoints, so a warped unit square
/// stays a unit square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NonlinearScale {
    /// No warp.
    Identity,
    /// Log-like compression of the y component with exact inverse.
    ///
    /// Forward: `y ↦ log_base((base − 1)·base·y + base) − 1`.
    /// Larger bases compress large values harder near 1.
    PseudoLog {
        /// Logarithm base; must be greater than 1.
        base: f64,
    },
}

impl NonlinearScale {
    /// Pseudo-log scale with the default base.
    pub fn pseudo_log() -> Self {
        Self::PseudoLog {
            base: DEFAULT_PSEUDO_LOG_BASE,
        }
    }

    /// Warp a display-space point.
    pub fn apply(self, point: Point) -> Point {
        match self {
            Self::Identity => point,
            Self::PseudoLog { base } => {
                let y = ((base - 1.0) * base * point.y + base).log(base) - 1.0;
                Point::new(point.x, y)
            }
        }
    }

    /// Unwarp a display-space point.
    pub fn invert(self, point: Point) -> Point {
        match self {
            Self::Identity => point,
            Self::PseudoLog { base } => {
                let y = (base.powf(point.y) - 1.0) / (base - 1.0);
                Point::new(point.x, y)
            }
        }
    }
}

impl Default for NonlinearScale {
    fn default() -> Self {
        Self::Identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pseudo_log_fixes_unit_interval_endpoints() {
        let scale = NonlinearScale::pseudo_log();
        let zero = scale.apply(Point::new(0.3, 0.0));
        let one = scale.apply(Point::new(0.3, 1.0));
        assert_relative_eq!(zero.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(one.y, 1.0, epsilon = 1e-12);
        assert_eq!(zero.x, 0.3);
    }

    #[test]
    fn pseudo_log_inverts_exactly() {
        let scale = NonlinearScale::PseudoLog { base: 50.0 };
        let point = Point::new(0.1, 0.37);
        let roundtrip = scale.invert(scale.apply(point));
        assert_relative_eq!(roundtrip.y, point.y, max_relative = 1e-12);
    }

    #[test]
    fn pseudo_log_is_monotone_on_unit_interval() {
        let scale = NonlinearScale::pseudo_log();
        let mut last = f64::NEG_INFINITY;
        for i in 0..=10 {
            let y = scale.apply(Point::new(0.0, i as f64 / 10.0)).y;
            assert!(y > last);
            last = y;
        }
    }

    #[test]
    fn identity_passes_points_through() {
        let point = Point::new(2.0, -3.0);
        assert_eq!(NonlinearScale::Identity.apply(point), point);
        assert_eq!(NonlinearScale::Identity.invert(point), point);
    }
}
