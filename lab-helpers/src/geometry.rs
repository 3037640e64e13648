//! Decision-boundary geometry for planar linear classifiers.
//!
//! The boundary of `w1·x + w2·y + b = 0` is drawn as a segment between two
//! x-coordinates. Near-vertical boundaries (`|w2|` below a threshold) are
//! approximated by clamping `w2`, so the projection is always finite but
//! not exact in that regime. Use [`BoundaryLine::is_approximate`] to tell
//! the two cases apart.

use crate::Float;

/// Smallest magnitude of `w2` used when projecting a boundary line.
pub const DEFAULT_BOUNDARY_EPSILON: f64 = 0.05;

/// Half-width of the square viewport `[-1.2, 1.2]²` the lab renders into.
pub const DEFAULT_VIEW_EXTENT: f64 = 1.2;

/// A segment of the decision boundary between two x-coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct BoundaryLine<F: Float> {
    pub start: (F, F),
    pub end: (F, F),
    /// `true` if `w2` was clamped to avoid dividing by a value near zero.
    pub approximate: bool,
}

/// Pushes `value` out of the open interval `(-epsilon, epsilon)`.
///
/// Values inside the interval become `±epsilon` with the sign of `value`;
/// exactly zero (of either sign) becomes `+epsilon`.
pub fn clamp_away_from_zero<F: Float>(value: F, epsilon: F) -> F {
    if value.abs() >= epsilon {
        value
    } else if value >= F::zero() {
        epsilon
    } else {
        -epsilon
    }
}

/// Projects the boundary `w1·x + w2·y + b = 0` onto `x_a` and `x_b`.
///
/// Each endpoint is `y = (-w1·x - b) / w2'` where `w2'` is `w2` clamped
/// away from zero by `epsilon`.
pub fn project_boundary<F: Float>(w1: F, w2: F, b: F, x_a: F, x_b: F, epsilon: F) -> BoundaryLine<F> {
    let divisor = clamp_away_from_zero(w2, epsilon);
    let y_at = |x: F| (-w1 * x - b) / divisor;
    BoundaryLine {
        start: (x_a, y_at(x_a)),
        end: (x_b, y_at(x_b)),
        approximate: divisor != w2,
    }
}

impl<F: Float> BoundaryLine<F> {
    pub fn is_approximate(&self) -> bool {
        self.approximate
    }
}
