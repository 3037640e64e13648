use ndarray::{NdFloat, ScalarOperand};

use num_traits::FromPrimitive;
use rand::distr::uniform::SampleUniform;

use std::iter::Sum;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

// Include submodules
mod common;
mod geometry;

// Re-export types from submodules
pub use common::{DataPoint, ParameterState, Polarity};
pub use geometry::{
    BoundaryLine, DEFAULT_BOUNDARY_EPSILON, DEFAULT_VIEW_EXTENT, clamp_away_from_zero,
    project_boundary,
};

pub trait Float:
    NdFloat
    + FromPrimitive
    + Default
    + Sum
    + for<'a> AddAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> DivAssign<&'a Self>
    + SampleUniform
    + ScalarOperand
    + std::marker::Unpin
{
    /// Converts an `f64` constant into this float type.
    ///
    /// Every `Float` in this crate can represent an `f64` (possibly with rounding),
    /// so the conversion never fails in practice; NaN is returned if it ever does.
    fn lit(x: f64) -> Self {
        Self::from_f64(x).unwrap_or_else(Self::nan)
    }
}

impl Float for f32 {}

impl Float for f64 {}
