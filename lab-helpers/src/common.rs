use crate::Float;
use ndarray::{Array1, ArrayView1, array};
use rand::Rng;
use std::fmt::{Debug, Display, Formatter};

/// Represents a single data point with features and a label.
///
/// L: The type of the label (e.g., `Polarity`, `bool`, an enum).
/// F: The float type for the features (e.g., f32, f64).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct DataPoint<L, F>
where
    L: Clone + Eq + std::hash::Hash + Debug,
    F: Float,
{
    pub features: Array1<F>,
    pub label: L,
}

impl<L, F> DataPoint<L, F>
where
    L: Clone + Eq + std::hash::Hash + Debug,
    F: Float,
{
    pub fn new(features: Array1<F>, label: L) -> Self {
        DataPoint { features, label }
    }

    /// Creates a two-feature point at `(x, y)`.
    pub fn planar(x: F, y: F, label: L) -> Self {
        DataPoint::new(array![x, y], label)
    }

    /// Returns `(x, y)` for two-feature points, `None` otherwise.
    pub fn coords(&self) -> Option<(F, F)> {
        match self.features.as_slice() {
            Some(&[x, y]) => Some((x, y)),
            _ => None,
        }
    }

    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// Binary class label of a linear classifier, valued +1 or -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub enum Polarity {
    Negative,
    Positive,
}

impl Polarity {
    /// Thresholds an activation at zero.
    ///
    /// Only strictly positive activations map to `Positive`; zero (and NaN)
    /// map to `Negative`.
    pub fn of<F: Float>(activation: F) -> Self {
        if activation > F::zero() {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Polarity::Positive => 1,
            Polarity::Negative => -1,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }

    pub fn from_bool(positive: bool) -> Self {
        if positive {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+}", self.value())
    }
}

/// The learned state of a linear classifier: one weight per feature plus a bias.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct ParameterState<F: Float> {
    pub weights: Array1<F>,
    pub bias: F,
}

impl<F: Float> ParameterState<F> {
    pub fn new(weights: Array1<F>, bias: F) -> Self {
        ParameterState { weights, bias }
    }

    /// Parameters of a planar classifier `w1·x + w2·y + b`.
    pub fn planar(w1: F, w2: F, b: F) -> Self {
        ParameterState::new(array![w1, w2], b)
    }

    pub fn zeros(dim: usize) -> Self {
        ParameterState::new(Array1::zeros(dim), F::zero())
    }

    /// Draws every weight and the bias uniformly from `[-1, 1)`.
    pub fn random<R: Rng>(dim: usize, rng: &mut R) -> Self {
        let weights = Array1::from_shape_fn(dim, |_| rng.random_range(-F::one()..F::one()));
        let bias = rng.random_range(-F::one()..F::one());
        ParameterState::new(weights, bias)
    }

    pub fn dim(&self) -> usize {
        self.weights.len()
    }

    /// Returns `(w1, w2, b)` for planar parameters, `None` otherwise.
    pub fn planar_components(&self) -> Option<(F, F, F)> {
        match self.weights.as_slice() {
            Some(&[w1, w2]) => Some((w1, w2, self.bias)),
            _ => None,
        }
    }

    /// Computes `w·x + b`.
    ///
    /// # Panics
    ///
    /// Panics if `features` does not have the same length as the weights.
    pub fn activation(&self, features: ArrayView1<F>) -> F {
        self.weights.dot(&features) + self.bias
    }

    pub fn predict(&self, features: ArrayView1<F>) -> Polarity {
        Polarity::of(self.activation(features))
    }
}
