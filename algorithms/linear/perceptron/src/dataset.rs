use lab_helpers::{DataPoint, Float, ParameterState, Polarity};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::PerceptronError;

/// Half-distance between the corners of the fixed logic-gate datasets.
const CORNER: f64 = 0.7;

/// The problems the dataset generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub enum ProblemKind {
    /// Points labelled by a random linear separator, optionally with label noise.
    #[default]
    Random,
    /// Logical AND on the corners of `[-0.7, 0.7]²`.
    And,
    /// Logical OR on the corners of `[-0.7, 0.7]²`.
    Or,
    /// Logical XOR on the corners of `[-0.7, 0.7]²`. Not linearly separable.
    Xor,
}

impl ProblemKind {
    /// Truth value of the corner `(a, b)`, `None` for `Random`.
    fn corner_label(self, a: bool, b: bool) -> Option<bool> {
        match self {
            ProblemKind::Random => None,
            ProblemKind::And => Some(a && b),
            ProblemKind::Or => Some(a || b),
            ProblemKind::Xor => Some(a != b),
        }
    }
}

/// Parameters of a dataset request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct DatasetConfig {
    pub kind: ProblemKind,
    /// Number of points for `Random`; ignored by the corner problems.
    pub count: usize,
    /// Probability in percent of flipping each `Random` label.
    pub noise_percent: f64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            kind: ProblemKind::Random,
            count: 20,
            noise_percent: 0.0,
        }
    }
}

impl DatasetConfig {
    /// Checks the configuration before any points are generated.
    ///
    /// # Errors
    ///
    /// Returns `PerceptronError::InvalidConfig` if `noise_percent` lies outside
    /// `[0, 100]` or is NaN.
    pub fn validate(&self) -> Result<(), PerceptronError> {
        if !(0.0..=100.0).contains(&self.noise_percent) {
            return Err(PerceptronError::InvalidConfig(format!(
                "noise_percent must lie in [0, 100], got {}",
                self.noise_percent
            )));
        }
        Ok(())
    }
}

/// A random dataset together with the separator that labelled it.
#[derive(Debug, Clone)]
pub struct RandomDataset<F: Float> {
    pub points: Vec<DataPoint<Polarity, F>>,
    /// The hidden `(w1, w2, b)` used to assign labels before noise.
    pub separator: ParameterState<F>,
}

/// Produces labelled planar point sets.
///
/// The random source is owned by the generator, so a seeded generator
/// reproduces the same sequence of datasets.
#[derive(Debug, Clone)]
pub struct DatasetGenerator<R: Rng = Xoshiro256PlusPlus> {
    rng: R,
}

impl DatasetGenerator<Xoshiro256PlusPlus> {
    /// Creates a generator seeded from the thread-local random source.
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Creates a generator whose datasets are reproducible from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl Default for DatasetGenerator<Xoshiro256PlusPlus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DatasetGenerator<R> {
    /// Creates a generator drawing from the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generates a dataset for `kind`.
    ///
    /// The corner problems always return the same four points and ignore
    /// `count` and `noise_percent`. `noise_percent` is clamped to `[0, 100]`.
    pub fn generate<F: Float>(
        &mut self,
        kind: ProblemKind,
        count: usize,
        noise_percent: f64,
    ) -> Vec<DataPoint<Polarity, F>> {
        match corner_points(kind) {
            Some(points) => points,
            None => self.generate_random(count, noise_percent).points,
        }
    }

    pub fn generate_from<F: Float>(&mut self, config: &DatasetConfig) -> Vec<DataPoint<Polarity, F>> {
        self.generate(config.kind, config.count, config.noise_percent)
    }

    /// Draws a separator uniformly from `[-1, 1]³`, then `count` points
    /// uniformly from `[-1, 1]²` labelled by the sign of the separator.
    /// Each label is then flipped independently with probability
    /// `noise_percent / 100`.
    pub fn generate_random<F: Float>(&mut self, count: usize, noise_percent: f64) -> RandomDataset<F> {
        let flip_probability = if noise_percent.is_nan() {
            0.0
        } else {
            noise_percent.clamp(0.0, 100.0) / 100.0
        };

        let separator = ParameterState::random(2, &mut self.rng);
        let mut points = Vec::with_capacity(count);
        let mut flipped = 0;
        for _ in 0..count {
            let x = self.rng.random_range(-F::one()..F::one());
            let y = self.rng.random_range(-F::one()..F::one());
            let mut point = DataPoint::planar(x, y, Polarity::Negative);
            point.label = separator.predict(point.features.view());
            if flip_probability > 0.0 && self.rng.random_bool(flip_probability) {
                point.label = point.label.flipped();
                flipped += 1;
            }
            points.push(point);
        }
        debug!(
            "generated {} random points ({} labels flipped by noise)",
            count, flipped
        );

        RandomDataset { points, separator }
    }
}

/// The four corners in the order (-,-), (-,+), (+,-), (+,+).
fn corner_points<F: Float>(kind: ProblemKind) -> Option<Vec<DataPoint<Polarity, F>>> {
    let c = F::lit(CORNER);
    [(false, false), (false, true), (true, false), (true, true)]
        .into_iter()
        .map(|(a, b)| {
            let label = kind.corner_label(a, b)?;
            let x = if a { c } else { -c };
            let y = if b { c } else { -c };
            Some(DataPoint::planar(x, y, Polarity::from_bool(label)))
        })
        .collect()
}
