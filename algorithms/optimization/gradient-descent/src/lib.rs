//! A toy gradient-descent simulator over a two-parameter loss surface.
//!
//! The whole trajectory is computed eagerly; hosts animate it by replaying
//! the returned snapshots.

use lab_helpers::Float;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Start point used by the lab, far up the side of the bowl.
pub const DEFAULT_START: (f64, f64) = (-80.0, -70.0);

pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Errors that can occur when configuring a simulator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DescentError {
    #[error("noise amplitude must be finite and non-negative, got {0}")]
    InvalidNoiseAmplitude(f64),
}

/// A differentiable loss over two parameters.
pub trait LossSurface {
    fn loss<F: Float>(&self, x: F, y: F) -> F;

    fn gradient<F: Float>(&self, x: F, y: F) -> (F, F);
}

/// The quadratic bowl `L(x, y) = x² + y²`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bowl;

impl LossSurface for Bowl {
    fn loss<F: Float>(&self, x: F, y: F) -> F {
        x * x + y * y
    }

    fn gradient<F: Float>(&self, x: F, y: F) -> (F, F) {
        let two = F::lit(2.0);
        (two * x, two * y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub enum DescentMode {
    /// Follow the exact gradient.
    #[default]
    Batch,
    /// Perturb each gradient component with uniform noise before stepping.
    ///
    /// This is a visual stand-in for mini-batch noise, not a real
    /// stochastic gradient over sampled data.
    Stochastic,
}

/// Position and loss after an iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Snapshot<F: Float> {
    pub x: F,
    pub y: F,
    pub loss: F,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct DescentConfig {
    /// Number of updates; trajectories hold `steps + 1` snapshots.
    pub steps: usize,
    /// Half-width of the uniform noise added in stochastic mode.
    pub noise_amplitude: f64,
}

impl Default for DescentConfig {
    fn default() -> Self {
        Self {
            steps: 20,
            noise_amplitude: 40.0,
        }
    }
}

impl DescentConfig {
    /// Checks the configuration before a simulator is built from it.
    ///
    /// # Errors
    ///
    /// Returns `DescentError::InvalidNoiseAmplitude` if `noise_amplitude` is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), DescentError> {
        if self.noise_amplitude.is_finite() && self.noise_amplitude >= 0.0 {
            Ok(())
        } else {
            Err(DescentError::InvalidNoiseAmplitude(self.noise_amplitude))
        }
    }
}

/// Runs gradient descent over a [`LossSurface`].
#[derive(Debug, Clone)]
pub struct DescentSimulator<S: LossSurface = Bowl, R: Rng = Xoshiro256PlusPlus> {
    surface: S,
    config: DescentConfig,
    rng: R,
}

impl DescentSimulator<Bowl, Xoshiro256PlusPlus> {
    /// A bowl simulator with the default configuration and a random seed.
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            surface: Bowl,
            config: DescentConfig::default(),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }
}

impl Default for DescentSimulator<Bowl, Xoshiro256PlusPlus> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LossSurface, R: Rng> DescentSimulator<S, R> {
    /// # Errors
    ///
    /// Returns `DescentError::InvalidNoiseAmplitude` if the configured noise is
    /// negative or not finite.
    pub fn with_parts(surface: S, config: DescentConfig, rng: R) -> Result<Self, DescentError> {
        config.validate()?;
        Ok(Self { surface, config, rng })
    }

    /// Descends from `(x0, y0)` and returns every visited position, start included.
    ///
    /// Each iteration computes the gradient, perturbs it in stochastic mode,
    /// then moves `x -= lr·gx`, `y -= lr·gy`. Batch runs are deterministic;
    /// stochastic runs depend on the simulator's random source.
    pub fn simulate<F: Float>(&mut self, mode: DescentMode, learning_rate: F, x0: F, y0: F) -> Vec<Snapshot<F>> {
        let amplitude = F::lit(self.config.noise_amplitude);
        let mut x = x0;
        let mut y = y0;
        let mut trajectory = Vec::with_capacity(self.config.steps + 1);
        trajectory.push(self.snapshot(x, y));

        for i in 0..self.config.steps {
            let (mut gx, mut gy) = self.surface.gradient(x, y);
            if mode == DescentMode::Stochastic && amplitude > F::zero() {
                gx += self.rng.random_range(-amplitude..amplitude);
                gy += self.rng.random_range(-amplitude..amplitude);
            }
            x = x - learning_rate * gx;
            y = y - learning_rate * gy;
            let snapshot = self.snapshot(x, y);
            trace!("iteration {}: ({}, {}) loss {}", i + 1, x, y, snapshot.loss);
            trajectory.push(snapshot);
        }

        if let (Some(first), Some(last)) = (trajectory.first(), trajectory.last()) {
            debug!(
                "{:?} descent over {} steps: loss {} -> {}",
                mode, self.config.steps, first.loss, last.loss
            );
        }
        trajectory
    }

    fn snapshot<F: Float>(&self, x: F, y: F) -> Snapshot<F> {
        Snapshot {
            x,
            y,
            loss: self.surface.loss(x, y),
        }
    }
}
