//! A 2-2-1 sigmoid network trained by backpropagation.
//!
//! The smallest multilayer network that can represent XOR, which a single
//! perceptron cannot.

use lab_helpers::{DataPoint, Float};
use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView1, Axis, arr1, arr2};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub const INPUTS: usize = 2;
pub const HIDDEN: usize = 2;

/// Errors that can occur when training or evaluating the network.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MlpError {
    #[error("training data is empty")]
    EmptyDataSet,
    #[error("expected {expected} inputs, found {found}")]
    MismatchedDimensions { expected: usize, found: usize },
    #[error("learning rate must be finite and non-negative, got {0}")]
    InvalidLearningRate(f64),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct MlpConfig {
    pub learning_rate: f64,
    pub epochs: usize,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            epochs: 10_000,
        }
    }
}

impl MlpConfig {
    pub fn validate(&self) -> Result<(), MlpError> {
        if self.learning_rate.is_finite() && self.learning_rate >= 0.0 {
            Ok(())
        } else {
            Err(MlpError::InvalidLearningRate(self.learning_rate))
        }
    }
}

pub fn sigmoid<F: Float>(z: F) -> F {
    F::one() / (F::one() + (-z).exp())
}

/// Activations of one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass<F: Float> {
    pub hidden: Array1<F>,
    pub output: F,
}

/// The four XOR rows over `{0, 1}²`, labelled `true` where the output is 1.
pub fn xor_truth_table<F: Float>() -> Vec<DataPoint<bool, F>> {
    [(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)]
        .into_iter()
        .map(|(a, b)| DataPoint::planar(F::lit(a), F::lit(b), a != b))
        .collect()
}

/// A network with two inputs, two sigmoid hidden units and one sigmoid output.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct Mlp<F: Float> {
    /// Row `j` holds the weights from each input into hidden unit `j`.
    hidden_weights: Array2<F>,
    hidden_bias: Array1<F>,
    output_weights: Array1<F>,
    output_bias: F,
}

impl<F: Float> Mlp<F> {
    pub fn from_weights(
        hidden_weights: [[F; INPUTS]; HIDDEN],
        hidden_bias: [F; HIDDEN],
        output_weights: [F; HIDDEN],
        output_bias: F,
    ) -> Self {
        Self {
            hidden_weights: arr2(&hidden_weights),
            hidden_bias: arr1(&hidden_bias),
            output_weights: arr1(&output_weights),
            output_bias,
        }
    }

    /// Draws every weight and bias uniformly from `[-1, 1)`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut draw = || rng.random_range(-F::one()..F::one());
        Self {
            hidden_weights: Array2::from_shape_fn((HIDDEN, INPUTS), |_| draw()),
            hidden_bias: Array1::from_shape_fn(HIDDEN, |_| draw()),
            output_weights: Array1::from_shape_fn(HIDDEN, |_| draw()),
            output_bias: draw(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::random(&mut Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    pub fn hidden_weights(&self) -> &Array2<F> {
        &self.hidden_weights
    }

    pub fn hidden_bias(&self) -> &Array1<F> {
        &self.hidden_bias
    }

    pub fn output_weights(&self) -> &Array1<F> {
        &self.output_weights
    }

    pub fn output_bias(&self) -> F {
        self.output_bias
    }

    pub fn forward(&self, input: ArrayView1<F>) -> Result<ForwardPass<F>, MlpError> {
        if input.len() != INPUTS {
            return Err(MlpError::MismatchedDimensions {
                expected: INPUTS,
                found: input.len(),
            });
        }
        let hidden = (self.hidden_weights.dot(&input) + &self.hidden_bias).mapv(sigmoid);
        let output = sigmoid(self.output_weights.dot(&hidden) + self.output_bias);
        Ok(ForwardPass { hidden, output })
    }

    /// Thresholds the output at 0.5.
    pub fn predict(&self, input: ArrayView1<F>) -> Result<bool, MlpError> {
        Ok(self.forward(input)?.output > F::lit(0.5))
    }

    /// One backpropagation step on the squared error `(target - output)² / 2`.
    ///
    /// Returns the loss measured before the update.
    pub fn train_sample(&mut self, input: ArrayView1<F>, target: F, learning_rate: F) -> Result<F, MlpError> {
        let ForwardPass { hidden, output } = self.forward(input)?;
        let residual = output - target;
        let loss = residual * residual / F::lit(2.0);

        let delta_out = residual * output * (F::one() - output);
        let delta_hidden = &self.output_weights * &hidden.mapv(|h| h * (F::one() - h)) * delta_out;

        self.output_weights.scaled_add(-learning_rate * delta_out, &hidden);
        self.output_bias -= learning_rate * delta_out;

        let grad = delta_hidden
            .view()
            .insert_axis(Axis(1))
            .dot(&input.insert_axis(Axis(0)));
        self.hidden_weights.scaled_add(-learning_rate, &grad);
        self.hidden_bias.scaled_add(-learning_rate, &delta_hidden);

        Ok(loss)
    }

    /// Mean squared-error loss over `data` without updating the network.
    pub fn mean_loss(&self, data: &[DataPoint<bool, F>]) -> Result<F, MlpError> {
        if data.is_empty() {
            return Err(MlpError::EmptyDataSet);
        }
        let mut total = F::zero();
        for point in data {
            let residual = self.forward(point.features.view())?.output - target_of(point);
            total += residual * residual / F::lit(2.0);
        }
        Ok(total / F::lit(data.len() as f64))
    }

    /// Trains sample by sample, in dataset order, for `config.epochs` epochs.
    ///
    /// Returns the mean pre-update loss of each epoch.
    pub fn train(&mut self, data: &[DataPoint<bool, F>], config: &MlpConfig) -> Result<Vec<F>, MlpError> {
        config.validate()?;
        if data.is_empty() {
            return Err(MlpError::EmptyDataSet);
        }
        let learning_rate = F::lit(config.learning_rate);
        let count = F::lit(data.len() as f64);
        let mut losses = Vec::with_capacity(config.epochs);
        for epoch in 0..config.epochs {
            let mut total = F::zero();
            for point in data {
                total += self.train_sample(point.features.view(), target_of(point), learning_rate)?;
            }
            let mean = total / count;
            trace!("epoch {}: mean loss {}", epoch + 1, mean);
            losses.push(mean);
        }
        if let Some(last) = losses.last() {
            debug!("trained {} epochs, final mean loss {}", config.epochs, last);
        }
        Ok(losses)
    }
}

fn target_of<F: Float>(point: &DataPoint<bool, F>) -> F {
    if point.label { F::one() } else { F::zero() }
}
