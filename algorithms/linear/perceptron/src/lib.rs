//! Online perceptron training for the interactive lab.
//!
//! A [`TrainerSession`] owns a dataset, the current parameters and an
//! append-only history of updates. Each call to [`TrainerSession::step`]
//! applies the perceptron rule to the first misclassified point and records
//! what changed, so a host can replay or chart the run afterwards.

use lab_helpers::{
    BoundaryLine, DEFAULT_VIEW_EXTENT, DataPoint, Float, ParameterState, Polarity, project_boundary,
};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

mod dataset;

pub use dataset::{DatasetConfig, DatasetGenerator, ProblemKind, RandomDataset};

/// Errors that can occur when configuring a training session.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PerceptronError {
    /// The learning rate is negative or not finite.
    #[error("learning rate must be finite and non-negative, got {0}")]
    InvalidLearningRate(f64),
    /// A point or parameter vector does not match the session's dimensionality.
    #[error("expected {expected} features, found {found}")]
    MismatchedDimensions { expected: usize, found: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Learning-rule settings of a session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate", default)
)]
pub struct TrainerConfig {
    /// Step size η of the perceptron rule. Zero is accepted and makes every update a no-op.
    pub learning_rate: f64,
    /// Minimum `|w2|` used when projecting the decision boundary.
    pub boundary_epsilon: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            boundary_epsilon: lab_helpers::DEFAULT_BOUNDARY_EPSILON,
        }
    }
}

impl TrainerConfig {
    /// Checks the configuration before a session is built from it.
    ///
    /// # Errors
    ///
    /// Returns `PerceptronError::InvalidLearningRate` if η is negative or not
    /// finite, and `PerceptronError::InvalidConfig` if `boundary_epsilon` is not
    /// a finite positive number.
    pub fn validate(&self) -> Result<(), PerceptronError> {
        check_learning_rate(self.learning_rate)?;
        if !(self.boundary_epsilon.is_finite() && self.boundary_epsilon > 0.0) {
            return Err(PerceptronError::InvalidConfig(format!(
                "boundary_epsilon must be finite and positive, got {}",
                self.boundary_epsilon
            )));
        }
        Ok(())
    }
}

fn check_learning_rate(learning_rate: f64) -> Result<(), PerceptronError> {
    if learning_rate.is_finite() && learning_rate >= 0.0 {
        Ok(())
    } else {
        Err(PerceptronError::InvalidLearningRate(learning_rate))
    }
}

/// One recorded application of the perceptron rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_crate::Serialize, serde_crate::Deserialize),
    serde(crate = "serde_crate")
)]
pub struct TrainingStep<F: Float> {
    /// Number of updates recorded before this one, so the first step is epoch 0.
    pub epoch: usize,
    /// Index of the corrected point in the dataset.
    pub index: usize,
    pub point: DataPoint<Polarity, F>,
    /// `label - predicted`, always -2 or 2 for a recorded update.
    pub error: i8,
    pub old_params: ParameterState<F>,
    pub new_params: ParameterState<F>,
    /// Number of misclassified points before the update.
    pub misclassified_before: usize,
    pub predicted: Polarity,
}

/// A dataset point as classified by the current parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointView<'a, F: Float> {
    pub index: usize,
    pub point: &'a DataPoint<Polarity, F>,
    pub predicted: Polarity,
    pub misclassified: bool,
}

/// A stateful perceptron training session.
///
/// # Type Parameters
///
/// * `F`: The float type for features and parameters.
/// * `R`: The random source used to (re)initialize parameters.
#[derive(Debug, Clone)]
pub struct TrainerSession<F: Float, R: Rng = Xoshiro256PlusPlus> {
    data: Vec<DataPoint<Polarity, F>>,
    dim: usize,
    params: ParameterState<F>,
    learning_rate: F,
    boundary_epsilon: F,
    history: Vec<TrainingStep<F>>,
    converged: bool,
    rng: R,
}

impl<F: Float> TrainerSession<F, Xoshiro256PlusPlus> {
    /// Creates a session with randomly initialized parameters.
    pub fn new(data: Vec<DataPoint<Polarity, F>>, config: &TrainerConfig) -> Result<Self, PerceptronError> {
        Self::with_seed(data, config, rand::random())
    }

    /// Creates a session whose parameter initializations are reproducible.
    pub fn with_seed(
        data: Vec<DataPoint<Polarity, F>>,
        config: &TrainerConfig,
        seed: u64,
    ) -> Result<Self, PerceptronError> {
        Self::with_rng(data, config, Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<F: Float, R: Rng> TrainerSession<F, R> {
    /// Creates a session drawing its initial parameters from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `PerceptronError::InvalidLearningRate` or `InvalidConfig` for a bad
    /// `config`, and `PerceptronError::MismatchedDimensions` if the points do not
    /// all have the same number of features.
    pub fn with_rng(
        data: Vec<DataPoint<Polarity, F>>,
        config: &TrainerConfig,
        mut rng: R,
    ) -> Result<Self, PerceptronError> {
        config.validate()?;
        let dim = dataset_dim(&data)?;
        let params = ParameterState::random(dim, &mut rng);
        Ok(Self {
            data,
            dim,
            params,
            learning_rate: F::lit(config.learning_rate),
            boundary_epsilon: F::lit(config.boundary_epsilon),
            history: Vec::new(),
            converged: false,
            rng,
        })
    }

    pub fn data(&self) -> &[DataPoint<Polarity, F>] {
        &self.data
    }

    pub fn params(&self) -> &ParameterState<F> {
        &self.params
    }

    pub fn history(&self) -> &[TrainingStep<F>] {
        &self.history
    }

    pub fn learning_rate(&self) -> F {
        self.learning_rate
    }

    /// Number of features per point.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of recorded updates since the last reset.
    pub fn epoch(&self) -> usize {
        self.history.len()
    }

    /// Whether the last scan found every point correctly classified.
    ///
    /// Only `step` and `check_convergence` set this flag; it is cleared on reset.
    pub fn has_converged(&self) -> bool {
        self.converged
    }

    /// Changes η for subsequent updates without touching parameters or history.
    ///
    /// # Errors
    ///
    /// Returns `PerceptronError::InvalidLearningRate` if `learning_rate` is
    /// negative or not finite. The session is left unchanged in that case.
    pub fn set_learning_rate(&mut self, learning_rate: F) -> Result<(), PerceptronError> {
        check_learning_rate(learning_rate.to_f64().unwrap_or(f64::NAN))?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    /// Returns the points the current parameters misclassify, in dataset order.
    pub fn scan_misclassified(&self) -> Vec<&DataPoint<Polarity, F>> {
        self.misclassified_indices()
            .into_iter()
            .map(|i| &self.data[i])
            .collect()
    }

    /// Returns the indices of misclassified points, in ascending order.
    pub fn misclassified_indices(&self) -> Vec<usize> {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, p)| self.params.predict(p.features.view()) != p.label)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn misclassified_count(&self) -> usize {
        self.data
            .iter()
            .filter(|p| self.params.predict(p.features.view()) != p.label)
            .count()
    }

    /// Classifies every point under the current parameters.
    pub fn classify_all(&self) -> Vec<PointView<'_, F>> {
        self.data
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let predicted = self.params.predict(point.features.view());
                PointView {
                    index,
                    point,
                    predicted,
                    misclassified: predicted != point.label,
                }
            })
            .collect()
    }

    /// Rescans the dataset and updates the convergence flag.
    pub fn check_convergence(&mut self) -> bool {
        self.converged = self.misclassified_count() == 0;
        self.converged
    }

    /// Applies the perceptron rule to the first misclassified point.
    ///
    /// Returns `None` and marks the session converged if no point is
    /// misclassified; nothing is recorded in that case. Otherwise updates
    ///
    /// ```text
    /// w += η · (label - predicted) · x
    /// b += η · (label - predicted)
    /// ```
    ///
    /// and returns the recorded step.
    pub fn step(&mut self) -> Option<&TrainingStep<F>> {
        let misclassified = self.misclassified_indices();
        let Some(&index) = misclassified.first() else {
            if !self.converged {
                info!("converged after {} updates", self.history.len());
            }
            self.converged = true;
            return None;
        };

        let point = &self.data[index];
        let predicted = self.params.predict(point.features.view());
        let error = point.label.value() - predicted.value();
        let delta = self.learning_rate * F::lit(f64::from(error));

        let old_params = self.params.clone();
        self.params.weights.scaled_add(delta, &point.features);
        self.params.bias += delta;

        let epoch = self.history.len();
        debug!(
            "epoch {}: corrected point {} (error {}, {} misclassified before update)",
            epoch,
            index,
            error,
            misclassified.len()
        );
        self.history.push(TrainingStep {
            epoch,
            index,
            point: point.clone(),
            error,
            old_params,
            new_params: self.params.clone(),
            misclassified_before: misclassified.len(),
            predicted,
        });
        self.history.last()
    }

    /// Calls [`step`](Self::step) up to `max_steps` times, stopping early on convergence.
    ///
    /// Returns the steps recorded by this call. Running out of steps is not an
    /// error: data that is not linearly separable never converges.
    pub fn auto_train(&mut self, max_steps: usize) -> &[TrainingStep<F>] {
        let start = self.history.len();
        for _ in 0..max_steps {
            if self.step().is_none() {
                break;
            }
        }
        if !self.converged && !self.check_convergence() {
            info!(
                "stopped after {} steps without converging ({} points misclassified)",
                self.history.len() - start,
                self.misclassified_count()
            );
        }
        &self.history[start..]
    }

    /// Clears history and convergence, then installs `params` or fresh random ones.
    ///
    /// The dataset is kept.
    ///
    /// # Errors
    ///
    /// Returns `PerceptronError::MismatchedDimensions` if `params` has a different
    /// number of weights than the dataset has features. The session is unchanged
    /// in that case.
    pub fn reset(&mut self, params: Option<ParameterState<F>>) -> Result<(), PerceptronError> {
        let params = match params {
            Some(params) => {
                if params.dim() != self.dim {
                    return Err(PerceptronError::MismatchedDimensions {
                        expected: self.dim,
                        found: params.dim(),
                    });
                }
                params
            }
            None => ParameterState::random(self.dim, &mut self.rng),
        };
        self.params = params;
        self.history.clear();
        self.converged = false;
        Ok(())
    }

    /// Replaces the dataset and starts over with random parameters.
    ///
    /// # Errors
    ///
    /// Returns `PerceptronError::MismatchedDimensions` if the new points do not
    /// all have the same number of features.
    pub fn regenerate(&mut self, data: Vec<DataPoint<Polarity, F>>) -> Result<(), PerceptronError> {
        let dim = dataset_dim(&data)?;
        self.data = data;
        self.dim = dim;
        self.reset(None)
    }

    /// Misclassified count before each recorded update, in order.
    pub fn error_series(&self) -> Vec<usize> {
        self.history.iter().map(|s| s.misclassified_before).collect()
    }

    /// Parameters at the start of the run followed by the parameters after each update.
    pub fn weight_trajectory(&self) -> Vec<ParameterState<F>> {
        let initial = self
            .history
            .first()
            .map_or_else(|| self.params.clone(), |s| s.old_params.clone());
        std::iter::once(initial)
            .chain(self.history.iter().map(|s| s.new_params.clone()))
            .collect()
    }

    /// Decision boundary of the current parameters between `x_a` and `x_b`.
    ///
    /// Returns `None` unless the session is planar.
    pub fn boundary_line(&self, x_a: F, x_b: F) -> Option<BoundaryLine<F>> {
        let (w1, w2, b) = self.params.planar_components()?;
        Some(project_boundary(w1, w2, b, x_a, x_b, self.boundary_epsilon))
    }

    /// Decision boundary across the lab viewport `[-1.2, 1.2]`.
    pub fn view_boundary(&self) -> Option<BoundaryLine<F>> {
        let extent = F::lit(DEFAULT_VIEW_EXTENT);
        self.boundary_line(-extent, extent)
    }
}

/// Shared feature count of `data`; planar for an empty dataset.
fn dataset_dim<F: Float>(data: &[DataPoint<Polarity, F>]) -> Result<usize, PerceptronError> {
    let Some(first) = data.first() else {
        return Ok(2);
    };
    let expected = first.dim();
    for point in data {
        if point.dim() != expected {
            return Err(PerceptronError::MismatchedDimensions {
                expected,
                found: point.dim(),
            });
        }
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use proptest::prelude::*;

    fn and_01() -> Vec<DataPoint<Polarity, f64>> {
        vec![
            DataPoint::planar(0.0, 0.0, Polarity::Negative),
            DataPoint::planar(1.0, 0.0, Polarity::Negative),
            DataPoint::planar(0.0, 1.0, Polarity::Negative),
            DataPoint::planar(1.0, 1.0, Polarity::Positive),
        ]
    }

    fn session_at(
        data: Vec<DataPoint<Polarity, f64>>,
        params: ParameterState<f64>,
        learning_rate: f64,
    ) -> TrainerSession<f64> {
        let config = TrainerConfig {
            learning_rate,
            ..TrainerConfig::default()
        };
        let mut session = TrainerSession::with_seed(data, &config, 0).unwrap();
        session.reset(Some(params)).unwrap();
        session
    }

    #[test]
    fn test_and_first_step_from_zero() {
        let mut session = session_at(and_01(), ParameterState::zeros(2), 0.1);

        let step = session.step().unwrap().clone();
        assert_eq!(step.index, 3);
        assert_eq!(step.epoch, 0);
        assert_eq!(step.predicted, Polarity::Negative);
        assert_eq!(step.error, 2);
        assert_eq!(step.misclassified_before, 1);
        assert_eq!(step.old_params, ParameterState::zeros(2));
        assert_abs_diff_eq!(step.new_params.weights, array![0.2, 0.2], epsilon = 1e-9);
        assert_abs_diff_eq!(step.new_params.bias, 0.2, epsilon = 1e-9);
        assert_eq!(session.params(), &step.new_params);
        assert_eq!(session.epoch(), 1);
    }

    #[test]
    fn test_first_violator_wins() {
        // Both points are misclassified by zero parameters (both predict -1).
        let data = vec![
            DataPoint::planar(0.01, 0.01, Polarity::Positive),
            DataPoint::planar(5.0, 5.0, Polarity::Positive),
        ];
        let mut session = session_at(data, ParameterState::zeros(2), 1.0);
        assert_eq!(session.misclassified_indices(), vec![0, 1]);
        assert_eq!(session.step().unwrap().index, 0);
    }

    #[test]
    fn test_scan_preserves_dataset_order() {
        let data = vec![
            DataPoint::planar(1.0, 0.0, Polarity::Negative),
            DataPoint::planar(-1.0, 0.0, Polarity::Negative),
            DataPoint::planar(2.0, 0.0, Polarity::Negative),
        ];
        let session = session_at(data, ParameterState::planar(1.0, 0.0, 0.0), 0.1);
        let scanned = session.scan_misclassified();
        assert_eq!(scanned.len(), 2);
        assert_eq!(scanned[0].coords(), Some((1.0, 0.0)));
        assert_eq!(scanned[1].coords(), Some((2.0, 0.0)));
        assert_eq!(session.misclassified_count(), 2);

        let views = session.classify_all();
        assert_eq!(views.len(), 3);
        assert!(views[0].misclassified);
        assert!(!views[1].misclassified);
        assert_eq!(views[1].predicted, Polarity::Negative);
        assert_eq!(views[2].index, 2);
    }

    #[test]
    fn test_zero_activation_counts_as_negative() {
        let data = vec![DataPoint::planar(1.0, 1.0, Polarity::Negative)];
        let session = session_at(data, ParameterState::planar(1.0, -1.0, 0.0), 0.1);
        assert!(session.scan_misclassified().is_empty());
    }

    #[test]
    fn test_and_or_converge_from_any_start() {
        let mut generator = DatasetGenerator::with_seed(21);
        for kind in [ProblemKind::And, ProblemKind::Or] {
            for seed in 0..25 {
                let data = generator.generate(kind, 0, 0.0);
                let mut session: TrainerSession<f64> =
                    TrainerSession::with_seed(data, &TrainerConfig::default(), seed).unwrap();
                let steps = session.auto_train(1000).len();
                assert!(session.has_converged(), "{kind:?} with seed {seed} did not converge");
                assert!(steps < 1000);
                assert_eq!(session.misclassified_count(), 0);
            }
        }
    }

    #[test]
    fn test_xor_never_converges() {
        let xor = vec![
            DataPoint::planar(0.0, 0.0, Polarity::Negative),
            DataPoint::planar(1.0, 0.0, Polarity::Positive),
            DataPoint::planar(0.0, 1.0, Polarity::Positive),
            DataPoint::planar(1.0, 1.0, Polarity::Negative),
        ];
        let mut session = TrainerSession::with_seed(xor, &TrainerConfig::default(), 4).unwrap();
        let steps = session.auto_train(1000);
        assert_eq!(steps.len(), 1000);
        assert!(!session.has_converged());
        assert!(session.misclassified_count() > 0);
    }

    #[test]
    fn test_xor_corners_never_converge() {
        let data = DatasetGenerator::with_seed(8).generate::<f64>(ProblemKind::Xor, 0, 0.0);
        let mut session = TrainerSession::with_seed(data, &TrainerConfig::default(), 8).unwrap();
        session.auto_train(1000);
        assert!(!session.has_converged());
        assert_eq!(session.epoch(), 1000);
    }

    #[test]
    fn test_step_after_convergence_is_noop() {
        let mut session = session_at(and_01(), ParameterState::zeros(2), 0.1);
        session.auto_train(1000);
        assert!(session.has_converged());

        let epoch = session.epoch();
        let params = session.params().clone();
        assert!(session.step().is_none());
        assert!(session.step().is_none());
        assert_eq!(session.epoch(), epoch);
        assert_eq!(session.history().len(), epoch);
        assert_eq!(session.params(), &params);
    }

    #[test]
    fn test_epochs_increase_by_one() {
        let mut session = session_at(and_01(), ParameterState::planar(-1.0, -1.0, 1.0), 0.1);
        session.auto_train(1000);
        for (i, step) in session.history().iter().enumerate() {
            assert_eq!(step.epoch, i);
            assert!(step.error == 2 || step.error == -2);
        }
    }

    #[test]
    fn test_auto_train_detects_convergence_on_last_allowed_step() {
        let mut reference = session_at(and_01(), ParameterState::zeros(2), 0.1);
        reference.auto_train(1000);
        let needed = reference.epoch();
        assert!(needed > 0);

        let mut session = session_at(and_01(), ParameterState::zeros(2), 0.1);
        let steps = session.auto_train(needed);
        assert_eq!(steps.len(), needed);
        assert_eq!(session.misclassified_count(), 0);
        assert!(session.has_converged());
        assert_eq!(session.epoch(), needed);
    }

    #[test]
    fn test_auto_train_respects_bound() {
        let mut session = session_at(and_01(), ParameterState::planar(-1.0, -1.0, 1.0), 0.01);
        let steps = session.auto_train(3);
        assert_eq!(steps.len(), 3);
        assert!(!session.has_converged());
        assert!(session.auto_train(0).is_empty());
    }

    #[test]
    fn test_zero_learning_rate_records_no_op_updates() {
        let mut session = session_at(and_01(), ParameterState::zeros(2), 0.0);
        let steps = session.auto_train(5);
        assert_eq!(steps.len(), 5);
        for step in steps {
            assert_eq!(step.old_params, step.new_params);
            assert_eq!(step.index, 3);
        }
        assert!(!session.has_converged());
    }

    #[test]
    fn test_reset_clears_history_and_convergence() {
        let mut session = session_at(and_01(), ParameterState::zeros(2), 0.1);
        session.auto_train(1000);
        assert!(session.has_converged());

        session.reset(None).unwrap();
        assert!(session.history().is_empty());
        assert!(!session.has_converged());
        assert_eq!(session.data().len(), 4);

        session.reset(Some(ParameterState::planar(0.3, -0.5, 0.1))).unwrap();
        assert_eq!(session.params(), &ParameterState::planar(0.3, -0.5, 0.1));
    }

    #[test]
    fn test_reset_rejects_mismatched_params() {
        let mut session = session_at(and_01(), ParameterState::zeros(2), 0.1);
        session.step();
        let result = session.reset(Some(ParameterState::zeros(3)));
        assert_eq!(
            result,
            Err(PerceptronError::MismatchedDimensions {
                expected: 2,
                found: 3
            })
        );
        assert_eq!(session.epoch(), 1);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        let mixed = vec![
            DataPoint::planar(0.0, 0.0, Polarity::Negative),
            DataPoint::new(array![1.0, 2.0, 3.0], Polarity::Positive),
        ];
        let result = TrainerSession::with_seed(mixed, &TrainerConfig::default(), 0);
        assert!(matches!(
            result,
            Err(PerceptronError::MismatchedDimensions {
                expected: 2,
                found: 3
            })
        ));

        let config = TrainerConfig {
            learning_rate: -0.1,
            ..TrainerConfig::default()
        };
        let result = TrainerSession::with_seed(and_01(), &config, 0);
        assert!(matches!(result, Err(PerceptronError::InvalidLearningRate(_))));

        let config = TrainerConfig {
            boundary_epsilon: 0.0,
            ..TrainerConfig::default()
        };
        let result = TrainerSession::with_seed(and_01(), &config, 0);
        assert!(matches!(result, Err(PerceptronError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_dataset_converges_immediately() {
        let mut session: TrainerSession<f64> =
            TrainerSession::with_seed(Vec::new(), &TrainerConfig::default(), 0).unwrap();
        assert_eq!(session.dim(), 2);
        assert!(session.step().is_none());
        assert!(session.has_converged());
    }

    #[test]
    fn test_regenerate_replaces_data() {
        let mut session = session_at(and_01(), ParameterState::zeros(2), 0.1);
        session.auto_train(2);
        let data = DatasetGenerator::with_seed(3).generate(ProblemKind::Random, 15, 0.0);
        session.regenerate(data).unwrap();
        assert_eq!(session.data().len(), 15);
        assert!(session.history().is_empty());
        assert!(!session.has_converged());
    }

    #[test]
    fn test_set_learning_rate() {
        let mut session = session_at(and_01(), ParameterState::zeros(2), 0.1);
        session.set_learning_rate(0.5).unwrap();
        assert_abs_diff_eq!(session.learning_rate(), 0.5);
        let step = session.step().unwrap();
        assert_abs_diff_eq!(step.new_params.bias, 1.0, epsilon = 1e-9);
        assert!(session.set_learning_rate(f64::INFINITY).is_err());
        assert_abs_diff_eq!(session.learning_rate(), 0.5);
    }

    #[test]
    fn test_seeded_sessions_start_identically() {
        let a: TrainerSession<f64> = TrainerSession::with_seed(and_01(), &TrainerConfig::default(), 17).unwrap();
        let b: TrainerSession<f64> = TrainerSession::with_seed(and_01(), &TrainerConfig::default(), 17).unwrap();
        assert_eq!(a.params(), b.params());
    }

    #[test]
    fn test_chart_series() {
        let mut session = session_at(and_01(), ParameterState::planar(-1.0, -1.0, 1.0), 0.1);
        assert_eq!(session.weight_trajectory(), vec![ParameterState::planar(-1.0, -1.0, 1.0)]);

        session.auto_train(1000);
        let errors = session.error_series();
        let trajectory = session.weight_trajectory();
        assert_eq!(errors.len(), session.epoch());
        assert_eq!(trajectory.len(), session.epoch() + 1);
        assert_eq!(trajectory[0], ParameterState::planar(-1.0, -1.0, 1.0));
        assert_eq!(trajectory.last(), Some(session.params()));
        assert!(errors.iter().all(|&e| e > 0));
    }

    #[test]
    fn test_boundary_line() {
        let session = session_at(and_01(), ParameterState::planar(0.2, 0.2, -0.3), 0.1);
        let line = session.boundary_line(-1.2, 1.2).unwrap();
        assert!(!line.is_approximate());
        assert_abs_diff_eq!(line.start.1, (-0.2 * -1.2 + 0.3) / 0.2, epsilon = 1e-12);

        let flat = session_at(and_01(), ParameterState::planar(0.2, 0.0, 0.0), 0.1);
        assert!(flat.boundary_line(-1.0, 1.0).unwrap().is_approximate());

        let view = session.view_boundary().unwrap();
        assert_abs_diff_eq!(view.start.0, -1.2);
        assert_abs_diff_eq!(view.end.0, 1.2);
        assert_eq!(view, line);

        let data = vec![DataPoint::new(array![1.0, 2.0, 3.0], Polarity::Positive)];
        let spatial = TrainerSession::with_seed(data, &TrainerConfig::default(), 0).unwrap();
        assert!(spatial.boundary_line(-1.0, 1.0).is_none());
        assert!(spatial.view_boundary().is_none());
    }

    #[test]
    fn test_higher_dimensional_training() {
        let data = vec![
            DataPoint::new(array![1.0, 1.0, 1.0], Polarity::Positive),
            DataPoint::new(array![-1.0, -1.0, -1.0], Polarity::Negative),
            DataPoint::new(array![1.0, 0.5, 0.0], Polarity::Positive),
        ];
        let mut session = TrainerSession::with_seed(data, &TrainerConfig::default(), 2).unwrap();
        assert_eq!(session.dim(), 3);
        session.auto_train(1000);
        assert!(session.has_converged());
    }

    proptest! {
        #[test]
        fn prop_update_law(
            w1 in -1.0f64..1.0,
            w2 in -1.0f64..1.0,
            b in -1.0f64..1.0,
            x in -1.0f64..1.0,
            y in -1.0f64..1.0,
            eta in 0.001f64..1.0,
        ) {
            let params = ParameterState::planar(w1, w2, b);
            let predicted = params.predict(array![x, y].view());
            let label = predicted.flipped();
            let data = vec![DataPoint::planar(x, y, label)];
            let mut session = session_at(data, params, eta);

            let step = session.step().unwrap().clone();
            let err = f64::from(label.value() - predicted.value());
            prop_assert_eq!(step.error, label.value() - predicted.value());
            prop_assert!((step.new_params.weights[0] - (w1 + eta * err * x)).abs() < 1e-9);
            prop_assert!((step.new_params.weights[1] - (w2 + eta * err * y)).abs() < 1e-9);
            prop_assert!((step.new_params.bias - (b + eta * err)).abs() < 1e-9);
        }

        #[test]
        fn prop_first_violator_is_lowest_index(seed in 0u64..500, noise in 0.0f64..50.0) {
            let data = DatasetGenerator::with_seed(seed).generate::<f64>(ProblemKind::Random, 20, noise);
            let mut session = TrainerSession::with_seed(data.clone(), &TrainerConfig::default(), seed).unwrap();
            let params = session.params().clone();
            let expected = data
                .iter()
                .position(|p| params.predict(p.features.view()) != p.label);
            let actual = session.step().map(|s| s.index);
            prop_assert_eq!(actual, expected);
        }
    }
}
