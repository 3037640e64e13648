//! Perceptron lab: the numeric engine behind an interactive perceptron course.
//!
//! The algorithms live in their own crates and are re-exported here:
//!
//! * [`perceptron`]: dataset generation and the online training session.
//! * [`gradient_descent`]: batch vs. noisy descent on a loss surface.
//! * [`mlp`]: a 2-2-1 network that solves XOR by backpropagation.
//!
//! [`TrainingLab`] wires a dataset generator to a training session the way
//! the lab's "new data" and "reset" controls do.

use log::info;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub use gradient_descent::{self, Bowl, DescentConfig, DescentMode, DescentSimulator, LossSurface, Snapshot};
pub use lab_helpers::{self, BoundaryLine, DataPoint, Float, ParameterState, Polarity};
pub use mlp::{self, Mlp, MlpConfig};
pub use perceptron::{
    self, DatasetConfig, DatasetGenerator, PerceptronError, ProblemKind, TrainerConfig, TrainerSession,
    TrainingStep,
};

/// A training session paired with the generator that feeds it.
#[derive(Debug, Clone)]
pub struct TrainingLab<F: Float> {
    generator: DatasetGenerator,
    dataset: DatasetConfig,
    session: TrainerSession<F>,
}

impl<F: Float> TrainingLab<F> {
    /// Generates a dataset and starts a session on it.
    ///
    /// With a `seed`, both the data and the initial parameters are reproducible.
    pub fn new(dataset: DatasetConfig, trainer: &TrainerConfig, seed: Option<u64>) -> Result<Self, PerceptronError> {
        dataset.validate()?;
        let mut master = Xoshiro256PlusPlus::seed_from_u64(seed.unwrap_or_else(rand::random));
        let mut generator = DatasetGenerator::with_seed(master.random());
        let data = generator.generate_from(&dataset);
        let session = TrainerSession::with_seed(data, trainer, master.random())?;
        Ok(Self {
            generator,
            dataset,
            session,
        })
    }

    pub fn session(&self) -> &TrainerSession<F> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut TrainerSession<F> {
        &mut self.session
    }

    pub fn dataset_config(&self) -> &DatasetConfig {
        &self.dataset
    }

    /// Draws a fresh dataset with the current configuration and restarts training.
    pub fn regenerate(&mut self) -> Result<(), PerceptronError> {
        let data = self.generator.generate_from(&self.dataset);
        info!(
            "regenerated {:?} dataset with {} points",
            self.dataset.kind,
            data.len()
        );
        self.session.regenerate(data)
    }

    /// Switches to a new dataset configuration and regenerates.
    pub fn set_dataset_config(&mut self, dataset: DatasetConfig) -> Result<(), PerceptronError> {
        dataset.validate()?;
        self.dataset = dataset;
        self.regenerate()
    }
}
