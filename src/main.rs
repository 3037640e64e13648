// Command-line host for the perceptron lab engine.
use clap::{Parser, Subcommand, ValueEnum};
use perceptron_lab::{
    DatasetConfig, DescentConfig, DescentMode, DescentSimulator, Mlp, MlpConfig, ProblemKind, TrainerConfig,
    TrainingLab, gradient_descent,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::error::Error;

#[derive(Debug, Parser)]
#[command(name = "perceptron-lab", about = "Train and inspect toy linear classifiers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a perceptron on a generated dataset.
    Train {
        #[arg(long, value_enum, default_value_t = Problem::Random)]
        problem: Problem,
        #[arg(long, default_value_t = 20)]
        count: usize,
        /// Percentage of random labels to flip.
        #[arg(long, default_value_t = 0.0)]
        noise: f64,
        #[arg(long, default_value_t = 0.1)]
        learning_rate: f64,
        #[arg(long, default_value_t = 1000)]
        max_steps: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Print every recorded update.
        #[arg(long)]
        history: bool,
    },
    /// Run gradient descent on the bowl x² + y².
    Descent {
        #[arg(long, value_enum, default_value_t = Mode::Batch)]
        mode: Mode,
        #[arg(long, default_value_t = gradient_descent::DEFAULT_LEARNING_RATE)]
        learning_rate: f64,
        #[arg(long, default_value_t = gradient_descent::DEFAULT_START.0, allow_hyphen_values = true)]
        x0: f64,
        #[arg(long, default_value_t = gradient_descent::DEFAULT_START.1, allow_hyphen_values = true)]
        y0: f64,
        #[arg(long, default_value_t = 20)]
        steps: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Train a 2-2-1 network on XOR.
    XorMlp {
        #[arg(long, default_value_t = 0.5)]
        learning_rate: f64,
        #[arg(long, default_value_t = 10_000)]
        epochs: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Problem {
    Random,
    And,
    Or,
    Xor,
}

impl From<Problem> for ProblemKind {
    fn from(problem: Problem) -> Self {
        match problem {
            Problem::Random => ProblemKind::Random,
            Problem::And => ProblemKind::And,
            Problem::Or => ProblemKind::Or,
            Problem::Xor => ProblemKind::Xor,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Batch,
    Stochastic,
}

impl From<Mode> for DescentMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Batch => DescentMode::Batch,
            Mode::Stochastic => DescentMode::Stochastic,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Train {
            problem,
            count,
            noise,
            learning_rate,
            max_steps,
            seed,
            history,
        } => {
            let dataset = DatasetConfig {
                kind: problem.into(),
                count,
                noise_percent: noise,
            };
            let trainer = TrainerConfig {
                learning_rate,
                ..TrainerConfig::default()
            };
            let mut lab: TrainingLab<f64> = TrainingLab::new(dataset, &trainer, seed)?;
            let session = lab.session_mut();
            println!("initial parameters: {:?}", session.params());
            let steps = session.auto_train(max_steps);
            if history {
                for step in steps {
                    println!(
                        "epoch {:>4}  point {:>3}  error {:+}  misclassified {:>3}  w = {}  b = {:.4}",
                        step.epoch,
                        step.index,
                        step.error,
                        step.misclassified_before,
                        step.new_params.weights,
                        step.new_params.bias
                    );
                }
            }
            let session = lab.session();
            println!("updates: {}", session.epoch());
            println!("converged: {}", session.has_converged());
            println!(
                "misclassified: {} of {}",
                session.misclassified_count(),
                session.data().len()
            );
            println!("final parameters: {:?}", session.params());
            if let Some(line) = session.view_boundary() {
                println!(
                    "boundary: ({:.4}, {:.4}) -> ({:.4}, {:.4}){}",
                    line.start.0,
                    line.start.1,
                    line.end.0,
                    line.end.1,
                    if line.is_approximate() { " (approximate)" } else { "" }
                );
            }
        }
        Command::Descent {
            mode,
            learning_rate,
            x0,
            y0,
            steps,
            seed,
        } => {
            let config = DescentConfig {
                steps,
                ..DescentConfig::default()
            };
            let rng = Xoshiro256PlusPlus::seed_from_u64(seed.unwrap_or_else(rand::random));
            let mut simulator = DescentSimulator::with_parts(perceptron_lab::Bowl, config, rng)?;
            for (i, s) in simulator
                .simulate(mode.into(), learning_rate, x0, y0)
                .iter()
                .enumerate()
            {
                println!("{:>3}  x = {:>10.4}  y = {:>10.4}  loss = {:>12.4}", i, s.x, s.y, s.loss);
            }
        }
        Command::XorMlp {
            learning_rate,
            epochs,
            seed,
        } => {
            let config = MlpConfig { learning_rate, epochs };
            let mut mlp: Mlp<f64> = Mlp::with_seed(seed.unwrap_or_else(rand::random));
            let data = perceptron_lab::mlp::xor_truth_table::<f64>();
            let losses = mlp.train(&data, &config)?;
            if let Some(last) = losses.last() {
                println!("final mean loss: {:.6}", last);
            }
            for point in &data {
                let output = mlp.forward(point.features.view())?.output;
                println!(
                    "input {}  target {}  output {:.4}",
                    point.features, point.label as u8, output
                );
            }
        }
    }
    Ok(())
}
