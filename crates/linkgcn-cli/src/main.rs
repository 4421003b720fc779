//! linkgcn CLI - GCN link prediction on a synthetic graph.
//!
//! # Usage
//!
//! ```bash
//! # Default experiment: 10k nodes, 20k edges, 200 epochs
//! linkgcn
//!
//! # Smaller, reproducible run
//! linkgcn --nodes 500 --edges 1500 --epochs 60 --seed 42
//!
//! # Plain BCE on probabilities instead of the logit reading
//! linkgcn --loss probabilities
//!
//! # Full configuration from JSON
//! linkgcn --config experiment.json
//!
//! # More logging (stderr)
//! linkgcn -vv
//! RUST_LOG=linkgcn_nn=debug linkgcn
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use linkgcn_core::split::SplitRatios;
use linkgcn_nn::experiment::{run_experiment, Metric};
use linkgcn_nn::{ExperimentConfig, LossInput};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "linkgcn")]
#[command(about = "Train a GCN link predictor on a synthetic graph", long_about = None)]
struct Cli {
    /// JSON experiment configuration; other hyperparameter flags are ignored
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Training epochs
    #[arg(long, default_value = "200")]
    epochs: usize,

    /// Number of synthesized nodes
    #[arg(long, default_value = "10000")]
    nodes: usize,

    /// Number of synthesized edges
    #[arg(long, default_value = "20000")]
    edges: usize,

    /// Node feature width
    #[arg(long, default_value = "3")]
    feature_dim: usize,

    /// Hidden layer width
    #[arg(long, default_value = "16")]
    hidden_dim: usize,

    /// Embedding width
    #[arg(long, default_value = "16")]
    output_dim: usize,

    /// Learning rate
    #[arg(long, default_value = "0.09")]
    lr: f64,

    /// Report every N epochs
    #[arg(long, default_value = "20")]
    log_every: usize,

    /// Fraction of edges used for training
    #[arg(long, default_value = "0.8")]
    train_ratio: f64,

    /// Fraction of edges used for validation
    #[arg(long, default_value = "0.1")]
    val_ratio: f64,

    /// Fraction of edges used for testing
    #[arg(long, default_value = "0.1")]
    test_ratio: f64,

    /// How the loss reads decoder outputs
    #[arg(long, default_value = "logits")]
    loss: LossArg,

    /// Random seed (unseeded runs differ every time)
    #[arg(long)]
    seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum LossArg {
    Logits,
    Probabilities,
}

impl From<LossArg> for LossInput {
    fn from(arg: LossArg) -> Self {
        match arg {
            LossArg::Logits => LossInput::Logits,
            LossArg::Probabilities => LossInput::Probabilities,
        }
    }
}

impl Cli {
    fn experiment_config(&self) -> Result<ExperimentConfig> {
        if let Some(path) = &self.config {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            return serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config: {}", path.display()));
        }

        let split = SplitRatios::new(self.train_ratio, self.val_ratio, self.test_ratio)
            .context("Invalid split ratios")?;
        Ok(ExperimentConfig {
            num_nodes: self.nodes,
            num_edges: self.edges,
            feature_dim: self.feature_dim,
            hidden_dim: self.hidden_dim,
            output_dim: self.output_dim,
            learning_rate: self.lr,
            epochs: self.epochs,
            log_every: self.log_every,
            split,
            loss: self.loss.into(),
            seed: self.seed,
        })
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.experiment_config()?;
    tracing::info!(?config, "starting experiment");

    let outcome = run_experiment(&config, |report| println!("{report}")).context("Experiment failed")?;

    println!("Test Accuracy: {}", Metric(outcome.test_f1));
    Ok(())
}
