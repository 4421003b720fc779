//! Experiment configuration.

use linkgcn_core::split::SplitRatios;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::loss::LossInput;

/// Hyperparameters of one link prediction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Synthesized node count V (default: 10,000).
    pub num_nodes: usize,
    /// Synthesized edge count E (default: 20,000).
    pub num_edges: usize,
    /// Node feature width F (default: 3).
    pub feature_dim: usize,
    /// Width of the first GCN layer (default: 16).
    pub hidden_dim: usize,
    /// Embedding width (default: 16).
    pub output_dim: usize,
    /// Adam learning rate (default: 0.09).
    pub learning_rate: f64,
    /// Training epochs (default: 200).
    pub epochs: usize,
    /// Evaluate and report every this many epochs (default: 20).
    pub log_every: usize,
    /// Train/validation/test edge fractions (default: 0.8/0.1/0.1).
    pub split: SplitRatios,
    /// How the loss reads decoder outputs (default: logits).
    pub loss: LossInput,
    /// Random seed. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_nodes: 10_000,
            num_edges: 20_000,
            feature_dim: 3,
            hidden_dim: 16,
            output_dim: 16,
            learning_rate: 0.09,
            epochs: 200,
            log_every: 20,
            split: SplitRatios::default(),
            loss: LossInput::default(),
            seed: None,
        }
    }
}

impl ExperimentConfig {
    pub fn with_graph(mut self, num_nodes: usize, num_edges: usize) -> Self {
        self.num_nodes = num_nodes;
        self.num_edges = num_edges;
        self
    }

    pub fn with_dims(mut self, hidden_dim: usize, output_dim: usize) -> Self {
        self.hidden_dim = hidden_dim;
        self.output_dim = output_dim;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    pub fn with_split(mut self, split: SplitRatios) -> Self {
        self.split = split;
        self
    }

    pub fn with_loss(mut self, loss: LossInput) -> Self {
        self.loss = loss;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check sizes, dimensions, learning rate and split ratios.
    ///
    /// Graph sizes are checked separately by [`validate_graph`](Self::validate_graph)
    /// so a config can drive a user-supplied graph.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("feature_dim", self.feature_dim),
            ("hidden_dim", self.hidden_dim),
            ("output_dim", self.output_dim),
            ("log_every", self.log_every),
        ] {
            if value == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        self.split.validate()?;
        Ok(())
    }

    /// Check the synthesized graph can cover every node.
    pub fn validate_graph(&self) -> Result<()> {
        if self.num_nodes == 0 || self.num_edges == 0 {
            return Err(Error::InvalidConfig(
                "num_nodes and num_edges must be positive".into(),
            ));
        }
        if self.num_edges.saturating_mul(2) < self.num_nodes {
            return Err(Error::InvalidConfig(format!(
                "{} edges cannot touch all {} nodes",
                self.num_edges, self.num_nodes
            )));
        }
        Ok(())
    }

    /// The run's random source: seeded if `seed` is set.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
