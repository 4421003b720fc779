//! End-to-end link prediction run.
//!
//! ```text
//! seed -> synthesize -> split -> loaders -> model + Adam
//!      -> epochs { train; every log_every: train F1, val F1 }
//!      -> test F1
//! ```
//!
//! One RNG drives synthesis, weight initialisation and every negative
//! sample, so a fixed seed reproduces the whole trajectory.

use std::fmt;

use candle_core::Device;
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use linkgcn_core::split::split_edges;
use linkgcn_core::synth::synthesize;
use linkgcn_core::{EdgeList, NodeFeatures};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::ExperimentConfig;
use crate::error::{Error, Result};
use crate::loader::{Loaders, SampleLoader};
use crate::model::GcnLinkPredictor;
use crate::training::{evaluate, train_epoch};

/// Periodic progress of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    /// 1-based epoch number.
    pub epoch: usize,
    pub loss: f32,
    /// `None` when the partition has no edges.
    pub train_f1: Option<f64>,
    pub val_f1: Option<f64>,
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Epoch: {}, Loss: {:.4}, train f1: {}, val f1: {}",
            self.epoch,
            self.loss,
            Metric(self.train_f1),
            Metric(self.val_f1)
        )
    }
}

/// Four-decimal metric, `n/a` when undefined.
#[derive(Debug, Clone, Copy)]
pub struct Metric(pub Option<f64>);

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.4}"),
            None => f.write_str("n/a"),
        }
    }
}

/// Everything a finished run produced.
pub struct ExperimentOutcome {
    /// Mean training loss of every epoch.
    pub losses: Vec<f32>,
    /// One report per `log_every` epochs.
    pub reports: Vec<EpochReport>,
    /// F1 on the test partition, `None` if it has no edges.
    pub test_f1: Option<f64>,
    pub model: GcnLinkPredictor,
    pub loaders: Loaders,
}

/// Synthesize a graph from `config` and train on it.
pub fn run_experiment<F>(config: &ExperimentConfig, on_report: F) -> Result<ExperimentOutcome>
where
    F: FnMut(&EpochReport),
{
    config.validate()?;
    config.validate_graph()?;
    let mut rng = config.rng();
    let (features, edges) = synthesize(config.num_nodes, config.num_edges, config.feature_dim, &mut rng)?;
    run_on_graph(config, features, &edges, &mut rng, on_report)
}

/// Train on a given graph. `config.num_nodes` and `config.num_edges` are
/// ignored in favour of the graph's own sizes.
pub fn run_on_graph<R, F>(
    config: &ExperimentConfig,
    features: NodeFeatures,
    edges: &EdgeList,
    rng: &mut R,
    mut on_report: F,
) -> Result<ExperimentOutcome>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochReport),
{
    config.validate()?;
    if features.dim() != config.feature_dim {
        return Err(Error::InvalidConfig(format!(
            "features have width {}, config expects {}",
            features.dim(),
            config.feature_dim
        )));
    }

    let device = Device::Cpu;
    let num_nodes = features.num_nodes();
    let splits = split_edges(features, edges, config.split)?;
    let loaders = Loaders::from_splits(&splits, &device)?;
    info!(
        num_nodes,
        train_edges = loaders.train.num_edges(),
        val_edges = loaders.val.num_edges(),
        test_edges = loaders.test.num_edges(),
        "split graph"
    );

    let model = GcnLinkPredictor::new(config.feature_dim, config.hidden_dim, config.output_dim, rng, &device)?;
    let params = ParamsAdamW {
        lr: config.learning_rate,
        weight_decay: 0.0,
        ..Default::default()
    };
    let mut optimizer = AdamW::new(model.vars(), params)?;

    let mut losses = Vec::with_capacity(config.epochs);
    let mut reports = Vec::new();
    for epoch in 1..=config.epochs {
        let loss = train_epoch(&model, &loaders.train, &mut optimizer, config.loss, rng)?;
        losses.push(loss);
        debug!(epoch, loss, "epoch done");

        if epoch % config.log_every == 0 {
            let report = EpochReport {
                epoch,
                loss,
                train_f1: metric(&model, &loaders.train, rng)?,
                val_f1: metric(&model, &loaders.val, rng)?,
            };
            on_report(&report);
            reports.push(report);
        }
    }

    let test_f1 = metric(&model, &loaders.test, rng)?;
    info!(epochs = config.epochs, test_f1 = ?test_f1, "finished");

    Ok(ExperimentOutcome {
        losses,
        reports,
        test_f1,
        model,
        loaders,
    })
}

/// Evaluate, turning an empty partition into `None`.
fn metric<R: Rng + ?Sized>(model: &GcnLinkPredictor, loader: &SampleLoader, rng: &mut R) -> Result<Option<f64>> {
    match evaluate(model, loader, rng) {
        Ok(f1) => Ok(Some(f1)),
        Err(Error::EmptyPartition(partition)) => {
            warn!(%partition, "partition has no edges, F1 undefined");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
