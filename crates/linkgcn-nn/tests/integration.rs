//! Integration tests for the link prediction pipeline.
//!
//! Tests the full pipeline: synthesis -> split -> training -> evaluation.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::Arc;

use candle_core::{Device, Tensor};
use linkgcn_core::split::SplitRatios;
use linkgcn_core::{EdgeIndex, EdgeList, GraphSample, NodeFeatures};
use linkgcn_nn::conv::GcnAdjacency;
use linkgcn_nn::experiment::{run_experiment, run_on_graph};
use linkgcn_nn::loader::{features_tensor, DeviceSample, Partition, SampleLoader};
use linkgcn_nn::training::evaluate;
use linkgcn_nn::{ExperimentConfig, LinkPredictor, LossInput, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Anna (0), Tim (1), Sofia (2), Lea (3).
fn social_graph() -> (NodeFeatures, EdgeList) {
    let features = NodeFeatures::new(
        vec![
            0.9, 0.1, 0.3, //
            0.8, 0.2, 0.4, //
            -0.5, 1.1, 0.0, //
            0.7, 0.3, 0.5, //
        ],
        4,
        3,
    )
    .unwrap();
    let edges = EdgeList::new(vec![[0, 1], [0, 2], [0, 3], [1, 3]]);
    (features, edges)
}

fn small_config(seed: u64) -> ExperimentConfig {
    ExperimentConfig::default()
        .with_graph(80, 240)
        .with_epochs(20)
        .with_log_every(5)
        .with_seed(seed)
}

#[test]
fn social_graph_trains_end_to_end() {
    let (features, edges) = social_graph();
    let config = ExperimentConfig::default().with_epochs(200).with_seed(7);
    let mut rng = StdRng::seed_from_u64(7);
    let mut lines = Vec::new();
    let outcome = run_on_graph(&config, features, &edges, &mut rng, |r| lines.push(r.to_string())).unwrap();

    // E = 4 splits 3 / 0 / 1: validation has nothing to score.
    assert_eq!(outcome.loaders.train.num_edges(), 3);
    assert_eq!(outcome.loaders.val.num_edges(), 0);
    assert_eq!(outcome.loaders.test.num_edges(), 1);
    assert_eq!(outcome.reports.len(), 10);
    assert!(outcome.reports.iter().all(|r| r.val_f1.is_none() && r.train_f1.is_some()));
    assert!(lines.iter().all(|l| l.ends_with("val f1: n/a")));
    assert!(outcome.losses.iter().all(|l| l.is_finite()));

    let f1 = outcome.test_f1.unwrap();
    assert!((0.0..=1.0).contains(&f1));

    // Tim-Lea exists, Sofia-Lea does not. Which side of 0.5 each lands on
    // depends on the draw, so only validity is checked here.
    let sample = &outcome.loaders.train.samples()[0];
    let z = outcome.model.encode(sample.features(), sample.adjacency()).unwrap();
    let probe = EdgeIndex::from_pairs([(1, 3), (2, 3)]);
    let p: Vec<f32> = outcome.model.decode(&z, &probe).unwrap().to_vec1().unwrap();
    assert_eq!(p.len(), 2);
    assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn same_seed_is_bit_identical() {
    let a = run_experiment(&small_config(99), |_| {}).unwrap();
    let b = run_experiment(&small_config(99), |_| {}).unwrap();
    assert_eq!(a.losses, b.losses);
    assert_eq!(a.reports, b.reports);
    assert_eq!(a.test_f1, b.test_f1);
}

#[test]
fn different_seeds_differ() {
    let a = run_experiment(&small_config(1), |_| {}).unwrap();
    let b = run_experiment(&small_config(2), |_| {}).unwrap();
    assert_ne!(a.losses, b.losses);
}

#[test]
fn probability_loss_runs() {
    let config = small_config(5).with_loss(LossInput::Probabilities);
    let outcome = run_experiment(&config, |_| {}).unwrap();
    assert_eq!(outcome.losses.len(), 20);
    assert!(outcome.losses.iter().all(|l| l.is_finite() && *l >= 0.0));
}

#[test]
fn custom_split_is_honoured() {
    let config = small_config(6).with_split(SplitRatios::new(0.5, 0.25, 0.25).unwrap());
    let outcome = run_experiment(&config, |_| {}).unwrap();
    assert_eq!(outcome.loaders.train.num_edges(), 120);
    assert_eq!(outcome.loaders.val.num_edges(), 60);
    assert_eq!(outcome.loaders.test.num_edges(), 60);
}

/// Scores true edges `hit` and everything else `miss`.
struct OracleScorer {
    edges: HashSet<(u32, u32)>,
    hit: f32,
    miss: f32,
}

impl LinkPredictor for OracleScorer {
    fn encode(&self, features: &Tensor, _adjacency: &GcnAdjacency) -> Result<Tensor> {
        Ok(features.clone())
    }

    fn decode(&self, embeddings: &Tensor, edges: &EdgeIndex) -> Result<Tensor> {
        let scores: Vec<f32> = edges
            .pairs()
            .map(|pair| if self.edges.contains(&pair) { self.hit } else { self.miss })
            .collect();
        Ok(Tensor::from_vec(scores, edges.len(), embeddings.device())?)
    }
}

fn oracle_loader() -> (SampleLoader, HashSet<(u32, u32)>) {
    let features = Arc::new(NodeFeatures::new(vec![0.0; 30], 10, 3).unwrap());
    let index = EdgeIndex::from_pairs((0..10).map(|i| (i, (i + 1) % 10)));
    let truth: HashSet<(u32, u32)> = index.pairs().collect();
    let tensor = features_tensor(&features, &Device::Cpu).unwrap();
    let sample = GraphSample::new(features, index).unwrap();
    let loader = SampleLoader::new(Partition::Test, vec![DeviceSample::new(&sample, tensor).unwrap()], false);
    (loader, truth)
}

#[test]
fn evaluate_perfect_scorer_is_one() {
    let (loader, edges) = oracle_loader();
    let model = OracleScorer {
        edges,
        hit: 0.9,
        miss: 0.1,
    };
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(evaluate(&model, &loader, &mut rng).unwrap(), 1.0);
}

#[test]
fn evaluate_inverted_scorer_is_zero() {
    let (loader, edges) = oracle_loader();
    let model = OracleScorer {
        edges,
        hit: 0.1,
        miss: 0.9,
    };
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(evaluate(&model, &loader, &mut rng).unwrap(), 0.0);
}

#[test]
fn evaluate_empty_partition_is_reported() {
    let features = Arc::new(NodeFeatures::new(vec![0.0; 12], 4, 3).unwrap());
    let tensor = features_tensor(&features, &Device::Cpu).unwrap();
    let sample = GraphSample::new(features, EdgeIndex::default()).unwrap();
    let loader = SampleLoader::new(Partition::Val, vec![DeviceSample::new(&sample, tensor).unwrap()], false);
    let model = OracleScorer {
        edges: HashSet::new(),
        hit: 0.9,
        miss: 0.1,
    };
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        evaluate(&model, &loader, &mut rng),
        Err(linkgcn_nn::Error::EmptyPartition(Partition::Val))
    ));
}
