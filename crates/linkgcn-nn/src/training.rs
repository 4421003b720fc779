//! Training and evaluation passes.
//!
//! One training step per sample:
//! 1. Encode nodes with the sample's edges
//! 2. Score the sample's edges (positives)
//! 3. Draw as many non-edges (negatives) and score them with the same embeddings
//! 4. BCE over both, backward, optimizer step
//!
//! Evaluation repeats 1-3 without stepping and reports F1 over the
//! thresholded predictions of all samples.

use candle_core::Tensor;
use candle_nn::Optimizer;
use linkgcn_core::metrics::f1_score;
use linkgcn_core::sampling::negative_sampling;
use rand::Rng;
use tracing::trace;

use crate::error::{Error, Result};
use crate::loader::{DeviceSample, SampleLoader};
use crate::loss::{link_labels, link_loss, loss_value, LossInput};
use crate::model::LinkPredictor;

/// Positive and negative probabilities for one sample.
fn score_sample<M, R>(model: &M, sample: &DeviceSample, rng: &mut R) -> Result<(Tensor, Tensor)>
where
    M: LinkPredictor,
    R: Rng + ?Sized,
{
    let edges = sample.edge_index();
    let z = model.encode(sample.features(), sample.adjacency())?;
    let pos = model.decode(&z, edges)?;
    let negatives = negative_sampling(edges, sample.num_nodes(), edges.len(), rng);
    let neg = model.decode(&z, &negatives)?;
    Ok((pos, neg))
}

/// One pass over `loader`, updating parameters. Returns the mean loss.
pub fn train_epoch<M, O, R>(
    model: &M,
    loader: &SampleLoader,
    optimizer: &mut O,
    loss_input: LossInput,
    rng: &mut R,
) -> Result<f32>
where
    M: LinkPredictor,
    O: Optimizer,
    R: Rng + ?Sized,
{
    if loader.is_empty() {
        return Err(Error::EmptyPartition(loader.partition()));
    }

    let mut total = 0.0f32;
    for sample in loader.order(rng) {
        if sample.edge_index().is_empty() {
            return Err(Error::EmptyPartition(loader.partition()));
        }
        let (pos, neg) = score_sample(model, sample, rng)?;
        let loss = link_loss(&pos, &neg, loss_input)?;
        optimizer.backward_step(&loss)?;

        let value = loss_value(&loss)?;
        if !value.is_finite() {
            return Err(Error::Training(format!("loss became {value}")));
        }
        trace!(
            positives = sample.edge_index().len(),
            negatives = neg.dim(0)?,
            loss = value,
            "train step"
        );
        total += value;
    }
    Ok(total / loader.len() as f32)
}

/// F1 over every sample in `loader`, without touching parameters.
///
/// Fails with [`Error::EmptyPartition`] when a sample has no edges, since
/// F1 has no positives to measure against.
pub fn evaluate<M, R>(model: &M, loader: &SampleLoader, rng: &mut R) -> Result<f64>
where
    M: LinkPredictor,
    R: Rng + ?Sized,
{
    let mut predictions = Vec::new();
    let mut labels = Vec::new();

    for sample in loader.order(rng) {
        if sample.edge_index().is_empty() {
            return Err(Error::EmptyPartition(loader.partition()));
        }
        let (pos, neg) = score_sample(model, sample, rng)?;
        let pos: Vec<f32> = pos.to_vec1()?;
        let neg: Vec<f32> = neg.to_vec1()?;
        labels.extend(link_labels(pos.len(), neg.len()));
        predictions.extend(pos);
        predictions.extend(neg);
    }

    f1_score(&predictions, &labels).ok_or(Error::EmptyPartition(loader.partition()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Loaders;
    use crate::model::GcnLinkPredictor;
    use candle_core::Device;
    use candle_nn::{AdamW, ParamsAdamW};
    use linkgcn_core::split::{split_edges, SplitRatios, Splits};
    use linkgcn_core::synth::synthesize;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup(seed: u64) -> (Loaders, GcnLinkPredictor, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (features, edges) = synthesize(60, 200, 3, &mut rng).unwrap();
        let splits: Splits = split_edges(features, &edges, SplitRatios::default()).unwrap();
        let loaders = Loaders::from_splits(&splits, &Device::Cpu).unwrap();
        let model = GcnLinkPredictor::new(3, 16, 16, &mut rng, &Device::Cpu).unwrap();
        (loaders, model, rng)
    }

    fn adam(model: &GcnLinkPredictor, lr: f64) -> AdamW {
        let params = ParamsAdamW {
            lr,
            weight_decay: 0.0,
            ..Default::default()
        };
        AdamW::new(model.vars(), params).unwrap()
    }

    #[test]
    fn train_epoch_returns_finite_loss() {
        let (loaders, model, mut rng) = setup(1);
        let mut opt = adam(&model, 0.01);
        let loss = train_epoch(&model, &loaders.train, &mut opt, LossInput::Logits, &mut rng).unwrap();
        assert!(loss.is_finite());
        assert!(loss > 0.0);
    }

    #[test]
    fn training_updates_parameters() {
        let (loaders, model, mut rng) = setup(2);
        let before: Vec<f32> = model.vars()[0].flatten_all().unwrap().to_vec1().unwrap();
        let mut opt = adam(&model, 0.05);
        train_epoch(&model, &loaders.train, &mut opt, LossInput::Logits, &mut rng).unwrap();
        let after: Vec<f32> = model.vars()[0].flatten_all().unwrap().to_vec1().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn training_lowers_loss() {
        let (loaders, model, mut rng) = setup(3);
        let mut opt = adam(&model, 0.01);
        let first = train_epoch(&model, &loaders.train, &mut opt, LossInput::Probabilities, &mut rng).unwrap();
        let mut last = first;
        for _ in 0..60 {
            last = train_epoch(&model, &loaders.train, &mut opt, LossInput::Probabilities, &mut rng).unwrap();
        }
        assert!(last < first, "loss went from {first} to {last}");
    }

    #[test]
    fn evaluate_in_unit_interval() {
        let (loaders, model, mut rng) = setup(4);
        let f1 = evaluate(&model, &loaders.val, &mut rng).unwrap();
        assert!((0.0..=1.0).contains(&f1));
    }

    #[test]
    fn evaluate_leaves_parameters() {
        let (loaders, model, mut rng) = setup(5);
        let before: Vec<f32> = model.vars()[2].flatten_all().unwrap().to_vec1().unwrap();
        evaluate(&model, &loaders.test, &mut rng).unwrap();
        let after: Vec<f32> = model.vars()[2].flatten_all().unwrap().to_vec1().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_loader_rejected() {
        let (loaders, model, mut rng) = setup(6);
        let empty = SampleLoader::new(crate::loader::Partition::Val, Vec::new(), false);
        let mut opt = adam(&model, 0.01);
        assert!(matches!(
            train_epoch(&model, &empty, &mut opt, LossInput::Logits, &mut rng),
            Err(Error::EmptyPartition(_))
        ));
        assert!(evaluate(&model, &loaders.train, &mut rng).is_ok());
    }
}
