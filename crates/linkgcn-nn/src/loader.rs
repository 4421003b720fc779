//! Partition loaders.
//!
//! A loader holds the samples of one partition, already moved to a device
//! with their normalized adjacency built. The experiment uses one sample per
//! partition (batch size 1); loaders can hold more.

use std::fmt;

use candle_core::{Device, Tensor};
use linkgcn_core::split::Splits;
use linkgcn_core::{EdgeIndex, GraphSample, NodeFeatures};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::conv::GcnAdjacency;
use crate::error::Result;

/// Which split a loader serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Train,
    Val,
    Test,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Partition::Train => "train",
            Partition::Val => "val",
            Partition::Test => "test",
        })
    }
}

/// A graph sample resident on a device.
#[derive(Debug, Clone)]
pub struct DeviceSample {
    features: Tensor,
    edge_index: EdgeIndex,
    adjacency: GcnAdjacency,
}

impl DeviceSample {
    /// Pair an already-uploaded `features` tensor with `sample`'s edges.
    ///
    /// Cloning a tensor shares its storage, so partitions built from the
    /// same tensor share one copy of the features.
    pub fn new(sample: &GraphSample, features: Tensor) -> Result<Self> {
        let adjacency = GcnAdjacency::new(sample.edge_index(), sample.num_nodes(), features.device())?;
        Ok(Self {
            features,
            edge_index: sample.edge_index().clone(),
            adjacency,
        })
    }

    pub fn features(&self) -> &Tensor {
        &self.features
    }

    pub fn edge_index(&self) -> &EdgeIndex {
        &self.edge_index
    }

    pub fn adjacency(&self) -> &GcnAdjacency {
        &self.adjacency
    }

    pub fn num_nodes(&self) -> usize {
        self.adjacency.num_nodes()
    }
}

/// Upload a feature matrix as an `(N, F)` f32 tensor.
pub fn features_tensor(features: &NodeFeatures, device: &Device) -> Result<Tensor> {
    Ok(Tensor::from_slice(
        features.as_slice(),
        (features.num_nodes(), features.dim()),
        device,
    )?)
}

/// Samples of one partition.
#[derive(Debug, Clone)]
pub struct SampleLoader {
    partition: Partition,
    samples: Vec<DeviceSample>,
    shuffle: bool,
}

impl SampleLoader {
    pub fn new(partition: Partition, samples: Vec<DeviceSample>, shuffle: bool) -> Self {
        Self {
            partition,
            samples,
            shuffle,
        }
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn samples(&self) -> &[DeviceSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    /// Total positive edges across samples.
    pub fn num_edges(&self) -> usize {
        self.samples.iter().map(|s| s.edge_index().len()).sum()
    }

    /// Iteration order for one pass, shuffled if the loader allows it.
    pub fn order<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&DeviceSample> {
        let mut order: Vec<&DeviceSample> = self.samples.iter().collect();
        if self.shuffle {
            order.shuffle(rng);
        }
        order
    }
}

/// Train/validation/test loaders over one shared features tensor.
#[derive(Debug, Clone)]
pub struct Loaders {
    pub train: SampleLoader,
    pub val: SampleLoader,
    pub test: SampleLoader,
}

impl Loaders {
    /// One single-sample loader per split. Only training is shuffle-eligible.
    pub fn from_splits(splits: &Splits, device: &Device) -> Result<Self> {
        let features = features_tensor(splits.train.features(), device)?;
        let sample = |s: &GraphSample| DeviceSample::new(s, features.clone());
        Ok(Self {
            train: SampleLoader::new(Partition::Train, vec![sample(&splits.train)?], true),
            val: SampleLoader::new(Partition::Val, vec![sample(&splits.val)?], false),
            test: SampleLoader::new(Partition::Test, vec![sample(&splits.test)?], false),
        })
    }
}
