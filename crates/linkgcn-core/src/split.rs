//! Train/validation/test edge splitting.
//!
//! The split is a strict prefix split over the transposed edge list, not a
//! shuffle: partition composition depends only on generation order. All
//! partitions share one feature matrix, so evaluation embeds nodes using
//! only that partition's edges for message passing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{EdgeIndex, EdgeList, GraphSample, NodeFeatures};

const RATIO_TOLERANCE: f64 = 1e-6;

/// Fractions of edges assigned to each partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    pub train: f64,
    pub val: f64,
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: 0.8,
            val: 0.1,
            test: 0.1,
        }
    }
}

impl SplitRatios {
    pub fn new(train: f64, val: f64, test: f64) -> Result<Self> {
        let ratios = Self { train, val, test };
        ratios.validate()?;
        Ok(ratios)
    }

    /// Each ratio in `[0, 1]`, summing to 1.
    pub fn validate(&self) -> Result<()> {
        for (name, r) in [("train", self.train), ("val", self.val), ("test", self.test)] {
            if !(0.0..=1.0).contains(&r) {
                return Err(Error::InvalidConfig(format!(
                    "{name} ratio {r} outside [0, 1]"
                )));
            }
        }
        let sum = self.train + self.val + self.test;
        if (sum - 1.0).abs() > RATIO_TOLERANCE {
            return Err(Error::InvalidConfig(format!(
                "split ratios sum to {sum}, expected 1"
            )));
        }
        Ok(())
    }

    /// Column counts `(train, val, test)` for `num_edges` edges.
    ///
    /// Train and validation are floored; test takes the remainder.
    pub fn sizes(&self, num_edges: usize) -> (usize, usize, usize) {
        let train = ((self.train * num_edges as f64).floor() as usize).min(num_edges);
        let val = ((self.val * num_edges as f64).floor() as usize).min(num_edges - train);
        (train, val, num_edges - train - val)
    }
}

/// The three partitions of one graph.
#[derive(Debug, Clone)]
pub struct Splits {
    pub train: GraphSample,
    pub val: GraphSample,
    pub test: GraphSample,
}

/// Split `edges` into prefix partitions at `ratios`.
pub fn split_edges(features: NodeFeatures, edges: &EdgeList, ratios: SplitRatios) -> Result<Splits> {
    ratios.validate()?;
    let features = Arc::new(features);
    let index = EdgeIndex::from_edge_list(edges);
    index.validate(features.num_nodes())?;

    let (n_train, n_val, _) = ratios.sizes(index.len());
    let train = index.slice(0..n_train);
    let val = index.slice(n_train..n_train + n_val);
    let test = index.slice(n_train + n_val..index.len());

    Ok(Splits {
        train: GraphSample::new(Arc::clone(&features), train)?,
        val: GraphSample::new(Arc::clone(&features), val)?,
        test: GraphSample::new(features, test)?,
    })
}
