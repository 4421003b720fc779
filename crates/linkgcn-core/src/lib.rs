//! Graph structure layer for link prediction experiments.
//!
//! `linkgcn-core` holds everything that does not need tensors: the graph
//! data model, random graph synthesis, edge splitting, negative sampling and
//! the F1 metric. The GCN model and training loop live in `linkgcn-nn`.
//!
//! # The Link Prediction Task
//!
//! Given node features and a partial edge list, decide whether an edge
//! exists between a pair of nodes. A model is trained on observed edges
//! (positives) against sampled non-edges (negatives):
//!
//! ```text
//! synthesize -> split -> { train, evaluate } per epoch -> test F1
//! ```
//!
//! # Modules
//!
//! - [`graph`]: [`NodeFeatures`], [`EdgeList`], [`EdgeIndex`], [`GraphSample`]
//! - [`synth`]: Random feature matrix and edge list with isolated-node repair
//! - [`split`]: Prefix split of edges into train/validation/test
//! - [`sampling`]: Negative sampling of non-existing edges
//! - [`metrics`]: F1 score over thresholded predictions
//!
//! # Example
//!
//! ```rust
//! use linkgcn_core::{split::{split_edges, SplitRatios}, synth::synthesize};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let (features, edges) = synthesize(100, 200, 3, &mut rng).unwrap();
//! let splits = split_edges(features, &edges, SplitRatios::default()).unwrap();
//! assert_eq!(splits.train.num_edges(), 160);
//! assert_eq!(splits.val.num_edges(), 20);
//! assert_eq!(splits.test.num_edges(), 20);
//! ```

pub mod error;
pub mod graph;
pub mod metrics;
pub mod sampling;
pub mod split;
pub mod synth;

pub use error::{Error, Result};
pub use graph::{EdgeIndex, EdgeList, GraphSample, NodeFeatures};
