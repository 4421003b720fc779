//! GCN link prediction on candle.
//!
//! `linkgcn-nn` trains a two-layer graph convolutional encoder with an
//! inner-product decoder to tell edges from non-edges. Graph data, splits
//! and negative sampling come from `linkgcn-core`.
//!
//! ## Encoder / Decoder
//!
//! ```text
//! Z      = GCN_2(ReLU(GCN_1(X, A)), A)       node embeddings
//! p(i,j) = sigmoid(Z_i . Z_j)                 edge probability
//! ```
//!
//! Each GCN layer is `D^{-1/2} (A + I) D^{-1/2} X W + b`
//! ([Kipf & Welling 2017](https://arxiv.org/abs/1609.02907)), computed by
//! message passing over the edge index rather than a dense adjacency.
//!
//! ## Training With Negative Sampling
//!
//! Every step scores the partition's edges as positives and the same number
//! of sampled non-edges as negatives, then minimizes binary cross-entropy.
//! Evaluation thresholds both at 0.5 and reports F1.
//!
//! ## Modules
//!
//! - [`conv`]: [`GCNConv`](conv::GCNConv) and its normalized adjacency
//! - [`model`]: [`LinkPredictor`] trait and [`GcnLinkPredictor`]
//! - [`loss`]: BCE over positive/negative predictions
//! - [`loader`]: Partition loaders on a device
//! - [`training`]: [`train_epoch`](training::train_epoch) and [`evaluate`](training::evaluate)
//! - [`config`]: [`ExperimentConfig`]
//! - [`experiment`]: [`run_experiment`](experiment::run_experiment) driver
//!
//! ## Example
//!
//! ```rust,no_run
//! use linkgcn_nn::{experiment::run_experiment, ExperimentConfig};
//!
//! let config = ExperimentConfig::default().with_seed(42);
//! let outcome = run_experiment(&config, |report| println!("{report}"))?;
//! println!("test F1: {:?}", outcome.test_f1);
//! # Ok::<(), linkgcn_nn::Error>(())
//! ```

pub mod config;
pub mod conv;
pub mod error;
pub mod experiment;
pub mod loader;
pub mod loss;
pub mod model;
pub mod training;

pub use config::ExperimentConfig;
pub use error::{Error, Result};
pub use loss::LossInput;
pub use model::{GcnLinkPredictor, LinkPredictor};
