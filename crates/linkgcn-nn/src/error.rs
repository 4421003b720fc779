//! Error types for linkgcn-nn.

use thiserror::Error;

use crate::loader::Partition;

/// Model and training error.
#[derive(Debug, Error)]
pub enum Error {
    /// Candle tensor error.
    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Graph construction error.
    #[error("graph error: {0}")]
    Graph(#[from] linkgcn_core::Error),

    /// Invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A partition with no edges was trained on or evaluated.
    #[error("{0} partition has no edges")]
    EmptyPartition(Partition),

    /// Training error.
    #[error("training error: {0}")]
    Training(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
