//! Error types for linkgcn-core.

use thiserror::Error;

/// Graph construction error.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A node index outside `[0, num_nodes)`.
    #[error("node {node} out of range for graph with {num_nodes} nodes")]
    NodeOutOfRange { node: u32, num_nodes: usize },

    /// Shape mismatch.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
