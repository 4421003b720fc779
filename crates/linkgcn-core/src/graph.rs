//! Graph data model.
//!
//! Two views of connectivity are used:
//!
//! - [`EdgeList`]: `[E, 2]` rows of `(src, dst)`, the order edges were generated in
//! - [`EdgeIndex`]: the transposed `2 x E` view, one row of sources and one
//!   of destinations. This is what message passing and decoding consume.
//!
//! Pairs are directed index tuples. Nothing here enforces undirected
//! semantics, simplicity or connectivity.

use std::ops::Range;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Dense row-major `[num_nodes, dim]` feature matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFeatures {
    data: Vec<f32>,
    num_nodes: usize,
    dim: usize,
}

impl NodeFeatures {
    /// Wrap a row-major buffer. Fails if `data.len() != num_nodes * dim`.
    pub fn new(data: Vec<f32>, num_nodes: usize, dim: usize) -> Result<Self> {
        let expected = num_nodes * dim;
        if data.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            num_nodes,
            dim,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Feature dimension F.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Features of one node.
    pub fn row(&self, node: usize) -> &[f32] {
        &self.data[node * self.dim..(node + 1) * self.dim]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Ordered `[E, 2]` list of directed `(src, dst)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList {
    edges: Vec<[u32; 2]>,
}

impl EdgeList {
    pub fn new(edges: Vec<[u32; 2]>) -> Self {
        Self { edges }
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn as_slice(&self) -> &[[u32; 2]] {
        &self.edges
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u32; 2]> {
        self.edges.iter()
    }

    /// Check every endpoint lies in `[0, num_nodes)`.
    pub fn validate(&self, num_nodes: usize) -> Result<()> {
        check_range(self.edges.iter().flatten().copied(), num_nodes)
    }
}

impl From<Vec<[u32; 2]>> for EdgeList {
    fn from(edges: Vec<[u32; 2]>) -> Self {
        Self::new(edges)
    }
}

/// Transposed `2 x E` edge representation.
///
/// Column `k` is the pair `(src[k], dst[k])`. The same type describes
/// message-passing connectivity, positive targets and sampled negatives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeIndex {
    src: Vec<u32>,
    dst: Vec<u32>,
}

impl EdgeIndex {
    /// Build from the two rows. Fails if they differ in length.
    pub fn new(src: Vec<u32>, dst: Vec<u32>) -> Result<Self> {
        if src.len() != dst.len() {
            return Err(Error::ShapeMismatch {
                expected: src.len(),
                got: dst.len(),
            });
        }
        Ok(Self { src, dst })
    }

    /// Transpose an edge list, keeping its order.
    pub fn from_edge_list(edges: &EdgeList) -> Self {
        Self::from_pairs(edges.iter().map(|&[s, d]| (s, d)))
    }

    pub fn from_pairs<I: IntoIterator<Item = (u32, u32)>>(pairs: I) -> Self {
        let (src, dst) = pairs.into_iter().unzip();
        Self { src, dst }
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    pub fn src(&self) -> &[u32] {
        &self.src
    }

    pub fn dst(&self) -> &[u32] {
        &self.dst
    }

    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }

    /// Copy out a contiguous range of columns.
    ///
    /// # Panics
    /// If `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            src: self.src[range.clone()].to_vec(),
            dst: self.dst[range].to_vec(),
        }
    }

    /// Concatenate column-wise, in order.
    pub fn concat(parts: &[&EdgeIndex]) -> Self {
        let total = parts.iter().map(|p| p.len()).sum();
        let mut src = Vec::with_capacity(total);
        let mut dst = Vec::with_capacity(total);
        for part in parts {
            src.extend_from_slice(&part.src);
            dst.extend_from_slice(&part.dst);
        }
        Self { src, dst }
    }

    /// Check every endpoint lies in `[0, num_nodes)`.
    pub fn validate(&self, num_nodes: usize) -> Result<()> {
        check_range(self.src.iter().chain(self.dst.iter()).copied(), num_nodes)
    }
}

fn check_range(nodes: impl Iterator<Item = u32>, num_nodes: usize) -> Result<()> {
    for node in nodes {
        if node as usize >= num_nodes {
            return Err(Error::NodeOutOfRange { node, num_nodes });
        }
    }
    Ok(())
}

/// One partition of the graph: shared features plus its own edge slice.
#[derive(Debug, Clone)]
pub struct GraphSample {
    features: Arc<NodeFeatures>,
    edge_index: EdgeIndex,
}

impl GraphSample {
    /// Pair features with an edge index after checking node ranges.
    pub fn new(features: Arc<NodeFeatures>, edge_index: EdgeIndex) -> Result<Self> {
        edge_index.validate(features.num_nodes())?;
        Ok(Self {
            features,
            edge_index,
        })
    }

    pub fn features(&self) -> &Arc<NodeFeatures> {
        &self.features
    }

    pub fn edge_index(&self) -> &EdgeIndex {
        &self.edge_index
    }

    pub fn num_nodes(&self) -> usize {
        self.features.num_nodes()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_index.len()
    }
}
