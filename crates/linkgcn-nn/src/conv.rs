//! Graph convolution over an edge index.
//!
//! ```text
//! H' = D^{-1/2} (A + I) D^{-1/2} H W + b
//! ```
//!
//! Unlike a dense `N x N` adjacency, propagation here walks the edge list:
//! every column `(src, dst)` sends `norm * (H W)[src]` to `dst`. Cost is
//! linear in the number of edges, which keeps graphs with tens of thousands
//! of nodes cheap.

use candle_core::{DType, Device, Result, Tensor, Var};
use candle_nn::{Linear, Module};
use linkgcn_core::EdgeIndex;
use rand::Rng;

/// Symmetric-normalized adjacency with self-loops, in edge form.
///
/// Existing self-loops are dropped and exactly one per node is added.
/// Degrees are counted on the destination side. Duplicate edges keep their
/// multiplicity.
#[derive(Debug, Clone)]
pub struct GcnAdjacency {
    src: Tensor,
    dst: Tensor,
    norm: Tensor,
    num_nodes: usize,
}

impl GcnAdjacency {
    pub fn new(edge_index: &EdgeIndex, num_nodes: usize, device: &Device) -> Result<Self> {
        let mut src = Vec::with_capacity(edge_index.len() + num_nodes);
        let mut dst = Vec::with_capacity(edge_index.len() + num_nodes);
        for (s, d) in edge_index.pairs().filter(|(s, d)| s != d) {
            src.push(s);
            dst.push(d);
        }
        for node in 0..num_nodes as u32 {
            src.push(node);
            dst.push(node);
        }

        let mut degree = vec![0f32; num_nodes];
        for &d in &dst {
            degree[d as usize] += 1.0;
        }
        let inv_sqrt: Vec<f32> = degree.iter().map(|&d| d.powf(-0.5)).collect();
        let norm: Vec<f32> = src
            .iter()
            .zip(&dst)
            .map(|(&s, &d)| inv_sqrt[s as usize] * inv_sqrt[d as usize])
            .collect();

        let len = src.len();
        Ok(Self {
            src: Tensor::from_vec(src, len, device)?,
            dst: Tensor::from_vec(dst, len, device)?,
            norm: Tensor::from_vec(norm, (len, 1), device)?,
            num_nodes,
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Propagated entries, self-loops included.
    pub fn num_entries(&self) -> usize {
        self.norm.dims()[0]
    }

    /// Aggregate rows of `h` along the normalized edges.
    pub fn propagate(&self, h: &Tensor) -> Result<Tensor> {
        let messages = h.index_select(&self.src, 0)?.broadcast_mul(&self.norm)?;
        h.zeros_like()?.index_add(&self.dst, &messages, 0)
    }
}

/// Graph Convolutional Network layer.
///
/// # Reference
///
/// Kipf & Welling, "Semi-Supervised Classification with Graph Convolutional
/// Networks", ICLR 2017.
pub struct GCNConv {
    linear: Linear,
    weight: Var,
    bias: Var,
}

impl GCNConv {
    /// Create a layer with Glorot-uniform weights and zero bias.
    ///
    /// # Arguments
    /// - `in_features`: Input feature dimension
    /// - `out_features`: Output feature dimension
    /// - `rng`: Source of the initial weights
    /// - `device`: Where parameters live
    pub fn new<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        rng: &mut R,
        device: &Device,
    ) -> Result<Self> {
        let bound = (6.0 / (in_features + out_features) as f32).sqrt();
        let init: Vec<f32> = (0..in_features * out_features)
            .map(|_| rng.random_range(-bound..=bound))
            .collect();
        let weight = Var::from_tensor(&Tensor::from_vec(init, (out_features, in_features), device)?)?;
        let bias = Var::zeros(out_features, DType::F32, device)?;
        Ok(Self::from_vars(weight, bias))
    }

    /// Build from existing parameters. `weight` is `(out, in)`, `bias` is `(out,)`.
    pub fn from_vars(weight: Var, bias: Var) -> Self {
        let linear = Linear::new(weight.as_tensor().clone(), None);
        Self {
            linear,
            weight,
            bias,
        }
    }

    /// Trainable parameters.
    pub fn vars(&self) -> Vec<Var> {
        vec![self.weight.clone(), self.bias.clone()]
    }

    pub fn in_features(&self) -> usize {
        self.weight.dims()[1]
    }

    pub fn out_features(&self) -> usize {
        self.weight.dims()[0]
    }

    /// Forward pass.
    ///
    /// # Arguments
    /// - `x`: Node features (N x in_features)
    /// - `adj`: Normalized adjacency over the same N nodes
    ///
    /// # Returns
    /// - Node embeddings (N x out_features)
    pub fn forward(&self, x: &Tensor, adj: &GcnAdjacency) -> Result<Tensor> {
        // Linear transform: X * W
        let h = self.linear.forward(x)?;
        // Neighborhood aggregation: A_hat * H
        adj.propagate(&h)?.broadcast_add(self.bias.as_tensor())
    }
}
