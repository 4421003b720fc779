//! Encoder/decoder model for link prediction.
//!
//! ```text
//! encode:  Z = GCN_2(ReLU(GCN_1(X, A)), A)
//! decode:  p(i, j) = sigmoid(<Z_i, Z_j>)
//! ```
//!
//! The encoder runs on one connectivity (the partition's edges) while the
//! decoder can score any set of pairs, such as sampled negatives.

use candle_core::{DType, Device, Tensor, Var};
use linkgcn_core::EdgeIndex;
use rand::Rng;

use crate::conv::{GCNConv, GcnAdjacency};
use crate::error::Result;
use crate::loader::DeviceSample;

/// Anything that embeds nodes and scores node pairs.
pub trait LinkPredictor {
    /// Node embeddings `(N, D)` from features `(N, F)` and connectivity.
    fn encode(&self, features: &Tensor, adjacency: &GcnAdjacency) -> Result<Tensor>;

    /// One probability per column of `edges`.
    fn decode(&self, embeddings: &Tensor, edges: &EdgeIndex) -> Result<Tensor>;

    /// Encode with the sample's own edges and decode the same edges.
    fn forward(&self, sample: &DeviceSample) -> Result<Tensor> {
        let z = self.encode(sample.features(), sample.adjacency())?;
        self.decode(&z, sample.edge_index())
    }
}

/// `sigmoid(<z_src, z_dst>)` for every column of `edges`.
pub fn dot_product_decode(embeddings: &Tensor, edges: &EdgeIndex) -> Result<Tensor> {
    let device = embeddings.device();
    if edges.is_empty() {
        return Ok(Tensor::zeros(0, embeddings.dtype(), device)?);
    }
    let src = Tensor::from_slice(edges.src(), edges.len(), device)?;
    let dst = Tensor::from_slice(edges.dst(), edges.len(), device)?;
    let scores = (embeddings.index_select(&src, 0)? * embeddings.index_select(&dst, 0)?)?.sum(1)?;
    Ok(candle_nn::ops::sigmoid(&scores)?)
}

/// Two-layer GCN encoder with an inner-product decoder.
pub struct GcnLinkPredictor {
    conv1: GCNConv,
    conv2: GCNConv,
}

impl GcnLinkPredictor {
    /// `input_dim -> hidden_dim -> output_dim`, weights drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        rng: &mut R,
        device: &Device,
    ) -> Result<Self> {
        let conv1 = GCNConv::new(input_dim, hidden_dim, rng, device)?;
        let conv2 = GCNConv::new(hidden_dim, output_dim, rng, device)?;
        Ok(Self { conv1, conv2 })
    }

    /// All trainable parameters, for the optimizer.
    pub fn vars(&self) -> Vec<Var> {
        let mut vars = self.conv1.vars();
        vars.extend(self.conv2.vars());
        vars
    }

    pub fn output_dim(&self) -> usize {
        self.conv2.out_features()
    }
}

impl LinkPredictor for GcnLinkPredictor {
    fn encode(&self, features: &Tensor, adjacency: &GcnAdjacency) -> Result<Tensor> {
        let x = features.to_dtype(DType::F32)?;
        let h = self.conv1.forward(&x, adjacency)?.relu()?;
        Ok(self.conv2.forward(&h, adjacency)?)
    }

    fn decode(&self, embeddings: &Tensor, edges: &EdgeIndex) -> Result<Tensor> {
        dot_product_decode(embeddings, edges)
    }
}
