//! Negative sampling for link prediction.
//!
//! Negatives are node pairs that are not edges of the given edge index.
//! They act as contrastive examples: the model is trained to score them low.
//!
//! Two strategies, picked by graph size:
//!
//! | Strategy | When | Cost |
//! |----------|------|------|
//! | Dense | `V^2 <= 2^16` | Enumerate every candidate pair, draw without replacement |
//! | Sparse | otherwise | Rejection sampling with a bounded attempt budget |
//!
//! Pairs are directed: `(u, v)` being an edge does not exclude `(v, u)`.
//! Self-loops are never returned. Samples within one call are distinct.

use std::collections::HashSet;

use rand::seq::index;
use rand::Rng;
use tracing::warn;

use crate::graph::EdgeIndex;

/// Above this many node pairs, switch from enumeration to rejection sampling.
const DENSE_LIMIT: usize = 1 << 16;

/// Rejection attempts allowed per requested sample.
const ATTEMPTS_PER_SAMPLE: usize = 8;

/// Sample up to `num_samples` non-edges over `[0, num_nodes)`.
///
/// Returns fewer pairs than requested when the graph does not have enough
/// non-edges, or when rejection sampling runs out of attempts.
pub fn negative_sampling<R: Rng + ?Sized>(
    edge_index: &EdgeIndex,
    num_nodes: usize,
    num_samples: usize,
    rng: &mut R,
) -> EdgeIndex {
    if num_samples == 0 || num_nodes < 2 {
        return EdgeIndex::default();
    }

    let existing: HashSet<u64> = edge_index
        .pairs()
        .map(|(s, d)| pair_key(s, d, num_nodes))
        .collect();

    let sampled = if num_nodes.saturating_mul(num_nodes) <= DENSE_LIMIT {
        sample_dense(&existing, num_nodes, num_samples, rng)
    } else {
        sample_sparse(existing, num_nodes, num_samples, rng)
    };

    if sampled.len() < num_samples {
        warn!(
            requested = num_samples,
            sampled = sampled.len(),
            num_nodes,
            "negative sampler returned fewer pairs than requested"
        );
    }
    sampled
}

fn pair_key(src: u32, dst: u32, num_nodes: usize) -> u64 {
    src as u64 * num_nodes as u64 + dst as u64
}

fn sample_dense<R: Rng + ?Sized>(
    existing: &HashSet<u64>,
    num_nodes: usize,
    num_samples: usize,
    rng: &mut R,
) -> EdgeIndex {
    let n = num_nodes as u32;
    let candidates: Vec<(u32, u32)> = (0..n)
        .flat_map(|s| (0..n).map(move |d| (s, d)))
        .filter(|&(s, d)| s != d && !existing.contains(&pair_key(s, d, num_nodes)))
        .collect();

    let amount = num_samples.min(candidates.len());
    let mut picked = index::sample(rng, candidates.len(), amount).into_vec();
    picked.sort_unstable();
    EdgeIndex::from_pairs(picked.into_iter().map(|i| candidates[i]))
}

fn sample_sparse<R: Rng + ?Sized>(
    mut seen: HashSet<u64>,
    num_nodes: usize,
    num_samples: usize,
    rng: &mut R,
) -> EdgeIndex {
    let n = num_nodes as u32;
    let mut pairs = Vec::with_capacity(num_samples);
    let budget = num_samples * ATTEMPTS_PER_SAMPLE;

    for _ in 0..budget {
        if pairs.len() == num_samples {
            break;
        }
        let s = rng.random_range(0..n);
        let d = rng.random_range(0..n);
        if s == d {
            continue;
        }
        // `insert` returns false for existing edges and earlier samples.
        if seen.insert(pair_key(s, d, num_nodes)) {
            pairs.push((s, d));
        }
    }
    EdgeIndex::from_pairs(pairs)
}
