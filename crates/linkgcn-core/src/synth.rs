//! Random graph synthesis.
//!
//! Produces a standard-normal feature matrix and a uniformly random edge
//! list, then repairs isolated nodes so every node has at least one incident
//! edge. The repair overwrites endpoints in place: edges are lost, and
//! self-loops or duplicate edges may remain.

use rand::Rng;
use rand_distr::StandardNormal;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{EdgeList, NodeFeatures};

/// Random slot draws before falling back to a scan.
const SLOT_ATTEMPTS: usize = 32;

/// Synthesize `num_nodes` feature rows of width `feature_dim` and
/// `num_edges` edges over `[0, num_nodes)`.
///
/// Every node appears in at least one edge afterwards, which requires
/// `2 * num_edges >= num_nodes`.
pub fn synthesize<R: Rng + ?Sized>(
    num_nodes: usize,
    num_edges: usize,
    feature_dim: usize,
    rng: &mut R,
) -> Result<(NodeFeatures, EdgeList)> {
    if num_nodes == 0 || num_edges == 0 || feature_dim == 0 {
        return Err(Error::InvalidConfig(format!(
            "graph needs nodes, edges and features (got V={num_nodes}, E={num_edges}, F={feature_dim})"
        )));
    }
    if num_nodes > u32::MAX as usize {
        return Err(Error::InvalidConfig(format!(
            "{num_nodes} nodes exceed the u32 index range"
        )));
    }
    if 2 * num_edges < num_nodes {
        return Err(Error::InvalidConfig(format!(
            "{num_edges} edges cannot cover {num_nodes} nodes"
        )));
    }

    let data: Vec<f32> = (0..num_nodes * feature_dim)
        .map(|_| rng.sample::<f32, _>(StandardNormal))
        .collect();
    let features = NodeFeatures::new(data, num_nodes, feature_dim)?;

    let n = num_nodes as u32;
    let mut edges: Vec<[u32; 2]> = (0..num_edges)
        .map(|_| [rng.random_range(0..n), rng.random_range(0..n)])
        .collect();

    let repaired = repair_isolated(&mut edges, num_nodes, rng)?;
    debug!(num_nodes, num_edges, repaired, "synthesized graph");

    Ok((features, EdgeList::new(edges)))
}

/// Give every isolated node an edge by overwriting a random endpoint.
///
/// Only endpoints whose node occurs at least twice are overwritten, so a
/// node covered earlier never becomes isolated again. Returns the number of
/// repaired nodes.
fn repair_isolated<R: Rng + ?Sized>(
    edges: &mut [[u32; 2]],
    num_nodes: usize,
    rng: &mut R,
) -> Result<usize> {
    let mut counts = vec![0u32; num_nodes];
    for &[s, d] in edges.iter() {
        counts[s as usize] += 1;
        counts[d as usize] += 1;
    }

    let mut repaired = 0;
    for node in 0..num_nodes {
        if counts[node] > 0 {
            continue;
        }
        let (row, side) = pick_slot(edges, &counts, rng).ok_or_else(|| {
            Error::InvalidConfig(format!("no edge endpoint left to give node {node}"))
        })?;
        let old = edges[row][side] as usize;
        counts[old] -= 1;
        edges[row][side] = node as u32;
        counts[node] += 1;
        repaired += 1;
    }
    Ok(repaired)
}

fn pick_slot<R: Rng + ?Sized>(
    edges: &[[u32; 2]],
    counts: &[u32],
    rng: &mut R,
) -> Option<(usize, usize)> {
    for _ in 0..SLOT_ATTEMPTS {
        let row = rng.random_range(0..edges.len());
        let side = rng.random_range(0..2);
        if counts[edges[row][side] as usize] >= 2 {
            return Some((row, side));
        }
    }

    let mut eligible = Vec::new();
    for (row, pair) in edges.iter().enumerate() {
        for side in 0..2 {
            if counts[pair[side] as usize] >= 2 {
                eligible.push((row, side));
            }
        }
    }
    if eligible.is_empty() {
        None
    } else {
        Some(eligible[rng.random_range(0..eligible.len())])
    }
}
