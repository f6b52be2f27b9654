//! Girvan–Newman divisive clustering
//!
//! Repeatedly removes the edge with the highest shortest-path betweenness
//! until the graph falls apart into the requested number of components.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::detection::{connected_components, DenseGraph};
use super::CommunityDetection;

/// Girvan–Newman community detection
#[derive(Debug, Clone)]
pub struct GirvanNewman {
    /// Share of the vertex count to reach as number of communities, in 0..=1
    split_ratio: f64,
}

impl GirvanNewman {
    pub fn new(split_ratio: f64) -> Self {
        Self {
            split_ratio: split_ratio.clamp(0.0, 1.0),
        }
    }

    pub fn from_p(p: u8) -> Self {
        Self::new(p as f64 / 100.0)
    }

    /// Number of components to stop at for a graph of `n` vertices
    pub fn target(&self, n: usize) -> usize {
        ((self.split_ratio * n as f64).ceil() as usize).max(1)
    }
}

/// Edge betweenness over unweighted shortest paths (Brandes)
pub fn edge_betweenness(adjacency: &[BTreeSet<usize>]) -> BTreeMap<(usize, usize), f64> {
    let n = adjacency.len();
    let mut scores: BTreeMap<(usize, usize), f64> = BTreeMap::new();

    for source in 0..n {
        let mut order = Vec::with_capacity(n);
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0_f64; n];
        let mut dist = vec![usize::MAX; n];
        sigma[source] = 1.0;
        dist[source] = 0;

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            order.push(v);
            for &w in &adjacency[v] {
                if dist[w] == usize::MAX {
                    dist[w] = dist[v] + 1;
                    queue.push_back(w);
                }
                if dist[w] == dist[v] + 1 {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        let mut delta = vec![0.0_f64; n];
        while let Some(w) = order.pop() {
            for &v in &preds[w] {
                let c = sigma[v] / sigma[w] * (1.0 + delta[w]);
                let key = if v < w { (v, w) } else { (w, v) };
                *scores.entry(key).or_insert(0.0) += c;
                delta[v] += c;
            }
        }
    }

    scores
}

impl CommunityDetection for GirvanNewman {
    fn detect(&self, graph: &DenseGraph) -> Vec<Vec<usize>> {
        let mut adjacency = graph.neighbor_sets();
        let target = self.target(graph.len());
        let mut removed = 0;

        loop {
            let components = connected_components(&adjacency);
            if components.len() >= target {
                log::debug!(
                    "Girvan-Newman reached {} components after removing {} edges",
                    components.len(),
                    removed
                );
                return components;
            }

            // Highest score wins; ties go to the smallest (i, j)
            let mut best: Option<((usize, usize), f64)> = None;
            for (edge, score) in edge_betweenness(&adjacency) {
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((edge, score));
                }
            }
            let Some(((i, j), _)) = best else {
                return components;
            };

            adjacency[i].remove(&j);
            adjacency[j].remove(&i);
            removed += 1;
        }
    }
}
