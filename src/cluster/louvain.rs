//! Louvain modularity optimisation
//!
//! Multi-level greedy optimisation (Blondel et al. 2008): move single nodes
//! to the neighbouring community with the best modularity gain until nothing
//! moves, contract communities into nodes, and repeat on the smaller graph.

use std::collections::{BTreeMap, HashMap};

use super::detection::DenseGraph;
use super::CommunityDetection;

/// Weighted edge list (i, j, w) with i < j
type EdgeList = Vec<(usize, usize, f64)>;

/// Louvain community detection
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma); higher values give smaller communities
    resolution: f64,
    /// Maximum local-moving sweeps per level
    max_iter: usize,
    /// Maximum levels of aggregation
    max_levels: usize,
}

impl Louvain {
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            max_iter: 100,
            max_levels: 10,
        }
    }

    /// P = 50 gives standard modularity
    pub fn from_p(p: u8) -> Self {
        Self::new().with_resolution(p as f64 / 50.0)
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Community with the highest modularity gain for a node of degree `ki`.
    /// `community_degrees` must already exclude the node; ties keep `current`.
    fn best_community(
        &self,
        current: usize,
        weights: &BTreeMap<usize, f64>,
        community_degrees: &[f64],
        ki: f64,
        m: f64,
    ) -> usize {
        let gain = |target: usize, ki_in: f64| {
            ki_in / m - self.resolution * community_degrees[target] * ki / (2.0 * m * m)
        };

        let mut best = current;
        let mut best_gain = weights
            .get(&current)
            .map_or(0.0, |&ki_in| gain(current, ki_in));
        for (&target, &ki_in) in weights {
            let candidate = gain(target, ki_in);
            if candidate > best_gain {
                best_gain = candidate;
                best = target;
            }
        }
        best
    }

    /// Phase 1: move nodes between communities while modularity improves.
    /// Returns the community of each node and whether anything moved.
    fn local_moving(&self, n: usize, edges: &[(usize, usize, f64)], self_loops: &[f64]) -> (Vec<usize>, bool) {
        let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        let mut degrees = vec![0.0; n];
        for &(i, j, w) in edges {
            adj[i].push((j, w));
            adj[j].push((i, w));
            degrees[i] += w;
            degrees[j] += w;
        }
        for (i, &sl) in self_loops.iter().enumerate() {
            degrees[i] += 2.0 * sl;
        }

        let m: f64 = edges.iter().map(|&(_, _, w)| w).sum::<f64>() + self_loops.iter().sum::<f64>();
        let mut communities: Vec<usize> = (0..n).collect();
        if m == 0.0 {
            return (communities, false);
        }

        let mut community_degrees = degrees.clone();
        let mut any_moved = false;

        for _ in 0..self.max_iter {
            let mut moved = false;

            for node in 0..n {
                let current = communities[node];
                let ki = degrees[node];
                community_degrees[current] -= ki;

                // Edge weight from node into each neighbouring community
                let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
                for &(neighbor, w) in &adj[node] {
                    *weights.entry(communities[neighbor]).or_insert(0.0) += w;
                }

                let best = self.best_community(current, &weights, &community_degrees, ki, m);

                community_degrees[best] += ki;
                if best != current {
                    communities[node] = best;
                    moved = true;
                    any_moved = true;
                }
            }

            if !moved {
                break;
            }
        }

        (communities, any_moved)
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

/// Renumber community labels to 0..count in order of first appearance
fn renumber(communities: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: HashMap<usize, usize> = HashMap::new();
    let labels = communities
        .iter()
        .map(|&c| {
            let next = mapping.len();
            *mapping.entry(c).or_insert(next)
        })
        .collect();
    (labels, mapping.len())
}

/// Phase 2: contract each community into one node. Internal edges become
/// self-loops on the new node.
fn aggregate(edges: &[(usize, usize, f64)], self_loops: &[f64], labels: &[usize], count: usize) -> (EdgeList, Vec<f64>) {
    let mut new_self_loops = vec![0.0; count];
    for (i, &sl) in self_loops.iter().enumerate() {
        new_self_loops[labels[i]] += sl;
    }

    let mut weights: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for &(i, j, w) in edges {
        let (ci, cj) = (labels[i], labels[j]);
        if ci == cj {
            new_self_loops[ci] += w;
        } else {
            let key = if ci < cj { (ci, cj) } else { (cj, ci) };
            *weights.entry(key).or_insert(0.0) += w;
        }
    }

    let new_edges = weights.into_iter().map(|((i, j), w)| (i, j, w)).collect();
    (new_edges, new_self_loops)
}

impl CommunityDetection for Louvain {
    fn detect(&self, graph: &DenseGraph) -> Vec<Vec<usize>> {
        let n = graph.len();
        if n == 0 {
            return Vec::new();
        }

        // membership[v] = node of the current level that holds original node v
        let mut membership: Vec<usize> = (0..n).collect();
        let mut edges = graph.edge_list();
        let mut self_loops = vec![0.0; n];
        let mut level_n = n;

        for level in 0..self.max_levels {
            let (communities, moved) = self.local_moving(level_n, &edges, &self_loops);
            if !moved {
                break;
            }

            let (labels, count) = renumber(&communities);
            for m in membership.iter_mut() {
                *m = labels[*m];
            }
            log::debug!("Louvain level {}: {} -> {} nodes", level, level_n, count);

            let (new_edges, new_self_loops) = aggregate(&edges, &self_loops, &labels, count);
            edges = new_edges;
            self_loops = new_self_loops;
            if count == level_n {
                break;
            }
            level_n = count;
        }

        let mut groups = vec![Vec::new(); level_n];
        for (v, &c) in membership.iter().enumerate() {
            groups[c].push(v);
        }
        groups
    }
}
