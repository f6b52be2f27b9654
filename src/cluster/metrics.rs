//! Community statistics and metrics

use std::collections::HashSet;

use crate::graph::{NodeId, ProjectionGraph};

/// Calculate density (actual edges / potential edges) inside a community
pub fn calculate_density(graph: &ProjectionGraph, members: &[NodeId]) -> f64 {
    let n = members.len();
    if n <= 1 {
        return 1.0; // By convention, singleton communities have density 1
    }

    // Potential edges = n * (n - 1) / 2 for an undirected graph
    let potential_edges = n * (n - 1) / 2;

    // Distinct neighbour pairs, so parallel edges count once
    let member_set: HashSet<NodeId> = members.iter().copied().collect();
    let mut pairs: HashSet<(NodeId, NodeId)> = HashSet::new();
    for &src in members {
        for edge in graph.edges(src) {
            let dst = edge.neighbor;
            if dst != src && member_set.contains(&dst) {
                pairs.insert(if src < dst { (src, dst) } else { (dst, src) });
            }
        }
    }

    pairs.len() as f64 / potential_edges as f64
}

/// Newman modularity of a set of groups (resolution 1).
///
/// Vertices may appear in several groups; each membership counts.
pub fn modularity(graph: &ProjectionGraph, groups: &[Vec<NodeId>]) -> f64 {
    let m = graph.total_weight();
    if m == 0.0 {
        return 0.0;
    }

    groups
        .iter()
        .map(|group| {
            let member_set: HashSet<NodeId> = group.iter().copied().collect();
            let mut internal = 0.0;
            let mut degree = 0.0;
            for &v in group {
                degree += graph.weighted_degree(v);
                for edge in graph.edges(v) {
                    if member_set.contains(&edge.neighbor) {
                        internal += edge.weight;
                    }
                }
            }
            // Every internal edge was seen from both ends
            let internal = internal / 2.0;
            internal / m - (degree / (2.0 * m)).powi(2)
        })
        .sum()
}

/// Members with the highest weighted degree towards the rest of the community
pub fn identify_central_members(graph: &ProjectionGraph, members: &[NodeId], top: usize) -> Vec<NodeId> {
    let member_set: HashSet<NodeId> = members.iter().copied().collect();

    let mut by_degree: Vec<(NodeId, f64)> = members
        .iter()
        .map(|&v| {
            let degree = graph
                .edges(v)
                .iter()
                .filter(|e| e.neighbor != v && member_set.contains(&e.neighbor))
                .map(|e| e.weight)
                .sum();
            (v, degree)
        })
        .collect();

    // Highest degree first, lowest id on ties
    by_degree.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    by_degree.into_iter().take(top).map(|(v, _)| v).collect()
}
