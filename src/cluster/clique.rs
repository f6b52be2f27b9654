//! Clique percolation
//!
//! Communities are unions of k-cliques that can be reached from one another
//! through cliques sharing k - 1 vertices. Maximal cliques are enumerated with
//! Bron–Kerbosch (pivoting) and merged with a union-find. A vertex may belong
//! to several communities, and vertices in no k-clique belong to none.

use std::collections::BTreeSet;

use itertools::Itertools;

use super::detection::{DenseGraph, DisjointSets};
use super::CommunityDetection;

/// Clique percolation community detection
#[derive(Debug, Clone)]
pub struct CliquePercolation {
    k: usize,
}

impl CliquePercolation {
    /// Clique size must be at least 2
    pub fn new(k: usize) -> Self {
        Self { k: k.max(2) }
    }

    /// k = 2 + P / 20, so P in 0..=100 maps to k in 2..=7
    pub fn from_p(p: u8) -> Self {
        Self::new(2 + p as usize / 20)
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

/// All maximal cliques of an unweighted graph
pub fn maximal_cliques(adjacency: &[BTreeSet<usize>]) -> Vec<BTreeSet<usize>> {
    let mut cliques = Vec::new();
    let candidates: BTreeSet<usize> = (0..adjacency.len()).collect();
    bron_kerbosch(
        adjacency,
        &mut BTreeSet::new(),
        candidates,
        BTreeSet::new(),
        &mut cliques,
    );
    cliques
}

fn bron_kerbosch(
    adjacency: &[BTreeSet<usize>],
    clique: &mut BTreeSet<usize>,
    mut candidates: BTreeSet<usize>,
    mut excluded: BTreeSet<usize>,
    out: &mut Vec<BTreeSet<usize>>,
) {
    if candidates.is_empty() && excluded.is_empty() {
        out.push(clique.clone());
        return;
    }

    // Pivot on the vertex with most neighbours among the candidates
    let pivot = candidates
        .union(&excluded)
        .max_by_key(|&&u| adjacency[u].intersection(&candidates).count())
        .copied();
    let Some(pivot) = pivot else {
        return;
    };

    let branch: Vec<usize> = candidates.difference(&adjacency[pivot]).copied().collect();
    for v in branch {
        clique.insert(v);
        bron_kerbosch(
            adjacency,
            clique,
            candidates.intersection(&adjacency[v]).copied().collect(),
            excluded.intersection(&adjacency[v]).copied().collect(),
            out,
        );
        clique.remove(&v);
        candidates.remove(&v);
        excluded.insert(v);
    }
}

impl CommunityDetection for CliquePercolation {
    fn detect(&self, graph: &DenseGraph) -> Vec<Vec<usize>> {
        let adjacency = graph.neighbor_sets();
        let cliques: Vec<BTreeSet<usize>> = maximal_cliques(&adjacency)
            .into_iter()
            .filter(|clique| clique.len() >= self.k)
            .collect();
        log::debug!("{} maximal cliques of size >= {}", cliques.len(), self.k);

        let mut sets = DisjointSets::new(cliques.len());
        for (a, b) in (0..cliques.len()).tuple_combinations() {
            if cliques[a].intersection(&cliques[b]).count() >= self.k - 1 {
                sets.union(a, b);
            }
        }

        sets.groups()
            .into_iter()
            .map(|members| {
                members
                    .into_iter()
                    .flat_map(|c| cliques[c].iter().copied())
                    .collect::<BTreeSet<usize>>()
                    .into_iter()
                    .collect()
            })
            .collect()
    }
}
