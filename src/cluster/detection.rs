//! Dense working graph, union-find and connected components

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::graph::{NodeId, ProjectionGraph};

/// Union-Find data structure for connected component analysis
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<usize>,

    /// Size of each set (for union by size)
    rank: Vec<usize>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![1; size],
        }
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: usize) -> usize {
        let px = self.parent[x];
        if px != x {
            self.parent[x] = self.find(px);
        }
        self.parent[x]
    }

    /// Union the sets containing x and y
    pub fn union(&mut self, x: usize, y: usize) {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return;
        }

        // Attach the smaller tree under the root of the larger one
        if self.rank[root_x] > self.rank[root_y] {
            self.parent[root_y] = root_x;
            self.rank[root_x] += self.rank[root_y];
        } else {
            self.parent[root_x] = root_y;
            self.rank[root_y] += self.rank[root_x];
        }
    }

    /// Get the size of the set containing x
    pub fn size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.rank[root]
    }

    /// Group element indices by set, ordered by each set's smallest element
    pub fn groups(&mut self) -> Vec<Vec<usize>> {
        let mut by_root: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut first_seen: Vec<usize> = Vec::new();
        for x in 0..self.parent.len() {
            let root = self.find(x);
            let group = by_root.entry(root).or_default();
            if group.is_empty() {
                first_seen.push(root);
            }
            group.push(x);
        }
        first_seen
            .into_iter()
            .filter_map(|root| by_root.remove(&root))
            .collect()
    }
}

/// Projection graph re-indexed to 0..n with parallel edges merged.
///
/// Index i corresponds to `keys[i]`, in the projection's vertex order.
#[derive(Debug, Clone)]
pub struct DenseGraph {
    keys: Vec<NodeId>,
    adjacency: Vec<BTreeMap<usize, f64>>,
}

impl DenseGraph {
    pub fn from_projection(graph: &ProjectionGraph) -> Self {
        let keys = graph.vertices().to_vec();
        let position: HashMap<NodeId, usize> =
            keys.iter().enumerate().map(|(i, &k)| (k, i)).collect();

        let mut adjacency = vec![BTreeMap::new(); keys.len()];
        for (i, &key) in keys.iter().enumerate() {
            for edge in graph.edges(key) {
                let Some(&j) = position.get(&edge.neighbor) else {
                    continue;
                };
                if i != j {
                    *adjacency[i].entry(j).or_insert(0.0) += edge.weight;
                }
            }
        }

        Self { keys, adjacency }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, i: usize) -> NodeId {
        self.keys[i]
    }

    /// Weighted neighbours of i
    pub fn neighbors(&self, i: usize) -> &BTreeMap<usize, f64> {
        &self.adjacency[i]
    }

    /// Undirected edges (i, j, w) with i < j
    pub fn edge_list(&self) -> Vec<(usize, usize, f64)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, nbrs)| {
                nbrs.iter()
                    .filter(move |(&j, _)| i < j)
                    .map(move |(&j, &w)| (i, j, w))
            })
            .collect()
    }

    /// Unweighted neighbour sets
    pub fn neighbor_sets(&self) -> Vec<BTreeSet<usize>> {
        self.adjacency
            .iter()
            .map(|nbrs| nbrs.keys().copied().collect())
            .collect()
    }
}

/// Connected components of an unweighted adjacency structure
pub fn connected_components(adjacency: &[BTreeSet<usize>]) -> Vec<Vec<usize>> {
    let mut sets = DisjointSets::new(adjacency.len());
    for (i, nbrs) in adjacency.iter().enumerate() {
        for &j in nbrs {
            sets.union(i, j);
        }
    }
    sets.groups()
}
