//! Generic undirected weighted graph used as clustering input

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Half of an undirected edge, stored in the adjacency list of one endpoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge<K, T> {
    pub neighbor: K,
    pub weight: T,
}

/// Undirected graph over vertex keys `K` with edge weights `T`.
///
/// Vertices keep insertion order. Every edge is stored once in each
/// endpoint's list. Parallel edges are allowed so that several weighted
/// contributions between the same pair can be kept apart.
#[derive(Debug, Clone)]
pub struct WeightedGraph<K, T> {
    vertices: Vec<K>,
    edges: HashMap<K, Vec<Edge<K, T>>>,
}

impl<K, T> WeightedGraph<K, T>
where
    K: Copy + Eq + Hash,
    T: Copy + PartialEq,
{
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: HashMap::new(),
        }
    }

    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            edges: HashMap::with_capacity(vertex_count),
        }
    }

    /// Add a vertex; a key that is already present is left alone
    pub fn add_vertex(&mut self, v: K) -> bool {
        if self.edges.contains_key(&v) {
            return false;
        }
        self.vertices.push(v);
        self.edges.insert(v, Vec::new());
        true
    }

    /// Add the undirected edge (a, b) with weight `w`.
    ///
    /// Both endpoints must already be vertices. Repeated calls add parallel
    /// entries. Self-loops are not filtered here.
    pub fn add_edge(&mut self, a: K, b: K, w: T) -> bool {
        if !self.edges.contains_key(&a) || !self.edges.contains_key(&b) {
            return false;
        }
        if let Some(list) = self.edges.get_mut(&a) {
            list.push(Edge {
                neighbor: b,
                weight: w,
            });
        }
        if let Some(list) = self.edges.get_mut(&b) {
            list.push(Edge {
                neighbor: a,
                weight: w,
            });
        }
        true
    }

    /// Remove every edge between `origin` and `destiny`, in both directions.
    ///
    /// Returns the number of undirected edges removed.
    pub fn remove_edge(&mut self, origin: K, destiny: K) -> usize {
        let mut removed = 0;
        if let Some(list) = self.edges.get_mut(&origin) {
            let before = list.len();
            list.retain(|e| e.neighbor != destiny);
            removed = before - list.len();
        }
        if origin == destiny {
            // A self-loop sits twice in its own list
            return removed / 2;
        }
        if let Some(list) = self.edges.get_mut(&destiny) {
            list.retain(|e| e.neighbor != origin);
        }
        removed
    }

    /// Edges leaving `v`; empty for unknown vertices
    pub fn edges(&self, v: K) -> &[Edge<K, T>] {
        self.edges.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neighbour keys of `v`, one per edge entry
    pub fn neighbors(&self, v: K) -> Vec<K> {
        self.edges(v).iter().map(|e| e.neighbor).collect()
    }

    /// Vertices in insertion order
    pub fn vertices(&self) -> &[K] {
        &self.vertices
    }

    pub fn contains_vertex(&self, v: K) -> bool {
        self.edges.contains_key(&v)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        let half_edges: usize = self.edges.values().map(Vec::len).sum();
        let self_loops = self
            .edges
            .iter()
            .flat_map(|(v, list)| list.iter().filter(move |e| e.neighbor == *v))
            .count();
        // Each self-loop sits twice in its own list
        (half_edges - self_loops) / 2 + self_loops / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl<K, T> WeightedGraph<K, T>
where
    K: Copy + Eq + Hash,
    T: Copy + PartialEq + Into<f64>,
{
    /// Sum of edge weights at `v`
    pub fn weighted_degree(&self, v: K) -> f64 {
        self.edges(v).iter().map(|e| e.weight.into()).sum()
    }

    /// Total weight of all undirected edges
    pub fn total_weight(&self) -> f64 {
        let sum: f64 = self
            .vertices
            .iter()
            .map(|&v| self.weighted_degree(v))
            .sum();
        sum / 2.0
    }
}

impl<K, T> Default for WeightedGraph<K, T>
where
    K: Copy + Eq + Hash,
    T: Copy + PartialEq,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Two graphs are equal when they have the same vertex set and, per vertex,
/// the same multiset of (neighbour, weight) entries. Vertex and edge order
/// are ignored.
impl<K, T> PartialEq for WeightedGraph<K, T>
where
    K: Copy + Eq + Hash,
    T: Copy + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        if self.vertices.len() != other.vertices.len() {
            return false;
        }
        self.vertices.iter().all(|&v| {
            other.contains_vertex(v) && same_entries(self.edges(v), other.edges(v))
        })
    }
}

fn same_entries<K: PartialEq, T: PartialEq>(left: &[Edge<K, T>], right: &[Edge<K, T>]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut used = vec![false; right.len()];
    left.iter().all(|edge| {
        let hit = right
            .iter()
            .enumerate()
            .position(|(i, candidate)| !used[i] && candidate == edge);
        match hit {
            Some(i) => {
                used[i] = true;
                true
            }
            None => false,
        }
    })
}
