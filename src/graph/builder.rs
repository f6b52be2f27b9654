//! Projection of the category graph onto a weighted similarity graph

use rayon::prelude::*;

use crate::graph::entity::NodeId;
use crate::graph::filters::{Filters, Selections};
use crate::graph::store::EntryGraph;
use crate::graph::weighted::WeightedGraph;

/// Projection graph handed to the community detectors
pub type ProjectionGraph = WeightedGraph<NodeId, f64>;

/// Below this many selected categories the pair sweep runs sequentially
const PARALLEL_THRESHOLD: usize = 1000;

/// Builds a projection graph from a store and a filter/selection pair
pub struct ProjectionBuilder<'a> {
    graph: &'a EntryGraph,
    filters: &'a Filters,
    selections: &'a Selections,
}

impl<'a> ProjectionBuilder<'a> {
    pub fn new(graph: &'a EntryGraph, filters: &'a Filters, selections: &'a Selections) -> Self {
        Self {
            graph,
            filters,
            selections,
        }
    }

    /// Weighted pairs (a, b, w) with a < b and w > 0; runs on rayon once
    /// `nodes` reaches `parallel_threshold`
    fn weighted_pairs(&self, nodes: &[NodeId], parallel_threshold: usize) -> Vec<(NodeId, NodeId, f64)> {
        let row = |i: usize| {
            let a = nodes[i];
            nodes[i + 1..]
                .iter()
                .filter_map(move |&b| {
                    let w = self.filters.weight(self.graph, a, b);
                    (w > 0.0).then_some((a, b, w))
                })
                .collect::<Vec<_>>()
        };

        if nodes.len() < parallel_threshold {
            return (0..nodes.len()).flat_map(row).collect();
        }

        (0..nodes.len())
            .into_par_iter()
            .flat_map_iter(row)
            .collect()
    }

    /// Build the projection: one vertex per selected live category and one
    /// edge per pair with positive weighted similarity
    pub fn build(&self) -> ProjectionGraph {
        let nodes = self.selections.resolve(self.graph);
        log::info!(
            "Projecting {} categories with filters [{}]",
            nodes.len(),
            self.filters
        );

        let mut projection = ProjectionGraph::with_capacity(nodes.len());
        for &node in &nodes {
            projection.add_vertex(node);
        }

        if self.filters.is_empty() {
            log::warn!("No similarity dimension enabled; projection has no edges");
            return projection;
        }

        let pairs = self.weighted_pairs(&nodes, PARALLEL_THRESHOLD);
        for &(a, b, w) in &pairs {
            projection.add_edge(a, b, w);
        }

        log::info!(
            "Projection has {} vertices and {} edges",
            projection.vertex_count(),
            pairs.len()
        );
        projection
    }
}

/// Convenience wrapper around [`ProjectionBuilder`]
pub fn project(graph: &EntryGraph, filters: &Filters, selections: &Selections) -> ProjectionGraph {
    ProjectionBuilder::new(graph, filters, selections).build()
}
