//! Community detection over the projection graph
//!
//! The [`Controller`] takes a projection graph, an [`Algorithm`] and a control
//! parameter P in 0..=100 and produces a raw partition: an ordered list of
//! groups of category ids. Its meaning of P depends on the algorithm:
//!
//! - Louvain: modularity resolution γ = P / 50
//! - Girvan–Newman: stop splitting once there are `ceil(P/100 · n)` groups
//! - Clique percolation: clique size k = 2 + P / 20
//!
//! Louvain and Girvan–Newman cover every vertex exactly once. Clique
//! percolation may place a vertex in several groups or in none.

pub mod clique;
pub mod detection;
pub mod girvan_newman;
pub mod louvain;
pub mod metrics;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::graph::{NodeId, ProjectionGraph};

pub use clique::CliquePercolation;
pub use detection::{connected_components, DenseGraph, DisjointSets};
pub use girvan_newman::GirvanNewman;
pub use louvain::Louvain;

/// Groups of category ids, as produced by a detector
pub type RawPartition = Vec<Vec<NodeId>>;

/// Community detection algorithm selector
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Louvain,
    GirvanNewman,
    CliquePercolation,
}

impl Algorithm {
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Louvain => "louvain",
            Algorithm::GirvanNewman => "girvan-newman",
            Algorithm::CliquePercolation => "clique-percolation",
        }
    }

    /// Whether results cover every vertex exactly once
    pub fn cover(self) -> CoverKind {
        match self {
            Algorithm::Louvain | Algorithm::GirvanNewman => CoverKind::Partition,
            Algorithm::CliquePercolation => CoverKind::Overlapping,
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "louvain" | "1" => Ok(Algorithm::Louvain),
            "girvan-newman" | "2" => Ok(Algorithm::GirvanNewman),
            "clique-percolation" | "3" => Ok(Algorithm::CliquePercolation),
            other => Err(Error::invalid("algorithm", format!("unknown algorithm '{other}'"))),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Shape of a detector's output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverKind {
    /// Every vertex in exactly one group
    Partition,
    /// Vertices may sit in several groups, or in none
    Overlapping,
}

/// A community detection algorithm over a dense working graph.
///
/// Returns groups of dense indices; the controller maps them back to ids.
pub trait CommunityDetection {
    fn detect(&self, graph: &DenseGraph) -> Vec<Vec<usize>>;
}

/// Validated control parameter P in 0..=100
pub fn check_p(p: u8) -> Result<u8> {
    if p > 100 {
        return Err(Error::invalid("p", format!("{p} is outside 0..=100")));
    }
    Ok(p)
}

/// Runs one algorithm with one value of P
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    algorithm: Algorithm,
    p: u8,
}

impl Controller {
    pub fn new(algorithm: Algorithm, p: u8) -> Result<Self> {
        Ok(Self {
            algorithm,
            p: check_p(p)?,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn p(&self) -> u8 {
        self.p
    }

    fn detector(&self) -> Box<dyn CommunityDetection> {
        match self.algorithm {
            Algorithm::Louvain => Box::new(Louvain::from_p(self.p)),
            Algorithm::GirvanNewman => Box::new(GirvanNewman::from_p(self.p)),
            Algorithm::CliquePercolation => Box::new(CliquePercolation::from_p(self.p)),
        }
    }

    /// Detect communities. An empty graph yields an empty partition.
    ///
    /// Groups come back sorted by their smallest id, members ascending.
    pub fn run(&self, graph: &ProjectionGraph) -> RawPartition {
        if graph.is_empty() {
            log::info!("Projection graph is empty; nothing to partition");
            return Vec::new();
        }

        log::info!(
            "Running {} with P = {} on {} vertices and {} edges",
            self.algorithm,
            self.p,
            graph.vertex_count(),
            graph.edge_count()
        );

        let dense = DenseGraph::from_projection(graph);
        let groups = self.detector().detect(&dense);
        let partition = normalize(
            groups
                .into_iter()
                .map(|group| group.into_iter().map(|i| dense.key(i)).collect())
                .collect(),
        );

        log::info!("Found {} communities", partition.len());
        partition
    }
}

/// Sort and dedup each group, drop empty groups and order groups by their
/// smallest member
pub fn normalize(groups: RawPartition) -> RawPartition {
    let mut groups: RawPartition = groups
        .into_iter()
        .map(|mut group| {
            group.sort_unstable();
            group.dedup();
            group
        })
        .filter(|group| !group.is_empty())
        .collect();
    groups.sort();
    groups
}

/// Drop groups with fewer than `min_size` members
pub fn filter_small(groups: RawPartition, min_size: usize) -> RawPartition {
    let before = groups.len();
    let kept: RawPartition = groups
        .into_iter()
        .filter(|group| group.len() >= min_size)
        .collect();
    if kept.len() < before {
        log::info!(
            "Dropped {} communities smaller than {}",
            before - kept.len(),
            min_size
        );
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn two_triangles() -> ProjectionGraph {
        let mut graph = ProjectionGraph::new();
        for v in 0..6 {
            graph.add_vertex(v);
        }
        for (a, b) in [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)] {
            graph.add_edge(a, b, 1.0);
        }
        graph.add_edge(2, 3, 0.1);
        graph
    }

    #[test]
    fn test_p_is_bounded() {
        assert!(Controller::new(Algorithm::Louvain, 100).is_ok());
        assert!(matches!(
            Controller::new(Algorithm::Louvain, 101),
            Err(Error::InvalidParameter { name: "p", .. })
        ));
    }

    #[test]
    fn test_empty_graph_gives_empty_partition() {
        for algorithm in [
            Algorithm::Louvain,
            Algorithm::GirvanNewman,
            Algorithm::CliquePercolation,
        ] {
            let controller = Controller::new(algorithm, 50).unwrap();
            assert!(controller.run(&ProjectionGraph::new()).is_empty());
        }
    }

    #[test]
    fn test_hard_partitions_cover_every_vertex_once() {
        let graph = two_triangles();
        for algorithm in [Algorithm::Louvain, Algorithm::GirvanNewman] {
            let partition = Controller::new(algorithm, 30).unwrap().run(&graph);
            let mut seen: Vec<NodeId> = partition.iter().flatten().copied().collect();
            seen.sort_unstable();
            assert_eq!(seen, vec![0, 1, 2, 3, 4, 5], "{algorithm}");
            assert_eq!(partition, vec![vec![0, 1, 2], vec![3, 4, 5]], "{algorithm}");
        }
    }

    #[test]
    fn test_normalize_orders_groups() {
        let groups = normalize(vec![vec![5, 4], vec![], vec![3, 1, 3]]);
        assert_eq!(groups, vec![vec![1, 3], vec![4, 5]]);
        assert_eq!(filter_small(groups, 2).len(), 2);
    }

    #[test]
    fn test_algorithm_names() {
        assert_eq!("girvan-newman".parse::<Algorithm>().unwrap(), Algorithm::GirvanNewman);
        assert_eq!("3".parse::<Algorithm>().unwrap(), Algorithm::CliquePercolation);
        assert!("kmeans".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::CliquePercolation.cover(), CoverKind::Overlapping);
    }
}
