//! Structural similarity between nodes from shared neighbourhoods

use std::collections::HashSet;

use crate::graph::entity::{ArchKind, NodeId};
use crate::graph::store::EntryGraph;

impl EntryGraph {
    /// Number of destinations both `a` and `b` reach over `kind`.
    ///
    /// Destinations within one origin's list are unique, so a set
    /// intersection counts the same as comparing every pair of arches.
    pub fn common(&self, kind: ArchKind, a: NodeId, b: NodeId) -> usize {
        let (left, right) = (self.arches(a, kind), self.arches(b, kind));
        if left.is_empty() || right.is_empty() {
            return 0;
        }

        let targets: HashSet<NodeId> = right.iter().map(|arc| arc.destiny).collect();
        left.iter()
            .filter(|arc| targets.contains(&arc.destiny))
            .count()
    }

    pub fn common_csubc(&self, a: NodeId, b: NodeId) -> usize {
        self.common(ArchKind::CsubC, a, b)
    }

    pub fn common_csupc(&self, a: NodeId, b: NodeId) -> usize {
        self.common(ArchKind::CsupC, a, b)
    }

    pub fn common_cp(&self, a: NodeId, b: NodeId) -> usize {
        self.common(ArchKind::CP, a, b)
    }

    /// Shared categories of two pages
    pub fn common_pc(&self, a: NodeId, b: NodeId) -> usize {
        self.common(ArchKind::PC, a, b)
    }

    /// CsubC + CsupC + CP overlap of two categories
    pub fn categories_common(&self, a: NodeId, b: NodeId) -> usize {
        self.common_csubc(a, b) + self.common_csupc(a, b) + self.common_cp(a, b)
    }

    /// Page overlap of two categories, taken through CP
    pub fn pages_common(&self, a: NodeId, b: NodeId) -> usize {
        self.common_cp(a, b)
    }

    /// Direct CsubC/CsupC arches between two categories, either direction
    pub fn linked(&self, a: NodeId, b: NodeId) -> usize {
        let count = |from: NodeId, to: NodeId| {
            [ArchKind::CsubC, ArchKind::CsupC]
                .into_iter()
                .flat_map(|kind| self.arches(from, kind))
                .filter(|arc| arc.destiny == to)
                .count()
        };
        if a == b {
            return count(a, a);
        }
        count(a, b) + count(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    fn load(records: &[&str]) -> EntryGraph {
        let mut graph = EntryGraph::with_capacity(16);
        for line in records {
            let record: Record = line.parse().unwrap();
            graph.set_data(&record);
        }
        graph
    }

    #[test]
    fn test_sibling_categories_share_nothing_downward() {
        let graph = load(&[
            "Science cat CsupC Physics cat",
            "Science cat CsupC Chemistry cat",
        ]);
        let science = graph.category_id("Science").unwrap();
        let physics = graph.category_id("Physics").unwrap();
        let chemistry = graph.category_id("Chemistry").unwrap();

        assert_eq!(graph.categories_common(physics, chemistry), 0);
        // Self-comparison overlaps fully
        assert_eq!(graph.categories_common(science, science), 2);
        assert_eq!(graph.common_csupc(science, science), graph.csupc_degree(science));
    }

    #[test]
    fn test_common_measure_is_directional() {
        let graph = load(&[
            "Biology cat CsubC Genetics cat",
            "Biology cat CsubC Ecology cat",
        ]);
        let genetics = graph.category_id("Genetics").unwrap();
        let ecology = graph.category_id("Ecology").unwrap();

        // Biology is their common origin, not a common destination
        assert_eq!(graph.common_csubc(genetics, ecology), 0);
        assert_eq!(graph.common_csupc(genetics, ecology), 0);
        assert_eq!(graph.categories_common(genetics, ecology), 0);
    }

    #[test]
    fn test_shared_parent_and_pages() {
        let graph = load(&[
            "Genetics cat CsubC Biology cat",
            "Ecology cat CsubC Biology cat",
            "Genetics cat CP Gene page",
            "Ecology cat CP Gene page",
            "Ecology cat CP Biome page",
            "Gene page PC Genetics cat",
            "Gene page PC Ecology cat",
            "Biome page PC Ecology cat",
        ]);
        let genetics = graph.category_id("Genetics").unwrap();
        let ecology = graph.category_id("Ecology").unwrap();
        let gene = graph.page_id("Gene").unwrap();
        let biome = graph.page_id("Biome").unwrap();

        assert_eq!(graph.common_csubc(genetics, ecology), 1);
        assert_eq!(graph.pages_common(genetics, ecology), 1);
        assert_eq!(graph.categories_common(genetics, ecology), 2);
        assert_eq!(graph.common_pc(gene, biome), 1);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let graph = load(&[
            "A cat CsubC C cat",
            "A cat CsubC D cat",
            "B cat CsubC D cat",
            "B cat CsupC E cat",
            "A cat CsupC E cat",
            "A cat CP P page",
            "B cat CP P page",
        ]);
        let ids = graph.categories();
        for &a in &ids {
            for &b in &ids {
                for kind in [ArchKind::CsubC, ArchKind::CsupC, ArchKind::CP] {
                    assert_eq!(graph.common(kind, a, b), graph.common(kind, b, a));
                }
                assert_eq!(graph.linked(a, b), graph.linked(b, a));
            }
        }
        let a = graph.category_id("A").unwrap();
        let b = graph.category_id("B").unwrap();
        assert_eq!(graph.categories_common(a, b), 3);
    }

    #[test]
    fn test_linked_counts_both_directions() {
        let graph = load(&[
            "Biology cat CsupC Genetics cat",
            "Genetics cat CsubC Biology cat",
            "Biology cat CsupC Ecology cat",
        ]);
        let biology = graph.category_id("Biology").unwrap();
        let genetics = graph.category_id("Genetics").unwrap();
        let ecology = graph.category_id("Ecology").unwrap();

        assert_eq!(graph.linked(biology, genetics), 2);
        assert_eq!(graph.linked(ecology, biology), 1);
        assert_eq!(graph.linked(genetics, ecology), 0);
    }
}
