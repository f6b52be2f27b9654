//! Partition model: named communities of category snapshots
//!
//! A [`CommunitySet`] is built once from a raw partition and the store it was
//! computed on. Members are copies of the categories at that moment, so later
//! store edits never leak into a result. Filters and selections are copied in
//! as provenance.

pub mod compare;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::cluster::{Algorithm, CoverKind};
use crate::graph::{Category, EntryGraph, Filters, NodeId, Selections};

pub use compare::{compare, CommunityMatch, Comparison};

/// One community of categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    index: usize,
    name: String,
    members: BTreeSet<Category>,
}

impl Community {
    /// Empty community named after its index
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: default_name(index),
            members: BTreeSet::new(),
        }
    }

    pub fn with_members(index: usize, name: impl Into<String>, members: impl IntoIterator<Item = Category>) -> Self {
        Self {
            index,
            name: name.into(),
            members: members.into_iter().collect(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn members(&self) -> &BTreeSet<Category> {
        &self.members
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(Category::name).collect()
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.members.contains(category)
    }

    pub fn insert(&mut self, category: Category) -> bool {
        self.members.insert(category)
    }

    pub fn remove(&mut self, category: &Category) -> bool {
        self.members.remove(category)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.members.len(), self.member_names().join(", "))
    }
}

fn default_name(index: usize) -> String {
    format!("community-{index}")
}

/// A detection result: ordered communities plus the configuration that
/// produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunitySet {
    name: Option<String>,
    modified: bool,
    algorithm: Algorithm,
    p: u8,
    cover: CoverKind,
    communities: Vec<Community>,
    filters: Filters,
    selections: Selections,
}

impl CommunitySet {
    /// Resolve every id of `partition` against `graph` and build one
    /// community per group, in group order.
    ///
    /// Ids that are not live categories are skipped.
    pub fn from_partition(
        partition: &[Vec<NodeId>],
        graph: &EntryGraph,
        algorithm: Algorithm,
        p: u8,
        filters: &Filters,
        selections: &Selections,
    ) -> Self {
        let communities = partition
            .iter()
            .enumerate()
            .map(|(index, group)| {
                let mut community = Community::new(index);
                for &id in group {
                    match graph.category(id) {
                        Some(category) => {
                            community.insert(category.clone());
                        }
                        None => log::warn!("Partition names unknown category id {}", id),
                    }
                }
                community
            })
            .collect();

        Self {
            name: None,
            modified: false,
            algorithm,
            p,
            cover: algorithm.cover(),
            communities,
            filters: filters.clone(),
            selections: selections.clone(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
        self.modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn p(&self) -> u8 {
        self.p
    }

    pub fn cover(&self) -> CoverKind {
        self.cover
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    pub fn names(&self) -> Vec<&str> {
        self.communities.iter().map(Community::name).collect()
    }

    pub fn len(&self) -> usize {
        self.communities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// First community called `name`
    pub fn community(&self, name: &str) -> Option<&Community> {
        self.communities.iter().find(|c| c.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.communities.iter().position(|c| c.name == name)
    }

    /// Append a community unless an equal one is already present
    pub fn add_community(&mut self, community: Community) -> bool {
        if self.communities.contains(&community) {
            return false;
        }
        self.communities.push(community);
        self.modified = true;
        true
    }

    /// Remove the first community equal to `community`
    pub fn remove_community(&mut self, community: &Community) -> bool {
        match self.communities.iter().position(|c| c == community) {
            Some(pos) => {
                self.communities.remove(pos);
                self.modified = true;
                true
            }
            None => false,
        }
    }

    /// Remove every community called `name`, returning how many went
    pub fn remove_communities_named(&mut self, name: &str) -> usize {
        let before = self.communities.len();
        self.communities.retain(|c| c.name != name);
        let removed = before - self.communities.len();
        if removed > 0 {
            self.modified = true;
        }
        removed
    }

    /// Rename the first community called `old`
    pub fn rename_community(&mut self, old: &str, new: &str) -> bool {
        let Some(pos) = self.position(old) else {
            return false;
        };
        self.communities[pos].set_name(new);
        self.modified = true;
        true
    }

    /// Add `category` to the community called `name`. Under a strict
    /// partition the category first leaves whatever community held it.
    pub fn add_member(&mut self, name: &str, category: &Category) -> bool {
        let Some(target) = self.position(name) else {
            return false;
        };
        if self.communities[target].contains(category) {
            return false;
        }
        if self.cover == CoverKind::Partition {
            for community in self.communities.iter_mut() {
                community.remove(category);
            }
        }
        self.communities[target].insert(category.clone());
        self.modified = true;
        true
    }

    pub fn remove_member(&mut self, name: &str, category: &Category) -> bool {
        let Some(pos) = self.position(name) else {
            return false;
        };
        let removed = self.communities[pos].remove(category);
        if removed {
            self.modified = true;
        }
        removed
    }

    /// Move `category` from one community to another
    pub fn move_member(&mut self, category: &Category, from: &str, to: &str) -> bool {
        let (Some(src), Some(dst)) = (self.position(from), self.position(to)) else {
            return false;
        };
        if src == dst || !self.communities[src].contains(category) {
            return false;
        }
        self.communities[src].remove(category);
        self.communities[dst].insert(category.clone());
        self.modified = true;
        true
    }

    /// Communities holding `category`
    pub fn communities_of(&self, category: &Category) -> Vec<&Community> {
        self.communities.iter().filter(|c| c.contains(category)).collect()
    }

    /// No category sits in two communities
    pub fn is_disjoint(&self) -> bool {
        let mut seen: BTreeSet<&Category> = BTreeSet::new();
        self.communities
            .iter()
            .flat_map(|c| c.members.iter())
            .all(|category| seen.insert(category))
    }

    /// Union of all members equals the categories the selections pick from `graph`
    pub fn covers(&self, graph: &EntryGraph) -> bool {
        let expected: BTreeSet<&Category> = self
            .selections
            .resolve(graph)
            .into_iter()
            .filter_map(|id| graph.category(id))
            .collect();
        let covered: BTreeSet<&Category> = self.communities.iter().flat_map(|c| c.members.iter()).collect();
        expected == covered
    }

    /// Same groups of members, ignoring names, indices and order
    pub fn same_partition(&self, other: &CommunitySet) -> bool {
        let groups = |set: &CommunitySet| -> BTreeSet<BTreeSet<Category>> {
            set.communities.iter().map(|c| c.members.clone()).collect()
        };
        groups(self) == groups(other)
    }

    /// One line per community, `name (size): a, b, c`
    pub fn to_lines(&self) -> Vec<String> {
        self.communities.iter().map(Community::to_string).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_lines;

    fn store() -> EntryGraph {
        let mut graph = EntryGraph::new();
        load_lines(
            &mut graph,
            [
                "Science cat CsupC Physics cat",
                "Science cat CsupC Chemistry cat",
                "Biology cat CsubC Genetics cat",
            ],
        )
        .unwrap();
        graph
    }

    fn ids(graph: &EntryGraph, names: &[&str]) -> Vec<NodeId> {
        names.iter().filter_map(|n| graph.category_id(n)).collect()
    }

    fn partition(graph: &EntryGraph, algorithm: Algorithm) -> CommunitySet {
        let raw = vec![
            ids(graph, &["Science", "Physics", "Chemistry"]),
            ids(graph, &["Biology", "Genetics"]),
        ];
        CommunitySet::from_partition(&raw, graph, algorithm, 50, &Filters::default(), &Selections::All)
    }

    #[test]
    fn test_from_partition_snapshots_categories() {
        let mut graph = store();
        let set = partition(&graph, Algorithm::Louvain);
        assert_eq!(set.len(), 2);
        assert_eq!(set.names(), vec!["community-0", "community-1"]);
        assert!(!set.is_modified());
        assert!(set.is_disjoint());
        assert!(set.covers(&graph));

        // Renaming in the store does not reach the snapshot
        let physics = graph.category_id("Physics").unwrap();
        graph.rename_category(physics, "Mechanics");
        let first = set.community("community-0").unwrap();
        assert!(first.contains(&Category::new("Physics")));
        assert!(!set.covers(&graph));
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let graph = store();
        let set = CommunitySet::from_partition(
            &[vec![999]],
            &graph,
            Algorithm::Louvain,
            50,
            &Filters::default(),
            &Selections::All,
        );
        assert_eq!(set.len(), 1);
        assert!(set.communities()[0].is_empty());
    }

    #[test]
    fn test_community_lookup_and_removal() {
        let graph = store();
        let mut set = partition(&graph, Algorithm::Louvain);
        assert!(set.community("missing").is_none());

        assert!(set.rename_community("community-1", "community-0"));
        assert!(set.is_modified());
        assert_eq!(set.remove_communities_named("community-0"), 2);
        assert!(set.is_empty());
        assert_eq!(set.remove_communities_named("community-0"), 0);
    }

    #[test]
    fn test_add_and_remove_community() {
        let graph = store();
        let mut set = partition(&graph, Algorithm::Louvain);
        let extra = Community::with_members(2, "extra", [Category::new("Art")]);
        assert!(set.add_community(extra.clone()));
        assert!(!set.add_community(extra.clone()));
        assert_eq!(set.len(), 3);
        assert!(set.remove_community(&extra));
        assert!(!set.remove_community(&extra));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_membership_respects_partition() {
        let graph = store();
        let mut set = partition(&graph, Algorithm::GirvanNewman);
        let physics = Category::new("Physics");

        assert!(set.add_member("community-1", &physics));
        assert!(set.is_disjoint());
        assert_eq!(set.communities_of(&physics).len(), 1);
        assert_eq!(set.communities_of(&physics)[0].name(), "community-1");

        assert!(set.move_member(&physics, "community-1", "community-0"));
        assert!(!set.move_member(&physics, "community-1", "community-0"));
        assert!(set.remove_member("community-0", &physics));
        assert!(set.communities_of(&physics).is_empty());
    }

    #[test]
    fn test_membership_may_overlap() {
        let graph = store();
        let mut set = partition(&graph, Algorithm::CliquePercolation);
        assert_eq!(set.cover(), CoverKind::Overlapping);
        let physics = Category::new("Physics");
        assert!(set.add_member("community-1", &physics));
        assert_eq!(set.communities_of(&physics).len(), 2);
        assert!(!set.is_disjoint());
    }

    #[test]
    fn test_same_partition_ignores_order_and_names() {
        let graph = store();
        let set = partition(&graph, Algorithm::Louvain);
        let raw = vec![
            ids(&graph, &["Genetics", "Biology"]),
            ids(&graph, &["Chemistry", "Science", "Physics"]),
        ];
        let mut other =
            CommunitySet::from_partition(&raw, &graph, Algorithm::Louvain, 10, &Filters::none(), &Selections::All);
        other.rename_community("community-0", "life");
        assert!(set.same_partition(&other));
        assert_ne!(set, other);
    }

    #[test]
    fn test_provenance_is_a_copy() {
        let graph = store();
        let mut filters = Filters::default();
        let set = CommunitySet::from_partition(&[], &graph, Algorithm::Louvain, 50, &filters, &Selections::All);
        filters.set(crate::graph::Dimension::Pages, 9);
        assert_eq!(set.filters(), &Filters::default());
    }

    #[test]
    fn test_to_lines() {
        let graph = store();
        let set = partition(&graph, Algorithm::Louvain);
        assert_eq!(
            set.to_lines(),
            vec![
                "community-0 (3): Chemistry, Physics, Science".to_string(),
                "community-1 (2): Biology, Genetics".to_string(),
            ]
        );
    }
}
