//! Heterogeneous category/page graph with typed adjacency

use std::collections::BTreeMap;

use crate::data::Record;
use crate::graph::entity::{Arch, ArchKind, Category, NodeId, NodeKind, Page};
use crate::graph::index::{is_valid_name, EntityIndex};

/// Capacity hint used when none is given, sized for a mid-size category dump
pub const DEFAULT_CAPACITY: usize = 5814;

/// Largest capacity hint honoured; larger hints are clamped
pub const MAX_CAPACITY: usize = 1 << 24;

/// Origin id -> outgoing arches of one kind
type Adjacency = BTreeMap<NodeId, Vec<Arch>>;

/// Outcome of inserting an arch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    /// A new arch was stored
    Inserted,
    /// An identical arch existed and was overwritten
    Replaced,
    /// An endpoint is not a live entity of the kind the relation needs
    Rejected,
}

/// Store of categories, pages and the four typed relations between them.
///
/// Categories and pages get dense ids from independent counters. Each relation
/// kind keeps its own adjacency map keyed by origin id; CsubC and CsupC are
/// stored independently, so inserting one never implies the other.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryGraph {
    categories: EntityIndex<Category>,
    pages: EntityIndex<Page>,
    csubc: Adjacency,
    csupc: Adjacency,
    cp: Adjacency,
    pc: Adjacency,
    edge_count: usize,
}

impl EntryGraph {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty store sized for roughly `capacity` categories
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_CAPACITY);
        Self {
            categories: EntityIndex::with_capacity(capacity),
            pages: EntityIndex::with_capacity(capacity.saturating_mul(3)),
            csubc: Adjacency::new(),
            csupc: Adjacency::new(),
            cp: Adjacency::new(),
            pc: Adjacency::new(),
            edge_count: 0,
        }
    }

    /// Number of live arches across all four relations
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.pages.is_empty()
    }

    /// Live category ids, ascending
    pub fn categories(&self) -> Vec<NodeId> {
        self.categories.ids().collect()
    }

    /// Live page ids, ascending
    pub fn pages(&self) -> Vec<NodeId> {
        self.pages.ids().collect()
    }

    // ---- entities ----

    /// Add a category unless one with the same name exists
    pub fn add_category(&mut self, name: &str) -> bool {
        self.insert_category(name).is_some()
    }

    /// Add a page unless one with the same name exists
    pub fn add_page(&mut self, name: &str) -> bool {
        self.insert_page(name).is_some()
    }

    fn insert_category(&mut self, name: &str) -> Option<NodeId> {
        let id = self.categories.insert(Category::new(name))?;
        self.csubc.insert(id, Vec::new());
        self.csupc.insert(id, Vec::new());
        self.cp.insert(id, Vec::new());
        Some(id)
    }

    fn insert_page(&mut self, name: &str) -> Option<NodeId> {
        let id = self.pages.insert(Page::new(name))?;
        self.pc.insert(id, Vec::new());
        Some(id)
    }

    /// Id of the named node, creating it first if it has not been seen.
    /// `None` if the name cannot be stored.
    fn ensure(&mut self, name: &str, kind: NodeKind) -> Option<NodeId> {
        match kind {
            NodeKind::Category => self
                .categories
                .id_of(name)
                .or_else(|| self.insert_category(name)),
            NodeKind::Page => self.pages.id_of(name).or_else(|| self.insert_page(name)),
        }
    }

    /// Remove a category and every arch that starts or ends at it
    pub fn remove_category(&mut self, category: &Category) -> bool {
        let Some((id, _)) = self.categories.remove_named(category.name()) else {
            return false;
        };

        let mut removed = 0;
        for adjacency in [&mut self.csubc, &mut self.csupc, &mut self.cp] {
            removed += adjacency.remove(&id).map_or(0, |arcs| arcs.len());
        }
        for adjacency in [&mut self.pc, &mut self.csubc, &mut self.csupc] {
            removed += remove_destiny(adjacency, id);
        }
        self.edge_count -= removed;

        log::debug!("Removed category '{}' (id {}) and {} arches", category, id, removed);
        true
    }

    /// Remove a page and every arch that starts or ends at it
    pub fn remove_page(&mut self, page: &Page) -> bool {
        let Some((id, _)) = self.pages.remove_named(page.name()) else {
            return false;
        };

        let mut removed = self.pc.remove(&id).map_or(0, |arcs| arcs.len());
        removed += remove_destiny(&mut self.cp, id);
        self.edge_count -= removed;

        log::debug!("Removed page '{}' (id {}) and {} arches", page, id, removed);
        true
    }

    /// Rename a category in place, keeping its id
    pub fn rename_category(&mut self, id: NodeId, name: &str) -> bool {
        self.categories.rename(id, name)
    }

    /// Rename a page in place, keeping its id
    pub fn rename_page(&mut self, id: NodeId, name: &str) -> bool {
        self.pages.rename(id, name)
    }

    // ---- arches ----

    fn adjacency(&self, kind: ArchKind) -> &Adjacency {
        match kind {
            ArchKind::CsubC => &self.csubc,
            ArchKind::CsupC => &self.csupc,
            ArchKind::CP => &self.cp,
            ArchKind::PC => &self.pc,
        }
    }

    fn adjacency_mut(&mut self, kind: ArchKind) -> &mut Adjacency {
        match kind {
            ArchKind::CsubC => &mut self.csubc,
            ArchKind::CsupC => &mut self.csupc,
            ArchKind::CP => &mut self.cp,
            ArchKind::PC => &mut self.pc,
        }
    }

    fn is_live(&self, id: NodeId, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Category => self.categories.contains(id),
            NodeKind::Page => self.pages.contains(id),
        }
    }

    /// Store an arch in the map for its kind.
    ///
    /// Arches whose endpoints are not live entities of the kinds the relation
    /// requires are dropped. Re-adding an identical arch overwrites it.
    pub fn add_edge(&mut self, arch: Arch) -> EdgeInsert {
        if !self.is_live(arch.origin, arch.kind.origin_kind())
            || !self.is_live(arch.destiny, arch.kind.destiny_kind())
        {
            log::debug!("Dropping {:?}: endpoint not indexed", arch);
            return EdgeInsert::Rejected;
        }

        let arcs = self.adjacency_mut(arch.kind).entry(arch.origin).or_default();
        if let Some(existing) = arcs.iter_mut().find(|a| **a == arch) {
            *existing = arch;
            return EdgeInsert::Replaced;
        }
        arcs.push(arch);
        self.edge_count += 1;
        EdgeInsert::Inserted
    }

    /// Remove the arch (origin, destiny, kind) if present
    pub fn remove_edge(&mut self, origin: NodeId, destiny: NodeId, kind: ArchKind) -> bool {
        let Some(arcs) = self.adjacency_mut(kind).get_mut(&origin) else {
            return false;
        };
        let Some(pos) = arcs.iter().position(|a| a.destiny == destiny) else {
            return false;
        };
        arcs.remove(pos);
        self.edge_count -= 1;
        true
    }

    /// Wire one text record, creating any entity it names for the first time
    pub fn set_data(&mut self, record: &Record) -> EdgeInsert {
        if !is_valid_name(&record.origin) || !is_valid_name(&record.destiny) {
            log::debug!("Dropping {:?}: name cannot be stored", record);
            return EdgeInsert::Rejected;
        }
        let origin = self.ensure(&record.origin, record.relation.origin_kind());
        let destiny = self.ensure(&record.destiny, record.relation.destiny_kind());
        let (Some(origin), Some(destiny)) = (origin, destiny) else {
            return EdgeInsert::Rejected;
        };
        self.add_edge(Arch::new(origin, destiny, record.relation))
    }

    /// Outgoing arches of one kind from `node`; empty for unknown nodes
    pub fn arches(&self, node: NodeId, kind: ArchKind) -> &[Arch] {
        self.adjacency(kind)
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every arch of one kind, ordered by origin id then insertion
    pub fn arches_of_kind(&self, kind: ArchKind) -> impl Iterator<Item = &Arch> + '_ {
        self.adjacency(kind).values().flatten()
    }

    /// Outgoing CsupC, CsubC and CP arches of a category
    pub fn category_arches(&self, node: NodeId) -> Vec<Arch> {
        [ArchKind::CsupC, ArchKind::CsubC, ArchKind::CP]
            .into_iter()
            .flat_map(|kind| self.arches(node, kind).iter().copied())
            .collect()
    }

    /// Outgoing PC arches of a page
    pub fn page_arches(&self, node: NodeId) -> Vec<Arch> {
        self.arches(node, ArchKind::PC).to_vec()
    }

    /// Distinct destinations reachable over one relation kind
    pub fn neighbors(&self, node: NodeId, kind: ArchKind) -> Vec<NodeId> {
        let mut out = Vec::new();
        push_destinies(&mut out, self.arches(node, kind));
        out
    }

    /// Distinct categories linked from a category through CsubC or CsupC
    pub fn category_adjacent_categories(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        push_destinies(&mut out, self.arches(node, ArchKind::CsubC));
        push_destinies(&mut out, self.arches(node, ArchKind::CsupC));
        out
    }

    /// Distinct categories a page belongs to
    pub fn page_adjacent_categories(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbors(node, ArchKind::PC)
    }

    /// Distinct pages a category contains
    pub fn category_adjacent_pages(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbors(node, ArchKind::CP)
    }

    /// Out-degree of a category over CsubC, CsupC and CP
    pub fn category_degree(&self, node: NodeId) -> usize {
        [ArchKind::CsubC, ArchKind::CsupC, ArchKind::CP]
            .into_iter()
            .map(|kind| self.arches(node, kind).len())
            .sum()
    }

    /// Out-degree of a page over PC
    pub fn page_degree(&self, node: NodeId) -> usize {
        self.arches(node, ArchKind::PC).len()
    }

    pub fn csubc_degree(&self, node: NodeId) -> usize {
        self.arches(node, ArchKind::CsubC).len()
    }

    pub fn csupc_degree(&self, node: NodeId) -> usize {
        self.arches(node, ArchKind::CsupC).len()
    }

    // ---- translation ----

    pub fn category_id(&self, name: &str) -> Option<NodeId> {
        self.categories.id_of(name)
    }

    pub fn page_id(&self, name: &str) -> Option<NodeId> {
        self.pages.id_of(name)
    }

    /// Id of a category value, by its name
    pub fn category_number(&self, category: &Category) -> Option<NodeId> {
        self.categories.id_of(category.name())
    }

    /// Id of a page value, by its name
    pub fn page_number(&self, page: &Page) -> Option<NodeId> {
        self.pages.id_of(page.name())
    }

    pub fn category(&self, id: NodeId) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn page(&self, id: NodeId) -> Option<&Page> {
        self.pages.get(id)
    }

    pub fn category_name(&self, id: NodeId) -> Option<&str> {
        self.categories.name_of(id)
    }

    pub fn page_name(&self, id: NodeId) -> Option<&str> {
        self.pages.name_of(id)
    }

    fn node_name(&self, id: NodeId, kind: NodeKind) -> Option<&str> {
        match kind {
            NodeKind::Category => self.category_name(id),
            NodeKind::Page => self.page_name(id),
        }
    }

    /// Every arch as a named record, grouped by relation in dump order
    pub fn records(&self) -> Vec<Record> {
        ArchKind::ALL
            .into_iter()
            .flat_map(|kind| self.arches_of_kind(kind))
            .filter_map(|arc| {
                let origin = self.node_name(arc.origin, arc.kind.origin_kind())?;
                let destiny = self.node_name(arc.destiny, arc.kind.destiny_kind())?;
                Some(Record::new(origin, arc.kind, destiny))
            })
            .collect()
    }
}

impl Default for EntryGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn push_destinies(out: &mut Vec<NodeId>, arcs: &[Arch]) {
    for arc in arcs {
        if !out.contains(&arc.destiny) {
            out.push(arc.destiny);
        }
    }
}

/// Drop every arch pointing at `destiny`, returning how many went
fn remove_destiny(adjacency: &mut Adjacency, destiny: NodeId) -> usize {
    let mut removed = 0;
    for arcs in adjacency.values_mut() {
        let before = arcs.len();
        arcs.retain(|a| a.destiny != destiny);
        removed += before - arcs.len();
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_edges(graph: &EntryGraph) -> usize {
        ArchKind::ALL
            .into_iter()
            .map(|kind| graph.arches_of_kind(kind).count())
            .sum()
    }

    fn sample() -> EntryGraph {
        let mut graph = EntryGraph::with_capacity(16);
        for record in [
            "Science cat CsupC Physics cat",
            "Science cat CsupC Chemistry cat",
            "Physics cat CsubC Science cat",
            "Chemistry cat CsubC Science cat",
            "Physics cat CP Atom page",
            "Chemistry cat CP Atom page",
            "Atom page PC Physics cat",
            "Atom page PC Chemistry cat",
        ] {
            graph.set_data(&record.parse().unwrap());
        }
        graph
    }

    #[test]
    fn test_add_category_is_name_unique() {
        let mut graph = EntryGraph::with_capacity(4);
        assert!(graph.add_category("Physics"));
        assert!(!graph.add_category("Physics"));
        assert!(graph.add_page("Physics"));
        assert_eq!(graph.category_count(), 1);
        assert_eq!(graph.page_count(), 1);
    }

    #[test]
    fn test_add_edge_rejects_unknown_endpoints() {
        let mut graph = EntryGraph::with_capacity(4);
        graph.add_category("Physics");
        graph.add_category("Chemistry");
        graph.add_page("Atom");
        let physics = graph.category_id("Physics").unwrap();
        let chemistry = graph.category_id("Chemistry").unwrap();
        let atom = graph.page_id("Atom").unwrap();

        assert_eq!(
            graph.add_edge(Arch::new(physics, 7, ArchKind::CsubC)),
            EdgeInsert::Rejected
        );
        // There is no page with the id of Chemistry
        assert_eq!(
            graph.add_edge(Arch::new(chemistry, physics, ArchKind::PC)),
            EdgeInsert::Rejected
        );
        assert_eq!(
            graph.add_edge(Arch::new(atom, chemistry, ArchKind::PC)),
            EdgeInsert::Inserted
        );
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_count(), live_edges(&graph));
    }

    #[test]
    fn test_add_edge_twice_keeps_one_entry() {
        let mut graph = EntryGraph::with_capacity(4);
        graph.add_category("Physics");
        graph.add_category("Science");
        let physics = graph.category_id("Physics").unwrap();
        let science = graph.category_id("Science").unwrap();
        let arch = Arch::new(physics, science, ArchKind::CsubC);

        assert_eq!(graph.add_edge(arch), EdgeInsert::Inserted);
        assert_eq!(graph.add_edge(arch), EdgeInsert::Replaced);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.arches(physics, ArchKind::CsubC), &[arch]);
    }

    #[test]
    fn test_remove_category_cascades() {
        let mut graph = sample();
        assert_eq!(graph.edge_count(), 8);
        let physics = graph.category_id("Physics").unwrap();

        assert!(graph.remove_category(&Category::new("Physics")));
        assert!(!graph.remove_category(&Category::new("Physics")));

        for kind in ArchKind::ALL {
            for arc in graph.arches_of_kind(kind) {
                if kind != ArchKind::PC {
                    assert_ne!(arc.origin, physics);
                }
                if kind != ArchKind::CP {
                    assert_ne!(arc.destiny, physics);
                }
            }
        }
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.edge_count(), live_edges(&graph));
        assert_eq!(graph.category_id("Physics"), None);
    }

    #[test]
    fn test_remove_page_cascades() {
        let mut graph = sample();
        assert!(graph.remove_page(&Page::new("Atom")));
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.edge_count(), live_edges(&graph));
        assert!(graph.arches_of_kind(ArchKind::CP).next().is_none());
        assert!(graph.arches_of_kind(ArchKind::PC).next().is_none());
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = sample();
        let science = graph.category_id("Science").unwrap();
        let physics = graph.category_id("Physics").unwrap();

        assert!(graph.remove_edge(science, physics, ArchKind::CsupC));
        assert!(!graph.remove_edge(science, physics, ArchKind::CsupC));
        assert!(!graph.remove_edge(science, physics, ArchKind::CsubC));
        assert_eq!(graph.edge_count(), 7);
        assert_eq!(graph.edge_count(), live_edges(&graph));
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let graph = sample();
        assert_eq!(graph.category_id("Biology"), None);
        assert_eq!(graph.category_name(99), None);
        assert_eq!(graph.page(99), None);
        assert!(graph.arches(99, ArchKind::CsubC).is_empty());
        assert!(graph.neighbors(99, ArchKind::CP).is_empty());
        assert_eq!(graph.category_degree(99), 0);
    }

    #[test]
    fn test_degrees_and_adjacency() {
        let graph = sample();
        let science = graph.category_id("Science").unwrap();
        let physics = graph.category_id("Physics").unwrap();
        let atom = graph.page_id("Atom").unwrap();

        assert_eq!(graph.csupc_degree(science), 2);
        assert_eq!(graph.category_degree(physics), 2);
        assert_eq!(graph.page_degree(atom), 2);
        assert_eq!(graph.category_adjacent_categories(physics), vec![science]);
        assert_eq!(graph.category_adjacent_pages(physics), vec![atom]);
        assert_eq!(graph.page_adjacent_categories(atom).len(), 2);
        assert_eq!(graph.category_arches(science).len(), 2);
        assert_eq!(graph.page_arches(atom).len(), 2);
    }

    #[test]
    fn test_rename_keeps_id_and_edges() {
        let mut graph = sample();
        let physics = graph.category_id("Physics").unwrap();

        assert!(graph.rename_category(physics, "Physical_sciences"));
        assert_eq!(graph.category_id("Physical_sciences"), Some(physics));
        assert_eq!(graph.category_id("Physics"), None);
        assert_eq!(graph.category_degree(physics), 2);
        assert!(graph
            .records()
            .iter()
            .any(|r| r.origin == "Physical_sciences" && r.relation == ArchKind::CsubC));
    }

    #[test]
    fn test_names_must_survive_a_dump() {
        let mut graph = sample();
        assert!(!graph.add_category(""));
        assert!(!graph.add_page("Quantum field"));

        let physics = graph.category_id("Physics").unwrap();
        assert!(!graph.rename_category(physics, "Particle physics"));
        assert_eq!(graph.category_name(physics), Some("Physics"));

        let before = graph.clone();
        let record = Record::new("Particle physics", ArchKind::CsubC, "Science");
        assert_eq!(graph.set_data(&record), EdgeInsert::Rejected);
        assert_eq!(graph, before);

        let mut reloaded = EntryGraph::new();
        crate::data::load_lines(&mut reloaded, crate::data::dump_lines(&graph)).unwrap();
        assert_eq!(reloaded.edge_count(), graph.edge_count());
    }

    #[test]
    fn test_oversized_capacity_is_clamped() {
        let mut graph = EntryGraph::with_capacity(usize::MAX);
        assert!(graph.add_category("Physics"));
        assert_eq!(graph.category_count(), 1);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.remove_page(&Page::new("Atom"));
        copy.add_category("Biology");
        assert_ne!(copy, original);
        assert_eq!(original.edge_count(), 8);
        assert_eq!(original.page_count(), 1);
    }
}
