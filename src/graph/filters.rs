//! Similarity filters and node selections used to build a projection

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::graph::entity::NodeId;
use crate::graph::store::EntryGraph;

/// A similarity dimension between two categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Shared CsubC destinations
    Subcategories,
    /// Shared CsupC destinations
    Supercategories,
    /// Shared pages (CP)
    Pages,
    /// CsubC + CsupC + CP overlap
    Categories,
    /// Direct CsubC/CsupC arches between the pair
    Linked,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Subcategories,
        Dimension::Supercategories,
        Dimension::Pages,
        Dimension::Categories,
        Dimension::Linked,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Subcategories => "subcategories",
            Dimension::Supercategories => "supercategories",
            Dimension::Pages => "pages",
            Dimension::Categories => "categories",
            Dimension::Linked => "linked",
        }
    }

    /// Raw similarity of two categories along this dimension
    pub fn measure(self, graph: &EntryGraph, a: NodeId, b: NodeId) -> usize {
        match self {
            Dimension::Subcategories => graph.common_csubc(a, b),
            Dimension::Supercategories => graph.common_csupc(a, b),
            Dimension::Pages => graph.pages_common(a, b),
            Dimension::Categories => graph.categories_common(a, b),
            Dimension::Linked => graph.linked(a, b),
        }
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| Error::invalid("filters", format!("unknown dimension '{s}'")))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Priority per similarity dimension. A priority of 0 disables the dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FiltersRepr")]
pub struct Filters {
    priorities: BTreeMap<Dimension, u32>,
}

/// Serialized shape of [`Filters`]; zero priorities are dropped on the way in
#[derive(Deserialize)]
struct FiltersRepr {
    priorities: BTreeMap<Dimension, u32>,
}

impl From<FiltersRepr> for Filters {
    fn from(repr: FiltersRepr) -> Self {
        let mut filters = Filters::none();
        for (dimension, priority) in repr.priorities {
            filters.set(dimension, priority);
        }
        filters
    }
}

impl Filters {
    /// Every dimension disabled
    pub fn none() -> Self {
        Self {
            priorities: BTreeMap::new(),
        }
    }

    pub fn with(mut self, dimension: Dimension, priority: u32) -> Self {
        self.set(dimension, priority);
        self
    }

    pub fn set(&mut self, dimension: Dimension, priority: u32) {
        if priority == 0 {
            self.priorities.remove(&dimension);
        } else {
            self.priorities.insert(dimension, priority);
        }
    }

    pub fn priority(&self, dimension: Dimension) -> u32 {
        self.priorities.get(&dimension).copied().unwrap_or(0)
    }

    /// Enabled dimensions and their priorities
    pub fn enabled(&self) -> impl Iterator<Item = (Dimension, u32)> + '_ {
        self.priorities.iter().map(|(&d, &p)| (d, p))
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }

    /// Weighted similarity of a pair: the sum of priority x measure over the
    /// enabled dimensions
    pub fn weight(&self, graph: &EntryGraph, a: NodeId, b: NodeId) -> f64 {
        self.enabled()
            .map(|(dimension, priority)| {
                priority as f64 * dimension.measure(graph, a, b) as f64
            })
            .sum()
    }
}

impl Default for Filters {
    fn default() -> Self {
        Filters::none()
            .with(Dimension::Subcategories, 1)
            .with(Dimension::Supercategories, 1)
            .with(Dimension::Pages, 1)
            .with(Dimension::Linked, 2)
    }
}

/// Parses `name=priority` pairs separated by commas, e.g. `pages=2,linked=1`
impl FromStr for Filters {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut filters = Filters::none();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (name, priority) = item.split_once('=').ok_or_else(|| {
                Error::invalid("filters", format!("expected name=priority, found '{item}'"))
            })?;
            let dimension: Dimension = name.trim().parse()?;
            let priority: u32 = priority.trim().parse().map_err(|_| {
                Error::invalid("filters", format!("bad priority for '{dimension}'"))
            })?;
            filters.set(dimension, priority);
        }
        Ok(filters)
    }
}

impl fmt::Display for Filters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (dimension, priority) in self.enabled() {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{dimension}={priority}")?;
            first = false;
        }
        Ok(())
    }
}

/// Which categories take part in a projection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selections {
    /// Every live category
    #[default]
    All,
    /// Only these category ids
    Only(BTreeSet<NodeId>),
}

impl Selections {
    pub fn only(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Selections::Only(ids.into_iter().collect())
    }

    /// Select categories by name; names the store does not know are skipped
    pub fn from_names<'a>(graph: &EntryGraph, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ids = BTreeSet::new();
        for name in names {
            match graph.category_id(name) {
                Some(id) => {
                    ids.insert(id);
                }
                None => log::warn!("Selection names unknown category '{}'", name),
            }
        }
        Selections::Only(ids)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        match self {
            Selections::All => true,
            Selections::Only(ids) => ids.contains(&id),
        }
    }

    /// Selected ids that are live in the store, ascending
    pub fn resolve(&self, graph: &EntryGraph) -> Vec<NodeId> {
        match self {
            Selections::All => graph.categories(),
            Selections::Only(_) => graph
                .categories()
                .into_iter()
                .filter(|&id| self.contains(id))
                .collect(),
        }
    }
}
