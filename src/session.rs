//! Working session: one store, its configuration and the latest results
//!
//! Every operation runs to completion on the caller's thread. The session owns
//! the store; a projection is rebuilt from it on demand and dropped whenever
//! the store, the filters or the selections change.

use std::fmt;
use std::path::Path;

use crate::cluster::{check_p, filter_small, Algorithm, Controller};
use crate::community::CommunitySet;
use crate::config::Config;
use crate::data;
use crate::error::Result;
use crate::graph::{project, EntryGraph, Filters, ProjectionGraph, Selections};

/// Lifecycle stage of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Empty,
    Populated,
    Projected,
    Partitioned,
    Edited,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Empty => "empty",
            Stage::Populated => "populated",
            Stage::Projected => "projected",
            Stage::Partitioned => "partitioned",
            Stage::Edited => "edited",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    capacity: usize,
    store: EntryGraph,
    filters: Filters,
    selections: Selections,
    algorithm: Algorithm,
    p: u8,
    min_community_size: usize,
    projection: Option<ProjectionGraph>,
    result: Option<CommunitySet>,
}

impl Session {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            capacity: config.capacity,
            store: EntryGraph::with_capacity(config.capacity),
            filters: config.filters.clone(),
            selections: Selections::All,
            algorithm: config.algorithm,
            p: config.p,
            min_community_size: config.min_community_size,
            projection: None,
            result: None,
        }
    }

    pub fn stage(&self) -> Stage {
        match (&self.result, &self.projection) {
            (Some(result), _) if result.is_modified() => Stage::Edited,
            (Some(_), _) => Stage::Partitioned,
            (None, Some(_)) => Stage::Projected,
            (None, None) if self.store.is_empty() => Stage::Empty,
            (None, None) => Stage::Populated,
        }
    }

    fn invalidate(&mut self) {
        if self.projection.take().is_some() {
            log::debug!("Projection invalidated");
        }
    }

    pub fn store(&self) -> &EntryGraph {
        &self.store
    }

    /// Mutable access to the store; drops the current projection
    pub fn store_mut(&mut self) -> &mut EntryGraph {
        self.invalidate();
        &mut self.store
    }

    pub fn load_lines<I, S>(&mut self, lines: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = data::load_lines(&mut self.store, lines)?;
        self.invalidate();
        Ok(added)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let added = data::load_file(&mut self.store, path)?;
        self.invalidate();
        Ok(added)
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        data::save_file(&self.store, path)
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.invalidate();
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn set_selections(&mut self, selections: Selections) {
        self.selections = selections;
        self.invalidate();
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn p(&self) -> u8 {
        self.p
    }

    pub fn set_p(&mut self, p: u8) -> Result<()> {
        self.p = check_p(p)?;
        Ok(())
    }

    pub fn projection(&self) -> Option<&ProjectionGraph> {
        self.projection.as_ref()
    }

    /// Build the projection from the current store, filters and selections
    pub fn generate(&mut self) -> &ProjectionGraph {
        self.projection
            .insert(project(&self.store, &self.filters, &self.selections))
    }

    /// Detect communities on the current projection, building it first if
    /// needed, and keep the result
    pub fn run(&mut self) -> Result<&CommunitySet> {
        let controller = Controller::new(self.algorithm, self.p)?;
        if self.projection.is_none() {
            self.generate();
        }
        let raw = match &self.projection {
            Some(projection) => controller.run(projection),
            None => Vec::new(),
        };
        let raw = filter_small(raw, self.min_community_size);

        let result = CommunitySet::from_partition(
            &raw,
            &self.store,
            self.algorithm,
            self.p,
            &self.filters,
            &self.selections,
        );
        Ok(&*self.result.insert(result))
    }

    pub fn result(&self) -> Option<&CommunitySet> {
        self.result.as_ref()
    }

    pub fn result_mut(&mut self) -> Option<&mut CommunitySet> {
        self.result.as_mut()
    }

    /// Drop the store and every derived value, keeping the configuration
    pub fn reset(&mut self) {
        self.store = EntryGraph::with_capacity(self.capacity);
        self.projection = None;
        self.result = None;
        log::info!("Session reset");
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
