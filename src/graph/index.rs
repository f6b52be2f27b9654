//! Bidirectional id <-> entity index

use std::collections::{BTreeMap, HashMap};

use crate::graph::entity::{Category, NodeId, Page};

/// An entity addressed by a mutable display name
pub trait Named {
    fn name(&self) -> &str;
    fn rename(&mut self, name: &str);
}

impl Named for Category {
    fn name(&self) -> &str {
        Category::name(self)
    }

    fn rename(&mut self, name: &str) {
        self.set_name(name);
    }
}

impl Named for Page {
    fn name(&self) -> &str {
        Page::name(self)
    }

    fn rename(&mut self, name: &str) {
        self.set_name(name);
    }
}

/// Names must survive a text dump: non-empty, no whitespace
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

/// Entities stored by stable id, with a name lookup kept in step on every
/// insert, rename and removal. Ids come from a monotonic counter and are never
/// handed out twice.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityIndex<E> {
    by_id: BTreeMap<NodeId, E>,
    by_name: HashMap<String, NodeId>,
    next_id: NodeId,
}

impl<E: Named> EntityIndex<E> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            by_id: BTreeMap::new(),
            by_name: HashMap::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Insert an entity under the next id, unless its name is invalid or
    /// already taken
    pub fn insert(&mut self, entity: E) -> Option<NodeId> {
        if !is_valid_name(entity.name()) || self.by_name.contains_key(entity.name()) {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.by_name.insert(entity.name().to_string(), id);
        self.by_id.insert(id, entity);
        Some(id)
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&E> {
        self.by_id.get(&id)
    }

    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.by_id.get(&id).map(|e| e.name())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Remove the entity with the given name, returning its id
    pub fn remove_named(&mut self, name: &str) -> Option<(NodeId, E)> {
        let id = self.by_name.remove(name)?;
        let entity = self.by_id.remove(&id)?;
        Some((id, entity))
    }

    /// Give an entity a new name under the same id.
    ///
    /// Fails if the name is invalid, the id is unknown or another entity
    /// already uses the name.
    pub fn rename(&mut self, id: NodeId, name: &str) -> bool {
        if !is_valid_name(name) {
            return false;
        }
        match self.by_name.get(name) {
            Some(&owner) if owner == id => return true,
            Some(_) => return false,
            None => {}
        }

        let Some(entity) = self.by_id.get_mut(&id) else {
            return false;
        };
        self.by_name.remove(entity.name());
        entity.rename(name);
        self.by_name.insert(name.to_string(), id);
        true
    }

    /// Live ids in ascending order
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.by_id.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl<E: Named> Default for EntityIndex<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_rejects_duplicate_names() {
        let mut index = EntityIndex::new();
        assert_eq!(index.insert(Category::new("Physics")), Some(0));
        assert_eq!(index.insert(Category::new("Chemistry")), Some(1));
        assert_eq!(index.insert(Category::new("Physics")), None);
        assert_eq!(index.len(), 2);
        assert_eq!(index.insert(Category::new("Biology")), Some(2));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut index = EntityIndex::new();
        index.insert(Page::new("Atom"));
        index.remove_named("Atom");
        assert_eq!(index.insert(Page::new("Atom")), Some(1));
        assert!(!index.contains(0));
    }

    #[test]
    fn test_rename_updates_name_lookup() {
        let mut index = EntityIndex::new();
        let id = index.insert(Category::new("Phisics")).unwrap();
        index.insert(Category::new("Chemistry"));

        assert!(index.rename(id, "Physics"));
        assert_eq!(index.id_of("Physics"), Some(id));
        assert_eq!(index.id_of("Phisics"), None);
        assert_eq!(index.name_of(id), Some("Physics"));

        // Taken by another entity
        assert!(!index.rename(id, "Chemistry"));
        // Unknown id
        assert!(!index.rename(42, "Biology"));
    }

    #[test]
    fn test_insert_rejects_unencodable_names() {
        let mut index = EntityIndex::new();
        assert_eq!(index.insert(Category::new("")), None);
        assert_eq!(index.insert(Category::new("Particle physics")), None);
        assert!(index.is_empty());

        let mut pages = EntityIndex::new();
        assert_eq!(pages.insert(Page::new("Tab\there")), None);
        assert_eq!(pages.insert(Page::new("Atom")), Some(0));
    }

    #[test]
    fn test_rename_rejects_unencodable_names() {
        let mut index = EntityIndex::new();
        let id = index.insert(Category::new("Physics")).unwrap();
        assert!(!index.rename(id, ""));
        assert!(!index.rename(id, "Particle physics"));
        assert_eq!(index.name_of(id), Some("Physics"));
        assert_eq!(index.id_of("Physics"), Some(id));
    }
}
