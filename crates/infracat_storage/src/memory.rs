//! In-memory storage media.

use crate::backend::{Backend, MarkerSet, Table};
use crate::error::StorageResult;
use crate::relation::Relation;
use infracat_entities::Entity;
use std::collections::BTreeMap;

/// An in-memory entity table.
///
/// Values are kept decoded, so `put` is a full-value replace and nothing can
/// fail. Values are listed in identifier order.
///
/// This table is not synchronized; the owning store's lock guards it.
#[derive(Debug)]
pub struct MemoryTable<T> {
    rows: BTreeMap<String, T>,
}

impl<T> MemoryTable<T> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no value is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Table<T> for MemoryTable<T> {
    fn get(&self, id: &str) -> StorageResult<Option<T>> {
        Ok(self.rows.get(id).cloned())
    }

    fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    fn put(&mut self, value: T) -> StorageResult<()> {
        self.rows.insert(value.id().to_string(), value);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> StorageResult<bool> {
        Ok(self.rows.remove(id).is_some())
    }

    fn values(&self) -> StorageResult<Vec<T>> {
        Ok(self.rows.values().cloned().collect())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.rows.clear();
        Ok(())
    }
}

/// In-memory relation markers: parent identifier to children in attach order.
#[derive(Debug, Default)]
pub struct MemoryMarkers {
    children: BTreeMap<String, Vec<String>>,
}

impl MemoryMarkers {
    /// Creates an empty marker set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkerSet for MemoryMarkers {
    fn insert(&mut self, parent: &str, child: &str) -> StorageResult<()> {
        let children = self.children.entry(parent.to_string()).or_default();
        if !children.iter().any(|c| c == child) {
            children.push(child.to_string());
        }
        Ok(())
    }

    fn remove(&mut self, parent: &str, child: &str) -> StorageResult<bool> {
        let Some(children) = self.children.get_mut(parent) else {
            return Ok(false);
        };
        let before = children.len();
        children.retain(|c| c != child);
        let removed = children.len() != before;
        if children.is_empty() {
            self.children.remove(parent);
        }
        Ok(removed)
    }

    fn contains(&self, parent: &str, child: &str) -> bool {
        self.children
            .get(parent)
            .is_some_and(|children| children.iter().any(|c| c == child))
    }

    fn children(&self, parent: &str) -> StorageResult<Vec<String>> {
        Ok(self.children.get(parent).cloned().unwrap_or_default())
    }

    fn clear(&mut self) -> StorageResult<()> {
        self.children.clear();
        Ok(())
    }
}

/// Builds in-memory media.
///
/// Suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral catalogs that don't need persistence
///
/// # Example
///
/// ```rust
/// use infracat_entities::Network;
/// use infracat_storage::{EntityProvider, EntityStore, MemoryBackend};
///
/// let store = EntityStore::<Network>::with_backend(&MemoryBackend).unwrap();
/// store.add(Network::new("n1", "lab")).unwrap();
/// assert!(store.exists("n1"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBackend;

impl Backend for MemoryBackend {
    fn table<T: Entity>(&self) -> StorageResult<Box<dyn Table<T>>> {
        Ok(Box::new(MemoryTable::<T>::new()))
    }

    fn markers(&self, _family: &str, _relation: Relation) -> StorageResult<Box<dyn MarkerSet>> {
        Ok(Box::new(MemoryMarkers::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infracat_entities::Network;

    #[test]
    fn memory_new_is_empty() {
        let table = MemoryTable::<Network>::new();
        assert!(table.is_empty());
        assert!(table.values().unwrap().is_empty());
    }

    #[test]
    fn memory_put_replaces_whole_value() {
        let mut table = MemoryTable::new();
        table.put(Network::new("n1", "before")).unwrap();
        table.put(Network::new("n1", "after")).unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("n1").unwrap().unwrap().name, "after");
    }

    #[test]
    fn memory_remove_reports_presence() {
        let mut table = MemoryTable::new();
        table.put(Network::new("n1", "lab")).unwrap();

        assert!(table.remove("n1").unwrap());
        assert!(!table.remove("n1").unwrap());
        assert!(table.get("n1").unwrap().is_none());
    }

    #[test]
    fn memory_values_are_sorted_by_id() {
        let mut table = MemoryTable::new();
        table.put(Network::new("b", "second")).unwrap();
        table.put(Network::new("a", "first")).unwrap();

        let names: Vec<_> = table.values().unwrap().into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn memory_clear() {
        let mut table = MemoryTable::new();
        table.put(Network::new("n1", "lab")).unwrap();
        table.clear().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn markers_insert_is_idempotent() {
        let mut markers = MemoryMarkers::new();
        markers.insert("n1", "c1").unwrap();
        markers.insert("n1", "c1").unwrap();
        assert_eq!(markers.children("n1").unwrap(), vec!["c1"]);
    }

    #[test]
    fn markers_remove_last_child_drops_parent() {
        let mut markers = MemoryMarkers::new();
        markers.insert("n1", "c1").unwrap();

        assert!(markers.remove("n1", "c1").unwrap());
        assert!(!markers.remove("n1", "c1").unwrap());
        assert!(markers.children.is_empty());
    }

    #[test]
    fn markers_unknown_parent_has_no_children() {
        let markers = MemoryMarkers::new();
        assert!(markers.children("ghost").unwrap().is_empty());
        assert!(!markers.contains("ghost", "c1"));
    }
}
