//! Persistence media for entity bodies and relation markers.

use crate::error::StorageResult;
use crate::relation::Relation;
use infracat_entities::Entity;
use std::fmt;

/// Storage for the bodies of one entity family.
///
/// Tables are plain maps from identifier to value. They do not enforce the
/// provider contract (duplicate rejection, not-found on delete); the owning
/// store does that under its lock.
///
/// # Implementors
///
/// - [`super::MemoryTable`] - values kept in memory
/// - [`super::FileTable`] - one JSON file per entity
pub trait Table<T: Entity>: Send + fmt::Debug {
    /// Reads the value stored under `id`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored value cannot be read or decoded.
    fn get(&self, id: &str) -> StorageResult<Option<T>>;

    /// Returns true if a value is stored under `id`.
    fn contains(&self, id: &str) -> bool;

    /// Stores `value` under its identifier, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be encoded or written.
    fn put(&mut self, value: T) -> StorageResult<()>;

    /// Removes the value stored under `id`.
    ///
    /// Returns whether a value was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exists but cannot be removed.
    fn remove(&mut self, id: &str) -> StorageResult<bool>;

    /// Returns every stored value.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any stored value cannot be read or decoded.
    fn values(&self) -> StorageResult<Vec<T>>;

    /// Removes every stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the values cannot be removed.
    fn clear(&mut self) -> StorageResult<()>;
}

/// Raw parent/child markers for one relation.
///
/// # Implementors
///
/// - [`super::MemoryMarkers`] - ordered child lists per parent
/// - [`super::FileMarkers`] - empty marker files per child
pub trait MarkerSet: Send + fmt::Debug {
    /// Records the pair. Recording an existing pair is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    fn insert(&mut self, parent: &str, child: &str) -> StorageResult<()>;

    /// Removes the pair and returns whether it was recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the marker exists but cannot be removed.
    fn remove(&mut self, parent: &str, child: &str) -> StorageResult<bool>;

    /// Returns true if the pair is recorded.
    fn contains(&self, parent: &str, child: &str) -> bool;

    /// Returns the children recorded under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the markers cannot be listed.
    fn children(&self, parent: &str) -> StorageResult<Vec<String>>;

    /// Removes every recorded pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the markers cannot be removed.
    fn clear(&mut self) -> StorageResult<()>;
}

/// Builds the media used by an [`crate::EntityStore`].
///
/// A backend is a factory: it is consulted once when a store is opened and
/// is not retained by it.
pub trait Backend {
    /// Opens the body table of entity family `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be prepared.
    fn table<T: Entity>(&self) -> StorageResult<Box<dyn Table<T>>>;

    /// Opens the markers of `relation`, whose parent family is `family`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be prepared.
    fn markers(&self, family: &str, relation: Relation) -> StorageResult<Box<dyn MarkerSet>>;
}
