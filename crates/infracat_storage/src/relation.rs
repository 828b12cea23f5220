//! Parent/child relation indexes.
//!
//! A relation records that a child identifier is attached to a parent
//! identifier. It lives next to the parent's entity table and is independent
//! of the child's own record: deleting either side never touches the other.
//!
//! [`RelationIndex`] implements the attach/detach/exists/list contract once,
//! on top of any [`MarkerSet`] medium.

use crate::backend::MarkerSet;
use crate::error::{StorageError, StorageResult};
use std::fmt;

/// The relations indexed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    /// Clusters attached to a network.
    NetworkClusters,
    /// Application descriptors registered in a network.
    NetworkAppDescriptors,
    /// Application instances deployed in a network.
    NetworkAppInstances,
    /// Nodes attached to a cluster.
    ClusterNodes,
}

impl Relation {
    /// Directory name of the relation under its parent family.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Relation::NetworkClusters => "clusters",
            Relation::NetworkAppDescriptors => "appdesc",
            Relation::NetworkAppInstances => "appinst",
            Relation::ClusterNodes => "nodes",
        }
    }

    /// Entity kind of the parent side.
    #[must_use]
    pub const fn parent_kind(self) -> &'static str {
        match self {
            Relation::NetworkClusters
            | Relation::NetworkAppDescriptors
            | Relation::NetworkAppInstances => "network",
            Relation::ClusterNodes => "cluster",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.parent_kind(), self.dir_name())
    }
}

/// Checks that `id` can be used as a key by every backend.
///
/// File-backed stores use identifiers as file names, so path separators,
/// NUL bytes and a leading dot (reserved for temporary files) are rejected.
pub fn validate_id(id: &str) -> StorageResult<()> {
    if id.is_empty() {
        return Err(StorageError::invalid_id(id, "identifier is empty"));
    }
    if id.starts_with('.') {
        return Err(StorageError::invalid_id(id, "identifier starts with a dot"));
    }
    if id.contains(['/', '\\', '\0']) {
        return Err(StorageError::invalid_id(
            id,
            "identifier contains a path separator or NUL",
        ));
    }
    Ok(())
}

/// Attach/detach bookkeeping for one relation.
#[derive(Debug)]
pub struct RelationIndex {
    relation: Relation,
    markers: Box<dyn MarkerSet>,
}

impl RelationIndex {
    /// Creates an index over the given medium.
    pub fn new(relation: Relation, markers: Box<dyn MarkerSet>) -> Self {
        Self { relation, markers }
    }

    /// Returns the indexed relation.
    #[must_use]
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Records `child` under `parent`.
    ///
    /// Parent existence is checked by the owning store before calling this.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyAttached` if the pair is already recorded.
    pub fn attach(&mut self, parent: &str, child: &str) -> StorageResult<()> {
        validate_id(child)?;
        if self.markers.contains(parent, child) {
            return Err(StorageError::AlreadyAttached {
                relation: self.relation,
                parent: parent.to_string(),
                child: child.to_string(),
            });
        }
        self.markers.insert(parent, child)
    }

    /// Removes `child` from `parent`.
    ///
    /// # Errors
    ///
    /// Returns `NotAttached` if the pair is not recorded.
    pub fn detach(&mut self, parent: &str, child: &str) -> StorageResult<()> {
        let removed = validate_id(parent).is_ok()
            && validate_id(child).is_ok()
            && self.markers.remove(parent, child)?;
        if !removed {
            return Err(StorageError::not_attached(self.relation, parent, child));
        }
        Ok(())
    }

    /// Returns true if `child` is recorded under `parent`.
    #[must_use]
    pub fn contains(&self, parent: &str, child: &str) -> bool {
        validate_id(parent).is_ok()
            && validate_id(child).is_ok()
            && self.markers.contains(parent, child)
    }

    /// Returns the children recorded under `parent`.
    pub fn children(&self, parent: &str) -> StorageResult<Vec<String>> {
        validate_id(parent)?;
        self.markers.children(parent)
    }

    /// Drops every recorded pair.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.markers.clear()
    }
}
