//! Generic entity store implementing every provider contract.

use crate::backend::{Backend, Table};
use crate::error::{StorageError, StorageResult};
use crate::file::FileBackend;
use crate::memory::{MemoryMarkers, MemoryTable};
use crate::provider::{ClusterProvider, EntityProvider, NetworkProvider};
use crate::relation::{validate_id, Relation, RelationIndex};
use infracat_entities::{
    AppDescriptor, AppInstance, Cluster, Entity, Network, Node, Password, User, UserAccess,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::debug;

/// An entity family together with the relations it is the parent of.
pub trait Family: Entity {
    /// Relations indexed next to this family's table.
    ///
    /// Their directory names are reserved: the store rejects them as
    /// identifiers with `InvalidId` on every backend.
    const RELATIONS: &'static [Relation];
}

impl Family for Network {
    const RELATIONS: &'static [Relation] = &[
        Relation::NetworkClusters,
        Relation::NetworkAppDescriptors,
        Relation::NetworkAppInstances,
    ];
}

impl Family for Cluster {
    const RELATIONS: &'static [Relation] = &[Relation::ClusterNodes];
}

impl Family for Node {
    const RELATIONS: &'static [Relation] = &[];
}

impl Family for AppDescriptor {
    const RELATIONS: &'static [Relation] = &[];
}

impl Family for AppInstance {
    const RELATIONS: &'static [Relation] = &[];
}

impl Family for User {
    const RELATIONS: &'static [Relation] = &[];
}

impl Family for UserAccess {
    const RELATIONS: &'static [Relation] = &[];
}

impl Family for Password {
    const RELATIONS: &'static [Relation] = &[];
}

/// Network store.
pub type NetworkStore = EntityStore<Network>;
/// Cluster store.
pub type ClusterStore = EntityStore<Cluster>;
/// Node store.
pub type NodeStore = EntityStore<Node>;
/// App descriptor store.
pub type AppDescriptorStore = EntityStore<AppDescriptor>;
/// App instance store.
pub type AppInstanceStore = EntityStore<AppInstance>;
/// User store.
pub type UserStore = EntityStore<User>;
/// User access store.
pub type UserAccessStore = EntityStore<UserAccess>;
/// Password store.
pub type PasswordStore = EntityStore<Password>;

struct StoreState<T: Entity> {
    table: Box<dyn Table<T>>,
    relations: Vec<RelationIndex>,
}

impl<T: Entity> StoreState<T> {
    /// Rejects ids the store cannot hold, including the directory names of
    /// the relations it indexes.
    fn check_id(&self, id: &str) -> StorageResult<()> {
        validate_id(id)?;
        if self
            .relations
            .iter()
            .any(|idx| idx.relation().dir_name() == id)
        {
            return Err(StorageError::invalid_id(
                id,
                "identifier is reserved for a relation directory",
            ));
        }
        Ok(())
    }

    fn index(&self, relation: Relation) -> StorageResult<&RelationIndex> {
        self.relations
            .iter()
            .find(|idx| idx.relation() == relation)
            .ok_or(StorageError::UnsupportedRelation {
                kind: T::KIND,
                relation,
            })
    }

    fn index_mut(&mut self, relation: Relation) -> StorageResult<&mut RelationIndex> {
        self.relations
            .iter_mut()
            .find(|idx| idx.relation() == relation)
            .ok_or(StorageError::UnsupportedRelation {
                kind: T::KIND,
                relation,
            })
    }
}

/// Storage for one entity family and the relations it parents.
///
/// A single mutex guards the body table and every relation index, and each
/// public method holds it for its whole duration. Two calls on the same store
/// never interleave; calls on different stores are never coordinated.
///
/// # Example
///
/// ```rust
/// use infracat_entities::{Cluster, ClusterType, Network};
/// use infracat_storage::{EntityProvider, NetworkProvider, NetworkStore};
///
/// let networks = NetworkStore::in_memory();
/// networks.add(Network::new("n1", "lab")).unwrap();
/// networks.attach_cluster("n1", "c1").unwrap();
///
/// assert_eq!(networks.list_clusters("n1").unwrap(), vec!["c1"]);
/// ```
pub struct EntityStore<T: Entity> {
    state: Mutex<StoreState<T>>,
}

impl<T: Family> EntityStore<T> {
    /// Opens a store using media built by `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot prepare its media.
    pub fn with_backend<B: Backend>(backend: &B) -> StorageResult<Self> {
        let table = backend.table::<T>()?;
        let relations = T::RELATIONS
            .iter()
            .map(|&relation| {
                let markers = backend.markers(T::FAMILY, relation)?;
                Ok(RelationIndex::new(relation, markers))
            })
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(Self::from_parts(table, relations))
    }

    /// Creates an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        let relations = T::RELATIONS
            .iter()
            .map(|&relation| RelationIndex::new(relation, Box::new(MemoryMarkers::new())))
            .collect();
        Self::from_parts(Box::new(MemoryTable::<T>::new()), relations)
    }

    /// Opens a file-backed store under `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if the family directory cannot be created.
    pub fn open(base: impl Into<PathBuf>) -> StorageResult<Self> {
        Self::with_backend(&FileBackend::new(base))
    }
}

impl<T: Entity> EntityStore<T> {
    /// Creates a store from already opened media.
    pub fn from_parts(table: Box<dyn Table<T>>, relations: Vec<RelationIndex>) -> Self {
        Self {
            state: Mutex::new(StoreState { table, relations }),
        }
    }

    /// Removes every value and every relation marker.
    ///
    /// Intended for test setup.
    ///
    /// # Errors
    ///
    /// Returns an error if the media cannot be emptied.
    pub fn clear(&self) -> StorageResult<()> {
        let mut state = self.state.lock();
        state.table.clear()?;
        for idx in &mut state.relations {
            idx.clear()?;
        }
        debug!(kind = T::KIND, "Store cleared");
        Ok(())
    }

    fn attach(&self, relation: Relation, parent: &str, child: &str) -> StorageResult<()> {
        let mut state = self.state.lock();
        if !state.table.contains(parent) {
            return Err(StorageError::parent_does_not_exist(
                relation.parent_kind(),
                parent,
            ));
        }
        state.index_mut(relation)?.attach(parent, child)?;
        debug!(%relation, parent, child, "Attached");
        Ok(())
    }

    fn detach(&self, relation: Relation, parent: &str, child: &str) -> StorageResult<()> {
        let mut state = self.state.lock();
        state.index_mut(relation)?.detach(parent, child)?;
        debug!(%relation, parent, child, "Detached");
        Ok(())
    }

    fn is_attached(&self, relation: Relation, parent: &str, child: &str) -> bool {
        let state = self.state.lock();
        state
            .index(relation)
            .is_ok_and(|idx| idx.contains(parent, child))
    }

    fn attached(&self, relation: Relation, parent: &str) -> StorageResult<Vec<String>> {
        let state = self.state.lock();
        if !state.table.contains(parent) {
            return Err(StorageError::parent_does_not_exist(
                relation.parent_kind(),
                parent,
            ));
        }
        state.index(relation)?.children(parent)
    }
}

impl<T: Entity> EntityProvider<T> for EntityStore<T> {
    fn add(&self, value: T) -> StorageResult<()> {
        let mut state = self.state.lock();
        state.check_id(value.id())?;
        if state.table.contains(value.id()) {
            return Err(StorageError::already_exists(T::KIND, value.id()));
        }
        let id = value.id().to_string();
        state.table.put(value)?;
        debug!(kind = T::KIND, %id, "Added");
        Ok(())
    }

    fn exists(&self, id: &str) -> bool {
        let state = self.state.lock();
        state.check_id(id).is_ok() && state.table.contains(id)
    }

    fn retrieve(&self, id: &str) -> StorageResult<T> {
        let state = self.state.lock();
        state.check_id(id)?;
        state
            .table
            .get(id)?
            .ok_or_else(|| StorageError::not_found(T::KIND, id))
    }

    fn update(&self, value: T) -> StorageResult<()> {
        let mut state = self.state.lock();
        state.check_id(value.id())?;
        if state.table.get(value.id())?.is_none() {
            return Err(StorageError::not_found(T::KIND, value.id()));
        }
        let id = value.id().to_string();
        state.table.put(value)?;
        debug!(kind = T::KIND, %id, "Updated");
        Ok(())
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        let mut state = self.state.lock();
        state.check_id(id)?;
        if !state.table.remove(id)? {
            return Err(StorageError::not_found(T::KIND, id));
        }
        debug!(kind = T::KIND, id, "Deleted");
        Ok(())
    }

    fn list(&self) -> StorageResult<Vec<T>> {
        self.state.lock().table.values()
    }
}

impl NetworkProvider for EntityStore<Network> {
    fn attach_cluster(&self, network_id: &str, cluster_id: &str) -> StorageResult<()> {
        self.attach(Relation::NetworkClusters, network_id, cluster_id)
    }

    fn exists_cluster(&self, network_id: &str, cluster_id: &str) -> bool {
        self.is_attached(Relation::NetworkClusters, network_id, cluster_id)
    }

    fn list_clusters(&self, network_id: &str) -> StorageResult<Vec<String>> {
        self.attached(Relation::NetworkClusters, network_id)
    }

    fn detach_cluster(&self, network_id: &str, cluster_id: &str) -> StorageResult<()> {
        self.detach(Relation::NetworkClusters, network_id, cluster_id)
    }

    fn attach_app_descriptor(&self, network_id: &str, descriptor_id: &str) -> StorageResult<()> {
        self.attach(Relation::NetworkAppDescriptors, network_id, descriptor_id)
    }

    fn exists_app_descriptor(&self, network_id: &str, descriptor_id: &str) -> bool {
        self.is_attached(Relation::NetworkAppDescriptors, network_id, descriptor_id)
    }

    fn list_app_descriptors(&self, network_id: &str) -> StorageResult<Vec<String>> {
        self.attached(Relation::NetworkAppDescriptors, network_id)
    }

    fn detach_app_descriptor(&self, network_id: &str, descriptor_id: &str) -> StorageResult<()> {
        self.detach(Relation::NetworkAppDescriptors, network_id, descriptor_id)
    }

    fn attach_app_instance(&self, network_id: &str, deployed_id: &str) -> StorageResult<()> {
        self.attach(Relation::NetworkAppInstances, network_id, deployed_id)
    }

    fn exists_app_instance(&self, network_id: &str, deployed_id: &str) -> bool {
        self.is_attached(Relation::NetworkAppInstances, network_id, deployed_id)
    }

    fn list_app_instances(&self, network_id: &str) -> StorageResult<Vec<String>> {
        self.attached(Relation::NetworkAppInstances, network_id)
    }

    fn detach_app_instance(&self, network_id: &str, deployed_id: &str) -> StorageResult<()> {
        self.detach(Relation::NetworkAppInstances, network_id, deployed_id)
    }
}

impl ClusterProvider for EntityStore<Cluster> {
    fn attach_node(&self, cluster_id: &str, node_id: &str) -> StorageResult<()> {
        self.attach(Relation::ClusterNodes, cluster_id, node_id)
    }

    fn exists_node(&self, cluster_id: &str, node_id: &str) -> bool {
        self.is_attached(Relation::ClusterNodes, cluster_id, node_id)
    }

    fn list_nodes(&self, cluster_id: &str) -> StorageResult<Vec<String>> {
        self.attached(Relation::ClusterNodes, cluster_id)
    }

    fn detach_node(&self, cluster_id: &str, node_id: &str) -> StorageResult<()> {
        self.detach(Relation::ClusterNodes, cluster_id, node_id)
    }
}

impl<T: Entity> std::fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("kind", &T::KIND)
            .finish_non_exhaustive()
    }
}
