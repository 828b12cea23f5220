//! Provider contracts, one per entity family.
//!
//! Every family shares the CRUD contract of [`EntityProvider`]. Networks and
//! clusters additionally index their children. Relation listings return
//! identifiers only; callers join them against the child's own provider.
//!
//! Providers never call each other. Keeping a child's record and its
//! attachment consistent is the caller's job.

use crate::error::StorageResult;
use infracat_entities::{
    AppDescriptor, AppInstance, Cluster, Entity, Network, Node, Password, User, UserAccess,
};

/// Storage contract shared by every entity family.
pub trait EntityProvider<T: Entity>: Send + Sync {
    /// Stores a new value.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the identifier is already stored.
    fn add(&self, value: T) -> StorageResult<()>;

    /// Returns true if the identifier is stored. Never fails.
    fn exists(&self, id: &str) -> bool;

    /// Reads the value stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the identifier is not stored.
    fn retrieve(&self, id: &str) -> StorageResult<T>;

    /// Replaces the stored value with the same identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the identifier is not stored.
    fn update(&self, value: T) -> StorageResult<()>;

    /// Removes the value stored under `id`. Relation markers are untouched.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the identifier is not stored.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// Returns every stored value.
    ///
    /// Order is backend-specific.
    fn list(&self) -> StorageResult<Vec<T>>;

    /// Returns every stored value for a backup.
    ///
    /// Same as [`EntityProvider::list`].
    fn dump(&self) -> StorageResult<Vec<T>> {
        self.list()
    }
}

/// Network storage and its cluster, app descriptor and app instance indexes.
///
/// For every relation:
/// - `attach_*` fails with `ParentDoesNotExist` if the network is unknown to
///   this provider, then with `AlreadyAttached` if the pair is recorded
/// - `detach_*` fails with `NotAttached` if the pair is not recorded
/// - `exists_*` never fails
/// - `list_*` fails with `ParentDoesNotExist` if the network is unknown
pub trait NetworkProvider: EntityProvider<Network> {
    /// Attaches a cluster to a network.
    fn attach_cluster(&self, network_id: &str, cluster_id: &str) -> StorageResult<()>;
    /// Returns true if the cluster is attached to the network.
    fn exists_cluster(&self, network_id: &str, cluster_id: &str) -> bool;
    /// Lists the clusters attached to a network.
    fn list_clusters(&self, network_id: &str) -> StorageResult<Vec<String>>;
    /// Detaches a cluster from a network.
    fn detach_cluster(&self, network_id: &str, cluster_id: &str) -> StorageResult<()>;

    /// Registers an app descriptor in a network.
    fn attach_app_descriptor(&self, network_id: &str, descriptor_id: &str) -> StorageResult<()>;
    /// Returns true if the app descriptor is registered in the network.
    fn exists_app_descriptor(&self, network_id: &str, descriptor_id: &str) -> bool;
    /// Lists the app descriptors registered in a network.
    fn list_app_descriptors(&self, network_id: &str) -> StorageResult<Vec<String>>;
    /// Removes an app descriptor from a network.
    fn detach_app_descriptor(&self, network_id: &str, descriptor_id: &str) -> StorageResult<()>;

    /// Registers an app instance in a network.
    fn attach_app_instance(&self, network_id: &str, deployed_id: &str) -> StorageResult<()>;
    /// Returns true if the app instance is registered in the network.
    fn exists_app_instance(&self, network_id: &str, deployed_id: &str) -> bool;
    /// Lists the app instances registered in a network.
    fn list_app_instances(&self, network_id: &str) -> StorageResult<Vec<String>>;
    /// Removes an app instance from a network.
    fn detach_app_instance(&self, network_id: &str, deployed_id: &str) -> StorageResult<()>;
}

/// Cluster storage and its node index.
///
/// The node relation follows the same rules as the [`NetworkProvider`]
/// relations, with the cluster as parent.
pub trait ClusterProvider: EntityProvider<Cluster> {
    /// Attaches a node to a cluster.
    fn attach_node(&self, cluster_id: &str, node_id: &str) -> StorageResult<()>;
    /// Returns true if the node is attached to the cluster.
    fn exists_node(&self, cluster_id: &str, node_id: &str) -> bool;
    /// Lists the nodes attached to a cluster.
    fn list_nodes(&self, cluster_id: &str) -> StorageResult<Vec<String>>;
    /// Detaches a node from a cluster.
    fn detach_node(&self, cluster_id: &str, node_id: &str) -> StorageResult<()>;
}

/// Node storage.
pub trait NodeProvider: EntityProvider<Node> {}
impl<P: EntityProvider<Node> + ?Sized> NodeProvider for P {}

/// App descriptor storage.
pub trait AppDescriptorProvider: EntityProvider<AppDescriptor> {}
impl<P: EntityProvider<AppDescriptor> + ?Sized> AppDescriptorProvider for P {}

/// App instance storage.
pub trait AppInstanceProvider: EntityProvider<AppInstance> {}
impl<P: EntityProvider<AppInstance> + ?Sized> AppInstanceProvider for P {}

/// User storage.
pub trait UserProvider: EntityProvider<User> {}
impl<P: EntityProvider<User> + ?Sized> UserProvider for P {}

/// User access storage.
pub trait UserAccessProvider: EntityProvider<UserAccess> {}
impl<P: EntityProvider<UserAccess> + ?Sized> UserAccessProvider for P {}

/// Password storage.
pub trait PasswordProvider: EntityProvider<Password> {}
impl<P: EntityProvider<Password> + ?Sized> PasswordProvider for P {}
