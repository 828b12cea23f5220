//! # Infracat Storage
//!
//! Provider contracts and storage backends for the infracat catalog.
//!
//! Each entity family lives in its own [`EntityStore`], which implements the
//! family's provider trait over a body [`Table`] plus one [`RelationIndex`]
//! per relation the family parents.
//!
//! ## Design Principles
//!
//! - One store per family, guarded by one lock
//! - Providers never call each other; relations hold identifiers only
//! - Relation logic is shared across backends through [`RelationIndex`]
//! - Stores are `Send + Sync` and can be shared behind an `Arc`
//!
//! ## Available Backends
//!
//! - [`MemoryBackend`] - For tests and ephemeral catalogs
//! - [`FileBackend`] - One JSON file per entity, empty marker files per relation
//!
//! ## Example
//!
//! ```rust
//! use infracat_entities::{Cluster, ClusterType, Network};
//! use infracat_storage::{ClusterStore, EntityProvider, NetworkProvider, NetworkStore};
//!
//! let networks = NetworkStore::in_memory();
//! let clusters = ClusterStore::in_memory();
//!
//! networks.add(Network::new("n1", "lab")).unwrap();
//! clusters.add(Cluster::new("n1", "c1", "edge-a", ClusterType::Edge)).unwrap();
//! networks.attach_cluster("n1", "c1").unwrap();
//!
//! for id in networks.list_clusters("n1").unwrap() {
//!     assert_eq!(clusters.retrieve(&id).unwrap().name, "edge-a");
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
mod provider;
mod relation;
mod store;

pub use backend::{Backend, MarkerSet, Table};
pub use error::{ErrorKind, StorageError, StorageResult};
pub use file::{FileBackend, FileMarkers, FileTable};
pub use memory::{MemoryBackend, MemoryMarkers, MemoryTable};
pub use provider::{
    AppDescriptorProvider, AppInstanceProvider, ClusterProvider, EntityProvider, NetworkProvider,
    NodeProvider, PasswordProvider, UserAccessProvider, UserProvider,
};
pub use relation::{validate_id, Relation, RelationIndex};
pub use store::{
    AppDescriptorStore, AppInstanceStore, ClusterStore, EntityStore, Family, NetworkStore,
    NodeStore, PasswordStore, UserAccessStore, UserStore,
};
