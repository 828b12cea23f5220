//! # infracat entities
//!
//! Plain value types tracked by the infracat catalog.
//!
//! The catalog stores networks, the clusters and nodes that belong to them,
//! application descriptors and their deployed instances, and the user records
//! that the backup manager carries along with them. All of them are plain
//! values: identifiers are supplied by callers and relationships are kept by
//! the storage layer as separate indexes, never by containment.
//!
//! ## Usage
//!
//! ```
//! use infracat_entities::{Cluster, ClusterType, Entity, Network};
//!
//! let network = Network::new("net-1", "production");
//! let cluster = Cluster::new("net-1", "cl-1", "edge-a", ClusterType::Edge);
//!
//! assert_eq!(network.id(), "net-1");
//! assert_eq!(Cluster::FAMILY, "clusters");
//! assert_eq!(cluster.network_id, network.network_id);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod application;
mod cluster;
mod network;
mod node;
mod reduced;
mod user;

pub use application::{AppDescriptor, AppInstance, AppStatus};
pub use cluster::{Cluster, ClusterStatus, ClusterType};
pub use network::Network;
pub use node::{Node, NodeStatus};
pub use reduced::{
    ReducedAppDescriptor, ReducedAppInstance, ReducedCluster, ReducedNetwork, ReducedNode,
};
pub use user::{AccessRole, Password, User, UserAccess};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A value that can be stored by an infracat provider.
///
/// Every entity family has a fixed kind name (used in errors and logs) and a
/// family name (used as the directory of a file-backed store). The identifier
/// is chosen by the caller and must be unique within the family.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Singular name of the entity kind, e.g. `"network"`.
    const KIND: &'static str;

    /// Name of the family, e.g. `"networks"`.
    const FAMILY: &'static str;

    /// Returns the identifier of this value.
    fn id(&self) -> &str;
}
