//! # Infracat Core
//!
//! Managers that sequence calls across the catalog's providers.
//!
//! This crate provides:
//! - [`Config`] and [`Providers`] to build one provider per entity family
//! - [`Catalog`] for relation-aware CRUD, hydrated listings and node filtering
//! - [`saga::WriteSaga`] for ordered writes across independent providers
//! - [`backup::BackupManager`] for snapshot export and import
//!
//! ## Example
//!
//! ```rust
//! use infracat_core::{Catalog, NodeFilter, Providers};
//! use infracat_entities::{Cluster, ClusterType, Network, Node};
//!
//! let catalog = Catalog::new(Providers::in_memory());
//! catalog.add_network(Network::new("n1", "lab")).unwrap();
//! catalog.add_cluster(Cluster::new("n1", "c1", "edge-a", ClusterType::Edge)).unwrap();
//! catalog.add_node(Node::new("n1", "c1", "node-1", "gpu-box").with_labels(["gpu"])).unwrap();
//!
//! let gpus = catalog.filter_nodes("n1", "c1", &NodeFilter::labels(["gpu"])).unwrap();
//! assert_eq!(gpus.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod backup;
mod catalog;
mod config;
mod error;
mod filter;
mod providers;
pub mod saga;

pub use backup::{BackupConfig, BackupManager, BackupSnapshot, Component, ImportStats, UserBackup};
pub use catalog::Catalog;
pub use config::{BackendKind, Config};
pub use error::{CoreError, CoreResult};
pub use filter::{filter_nodes, sort_by_name, NodeFilter};
pub use providers::Providers;
pub use saga::{SagaFailure, WriteSaga};
