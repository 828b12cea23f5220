//! Node entity.

use crate::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Health of a node as last observed by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    /// Not checked yet.
    #[default]
    Unchecked,
    /// Reachable and ready.
    Ready,
    /// An operation is running on the node.
    Processing,
    /// The last check failed.
    Error,
}

/// A machine that belongs to a cluster.
///
/// Credentials are opaque to the catalog; they are stored and returned as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Network the node belongs to through its cluster.
    pub network_id: String,
    /// Cluster the node belongs to.
    pub cluster_id: String,
    /// Unique node identifier.
    pub node_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Labels used for filtering.
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Public address.
    #[serde(default)]
    pub public_ip: String,
    /// Private address.
    #[serde(default)]
    pub private_ip: String,
    /// Whether the platform software is installed.
    #[serde(default)]
    pub installed: bool,
    /// Login user.
    #[serde(default)]
    pub username: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
    /// SSH private key.
    #[serde(default)]
    pub ssh_key: String,
    /// Last observed status.
    #[serde(default)]
    pub status: NodeStatus,
}

impl Node {
    /// Creates a node with no labels, addresses or credentials.
    pub fn new(
        network_id: impl Into<String>,
        cluster_id: impl Into<String>,
        node_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            network_id: network_id.into(),
            cluster_id: cluster_id.into(),
            node_id: node_id.into(),
            name: name.into(),
            description: String::new(),
            labels: BTreeSet::new(),
            public_ip: String::new(),
            private_ip: String::new(),
            installed: false,
            username: String::new(),
            password: String::new(),
            ssh_key: String::new(),
            status: NodeStatus::Unchecked,
        }
    }

    /// Adds labels to the node.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Adds one label. Returns false if the node already had it.
    pub fn add_label(&mut self, label: impl Into<String>) -> bool {
        self.labels.insert(label.into())
    }

    /// Removes one label. Returns false if the node did not have it.
    pub fn remove_label(&mut self, label: &str) -> bool {
        self.labels.remove(label)
    }

    /// Returns true if the node carries every label in `labels`.
    pub fn has_labels<'a, I>(&self, labels: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        labels.into_iter().all(|label| self.labels.contains(label))
    }
}

impl Entity for Node {
    const KIND: &'static str = "node";
    const FAMILY: &'static str = "nodes";

    fn id(&self) -> &str {
        &self.node_id
    }
}
