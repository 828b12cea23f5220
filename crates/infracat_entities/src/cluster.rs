//! Cluster entity and its install state machine.

use crate::Entity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of infrastructure a cluster runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterType {
    /// Cluster in a public or private cloud.
    Cloud,
    /// Cluster at the edge.
    Edge,
    /// Gateway cluster bridging edge and cloud.
    Gateway,
}

/// Install status of a cluster.
///
/// ```text
/// created -> ready-to-install -> installing -> installed -> uninstalling
///                  ^                                             |
///                  +---------------------------------------------+
/// any state -> error -> ready-to-install
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterStatus {
    /// Registered but not yet prepared.
    #[default]
    Created,
    /// Nodes are known and the cluster can be installed.
    ReadyToInstall,
    /// Installation in progress.
    Installing,
    /// Installation finished.
    Installed,
    /// Removal in progress.
    Uninstalling,
    /// A transition failed.
    Error,
}

impl ClusterStatus {
    /// Returns true if a cluster in this status may move to `next`.
    ///
    /// Staying in the same status is always allowed.
    #[must_use]
    pub fn can_transition_to(self, next: ClusterStatus) -> bool {
        use ClusterStatus::*;

        if self == next || next == Error {
            return true;
        }
        matches!(
            (self, next),
            (Created, ReadyToInstall)
                | (ReadyToInstall, Installing)
                | (Installing, Installed)
                | (Installed, Uninstalling)
                | (Uninstalling, ReadyToInstall)
                | (Error, ReadyToInstall)
        )
    }
}

impl fmt::Display for ClusterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClusterStatus::Created => "created",
            ClusterStatus::ReadyToInstall => "ready-to-install",
            ClusterStatus::Installing => "installing",
            ClusterStatus::Installed => "installed",
            ClusterStatus::Uninstalling => "uninstalling",
            ClusterStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// A cluster of nodes inside a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Network the cluster belongs to.
    pub network_id: String,
    /// Unique cluster identifier.
    pub cluster_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Infrastructure kind.
    #[serde(rename = "type")]
    pub cluster_type: ClusterType,
    /// Physical or logical location.
    #[serde(default)]
    pub location: String,
    /// Install status.
    #[serde(default)]
    pub status: ClusterStatus,
    /// Workloads are being moved away from the cluster.
    #[serde(default)]
    pub drain: bool,
    /// No new workloads may be scheduled on the cluster.
    #[serde(default)]
    pub cordon: bool,
}

impl Cluster {
    /// Creates a cluster in the `created` status.
    pub fn new(
        network_id: impl Into<String>,
        cluster_id: impl Into<String>,
        name: impl Into<String>,
        cluster_type: ClusterType,
    ) -> Self {
        Self {
            network_id: network_id.into(),
            cluster_id: cluster_id.into(),
            name: name.into(),
            description: String::new(),
            cluster_type,
            location: String::new(),
            status: ClusterStatus::Created,
            drain: false,
            cordon: false,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Moves the cluster to `next` if the state machine allows it.
    ///
    /// Returns false and leaves the status unchanged otherwise.
    pub fn set_status(&mut self, next: ClusterStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        true
    }
}

impl Entity for Cluster {
    const KIND: &'static str = "cluster";
    const FAMILY: &'static str = "clusters";

    fn id(&self) -> &str {
        &self.cluster_id
    }
}
