//! Summary projections used by listings.

use crate::{AppDescriptor, AppInstance, AppStatus, Cluster, ClusterStatus, ClusterType};
use crate::{Network, Node, NodeStatus};
use serde::{Deserialize, Serialize};

/// Summary of a [`Network`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducedNetwork {
    /// Network identifier.
    pub network_id: String,
    /// Display name.
    pub name: String,
}

impl From<&Network> for ReducedNetwork {
    fn from(network: &Network) -> Self {
        Self {
            network_id: network.network_id.clone(),
            name: network.name.clone(),
        }
    }
}

/// Summary of a [`Cluster`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducedCluster {
    /// Network identifier.
    pub network_id: String,
    /// Cluster identifier.
    pub cluster_id: String,
    /// Display name.
    pub name: String,
    /// Infrastructure kind.
    #[serde(rename = "type")]
    pub cluster_type: ClusterType,
    /// Install status.
    pub status: ClusterStatus,
}

impl From<&Cluster> for ReducedCluster {
    fn from(cluster: &Cluster) -> Self {
        Self {
            network_id: cluster.network_id.clone(),
            cluster_id: cluster.cluster_id.clone(),
            name: cluster.name.clone(),
            cluster_type: cluster.cluster_type,
            status: cluster.status,
        }
    }
}

/// Summary of a [`Node`]; never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducedNode {
    /// Cluster identifier.
    pub cluster_id: String,
    /// Node identifier.
    pub node_id: String,
    /// Display name.
    pub name: String,
    /// Public address.
    pub public_ip: String,
    /// Last observed status.
    pub status: NodeStatus,
}

impl From<&Node> for ReducedNode {
    fn from(node: &Node) -> Self {
        Self {
            cluster_id: node.cluster_id.clone(),
            node_id: node.node_id.clone(),
            name: node.name.clone(),
            public_ip: node.public_ip.clone(),
            status: node.status,
        }
    }
}

/// Summary of an [`AppDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducedAppDescriptor {
    /// Network identifier.
    pub network_id: String,
    /// Descriptor identifier.
    pub app_descriptor_id: String,
    /// Display name.
    pub name: String,
    /// Service name.
    pub service_name: String,
    /// Service version.
    pub service_version: String,
}

impl From<&AppDescriptor> for ReducedAppDescriptor {
    fn from(desc: &AppDescriptor) -> Self {
        Self {
            network_id: desc.network_id.clone(),
            app_descriptor_id: desc.app_descriptor_id.clone(),
            name: desc.name.clone(),
            service_name: desc.service_name.clone(),
            service_version: desc.service_version.clone(),
        }
    }
}

/// Summary of an [`AppInstance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducedAppInstance {
    /// Network identifier.
    pub network_id: String,
    /// Deployment identifier.
    pub deployed_id: String,
    /// Descriptor identifier.
    pub app_descriptor_id: String,
    /// Display name.
    pub name: String,
    /// Deployment status.
    pub status: AppStatus,
}

impl From<&AppInstance> for ReducedAppInstance {
    fn from(inst: &AppInstance) -> Self {
        Self {
            network_id: inst.network_id.clone(),
            deployed_id: inst.deployed_id.clone(),
            app_descriptor_id: inst.app_descriptor_id.clone(),
            name: inst.name.clone(),
            status: inst.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_node_drops_credentials() {
        let mut node = Node::new("n1", "c1", "node-1", "worker");
        node.password = "secret".into();
        node.ssh_key = "-----BEGIN KEY-----".into();

        let json = serde_json::to_string(&ReducedNode::from(&node)).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("BEGIN KEY"));
    }

    #[test]
    fn reduced_cluster_keeps_status() {
        let mut cluster = Cluster::new("n1", "c1", "edge-a", ClusterType::Edge);
        cluster.status = ClusterStatus::Installed;

        let reduced = ReducedCluster::from(&cluster);
        assert_eq!(reduced.status, ClusterStatus::Installed);
        assert_eq!(reduced.cluster_id, "c1");
    }
}
