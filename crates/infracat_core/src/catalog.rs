//! Catalog manager: multi-provider operations over networks and their children.
//!
//! Every method here sequences calls across independent providers. There is
//! no shared transaction: when a later call fails, earlier ones stay
//! committed. For instance, [`Catalog::add_node`] stores the node and then
//! attaches it to its cluster, and a failure in between leaves a node with no
//! attachment. Use the `exists_*` relation queries to detect such leftovers.

use crate::error::{CoreError, CoreResult};
use crate::filter::{filter_nodes, sort_by_name, NodeFilter};
use crate::providers::Providers;
use infracat_entities::{
    AppDescriptor, AppInstance, Cluster, ClusterStatus, Entity, Network, Node, ReducedCluster,
    ReducedNode,
};
use infracat_storage::{EntityProvider, Relation, StorageError};
use tracing::{debug, info};

/// Hydrates relation listings: every id must resolve or the whole list fails.
fn hydrate<T, F>(parent: &str, ids: Vec<String>, retrieve: F) -> CoreResult<Vec<T>>
where
    T: Entity,
    F: Fn(&str) -> Result<T, StorageError>,
{
    ids.iter()
        .map(|id| {
            retrieve(id).map_err(|e| {
                CoreError::operation_failed(format!(
                    "cannot list {} of {parent}: {id}: {e}",
                    T::FAMILY
                ))
            })
        })
        .collect()
}

/// Entry point for catalog operations that span several providers.
#[derive(Debug, Clone)]
pub struct Catalog {
    providers: Providers,
}

impl Catalog {
    /// Creates a catalog over `providers`.
    #[must_use]
    pub fn new(providers: Providers) -> Self {
        Self { providers }
    }

    /// Returns the underlying providers.
    #[must_use]
    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    /// Stores a network.
    pub fn add_network(&self, network: Network) -> CoreResult<()> {
        let id = network.network_id.clone();
        self.providers.networks.add(network)?;
        info!(network = %id, "Network added");
        Ok(())
    }

    /// Lists every network, sorted by name.
    pub fn list_networks(&self) -> CoreResult<Vec<Network>> {
        let mut networks = self.providers.networks.list()?;
        sort_by_name(&mut networks, |n| n.name.as_str());
        Ok(networks)
    }

    /// Stores a cluster and attaches it to its network.
    ///
    /// # Errors
    ///
    /// Returns `ParentDoesNotExist` if the network is unknown; nothing is
    /// written in that case.
    pub fn add_cluster(&self, cluster: Cluster) -> CoreResult<()> {
        let network_id = cluster.network_id.clone();
        let cluster_id = cluster.cluster_id.clone();
        if !self.providers.networks.exists(&network_id) {
            return Err(StorageError::parent_does_not_exist(Network::KIND, network_id).into());
        }
        self.providers.clusters.add(cluster)?;
        self.providers
            .networks
            .attach_cluster(&network_id, &cluster_id)?;
        info!(network = %network_id, cluster = %cluster_id, "Cluster added");
        Ok(())
    }

    /// Returns a cluster attached to `network_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotAttached` if the cluster is not attached to the network.
    pub fn get_cluster(&self, network_id: &str, cluster_id: &str) -> CoreResult<Cluster> {
        if !self.providers.networks.exists_cluster(network_id, cluster_id) {
            return Err(
                StorageError::not_attached(Relation::NetworkClusters, network_id, cluster_id)
                    .into(),
            );
        }
        Ok(self.providers.clusters.retrieve(cluster_id)?)
    }

    /// Lists the clusters attached to a network.
    ///
    /// # Errors
    ///
    /// Returns `OperationFailed` if any attached cluster cannot be retrieved.
    pub fn list_clusters(&self, network_id: &str) -> CoreResult<Vec<Cluster>> {
        let ids = self.providers.networks.list_clusters(network_id)?;
        hydrate(network_id, ids, |id| self.providers.clusters.retrieve(id))
    }

    /// Lists cluster summaries of a network, sorted by name.
    pub fn cluster_summaries(&self, network_id: &str) -> CoreResult<Vec<ReducedCluster>> {
        let mut clusters = self.list_clusters(network_id)?;
        sort_by_name(&mut clusters, |c| c.name.as_str());
        Ok(clusters.iter().map(ReducedCluster::from).collect())
    }

    /// Detaches a cluster from its network and deletes it.
    ///
    /// Nodes attached to the cluster are left in place.
    pub fn remove_cluster(&self, network_id: &str, cluster_id: &str) -> CoreResult<()> {
        self.providers
            .networks
            .detach_cluster(network_id, cluster_id)?;
        self.providers.clusters.delete(cluster_id)?;
        info!(network = %network_id, cluster = %cluster_id, "Cluster removed");
        Ok(())
    }

    /// Moves a cluster to `status` and returns the updated value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` if the state machine forbids the move.
    pub fn update_cluster_status(
        &self,
        network_id: &str,
        cluster_id: &str,
        status: ClusterStatus,
    ) -> CoreResult<Cluster> {
        let mut cluster = self.get_cluster(network_id, cluster_id)?;
        let from = cluster.status;
        if !cluster.set_status(status) {
            return Err(CoreError::InvalidTransition {
                cluster_id: cluster_id.to_string(),
                from,
                to: status,
            });
        }
        self.providers.clusters.update(cluster.clone())?;
        debug!(cluster = %cluster_id, %from, to = %status, "Cluster status updated");
        Ok(cluster)
    }

    /// Stores a node and attaches it to its cluster.
    ///
    /// The two writes are not atomic: if the attach fails the node record
    /// stays stored without an attachment.
    ///
    /// # Errors
    ///
    /// Returns `ParentDoesNotExist` if the cluster is unknown; nothing is
    /// written in that case.
    pub fn add_node(&self, node: Node) -> CoreResult<()> {
        let cluster_id = node.cluster_id.clone();
        let node_id = node.node_id.clone();
        if !self.providers.clusters.exists(&cluster_id) {
            return Err(StorageError::parent_does_not_exist(Cluster::KIND, cluster_id).into());
        }
        self.providers.nodes.add(node)?;
        self.providers.clusters.attach_node(&cluster_id, &node_id)?;
        info!(cluster = %cluster_id, node = %node_id, "Node added");
        Ok(())
    }

    /// Lists the nodes attached to a cluster.
    ///
    /// # Errors
    ///
    /// Returns `OperationFailed` if any attached node cannot be retrieved.
    pub fn list_nodes(&self, cluster_id: &str) -> CoreResult<Vec<Node>> {
        let ids = self.providers.clusters.list_nodes(cluster_id)?;
        hydrate(cluster_id, ids, |id| self.providers.nodes.retrieve(id))
    }

    /// Lists node summaries of a cluster, sorted by name.
    pub fn node_summaries(&self, cluster_id: &str) -> CoreResult<Vec<ReducedNode>> {
        let mut nodes = self.list_nodes(cluster_id)?;
        sort_by_name(&mut nodes, |n| n.name.as_str());
        Ok(nodes.iter().map(ReducedNode::from).collect())
    }

    /// Returns the nodes of a cluster whose labels include every filter label.
    ///
    /// # Errors
    ///
    /// Returns `NotAttached` if the cluster is not attached to the network.
    pub fn filter_nodes(
        &self,
        network_id: &str,
        cluster_id: &str,
        filter: &NodeFilter,
    ) -> CoreResult<Vec<Node>> {
        if !self.providers.networks.exists_cluster(network_id, cluster_id) {
            return Err(
                StorageError::not_attached(Relation::NetworkClusters, network_id, cluster_id)
                    .into(),
            );
        }
        Ok(filter_nodes(self.list_nodes(cluster_id)?, filter))
    }

    /// Detaches a node from its cluster and deletes it.
    pub fn remove_node(&self, cluster_id: &str, node_id: &str) -> CoreResult<()> {
        self.providers.clusters.detach_node(cluster_id, node_id)?;
        self.providers.nodes.delete(node_id)?;
        info!(cluster = %cluster_id, node = %node_id, "Node removed");
        Ok(())
    }

    /// Stores an app descriptor and registers it in its network.
    pub fn add_app_descriptor(&self, descriptor: AppDescriptor) -> CoreResult<()> {
        let network_id = descriptor.network_id.clone();
        let descriptor_id = descriptor.app_descriptor_id.clone();
        if !self.providers.networks.exists(&network_id) {
            return Err(StorageError::parent_does_not_exist(Network::KIND, network_id).into());
        }
        self.providers.app_descriptors.add(descriptor)?;
        self.providers
            .networks
            .attach_app_descriptor(&network_id, &descriptor_id)?;
        info!(network = %network_id, descriptor = %descriptor_id, "App descriptor added");
        Ok(())
    }

    /// Lists the app descriptors registered in a network.
    pub fn list_app_descriptors(&self, network_id: &str) -> CoreResult<Vec<AppDescriptor>> {
        let ids = self.providers.networks.list_app_descriptors(network_id)?;
        hydrate(network_id, ids, |id| self.providers.app_descriptors.retrieve(id))
    }

    /// Stores an app instance and registers it in its network.
    ///
    /// # Errors
    ///
    /// Returns `NotAttached` if the instance's descriptor is not registered
    /// in the network.
    pub fn add_app_instance(&self, instance: AppInstance) -> CoreResult<()> {
        let network_id = instance.network_id.clone();
        let deployed_id = instance.deployed_id.clone();
        if !self
            .providers
            .networks
            .exists_app_descriptor(&network_id, &instance.app_descriptor_id)
        {
            return Err(StorageError::not_attached(
                Relation::NetworkAppDescriptors,
                network_id,
                instance.app_descriptor_id,
            )
            .into());
        }
        self.providers.app_instances.add(instance)?;
        self.providers
            .networks
            .attach_app_instance(&network_id, &deployed_id)?;
        info!(network = %network_id, instance = %deployed_id, "App instance added");
        Ok(())
    }

    /// Lists the app instances deployed in a network.
    pub fn list_app_instances(&self, network_id: &str) -> CoreResult<Vec<AppInstance>> {
        let ids = self.providers.networks.list_app_instances(network_id)?;
        hydrate(network_id, ids, |id| self.providers.app_instances.retrieve(id))
    }
}
