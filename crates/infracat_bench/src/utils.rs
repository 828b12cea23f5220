//! Benchmark utilities.

use infracat_core::{Catalog, CoreResult, Providers};
use infracat_entities::{Cluster, ClusterType, Network, Node};
use rand::seq::SliceRandom;
use rand::Rng;

const LABELS: [&str; 8] = ["gpu", "ssd", "arm", "x86", "edge", "dmz", "lab", "prod"];

/// Picks up to `max` distinct labels at random.
pub fn random_labels(max: usize) -> Vec<&'static str> {
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(0..=max.min(LABELS.len()));
    LABELS.choose_multiple(&mut rng, count).copied().collect()
}

/// Generate networks with sequential ids.
pub fn generate_networks(count: usize) -> Vec<Network> {
    (0..count)
        .map(|i| Network::new(format!("net-{i:06}"), format!("network {i}")))
        .collect()
}

/// Generate nodes of one cluster with random labels.
pub fn generate_nodes(network_id: &str, cluster_id: &str, count: usize) -> Vec<Node> {
    (0..count)
        .map(|i| {
            Node::new(network_id, cluster_id, format!("{cluster_id}-node-{i:04}"), "worker")
                .with_labels(random_labels(4))
        })
        .collect()
}

/// Seeds one network with `clusters` clusters of `nodes_per_cluster` nodes.
pub fn seed_catalog(
    providers: &Providers,
    clusters: usize,
    nodes_per_cluster: usize,
) -> CoreResult<()> {
    let catalog = Catalog::new(providers.clone());
    catalog.add_network(Network::new("bench", "bench"))?;
    for c in 0..clusters {
        let cluster_id = format!("cluster-{c:03}");
        catalog.add_cluster(Cluster::new("bench", &cluster_id, "bench", ClusterType::Edge))?;
        for node in generate_nodes("bench", &cluster_id, nodes_per_cluster) {
            catalog.add_node(node)?;
        }
    }
    Ok(())
}
