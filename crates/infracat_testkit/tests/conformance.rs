//! Provider conformance on every backend.

use infracat_entities::{
    AccessRole, AppDescriptor, AppInstance, AppStatus, Cluster, ClusterStatus, ClusterType,
    Network, Node, NodeStatus, Password, UserAccess,
};
use infracat_storage::{ClusterStore, ErrorKind, NetworkStore};
use infracat_testkit::conformance;
use infracat_testkit::prelude::*;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn memory_network_store_conforms() {
    conformance::run_all_networks(Arc::new(NetworkStore::in_memory()));
}

#[test]
fn file_network_store_conforms() {
    let dir = tempdir().unwrap();
    conformance::run_all_networks(Arc::new(NetworkStore::open(dir.path()).unwrap()));
}

#[test]
fn memory_cluster_store_conforms() {
    conformance::run_all_clusters(Arc::new(ClusterStore::in_memory()));
}

#[test]
fn file_cluster_store_conforms() {
    let dir = tempdir().unwrap();
    conformance::run_all_clusters(Arc::new(ClusterStore::open(dir.path()).unwrap()));
}

#[test]
fn file_store_conforms_after_reopen() {
    let dir = tempdir().unwrap();
    {
        let store = NetworkStore::open(dir.path()).unwrap();
        conformance::crud_add_then_retrieve(&store);
    }
    let store = NetworkStore::open(dir.path()).unwrap();
    conformance::crud_duplicate_add_rejected(&store);
    conformance::rel_parent_delete_keeps_markers(&store);
}

#[test]
fn reserved_network_id_does_not_break_file_relations() {
    let dir = tempdir().unwrap();
    let store = NetworkStore::open(dir.path()).unwrap();

    let err = store.add(Network::new("clusters", "shadow")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidId);
    assert!(!dir.path().join("networks").join("clusters").is_file());

    store.add(Network::new("n1", "lab")).unwrap();
    store.attach_cluster("n1", "c1").unwrap();
    assert_eq!(store.list_clusters("n1").unwrap(), vec!["c1"]);
}

#[test]
fn families_round_trip_on_every_backend() {
    with_each_backend(|p| {
        let mut installed = Cluster::new("n1", "c1", "gw", ClusterType::Gateway)
            .with_location("rack 2");
        installed.status = ClusterStatus::Installed;
        installed.cordon = true;
        let mut failed = installed.clone();
        failed.status = ClusterStatus::Error;
        failed.drain = true;
        conformance::crud_value_round_trip(&*p.clusters, installed, failed);

        let unbound = AppInstance::new("n1", "dep-1", "d1", "web-1").with_storage("10Gi", "ssd");
        let mut bound = unbound.clone().on_cluster("c1");
        bound.status = AppStatus::Ready;
        conformance::crud_value_round_trip(&*p.app_instances, unbound, bound);

        conformance::crud_value_round_trip(
            &*p.passwords,
            Password::placeholder("ada"),
            Password::new("ada", "hash"),
        );

        let labeled = Node::new("n1", "c1", "node-1", "worker").with_labels(["gpu", "ssd"]);
        let mut ready = labeled.clone();
        ready.remove_label("ssd");
        ready.status = NodeStatus::Ready;
        ready.installed = true;
        conformance::crud_value_round_trip(&*p.nodes, labeled, ready);

        let descriptor = AppDescriptor::new("n1", "d1", "web").with_image("nginx:1.25");
        let resized = descriptor.clone().with_service("nginx", "1.26", 8443);
        conformance::crud_value_round_trip(&*p.app_descriptors, descriptor, resized);

        conformance::crud_value_round_trip(
            &*p.access,
            UserAccess::placeholder("ada"),
            UserAccess::new("ada", vec![AccessRole::Internal, AccessRole::Developer]),
        );

        let mut network = Network::new("n1", "lab");
        network.edgenet_id = Some("edge-7".into());
        let plain = Network::new("n1", "lab").with_admin("Ada", "555-0100", "ada@example.com");
        conformance::crud_value_round_trip(&*p.networks, network, plain);
    });
}
