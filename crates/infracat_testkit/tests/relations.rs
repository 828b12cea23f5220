//! Cross-provider relation behavior through the catalog.

use infracat_core::{Catalog, CoreError, NodeFilter};
use infracat_entities::{Cluster, ClusterType, Network, Node};
use infracat_storage::ErrorKind;
use infracat_testkit::prelude::*;

#[test]
fn orphaned_child_stays_in_relation_listing() {
    with_each_backend(|p| {
        scenarios::one_of_each(p);

        p.clusters.delete("c1").unwrap();

        assert_eq!(p.networks.list_clusters("n1").unwrap(), vec!["c1"]);
        assert_eq!(
            p.clusters.retrieve("c1").unwrap_err().kind(),
            ErrorKind::NotFound
        );

        let err = Catalog::new(p.clone()).list_clusters("n1").unwrap_err();
        assert!(matches!(err, CoreError::OperationFailed { .. }));
    });
}

#[test]
fn deleting_network_does_not_cascade() {
    with_each_backend(|p| {
        scenarios::one_of_each(p);

        p.networks.delete("n1").unwrap();

        assert!(p.clusters.exists("c1"));
        assert!(p.nodes.exists("node-1"));
        assert_eq!(
            p.networks.list_clusters("n1").unwrap_err().kind(),
            ErrorKind::ParentDoesNotExist
        );
    });
}

#[test]
fn label_filter_is_and() {
    with_each_backend(|p| {
        let catalog = Catalog::new(p.clone());
        catalog.add_network(Network::new("n1", "lab")).unwrap();
        catalog
            .add_cluster(Cluster::new("n1", "c1", "edge-a", ClusterType::Edge))
            .unwrap();
        for (id, labels) in [("a", vec!["l1"]), ("b", vec!["l1", "l2"]), ("c", vec!["l3"])] {
            catalog
                .add_node(Node::new("n1", "c1", id, id).with_labels(labels))
                .unwrap();
        }

        let ids = |filter: NodeFilter| {
            let mut ids: Vec<_> = catalog
                .filter_nodes("n1", "c1", &filter)
                .unwrap()
                .into_iter()
                .map(|n| n.node_id)
                .collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(NodeFilter::labels(["l1"])), vec!["a", "b"]);
        assert_eq!(ids(NodeFilter::labels(["l1", "l2"])), vec!["b"]);
        assert_eq!(ids(NodeFilter::new()), vec!["a", "b", "c"]);
    });
}

#[test]
fn failed_attach_leaves_node_record() {
    with_each_backend(|p| {
        scenarios::one_of_each(p);
        p.clusters.attach_node("c1", "node-2").unwrap();

        let err = Catalog::new(p.clone())
            .add_node(Node::new("n1", "c1", "node-2", "late"))
            .unwrap_err();

        assert_eq!(err.storage_kind(), Some(ErrorKind::AlreadyAttached));
        assert!(p.nodes.exists("node-2"));
    });
}

#[test]
fn providers_are_not_coordinated() {
    with_each_backend(|p| {
        p.networks.add(Network::new("n1", "lab")).unwrap();

        // The network provider never asks the cluster provider.
        p.networks.attach_cluster("n1", "ghost").unwrap();
        assert!(p.networks.exists_cluster("n1", "ghost"));
        assert!(!p.clusters.exists("ghost"));
    });
}
