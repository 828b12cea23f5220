//! Conformance suite for provider implementations.
//!
//! Each function checks one clause of the provider contract. Every backend
//! runs the same suite so in-memory and file-backed stores stay
//! interchangeable.
//!
//! # Usage
//!
//! ```rust
//! use infracat_storage::{ClusterStore, NetworkStore};
//! use infracat_testkit::conformance;
//! use std::sync::Arc;
//!
//! conformance::run_all_networks(Arc::new(NetworkStore::in_memory()));
//! conformance::run_all_clusters(Arc::new(ClusterStore::in_memory()));
//! ```
//!
//! Functions use distinct identifiers, so they can share one store. They
//! assume no identifier starting with `conf-` is stored beforehand.
//!
//! | Category | Contract aspect |
//! |----------|-----------------|
//! | CRUD | add/exists/retrieve/update/delete/list/dump semantics |
//! | Relations | attach/detach/exists/list bookkeeping |
//! | Concurrent | thread-safety under parallel access |

use infracat_entities::{Cluster, ClusterType, Entity, Network};
use infracat_storage::{ClusterProvider, EntityProvider, ErrorKind, Family, NetworkProvider};
use std::sync::Arc;
use std::thread;

fn network(id: &str) -> Network {
    Network::new(id, format!("network {id}"))
}

fn cluster(id: &str) -> Cluster {
    Cluster::new("conf-net", id, format!("cluster {id}"), ClusterType::Edge)
}

// ============================================================================
// CRUD
// ============================================================================

/// `add` then `retrieve` returns an equal value.
pub fn crud_add_then_retrieve<P: EntityProvider<Network> + ?Sized>(p: &P) {
    let value = network("conf-rt").with_admin("Ada", "555-0100", "ada@example.com");
    p.add(value.clone()).expect("add");
    assert_eq!(p.retrieve("conf-rt").expect("retrieve"), value);
}

/// A second `add` with the same id fails and keeps the first value.
pub fn crud_duplicate_add_rejected<P: EntityProvider<Network> + ?Sized>(p: &P) {
    p.add(network("conf-dup")).expect("first add");
    let mut other = network("conf-dup");
    other.name = "impostor".into();

    let err = p.add(other).expect_err("duplicate add");
    assert_eq!(err.kind(), ErrorKind::AlreadyExists, "{err}");
    assert_eq!(p.retrieve("conf-dup").expect("retrieve").name, "network conf-dup");
}

/// `exists` never fails, even for ids that could not be stored.
pub fn crud_exists_is_total<P: EntityProvider<Network> + ?Sized>(p: &P) {
    assert!(!p.exists("conf-ghost"));
    assert!(!p.exists(""));
    assert!(!p.exists("../escape"));
}

/// `retrieve` of a missing id is `NotFound`.
pub fn crud_retrieve_missing_is_not_found<P: EntityProvider<Network> + ?Sized>(p: &P) {
    let err = p.retrieve("conf-missing").expect_err("retrieve missing");
    assert_eq!(err.kind(), ErrorKind::NotFound, "{err}");
}

/// `update` replaces the whole stored value.
pub fn crud_update_replaces_value<P: EntityProvider<Network> + ?Sized>(p: &P) {
    p.add(network("conf-upd").with_description("before")).expect("add");
    p.update(network("conf-upd").with_description("after")).expect("update");
    assert_eq!(p.retrieve("conf-upd").expect("retrieve").description, "after");
}

/// `update` of a missing id is `NotFound` and stores nothing.
pub fn crud_update_missing_is_not_found<P: EntityProvider<Network> + ?Sized>(p: &P) {
    let err = p.update(network("conf-upd-missing")).expect_err("update missing");
    assert_eq!(err.kind(), ErrorKind::NotFound, "{err}");
    assert!(!p.exists("conf-upd-missing"));
}

/// After `delete`, the id is neither visible nor retrievable.
pub fn crud_delete_removes_visibility<P: EntityProvider<Network> + ?Sized>(p: &P) {
    p.add(network("conf-del")).expect("add");
    p.delete("conf-del").expect("delete");

    assert!(!p.exists("conf-del"));
    let err = p.retrieve("conf-del").expect_err("retrieve deleted");
    assert_eq!(err.kind(), ErrorKind::NotFound, "{err}");
}

/// `delete` of a missing id is `NotFound`.
pub fn crud_delete_missing_is_not_found<P: EntityProvider<Network> + ?Sized>(p: &P) {
    let err = p.delete("conf-del-missing").expect_err("delete missing");
    assert_eq!(err.kind(), ErrorKind::NotFound, "{err}");
}

/// `list` contains every stored id and `dump` returns the same values.
pub fn crud_list_and_dump_agree<P: EntityProvider<Network> + ?Sized>(p: &P) {
    p.add(network("conf-list-a")).expect("add a");
    p.add(network("conf-list-b")).expect("add b");

    let listed = p.list().expect("list");
    let ids: Vec<_> = listed.iter().map(|n| n.network_id.as_str()).collect();
    assert!(ids.contains(&"conf-list-a") && ids.contains(&"conf-list-b"), "{ids:?}");
    assert_eq!(p.dump().expect("dump"), listed);
}

/// Every field of `value` survives a store round-trip, and so does `changed`
/// after an update. Both must share one identifier not stored beforehand.
pub fn crud_value_round_trip<T, P>(p: &P, value: T, changed: T)
where
    T: Entity + PartialEq,
    P: EntityProvider<T> + ?Sized,
{
    assert_eq!(value.id(), changed.id(), "values must share an id");
    let id = value.id().to_string();

    p.add(value.clone()).expect("add");
    assert_eq!(p.retrieve(&id).expect("retrieve"), value);
    assert!(p.list().expect("list").contains(&value));

    p.update(changed.clone()).expect("update");
    assert_eq!(p.retrieve(&id).expect("retrieve updated"), changed);
    p.delete(&id).expect("delete");
}

/// Relation directory names cannot be used as identifiers of the parent
/// family, and rejecting them leaves the relations usable.
pub fn crud_reserved_ids_rejected<P: NetworkProvider + ?Sized>(p: &P) {
    for relation in Network::RELATIONS {
        let id = relation.dir_name();
        let err = p.add(network(id)).expect_err("add reserved id");
        assert_eq!(err.kind(), ErrorKind::InvalidId, "{err}");
        assert!(!p.exists(id));
        assert_eq!(
            p.update(network(id)).expect_err("update").kind(),
            ErrorKind::InvalidId
        );
        assert_eq!(p.retrieve(id).expect_err("retrieve").kind(), ErrorKind::InvalidId);
    }

    p.add(network("conf-res")).expect("add parent");
    p.attach_cluster("conf-res", "c1").expect("attach");
    p.attach_app_descriptor("conf-res", "d1").expect("attach descriptor");
    assert_eq!(p.list_clusters("conf-res").expect("list"), vec!["c1"]);
}

// ============================================================================
// Relations
// ============================================================================

/// Attaching under an unknown parent is `ParentDoesNotExist`.
pub fn rel_attach_requires_parent<P: NetworkProvider + ?Sized>(p: &P) {
    let err = p.attach_cluster("conf-no-parent", "c1").expect_err("attach");
    assert_eq!(err.kind(), ErrorKind::ParentDoesNotExist, "{err}");
    assert!(!p.exists_cluster("conf-no-parent", "c1"));
}

/// Attaching the same pair twice is `AlreadyAttached`.
pub fn rel_attach_twice_rejected<P: NetworkProvider + ?Sized>(p: &P) {
    p.add(network("conf-att")).expect("add parent");
    p.attach_cluster("conf-att", "c1").expect("first attach");

    let err = p.attach_cluster("conf-att", "c1").expect_err("second attach");
    assert_eq!(err.kind(), ErrorKind::AlreadyAttached, "{err}");
    assert_eq!(p.list_clusters("conf-att").expect("list"), vec!["c1"]);
}

/// Detaching an absent pair is `NotAttached`; a detached pair is gone.
pub fn rel_detach_semantics<P: NetworkProvider + ?Sized>(p: &P) {
    p.add(network("conf-det")).expect("add parent");
    let err = p.detach_app_instance("conf-det", "i1").expect_err("detach absent");
    assert_eq!(err.kind(), ErrorKind::NotAttached, "{err}");

    p.attach_app_instance("conf-det", "i1").expect("attach");
    p.detach_app_instance("conf-det", "i1").expect("detach");
    assert!(!p.exists_app_instance("conf-det", "i1"));
    assert!(p.list_app_instances("conf-det").expect("list").is_empty());
}

/// Listing children of an unknown parent is `ParentDoesNotExist`.
pub fn rel_list_unknown_parent_fails<P: NetworkProvider + ?Sized>(p: &P) {
    let err = p.list_app_descriptors("conf-no-list").expect_err("list");
    assert_eq!(err.kind(), ErrorKind::ParentDoesNotExist, "{err}");
}

/// The three network relations do not share markers.
pub fn rel_relations_are_independent<P: NetworkProvider + ?Sized>(p: &P) {
    p.add(network("conf-ind")).expect("add parent");
    p.attach_cluster("conf-ind", "x").expect("attach cluster");
    p.attach_app_descriptor("conf-ind", "y").expect("attach descriptor");

    assert!(p.exists_cluster("conf-ind", "x"));
    assert!(!p.exists_app_descriptor("conf-ind", "x"));
    assert!(!p.exists_cluster("conf-ind", "y"));
    assert!(p.list_app_instances("conf-ind").expect("list").is_empty());
}

/// Deleting a parent hides its listing but keeps markers for re-adds and
/// detaches.
pub fn rel_parent_delete_keeps_markers<P: NetworkProvider + ?Sized>(p: &P) {
    p.add(network("conf-pd")).expect("add parent");
    p.attach_cluster("conf-pd", "c1").expect("attach");
    p.delete("conf-pd").expect("delete parent");

    let err = p.list_clusters("conf-pd").expect_err("list after delete");
    assert_eq!(err.kind(), ErrorKind::ParentDoesNotExist, "{err}");
    assert!(p.exists_cluster("conf-pd", "c1"));

    p.detach_cluster("conf-pd", "c1").expect("detach orphaned marker");
    assert!(!p.exists_cluster("conf-pd", "c1"));
}

/// The cluster node relation follows the same contract.
pub fn rel_cluster_nodes<P: ClusterProvider + ?Sized>(p: &P) {
    let err = p.attach_node("conf-cl", "node-1").expect_err("attach without parent");
    assert_eq!(err.kind(), ErrorKind::ParentDoesNotExist, "{err}");

    p.add(cluster("conf-cl")).expect("add cluster");
    p.attach_node("conf-cl", "node-1").expect("attach 1");
    p.attach_node("conf-cl", "node-2").expect("attach 2");
    let err = p.attach_node("conf-cl", "node-1").expect_err("attach twice");
    assert_eq!(err.kind(), ErrorKind::AlreadyAttached, "{err}");

    let mut nodes = p.list_nodes("conf-cl").expect("list");
    nodes.sort();
    assert_eq!(nodes, vec!["node-1", "node-2"]);

    p.detach_node("conf-cl", "node-1").expect("detach");
    assert!(!p.exists_node("conf-cl", "node-1"));
    assert!(p.exists_node("conf-cl", "node-2"));
}

// ============================================================================
// Concurrent
// ============================================================================

/// Parallel adds of distinct ids all land.
pub fn concurrent_adds_to_different_ids<P: EntityProvider<Network> + 'static>(p: Arc<P>) {
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let p = Arc::clone(&p);
            thread::spawn(move || {
                for i in 0..10 {
                    p.add(network(&format!("conf-conc-{t}-{i}"))).expect("concurrent add");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread join");
    }

    for t in 0..8 {
        for i in 0..10 {
            assert!(p.exists(&format!("conf-conc-{t}-{i}")));
        }
    }
}

/// Parallel adds of the same id: exactly one wins.
pub fn concurrent_duplicate_adds_one_winner<P: EntityProvider<Network> + 'static>(p: Arc<P>) {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let p = Arc::clone(&p);
            thread::spawn(move || p.add(network("conf-race")))
        })
        .collect();

    let mut wins = 0;
    for handle in handles {
        match handle.join().expect("thread join") {
            Ok(()) => wins += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::AlreadyExists, "{e}"),
        }
    }
    assert_eq!(wins, 1);
}

/// Runs every network clause against one provider.
pub fn run_all_networks<P: NetworkProvider + 'static>(p: Arc<P>) {
    // CRUD
    crud_add_then_retrieve(p.as_ref());
    crud_duplicate_add_rejected(p.as_ref());
    crud_exists_is_total(p.as_ref());
    crud_retrieve_missing_is_not_found(p.as_ref());
    crud_update_replaces_value(p.as_ref());
    crud_update_missing_is_not_found(p.as_ref());
    crud_delete_removes_visibility(p.as_ref());
    crud_delete_missing_is_not_found(p.as_ref());
    crud_list_and_dump_agree(p.as_ref());
    crud_reserved_ids_rejected(p.as_ref());

    // Relations
    rel_attach_requires_parent(p.as_ref());
    rel_attach_twice_rejected(p.as_ref());
    rel_detach_semantics(p.as_ref());
    rel_list_unknown_parent_fails(p.as_ref());
    rel_relations_are_independent(p.as_ref());
    rel_parent_delete_keeps_markers(p.as_ref());

    // Concurrent
    concurrent_adds_to_different_ids(Arc::clone(&p));
    concurrent_duplicate_adds_one_winner(p);
}

/// Runs every cluster clause against one provider.
pub fn run_all_clusters<P: ClusterProvider + 'static>(p: Arc<P>) {
    for relation in Cluster::RELATIONS {
        let err = p.add(cluster(relation.dir_name())).expect_err("add reserved id");
        assert_eq!(err.kind(), ErrorKind::InvalidId, "{err}");
    }
    rel_cluster_nodes(p.as_ref());
}
