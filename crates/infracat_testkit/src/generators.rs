//! Property-based test generators using proptest.
//!
//! Provides strategies for generating entities whose identifiers every
//! backend can store.

use infracat_core::BackupSnapshot;
use infracat_entities::{
    AccessRole, AppDescriptor, Cluster, ClusterStatus, ClusterType, Network, Node, Password, User,
    UserAccess,
};
use infracat_storage::Family;
use proptest::prelude::*;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Returns a random identifier, unique for all practical purposes.
pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Strategy for readable identifiers.
///
/// Relation directory names are left out; stores reject them.
pub fn id_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9-]{0,15}")
        .expect("Invalid regex")
        .prop_filter("reserved identifier", |id| !is_reserved(id))
}

fn is_reserved(id: &str) -> bool {
    Network::RELATIONS
        .iter()
        .chain(Cluster::RELATIONS)
        .any(|relation| relation.dir_name() == id)
}

/// Strategy for UUID identifiers, as the platform allocates them.
pub fn uuid_id_strategy() -> impl Strategy<Value = String> {
    prop::array::uniform16(any::<u8>()).prop_map(|bytes| Uuid::from_bytes(bytes).to_string())
}

/// Strategy for short display names and free text.
pub fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Za-z0-9 ._-]{0,24}").expect("Invalid regex")
}

/// Strategy for node label sets.
pub fn label_set_strategy() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set(
        prop::string::string_regex("[a-z]{1,6}").expect("Invalid regex"),
        0..5,
    )
}

/// Strategy for cluster types.
pub fn cluster_type_strategy() -> impl Strategy<Value = ClusterType> {
    prop_oneof![
        Just(ClusterType::Cloud),
        Just(ClusterType::Edge),
        Just(ClusterType::Gateway),
    ]
}

/// Strategy for cluster statuses.
pub fn cluster_status_strategy() -> impl Strategy<Value = ClusterStatus> {
    prop_oneof![
        Just(ClusterStatus::Created),
        Just(ClusterStatus::ReadyToInstall),
        Just(ClusterStatus::Installing),
        Just(ClusterStatus::Installed),
        Just(ClusterStatus::Uninstalling),
        Just(ClusterStatus::Error),
    ]
}

/// Strategy for networks.
pub fn network_strategy() -> impl Strategy<Value = Network> {
    (
        id_strategy(),
        text_strategy(),
        text_strategy(),
        proptest::option::of(uuid_id_strategy()),
    )
        .prop_map(|(id, name, description, edgenet_id)| {
            let mut network = Network::new(id, name).with_description(description);
            network.edgenet_id = edgenet_id;
            network
        })
}

/// Strategy for clusters in `network_id`.
pub fn cluster_strategy(network_id: String) -> impl Strategy<Value = Cluster> {
    (
        id_strategy(),
        text_strategy(),
        cluster_type_strategy(),
        cluster_status_strategy(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(move |(id, name, kind, status, drain, cordon)| {
            let mut cluster = Cluster::new(network_id.clone(), id, name, kind);
            cluster.status = status;
            cluster.drain = drain;
            cluster.cordon = cordon;
            cluster
        })
}

/// Strategy for nodes in a cluster.
pub fn node_strategy(network_id: String, cluster_id: String) -> impl Strategy<Value = Node> {
    (id_strategy(), text_strategy(), label_set_strategy(), text_strategy())
        .prop_map(move |(id, name, labels, ssh_key)| {
            let mut node =
                Node::new(network_id.clone(), cluster_id.clone(), id, name).with_labels(labels);
            node.ssh_key = ssh_key;
            node
        })
}

/// Strategy for app descriptors in `network_id`.
pub fn app_descriptor_strategy(network_id: String) -> impl Strategy<Value = AppDescriptor> {
    (
        id_strategy(),
        text_strategy(),
        any::<u16>(),
        prop::collection::vec(text_strategy(), 0..3),
    )
        .prop_map(move |(id, name, port, images)| {
            let mut descriptor =
                AppDescriptor::new(network_id.clone(), id, name).with_service("svc", "1.0", port);
            descriptor.images = images;
            descriptor
        })
}

/// Strategy for non-internal users with access and password records.
pub fn user_strategy() -> impl Strategy<Value = (User, UserAccess, Password)> {
    (
        id_strategy(),
        text_strategy(),
        prop::sample::subsequence(
            vec![
                AccessRole::GlobalAdmin,
                AccessRole::Operator,
                AccessRole::Developer,
            ],
            0..=3,
        ),
        text_strategy(),
    )
        .prop_map(|(username, name, roles, secret)| {
            (
                User::new(username.clone(), name, format!("{username}@example.com")),
                UserAccess::new(username.clone(), roles),
                Password::new(username, secret),
            )
        })
}

/// Strategy for a consistent catalog: one network with clusters, nodes and
/// app descriptors, plus users. Identifiers are unique per family.
pub fn snapshot_strategy() -> impl Strategy<Value = BackupSnapshot> {
    id_strategy().prop_flat_map(|network_id| {
        (
            network_strategy().prop_map({
                let network_id = network_id.clone();
                move |mut n| {
                    n.network_id = network_id.clone();
                    n
                }
            }),
            prop::collection::vec(cluster_strategy(network_id.clone()), 0..4),
            prop::collection::vec(node_strategy(network_id.clone(), "c0".into()), 0..4),
            prop::collection::vec(app_descriptor_strategy(network_id), 0..4),
            prop::collection::vec(user_strategy(), 0..4),
        )
            .prop_map(|(network, clusters, nodes, descriptors, users)| BackupSnapshot {
                networks: vec![network],
                clusters: dedup_by_id(clusters, |c| c.cluster_id.clone()),
                nodes: dedup_by_id(nodes, |n| n.node_id.clone()),
                app_descriptors: dedup_by_id(descriptors, |d| d.app_descriptor_id.clone()),
                users: dedup_by_id(users, |(u, _, _)| u.username.clone())
                    .into_iter()
                    .map(|(user, access, password)| infracat_core::UserBackup {
                        user,
                        access,
                        password,
                    })
                    .collect(),
            })
    })
}

/// Like [`snapshot_strategy`], but every app descriptor names a network the
/// snapshot does not contain, so import has to rebind all of them.
pub fn foreign_descriptor_snapshot_strategy() -> impl Strategy<Value = BackupSnapshot> {
    snapshot_strategy().prop_map(|mut snapshot| {
        let foreign = format!("{}-gone", snapshot.networks[0].network_id);
        for descriptor in &mut snapshot.app_descriptors {
            descriptor.network_id = foreign.clone();
        }
        snapshot
    })
}

/// Like [`snapshot_strategy`], with some users turned into system accounts.
/// Also yields how many were turned.
pub fn internal_users_snapshot_strategy() -> impl Strategy<Value = (BackupSnapshot, usize)> {
    snapshot_strategy()
        .prop_flat_map(|snapshot| {
            let len = snapshot.users.len();
            (Just(snapshot), prop::collection::vec(any::<bool>(), len))
        })
        .prop_map(|(mut snapshot, flags)| {
            let mut internal = 0;
            for (entry, flag) in snapshot.users.iter_mut().zip(flags) {
                if flag {
                    entry.access.roles.push(AccessRole::Internal);
                    internal += 1;
                }
            }
            (snapshot, internal)
        })
}

fn dedup_by_id<T, F>(items: Vec<T>, id: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut seen = BTreeSet::new();
    items.into_iter().filter(|item| seen.insert(id(item))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use infracat_storage::validate_id;

    proptest! {
        #[test]
        fn generated_ids_are_storable(id in id_strategy(), uuid in uuid_id_strategy()) {
            prop_assert!(validate_id(&id).is_ok());
            prop_assert!(validate_id(&uuid).is_ok());
        }

        #[test]
        fn snapshot_ids_are_unique(snapshot in snapshot_strategy()) {
            let ids: BTreeSet<_> = snapshot.clusters.iter().map(|c| &c.cluster_id).collect();
            prop_assert_eq!(ids.len(), snapshot.clusters.len());
        }
    }

    proptest! {
        #[test]
        fn foreign_descriptors_never_name_the_snapshot_network(
            snapshot in foreign_descriptor_snapshot_strategy()
        ) {
            let home = &snapshot.networks[0].network_id;
            prop_assert!(snapshot.app_descriptors.iter().all(|d| &d.network_id != home));
        }
    }

    #[test]
    fn reserved_ids_are_detected() {
        assert!(is_reserved("clusters"));
        assert!(is_reserved("nodes"));
        assert!(!is_reserved("cluster-1"));
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(fresh_id(), fresh_id());
    }
}
