//! Export/import behavior across providers and backends.

use infracat_core::{BackupManager, BackupSnapshot, Component, CoreError, Providers, SagaFailure};
use infracat_entities::{AccessRole, Password, User, UserAccess};
use infracat_storage::ErrorKind;
use infracat_testkit::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;

fn export_all(p: &Providers) -> BackupSnapshot {
    BackupManager::with_defaults(p.clone())
        .export(Component::All)
        .unwrap()
}

#[test]
fn round_trip_preserves_cardinality() {
    init_test_tracing();
    with_each_backend(|source| {
        scenarios::one_of_each(source);
        let snapshot = export_all(source);
        for c in Component::ORDER {
            assert_eq!(snapshot.count(c), 1, "{c}");
        }

        with_each_backend(|target| {
            let stats = BackupManager::with_defaults(target.clone())
                .import(Component::All, &snapshot)
                .unwrap();
            assert_eq!(stats.total(), 5);

            let again = export_all(target);
            for c in Component::ORDER {
                assert_eq!(again.count(c), 1, "{c}");
            }
        });
    });
}

#[test]
fn imported_file_catalog_survives_reopen() {
    let source = TestCatalog::memory();
    scenarios::one_of_each(&source);
    let snapshot = export_all(&source);

    let target = TestCatalog::file();
    BackupManager::with_defaults(target.providers.clone())
        .import(Component::All, &snapshot)
        .unwrap();

    let reopened = target.reopen();
    assert_eq!(export_all(&reopened), snapshot);
}

#[test]
fn import_replaces_existing_values() {
    with_each_backend(|p| {
        scenarios::one_of_each(p);
        let mut snapshot = export_all(p);
        snapshot.clusters[0].location = "rack 9".into();
        snapshot.nodes[0].add_label("ssd");
        snapshot.users[0].access.roles = vec![AccessRole::GlobalAdmin];

        BackupManager::with_defaults(p.clone())
            .import(Component::All, &snapshot)
            .unwrap();

        assert_eq!(p.clusters.retrieve("c1").unwrap().location, "rack 9");
        assert!(p.nodes.retrieve("node-1").unwrap().labels.contains("ssd"));
        assert_eq!(p.access.retrieve("ada").unwrap().roles, vec![AccessRole::GlobalAdmin]);
        assert_eq!(p.networks.list().unwrap().len(), 1);
    });
}

#[test]
fn replaying_a_snapshot_is_idempotent() {
    let p = TestCatalog::memory();
    scenarios::one_of_each(&p);
    let snapshot = export_all(&p);
    let manager = BackupManager::with_defaults(p.providers.clone());

    manager.import(Component::All, &snapshot).unwrap();
    manager.import(Component::All, &snapshot).unwrap();

    assert_eq!(export_all(&p), snapshot);
    assert_eq!(p.networks.list_app_descriptors("n1").unwrap(), vec!["d1"]);
}

#[test]
fn failed_access_write_leaves_user_committed() {
    let access = Arc::new(FaultyProvider::<UserAccess>::in_memory());
    access.fail_adds(true);
    let target = Providers::in_memory().with_access(access.clone());

    let mut snapshot = BackupSnapshot::default();
    snapshot.users.push(infracat_core::UserBackup {
        user: User::new("ada", "Ada", "ada@example.com"),
        access: UserAccess::new("ada", vec![AccessRole::Operator]),
        password: Password::new("ada", "hash"),
    });

    let err = BackupManager::with_defaults(target.clone())
        .import(Component::Users, &snapshot)
        .unwrap_err();

    match &err {
        CoreError::Saga(SagaFailure {
            failed_step,
            completed,
            ..
        }) => {
            assert_eq!(*failed_step, "access");
            assert_eq!(completed, &vec!["user"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.storage_kind(), Some(ErrorKind::Io));

    // No rollback: the first write is observable, the later ones never ran.
    assert!(target.users.exists("ada"));
    assert!(!access.exists("ada"));
    assert!(!target.passwords.exists("ada"));
}

#[test]
fn failed_password_write_leaves_user_and_access_committed() {
    let passwords = Arc::new(FaultyProvider::<Password>::in_memory());
    passwords.fail_adds(true);
    let target = Providers::in_memory().with_passwords(passwords.clone());

    let source = TestCatalog::memory();
    scenarios::one_of_each(&source);
    let snapshot = export_all(&source);

    let err = BackupManager::with_defaults(target.clone())
        .import(Component::All, &snapshot)
        .unwrap_err();

    assert!(matches!(err, CoreError::Saga(ref f) if f.failed_step == "password"));
    assert!(target.networks.exists("n1"));
    assert!(target.app_descriptors.exists("d1"));
    assert!(target.users.exists("ada"));
    assert!(target.access.exists("ada"));
    assert!(!passwords.exists("ada"));
}

#[test]
fn failed_delete_stops_import_before_later_families() {
    let passwords = Arc::new(FaultyProvider::<Password>::in_memory());
    let target = Providers::in_memory().with_passwords(passwords.clone());
    scenarios::one_of_each(&target);
    passwords.fail_deletes(true);

    let mut snapshot = export_all(&target);
    snapshot.users.push(infracat_core::UserBackup {
        user: User::new("bob", "Bob", ""),
        access: UserAccess::placeholder("bob"),
        password: Password::placeholder("bob"),
    });

    let err = BackupManager::with_defaults(target.clone())
        .import(Component::Users, &snapshot)
        .unwrap_err();

    assert_eq!(err.storage_kind(), Some(ErrorKind::Io));
    assert!(!target.users.exists("bob"));
}

#[test]
fn corrupt_record_fails_whole_export() {
    let catalog = TestCatalog::file();
    scenarios::one_of_each(&catalog);
    let base = catalog.path().unwrap();
    std::fs::write(base.join("nodes").join("node-2"), b"{not json").unwrap();

    let manager = BackupManager::with_defaults(catalog.providers.clone());
    let err = manager.export(Component::All).unwrap_err();
    assert_eq!(err.storage_kind(), Some(ErrorKind::Unmarshal));

    // Only selections that read the corrupt family fail.
    let err = manager.export(Component::Nodes).unwrap_err();
    assert_eq!(err.storage_kind(), Some(ErrorKind::Unmarshal));
    assert!(manager.export(Component::Networks).is_ok());
}

#[test]
fn internal_users_are_not_exported() {
    with_each_backend(|p| {
        scenarios::one_of_each(p);
        scenarios::internal_user(p, "conductor");

        let users: Vec<_> = export_all(p)
            .users
            .into_iter()
            .map(|u| u.user.username)
            .collect();
        assert_eq!(users, vec!["ada"]);
    });
}

#[test]
fn snapshot_json_shape() {
    let p = TestCatalog::memory();
    scenarios::one_of_each(&p);
    let json = export_all(&p).to_json().unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in ["networks", "clusters", "nodes", "appDescriptors", "users"] {
        assert!(value.get(key).is_some_and(|v| v.is_array()), "{key}");
    }
    assert_eq!(value["users"][0]["user"]["username"], "ada");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn generated_snapshots_round_trip(snapshot in snapshot_strategy()) {
        let target = Providers::in_memory();
        let manager = BackupManager::with_defaults(target.clone());

        let stats = manager.import(Component::All, &snapshot).unwrap();
        prop_assert_eq!(stats.total(), snapshot.count(Component::All));
        prop_assert_eq!(stats.rebound, 0);

        let again = manager.export(Component::All).unwrap();
        for c in Component::ORDER {
            prop_assert_eq!(again.count(c), snapshot.count(c));
        }
    }

    #[test]
    fn foreign_descriptors_are_rebound(snapshot in foreign_descriptor_snapshot_strategy()) {
        let target = Providers::in_memory();
        let stats = BackupManager::with_defaults(target.clone())
            .import(Component::All, &snapshot)
            .unwrap();
        prop_assert_eq!(stats.rebound, snapshot.app_descriptors.len());

        let home = &snapshot.networks[0].network_id;
        let mut attached = target.networks.list_app_descriptors(home).unwrap();
        attached.sort();
        let mut expected: Vec<_> = snapshot
            .app_descriptors
            .iter()
            .map(|d| d.app_descriptor_id.clone())
            .collect();
        expected.sort();
        prop_assert_eq!(attached, expected);
        for descriptor in target.app_descriptors.list().unwrap() {
            prop_assert_eq!(&descriptor.network_id, home);
        }
    }

    #[test]
    fn internal_users_import_but_do_not_export(
        (snapshot, internal) in internal_users_snapshot_strategy()
    ) {
        let target = Providers::in_memory();
        let manager = BackupManager::with_defaults(target.clone());
        manager.import(Component::Users, &snapshot).unwrap();
        prop_assert_eq!(target.users.list().unwrap().len(), snapshot.users.len());

        let exported = manager.export(Component::Users).unwrap();
        prop_assert_eq!(exported.users.len(), snapshot.users.len() - internal);
        prop_assert!(exported.users.iter().all(|u| !u.access.is_internal()));
    }
}
