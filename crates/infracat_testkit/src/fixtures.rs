//! Test fixtures and catalog helpers.
//!
//! Provides convenience functions for setting up test catalogs, seeding
//! common scenarios and injecting provider failures.

use infracat_core::Providers;
use infracat_entities::Entity;
use infracat_storage::{EntityProvider, EntityStore, Family, StorageError, StorageResult};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Once;
use tempfile::TempDir;

/// Installs a tracing subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything. The
/// level comes from `RUST_LOG` and defaults to `warn`.
pub fn init_test_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        // Another harness may already own the global subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A provider bundle with automatic cleanup.
pub struct TestCatalog {
    /// The providers.
    pub providers: Providers,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: Option<TempDir>,
}

impl TestCatalog {
    /// Creates in-memory providers.
    pub fn memory() -> Self {
        Self {
            providers: Providers::in_memory(),
            temp_dir: None,
        }
    }

    /// Creates file-backed providers in a fresh temporary directory.
    pub fn file() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let providers = Providers::open(temp_dir.path()).expect("Failed to open file providers");
        Self {
            providers,
            temp_dir: Some(temp_dir),
        }
    }

    /// Returns the base directory if file-backed, None if in-memory.
    pub fn path(&self) -> Option<&Path> {
        self.temp_dir.as_ref().map(TempDir::path)
    }

    /// Reopens file-backed providers over the same directory.
    ///
    /// Panics for in-memory catalogs.
    pub fn reopen(&self) -> Providers {
        let path = self.path().expect("Only file catalogs can be reopened");
        Providers::open(path).expect("Failed to reopen file providers")
    }
}

impl std::ops::Deref for TestCatalog {
    type Target = Providers;

    fn deref(&self) -> &Self::Target {
        &self.providers
    }
}

/// Runs a test with temporary in-memory providers.
pub fn with_memory_catalog<F, R>(f: F) -> R
where
    F: FnOnce(&Providers) -> R,
{
    let catalog = TestCatalog::memory();
    f(&catalog.providers)
}

/// Runs a test with temporary file-backed providers.
pub fn with_file_catalog<F, R>(f: F) -> R
where
    F: FnOnce(&Providers, &Path) -> R,
{
    let catalog = TestCatalog::file();
    let path = catalog.path().expect("File catalog should have a path");
    f(&catalog.providers, path)
}

/// Runs a test once per backend.
pub fn with_each_backend<F>(mut f: F)
where
    F: FnMut(&Providers),
{
    f(&TestCatalog::memory().providers);
    f(&TestCatalog::file().providers);
}

/// A store whose writes can be made to fail on demand.
///
/// Reads always go to the wrapped store. Failures are reported as I/O
/// errors, the way a full disk would surface.
#[derive(Debug)]
pub struct FaultyProvider<T: Entity> {
    inner: EntityStore<T>,
    fail_add: AtomicBool,
    fail_delete: AtomicBool,
}

impl<T: Family> FaultyProvider<T> {
    /// Wraps an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::wrap(EntityStore::in_memory())
    }
}

impl<T: Entity> FaultyProvider<T> {
    /// Wraps `inner`. No failure is armed.
    pub fn wrap(inner: EntityStore<T>) -> Self {
        Self {
            inner,
            fail_add: AtomicBool::new(false),
            fail_delete: AtomicBool::new(false),
        }
    }

    /// Makes every `add` fail while `fail` is true.
    pub fn fail_adds(&self, fail: bool) {
        self.fail_add.store(fail, Ordering::SeqCst);
    }

    /// Makes every `delete` fail while `fail` is true.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    fn injected(op: &str) -> StorageError {
        StorageError::io(
            format!("<injected {op} {}>", T::KIND),
            io::Error::other("injected fault"),
        )
    }
}

impl<T: Entity> EntityProvider<T> for FaultyProvider<T> {
    fn add(&self, value: T) -> StorageResult<()> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(Self::injected("add"));
        }
        self.inner.add(value)
    }

    fn exists(&self, id: &str) -> bool {
        self.inner.exists(id)
    }

    fn retrieve(&self, id: &str) -> StorageResult<T> {
        self.inner.retrieve(id)
    }

    fn update(&self, value: T) -> StorageResult<()> {
        self.inner.update(value)
    }

    fn delete(&self, id: &str) -> StorageResult<()> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(Self::injected("delete"));
        }
        self.inner.delete(id)
    }

    fn list(&self) -> StorageResult<Vec<T>> {
        self.inner.list()
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use infracat_entities::{
        AccessRole, AppDescriptor, Cluster, ClusterType, Network, Node, Password, User,
        UserAccess,
    };
    use infracat_storage::{ClusterProvider, NetworkProvider};

    /// Seeds one network `n1` with one cluster `c1`, one node `node-1`, one
    /// app descriptor `d1` and one user `ada`, all attached.
    pub fn one_of_each(p: &Providers) {
        p.networks
            .add(Network::new("n1", "lab").with_description("test network"))
            .expect("add network");
        p.clusters
            .add(Cluster::new("n1", "c1", "edge-a", ClusterType::Edge).with_location("rack 1"))
            .expect("add cluster");
        p.networks.attach_cluster("n1", "c1").expect("attach cluster");
        p.nodes
            .add(Node::new("n1", "c1", "node-1", "worker").with_labels(["gpu"]))
            .expect("add node");
        p.clusters.attach_node("c1", "node-1").expect("attach node");
        p.app_descriptors
            .add(AppDescriptor::new("n1", "d1", "web").with_service("nginx", "1.25", 80))
            .expect("add app descriptor");
        p.networks
            .attach_app_descriptor("n1", "d1")
            .expect("attach app descriptor");
        p.users
            .add(User::new("ada", "Ada", "ada@example.com"))
            .expect("add user");
        p.access
            .add(UserAccess::new("ada", vec![AccessRole::Operator]))
            .expect("add access");
        p.passwords
            .add(Password::new("ada", "hash"))
            .expect("add password");
    }

    /// Adds a system account that exports leave out by default.
    pub fn internal_user(p: &Providers, username: &str) {
        p.users
            .add(User::new(username, "System", ""))
            .expect("add user");
        p.access
            .add(UserAccess::new(username, vec![AccessRole::Internal]))
            .expect("add access");
    }
}
