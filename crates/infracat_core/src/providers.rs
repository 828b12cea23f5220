//! The set of providers a catalog runs on.

use crate::config::{BackendKind, Config};
use crate::error::{CoreError, CoreResult};
use infracat_storage::{
    AppDescriptorProvider, AppDescriptorStore, AppInstanceProvider, AppInstanceStore, Backend,
    ClusterProvider, ClusterStore, FileBackend, MemoryBackend, NetworkProvider, NetworkStore,
    NodeProvider, NodeStore, PasswordProvider, PasswordStore, StorageResult, UserAccessProvider,
    UserAccessStore, UserProvider, UserStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Shared handles to one provider per entity family.
///
/// Cloning is cheap and clones share the same providers. Providers are never
/// coordinated with each other; managers sequence calls across them.
#[derive(Clone)]
pub struct Providers {
    /// Network storage.
    pub networks: Arc<dyn NetworkProvider>,
    /// Cluster storage.
    pub clusters: Arc<dyn ClusterProvider>,
    /// Node storage.
    pub nodes: Arc<dyn NodeProvider>,
    /// App descriptor storage.
    pub app_descriptors: Arc<dyn AppDescriptorProvider>,
    /// App instance storage.
    pub app_instances: Arc<dyn AppInstanceProvider>,
    /// User storage.
    pub users: Arc<dyn UserProvider>,
    /// User access storage.
    pub access: Arc<dyn UserAccessProvider>,
    /// Password storage.
    pub passwords: Arc<dyn PasswordProvider>,
}

impl Providers {
    /// Builds every provider from `backend`.
    ///
    /// # Errors
    ///
    /// Returns an error if any provider cannot open its media.
    pub fn with_backend<B: Backend>(backend: &B) -> StorageResult<Self> {
        Ok(Self {
            networks: Arc::new(NetworkStore::with_backend(backend)?),
            clusters: Arc::new(ClusterStore::with_backend(backend)?),
            nodes: Arc::new(NodeStore::with_backend(backend)?),
            app_descriptors: Arc::new(AppDescriptorStore::with_backend(backend)?),
            app_instances: Arc::new(AppInstanceStore::with_backend(backend)?),
            users: Arc::new(UserStore::with_backend(backend)?),
            access: Arc::new(UserAccessStore::with_backend(backend)?),
            passwords: Arc::new(PasswordStore::with_backend(backend)?),
        })
    }

    /// Creates empty in-memory providers.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            networks: Arc::new(NetworkStore::in_memory()),
            clusters: Arc::new(ClusterStore::in_memory()),
            nodes: Arc::new(NodeStore::in_memory()),
            app_descriptors: Arc::new(AppDescriptorStore::in_memory()),
            app_instances: Arc::new(AppInstanceStore::in_memory()),
            users: Arc::new(UserStore::in_memory()),
            access: Arc::new(UserAccessStore::in_memory()),
            passwords: Arc::new(PasswordStore::in_memory()),
        }
    }

    /// Opens file-backed providers under `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if a family directory cannot be created.
    pub fn open(base: impl Into<PathBuf>) -> StorageResult<Self> {
        Self::with_backend(&FileBackend::new(base))
    }

    /// Builds the providers described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file backend has no base directory, or
    /// the storage error if a provider cannot be opened.
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        match config.backend {
            BackendKind::Memory => {
                info!(backend = "memory", "Opening providers");
                Ok(Self::with_backend(&MemoryBackend)?)
            }
            BackendKind::File => {
                let base = config
                    .base()
                    .ok_or_else(|| CoreError::invalid_config("file backend needs a base path"))?;
                info!(backend = "file", base = %base.display(), "Opening providers");
                Ok(Self::open(base)?)
            }
        }
    }

    /// Replaces the user access provider.
    #[must_use]
    pub fn with_access(mut self, access: Arc<dyn UserAccessProvider>) -> Self {
        self.access = access;
        self
    }

    /// Replaces the password provider.
    #[must_use]
    pub fn with_passwords(mut self, passwords: Arc<dyn PasswordProvider>) -> Self {
        self.passwords = passwords;
        self
    }
}

impl Default for Providers {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for Providers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Providers").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infracat_entities::Network;
    use infracat_storage::EntityProvider;
    use tempfile::tempdir;

    #[test]
    fn clones_share_providers() {
        let a = Providers::in_memory();
        let b = a.clone();

        a.networks.add(Network::new("n1", "lab")).unwrap();
        assert!(b.networks.exists("n1"));
    }

    #[test]
    fn file_config_needs_base() {
        let config = Config::new().backend(BackendKind::File);
        let err = Providers::from_config(&config).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn file_config_opens_under_base() {
        let dir = tempdir().unwrap();
        let providers = Providers::from_config(&Config::file(dir.path())).unwrap();

        providers.networks.add(Network::new("n1", "lab")).unwrap();
        assert!(dir.path().join("networks").join("n1").is_file());
        assert!(dir.path().join("passwords").is_dir());
    }

    #[test]
    fn memory_config_is_default() {
        let providers = Providers::from_config(&Config::default()).unwrap();
        assert!(providers.nodes.list().unwrap().is_empty());
    }
}
