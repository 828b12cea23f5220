//! Catalog backup and restore.
//!
//! Export reads whole entity families into a [`BackupSnapshot`]; import
//! replays a snapshot into the providers. Both walk the families in a fixed
//! order: networks, clusters, nodes, app descriptors, users.
//!
//! ## Import semantics
//!
//! - Every entity is written with delete-then-add, so replaying a snapshot
//!   replaces stored values with the same identifier.
//! - App descriptors are rebound to the first network returned by the
//!   network provider and registered in it if needed.
//! - Each user is written as a three-step saga (user, access, password)
//!   with no rollback.
//! - The first error stops the import. Everything written before it stays
//!   committed.
//!
//! ## Usage
//!
//! ```rust
//! use infracat_core::backup::{BackupManager, Component};
//! use infracat_core::Providers;
//! use infracat_entities::Network;
//! use infracat_storage::EntityProvider;
//!
//! let source = Providers::in_memory();
//! source.networks.add(Network::new("n1", "lab")).unwrap();
//!
//! let snapshot = BackupManager::with_defaults(source).export(Component::All).unwrap();
//!
//! let target = Providers::in_memory();
//! let stats = BackupManager::with_defaults(target.clone())
//!     .import(Component::All, &snapshot)
//!     .unwrap();
//!
//! assert_eq!(stats.networks, 1);
//! assert!(target.networks.exists("n1"));
//! ```

use crate::error::{CoreError, CoreResult};
use crate::providers::Providers;
use crate::saga::{replace, WriteSaga};
use infracat_entities::{AppDescriptor, Cluster, Entity, Network, Node, Password, User, UserAccess};
use infracat_storage::{EntityProvider, StorageResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// A backup selector: one entity family or all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// Networks.
    Networks,
    /// Clusters.
    Clusters,
    /// Nodes.
    Nodes,
    /// App descriptors.
    AppDescriptors,
    /// Users with their access and password records.
    Users,
    /// Every family above, in that order.
    All,
}

impl Component {
    /// Processing order of the families selected by [`Component::All`].
    pub const ORDER: [Component; 5] = [
        Component::Networks,
        Component::Clusters,
        Component::Nodes,
        Component::AppDescriptors,
        Component::Users,
    ];

    /// Returns the families selected by this component, in processing order.
    #[must_use]
    pub fn expand(self) -> Vec<Component> {
        match self {
            Component::All => Self::ORDER.to_vec(),
            single => vec![single],
        }
    }

    /// Selector name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Component::Networks => "networks",
            Component::Clusters => "clusters",
            Component::Nodes => "nodes",
            Component::AppDescriptors => "appdesc",
            Component::Users => "users",
            Component::All => "all",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Component {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "networks" => Ok(Component::Networks),
            "clusters" => Ok(Component::Clusters),
            "nodes" => Ok(Component::Nodes),
            "appdesc" => Ok(Component::AppDescriptors),
            "users" => Ok(Component::Users),
            "all" => Ok(Component::All),
            other => Err(CoreError::unknown_component(other)),
        }
    }
}

/// A user together with its access and password records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBackup {
    /// The user.
    pub user: User,
    /// Granted roles.
    pub access: UserAccess,
    /// Stored password.
    pub password: Password,
}

/// Entities carried between an export and an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    /// Networks.
    #[serde(default)]
    pub networks: Vec<Network>,
    /// Clusters.
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    /// Nodes.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// App descriptors.
    #[serde(default)]
    pub app_descriptors: Vec<AppDescriptor>,
    /// Users.
    #[serde(default)]
    pub users: Vec<UserBackup>,
}

impl BackupSnapshot {
    /// Returns the number of entries of one family.
    ///
    /// For [`Component::All`], the total over every family.
    #[must_use]
    pub fn count(&self, component: Component) -> usize {
        match component {
            Component::Networks => self.networks.len(),
            Component::Clusters => self.clusters.len(),
            Component::Nodes => self.nodes.len(),
            Component::AppDescriptors => self.app_descriptors.len(),
            Component::Users => self.users.len(),
            Component::All => Component::ORDER.iter().map(|&c| self.count(c)).sum(),
        }
    }

    /// Encodes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decodes a snapshot from JSON.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for backup operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupConfig {
    /// Leave system accounts out of exported users.
    pub exclude_internal_users: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            exclude_internal_users: true,
        }
    }
}

impl BackupConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether system accounts are left out of exports.
    #[must_use]
    pub const fn exclude_internal_users(mut self, value: bool) -> Self {
        self.exclude_internal_users = value;
        self
    }
}

/// Counts of entities written by an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Networks written.
    pub networks: usize,
    /// Clusters written.
    pub clusters: usize,
    /// Nodes written.
    pub nodes: usize,
    /// App descriptors written.
    pub app_descriptors: usize,
    /// Users written, each with its access and password.
    pub users: usize,
    /// App descriptors whose network was rebound.
    pub rebound: usize,
}

impl ImportStats {
    /// Total number of entities written, counting a user once.
    #[must_use]
    pub fn total(&self) -> usize {
        self.networks + self.clusters + self.nodes + self.app_descriptors + self.users
    }
}

/// Exports and imports catalog snapshots.
#[derive(Debug, Clone)]
pub struct BackupManager {
    providers: Providers,
    config: BackupConfig,
}

impl BackupManager {
    /// Creates a backup manager with the given configuration.
    #[must_use]
    pub fn new(providers: Providers, config: BackupConfig) -> Self {
        Self { providers, config }
    }

    /// Creates a backup manager with default configuration.
    #[must_use]
    pub fn with_defaults(providers: Providers) -> Self {
        Self::new(providers, BackupConfig::default())
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BackupConfig {
        &self.config
    }

    /// Reads the selected families into a snapshot.
    ///
    /// # Errors
    ///
    /// Fails with the first provider error; no partial snapshot is returned.
    pub fn export(&self, component: Component) -> CoreResult<BackupSnapshot> {
        let p = &self.providers;
        let mut snapshot = BackupSnapshot::default();
        for family in component.expand() {
            match family {
                Component::Networks => snapshot.networks = p.networks.dump()?,
                Component::Clusters => snapshot.clusters = p.clusters.dump()?,
                Component::Nodes => snapshot.nodes = p.nodes.dump()?,
                Component::AppDescriptors => snapshot.app_descriptors = p.app_descriptors.dump()?,
                Component::Users => snapshot.users = self.export_users()?,
                Component::All => continue,
            }
            info!(component = %family, count = snapshot.count(family), "Exported");
        }
        Ok(snapshot)
    }

    fn export_users(&self) -> CoreResult<Vec<UserBackup>> {
        let p = &self.providers;
        let mut out = Vec::new();
        for user in p.users.dump()? {
            let access = or_placeholder(p.access.retrieve(&user.username), || {
                UserAccess::placeholder(&user.username)
            })?;
            if self.config.exclude_internal_users && access.is_internal() {
                continue;
            }
            let password = or_placeholder(p.passwords.retrieve(&user.username), || {
                Password::placeholder(&user.username)
            })?;
            out.push(UserBackup {
                user,
                access,
                password,
            });
        }
        Ok(out)
    }

    /// Writes the selected families of `snapshot` into the providers.
    ///
    /// # Errors
    ///
    /// Stops at the first failing write and returns its error. Writes that
    /// completed before it are not undone.
    pub fn import(
        &self,
        component: Component,
        snapshot: &BackupSnapshot,
    ) -> CoreResult<ImportStats> {
        let p = &self.providers;
        let mut stats = ImportStats::default();
        for family in component.expand() {
            let result = match family {
                Component::Networks => {
                    import_each(&*p.networks, &snapshot.networks, &mut stats.networks)
                }
                Component::Clusters => {
                    import_each(&*p.clusters, &snapshot.clusters, &mut stats.clusters)
                }
                Component::Nodes => import_each(&*p.nodes, &snapshot.nodes, &mut stats.nodes),
                Component::AppDescriptors => {
                    self.import_app_descriptors(&snapshot.app_descriptors, &mut stats)
                }
                Component::Users => self.import_users(&snapshot.users, &mut stats.users),
                Component::All => continue,
            };
            if let Err(e) = result {
                warn!(component = %family, error = %e, "Import aborted");
                return Err(e);
            }
            info!(component = %family, count = snapshot.count(family), "Imported");
        }
        Ok(stats)
    }

    fn import_app_descriptors(
        &self,
        descriptors: &[AppDescriptor],
        stats: &mut ImportStats,
    ) -> CoreResult<()> {
        if descriptors.is_empty() {
            return Ok(());
        }
        let networks = &self.providers.networks;
        let target = networks
            .list()?
            .into_iter()
            .next()
            .map(|n| n.network_id)
            .ok_or_else(|| CoreError::operation_failed("no network to bind app descriptors to"))?;

        for descriptor in descriptors {
            let mut descriptor = descriptor.clone();
            if descriptor.network_id != target {
                warn!(
                    descriptor = %descriptor.app_descriptor_id,
                    from = %descriptor.network_id,
                    to = %target,
                    "Rebinding app descriptor"
                );
                descriptor.network_id = target.clone();
                stats.rebound += 1;
            }
            let id = descriptor.app_descriptor_id.clone();
            replace(&*self.providers.app_descriptors, descriptor)?;
            if !networks.exists_app_descriptor(&target, &id) {
                networks.attach_app_descriptor(&target, &id)?;
            }
            stats.app_descriptors += 1;
        }
        Ok(())
    }

    fn import_users(&self, users: &[UserBackup], written: &mut usize) -> CoreResult<()> {
        let p = &self.providers;
        for entry in users {
            WriteSaga::new("import user")
                .step("user", || replace(&*p.users, entry.user.clone()))
                .step("access", || replace(&*p.access, entry.access.clone()))
                .step("password", || replace(&*p.passwords, entry.password.clone()))
                .run()?;
            *written += 1;
        }
        Ok(())
    }
}

fn import_each<T, P>(provider: &P, values: &[T], written: &mut usize) -> CoreResult<()>
where
    T: Entity,
    P: EntityProvider<T> + ?Sized,
{
    for value in values {
        replace(provider, value.clone())?;
        *written += 1;
    }
    Ok(())
}

/// Substitutes a placeholder for a missing join target.
fn or_placeholder<T>(result: StorageResult<T>, placeholder: impl FnOnce() -> T) -> CoreResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_not_found() => Ok(placeholder()),
        Err(e) => Err(e.into()),
    }
}
