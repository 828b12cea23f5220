//! Catalog configuration.

use crate::backup::BackupConfig;
use std::path::{Path, PathBuf};

/// Persistence medium used by every provider of a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Values kept in memory and lost on drop.
    #[default]
    Memory,
    /// One JSON file per entity under a base directory.
    File,
}

/// Configuration for building a provider bundle.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Which backend every provider uses.
    pub backend: BackendKind,

    /// Base directory of the file backend.
    pub base_path: Option<PathBuf>,

    /// Export and import behavior.
    pub backup: BackupConfig,
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration for a file-backed catalog under `base`.
    #[must_use]
    pub fn file(base: impl Into<PathBuf>) -> Self {
        Self::new().backend(BackendKind::File).base_path(base)
    }

    /// Sets the backend.
    #[must_use]
    pub const fn backend(mut self, kind: BackendKind) -> Self {
        self.backend = kind;
        self
    }

    /// Sets the base directory of the file backend.
    #[must_use]
    pub fn base_path(mut self, base: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base.into());
        self
    }

    /// Sets the backup configuration.
    #[must_use]
    pub const fn backup(mut self, backup: BackupConfig) -> Self {
        self.backup = backup;
        self
    }

    /// Returns the base directory, if one is set.
    #[must_use]
    pub fn base(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.backend, BackendKind::Memory);
        assert!(config.base().is_none());
        assert!(config.backup.exclude_internal_users);
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .backend(BackendKind::File)
            .base_path("/var/lib/infracat")
            .backup(BackupConfig::new().exclude_internal_users(false));

        assert_eq!(config.backend, BackendKind::File);
        assert_eq!(config.base(), Some(Path::new("/var/lib/infracat")));
        assert!(!config.backup.exclude_internal_users);
    }

    #[test]
    fn file_shortcut() {
        let config = Config::file("data");
        assert_eq!(config.backend, BackendKind::File);
        assert_eq!(config.base(), Some(Path::new("data")));
    }
}
