//! Error types for storage operations.

use crate::relation::Relation;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The identifier is not stored.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind.
        kind: &'static str,
        /// The missing identifier.
        id: String,
    },

    /// The identifier is already stored.
    #[error("{kind} already exists: {id}")]
    AlreadyExists {
        /// Entity kind.
        kind: &'static str,
        /// The duplicated identifier.
        id: String,
    },

    /// The relation between parent and child is already recorded.
    #[error("{child} is already attached to {parent} ({relation})")]
    AlreadyAttached {
        /// The relation.
        relation: Relation,
        /// Parent identifier.
        parent: String,
        /// Child identifier.
        child: String,
    },

    /// The relation between parent and child is not recorded.
    #[error("{child} is not attached to {parent} ({relation})")]
    NotAttached {
        /// The relation.
        relation: Relation,
        /// Parent identifier.
        parent: String,
        /// Child identifier.
        child: String,
    },

    /// The parent of a relation is unknown to this provider.
    #[error("{kind} does not exist: {id}")]
    ParentDoesNotExist {
        /// Parent entity kind.
        kind: &'static str,
        /// The missing parent identifier.
        id: String,
    },

    /// The provider does not index the requested relation.
    #[error("{kind} storage does not index {relation}")]
    UnsupportedRelation {
        /// Entity kind of the provider.
        kind: &'static str,
        /// The requested relation.
        relation: Relation,
    },

    /// The identifier cannot be stored.
    #[error("invalid identifier {id:?}: {reason}")]
    InvalidId {
        /// The rejected identifier.
        id: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An I/O error occurred.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// An entity could not be encoded.
    #[error("cannot marshal {kind} {id}: {source}")]
    Marshal {
        /// Entity kind.
        kind: &'static str,
        /// Entity identifier.
        id: String,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A stored entity could not be decoded.
    #[error("cannot unmarshal {}: {source}", .path.display())]
    Unmarshal {
        /// The file that failed to decode.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Flat classification of [`StorageError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`StorageError::NotFound`].
    NotFound,
    /// See [`StorageError::AlreadyExists`].
    AlreadyExists,
    /// See [`StorageError::AlreadyAttached`].
    AlreadyAttached,
    /// See [`StorageError::NotAttached`].
    NotAttached,
    /// See [`StorageError::ParentDoesNotExist`].
    ParentDoesNotExist,
    /// See [`StorageError::UnsupportedRelation`].
    UnsupportedRelation,
    /// See [`StorageError::InvalidId`].
    InvalidId,
    /// See [`StorageError::Io`].
    Io,
    /// See [`StorageError::Marshal`].
    Marshal,
    /// See [`StorageError::Unmarshal`].
    Unmarshal,
}

impl StorageError {
    /// Creates a not found error.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Creates an already exists error.
    pub fn already_exists(kind: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.into(),
        }
    }

    /// Creates a parent does not exist error.
    pub fn parent_does_not_exist(kind: &'static str, id: impl Into<String>) -> Self {
        Self::ParentDoesNotExist {
            kind,
            id: id.into(),
        }
    }

    /// Creates an invalid identifier error.
    pub fn invalid_id(id: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidId {
            id: id.into(),
            reason,
        }
    }

    /// Creates a not attached error.
    pub fn not_attached(
        relation: Relation,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self::NotAttached {
            relation,
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Creates an I/O error with path context.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates an unmarshal error with path context.
    pub fn unmarshal(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Unmarshal {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::AlreadyAttached { .. } => ErrorKind::AlreadyAttached,
            Self::NotAttached { .. } => ErrorKind::NotAttached,
            Self::ParentDoesNotExist { .. } => ErrorKind::ParentDoesNotExist,
            Self::UnsupportedRelation { .. } => ErrorKind::UnsupportedRelation,
            Self::InvalidId { .. } => ErrorKind::InvalidId,
            Self::Io { .. } => ErrorKind::Io,
            Self::Marshal { .. } => ErrorKind::Marshal,
            Self::Unmarshal { .. } => ErrorKind::Unmarshal,
        }
    }

    /// Returns true for [`ErrorKind::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
