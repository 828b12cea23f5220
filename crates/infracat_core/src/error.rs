//! Error types for infracat core.

use crate::saga::SagaFailure;
use infracat_entities::ClusterStatus;
use infracat_storage::{ErrorKind, StorageError};
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in catalog and backup operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage provider error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A multi-provider sequence could not be completed.
    #[error("operation failed: {message}")]
    OperationFailed {
        /// Description of the failure.
        message: String,
    },

    /// A write saga stopped part way.
    #[error(transparent)]
    Saga(#[from] SagaFailure),

    /// Unrecognized backup component selector.
    #[error("unknown backup component: {name}")]
    UnknownComponent {
        /// The rejected selector.
        name: String,
    },

    /// The cluster status state machine does not allow the move.
    #[error("cluster {cluster_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The cluster.
        cluster_id: String,
        /// Current status.
        from: ClusterStatus,
        /// Requested status.
        to: ClusterStatus,
    },

    /// The configuration cannot be used.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// A backup snapshot could not be encoded or decoded.
    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates an operation failed error.
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    /// Creates an unknown component error.
    pub fn unknown_component(name: impl Into<String>) -> Self {
        Self::UnknownComponent { name: name.into() }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns the storage error kind behind this error, if any.
    ///
    /// Looks through saga failures to the step's own error.
    #[must_use]
    pub fn storage_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Storage(e) => Some(e.kind()),
            Self::Saga(failure) => Some(failure.source.kind()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_convert() {
        let err: CoreError = StorageError::not_found("network", "n1").into();
        assert_eq!(err.storage_kind(), Some(ErrorKind::NotFound));
        assert_eq!(err.to_string(), "storage error: network not found: n1");
    }

    #[test]
    fn helpers_build_messages() {
        assert_eq!(
            CoreError::operation_failed("partial list").to_string(),
            "operation failed: partial list"
        );
        assert_eq!(
            CoreError::unknown_component("widgets").to_string(),
            "unknown backup component: widgets"
        );
        assert!(CoreError::invalid_config("x").storage_kind().is_none());
    }

    #[test]
    fn transition_message_uses_status_names() {
        let err = CoreError::InvalidTransition {
            cluster_id: "c1".into(),
            from: ClusterStatus::Created,
            to: ClusterStatus::Installed,
        };
        assert_eq!(err.to_string(), "cluster c1 cannot move from created to installed");
    }
}
