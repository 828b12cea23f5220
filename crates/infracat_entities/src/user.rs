//! User, access and password records.
//!
//! These are owned by the authentication subsystem. The catalog only needs
//! them so the backup manager can carry users along with the infrastructure
//! they manage.

use crate::Entity;
use serde::{Deserialize, Serialize};

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique username.
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
}

impl User {
    /// Creates a user record.
    pub fn new(
        username: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl Entity for User {
    const KIND: &'static str = "user";
    const FAMILY: &'static str = "users";

    fn id(&self) -> &str {
        &self.username
    }
}

/// Role granted to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessRole {
    /// Full control over every network.
    GlobalAdmin,
    /// Operates infrastructure.
    Operator,
    /// Deploys applications.
    Developer,
    /// System account used by platform components.
    Internal,
}

/// Roles granted to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccess {
    /// Username the roles belong to.
    pub username: String,
    /// Granted roles.
    #[serde(default)]
    pub roles: Vec<AccessRole>,
}

impl UserAccess {
    /// Creates an access record.
    pub fn new(username: impl Into<String>, roles: Vec<AccessRole>) -> Self {
        Self {
            username: username.into(),
            roles,
        }
    }

    /// An access record with no roles, used when a user has none stored.
    pub fn placeholder(username: impl Into<String>) -> Self {
        Self::new(username, Vec::new())
    }

    /// Returns true if the record belongs to a system account.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.roles.contains(&AccessRole::Internal)
    }
}

impl Entity for UserAccess {
    const KIND: &'static str = "user access";
    const FAMILY: &'static str = "access";

    fn id(&self) -> &str {
        &self.username
    }
}

/// Stored password of a user. The secret is opaque (normally a hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Password {
    /// Username the password belongs to.
    pub username: String,
    /// Opaque secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Password {
    /// Creates a password record.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Some(password.into()),
        }
    }

    /// A password record with no secret, used when a user has none stored.
    pub fn placeholder(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: None,
        }
    }
}

impl Entity for Password {
    const KIND: &'static str = "password";
    const FAMILY: &'static str = "passwords";

    fn id(&self) -> &str {
        &self.username
    }
}
