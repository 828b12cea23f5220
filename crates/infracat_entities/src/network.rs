//! Network entity.

use crate::Entity;
use serde::{Deserialize, Serialize};

/// A network groups clusters, application descriptors and application
/// instances under one administrative owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Unique network identifier.
    pub network_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Name of the network administrator.
    #[serde(default)]
    pub admin_name: String,
    /// Phone number of the network administrator.
    #[serde(default)]
    pub admin_phone: String,
    /// Email of the network administrator.
    #[serde(default)]
    pub admin_email: String,
    /// Correlation id in an external provisioning system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edgenet_id: Option<String>,
}

impl Network {
    /// Creates a network with the given identifier and name.
    pub fn new(network_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            network_id: network_id.into(),
            name: name.into(),
            description: String::new(),
            admin_name: String::new(),
            admin_phone: String::new(),
            admin_email: String::new(),
            edgenet_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the administrator contact fields.
    #[must_use]
    pub fn with_admin(
        mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.admin_name = name.into();
        self.admin_phone = phone.into();
        self.admin_email = email.into();
        self
    }
}

impl Entity for Network {
    const KIND: &'static str = "network";
    const FAMILY: &'static str = "networks";

    fn id(&self) -> &str {
        &self.network_id
    }
}
