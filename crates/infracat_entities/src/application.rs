//! Application descriptors and deployed instances.

use crate::Entity;
use serde::{Deserialize, Serialize};

/// Describes an application that can be deployed on a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDescriptor {
    /// Network the descriptor is registered in.
    pub network_id: String,
    /// Unique descriptor identifier.
    pub app_descriptor_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Name of the service exposed by the application.
    #[serde(default)]
    pub service_name: String,
    /// Version of the service.
    #[serde(default)]
    pub service_version: String,
    /// Scheduling label.
    #[serde(default)]
    pub label: String,
    /// Exposed port.
    #[serde(default)]
    pub port: u16,
    /// Number of replicas requested.
    #[serde(default)]
    pub replicas: u32,
    /// Container images required by the application.
    #[serde(default)]
    pub images: Vec<String>,
}

impl AppDescriptor {
    /// Creates a descriptor with no service metadata.
    pub fn new(
        network_id: impl Into<String>,
        app_descriptor_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            network_id: network_id.into(),
            app_descriptor_id: app_descriptor_id.into(),
            name: name.into(),
            description: String::new(),
            service_name: String::new(),
            service_version: String::new(),
            label: String::new(),
            port: 0,
            replicas: 1,
            images: Vec::new(),
        }
    }

    /// Sets the service name, version and port.
    #[must_use]
    pub fn with_service(
        mut self,
        service_name: impl Into<String>,
        service_version: impl Into<String>,
        port: u16,
    ) -> Self {
        self.service_name = service_name.into();
        self.service_version = service_version.into();
        self.port = port;
        self
    }

    /// Adds a required image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.images.push(image.into());
        self
    }
}

impl Entity for AppDescriptor {
    const KIND: &'static str = "app descriptor";
    const FAMILY: &'static str = "appdesc";

    fn id(&self) -> &str {
        &self.app_descriptor_id
    }
}

/// Status of a deployed application instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppStatus {
    /// Deployment requested.
    #[default]
    Init,
    /// Running and healthy.
    Ready,
    /// Running but not healthy.
    NotReady,
    /// Deployment failed.
    Error,
}

/// A deployed instance of an [`AppDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInstance {
    /// Network the instance runs in.
    pub network_id: String,
    /// Unique deployment identifier.
    pub deployed_id: String,
    /// Descriptor the instance was created from.
    pub app_descriptor_id: String,
    /// Cluster the instance was scheduled on, once known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Scheduling label.
    #[serde(default)]
    pub label: String,
    /// Launch arguments.
    #[serde(default)]
    pub arguments: String,
    /// Deployment status.
    #[serde(default)]
    pub status: AppStatus,
    /// Requested persistent storage, e.g. `"10Gi"`.
    #[serde(default)]
    pub persistence_size: String,
    /// Storage class, e.g. `"ssd"`.
    #[serde(default)]
    pub storage_type: String,
    /// Exposed port.
    #[serde(default)]
    pub port: u16,
    /// Address the instance is reachable at.
    #[serde(default)]
    pub ip: String,
}

impl AppInstance {
    /// Creates an instance in the `init` status, not yet bound to a cluster.
    pub fn new(
        network_id: impl Into<String>,
        deployed_id: impl Into<String>,
        app_descriptor_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            network_id: network_id.into(),
            deployed_id: deployed_id.into(),
            app_descriptor_id: app_descriptor_id.into(),
            cluster_id: None,
            name: name.into(),
            description: String::new(),
            label: String::new(),
            arguments: String::new(),
            status: AppStatus::Init,
            persistence_size: String::new(),
            storage_type: String::new(),
            port: 0,
            ip: String::new(),
        }
    }

    /// Binds the instance to a cluster.
    #[must_use]
    pub fn on_cluster(mut self, cluster_id: impl Into<String>) -> Self {
        self.cluster_id = Some(cluster_id.into());
        self
    }

    /// Sets the storage requirements.
    #[must_use]
    pub fn with_storage(
        mut self,
        persistence_size: impl Into<String>,
        storage_type: impl Into<String>,
    ) -> Self {
        self.persistence_size = persistence_size.into();
        self.storage_type = storage_type.into();
        self
    }
}

impl Entity for AppInstance {
    const KIND: &'static str = "app instance";
    const FAMILY: &'static str = "appinst";

    fn id(&self) -> &str {
        &self.deployed_id
    }
}
