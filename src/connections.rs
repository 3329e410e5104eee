//! Connection-setting defaults and builder configuration
//!
//! When an output binding is declared without an explicit connection-setting
//! name, the builder asks [`ConnectionNameDefaults`] for the default of the
//! binding's family.

use crate::error::OutbindError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Destination families sharing a connection setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingFamily {
    /// Service-bus style queues and topics
    MessageQueue,
    /// Blob, storage queue and table storage
    Storage,
    /// Document database
    DocumentStore,
    /// Pub/sub hubs (messages and group actions)
    PubSub,
}

/// Default connection-setting names, one per family
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConnectionNameDefaults {
    #[serde(default = "default_message_queue")]
    pub message_queue: String,
    #[serde(default = "default_storage")]
    pub storage: String,
    #[serde(default = "default_document_store")]
    pub document_store: String,
    #[serde(default = "default_pub_sub")]
    pub pub_sub: String,
}

fn default_message_queue() -> String {
    "serviceBusConnectionString".to_string()
}

fn default_storage() -> String {
    "storageConnectionString".to_string()
}

fn default_document_store() -> String {
    "cosmosConnectionString".to_string()
}

fn default_pub_sub() -> String {
    "signalRConnectionString".to_string()
}

impl Default for ConnectionNameDefaults {
    fn default() -> Self {
        Self {
            message_queue: default_message_queue(),
            storage: default_storage(),
            document_store: default_document_store(),
            pub_sub: default_pub_sub(),
        }
    }
}

impl ConnectionNameDefaults {
    /// Default connection-setting name for a binding family
    pub fn resolve(&self, family: BindingFamily) -> &str {
        match family {
            BindingFamily::MessageQueue => &self.message_queue,
            BindingFamily::Storage => &self.storage,
            BindingFamily::DocumentStore => &self.document_store,
            BindingFamily::PubSub => &self.pub_sub,
        }
    }
}

/// Platform type names stamped on pub/sub descriptors.
///
/// Injected so the core carries no dependency on a messaging SDK's naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PubSubTypeNames {
    #[serde(default = "default_message_type")]
    pub message: String,
    #[serde(default = "default_group_action_type")]
    pub group_action: String,
}

fn default_message_type() -> String {
    "Microsoft.Azure.WebJobs.Extensions.SignalRService.SignalRMessage".to_string()
}

fn default_group_action_type() -> String {
    "Microsoft.Azure.WebJobs.Extensions.SignalRService.SignalRGroupAction".to_string()
}

impl Default for PubSubTypeNames {
    fn default() -> Self {
        Self {
            message: default_message_type(),
            group_action: default_group_action_type(),
        }
    }
}

/// Everything the output-binding builder needs injected
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BindingConfig {
    #[serde(default)]
    pub connections: ConnectionNameDefaults,
    #[serde(default)]
    pub pub_sub_type_names: PubSubTypeNames,
}

impl BindingConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, OutbindError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, OutbindError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }
}
