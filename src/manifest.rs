//! Binding manifests
//!
//! A YAML document listing functions and their output declarations. Each output
//! entry names exactly one binding kind and unknown keys are rejected. Applying
//! a manifest runs every declaration through [`OutputBindingBuilder`], so a
//! manifest is valid exactly when the equivalent builder chain succeeds.

use crate::bindings::FileAccess;
use crate::builders::{FunctionBuilder, OutputBindingBuilder};
use crate::connections::BindingConfig;
use crate::definition::FunctionDefinition;
use crate::error::{ConfigurationError, OutbindError};
use crate::types::TypeRef;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

/// A type given either by bare name or as a full description
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Name(String),
    Full(TypeRef),
}

impl From<TypeSpec> for TypeRef {
    fn from(spec: TypeSpec) -> Self {
        match spec {
            TypeSpec::Name(name) => TypeRef::new(name),
            TypeSpec::Full(ty) => ty,
        }
    }
}

/// Named target (queue, topic, storage queue, table)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDecl {
    pub name: String,
    #[serde(default)]
    pub connection: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HubDecl {
    pub hub: String,
    #[serde(default)]
    pub connection: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlobDecl {
    pub name: String,
    #[serde(default, rename = "fileAccess")]
    pub file_access: FileAccess,
    #[serde(default)]
    pub connection: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentDecl {
    pub collection: String,
    pub database: String,
    #[serde(default)]
    pub connection: Option<String>,
}

/// One output declaration; exactly one key picks the binding kind
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputDecl {
    Queue(TargetDecl),
    Topic(TargetDecl),
    PubSubMessage(HubDecl),
    PubSubGroupAction(HubDecl),
    Blob(BlobDecl),
    QueueStore(TargetDecl),
    TableStore(TargetDecl),
    DocumentStore(DocumentDecl),
}

impl OutputDecl {
    /// Apply this declaration to `definition`
    pub fn apply(
        &self,
        config: &BindingConfig,
        definition: &mut FunctionDefinition,
    ) -> Result<(), ConfigurationError> {
        let builder = OutputBindingBuilder::new(config, definition);
        let applied = match self {
            OutputDecl::Queue(queue) => match &queue.connection {
                Some(conn) => builder.queue_with_connection(conn, &queue.name),
                None => builder.queue(&queue.name),
            },
            OutputDecl::Topic(topic) => match &topic.connection {
                Some(conn) => builder.topic_with_connection(conn, &topic.name),
                None => builder.topic(&topic.name),
            },
            OutputDecl::PubSubMessage(hub) => match &hub.connection {
                Some(conn) => builder.pub_sub_message_with_connection(conn, &hub.hub),
                None => builder.pub_sub_message(&hub.hub),
            },
            OutputDecl::PubSubGroupAction(hub) => match &hub.connection {
                Some(conn) => builder.pub_sub_group_action_with_connection(conn, &hub.hub),
                None => builder.pub_sub_group_action(&hub.hub),
            },
            OutputDecl::Blob(blob) => match &blob.connection {
                Some(conn) => builder.blob_with_connection(conn, &blob.name, blob.file_access),
                None => builder.blob_with_access(&blob.name, blob.file_access),
            },
            OutputDecl::QueueStore(queue_store) => match &queue_store.connection {
                Some(conn) => builder.queue_store_with_connection(conn, &queue_store.name),
                None => builder.queue_store(&queue_store.name),
            },
            OutputDecl::TableStore(table_store) => match &table_store.connection {
                Some(conn) => builder.table_store_with_connection(conn, &table_store.name),
                None => builder.table_store(&table_store.name),
            },
            OutputDecl::DocumentStore(doc) => match &doc.connection {
                Some(conn) => {
                    builder.document_store_with_connection(conn, &doc.collection, &doc.database)
                }
                None => builder.document_store(&doc.collection, &doc.database),
            },
        };
        applied.map(|_| ())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FunctionDecl {
    pub command: TypeSpec,
    #[serde(default)]
    pub result: Option<TypeSpec>,
    #[serde(default)]
    pub result_item: Option<TypeSpec>,
    #[serde(default)]
    pub outputs: Vec<OutputDecl>,
}

/// Top-level manifest document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub config: BindingConfig,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
}

impl Manifest {
    pub fn from_yaml(yaml: &str) -> Result<Self, OutbindError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, OutbindError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Build every function, stopping at the first configuration error
    #[instrument(skip(self), fields(functions = self.functions.len()))]
    pub fn apply(&self) -> Result<Vec<FunctionDefinition>, OutbindError> {
        self.functions
            .iter()
            .map(|decl| self.apply_function(decl))
            .collect()
    }

    fn apply_function(&self, decl: &FunctionDecl) -> Result<FunctionDefinition, OutbindError> {
        let mut builder = FunctionBuilder::new(&self.config, decl.command.clone());
        if let Some(result) = &decl.result {
            builder = builder.result(result.clone());
        }
        if let Some(item) = &decl.result_item {
            builder = builder.result_item(item.clone());
        }
        let mut definition = builder.build();

        for output in &decl.outputs {
            output
                .apply(&self.config, &mut definition)
                .map_err(|source| OutbindError::Configuration {
                    function: definition.command_name().to_string(),
                    source,
                })?;
        }

        debug!(
            command = definition.command_name(),
            binding = %definition.output_binding,
            "function configured"
        );
        Ok(definition)
    }
}
