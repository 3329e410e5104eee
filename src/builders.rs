//! Builder patterns for function and output-binding configuration
//!
//! Provides fluent APIs for declaring where a command handler's result goes.
//! Every output-binding method consumes the builder and hands back the parent
//! so configuration reads as one chain.

use crate::bindings::{
    BindingSlot, BlobOutput, BlobTarget, DocumentStoreOutput, FileAccess, OutputBinding,
    PubSubOutput, QueueOutput, QueueStoreOutput, TableStoreOutput, TopicOutput,
};
use crate::connections::{BindingConfig, BindingFamily};
use crate::definition::FunctionDefinition;
use crate::error::ConfigurationError;
use crate::types::{Capability, TypeRef};
use tracing::{debug, warn};

// ============================================================================
// BINDING HOST
// ============================================================================

/// Anything that owns (or borrows) the function definition being configured.
///
/// The output-binding builder returns its host when a call succeeds, which is
/// how the fluent chain continues.
pub trait BindingHost {
    fn function_definition(&mut self) -> &mut FunctionDefinition;
}

impl BindingHost for FunctionDefinition {
    fn function_definition(&mut self) -> &mut FunctionDefinition {
        self
    }
}

impl BindingHost for &mut FunctionDefinition {
    fn function_definition(&mut self) -> &mut FunctionDefinition {
        &mut **self
    }
}

// ============================================================================
// FUNCTION BUILDER
// ============================================================================

/// Fluent builder for one command function
pub struct FunctionBuilder<'c> {
    config: &'c BindingConfig,
    definition: FunctionDefinition,
}

impl<'c> FunctionBuilder<'c> {
    /// Start a function for `command`
    pub fn new(config: &'c BindingConfig, command: impl Into<TypeRef>) -> Self {
        Self {
            config,
            definition: FunctionDefinition::new(command),
        }
    }

    /// Set the handler's result type
    pub fn result(mut self, result: impl Into<TypeRef>) -> Self {
        self.definition.command_result_type = Some(result.into());
        self
    }

    /// Set the element type of a collection result
    pub fn result_item(mut self, item: impl Into<TypeRef>) -> Self {
        self.definition.command_result_item_type = Some(item.into());
        self
    }

    /// Configure the output binding
    pub fn output_binding(self) -> OutputBindingBuilder<'c, Self> {
        let config = self.config;
        OutputBindingBuilder::new(config, self)
    }

    /// Finish the function
    pub fn build(self) -> FunctionDefinition {
        self.definition
    }
}

impl BindingHost for FunctionBuilder<'_> {
    fn function_definition(&mut self) -> &mut FunctionDefinition {
        &mut self.definition
    }
}

// ============================================================================
// OUTPUT BINDING BUILDER
// ============================================================================

/// Attaches an output binding to the host's function definition.
///
/// Methods without a connection argument resolve the family default from
/// [`BindingConfig::connections`]. All bindings except blob are exclusive.
pub struct OutputBindingBuilder<'c, P> {
    config: &'c BindingConfig,
    parent: P,
}

impl<'c, P: BindingHost> OutputBindingBuilder<'c, P> {
    pub fn new(config: &'c BindingConfig, parent: P) -> Self {
        Self { config, parent }
    }

    fn default_connection(&self, family: BindingFamily) -> String {
        self.config.connections.resolve(family).to_string()
    }

    /// Service-bus queue, default message-queue connection
    pub fn queue(self, queue_name: impl Into<String>) -> Result<P, ConfigurationError> {
        let connection = self.default_connection(BindingFamily::MessageQueue);
        self.queue_with_connection(connection, queue_name)
    }

    pub fn queue_with_connection(
        self,
        connection_setting: impl Into<String>,
        queue_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let connection_setting = connection_setting.into();
        let queue_name = queue_name.into();
        self.bind_single(|_, item_type_name| {
            Ok(OutputBinding::Queue(QueueOutput {
                item_type_name,
                connection_setting,
                queue_name,
            }))
        })
    }

    /// Service-bus topic, default message-queue connection
    pub fn topic(self, topic_name: impl Into<String>) -> Result<P, ConfigurationError> {
        let connection = self.default_connection(BindingFamily::MessageQueue);
        self.topic_with_connection(connection, topic_name)
    }

    pub fn topic_with_connection(
        self,
        connection_setting: impl Into<String>,
        topic_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let connection_setting = connection_setting.into();
        let topic_name = topic_name.into();
        self.bind_single(|_, item_type_name| {
            Ok(OutputBinding::Topic(TopicOutput {
                item_type_name,
                connection_setting,
                topic_name,
            }))
        })
    }

    /// Pub/sub hub message; the result item must be a pub/sub message
    pub fn pub_sub_message(self, hub_name: impl Into<String>) -> Result<P, ConfigurationError> {
        let connection = self.default_connection(BindingFamily::PubSub);
        self.pub_sub_message_with_connection(connection, hub_name)
    }

    pub fn pub_sub_message_with_connection(
        self,
        connection_setting: impl Into<String>,
        hub_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let output_type_name = self.config.pub_sub_type_names.message.clone();
        let connection_setting = connection_setting.into();
        let hub_name = hub_name.into();
        self.bind_single(|definition, item_type_name| {
            require_capability(definition, Capability::PubSubMessage)?;
            Ok(OutputBinding::PubSubMessage(PubSubOutput {
                item_type_name,
                connection_setting,
                hub_name,
                output_type_name,
            }))
        })
    }

    /// Pub/sub group action; the result item must be a group action
    pub fn pub_sub_group_action(
        self,
        hub_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let connection = self.default_connection(BindingFamily::PubSub);
        self.pub_sub_group_action_with_connection(connection, hub_name)
    }

    pub fn pub_sub_group_action_with_connection(
        self,
        connection_setting: impl Into<String>,
        hub_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let output_type_name = self.config.pub_sub_type_names.group_action.clone();
        let connection_setting = connection_setting.into();
        let hub_name = hub_name.into();
        self.bind_single(|definition, item_type_name| {
            require_capability(definition, Capability::PubSubGroupAction)?;
            Ok(OutputBinding::PubSubGroupAction(PubSubOutput {
                item_type_name,
                connection_setting,
                hub_name,
                output_type_name,
            }))
        })
    }

    /// Writable blob, default storage connection
    pub fn blob(self, name: impl Into<String>) -> Result<P, ConfigurationError> {
        self.blob_with_access(name, FileAccess::Write)
    }

    pub fn blob_with_access(
        self,
        name: impl Into<String>,
        file_access: FileAccess,
    ) -> Result<P, ConfigurationError> {
        let connection = self.default_connection(BindingFamily::Storage);
        self.blob_with_connection(connection, name, file_access)
    }

    /// Blob output. Repeated calls append named outputs; a result type is
    /// not required.
    pub fn blob_with_connection(
        mut self,
        connection_setting: impl Into<String>,
        name: impl Into<String>,
        file_access: FileAccess,
    ) -> Result<P, ConfigurationError> {
        let definition = self.parent.function_definition();
        let command = definition.command_name().to_string();
        let item_type_name = definition.result_item_type_name().map(str::to_string);

        if definition.output_binding.is_empty() {
            definition.output_binding = BindingSlot::Blob(BlobOutput::new(item_type_name.clone()));
        }

        match &mut definition.output_binding {
            BindingSlot::Blob(blob) => {
                let target = BlobTarget {
                    item_type_name,
                    connection_setting: connection_setting.into(),
                    name: name.into(),
                    file_access,
                };
                debug!(
                    command = %command,
                    name = %target.name,
                    access = ?target.file_access,
                    outputs = blob.outputs.len() + 1,
                    "blob output added"
                );
                blob.outputs.push(target);
            }
            _ => {
                warn!(command = %command, "output binding already set");
                return Err(ConfigurationError::BindingAlreadySet { command });
            }
        }

        Ok(self.parent)
    }

    /// Storage queue, default storage connection
    pub fn queue_store(self, queue_name: impl Into<String>) -> Result<P, ConfigurationError> {
        let connection = self.default_connection(BindingFamily::Storage);
        self.queue_store_with_connection(connection, queue_name)
    }

    pub fn queue_store_with_connection(
        self,
        connection_setting: impl Into<String>,
        queue_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let connection_setting = connection_setting.into();
        let queue_name = queue_name.into();
        self.bind_single(|_, item_type_name| {
            Ok(OutputBinding::QueueStore(QueueStoreOutput {
                item_type_name,
                connection_setting,
                queue_name,
            }))
        })
    }

    /// Table storage, default storage connection
    pub fn table_store(self, table_name: impl Into<String>) -> Result<P, ConfigurationError> {
        let connection = self.default_connection(BindingFamily::Storage);
        self.table_store_with_connection(connection, table_name)
    }

    pub fn table_store_with_connection(
        self,
        connection_setting: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let connection_setting = connection_setting.into();
        let table_name = table_name.into();
        self.bind_single(|_, item_type_name| {
            Ok(OutputBinding::TableStore(TableStoreOutput {
                item_type_name,
                connection_setting,
                table_name,
            }))
        })
    }

    /// Document collection, default document-store connection
    pub fn document_store(
        self,
        collection_name: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let connection = self.default_connection(BindingFamily::DocumentStore);
        self.document_store_with_connection(connection, collection_name, database_name)
    }

    /// A sequence result becomes a batched collector, anything else a single
    /// write.
    pub fn document_store_with_connection(
        self,
        connection_setting: impl Into<String>,
        collection_name: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Result<P, ConfigurationError> {
        let connection_setting = connection_setting.into();
        let collection_name = collection_name.into();
        let database_name = database_name.into();
        self.bind_single(|definition, item_type_name| {
            let is_collection = definition
                .command_result_type
                .as_ref()
                .is_some_and(|result| result.satisfies(Capability::Sequence));
            Ok(OutputBinding::DocumentStore(DocumentStoreOutput {
                item_type_name,
                connection_setting,
                collection_name,
                database_name,
                is_collection,
            }))
        })
    }

    fn bind_single<F>(mut self, build: F) -> Result<P, ConfigurationError>
    where
        F: FnOnce(&FunctionDefinition, String) -> Result<OutputBinding, ConfigurationError>,
    {
        let definition = self.parent.function_definition();
        let item_type_name = verify_output_binding(definition)?;
        let binding = build(definition, item_type_name)?;

        debug!(
            command = %definition.command_type,
            kind = binding.kind(),
            connection = binding.connection_setting(),
            "output binding set"
        );
        definition.output_binding = BindingSlot::Single(binding);

        Ok(self.parent)
    }
}

/// The slot must be empty and the command must produce a result.
///
/// Returns the item type name the binding will carry.
fn verify_output_binding(definition: &FunctionDefinition) -> Result<String, ConfigurationError> {
    let command = definition.command_name();

    if !definition.output_binding.is_empty() {
        warn!(command, existing = %definition.output_binding, "output binding already set");
        return Err(ConfigurationError::BindingAlreadySet {
            command: command.to_string(),
        });
    }

    match definition.result_item_type_name() {
        Some(name) if definition.command_has_result() => Ok(name.to_string()),
        _ => {
            warn!(command, "output binding requires a command result");
            Err(ConfigurationError::ResultRequired {
                command: command.to_string(),
            })
        }
    }
}

fn require_capability(
    definition: &FunctionDefinition,
    capability: Capability,
) -> Result<(), ConfigurationError> {
    match definition.result_item_type() {
        Some(item) if item.satisfies(capability) => Ok(()),
        item => {
            let result = item.map(|t| t.name.clone()).unwrap_or_default();
            warn!(command = definition.command_name(), %capability, %result, "missing capability");
            Err(ConfigurationError::MissingCapability {
                command: definition.command_name().to_string(),
                result,
                capability,
            })
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BindingConfig {
        BindingConfig::default()
    }

    fn with_result() -> FunctionDefinition {
        FunctionDefinition::new("PlaceOrder").with_result("OrderConfirmation")
    }

    #[test]
    fn test_queue_sets_single_binding() {
        let config = config();
        let def = OutputBindingBuilder::new(&config, with_result())
            .queue("orders")
            .unwrap();

        match def.output_binding.single() {
            Some(OutputBinding::Queue(q)) => {
                assert_eq!(q.queue_name, "orders");
                assert_eq!(q.item_type_name, "OrderConfirmation");
                assert_eq!(q.connection_setting, "serviceBusConnectionString");
            }
            other => panic!("Expected Queue binding, got {other:?}"),
        }
    }

    #[test]
    fn test_second_binding_rejected_and_first_kept() {
        let config = config();
        let mut def = with_result();

        OutputBindingBuilder::new(&config, &mut def)
            .topic("events")
            .unwrap();
        let err = OutputBindingBuilder::new(&config, &mut def)
            .table_store("audit")
            .unwrap_err();

        assert!(matches!(
            err,
            ConfigurationError::BindingAlreadySet { ref command } if command == "PlaceOrder"
        ));
        assert!(matches!(def.output_binding.single(), Some(OutputBinding::Topic(_))));
    }

    #[test]
    fn test_result_required() {
        let config = config();
        let mut def = FunctionDefinition::new("DeleteOrder");

        let err = OutputBindingBuilder::new(&config, &mut def)
            .queue_store("deleted")
            .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::ResultRequired {
                command: "DeleteOrder".into()
            }
        );
        assert!(def.output_binding.is_empty());
    }

    #[test]
    fn test_blob_accumulates_without_result() {
        let config = config();
        let mut def = FunctionDefinition::new("Archive");

        OutputBindingBuilder::new(&config, &mut def)
            .blob("archive/{id}.json")
            .unwrap();
        OutputBindingBuilder::new(&config, &mut def)
            .blob_with_connection("coldStorage", "cold/{id}", FileAccess::ReadWrite)
            .unwrap();

        let blob = def.output_binding.blob().unwrap();
        assert_eq!(blob.item_type_name, None);
        let names: Vec<_> = blob.outputs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["archive/{id}.json", "cold/{id}"]);
        assert_eq!(blob.outputs[0].connection_setting, "storageConnectionString");
        assert_eq!(blob.outputs[0].file_access, FileAccess::Write);
        assert_eq!(blob.outputs[1].file_access, FileAccess::ReadWrite);
    }

    #[test]
    fn test_blob_after_single_rejected() {
        let config = config();
        let mut def = with_result();

        OutputBindingBuilder::new(&config, &mut def)
            .queue("orders")
            .unwrap();
        let err = OutputBindingBuilder::new(&config, &mut def)
            .blob("orders/{id}")
            .unwrap_err();

        assert!(matches!(err, ConfigurationError::BindingAlreadySet { .. }));
        assert!(matches!(def.output_binding.single(), Some(OutputBinding::Queue(_))));
    }

    #[test]
    fn test_function_builder_chain() {
        let config = config();
        let def = FunctionBuilder::new(&config, "PlaceOrder")
            .result("OrderConfirmation")
            .output_binding()
            .document_store("orders", "shopdb")
            .unwrap()
            .build();

        assert_eq!(def.command_name(), "PlaceOrder");
        assert!(matches!(
            def.output_binding.single(),
            Some(OutputBinding::DocumentStore(DocumentStoreOutput { is_collection: false, .. }))
        ));
    }
}
