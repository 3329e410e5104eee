//! Function definitions (command -> handler mappings)

use crate::bindings::BindingSlot;
use crate::types::TypeRef;
use serde::Serialize;

/// One command-to-handler mapping.
///
/// Created by an upstream builder chain; the output-binding builder only ever
/// touches `output_binding`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDefinition {
    pub command_type: TypeRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_result_type: Option<TypeRef>,
    /// Element type when the result is a collection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_result_item_type: Option<TypeRef>,
    pub output_binding: BindingSlot,
}

impl FunctionDefinition {
    /// A definition for a command that produces no result
    pub fn new(command_type: impl Into<TypeRef>) -> Self {
        Self {
            command_type: command_type.into(),
            command_result_type: None,
            command_result_item_type: None,
            output_binding: BindingSlot::Empty,
        }
    }

    /// Declare the result type; the item type defaults to the result itself
    pub fn with_result(mut self, result: impl Into<TypeRef>) -> Self {
        self.command_result_type = Some(result.into());
        self
    }

    /// Declare the element type of a collection result
    pub fn with_result_item(mut self, item: impl Into<TypeRef>) -> Self {
        self.command_result_item_type = Some(item.into());
        self
    }

    pub fn command_name(&self) -> &str {
        self.command_type.name()
    }

    pub fn command_has_result(&self) -> bool {
        self.command_result_type.is_some()
    }

    /// Item type, falling back to the result type
    pub fn result_item_type(&self) -> Option<&TypeRef> {
        self.command_result_item_type
            .as_ref()
            .or(self.command_result_type.as_ref())
    }

    pub fn result_item_type_name(&self) -> Option<&str> {
        self.result_item_type().map(TypeRef::name)
    }
}
