//! Outbind - output-binding configuration for command functions
//!
//! Attaches a destination for a command handler's result (queue, topic,
//! pub/sub hub, blob, storage queue, table, document store) to a function
//! definition and produces the descriptors a code generator consumes.

pub mod bindings;
pub mod builders;
pub mod connections;
pub mod definition;
pub mod error;
pub mod manifest;
pub mod types;

pub use bindings::{BindingSlot, BlobOutput, BlobTarget, FileAccess, OutputBinding};
pub use builders::{BindingHost, FunctionBuilder, OutputBindingBuilder};
pub use connections::{BindingConfig, BindingFamily, ConnectionNameDefaults, PubSubTypeNames};
pub use definition::FunctionDefinition;
pub use error::{ConfigurationError, FixSuggestion, OutbindError};
pub use manifest::Manifest;
pub use types::{Capability, TypeRef};
