//! Output binding descriptors
//!
//! Plain records consumed by the downstream generator. One record per
//! destination kind; every record carries the item type name the generated
//! handler writes and the connection-setting name it reads at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Service-bus style queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueOutput {
    pub item_type_name: String,
    pub connection_setting: String,
    pub queue_name: String,
}

/// Service-bus style topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicOutput {
    pub item_type_name: String,
    pub connection_setting: String,
    pub topic_name: String,
}

/// Pub/sub hub output, shared by messages and group actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PubSubOutput {
    pub item_type_name: String,
    pub connection_setting: String,
    pub hub_name: String,
    /// Platform type the generator binds to
    pub output_type_name: String,
}

/// Storage queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStoreOutput {
    pub item_type_name: String,
    pub connection_setting: String,
    pub queue_name: String,
}

/// Table storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableStoreOutput {
    pub item_type_name: String,
    pub connection_setting: String,
    pub table_name: String,
}

/// Document database collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStoreOutput {
    pub item_type_name: String,
    pub connection_setting: String,
    pub collection_name: String,
    pub database_name: String,
    /// Batched collector when true, single out-value otherwise
    pub is_collection: bool,
}

/// How a blob output is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileAccess {
    Read,
    #[default]
    Write,
    ReadWrite,
}

/// One named blob target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobTarget {
    /// Absent when the command declares no result
    pub item_type_name: Option<String>,
    pub connection_setting: String,
    pub name: String,
    pub file_access: FileAccess,
}

/// Blob container; the only binding that accumulates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobOutput {
    pub item_type_name: Option<String>,
    pub outputs: Vec<BlobTarget>,
}

impl BlobOutput {
    pub fn new(item_type_name: Option<String>) -> Self {
        Self {
            item_type_name,
            outputs: Vec::new(),
        }
    }
}

/// A single (non-accumulating) output binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OutputBinding {
    Queue(QueueOutput),
    Topic(TopicOutput),
    PubSubMessage(PubSubOutput),
    PubSubGroupAction(PubSubOutput),
    QueueStore(QueueStoreOutput),
    TableStore(TableStoreOutput),
    DocumentStore(DocumentStoreOutput),
}

impl OutputBinding {
    pub fn kind(&self) -> &'static str {
        match self {
            OutputBinding::Queue(_) => "queue",
            OutputBinding::Topic(_) => "topic",
            OutputBinding::PubSubMessage(_) => "pubSubMessage",
            OutputBinding::PubSubGroupAction(_) => "pubSubGroupAction",
            OutputBinding::QueueStore(_) => "queueStore",
            OutputBinding::TableStore(_) => "tableStore",
            OutputBinding::DocumentStore(_) => "documentStore",
        }
    }

    pub fn connection_setting(&self) -> &str {
        match self {
            OutputBinding::Queue(o) => &o.connection_setting,
            OutputBinding::Topic(o) => &o.connection_setting,
            OutputBinding::PubSubMessage(o) | OutputBinding::PubSubGroupAction(o) => {
                &o.connection_setting
            }
            OutputBinding::QueueStore(o) => &o.connection_setting,
            OutputBinding::TableStore(o) => &o.connection_setting,
            OutputBinding::DocumentStore(o) => &o.connection_setting,
        }
    }
}

/// The output binding slot of a function definition.
///
/// `Empty -> Single`, `Empty -> Blob` and `Blob -> Blob` are the only
/// transitions; nothing ever clears the slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum BindingSlot {
    #[default]
    Empty,
    Single(OutputBinding),
    Blob(BlobOutput),
}

impl BindingSlot {
    pub fn is_empty(&self) -> bool {
        matches!(self, BindingSlot::Empty)
    }

    pub fn single(&self) -> Option<&OutputBinding> {
        match self {
            BindingSlot::Single(binding) => Some(binding),
            _ => None,
        }
    }

    pub fn blob(&self) -> Option<&BlobOutput> {
        match self {
            BindingSlot::Blob(blob) => Some(blob),
            _ => None,
        }
    }
}

impl fmt::Display for BindingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingSlot::Empty => f.write_str("none"),
            BindingSlot::Single(binding) => f.write_str(binding.kind()),
            BindingSlot::Blob(blob) => write!(f, "blob x{}", blob.outputs.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_file_access_is_write() {
        assert_eq!(FileAccess::default(), FileAccess::Write);
    }

    #[test]
    fn output_binding_serializes_with_kind_tag() {
        let binding = OutputBinding::TableStore(TableStoreOutput {
            item_type_name: "AuditRow".into(),
            connection_setting: "storage".into(),
            table_name: "audit".into(),
        });
        let json = serde_json::to_value(&binding).unwrap();
        assert_eq!(json["kind"], "tableStore");
        assert_eq!(json["tableName"], "audit");
        assert_eq!(json["connectionSetting"], "storage");
    }

    #[test]
    fn slot_display() {
        assert_eq!(BindingSlot::Empty.to_string(), "none");

        let mut blob = BlobOutput::new(None);
        blob.outputs.push(BlobTarget {
            item_type_name: None,
            connection_setting: "storage".into(),
            name: "a/{id}".into(),
            file_access: FileAccess::Write,
        });
        assert_eq!(BindingSlot::Blob(blob).to_string(), "blob x1");
    }
}
