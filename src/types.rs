//! Type descriptions for commands and their results
//!
//! The configuration layer never inspects live types. Callers describe each
//! type by name plus the capabilities it satisfies, and the builder only asks
//! boolean membership questions of that description.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CAPABILITY
// ============================================================================

/// A capability a type may satisfy (an "is-a" relationship)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// The type is a pub/sub message (or derives from one)
    PubSubMessage,
    /// The type is a pub/sub group action (or derives from one)
    PubSubGroupAction,
    /// The type is a sequence of items
    Sequence,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::PubSubMessage => "pubSubMessage",
            Capability::PubSubGroupAction => "pubSubGroupAction",
            Capability::Sequence => "sequence",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = CapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pubSubMessage" => Ok(Capability::PubSubMessage),
            "pubSubGroupAction" => Ok(Capability::PubSubGroupAction),
            "sequence" => Ok(Capability::Sequence),
            other => Err(CapabilityError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("Unknown capability: {0}")]
    Unknown(String),
}

// ============================================================================
// TYPE REF
// ============================================================================

/// Description of a command, result, or item type
///
/// Guarantees:
/// - Name is stored verbatim (the generator emits it as-is)
/// - Capabilities are a set, so duplicates collapse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub capabilities: BTreeSet<Capability>,
}

impl TypeRef {
    /// Describe a type with no capabilities
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: BTreeSet::new(),
        }
    }

    /// Add a capability
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Does this type satisfy `capability`?
    pub fn satisfies(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::new(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_type_has_no_capabilities() {
        let ty = TypeRef::new("OrderConfirmation");
        assert!(!ty.satisfies(Capability::Sequence));
        assert!(!ty.satisfies(Capability::PubSubMessage));
        assert_eq!(ty.to_string(), "OrderConfirmation");
    }

    #[test]
    fn capabilities_are_queried_by_membership() {
        let ty = TypeRef::new("Vec<Order>").with_capability(Capability::Sequence);
        assert!(ty.satisfies(Capability::Sequence));
        assert!(!ty.satisfies(Capability::PubSubGroupAction));
    }

    #[test]
    fn parse_capability_names() {
        assert_eq!("sequence".parse::<Capability>().unwrap(), Capability::Sequence);
        assert_eq!(
            "pubSubGroupAction".parse::<Capability>().unwrap(),
            Capability::PubSubGroupAction
        );
        assert!("enumerable".parse::<Capability>().is_err());
    }

    #[test]
    fn deserialize_from_yaml() {
        let yaml = r#"
            name: ChatMessage
            capabilities: [pubSubMessage, pubSubMessage]
        "#;
        let ty: TypeRef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(ty.name, "ChatMessage");
        assert_eq!(ty.capabilities.len(), 1);
        assert!(ty.satisfies(Capability::PubSubMessage));
    }

    #[test]
    fn misspelled_capabilities_key_is_rejected() {
        let yaml = r#"
            name: "Vec<Order>"
            capabilites: [sequence]
        "#;
        assert!(serde_yaml::from_str::<TypeRef>(yaml).is_err());
    }
}
