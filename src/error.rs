//! Error types with fix suggestions

use crate::types::Capability;
use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Raised when an output binding is configured incorrectly.
///
/// Always fatal to the configuration pass: it points at a mistake in setup
/// code, not at anything recoverable at runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("OUTBIND-001: An output binding is already set for command {command}")]
    BindingAlreadySet { command: String },

    #[error("OUTBIND-002: Command of type {command} requires a result to be used with an output binding")]
    ResultRequired { command: String },

    #[error("OUTBIND-003: Commands that use {capability} output bindings must return a {capability} type or a derivative (command {command} returns {result})")]
    MissingCapability {
        command: String,
        result: String,
        capability: Capability,
    },
}

impl FixSuggestion for ConfigurationError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ConfigurationError::BindingAlreadySet { .. } => Some(
                "Declare a single output binding per command (only blob outputs may be repeated)",
            ),
            ConfigurationError::ResultRequired { .. } => {
                Some("Give the command a result type or remove the output binding")
            }
            ConfigurationError::MissingCapability { capability, .. } => match capability {
                Capability::PubSubMessage => {
                    Some("Return a type with the pubSubMessage capability from the handler")
                }
                Capability::PubSubGroupAction => {
                    Some("Return a type with the pubSubGroupAction capability from the handler")
                }
                Capability::Sequence => None,
            },
        }
    }
}

/// Crate-level error for loading configuration and manifests
#[derive(Error, Debug)]
pub enum OutbindError {
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Function '{function}' is misconfigured")]
    Configuration {
        function: String,
        #[source]
        source: ConfigurationError,
    },
}

impl FixSuggestion for OutbindError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            OutbindError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            OutbindError::Io(_) => Some("Check file path and permissions"),
            OutbindError::Configuration { source, .. } => source.fix_suggestion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_command() {
        let err = ConfigurationError::BindingAlreadySet {
            command: "PlaceOrder".into(),
        };
        assert!(err.to_string().contains("already set for command PlaceOrder"));

        let err = ConfigurationError::ResultRequired {
            command: "DeleteOrder".into(),
        };
        assert!(err.to_string().contains("requires a result"));
    }

    #[test]
    fn every_builder_failure_has_a_suggestion() {
        let errors = [
            ConfigurationError::BindingAlreadySet { command: "A".into() },
            ConfigurationError::ResultRequired { command: "A".into() },
            ConfigurationError::MissingCapability {
                command: "A".into(),
                result: "B".into(),
                capability: Capability::PubSubMessage,
            },
            ConfigurationError::MissingCapability {
                command: "A".into(),
                result: "B".into(),
                capability: Capability::PubSubGroupAction,
            },
        ];
        for err in &errors {
            assert!(err.fix_suggestion().is_some(), "no suggestion for {err}");
        }
    }

    #[test]
    fn configuration_wrapper_forwards_suggestion() {
        let err = OutbindError::Configuration {
            function: "PlaceOrder".into(),
            source: ConfigurationError::ResultRequired {
                command: "PlaceOrder".into(),
            },
        };
        assert_eq!(
            err.fix_suggestion(),
            Some("Give the command a result type or remove the output binding")
        );
    }
}
