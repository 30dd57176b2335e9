//! # Error Types
//!
//! Two error classes cross crate boundaries:
//!
//! - [`RuleError`] — a violation message, fully formed and ready to show a
//!   user. Produced by message factories and by custom rules.
//! - [`EngineError`] — an annotation or setup defect detected by the
//!   rule-evaluation engine. These are programmer errors; they are never
//!   turned into violation messages.

use thiserror::Error;

/// A single human-readable violation message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RuleError {
    message: String,
}

impl RuleError {
    /// Create a rule error carrying `message` verbatim.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes self and returns the message text.
    pub fn into_message(self) -> String {
        self.message
    }
}

/// Annotation and setup errors raised by the rule-evaluation engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The value could not be serialized for inspection.
    #[error("cannot inspect {type_name}: {source}")]
    Serialization {
        /// Name of the inspected type.
        type_name: String,
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },

    /// The value does not serialize to a map of named fields.
    #[error("{type_name} does not serialize to a struct with named fields")]
    NotAStruct {
        /// Name of the inspected type.
        type_name: String,
    },

    /// A rule annotation names a field the struct does not have.
    #[error("{type_name}.{field}: annotated field does not exist")]
    UnknownField {
        /// Name of the inspected type.
        type_name: String,
        /// The annotated field name.
        field: String,
    },

    /// The tag string of a field cannot be parsed.
    #[error("{type_name}.{field}: malformed tag '{tags}': {reason}")]
    MalformedTag {
        /// Name of the inspected type.
        type_name: String,
        /// The annotated field name.
        field: String,
        /// The full tag string.
        tags: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A tag names a rule that is neither built in nor registered.
    #[error("{type_name}.{field}: undefined validation rule '{tag}'")]
    UndefinedRule {
        /// Name of the inspected type.
        type_name: String,
        /// The annotated field name.
        field: String,
        /// The unknown rule tag.
        tag: String,
    },

    /// A rule was declared with a parameter it cannot interpret.
    #[error("{type_name}.{field}: invalid parameter '{param}' for rule '{tag}': {reason}")]
    InvalidParam {
        /// Name of the inspected type.
        type_name: String,
        /// The annotated field name.
        field: String,
        /// The rule tag.
        tag: String,
        /// The offending parameter.
        param: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A custom rule cannot be registered under the requested tag.
    #[error("cannot register rule '{tag}': {reason}")]
    RestrictedTag {
        /// The requested tag.
        tag: String,
        /// Why the tag is not allowed.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_error_displays_message_verbatim() {
        let err = RuleError::new("host is required.");
        assert_eq!(err.to_string(), "host is required.");
        assert_eq!(err.message(), "host is required.");
        assert_eq!(err.into_message(), "host is required.");
    }

    #[test]
    fn engine_error_names_type_and_field() {
        let err = EngineError::UndefinedRule {
            type_name: "Listener".to_string(),
            field: "proto".to_string(),
            tag: "oneoff".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("Listener.proto"));
        assert!(display.contains("oneoff"));
    }
}
