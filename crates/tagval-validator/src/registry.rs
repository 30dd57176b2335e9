//! # Message Registry
//!
//! Static message policy: override factories keyed by rule tag, and one
//! default factory for everything else. The registry is written during
//! setup and only read while validating.
//!
//! ## Built-in Messages
//!
//! | tag | message |
//! |---|---|
//! | `oneof` | `{value} is invalid. Valid values are {param}.` |
//! | `tcp4_addr` | `{value} is not a valid tcp address` |
//! | `hostname` | `{value} is not a valid hostname` |
//! | `required_with` | `{field} is required with {param}` (lower-cased) |
//! | `required_without` | `{field} is required when {param} is not set` (lower-cased) |
//! | `required` | `{field} is required.` (field lower-cased) |
//! | default | `{value} is an invalid {field}` (field lower-cased) |

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tagval_core::{FailedRule, RuleError};

/// Builds a violation message from a failed rule.
pub type ErrorFactory = Arc<dyn Fn(&FailedRule) -> RuleError + Send + Sync>;

/// Override and default message factories.
#[derive(Clone)]
pub struct MessageRegistry {
    overrides: HashMap<String, ErrorFactory>,
    default: ErrorFactory,
}

impl MessageRegistry {
    /// A registry holding the built-in messages.
    pub fn builtin() -> Self {
        let mut registry = Self::with_default(Arc::new(|e: &FailedRule| {
            RuleError::new(format!("{} is an invalid {}", e.value(), e.field().to_lowercase()))
        }));

        registry.set_override(
            "oneof",
            Arc::new(|e: &FailedRule| {
                RuleError::new(format!("{} is invalid. Valid values are {}.", e.value(), e.param()))
            }),
        );
        registry.set_override(
            "tcp4_addr",
            Arc::new(|e: &FailedRule| RuleError::new(format!("{} is not a valid tcp address", e.value()))),
        );
        registry.set_override(
            "hostname",
            Arc::new(|e: &FailedRule| RuleError::new(format!("{} is not a valid hostname", e.value()))),
        );
        registry.set_override(
            "required_with",
            Arc::new(|e: &FailedRule| {
                RuleError::new(format!(
                    "{} is required with {}",
                    e.field().to_lowercase(),
                    e.param().to_lowercase()
                ))
            }),
        );
        registry.set_override(
            "required_without",
            Arc::new(|e: &FailedRule| {
                RuleError::new(format!(
                    "{} is required when {} is not set",
                    e.field().to_lowercase(),
                    e.param().to_lowercase()
                ))
            }),
        );
        registry.set_override(
            "required",
            Arc::new(|e: &FailedRule| RuleError::new(format!("{} is required.", e.field().to_lowercase()))),
        );

        registry
    }

    /// A registry with no overrides and the given default.
    pub fn with_default(default: ErrorFactory) -> Self {
        Self {
            overrides: HashMap::new(),
            default,
        }
    }

    /// Install `factory` for `tag`, replacing any earlier override.
    pub fn set_override(&mut self, tag: &str, factory: ErrorFactory) {
        self.overrides.insert(tag.to_string(), factory);
    }

    /// Replace the default factory.
    pub fn set_default(&mut self, factory: ErrorFactory) {
        self.default = factory;
    }

    /// The override for `tag`, if any.
    pub fn override_for(&self, tag: &str) -> Option<&ErrorFactory> {
        self.overrides.get(tag)
    }

    /// The default factory.
    pub fn default_factory(&self) -> &ErrorFactory {
        &self.default
    }

    /// Tags with an override, sorted alphabetically.
    pub fn override_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.overrides.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRegistry")
            .field("overrides", &self.override_tags())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagval_core::FieldValue;

    fn message(registry: &MessageRegistry, rule: &FailedRule) -> String {
        let factory = registry
            .override_for(rule.tag())
            .unwrap_or_else(|| registry.default_factory());
        factory(rule).into_message()
    }

    #[test]
    fn builtin_messages() {
        let registry = MessageRegistry::builtin();
        let cases = [
            (
                FailedRule::new("oneof", "Proto", FieldValue::from("ftp"), "tcp http"),
                "ftp is invalid. Valid values are tcp http.",
            ),
            (
                FailedRule::new("tcp4_addr", "Addr", FieldValue::from("nope"), ""),
                "nope is not a valid tcp address",
            ),
            (
                FailedRule::new("hostname", "Host", FieldValue::from("-x"), ""),
                "-x is not a valid hostname",
            ),
            (
                FailedRule::new("required_with", "Host", FieldValue::from(""), "Addr"),
                "host is required with addr",
            ),
            (
                FailedRule::new("required_without", "Host", FieldValue::from(""), "Addr"),
                "host is required when addr is not set",
            ),
            (
                FailedRule::new("required", "Proto", FieldValue::from(""), ""),
                "proto is required.",
            ),
            (
                FailedRule::new("min", "Workers", FieldValue::from(0_i64), "1"),
                "0 is an invalid workers",
            ),
        ];
        for (rule, expected) in cases {
            assert_eq!(message(&registry, &rule), expected, "tag '{}'", rule.tag());
        }
    }

    #[test]
    fn later_override_replaces_earlier() {
        let mut registry = MessageRegistry::builtin();
        registry.set_override("required", Arc::new(|_: &FailedRule| RuleError::new("first")));
        registry.set_override("required", Arc::new(|_: &FailedRule| RuleError::new("second")));
        let rule = FailedRule::new("required", "proto", FieldValue::from(""), "");
        assert_eq!(message(&registry, &rule), "second");
    }

    #[test]
    fn debug_lists_override_tags() {
        let debug = format!("{:?}", MessageRegistry::builtin());
        assert!(debug.contains("oneof"));
        assert!(debug.contains("required_without"));
    }
}
