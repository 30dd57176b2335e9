//! # Failed Rules
//!
//! A [`FailedRule`] is the engine's description of one violation: which
//! rule (tag) failed, on which field, against which value, with which
//! declared parameter. It carries no message; turning it into one is the
//! orchestrator's job.

use std::fmt;

use crate::value::FieldValue;

/// One rule violation reported by the rule-evaluation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRule {
    tag: String,
    field: String,
    value: FieldValue,
    param: String,
}

impl FailedRule {
    /// Describe a violation of `tag` on `field`.
    pub fn new(
        tag: impl Into<String>,
        field: impl Into<String>,
        value: FieldValue,
        param: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            field: field.into(),
            value,
            param: param.into(),
        }
    }

    /// The rule identifier, e.g. `"required"` or `"oneof"`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The field name as declared on the struct.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The rejected value.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// The rule's declared parameter; empty when the rule takes none.
    pub fn param(&self) -> &str {
        &self.param
    }
}

impl fmt::Display for FailedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.param.is_empty() {
            write!(f, "{} failed '{}'", self.field, self.tag)
        } else {
            write!(f, "{} failed '{}={}'", self.field, self.tag, self.param)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_param_when_present() {
        let rule = FailedRule::new("oneof", "proto", FieldValue::from("ftp"), "tcp http");
        assert_eq!(rule.to_string(), "proto failed 'oneof=tcp http'");

        let rule = FailedRule::new("required", "proto", FieldValue::from(""), "");
        assert_eq!(rule.to_string(), "proto failed 'required'");
    }
}
