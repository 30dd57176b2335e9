//! # Struct Annotations
//!
//! Rust has no struct tags, so a struct declares its rules through
//! [`Annotated::RULES`]: one [`FieldRules`] per validated field, in
//! declaration order.
//!
//! ```ignore
//! #[derive(Serialize)]
//! struct Listener {
//!     proto: String,
//!     host: String,
//! }
//!
//! impl Annotated for Listener {
//!     const RULES: &'static [FieldRules] = &[
//!         FieldRules::new("proto", "required,oneof=tcp http"),
//!         FieldRules::new("host", "hostname"),
//!     ];
//! }
//! ```
//!
//! The engine never touches the struct directly; it evaluates a
//! [`Target`], the struct's serialized fields plus its rule table.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tagval_core::{EngineError, FieldValue};

/// The rule annotation of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRules {
    /// Field name as serialized.
    pub field: &'static str,
    /// Comma-separated rule list, e.g. `"required,oneof=tcp http"`.
    pub tags: &'static str,
}

impl FieldRules {
    /// Annotate `field` with `tags`.
    pub const fn new(field: &'static str, tags: &'static str) -> Self {
        Self { field, tags }
    }
}

/// A struct whose fields carry validation rules.
pub trait Annotated: Serialize {
    /// Rule annotations in field declaration order.
    const RULES: &'static [FieldRules];
}

/// A struct value prepared for rule evaluation.
#[derive(Debug, Clone)]
pub struct Target {
    type_name: String,
    fields: BTreeMap<String, FieldValue>,
    rules: &'static [FieldRules],
}

impl Target {
    /// Build a target from explicit parts.
    pub fn new(
        type_name: impl Into<String>,
        fields: BTreeMap<String, FieldValue>,
        rules: &'static [FieldRules],
    ) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
            rules,
        }
    }

    /// Serialize `value` into a target.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Serialization` if serialization fails and
    /// `EngineError::NotAStruct` if the value does not serialize to a map
    /// of named fields.
    pub fn inspect<T: Annotated>(value: &T) -> Result<Self, EngineError> {
        let type_name = short_type_name::<T>();
        let json = serde_json::to_value(value).map_err(|source| EngineError::Serialization {
            type_name: type_name.clone(),
            source,
        })?;

        let Value::Object(map) = json else {
            return Err(EngineError::NotAStruct { type_name });
        };

        let fields = map
            .into_iter()
            .map(|(name, value)| (name, FieldValue::new(value)))
            .collect();

        Ok(Self::new(type_name, fields, T::RULES))
    }

    /// Name of the inspected type, without its module path.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Rule annotations in declaration order.
    pub fn rules(&self) -> &'static [FieldRules] {
        self.rules
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// `std::any::type_name` without module paths or generic arguments.
fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Listener {
        proto: String,
        port: u16,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    }

    impl Annotated for Listener {
        const RULES: &'static [FieldRules] = &[FieldRules::new("proto", "required")];
    }

    #[derive(Serialize)]
    struct Wrapped(u32);

    impl Annotated for Wrapped {
        const RULES: &'static [FieldRules] = &[];
    }

    #[test]
    fn inspect_collects_all_serialized_fields() {
        let target = Target::inspect(&Listener {
            proto: "tcp".to_string(),
            port: 8080,
            note: None,
        })
        .unwrap();

        assert_eq!(target.type_name(), "Listener");
        assert_eq!(target.field("proto"), Some(&FieldValue::from("tcp")));
        assert_eq!(target.field("port"), Some(&FieldValue::from(8080_i64)));
        assert!(target.field("note").is_none());
        assert_eq!(target.rules().len(), 1);
    }

    #[test]
    fn inspect_rejects_non_struct_values() {
        let err = Target::inspect(&Wrapped(3)).unwrap_err();
        assert!(
            matches!(err, EngineError::NotAStruct { ref type_name } if type_name == "Wrapped"),
            "Expected NotAStruct, got: {err}"
        );
    }
}
