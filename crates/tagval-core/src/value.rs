//! # Field Values
//!
//! Struct fields reach the engine as JSON values (structs are inspected by
//! serializing them through `serde_json`). [`FieldValue`] wraps that value
//! and gives it the two views rule evaluation needs:
//!
//! - a textual rendering, used in messages and for literal comparisons
//!   (`oneof`, `eq`, the sibling check of `required_when`);
//! - a zero-value test, the equivalent of "the field was never set".

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The value of one struct field at validation time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValue(Value);

impl FieldValue {
    /// Wrap a JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Access the underlying JSON value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Whether the value is the zero value of its type.
    ///
    /// Zero values are `null`, `""`, `0`, `false`, `[]` and `{}`.
    pub fn is_zero(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }

    /// The measure used by size rules (`min`, `max`, `len`).
    ///
    /// Numbers measure as themselves, strings by character count, arrays
    /// and objects by element count. Booleans and `null` have no size.
    pub fn size(&self) -> Option<f64> {
        match &self.0 {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => Some(s.chars().count() as f64),
            Value::Array(items) => Some(items.len() as f64),
            Value::Object(map) => Some(map.len() as f64),
            Value::Null | Value::Bool(_) => None,
        }
    }

    /// Whether the rendered value equals `literal`.
    pub fn matches(&self, literal: &str) -> bool {
        match &self.0 {
            Value::String(s) => s == literal,
            _ => self.to_string() == literal,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => Ok(()),
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self(Value::Bool(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn zero_values() {
        for v in [json!(null), json!(""), json!(0), json!(0.0), json!(false), json!([]), json!({})] {
            assert!(FieldValue::new(v.clone()).is_zero(), "{v} should be zero");
        }
        for v in [json!("x"), json!(1), json!(-0.5), json!(true), json!([0]), json!({"a": 0})] {
            assert!(!FieldValue::new(v.clone()).is_zero(), "{v} should not be zero");
        }
    }

    #[test]
    fn strings_render_unquoted() {
        assert_eq!(FieldValue::from("ftp").to_string(), "ftp");
        assert_eq!(FieldValue::from(8080_i64).to_string(), "8080");
        assert_eq!(FieldValue::from(true).to_string(), "true");
        assert_eq!(FieldValue::new(json!(null)).to_string(), "");
    }

    #[test]
    fn size_by_kind() {
        assert_eq!(FieldValue::from("héllo").size(), Some(5.0));
        assert_eq!(FieldValue::from(42_i64).size(), Some(42.0));
        assert_eq!(FieldValue::new(json!([1, 2, 3])).size(), Some(3.0));
        assert_eq!(FieldValue::from(false).size(), None);
        assert_eq!(FieldValue::new(json!(null)).size(), None);
    }

    #[test]
    fn matches_compares_rendered_text() {
        assert!(FieldValue::from("http").matches("http"));
        assert!(!FieldValue::from("tcp").matches("http"));
        assert!(FieldValue::from(80_i64).matches("80"));
        assert!(FieldValue::from(true).matches("true"));
    }

    proptest! {
        /// Any string renders as itself and matches itself.
        #[test]
        fn string_render_is_identity(s in ".*") {
            let v = FieldValue::from(s.clone());
            prop_assert_eq!(v.to_string(), s.clone());
            prop_assert!(v.matches(&s));
            prop_assert_eq!(v.is_zero(), s.is_empty());
        }
    }
}
