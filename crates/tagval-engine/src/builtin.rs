//! # Built-in Rules
//!
//! Rules every [`TagEngine`](crate::TagEngine) knows without registration.
//! Each rule answers pass/fail for one field. Parameters are checked
//! against the annotated struct when the annotations are compiled, before
//! any rule runs; an unusable parameter is an annotation error whatever the
//! field values are.
//!
//! | tag | passes when |
//! |---|---|
//! | `required` | the value is not zero |
//! | `oneof` | the value equals one of the space-separated parameter values |
//! | `required_with` | the value is set, or every listed sibling is zero |
//! | `required_without` | the value is set, or every listed sibling is set |
//! | `hostname` | the value is an RFC 952 hostname |
//! | `tcp4_addr` | the value is `ip:port` with an IPv4 host |
//! | `min` / `max` / `len` | the value's size is `>=` / `<=` / `==` the parameter |
//! | `eq` / `ne` | the value does / does not render as the parameter |

use std::net::SocketAddrV4;
use std::sync::LazyLock;

use regex::Regex;

use crate::annotated::Target;
use crate::field::FieldLevel;

/// A built-in rule and the check for its parameter.
#[derive(Clone, Copy)]
pub struct BuiltinRule {
    /// Evaluates the rule for one field. `Err` means the parameter is
    /// unusable.
    pub eval: fn(&FieldLevel<'_>) -> Result<bool, String>,
    /// Checks the declared parameter against the annotated struct.
    pub validate_param: fn(&str, &Target) -> Result<(), String>,
}

impl BuiltinRule {
    const fn new(
        eval: fn(&FieldLevel<'_>) -> Result<bool, String>,
        validate_param: fn(&str, &Target) -> Result<(), String>,
    ) -> Self {
        Self {
            eval,
            validate_param,
        }
    }
}

static HOSTNAME_RFC952: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z]([a-zA-Z0-9\-]+[\.]?)*[a-zA-Z0-9]$").expect("hostname pattern compiles")
});

/// All built-in rules, keyed by tag.
pub fn builtins() -> [(&'static str, BuiltinRule); 11] {
    [
        ("required", BuiltinRule::new(required, any_param)),
        ("oneof", BuiltinRule::new(oneof, oneof_param)),
        ("required_with", BuiltinRule::new(required_with, siblings_param)),
        ("required_without", BuiltinRule::new(required_without, siblings_param)),
        ("hostname", BuiltinRule::new(hostname, any_param)),
        ("tcp4_addr", BuiltinRule::new(tcp4_addr, any_param)),
        ("min", BuiltinRule::new(min, size_param_check)),
        ("max", BuiltinRule::new(max, size_param_check)),
        ("len", BuiltinRule::new(len, size_param_check)),
        ("eq", BuiltinRule::new(eq, any_param)),
        ("ne", BuiltinRule::new(ne, any_param)),
    ]
}

fn any_param(_param: &str, _target: &Target) -> Result<(), String> {
    Ok(())
}

fn oneof_param(param: &str, _target: &Target) -> Result<(), String> {
    if param.split_whitespace().next().is_none() {
        return Err("expects at least one allowed value".to_string());
    }
    Ok(())
}

fn sibling_names(param: &str) -> Result<Vec<&str>, String> {
    let names: Vec<&str> = param.split_whitespace().collect();
    if names.is_empty() {
        return Err("expects at least one field name".to_string());
    }
    Ok(names)
}

fn siblings_param(param: &str, target: &Target) -> Result<(), String> {
    match sibling_names(param)?
        .into_iter()
        .find(|name| target.field(name).is_none())
    {
        Some(unknown) => Err(format!("unknown field '{unknown}'")),
        None => Ok(()),
    }
}

fn size_param_check(param: &str, _target: &Target) -> Result<(), String> {
    parse_size(param).map(|_| ())
}

fn required(fl: &FieldLevel<'_>) -> Result<bool, String> {
    Ok(!fl.value().is_zero())
}

fn oneof(fl: &FieldLevel<'_>) -> Result<bool, String> {
    oneof_param(fl.param(), fl.parent())?;
    Ok(fl
        .param()
        .split_whitespace()
        .any(|candidate| fl.value().matches(candidate)))
}

/// Whether each sibling named in the parameter is set (non-zero).
fn siblings_set(fl: &FieldLevel<'_>) -> Result<Vec<bool>, String> {
    sibling_names(fl.param())?
        .into_iter()
        .map(|name| {
            fl.sibling(name)
                .map(|value| !value.is_zero())
                .ok_or_else(|| format!("unknown field '{name}'"))
        })
        .collect()
}

fn required_with(fl: &FieldLevel<'_>) -> Result<bool, String> {
    let any_set = siblings_set(fl)?.into_iter().any(|set| set);
    Ok(!any_set || !fl.value().is_zero())
}

fn required_without(fl: &FieldLevel<'_>) -> Result<bool, String> {
    let any_unset = siblings_set(fl)?.into_iter().any(|set| !set);
    Ok(!any_unset || !fl.value().is_zero())
}

fn hostname(fl: &FieldLevel<'_>) -> Result<bool, String> {
    Ok(fl
        .value()
        .as_str()
        .is_some_and(|s| HOSTNAME_RFC952.is_match(s)))
}

fn tcp4_addr(fl: &FieldLevel<'_>) -> Result<bool, String> {
    Ok(fl
        .value()
        .as_str()
        .is_some_and(|s| s.parse::<SocketAddrV4>().is_ok()))
}

fn parse_size(param: &str) -> Result<f64, String> {
    param
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("expects a number: {e}"))
}

fn size_param(fl: &FieldLevel<'_>) -> Result<f64, String> {
    parse_size(fl.param())
}

fn min(fl: &FieldLevel<'_>) -> Result<bool, String> {
    let bound = size_param(fl)?;
    Ok(fl.value().size().is_some_and(|size| size >= bound))
}

fn max(fl: &FieldLevel<'_>) -> Result<bool, String> {
    let bound = size_param(fl)?;
    Ok(fl.value().size().is_some_and(|size| size <= bound))
}

fn len(fl: &FieldLevel<'_>) -> Result<bool, String> {
    let bound = size_param(fl)?;
    Ok(fl.value().size().is_some_and(|size| size == bound))
}

fn eq(fl: &FieldLevel<'_>) -> Result<bool, String> {
    Ok(fl.value().matches(fl.param()))
}

fn ne(fl: &FieldLevel<'_>) -> Result<bool, String> {
    Ok(!fl.value().matches(fl.param()))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;
    use tagval_core::FieldValue;

    use super::*;
    use crate::annotated::Target;

    fn target(fields: serde_json::Value) -> Target {
        let map: BTreeMap<String, FieldValue> = fields
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), FieldValue::new(v.clone())))
            .collect();
        Target::new("Fixture", map, &[])
    }

    type Eval = fn(&FieldLevel<'_>) -> Result<bool, String>;

    fn run(rule: Eval, target: &Target, field: &str, param: &str) -> Result<bool, String> {
        let value = target.field(field).unwrap();
        rule(&FieldLevel::new(target, field, value, "under_test", param))
    }

    fn builtin(tag: &str) -> BuiltinRule {
        builtins()
            .into_iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, rule)| rule)
            .unwrap()
    }

    #[test]
    fn required_rejects_zero_values() {
        let t = target(json!({"a": "", "b": "x", "c": 0, "d": 3}));
        assert_eq!(run(required, &t, "a", ""), Ok(false));
        assert_eq!(run(required, &t, "b", ""), Ok(true));
        assert_eq!(run(required, &t, "c", ""), Ok(false));
        assert_eq!(run(required, &t, "d", ""), Ok(true));
    }

    #[test]
    fn oneof_matches_listed_values() {
        let t = target(json!({"proto": "ftp", "level": 2}));
        assert_eq!(run(oneof, &t, "proto", "tcp http"), Ok(false));
        assert_eq!(run(oneof, &t, "proto", "tcp ftp"), Ok(true));
        assert_eq!(run(oneof, &t, "level", "1 2 3"), Ok(true));
        assert!(run(oneof, &t, "proto", "  ").is_err());
    }

    #[test]
    fn required_with_and_without() {
        let t = target(json!({"host": "", "addr": "1.2.3.4:80", "other": ""}));
        assert_eq!(run(required_with, &t, "host", "addr"), Ok(false));
        assert_eq!(run(required_with, &t, "host", "other"), Ok(true));
        assert_eq!(run(required_without, &t, "host", "other"), Ok(false));
        assert_eq!(run(required_without, &t, "host", "addr"), Ok(true));
        assert_eq!(run(required_without, &t, "addr", "host"), Ok(true));
        assert!(run(required_with, &t, "host", "missing").is_err());
        assert!(run(required_without, &t, "host", "").is_err());
    }

    #[test]
    fn hostname_follows_rfc952() {
        let t = target(json!({
            "ok": "db-1.internal",
            "short": "a1",
            "digit_first": "1host",
            "trailing_dash": "host-",
            "double_dot": "a..b",
            "number": 5
        }));
        assert_eq!(run(hostname, &t, "ok", ""), Ok(true));
        assert_eq!(run(hostname, &t, "short", ""), Ok(true));
        assert_eq!(run(hostname, &t, "digit_first", ""), Ok(false));
        assert_eq!(run(hostname, &t, "trailing_dash", ""), Ok(false));
        assert_eq!(run(hostname, &t, "double_dot", ""), Ok(false));
        assert_eq!(run(hostname, &t, "number", ""), Ok(false));
    }

    #[test]
    fn tcp4_addr_requires_ipv4_and_port() {
        let t = target(json!({
            "ok": "127.0.0.1:8080",
            "no_port": "127.0.0.1",
            "named": "localhost:80",
            "v6": "[::1]:80",
            "bad_port": "10.0.0.1:99999"
        }));
        assert_eq!(run(tcp4_addr, &t, "ok", ""), Ok(true));
        assert_eq!(run(tcp4_addr, &t, "no_port", ""), Ok(false));
        assert_eq!(run(tcp4_addr, &t, "named", ""), Ok(false));
        assert_eq!(run(tcp4_addr, &t, "v6", ""), Ok(false));
        assert_eq!(run(tcp4_addr, &t, "bad_port", ""), Ok(false));
    }

    #[test]
    fn size_rules() {
        let t = target(json!({"name": "abc", "port": 80, "tags": ["a", "b"], "flag": true}));
        assert_eq!(run(min, &t, "name", "3"), Ok(true));
        assert_eq!(run(min, &t, "name", "4"), Ok(false));
        assert_eq!(run(max, &t, "port", "1024"), Ok(true));
        assert_eq!(run(max, &t, "port", "10"), Ok(false));
        assert_eq!(run(len, &t, "tags", "2"), Ok(true));
        assert_eq!(run(len, &t, "flag", "1"), Ok(false));
        assert!(run(min, &t, "name", "three").is_err());
    }

    #[test]
    fn eq_and_ne() {
        let t = target(json!({"mode": "strict", "count": 3}));
        assert_eq!(run(eq, &t, "mode", "strict"), Ok(true));
        assert_eq!(run(ne, &t, "mode", "strict"), Ok(false));
        assert_eq!(run(eq, &t, "count", "3"), Ok(true));
    }

    #[test]
    fn params_are_checked_without_field_values() {
        let t = target(json!({"host": "", "addr": ""}));
        let check = |tag: &str, param: &str| (builtin(tag).validate_param)(param, &t);

        assert!(check("min", "3").is_ok());
        assert!(check("max", "three").unwrap_err().contains("expects a number"));
        assert!(check("len", "").is_err());
        assert!(check("oneof", "tcp http").is_ok());
        assert!(check("oneof", " ").is_err());
        assert!(check("required_with", "addr").is_ok());
        assert_eq!(
            check("required_without", "addr nosuch").unwrap_err(),
            "unknown field 'nosuch'"
        );
        assert!(check("required", "anything").is_ok());
    }
}
