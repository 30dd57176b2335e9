//! # Custom Rules
//!
//! A [`FieldValidation`] checks one field and, when it fails, returns the
//! exact message to show. [`Validator::register_rule`](crate::Validator::register_rule)
//! adapts it to the engine: the message is recorded for the current call and
//! the engine sees a plain failure.
//!
//! Two rules ship with every validator:
//!
//! - `file` — the field names an existing filesystem entry;
//! - `required_when` — parameter `"<sibling> <value>"`.
//!
//! A rule that takes a parameter may come with a [`ParamCheck`]. The engine
//! runs it before evaluating anything, and a rejected parameter is an
//! annotation error rather than a violation message.

use std::sync::Arc;

use tagval_core::RuleError;
use tagval_engine::{FieldLevel, ParamCheck, Target};

/// A custom rule that produces its own failure message.
pub type FieldValidation = Arc<dyn Fn(&FieldLevel<'_>) -> Result<(), RuleError> + Send + Sync>;

/// Custom rules installed on every new validator, with their parameter
/// checks.
pub fn builtin_rules() -> [(&'static str, FieldValidation, Option<ParamCheck>); 2] {
    [
        ("file", Arc::new(file_exists), None),
        (
            "required_when",
            Arc::new(required_when),
            Some(Arc::new(required_when_param)),
        ),
    ]
}

/// `file`: the field's value is a path to an existing filesystem entry.
///
/// Every stat failure, not only "not found", yields the same message.
pub fn file_exists(level: &FieldLevel<'_>) -> Result<(), RuleError> {
    let path = level.value().to_string();
    match std::fs::metadata(&path) {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::debug!(field = level.field_name(), path = %path, error = %e, "file check failed");
            Err(RuleError::new(format!("Could not find file {path}.")))
        }
    }
}

fn split_required_when(param: &str) -> Result<(&str, &str), String> {
    let mut tokens = param.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(sibling), Some(expected), None) => Ok((sibling, expected)),
        _ => Err("expects '<field> <value>'".to_string()),
    }
}

/// Parameter check for `required_when`: exactly two tokens, the first
/// naming a field of the annotated struct.
pub fn required_when_param(param: &str, target: &Target) -> Result<(), String> {
    let (sibling, _) = split_required_when(param)?;
    if target.field(sibling).is_none() {
        return Err(format!("unknown field '{sibling}'"));
    }
    Ok(())
}

/// `required_when=<sibling> <value>`.
///
/// Fails when the field is set while the sibling does not equal the
/// expected value.
pub fn required_when(level: &FieldLevel<'_>) -> Result<(), RuleError> {
    // The engine rejects bad parameters before evaluation.
    let Ok((sibling, expected)) = split_required_when(level.param()) else {
        return Ok(());
    };
    let mismatch = level
        .sibling(sibling)
        .is_some_and(|actual| !actual.matches(expected));

    if !level.value().is_zero() && mismatch {
        return Err(RuleError::new(format!(
            "{} is required when {} is set to {expected}",
            level.field_name().to_lowercase(),
            sibling.to_lowercase()
        )));
    }
    Ok(())
}
