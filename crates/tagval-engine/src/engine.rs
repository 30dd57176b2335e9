//! # Rule Engine
//!
//! [`RuleEngine`] is the narrow interface the orchestrator depends on:
//! register a custom predicate, run a check. [`TagEngine`] is the shipped
//! implementation over the tag syntax of [`crate::tags`] and the rules of
//! [`crate::builtin`].
//!
//! ## Per-Call Context
//!
//! `check` receives the caller's [`TagErrors`] and hands it to every custom
//! predicate it invokes. The engine keeps no per-call state of its own, so a
//! single engine can serve concurrent checks.
//!
//! ## Compilation
//!
//! Before any rule runs, every annotation of the target is parsed and every
//! rule parameter is checked: built-in parameters by the rule's own check,
//! custom parameters by the [`ParamCheck`] registered with the predicate.
//! A defective annotation therefore fails the same way for every value of
//! the struct.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tagval_core::{EngineError, FailedRule, FieldValue, TagErrors};

use crate::annotated::{FieldRules, Target};
use crate::builtin::{builtins, BuiltinRule};
use crate::field::FieldLevel;
use crate::tags::{parse_tags, TagRule, OMITEMPTY};

/// A custom rule: returns `true` if the field is valid.
///
/// The predicate may record a contextual message in the per-call
/// [`TagErrors`] before returning `false`.
pub type Predicate = Arc<dyn Fn(&FieldLevel<'_>, &mut TagErrors) -> bool + Send + Sync>;

/// Checks a custom rule's declared parameter against the annotated struct.
///
/// `Err` carries the reason the parameter is unusable.
pub type ParamCheck = Arc<dyn Fn(&str, &Target) -> Result<(), String> + Send + Sync>;

/// Interface of a rule-evaluation engine.
pub trait RuleEngine: Send + Sync {
    /// Register `predicate` under `tag`, replacing any rule of that name.
    ///
    /// `param_check`, when given, runs for every use of `tag` before any
    /// rule is evaluated; its failure is reported as
    /// `EngineError::InvalidParam`.
    fn register(
        &mut self,
        tag: &str,
        predicate: Predicate,
        param_check: Option<ParamCheck>,
    ) -> Result<(), EngineError>;

    /// Evaluate every annotated field of `target`.
    ///
    /// Returns the violations in evaluation order; an empty list means the
    /// target is valid. Custom predicates receive `tag_errors`.
    fn check(
        &self,
        target: &Target,
        tag_errors: &mut TagErrors,
    ) -> Result<Vec<FailedRule>, EngineError>;

    /// Whether `tag` names a registered custom predicate.
    fn is_custom(&self, tag: &str) -> bool;
}

#[derive(Clone)]
enum Rule {
    Builtin(BuiltinRule),
    Custom(Predicate, Option<ParamCheck>),
}

/// Tag-driven engine with the built-in rule set preinstalled.
#[derive(Clone)]
pub struct TagEngine {
    rules: HashMap<String, Rule>,
}

/// A field with its parsed rules, ready to evaluate.
struct CompiledField<'t> {
    field: &'static str,
    value: &'t FieldValue,
    rules: Vec<TagRule<'static>>,
}

impl TagEngine {
    /// An engine with all built-in rules.
    pub fn new() -> Self {
        let rules = builtins()
            .into_iter()
            .map(|(tag, rule)| (tag.to_string(), Rule::Builtin(rule)))
            .collect();
        Self { rules }
    }

    /// Registered tags, sorted alphabetically.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Parse every annotation of `target` and check every rule parameter
    /// before any rule runs.
    fn compile<'t>(&self, target: &'t Target) -> Result<Vec<CompiledField<'t>>, EngineError> {
        target
            .rules()
            .iter()
            .map(|annotation: &'static FieldRules| {
                let value = target.field(annotation.field).ok_or_else(|| {
                    EngineError::UnknownField {
                        type_name: target.type_name().to_string(),
                        field: annotation.field.to_string(),
                    }
                })?;

                let rules = parse_tags(annotation.tags).map_err(|reason| {
                    EngineError::MalformedTag {
                        type_name: target.type_name().to_string(),
                        field: annotation.field.to_string(),
                        tags: annotation.tags.to_string(),
                        reason,
                    }
                })?;

                for rule in rules.iter().filter(|r| r.name != OMITEMPTY) {
                    let checked = match self.rules.get(rule.name) {
                        Some(Rule::Builtin(builtin)) => (builtin.validate_param)(rule.param, target),
                        Some(Rule::Custom(_, Some(check))) => check(rule.param, target),
                        Some(Rule::Custom(_, None)) => Ok(()),
                        None => {
                            return Err(EngineError::UndefinedRule {
                                type_name: target.type_name().to_string(),
                                field: annotation.field.to_string(),
                                tag: rule.name.to_string(),
                            })
                        }
                    };
                    checked.map_err(|reason| EngineError::InvalidParam {
                        type_name: target.type_name().to_string(),
                        field: annotation.field.to_string(),
                        tag: rule.name.to_string(),
                        param: rule.param.to_string(),
                        reason,
                    })?;
                }

                Ok(CompiledField {
                    field: annotation.field,
                    value,
                    rules,
                })
            })
            .collect()
    }
}

impl Default for TagEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagEngine")
            .field("tags", &self.tags())
            .finish()
    }
}

impl RuleEngine for TagEngine {
    fn register(
        &mut self,
        tag: &str,
        predicate: Predicate,
        param_check: Option<ParamCheck>,
    ) -> Result<(), EngineError> {
        let restricted = |reason: &str| EngineError::RestrictedTag {
            tag: tag.to_string(),
            reason: reason.to_string(),
        };
        if tag.is_empty() {
            return Err(restricted("tag is empty"));
        }
        if tag == OMITEMPTY {
            return Err(restricted("tag is reserved"));
        }
        if tag.contains([',', '=', '|']) || tag.contains(char::is_whitespace) {
            return Err(restricted("tag contains a separator character"));
        }

        if let Some(Rule::Builtin(_)) = self.rules.get(tag) {
            tracing::debug!(tag, "custom rule replaces built-in rule");
        }
        self.rules
            .insert(tag.to_string(), Rule::Custom(predicate, param_check));
        Ok(())
    }

    fn check(
        &self,
        target: &Target,
        tag_errors: &mut TagErrors,
    ) -> Result<Vec<FailedRule>, EngineError> {
        let mut failures = Vec::new();

        for compiled in self.compile(target)? {
            for rule in &compiled.rules {
                if rule.name == OMITEMPTY {
                    if compiled.value.is_zero() {
                        break;
                    }
                    continue;
                }

                let level = FieldLevel::new(target, compiled.field, compiled.value, rule.name, rule.param);
                let passed = match self.rules.get(rule.name) {
                    Some(Rule::Custom(predicate, _)) => predicate(&level, tag_errors),
                    Some(Rule::Builtin(builtin)) => {
                        (builtin.eval)(&level).map_err(|reason| EngineError::InvalidParam {
                            type_name: target.type_name().to_string(),
                            field: compiled.field.to_string(),
                            tag: rule.name.to_string(),
                            param: rule.param.to_string(),
                            reason,
                        })?
                    }
                    None => {
                        return Err(EngineError::UndefinedRule {
                            type_name: target.type_name().to_string(),
                            field: compiled.field.to_string(),
                            tag: rule.name.to_string(),
                        })
                    }
                };

                if !passed {
                    let failure = FailedRule::new(
                        rule.name,
                        compiled.field,
                        compiled.value.clone(),
                        rule.param,
                    );
                    tracing::trace!(type_name = target.type_name(), rule = %failure, "rule failed");
                    failures.push(failure);
                    break;
                }
            }
        }

        Ok(failures)
    }

    fn is_custom(&self, tag: &str) -> bool {
        matches!(self.rules.get(tag), Some(Rule::Custom(..)))
    }
}
