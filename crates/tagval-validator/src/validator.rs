//! # Validator
//!
//! The façade callers use: validate a struct, get back either nothing or
//! one readable message per violated rule.
//!
//! ## Resolution
//!
//! The engine reports violations as [`FailedRule`]s. Each is resolved by
//! [`Validator::resolve`]:
//!
//! 1. an override registered for the tag wins;
//! 2. otherwise the message the custom rule recorded for this field during
//!    this call;
//! 3. otherwise the default factory.
//!
//! ## Concurrency
//!
//! Contextual messages live in a [`TagErrors`] created inside each
//! `validate` call and passed down explicitly. A `Validator` is immutable
//! while validating and can be shared across threads.

use std::path::Path;
use std::sync::Arc;

use tagval_core::{EngineError, FailedRule, RuleError, TagErrors};
use tagval_engine::{Annotated, FieldLevel, ParamCheck, Predicate, RuleEngine, TagEngine, Target};

use crate::config::MessageConfig;
use crate::error::{ConfigError, Error, ValidationErrors};
use crate::registry::MessageRegistry;
use crate::rules::{builtin_rules, FieldValidation};

/// Validates annotated structs and resolves violations into messages.
#[derive(Debug, Clone)]
pub struct Validator<E = TagEngine> {
    engine: E,
    messages: MessageRegistry,
}

impl Validator<TagEngine> {
    /// A validator over the tag engine with the built-in messages and the
    /// `file` and `required_when` rules.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::RestrictedTag` if a built-in rule cannot be
    /// registered.
    pub fn new() -> Result<Self, EngineError> {
        Self::with_engine(TagEngine::new())
    }
}

impl<E: RuleEngine> Validator<E> {
    /// A validator over `engine` with the built-in messages and rules.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if it rejects a built-in rule.
    pub fn with_engine(engine: E) -> Result<Self, EngineError> {
        let mut validator = Self {
            engine,
            messages: MessageRegistry::builtin(),
        };
        for (tag, validation, param_check) in builtin_rules() {
            validator.install_rule(tag, validation, param_check)?;
        }
        Ok(validator)
    }

    /// Set the message factory for `tag`. Later calls for the same tag
    /// replace earlier ones.
    pub fn override_error_message<F>(&mut self, tag: &str, factory: F)
    where
        F: Fn(&FailedRule) -> RuleError + Send + Sync + 'static,
    {
        tracing::debug!(tag, "overriding error message");
        self.messages.set_override(tag, Arc::new(factory));
    }

    /// Set the message factory used when nothing more specific applies.
    pub fn default_error_message<F>(&mut self, factory: F)
    where
        F: Fn(&FailedRule) -> RuleError + Send + Sync + 'static,
    {
        tracing::debug!("overriding default error message");
        self.messages.set_default(Arc::new(factory));
    }

    /// Register a custom rule under `tag`.
    ///
    /// When `validation` returns an error, its message is recorded for the
    /// failing field and the engine reports the rule as failed.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if `tag` cannot be registered.
    pub fn register_rule<F>(&mut self, tag: &str, validation: F) -> Result<(), EngineError>
    where
        F: Fn(&FieldLevel<'_>) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.install_rule(tag, Arc::new(validation), None)
    }

    /// Register a custom rule under `tag` whose parameter is checked by
    /// `param_check` before any rule runs.
    ///
    /// A rejected parameter makes `validate` return `Error::Engine` with
    /// `EngineError::InvalidParam`, whatever the field values.
    ///
    /// # Errors
    ///
    /// Returns the engine's error if `tag` cannot be registered.
    pub fn register_rule_with_params<F, P>(
        &mut self,
        tag: &str,
        param_check: P,
        validation: F,
    ) -> Result<(), EngineError>
    where
        F: Fn(&FieldLevel<'_>) -> Result<(), RuleError> + Send + Sync + 'static,
        P: Fn(&str, &Target) -> Result<(), String> + Send + Sync + 'static,
    {
        self.install_rule(tag, Arc::new(validation), Some(Arc::new(param_check)))
    }

    fn install_rule(
        &mut self,
        tag: &str,
        validation: FieldValidation,
        param_check: Option<ParamCheck>,
    ) -> Result<(), EngineError> {
        let predicate: Predicate =
            Arc::new(move |level: &FieldLevel<'_>, tag_errors: &mut TagErrors| match validation(level) {
                Ok(()) => true,
                Err(error) => {
                    tag_errors.record(level.tag(), level.field_name(), error);
                    false
                }
            });
        self.engine.register(tag, predicate, param_check)?;
        tracing::debug!(tag, "registered custom rule");
        Ok(())
    }

    /// Install the templates of `config`.
    ///
    /// Every template is parsed before any is installed; on error the
    /// validator is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Template` for the first template that does not
    /// parse.
    pub fn apply_config(&mut self, config: &MessageConfig) -> Result<(), ConfigError> {
        let compiled = config.compile()?;
        if let Some(default) = compiled.default {
            self.messages.set_default(Arc::new(move |rule: &FailedRule| default.to_error(rule)));
        }
        let count = compiled.overrides.len();
        for (tag, template) in compiled.overrides {
            self.messages
                .set_override(&tag, Arc::new(move |rule: &FailedRule| template.to_error(rule)));
        }
        tracing::debug!(overrides = count, "applied message config");
        Ok(())
    }

    /// Load a YAML message config from `path` and install it.
    ///
    /// # Errors
    ///
    /// See [`MessageConfig::load`] and [`Validator::apply_config`].
    pub fn apply_config_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let config = MessageConfig::load(path)?;
        self.apply_config(&config)
    }

    /// The message registry.
    pub fn messages(&self) -> &MessageRegistry {
        &self.messages
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validate `value`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` with one message per violation, or
    /// `Error::Engine` if the value's annotations cannot be evaluated.
    pub fn validate<T: Annotated>(&self, value: &T) -> Result<(), Error> {
        let target = Target::inspect(value)?;
        self.validate_target(&target)
    }

    /// Validate an already inspected target.
    ///
    /// # Errors
    ///
    /// See [`Validator::validate`].
    pub fn validate_target(&self, target: &Target) -> Result<(), Error> {
        tracing::debug!(type_name = target.type_name(), "validating");

        let mut tag_errors = TagErrors::new();
        let failures = self.run_check(target, &mut tag_errors)?;

        let errors: Vec<RuleError> = failures
            .iter()
            .map(|rule| self.resolve(rule, &tag_errors))
            .collect();
        match ValidationErrors::new(errors) {
            None => {
                tracing::debug!(type_name = target.type_name(), "valid");
                Ok(())
            }
            Some(errors) => {
                tracing::debug!(
                    type_name = target.type_name(),
                    violations = errors.len(),
                    "invalid"
                );
                Err(Error::Invalid(errors))
            }
        }
    }

    /// Resolve one failed rule into its message.
    pub fn resolve(&self, rule: &FailedRule, tag_errors: &TagErrors) -> RuleError {
        let (tag, field) = (rule.tag(), rule.field());

        if let Some(factory) = self.messages.override_for(tag) {
            tracing::trace!(tag, field, source = "override", "resolved message");
            return factory(rule);
        }

        if let Some(contextual) = tag_errors.get(tag, field) {
            tracing::trace!(tag, field, source = "contextual", "resolved message");
            return contextual.clone();
        }

        if self.engine.is_custom(tag) {
            tracing::warn!(tag, field, "custom rule failed without a message; using default");
        } else {
            tracing::trace!(tag, field, source = "default", "resolved message");
        }
        (self.messages.default_factory())(rule)
    }

    /// Delegate the struct check to the engine.
    fn run_check(
        &self,
        target: &Target,
        tag_errors: &mut TagErrors,
    ) -> Result<Vec<FailedRule>, EngineError> {
        self.engine.check(target, tag_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagval_core::FieldValue;

    #[test]
    fn resolve_prefers_override_then_context_then_default() {
        let mut validator = Validator::new().unwrap();
        validator
            .register_rule("even", |_: &FieldLevel<'_>| Err(RuleError::new("count must be even")))
            .unwrap();
        let rule = FailedRule::new("even", "count", FieldValue::from(3_i64), "");

        let mut tag_errors = TagErrors::new();
        assert_eq!(validator.resolve(&rule, &tag_errors).message(), "3 is an invalid count");

        tag_errors.record("even", "count", RuleError::new("count must be even"));
        assert_eq!(validator.resolve(&rule, &tag_errors).message(), "count must be even");

        validator.override_error_message("even", |e| RuleError::new(format!("{} is odd", e.field())));
        assert_eq!(validator.resolve(&rule, &tag_errors).message(), "count is odd");
    }

    #[test]
    fn contextual_messages_are_per_field() {
        let validator = Validator::new().unwrap();
        let mut tag_errors = TagErrors::new();
        tag_errors.record("file", "cert", RuleError::new("Could not find file a."));

        let other = FailedRule::new("file", "key", FieldValue::from("b"), "");
        assert_eq!(validator.resolve(&other, &tag_errors).message(), "b is an invalid key");
    }

    #[test]
    fn builtin_custom_rules_are_registered() {
        let validator = Validator::new().unwrap();
        assert!(validator.engine().is_custom("file"));
        assert!(validator.engine().is_custom("required_when"));
        assert!(!validator.engine().is_custom("required"));
    }

    #[test]
    fn register_rule_propagates_engine_errors() {
        let mut validator = Validator::new().unwrap();
        let err = validator
            .register_rule("bad tag", |_: &FieldLevel<'_>| Ok(()))
            .unwrap_err();
        assert!(matches!(err, EngineError::RestrictedTag { .. }));
    }
}
