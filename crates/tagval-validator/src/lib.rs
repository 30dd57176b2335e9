//! # tagval-validator — Readable Struct Validation
//!
//! Runs annotated structs through a [`RuleEngine`](tagval_engine::RuleEngine)
//! and turns every violation into a message a user can read.
//!
//! ## Message Resolution
//!
//! For each failed rule the [`Validator`] picks the first available of:
//!
//! 1. the override factory registered for the rule's tag;
//! 2. the contextual message the rule itself recorded during this call
//!    (custom rules only, see [`rules`]);
//! 3. the default factory.
//!
//! All messages of one call are returned together as [`ValidationErrors`],
//! whose text is the messages joined by newlines.
//!
//! ## Configuration
//!
//! Messages can be changed in code ([`Validator::override_error_message`],
//! [`Validator::default_error_message`]) or from a YAML file of
//! [`MessageTemplate`]s ([`MessageConfig`]).
//!
//! ## Crate Policy
//!
//! - A `Validator` holds no per-call state; `validate` takes `&self` and is
//!   safe to call concurrently.
//! - Annotation defects surface as [`Error::Engine`] and are never
//!   rewritten into violation messages.

pub mod config;
pub mod error;
pub mod registry;
pub mod rules;
pub mod template;
pub mod validator;

pub use config::MessageConfig;
pub use error::{ConfigError, Error, TemplateError, ValidationErrors};
pub use registry::{ErrorFactory, MessageRegistry};
pub use rules::FieldValidation;
pub use template::MessageTemplate;
pub use validator::Validator;

pub use tagval_core::{EngineError, FailedRule, FieldValue, RuleError, TagErrors};
pub use tagval_engine::{
    Annotated, FieldLevel, FieldRules, ParamCheck, Predicate, RuleEngine, TagEngine, Target,
};
