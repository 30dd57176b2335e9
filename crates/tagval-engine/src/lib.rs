//! # tagval-engine — Rule Evaluation
//!
//! Evaluates rule annotations against struct values and reports every
//! violation as a [`FailedRule`](tagval_core::FailedRule). The engine knows
//! nothing about messages; `tagval-validator` turns its output into
//! readable errors.
//!
//! ## Annotations
//!
//! A struct opts in by implementing [`Annotated`]: it lists, per field and
//! in declaration order, a tag string such as `"required,oneof=tcp http"`.
//! The struct is inspected by serializing it with `serde_json`, so field
//! names are the serialized names.
//!
//! ## Evaluation Order
//!
//! Fields are evaluated in annotation order and rules in tag order. The
//! first failing rule of a field ends that field's evaluation, so a field
//! contributes at most one violation per check.
//!
//! ## Extension
//!
//! Custom rules are registered as [`Predicate`]s. Each predicate sees the
//! field through a [`FieldLevel`] and receives the per-call
//! [`TagErrors`](tagval_core::TagErrors) record, in which it may leave a
//! contextual message for the orchestrator.
//!
//! ## Crate Policy
//!
//! - Depends only on `tagval-core` internally.
//! - Annotation defects are [`EngineError`](tagval_core::EngineError)s,
//!   never violations.

pub mod annotated;
pub mod builtin;
pub mod engine;
pub mod field;
pub mod tags;

pub use annotated::{Annotated, FieldRules, Target};
pub use engine::{ParamCheck, Predicate, RuleEngine, TagEngine};
pub use field::FieldLevel;
pub use tags::{parse_tags, TagRule, OMITEMPTY};
