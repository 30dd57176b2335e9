//! # tagval-core — Foundational Types for tagval
//!
//! Leaf crate of the workspace. It defines the values that flow between
//! the rule-evaluation engine (`tagval-engine`) and the message-resolving
//! orchestrator (`tagval-validator`):
//!
//! - [`FieldValue`] — the value of one struct field as seen by the engine.
//! - [`FailedRule`] — one rule violation reported by the engine.
//! - [`RuleError`] — a fully formed, human-readable violation message.
//! - [`TagErrors`] — the per-call record of contextual messages produced by
//!   custom rules. It lives for exactly one validation call.
//! - [`EngineError`] — annotation errors: malformed tags, unknown rules,
//!   structs the engine cannot inspect.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tagval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod error;
pub mod rule;
pub mod value;

pub use context::TagErrors;
pub use error::{EngineError, RuleError};
pub use rule::FailedRule;
pub use value::FieldValue;
