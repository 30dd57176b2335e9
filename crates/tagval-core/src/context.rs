//! # Per-Call Contextual Errors
//!
//! Custom rules can produce messages that depend on more than the failed
//! field's own value (e.g. the value of a sibling field). Those messages are
//! recorded in a [`TagErrors`] while the engine runs and read back when the
//! orchestrator resolves the engine's [`FailedRule`](crate::FailedRule)s.
//!
//! A `TagErrors` is created empty for each validation call and passed down
//! explicitly; it is never stored on a shared validator. Entries are keyed
//! by `(tag, field)`, so two fields failing the same custom rule in one
//! call keep their own messages.

use std::collections::HashMap;

use crate::error::RuleError;

/// Contextual messages recorded by custom rules during one validation call.
#[derive(Debug, Clone, Default)]
pub struct TagErrors {
    by_tag: HashMap<String, HashMap<String, RuleError>>,
}

impl TagErrors {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `error` for `tag` on `field`, replacing any earlier entry.
    pub fn record(&mut self, tag: &str, field: &str, error: RuleError) {
        self.by_tag
            .entry(tag.to_string())
            .or_default()
            .insert(field.to_string(), error);
    }

    /// The message recorded for `tag` on `field`, if any.
    pub fn get(&self, tag: &str, field: &str) -> Option<&RuleError> {
        self.by_tag.get(tag).and_then(|fields| fields.get(field))
    }

    /// Number of recorded messages.
    pub fn len(&self) -> usize {
        self.by_tag.values().map(HashMap::len).sum()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
