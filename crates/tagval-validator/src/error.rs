//! # Error Types
//!
//! - [`ValidationErrors`] — the aggregated result of a failed validation:
//!   one resolved message per violation, in engine order.
//! - [`Error`] — what [`Validator::validate`](crate::Validator::validate)
//!   returns: either violations or an annotation defect.
//! - [`TemplateError`] / [`ConfigError`] — message template and
//!   configuration loading failures.

use std::fmt;
use std::path::PathBuf;

use tagval_core::{EngineError, RuleError};
use thiserror::Error;

/// Resolved messages for every violation of one validation call.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<RuleError>,
}

impl ValidationErrors {
    /// Wrap resolved errors, keeping their order. Returns `None` when there
    /// are none.
    pub fn new(errors: Vec<RuleError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        Some(Self { errors })
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns a slice of all resolved errors.
    pub fn errors(&self) -> &[RuleError] {
        &self.errors
    }

    /// The message text of every violation, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(RuleError::message).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Failure of a validation call.
#[derive(Error, Debug)]
pub enum Error {
    /// The value violates one or more rules.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The value's annotations could not be evaluated.
    #[error("annotation error: {0}")]
    Engine(#[from] EngineError),
}

impl Error {
    /// The violations, if this is a violation error.
    pub fn violations(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Engine(_) => None,
        }
    }
}

/// A message template could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{` has no matching `}`.
    #[error("unclosed placeholder starting at byte {position} in '{template}'")]
    Unclosed {
        /// The template text.
        template: String,
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A `}` appears outside a placeholder.
    #[error("unmatched '}}' at byte {position} in '{template}' (use '}}}}' for a literal brace)")]
    StrayBrace {
        /// The template text.
        template: String,
        /// Byte offset of the brace.
        position: usize,
    },

    /// The placeholder name is not one of `field`, `value`, `param`.
    #[error("unknown placeholder '{{{name}}}' in '{template}'")]
    UnknownPlaceholder {
        /// The template text.
        template: String,
        /// The unrecognized name.
        name: String,
    },

    /// The placeholder filter is not `lower`.
    #[error("unknown filter '{filter}' in '{template}'")]
    UnknownFilter {
        /// The template text.
        template: String,
        /// The unrecognized filter.
        filter: String,
    },
}

/// Message configuration could not be loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read message config '{}': {source}", path.display())]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid YAML for [`MessageConfig`](crate::MessageConfig).
    #[error("invalid message config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configured template could not be parsed.
    #[error("invalid template for '{tag}': {source}")]
    Template {
        /// The rule tag, or `default` for the default template.
        tag: String,
        /// The template error.
        #[source]
        source: TemplateError,
    },
}
