//! # Message Configuration
//!
//! Violation messages can be supplied as YAML instead of code:
//!
//! ```yaml
//! default: "{field|lower} has an unexpected value '{value}'"
//! overrides:
//!   oneof: "{field|lower} must be one of: {param}"
//!   file: "{field|lower} points at a missing file ({value})"
//! ```
//!
//! Every entry is a [`MessageTemplate`]. Unknown keys are rejected.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TemplateError};
use crate::template::MessageTemplate;

/// Template-based message configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageConfig {
    /// Template for the default factory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Templates keyed by rule tag.
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

/// A configuration with every template parsed.
#[derive(Debug, Clone)]
pub(crate) struct CompiledMessages {
    pub(crate) default: Option<MessageTemplate>,
    pub(crate) overrides: Vec<(String, MessageTemplate)>,
}

impl MessageConfig {
    /// Parse a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Yaml` if the text is not a valid configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read and
    /// `ConfigError::Yaml` if it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse every template.
    pub(crate) fn compile(&self) -> Result<CompiledMessages, ConfigError> {
        let template_error = |tag: &str| {
            let tag = tag.to_string();
            move |source: TemplateError| ConfigError::Template { tag, source }
        };

        let default = self
            .default
            .as_deref()
            .map(|text| MessageTemplate::parse(text).map_err(template_error("default")))
            .transpose()?;

        let overrides = self
            .overrides
            .iter()
            .map(|(tag, text)| {
                MessageTemplate::parse(text)
                    .map(|template| (tag.clone(), template))
                    .map_err(template_error(tag.as_str()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledMessages { default, overrides })
    }
}
