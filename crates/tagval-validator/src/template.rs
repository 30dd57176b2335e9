//! # Message Templates
//!
//! Text templates for violation messages, used by [`MessageConfig`](crate::MessageConfig)
//! and available to callers building their own factories.
//!
//! Placeholders:
//!
//! - `{field}` — the field name as declared;
//! - `{value}` — the rejected value;
//! - `{param}` — the rule's declared parameter.
//!
//! Any placeholder accepts the `lower` filter: `{field|lower}`. Literal
//! braces are written `{{` and `}}`.

use std::fmt;
use std::str::FromStr;

use tagval_core::{FailedRule, RuleError};

use crate::error::TemplateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Field,
    Value,
    Param,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder { slot: Slot, lower: bool },
}

/// A parsed violation message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`TemplateError`] for unbalanced braces, unknown
    /// placeholder names and unknown filters.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((position, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut inner = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed {
                            template: source.to_string(),
                            position,
                        });
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(source, &inner)?);
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => {
                    return Err(TemplateError::StrayBrace {
                        template: source.to_string(),
                        position,
                    });
                }
                other => literal.push(other),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render the message for `rule`.
    pub fn render(&self, rule: &FailedRule) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { slot, lower } => {
                    let text = match slot {
                        Slot::Field => rule.field().to_string(),
                        Slot::Value => rule.value().to_string(),
                        Slot::Param => rule.param().to_string(),
                    };
                    if *lower {
                        out.push_str(&text.to_lowercase());
                    } else {
                        out.push_str(&text);
                    }
                }
            }
        }
        out
    }

    /// Render the message for `rule` as a [`RuleError`].
    pub fn to_error(&self, rule: &FailedRule) -> RuleError {
        RuleError::new(self.render(rule))
    }
}

fn parse_placeholder(template: &str, inner: &str) -> Result<Segment, TemplateError> {
    let (name, filter) = match inner.split_once('|') {
        Some((name, filter)) => (name, Some(filter)),
        None => (inner, None),
    };

    let slot = match name {
        "field" => Slot::Field,
        "value" => Slot::Value,
        "param" => Slot::Param,
        other => {
            return Err(TemplateError::UnknownPlaceholder {
                template: template.to_string(),
                name: other.to_string(),
            })
        }
    };

    let lower = match filter {
        None => false,
        Some("lower") => true,
        Some(other) => {
            return Err(TemplateError::UnknownFilter {
                template: template.to_string(),
                filter: other.to_string(),
            })
        }
    };

    Ok(Segment::Placeholder { slot, lower })
}

impl FromStr for MessageTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MessageTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagval_core::FieldValue;

    fn rule() -> FailedRule {
        FailedRule::new("required_without", "Host", FieldValue::from(""), "Addr")
    }

    #[test]
    fn renders_placeholders_and_filters() {
        let t = MessageTemplate::parse("{field|lower} is required when {param|lower} is not set").unwrap();
        assert_eq!(t.render(&rule()), "host is required when addr is not set");

        let t = MessageTemplate::parse("{field}/{param}").unwrap();
        assert_eq!(t.render(&rule()), "Host/Addr");
    }

    #[test]
    fn renders_value() {
        let rule = FailedRule::new("oneof", "proto", FieldValue::from("ftp"), "tcp http");
        let t: MessageTemplate = "{value} is invalid. Valid values are {param}.".parse().unwrap();
        assert_eq!(t.to_error(&rule).message(), "ftp is invalid. Valid values are tcp http.");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let t = MessageTemplate::parse("{{{field}}} must be set").unwrap();
        assert_eq!(t.render(&rule()), "{Host} must be set");
        assert_eq!(t.as_str(), "{{{field}}} must be set");
    }

    #[test]
    fn template_without_placeholders() {
        let t = MessageTemplate::parse("invalid").unwrap();
        assert_eq!(t.render(&rule()), "invalid");
        assert_eq!(MessageTemplate::parse("").unwrap().render(&rule()), "");
    }

    #[test]
    fn rejects_malformed_templates() {
        assert!(matches!(
            MessageTemplate::parse("{field is required"),
            Err(TemplateError::Unclosed { position: 0, .. })
        ));
        assert!(matches!(
            MessageTemplate::parse("field} is required"),
            Err(TemplateError::StrayBrace { position: 5, .. })
        ));
        assert!(matches!(
            MessageTemplate::parse("{name} is required"),
            Err(TemplateError::UnknownPlaceholder { ref name, .. }) if name == "name"
        ));
        assert!(matches!(
            MessageTemplate::parse("{field|upper} is required"),
            Err(TemplateError::UnknownFilter { ref filter, .. }) if filter == "upper"
        ));
    }
}
