//! # Tag Parsing
//!
//! A field's tag string is a comma-separated list of rules. Each rule is a
//! bare name (`required`) or a name and parameter joined by the first `=`
//! (`oneof=tcp http`). Parameters are passed to rules verbatim; spaces are
//! significant.
//!
//! `omitempty` is not a rule: it stops evaluation of the field when the
//! value is zero.

/// Tag that skips the rest of a field's rules for zero values.
pub const OMITEMPTY: &str = "omitempty";

/// One parsed rule of a tag string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagRule<'a> {
    /// Rule name.
    pub name: &'a str,
    /// Declared parameter, empty if none.
    pub param: &'a str,
}

/// Parse a tag string into its rules, in order.
///
/// An empty tag string yields no rules.
///
/// # Errors
///
/// Returns a description of the defect for empty rule names and for
/// `omitempty` given a parameter.
pub fn parse_tags(tags: &str) -> Result<Vec<TagRule<'_>>, String> {
    if tags.is_empty() {
        return Ok(Vec::new());
    }

    tags.split(',')
        .enumerate()
        .map(|(index, raw)| {
            let (name, param) = raw.split_once('=').unwrap_or((raw, ""));
            if name.is_empty() {
                return Err(format!("rule #{} has an empty name", index + 1));
            }
            if name == OMITEMPTY && raw.contains('=') {
                return Err(format!("'{OMITEMPTY}' does not take a parameter"));
            }
            Ok(TagRule { name, param })
        })
        .collect()
}
