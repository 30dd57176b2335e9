//! Field-level view handed to every rule.

use tagval_core::FieldValue;

use crate::annotated::Target;

/// One field under evaluation, with access to its parent struct.
#[derive(Debug, Clone, Copy)]
pub struct FieldLevel<'a> {
    parent: &'a Target,
    field: &'a str,
    value: &'a FieldValue,
    tag: &'a str,
    param: &'a str,
}

impl<'a> FieldLevel<'a> {
    /// View `field` of `parent` under rule `tag` with parameter `param`.
    pub fn new(
        parent: &'a Target,
        field: &'a str,
        value: &'a FieldValue,
        tag: &'a str,
        param: &'a str,
    ) -> Self {
        Self {
            parent,
            field,
            value,
            tag,
            param,
        }
    }

    /// The field name as declared.
    pub fn field_name(&self) -> &'a str {
        self.field
    }

    /// The field's current value.
    pub fn value(&self) -> &'a FieldValue {
        self.value
    }

    /// The rule being evaluated.
    pub fn tag(&self) -> &'a str {
        self.tag
    }

    /// The rule's declared parameter; empty when none was given.
    pub fn param(&self) -> &'a str {
        self.param
    }

    /// The struct the field belongs to.
    pub fn parent(&self) -> &'a Target {
        self.parent
    }

    /// Value of a sibling field.
    pub fn sibling(&self, name: &str) -> Option<&'a FieldValue> {
        self.parent.field(name)
    }
}
