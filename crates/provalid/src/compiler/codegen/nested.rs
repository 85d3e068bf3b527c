//! Nested-validation generator for `(validate)`.

use prost_reflect::FieldDescriptor;

use super::fragment::{Expr, ViolationFragment};
use super::{Generator, Target, base_bindings};
use crate::compiler::view::ConstraintState;

/// `(validate)`: a message-typed field must itself satisfy its own type's
/// constraints. An unset field is not a violation; `(required)` covers
/// presence separately.
pub(crate) struct Validate<'a> {
    state: &'a ConstraintState,
    field: &'a FieldDescriptor,
    target: Target,
}

impl<'a> Validate<'a> {
    pub(crate) fn new(
        state: &'a ConstraintState,
        field: &'a FieldDescriptor,
        target: Target,
    ) -> Self {
        Self {
            state,
            field,
            target,
        }
    }
}

impl Generator for Validate<'_> {
    fn condition(&self) -> Expr {
        let invalid = Expr::NestedInvalid {
            value: Box::new(self.target.expr()),
        };
        match &self.target {
            Target::Field(name) => Expr::and(Expr::field_is_set(name.clone()), invalid),
            Target::Element => invalid,
        }
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let bindings = base_bindings(self.state, self.field);
        out.push(ViolationFragment {
            field_path: self.field.name().to_string(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: None,
        });
    }
}
