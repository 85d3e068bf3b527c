//! Temporal generator for `(when)`.

use prost_reflect::FieldDescriptor;

use provalid_options::Time;

use super::fragment::{CmpOp, Expr, ViolationFragment};
use super::{Generator, Target, base_bindings};
use crate::compiler::view::ConstraintState;
use crate::template::{Binding, Placeholder};

/// `(when)`: a timestamp field must lie in the past or the future relative
/// to the moment of validation. Unset fields are never violations; the
/// restriction only binds once a value is present.
pub(crate) struct When<'a> {
    state: &'a ConstraintState,
    field: &'a FieldDescriptor,
    target: Target,
    time: Time,
}

impl<'a> When<'a> {
    pub(crate) fn new(
        state: &'a ConstraintState,
        field: &'a FieldDescriptor,
        target: Target,
        time: Time,
    ) -> Self {
        Self {
            state,
            field,
            target,
            time,
        }
    }

    fn restriction(&self) -> Option<(CmpOp, &'static str)> {
        match self.time {
            // Past: a value after now violates. Future: a value before now.
            Time::Past => Some((CmpOp::Gt, "past")),
            Time::Future => Some((CmpOp::Lt, "future")),
            Time::TimeUndefined => None,
        }
    }
}

impl Generator for When<'_> {
    fn condition(&self) -> Expr {
        let Some((op, _)) = self.restriction() else {
            // Undefined restrictions are rejected at policy time.
            return Expr::Bool(false);
        };
        let out_of_time = Expr::compare(op, self.target.expr(), Expr::CurrentTime);
        match &self.target {
            Target::Field(name) => Expr::and(Expr::field_is_set(name.clone()), out_of_time),
            // Elements of a present collection are always present.
            Target::Element => out_of_time,
        }
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let mut bindings = base_bindings(self.state, self.field);
        bindings.insert(Placeholder::FieldValue, Binding::Dynamic(self.target.expr()));
        if let Some((_, direction)) = self.restriction() {
            bindings.insert(Placeholder::WhenIn, Binding::Static(direction.to_string()));
        }
        out.push(ViolationFragment {
            field_path: self.field.name().to_string(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: Some(self.target.expr()),
        });
    }
}
