//! Presence generators: `(required)`, `(goes)` and `(set_once)`.

use prost_reflect::FieldDescriptor;

use super::fragment::{CmpOp, Expr, ViolationFragment};
use super::{Generator, base_bindings};
use crate::compiler::view::ConstraintState;
use crate::template::{Binding, Placeholder};

/// `(required)`: the field must not hold its type's unset value.
pub(crate) struct Required<'a> {
    state: &'a ConstraintState,
    field: &'a FieldDescriptor,
}

impl<'a> Required<'a> {
    pub(crate) fn new(state: &'a ConstraintState, field: &'a FieldDescriptor) -> Self {
        Self { state, field }
    }
}

impl Generator for Required<'_> {
    fn condition(&self) -> Expr {
        Expr::not(Expr::field_is_set(self.field.name()))
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

/// `(goes)`: when the field is set, the companion field must be set too.
/// An unset subject never violates.
pub(crate) struct Goes<'a> {
    state: &'a ConstraintState,
    field: &'a FieldDescriptor,
    companion: &'a str,
}

impl<'a> Goes<'a> {
    pub(crate) fn new(
        state: &'a ConstraintState,
        field: &'a FieldDescriptor,
        companion: &'a str,
    ) -> Self {
        Self {
            state,
            field,
            companion,
        }
    }
}

impl Generator for Goes<'_> {
    fn condition(&self) -> Expr {
        Expr::and(
            Expr::field_is_set(self.field.name()),
            Expr::not(Expr::field_is_set(self.companion)),
        )
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let mut bindings = base_bindings(self.state, self.field);
        bindings.insert(
            Placeholder::GoesCompanion,
            Binding::Static(self.companion.to_string()),
        );
        out.push(ViolationFragment {
            field_path: self.field.name().to_string(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: None,
        });
    }
}

/// `(set_once)`: a builder may not overwrite an already-set field with a
/// different value. Re-assigning the same value is allowed.
pub(crate) struct SetOnce<'a> {
    state: &'a ConstraintState,
    field: &'a FieldDescriptor,
}

impl<'a> SetOnce<'a> {
    pub(crate) fn new(state: &'a ConstraintState, field: &'a FieldDescriptor) -> Self {
        Self { state, field }
    }

    fn proposed(&self) -> Expr {
        Expr::ProposedValue {
            field: self.field.name().to_string(),
        }
    }
}

impl Generator for SetOnce<'_> {
    fn condition(&self) -> Expr {
        Expr::and(
            Expr::field_is_set(self.field.name()),
            Expr::compare(
                CmpOp::Ne,
                self.proposed(),
                Expr::field_value(self.field.name()),
            ),
        )
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let mut bindings = base_bindings(self.state, self.field);
        bindings.insert(
            Placeholder::FieldValue,
            Binding::Dynamic(Expr::field_value(self.field.name())),
        );
        bindings.insert(
            Placeholder::FieldProposedValue,
            Binding::Dynamic(self.proposed()),
        );
        out.push(ViolationFragment {
            field_path: self.field.name().to_string(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: Some(self.proposed()),
        });
    }
}
