//! Regex match generator for `(pattern)`.

use prost_reflect::FieldDescriptor;

use super::fragment::{Declaration, Expr, ViolationFragment};
use super::{Generator, Target, base_bindings};
use crate::compiler::pattern::CompiledPattern;
use crate::compiler::view::ConstraintState;
use crate::template::{Binding, Placeholder};

/// Emits the match check against a per-field compiled-pattern constant.
///
/// The constant is declared exactly once per field, as the prologue; both
/// the condition and any distributed element checks reference it by name.
pub(crate) struct Match<'a> {
    state: &'a ConstraintState,
    field: &'a FieldDescriptor,
    target: Target,
    pattern: &'a CompiledPattern,
}

impl<'a> Match<'a> {
    pub(crate) fn new(
        state: &'a ConstraintState,
        field: &'a FieldDescriptor,
        target: Target,
        pattern: &'a CompiledPattern,
    ) -> Self {
        Self {
            state,
            field,
            target,
            pattern,
        }
    }

    fn constant_name(&self) -> String {
        format!("{}_pattern", self.field.name())
    }
}

impl Generator for Match<'_> {
    fn condition(&self) -> Expr {
        Expr::not(Expr::Matches {
            pattern: self.constant_name(),
            input: Box::new(self.target.expr()),
            partial: self.pattern.partial_match(),
        })
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let mut bindings = base_bindings(self.state, self.field);
        bindings.insert(Placeholder::FieldValue, Binding::Dynamic(self.target.expr()));
        bindings.insert(
            Placeholder::RegexPattern,
            Binding::Static(self.pattern.source().to_string()),
        );
        out.push(ViolationFragment {
            field_path: self.field.name().to_string(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: Some(self.target.expr()),
        });
    }

    fn prologue(&self) -> Option<Declaration> {
        Some(Declaration {
            name: self.constant_name(),
            init: Expr::PatternConstant {
                source: self.pattern.literal_source(),
                modifier: self.pattern.modifier().clone(),
            },
        })
    }
}
