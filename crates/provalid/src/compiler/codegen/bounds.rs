//! Bounds generator shared by `(min)`, `(max)` and `(range)`.

use prost_reflect::FieldDescriptor;

use super::fragment::{CmpOp, Expr, ViolationFragment};
use super::{Generator, Target, base_bindings};
use crate::compiler::bound::{Bound, BoundValue, Range};
use crate::compiler::view::ConstraintState;
use crate::template::{Binding, Placeholder};

/// Emits the out-of-bounds check for a one- or two-sided numeric range.
pub(crate) struct Bounds<'a> {
    state: &'a ConstraintState,
    field: &'a FieldDescriptor,
    target: Target,
    range: &'a Range,
}

impl<'a> Bounds<'a> {
    pub(crate) fn new(
        state: &'a ConstraintState,
        field: &'a FieldDescriptor,
        target: Target,
        range: &'a Range,
    ) -> Self {
        Self {
            state,
            field,
            target,
            range,
        }
    }
}

impl Generator for Bounds<'_> {
    fn condition(&self) -> Expr {
        let low = self.range.lower.as_ref().map(|bound| {
            // Inclusive lower bound: value < bound violates. Exclusive:
            // the bound itself violates too.
            let op = if bound.exclusive { CmpOp::Le } else { CmpOp::Lt };
            Expr::compare(op, self.target.expr(), literal(&bound.value))
        });
        let high = self.range.upper.as_ref().map(|bound| {
            let op = if bound.exclusive { CmpOp::Ge } else { CmpOp::Gt };
            Expr::compare(op, self.target.expr(), literal(&bound.value))
        });
        match (low, high) {
            (Some(low), Some(high)) => Expr::or(low, high),
            (Some(side), None) | (None, Some(side)) => side,
            // A range without bounds never survives its policy.
            (None, None) => Expr::Bool(false),
        }
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let mut bindings = base_bindings(self.state, self.field);
        bindings.insert(Placeholder::FieldValue, Binding::Dynamic(self.target.expr()));
        if let Some(bound) = &self.range.lower {
            bindings.insert(
                Placeholder::MinValue,
                Binding::Static(bound.value.to_string()),
            );
        }
        if let Some(bound) = &self.range.upper {
            bindings.insert(
                Placeholder::MaxValue,
                Binding::Static(bound.value.to_string()),
            );
        }
        bindings.insert(
            Placeholder::RangeValues,
            Binding::Static(notation(self.range)),
        );
        out.push(ViolationFragment {
            field_path: self.field.name().to_string(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: Some(self.target.expr()),
        });
    }
}

pub(super) fn literal(value: &BoundValue) -> Expr {
    match value {
        BoundValue::Int32(v) => Expr::Int(i64::from(*v)),
        BoundValue::Int64(v) => Expr::Int(*v),
        #[allow(clippy::cast_sign_loss)]
        BoundValue::UInt32(v) => Expr::UInt(u64::from(*v as u32)),
        #[allow(clippy::cast_sign_loss)]
        BoundValue::UInt64(v) => Expr::UInt(*v as u64),
        BoundValue::Float(v) => Expr::Float(f64::from(*v)),
        BoundValue::Double(v) => Expr::Float(*v),
    }
}

/// The bracket notation of a range, with an unconstrained side left open,
/// e.g. `[0..10)` or `[1..]`.
fn notation(range: &Range) -> String {
    fn side(bound: Option<&Bound>) -> String {
        bound.map(|b| b.value.to_string()).unwrap_or_default()
    }
    let open = match &range.lower {
        Some(bound) if bound.exclusive => '(',
        _ => '[',
    };
    let close = match &range.upper {
        Some(bound) if bound.exclusive => ')',
        _ => ']',
    };
    format!(
        "{open}{}..{}{close}",
        side(range.lower.as_ref()),
        side(range.upper.as_ref())
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Bounds, notation};
    use crate::compiler::OptionKind;
    use crate::compiler::bound::{Bound, BoundValue, Range};
    use crate::compiler::codegen::fragment::{CmpOp, Expr};
    use crate::compiler::codegen::{Generator, Target};
    use crate::compiler::fact::SubjectKey;
    use crate::compiler::view::{ConstraintPayload, ConstraintState};
    use crate::template::Template;
    use crate::testutil::order_schema;

    fn state(range: Range, kind: OptionKind) -> ConstraintState {
        ConstraintState {
            subject: SubjectKey {
                declaring_type: "acme.Order".to_string(),
                name: "age".to_string(),
            },
            kind,
            message: Template::parse("`${field_path}` must be in ${range_values}"),
            custom_message: false,
            payload: ConstraintPayload::Bounds(range),
        }
    }

    #[test]
    fn inclusive_min_violates_strictly_below_the_bound() {
        let schema = order_schema();
        let field = schema.field("age");
        let range = Range::at_least(Bound::new(BoundValue::Int32(0), false));
        let state = state(range, OptionKind::Min);
        let generator = Bounds::new(&state, &field, Target::Field("age".to_string()), &range);

        // age = -1 violates, age = 0 does not: strict less-than.
        assert_eq!(
            generator.condition(),
            Expr::compare(CmpOp::Lt, Expr::field_value("age"), Expr::Int(0))
        );
    }

    #[test]
    fn exclusive_bounds_reject_the_bound_itself() {
        let schema = order_schema();
        let field = schema.field("age");
        let range = Range {
            lower: Some(Bound::new(BoundValue::Int32(0), false)),
            upper: Some(Bound::new(BoundValue::Int32(10), true)),
        };
        let state = state(range, OptionKind::Range);
        let generator = Bounds::new(&state, &field, Target::Field("age".to_string()), &range);

        assert_eq!(
            generator.condition(),
            Expr::or(
                Expr::compare(CmpOp::Lt, Expr::field_value("age"), Expr::Int(0)),
                Expr::compare(CmpOp::Ge, Expr::field_value("age"), Expr::Int(10)),
            )
        );
    }

    #[test]
    fn unsigned_bounds_embed_as_unsigned_literals() {
        let schema = order_schema();
        let field = schema.field("count");
        // 4294967295 is stored as the signed bit pattern -1.
        let range = Range::at_most(Bound::new(BoundValue::UInt32(-1), false));
        let state = state(range, OptionKind::Max);
        let generator = Bounds::new(&state, &field, Target::Field("count".to_string()), &range);

        assert_eq!(
            generator.condition(),
            Expr::compare(
                CmpOp::Gt,
                Expr::field_value("count"),
                Expr::UInt(4_294_967_295)
            )
        );
    }

    #[test]
    fn range_message_renders_the_bracket_notation() {
        let range = Range {
            lower: Some(Bound::new(BoundValue::Int32(0), false)),
            upper: Some(Bound::new(BoundValue::Int32(10), true)),
        };
        assert_eq!(notation(&range), "[0..10)");
        assert_eq!(
            notation(&Range::at_least(Bound::new(BoundValue::Int64(1), false))),
            "[1..]"
        );
    }
}
