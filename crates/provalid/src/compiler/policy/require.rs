//! `(require)`: message-wide boolean combinations of field presence.

use provalid_options as opts;

use super::{PolicyContext, emit_primary, expect_message};
use crate::compiler::OptionKind;
use crate::compiler::fact::OptionFact;
use crate::compiler::rule::parse_combination;
use crate::compiler::shape;
use crate::compiler::view::{ConstraintPayload, Discovered};
use crate::error::DiagnosticKind;
use crate::template::Placeholder;

const SUPPORTED: &[Placeholder] = &[
    Placeholder::ParentType,
    Placeholder::RequireExpression,
    Placeholder::OperatorName,
];
const DEFAULT: &str = "`${parent_type}` requires ${require_expression}";
const SHAPES: &str = "whole messages";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::RequireOption,
) -> Vec<Discovered> {
    if !expect_message(ctx, fact, SHAPES) {
        return Vec::new();
    }

    let rule = match parse_combination(&opt.fields) {
        Ok(rule) => rule,
        Err(detail) => {
            ctx.report(
                fact,
                DiagnosticKind::MalformedCombination {
                    expression: opt.fields.clone(),
                    detail,
                },
            );
            return Vec::new();
        }
    };

    // Every operand must be a declared field whose presence is observable.
    let declaring = fact.subject.declaring_type();
    for name in rule.field_names() {
        let Some(field) = declaring.get_field_by_name(name) else {
            ctx.report(
                fact,
                DiagnosticKind::UnknownCompanionField {
                    option: fact.payload.option_name(),
                    field: name.to_string(),
                    declaring_type: declaring.full_name().to_string(),
                },
            );
            return Vec::new();
        };
        if shape::unset_value(&field).is_none() && !field.supports_presence() {
            ctx.report(
                fact,
                DiagnosticKind::TypeUnsupported {
                    option: fact.payload.option_name(),
                    actual: shape::describe_field(&field),
                    supported: "operands with a distinguishable unset value",
                },
            );
            return Vec::new();
        }
    }

    emit_primary(
        ctx,
        fact,
        OptionKind::Require,
        SUPPORTED,
        DEFAULT,
        &opt.msg_format,
        ConstraintPayload::Require {
            rule,
            expression: opt.fields.clone(),
        },
    )
}
