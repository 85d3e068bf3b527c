//! `(min)`, `(max)` and `(range)`.

use provalid_options as opts;

use super::{PolicyContext, emit_primary, expect_field};
use crate::compiler::OptionKind;
use crate::compiler::bound::{Bound, BoundValue, NumericKind, Range};
use crate::compiler::fact::{FieldRef, OptionFact};
use crate::compiler::shape;
use crate::compiler::view::{ConstraintPayload, Discovered};
use crate::error::DiagnosticKind;
use crate::template::Placeholder;

const MIN_SUPPORTED: &[Placeholder] = &[
    Placeholder::FieldPath,
    Placeholder::ParentType,
    Placeholder::FieldType,
    Placeholder::FieldValue,
    Placeholder::MinValue,
];
const MAX_SUPPORTED: &[Placeholder] = &[
    Placeholder::FieldPath,
    Placeholder::ParentType,
    Placeholder::FieldType,
    Placeholder::FieldValue,
    Placeholder::MaxValue,
];
const RANGE_SUPPORTED: &[Placeholder] = &[
    Placeholder::FieldPath,
    Placeholder::ParentType,
    Placeholder::FieldType,
    Placeholder::FieldValue,
    Placeholder::MinValue,
    Placeholder::MaxValue,
    Placeholder::RangeValues,
];
const SHAPES: &str = "numeric fields and collections of numerics";

pub(super) fn min(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::MinOption,
) -> Vec<Discovered> {
    let Some((field, kind)) = numeric_subject(ctx, fact) else {
        return Vec::new();
    };
    let value = match BoundValue::parse(kind, &opt.value) {
        Ok(value) => value,
        Err(detail) => {
            ctx.report(
                fact,
                DiagnosticKind::MalformedRangeNotation {
                    notation: opt.value.clone(),
                    detail,
                },
            );
            return Vec::new();
        }
    };
    warn_unsigned(ctx, fact, &field, kind);
    let default = if opt.exclusive {
        "`${field_path}` must be greater than ${min_value}"
    } else {
        "`${field_path}` must be at least ${min_value}"
    };
    emit_primary(
        ctx,
        fact,
        OptionKind::Min,
        MIN_SUPPORTED,
        default,
        &opt.msg_format,
        ConstraintPayload::Bounds(Range::at_least(Bound::new(value, opt.exclusive))),
    )
}

pub(super) fn max(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::MaxOption,
) -> Vec<Discovered> {
    let Some((field, kind)) = numeric_subject(ctx, fact) else {
        return Vec::new();
    };
    let value = match BoundValue::parse(kind, &opt.value) {
        Ok(value) => value,
        Err(detail) => {
            ctx.report(
                fact,
                DiagnosticKind::MalformedRangeNotation {
                    notation: opt.value.clone(),
                    detail,
                },
            );
            return Vec::new();
        }
    };
    warn_unsigned(ctx, fact, &field, kind);
    let default = if opt.exclusive {
        "`${field_path}` must be less than ${max_value}"
    } else {
        "`${field_path}` must be at most ${max_value}"
    };
    emit_primary(
        ctx,
        fact,
        OptionKind::Max,
        MAX_SUPPORTED,
        default,
        &opt.msg_format,
        ConstraintPayload::Bounds(Range::at_most(Bound::new(value, opt.exclusive))),
    )
}

pub(super) fn range(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::RangeOption,
) -> Vec<Discovered> {
    let Some((field, kind)) = numeric_subject(ctx, fact) else {
        return Vec::new();
    };
    let range = match Range::parse(&opt.value, kind) {
        Ok(range) => range,
        Err(detail) => {
            ctx.report(
                fact,
                DiagnosticKind::MalformedRangeNotation {
                    notation: opt.value.clone(),
                    detail,
                },
            );
            return Vec::new();
        }
    };
    warn_unsigned(ctx, fact, &field, kind);
    emit_primary(
        ctx,
        fact,
        OptionKind::Range,
        RANGE_SUPPORTED,
        "`${field_path}` must be in range ${range_values}",
        &opt.msg_format,
        ConstraintPayload::Bounds(range),
    )
}

fn numeric_subject(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
) -> Option<(FieldRef, NumericKind)> {
    let field = expect_field(ctx, fact, SHAPES)?.clone();
    match NumericKind::of(&shape::element_kind(field.descriptor())) {
        Some(kind) => Some((field, kind)),
        None => {
            ctx.report(
                fact,
                DiagnosticKind::TypeUnsupported {
                    option: fact.payload.option_name(),
                    actual: shape::describe_field(field.descriptor()),
                    supported: SHAPES,
                },
            );
            None
        }
    }
}

fn warn_unsigned(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    field: &FieldRef,
    kind: NumericKind,
) {
    if kind.is_unsigned() {
        ctx.report(
            fact,
            DiagnosticKind::UnsignedPrimitiveCaveat {
                field: field.name().to_string(),
                kind: kind.name(),
            },
        );
    }
}
