//! `(distinct)` and its companion `(if_has_duplicates)`.

use provalid_options as opts;

use super::{PolicyContext, emit_companion, emit_primary, expect_field};
use crate::compiler::OptionKind;
use crate::compiler::fact::OptionFact;
use crate::compiler::shape::{self, FieldShape};
use crate::compiler::view::{ConstraintPayload, Discovered};
use crate::error::DiagnosticKind;
use crate::template::Placeholder;

const SUPPORTED: &[Placeholder] = &[
    Placeholder::FieldPath,
    Placeholder::ParentType,
    Placeholder::FieldType,
    Placeholder::Duplicates,
];
const DEFAULT: &str = "`${field_path}` must not contain duplicates, found ${duplicates}";
// Map keys are unique by construction, so only lists qualify.
const SHAPES: &str = "repeated fields";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::DistinctOption,
) -> Vec<Discovered> {
    let Some(field) = expect_field(ctx, fact, SHAPES) else {
        return Vec::new();
    };
    if FieldShape::of(field.descriptor()) != FieldShape::Repeated {
        ctx.report(
            fact,
            DiagnosticKind::TypeUnsupported {
                option: fact.payload.option_name(),
                actual: shape::describe_field(field.descriptor()),
                supported: SHAPES,
            },
        );
        return Vec::new();
    }
    if !opt.value {
        return Vec::new();
    }
    emit_primary(
        ctx,
        fact,
        OptionKind::Distinct,
        SUPPORTED,
        DEFAULT,
        "",
        ConstraintPayload::Distinct,
    )
}

pub(super) fn companion(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::IfHasDuplicatesOption,
) -> Vec<Discovered> {
    emit_companion(
        ctx,
        fact,
        "(distinct)",
        OptionKind::Distinct,
        SUPPORTED,
        &opt.msg_format,
    )
}
