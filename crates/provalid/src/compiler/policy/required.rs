//! `(required)` and its companion `(if_missing)`.

use provalid_options as opts;

use super::{PolicyContext, emit_companion, emit_primary, expect_field};
use crate::compiler::OptionKind;
use crate::compiler::fact::OptionFact;
use crate::compiler::shape;
use crate::compiler::view::{ConstraintPayload, Discovered};
use crate::error::DiagnosticKind;
use crate::template::Placeholder;

const SUPPORTED: &[Placeholder] = &[
    Placeholder::FieldPath,
    Placeholder::ParentType,
    Placeholder::FieldType,
];
const DEFAULT: &str = "`${field_path}` is required";
const SHAPES: &str = "fields with a distinguishable unset value";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::RequiredOption,
) -> Vec<Discovered> {
    let Some(field) = expect_field(ctx, fact, SHAPES) else {
        return Vec::new();
    };
    if shape::unset_value(field.descriptor()).is_none() {
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
        // Declared but disabled: accepted and inert.
        return Vec::new();
    }
    emit_primary(
        ctx,
        fact,
        OptionKind::Required,
        SUPPORTED,
        DEFAULT,
        "",
        ConstraintPayload::Required,
    )
}

pub(super) fn companion(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::IfMissingOption,
) -> Vec<Discovered> {
    emit_companion(
        ctx,
        fact,
        "(required)",
        OptionKind::Required,
        SUPPORTED,
        &opt.msg_format,
    )
}
