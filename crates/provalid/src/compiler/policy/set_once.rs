//! `(set_once)` and its companion `(if_set_again)`.

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
    Placeholder::FieldValue,
    Placeholder::FieldProposedValue,
];
const DEFAULT: &str = "`${field_path}` can only be set once";
const SHAPES: &str = "fields whose presence a builder can observe";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::SetOnceOption,
) -> Vec<Discovered> {
    let Some(field) = expect_field(ctx, fact, SHAPES) else {
        return Vec::new();
    };
    let descriptor = field.descriptor();
    if shape::unset_value(descriptor).is_none() && !descriptor.supports_presence() {
        ctx.report(
            fact,
            DiagnosticKind::TypeUnsupported {
                option: fact.payload.option_name(),
                actual: shape::describe_field(descriptor),
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
        OptionKind::SetOnce,
        SUPPORTED,
        DEFAULT,
        "",
        ConstraintPayload::SetOnce,
    )
}

pub(super) fn companion(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::IfSetAgainOption,
) -> Vec<Discovered> {
    emit_companion(
        ctx,
        fact,
        "(set_once)",
        OptionKind::SetOnce,
        SUPPORTED,
        &opt.msg_format,
    )
}
