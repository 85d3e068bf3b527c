//! `(goes)`: cross-field presence coupling.

use provalid_options as opts;

use super::{PolicyContext, emit_primary, expect_field};
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
    Placeholder::GoesCompanion,
];
const DEFAULT: &str = "`${field_path}` must be accompanied by `${goes_companion}`";
const SHAPES: &str = "fields with a distinguishable unset value";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::GoesOption,
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

    if opt.with == field.name() {
        ctx.report(
            fact,
            DiagnosticKind::SelfReferencingCompanion {
                option: fact.payload.option_name(),
                field: field.name().to_string(),
            },
        );
        return Vec::new();
    }

    let declaring = field.declaring_type();
    let Some(companion) = declaring.get_field_by_name(&opt.with) else {
        ctx.report(
            fact,
            DiagnosticKind::UnknownCompanionField {
                option: fact.payload.option_name(),
                field: opt.with.clone(),
                declaring_type: declaring.full_name().to_string(),
            },
        );
        return Vec::new();
    };

    // The companion is probed for presence too, so it needs the same
    // distinguishable unset value as the subject.
    if shape::unset_value(&companion).is_none() {
        ctx.report(
            fact,
            DiagnosticKind::TypeUnsupported {
                option: fact.payload.option_name(),
                actual: shape::describe_field(&companion),
                supported: SHAPES,
            },
        );
        return Vec::new();
    }

    emit_primary(
        ctx,
        fact,
        OptionKind::Goes,
        SUPPORTED,
        DEFAULT,
        &opt.msg_format,
        ConstraintPayload::Goes {
            companion: opt.with.clone(),
        },
    )
}
