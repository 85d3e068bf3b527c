//! `(choice)` on oneof groups, and its deprecated predecessor
//! `(is_required)`.

use provalid_options as opts;

use super::{PolicyContext, emit_primary, expect_oneof};
use crate::compiler::OptionKind;
use crate::compiler::fact::OptionFact;
use crate::compiler::view::{ConstraintPayload, Discovered};
use crate::error::DiagnosticKind;
use crate::template::Placeholder;

const SUPPORTED: &[Placeholder] = &[Placeholder::GroupPath, Placeholder::ParentType];
const DEFAULT: &str = "one field of `${group_path}` must be set";
const SHAPES: &str = "oneof groups";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::ChoiceOption,
) -> Vec<Discovered> {
    if expect_oneof(ctx, fact, SHAPES).is_none() {
        return Vec::new();
    }
    if !opt.required {
        return Vec::new();
    }
    emit_primary(
        ctx,
        fact,
        OptionKind::Choice,
        SUPPORTED,
        DEFAULT,
        &opt.msg_format,
        ConstraintPayload::Choice,
    )
}

/// `(is_required)` keeps working with `(choice)` semantics, plus a
/// deprecation warning.
pub(super) fn deprecated(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::IsRequiredOption,
) -> Vec<Discovered> {
    ctx.report(
        fact,
        DiagnosticKind::DeprecatedOptionUsed {
            option: fact.payload.option_name(),
            replacement: "(choice)",
        },
    );
    if expect_oneof(ctx, fact, SHAPES).is_none() {
        return Vec::new();
    }
    if !opt.value {
        return Vec::new();
    }
    emit_primary(
        ctx,
        fact,
        OptionKind::Choice,
        SUPPORTED,
        DEFAULT,
        "",
        ConstraintPayload::Choice,
    )
}
