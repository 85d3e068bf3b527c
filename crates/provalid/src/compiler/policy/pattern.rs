//! `(pattern)`.

use provalid_options as opts;

use super::{PolicyContext, emit_primary, expect_field};
use crate::compiler::OptionKind;
use crate::compiler::fact::OptionFact;
use crate::compiler::pattern::CompiledPattern;
use crate::compiler::shape;
use crate::compiler::view::{ConstraintPayload, Discovered};
use crate::error::DiagnosticKind;
use crate::template::Placeholder;

const SUPPORTED: &[Placeholder] = &[
    Placeholder::FieldPath,
    Placeholder::ParentType,
    Placeholder::FieldType,
    Placeholder::FieldValue,
    Placeholder::RegexPattern,
];
const DEFAULT: &str = "`${field_path}` must match pattern `${regex_pattern}`";
const SHAPES: &str = "string fields and collections of strings";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::PatternOption,
) -> Vec<Discovered> {
    let Some(field) = expect_field(ctx, fact, SHAPES) else {
        return Vec::new();
    };
    if !matches!(
        shape::element_kind(field.descriptor()),
        prost_reflect::Kind::String
    ) {
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

    let pattern = match CompiledPattern::compile(&opt.regex, opt.modifier.clone()) {
        Ok(pattern) => pattern,
        Err(detail) => {
            ctx.report(
                fact,
                DiagnosticKind::MalformedPattern {
                    pattern: opt.regex.clone(),
                    detail,
                },
            );
            return Vec::new();
        }
    };

    emit_primary(
        ctx,
        fact,
        OptionKind::Pattern,
        SUPPORTED,
        DEFAULT,
        &opt.msg_format,
        ConstraintPayload::Pattern(pattern),
    )
}
