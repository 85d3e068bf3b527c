//! `(validate)` and its deprecated companion `(if_invalid)`.

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
const DEFAULT: &str = "`${field_path}` must be valid";
const SHAPES: &str = "message-typed fields and collections of messages";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::ValidateOption,
) -> Vec<Discovered> {
    let Some(field) = expect_field(ctx, fact, SHAPES) else {
        return Vec::new();
    };
    if shape::element_kind(field.descriptor()).as_message().is_none() {
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
        OptionKind::Validate,
        SUPPORTED,
        DEFAULT,
        "",
        ConstraintPayload::Validate,
    )
}

/// `(if_invalid)` still works as the message source for `(validate)`, with
/// a deprecation warning.
pub(super) fn deprecated_companion(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::IfInvalidOption,
) -> Vec<Discovered> {
    ctx.report(
        fact,
        DiagnosticKind::DeprecatedOptionUsed {
            option: fact.payload.option_name(),
            replacement: "(validate)",
        },
    );
    emit_companion(
        ctx,
        fact,
        "(validate)",
        OptionKind::Validate,
        SUPPORTED,
        &opt.msg_format,
    )
}

#[cfg(test)]
mod tests {
    use provalid_options as opts;

    use super::super::{DeclaredIndex, PolicyContext, apply};
    use crate::compiler::fact::{FieldRef, OptionFact, OptionPayload, SourceOrigin, Subject};
    use crate::error::{CollectingSink, DiagnosticKind, Severity};
    use crate::testutil::order_schema;

    fn fact(field: &str, payload: OptionPayload) -> OptionFact {
        let schema = order_schema();
        OptionFact::new(
            Subject::Field(FieldRef::new(schema.order(), schema.field(field))),
            payload,
            SourceOrigin::new("acme/order.proto", 10, 5),
        )
    }

    #[test]
    fn validate_applies_to_repeated_message_fields() {
        let fact = fact(
            "parties",
            OptionPayload::Validate(opts::ValidateOption { value: true }),
        );
        let sink = CollectingSink::new();
        let mut ctx = PolicyContext::new(&sink, DeclaredIndex::build(std::slice::from_ref(&fact)));
        assert_eq!(apply(&mut ctx, &fact).len(), 1);
    }

    #[test]
    fn if_invalid_warns_but_still_overrides_the_message() {
        let primary = fact(
            "payer",
            OptionPayload::Validate(opts::ValidateOption { value: true }),
        );
        let deprecated = fact(
            "payer",
            OptionPayload::IfInvalid(opts::IfInvalidOption {
                msg_format: "payer details are wrong".to_string(),
            }),
        );

        let sink = CollectingSink::new();
        let index = DeclaredIndex::build(&[primary, deprecated.clone()]);
        let mut ctx = PolicyContext::new(&sink, index);

        let events = apply(&mut ctx, &deprecated);
        assert_eq!(events.len(), 1);
        assert_eq!(ctx.fatal_count(), 0);
        let diagnostics = sink.take();
        assert_eq!(diagnostics[0].severity(), Severity::Warning);
        assert!(matches!(
            diagnostics[0].kind,
            DiagnosticKind::DeprecatedOptionUsed {
                option: "(if_invalid)",
                replacement: "(validate)",
            }
        ));
    }
}
