//! `(when)`: temporal restrictions.

use provalid_options as opts;
use provalid_options::Time;

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
    Placeholder::FieldValue,
    Placeholder::WhenIn,
];
const DEFAULT: &str = "`${field_path}` must be in the ${when_in}";
const SHAPES: &str = "timestamp fields and collections of timestamps";

pub(super) fn primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    opt: &opts::WhenOption,
) -> Vec<Discovered> {
    let Some(field) = expect_field(ctx, fact, SHAPES) else {
        return Vec::new();
    };
    if !shape::is_temporal(field.descriptor()) {
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

    let time = Time::try_from(opt.r#in).unwrap_or(Time::TimeUndefined);
    if time == Time::TimeUndefined {
        // No direction declared: accepted and inert.
        return Vec::new();
    }

    emit_primary(
        ctx,
        fact,
        OptionKind::When,
        SUPPORTED,
        DEFAULT,
        &opt.msg_format,
        ConstraintPayload::When(time),
    )
}

#[cfg(test)]
mod tests {
    use provalid_options as opts;
    use provalid_options::Time;

    use super::super::{DeclaredIndex, PolicyContext, apply};
    use crate::compiler::fact::{FieldRef, OptionFact, OptionPayload, SourceOrigin, Subject};
    use crate::error::{CollectingSink, DiagnosticKind};
    use crate::testutil::order_schema;

    fn fact(field: &str, time: i32) -> OptionFact {
        let schema = order_schema();
        OptionFact::new(
            Subject::Field(FieldRef::new(schema.order(), schema.field(field))),
            OptionPayload::When(opts::WhenOption {
                r#in: time,
                msg_format: String::new(),
            }),
            SourceOrigin::new("acme/order.proto", 8, 5),
        )
    }

    #[test]
    fn when_binds_only_to_timestamps() {
        let fact = fact("tracking_id", Time::Past as i32);
        let sink = CollectingSink::new();
        let mut ctx = PolicyContext::new(&sink, DeclaredIndex::build(std::slice::from_ref(&fact)));

        assert!(apply(&mut ctx, &fact).is_empty());
        assert!(matches!(
            sink.take()[0].kind,
            DiagnosticKind::TypeUnsupported { option: "(when)", .. }
        ));
    }

    #[test]
    fn undefined_direction_is_inert() {
        let fact = fact("delivered_at", Time::TimeUndefined as i32);
        let sink = CollectingSink::new();
        let mut ctx = PolicyContext::new(&sink, DeclaredIndex::build(std::slice::from_ref(&fact)));

        assert!(apply(&mut ctx, &fact).is_empty());
        assert_eq!(ctx.fatal_count(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn past_restriction_emits() {
        let fact = fact("delivered_at", Time::Past as i32);
        let sink = CollectingSink::new();
        let mut ctx = PolicyContext::new(&sink, DeclaredIndex::build(std::slice::from_ref(&fact)));
        assert_eq!(apply(&mut ctx, &fact).len(), 1);
    }
}
