//! Per-option policies.
//!
//! Each policy inspects one discovery fact, reports every problem to the
//! diagnostic sink, and emits discovered events only for facts that passed
//! all checks. Fatal diagnostics are raised here, before any event is
//! emitted, so the views and the code-generation dispatch never observe an
//! invalid constraint.

mod bounds;
mod choice;
mod distinct;
mod goes;
mod pattern;
mod require;
mod required;
mod set_once;
mod validate;
mod when;

use std::collections::HashSet;

use crate::compiler::OptionKind;
use crate::compiler::fact::{FieldRef, OneofRef, OptionFact, OptionPayload, Subject, SubjectKey};
use crate::compiler::view::{ConstraintPayload, Discovered};
use crate::error::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::template::{Placeholder, Template};

/// Which options were declared on which subject, across the whole batch.
///
/// Companion checks consult this instead of the events seen so far, so a
/// companion fact arriving before its primary is still accepted.
#[derive(Debug, Default)]
pub(crate) struct DeclaredIndex {
    declared: HashSet<(SubjectKey, &'static str)>,
}

impl DeclaredIndex {
    pub(crate) fn build(facts: &[OptionFact]) -> Self {
        let mut declared = HashSet::new();
        for fact in facts {
            declared.insert((fact.subject.key(), fact.payload.option_name()));
        }
        Self { declared }
    }

    fn declares(&self, subject: &SubjectKey, option: &'static str) -> bool {
        self.declared
            .contains(&(subject.clone(), option))
    }
}

/// Shared state of one policy pass over a message's facts.
pub(crate) struct PolicyContext<'a> {
    sink: &'a dyn DiagnosticSink,
    declared: DeclaredIndex,
    fatal: usize,
}

impl<'a> PolicyContext<'a> {
    pub(crate) fn new(sink: &'a dyn DiagnosticSink, declared: DeclaredIndex) -> Self {
        Self {
            sink,
            declared,
            fatal: 0,
        }
    }

    /// How many fatal diagnostics the pass raised so far.
    pub(crate) fn fatal_count(&self) -> usize {
        self.fatal
    }

    fn report(&mut self, fact: &OptionFact, kind: DiagnosticKind) {
        let diagnostic = Diagnostic::new(kind, &fact.origin);
        if diagnostic.is_fatal() {
            self.fatal += 1;
        }
        self.sink.report(diagnostic);
    }
}

/// Run the fact's policy. Returns the discovered events to fold into the
/// views; an empty vector means the fact was rejected or inert.
pub(crate) fn apply(ctx: &mut PolicyContext<'_>, fact: &OptionFact) -> Vec<Discovered> {
    match &fact.payload {
        OptionPayload::Required(opt) => required::primary(ctx, fact, opt),
        OptionPayload::IfMissing(opt) => required::companion(ctx, fact, opt),
        OptionPayload::Pattern(opt) => pattern::primary(ctx, fact, opt),
        OptionPayload::Min(opt) => bounds::min(ctx, fact, opt),
        OptionPayload::Max(opt) => bounds::max(ctx, fact, opt),
        OptionPayload::Range(opt) => bounds::range(ctx, fact, opt),
        OptionPayload::Distinct(opt) => distinct::primary(ctx, fact, opt),
        OptionPayload::IfHasDuplicates(opt) => distinct::companion(ctx, fact, opt),
        OptionPayload::Goes(opt) => goes::primary(ctx, fact, opt),
        OptionPayload::SetOnce(opt) => set_once::primary(ctx, fact, opt),
        OptionPayload::IfSetAgain(opt) => set_once::companion(ctx, fact, opt),
        OptionPayload::When(opt) => when::primary(ctx, fact, opt),
        OptionPayload::Validate(opt) => validate::primary(ctx, fact, opt),
        OptionPayload::IfInvalid(opt) => validate::deprecated_companion(ctx, fact, opt),
        OptionPayload::Choice(opt) => choice::primary(ctx, fact, opt),
        OptionPayload::IsRequired(opt) => choice::deprecated(ctx, fact, opt),
        OptionPayload::Require(opt) => require::primary(ctx, fact, opt),
    }
}

/// Resolve the effective message for a primary option and emit its seed
/// event. An invalid custom message is fatal and suppresses emission.
fn emit_primary(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    kind: OptionKind,
    supported: &[Placeholder],
    default: &str,
    custom: &str,
    payload: ConstraintPayload,
) -> Vec<Discovered> {
    let (message, custom_message) = if custom.is_empty() {
        (Template::parse(default), false)
    } else {
        let template = Template::parse(custom);
        if let Err(diagnostic) =
            template.check_placeholders(fact.payload.option_name(), supported)
        {
            ctx.report(fact, diagnostic);
            return Vec::new();
        }
        (template, true)
    };

    debug_assert!(
        Template::parse(default)
            .check_placeholders(fact.payload.option_name(), supported)
            .is_ok(),
        "default messages only use supported placeholders"
    );

    vec![Discovered::Primary(super::view::ConstraintState {
        subject: fact.subject.key(),
        kind,
        message,
        custom_message,
        payload,
    })]
}

/// Validate a companion message option and emit its override event.
fn emit_companion(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    primary: &'static str,
    kind: OptionKind,
    supported: &[Placeholder],
    custom: &str,
) -> Vec<Discovered> {
    if !ctx.declared.declares(&fact.subject.key(), primary) {
        ctx.report(
            fact,
            DiagnosticKind::CompanionWithoutPrimary {
                companion: fact.payload.option_name(),
                primary,
            },
        );
        return Vec::new();
    }

    if custom.is_empty() {
        // Nothing to override; the primary's default stands.
        return Vec::new();
    }

    let template = Template::parse(custom);
    if let Err(diagnostic) = template.check_placeholders(fact.payload.option_name(), supported) {
        ctx.report(fact, diagnostic);
        return Vec::new();
    }

    vec![Discovered::Companion {
        subject: fact.subject.key(),
        kind,
        message: template,
    }]
}

/// The fact's subject as a field, or a fatal `TypeUnsupported`.
fn expect_field<'f>(
    ctx: &mut PolicyContext<'_>,
    fact: &'f OptionFact,
    supported: &'static str,
) -> Option<&'f FieldRef> {
    match &fact.subject {
        Subject::Field(field) => Some(field),
        other => {
            ctx.report(
                fact,
                DiagnosticKind::TypeUnsupported {
                    option: fact.payload.option_name(),
                    actual: other.describe(),
                    supported,
                },
            );
            None
        }
    }
}

/// The fact's subject as a oneof group, or a fatal `TypeUnsupported`.
fn expect_oneof<'f>(
    ctx: &mut PolicyContext<'_>,
    fact: &'f OptionFact,
    supported: &'static str,
) -> Option<&'f OneofRef> {
    match &fact.subject {
        Subject::Oneof(oneof) => Some(oneof),
        other => {
            ctx.report(
                fact,
                DiagnosticKind::TypeUnsupported {
                    option: fact.payload.option_name(),
                    actual: other.describe(),
                    supported,
                },
            );
            None
        }
    }
}

/// Reject the fact's subject unless it is the message itself.
fn expect_message(
    ctx: &mut PolicyContext<'_>,
    fact: &OptionFact,
    supported: &'static str,
) -> bool {
    match &fact.subject {
        Subject::Message(_) => true,
        other => {
            ctx.report(
                fact,
                DiagnosticKind::TypeUnsupported {
                    option: fact.payload.option_name(),
                    actual: other.describe(),
                    supported,
                },
            );
            false
        }
    }
}
