//! Constraint state accumulation.
//!
//! A view holds the merged state for one `(subject, option)` pair across a
//! compilation pass. The primary discovered event seeds the full state with
//! the option's default message; a companion event overwrites just the
//! message. Seed and override are each last-writer-wins, so the final state
//! does not depend on which of the two arrived first.

use std::collections::BTreeMap;

use provalid_options::Time;

use crate::compiler::OptionKind;
use crate::compiler::bound::Range;
use crate::compiler::fact::SubjectKey;
use crate::compiler::pattern::CompiledPattern;
use crate::compiler::rule::Rule;
use crate::template::Template;

/// Option-specific data carried by a constraint state.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConstraintPayload {
    /// `(required)` — no payload beyond the message.
    Required,
    /// `(pattern)` — the policy-compiled pattern.
    Pattern(CompiledPattern),
    /// `(min)`, `(max)` and `(range)` — a one- or two-sided range.
    Bounds(Range),
    /// `(distinct)` — no payload beyond the message.
    Distinct,
    /// `(goes)` — the resolved companion field's name.
    Goes {
        /// The field that must be set alongside the subject.
        companion: String,
    },
    /// `(set_once)` — no payload beyond the message.
    SetOnce,
    /// `(when)` — the temporal restriction.
    When(Time),
    /// `(validate)` — no payload beyond the message.
    Validate,
    /// `(choice)` on a oneof group.
    Choice,
    /// `(require)` — the parsed boolean combination.
    Require {
        /// The parsed rule tree.
        rule: Rule,
        /// The combination expression as written in the schema.
        expression: String,
    },
}

/// The merged, finalized state of one constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintState {
    /// The constrained field, oneof or message.
    pub subject: SubjectKey,
    /// Which option produced the constraint.
    pub kind: OptionKind,
    /// The effective error-message template.
    pub message: Template,
    /// Whether `message` came from the schema rather than the option's
    /// default.
    pub custom_message: bool,
    /// Option-specific data.
    pub payload: ConstraintPayload,
}

/// A fact that survived its policy.
#[derive(Debug, Clone)]
pub(crate) enum Discovered {
    /// A primary option: seeds the full constraint state.
    Primary(ConstraintState),
    /// A companion message option: overwrites just the message.
    Companion {
        subject: SubjectKey,
        kind: OptionKind,
        message: Template,
    },
}

#[derive(Debug, Default)]
struct Pending {
    seed: Option<ConstraintState>,
    message_override: Option<Template>,
}

/// The per-pass accumulator, keyed by `(subject, option)`.
#[derive(Debug, Default)]
pub(crate) struct ViewMap {
    pending: BTreeMap<(SubjectKey, OptionKind), Pending>,
}

impl ViewMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Fold one discovered event into the map. Order between a primary and
    /// its companion does not matter; the two writes touch disjoint slots.
    pub(crate) fn apply(&mut self, event: Discovered) {
        match event {
            Discovered::Primary(state) => {
                let key = (state.subject.clone(), state.kind);
                self.pending.entry(key).or_default().seed = Some(state);
            }
            Discovered::Companion {
                subject,
                kind,
                message,
            } => {
                self.pending
                    .entry((subject, kind))
                    .or_default()
                    .message_override = Some(message);
            }
        }
    }

    /// Collapse every pending pair into its final state.
    ///
    /// An override can arrive without a seed: a companion whose primary is
    /// declared but disabled passes its policy, while the inert primary
    /// emits nothing. Such a companion is itself inert and the entry is
    /// dropped.
    pub(crate) fn finalize(self) -> Vec<ConstraintState> {
        self.pending
            .into_values()
            .filter_map(|pending| {
                let mut state = pending.seed?;
                if let Some(message) = pending.message_override {
                    state.message = message;
                    state.custom_message = true;
                }
                Some(state)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ConstraintPayload, ConstraintState, Discovered, ViewMap};
    use crate::compiler::OptionKind;
    use crate::compiler::fact::SubjectKey;
    use crate::template::Template;

    fn subject() -> SubjectKey {
        SubjectKey {
            declaring_type: "acme.Order".to_string(),
            name: "tracking_id".to_string(),
        }
    }

    fn primary() -> Discovered {
        Discovered::Primary(ConstraintState {
            subject: subject(),
            kind: OptionKind::Required,
            message: Template::parse("`${field_path}` is required"),
            custom_message: false,
            payload: ConstraintPayload::Required,
        })
    }

    fn companion() -> Discovered {
        Discovered::Companion {
            subject: subject(),
            kind: OptionKind::Required,
            message: Template::parse("tracking id missing"),
        }
    }

    #[test]
    fn primary_alone_keeps_the_default_message() {
        let mut views = ViewMap::new();
        views.apply(primary());

        let states = views.finalize();
        assert_eq!(states.len(), 1);
        assert!(!states[0].custom_message);
        assert_eq!(states[0].message.source(), "`${field_path}` is required");
    }

    #[test]
    fn companion_overwrites_only_the_message() {
        let mut views = ViewMap::new();
        views.apply(primary());
        views.apply(companion());

        let states = views.finalize();
        assert_eq!(states.len(), 1);
        assert!(states[0].custom_message);
        assert_eq!(states[0].message.source(), "tracking id missing");
        assert_eq!(states[0].payload, ConstraintPayload::Required);
    }

    #[test]
    fn companion_without_a_seed_is_inert() {
        let mut views = ViewMap::new();
        views.apply(companion());

        assert_eq!(views.finalize(), vec![]);
    }

    #[test]
    fn finalization_does_not_depend_on_event_order() {
        let mut forward = ViewMap::new();
        forward.apply(primary());
        forward.apply(companion());

        let mut reverse = ViewMap::new();
        reverse.apply(companion());
        reverse.apply(primary());

        assert_eq!(forward.finalize(), reverse.finalize());
    }
}
