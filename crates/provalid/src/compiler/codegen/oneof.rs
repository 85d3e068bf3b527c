//! Oneof generator for `(choice)`.

use std::collections::HashMap;

use super::fragment::{Expr, ViolationFragment};
use super::{Generator, combine};
use crate::compiler::rule::Rule;
use crate::compiler::view::ConstraintState;
use crate::template::{Binding, Placeholder};

/// `(choice)` with `required = true`: some member of the oneof group must
/// be set. Policies drop the option entirely when `required` is false, so
/// a generator only ever sees the enforcing form.
pub(crate) struct Choice<'a> {
    state: &'a ConstraintState,
}

impl<'a> Choice<'a> {
    pub(crate) fn new(state: &'a ConstraintState) -> Self {
        Self { state }
    }

    fn group(&self) -> &str {
        &self.state.subject.name
    }
}

impl Generator for Choice<'_> {
    fn condition(&self) -> Expr {
        let rule = Rule::MessageWide {
            group: self.group().to_string(),
        };
        Expr::not(combine::satisfied(&rule))
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let bindings = HashMap::from([
            (
                Placeholder::GroupPath,
                Binding::Static(self.group().to_string()),
            ),
            (
                Placeholder::ParentType,
                Binding::Static(self.state.subject.declaring_type.clone()),
            ),
        ]);
        out.push(ViolationFragment {
            field_path: self.group().to_string(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Choice;
    use crate::compiler::OptionKind;
    use crate::compiler::codegen::Generator;
    use crate::compiler::codegen::fragment::Expr;
    use crate::compiler::fact::SubjectKey;
    use crate::compiler::view::{ConstraintPayload, ConstraintState};
    use crate::template::Template;

    #[test]
    fn choice_fires_when_no_member_is_set() {
        let state = ConstraintState {
            subject: SubjectKey {
                declaring_type: "acme.Order".to_string(),
                name: "payment".to_string(),
            },
            kind: OptionKind::Choice,
            message: Template::parse("one of `${group_path}` must be set in ${parent_type}"),
            custom_message: false,
            payload: ConstraintPayload::Choice,
        };
        let generator = Choice::new(&state);

        assert_eq!(
            generator.condition(),
            Expr::not(Expr::OneofIsSet {
                group: "payment".to_string()
            })
        );

        let mut violations = Vec::new();
        generator.violation(&mut violations);
        assert_eq!(violations[0].field_path, "payment");
        assert_eq!(
            violations[0].message,
            Expr::Str("one of `payment` must be set in acme.Order".to_string())
        );
    }
}
