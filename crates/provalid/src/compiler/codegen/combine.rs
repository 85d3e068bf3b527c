//! Combination generator for `(require)`.

use std::collections::HashMap;

use super::fragment::{CmpOp, Expr, ViolationFragment};
use super::{ELEMENT_VAR, Generator, bounds};
use crate::compiler::rule::{OtherValue, Rule};
use crate::compiler::view::ConstraintState;
use crate::template::{Binding, Placeholder};

/// `(require)`: a boolean combination over field presence must hold for the
/// whole message. The condition recurses through the rule tree and negates
/// the combined satisfaction.
pub(crate) struct Require<'a> {
    state: &'a ConstraintState,
    rule: &'a Rule,
    expression: &'a str,
}

impl<'a> Require<'a> {
    pub(crate) fn new(state: &'a ConstraintState, rule: &'a Rule, expression: &'a str) -> Self {
        Self {
            state,
            rule,
            expression,
        }
    }
}

impl Generator for Require<'_> {
    fn condition(&self) -> Expr {
        Expr::not(satisfied(self.rule))
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let mut bindings = HashMap::from([
            (
                Placeholder::RequireExpression,
                Binding::Static(self.expression.to_string()),
            ),
            (
                Placeholder::ParentType,
                Binding::Static(self.state.subject.declaring_type.clone()),
            ),
        ]);
        if let Rule::Composite { op, .. } = self.rule {
            bindings.insert(
                Placeholder::OperatorName,
                Binding::Static(op.printable_name().to_string()),
            );
        }
        out.push(ViolationFragment {
            field_path: self.state.subject.declaring_type.clone(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: None,
        });
    }
}

/// The expression that is true exactly when `rule` holds. Also the
/// evaluation seam for rules built outside `(require)`, such as the
/// oneof-presence rule behind `(choice)`.
pub(super) fn satisfied(rule: &Rule) -> Expr {
    match rule {
        Rule::Simple {
            field,
            op,
            other,
            ignored_if_unset,
            distribute,
        } => {
            let target = if *distribute {
                Expr::Element {
                    var: ELEMENT_VAR.to_string(),
                }
            } else {
                Expr::field_value(field.clone())
            };
            let base = match other {
                // Presence probes; policies only build these with Eq/Ne.
                OtherValue::Unset => match op {
                    CmpOp::Eq => Expr::not(Expr::field_is_set(field.clone())),
                    _ => Expr::field_is_set(field.clone()),
                },
                OtherValue::Number(value) => {
                    Expr::compare(*op, target, bounds::literal(value))
                }
                OtherValue::Text(text) => Expr::compare(*op, target, Expr::Str(text.clone())),
            };
            let base = if *distribute {
                Expr::AnyElement {
                    field: field.clone(),
                    var: ELEMENT_VAR.to_string(),
                    predicate: Box::new(base),
                }
            } else {
                base
            };
            if *ignored_if_unset {
                Expr::or(Expr::not(Expr::field_is_set(field.clone())), base)
            } else {
                base
            }
        }
        Rule::Composite {
            left, right, op, ..
        } => Expr::Logical {
            op: *op,
            lhs: Box::new(satisfied(left)),
            rhs: Box::new(satisfied(right)),
        },
        Rule::MessageWide { group } => Expr::OneofIsSet {
            group: group.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Require, satisfied};
    use crate::compiler::OptionKind;
    use crate::compiler::codegen::Generator;
    use crate::compiler::codegen::fragment::Expr;
    use crate::compiler::fact::SubjectKey;
    use crate::compiler::rule::{BoolOp, Rule, parse_combination};
    use crate::compiler::view::{ConstraintPayload, ConstraintState};
    use crate::template::Template;

    fn state(rule: Rule, expression: &str) -> ConstraintState {
        ConstraintState {
            subject: SubjectKey {
                declaring_type: "acme.Order".to_string(),
                name: String::new(),
            },
            kind: OptionKind::Require,
            message: Template::parse("${parent_type} needs ${require_expression}"),
            custom_message: false,
            payload: ConstraintPayload::Require {
                rule: rule.clone(),
                expression: expression.to_string(),
            },
        }
    }

    #[test]
    fn disjunction_violates_when_neither_side_is_set() {
        let rule = parse_combination("card_number | iban").expect("expression parses");
        let state = state(rule.clone(), "card_number | iban");
        let generator = Require::new(&state, &rule, "card_number | iban");

        assert_eq!(
            generator.condition(),
            Expr::not(Expr::Logical {
                op: BoolOp::Or,
                lhs: Box::new(Expr::field_is_set("card_number")),
                rhs: Box::new(Expr::field_is_set("iban")),
            })
        );

        let mut violations = Vec::new();
        generator.violation(&mut violations);
        assert_eq!(violations[0].field_path, "acme.Order");
        assert_eq!(
            violations[0].message,
            Expr::Str("acme.Order needs card_number | iban".to_string())
        );
    }

    #[test]
    fn xor_keeps_the_declared_operator_through_recursion() {
        let rule = parse_combination("card_number ^ iban").expect("expression parses");
        let Expr::Logical { op, .. } = satisfied(&rule) else {
            panic!("a two-field combination must recurse into a logical node");
        };
        assert_eq!(op, BoolOp::Xor);
    }

    #[test]
    fn message_wide_rules_probe_the_oneof_group() {
        assert_eq!(
            satisfied(&Rule::MessageWide {
                group: "payment".to_string()
            }),
            Expr::OneofIsSet {
                group: "payment".to_string()
            }
        );
    }
}
