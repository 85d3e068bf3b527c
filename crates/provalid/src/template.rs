//! Error-message templates with `${placeholder}` tokens.
//!
//! Policies validate a template's placeholders against the owning option's
//! supported set before any constraint fact is emitted; generators later
//! render the template into a concatenation fragment, substituting static
//! placeholders as literal text and dynamic ones as opaque expressions.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::compiler::codegen::fragment::Expr;
use crate::error::DiagnosticKind;

/// The closed set of tokens legal inside an error-message template.
///
/// Each option declares its own supported subset; see the per-option
/// policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Placeholder {
    /// Dot-separated path of the violated field.
    FieldPath,
    /// The value the field held when the constraint fired.
    FieldValue,
    /// The value a builder attempted to assign (set-once).
    FieldProposedValue,
    /// Printable name of the field's type.
    FieldType,
    /// Full name of the declaring message type.
    ParentType,
    /// The lower threshold of a min/range constraint.
    MinValue,
    /// The upper threshold of a max/range constraint.
    MaxValue,
    /// The range in its bracket notation.
    RangeValues,
    /// The regular expression a pattern constraint requires.
    RegexPattern,
    /// The duplicate elements found in a distinct-constrained collection.
    Duplicates,
    /// The companion field a `goes` constraint couples to.
    GoesCompanion,
    /// The temporal restriction (`past` / `future`) of a `when` constraint.
    WhenIn,
    /// Name of the violated oneof group.
    GroupPath,
    /// The boolean combination expression of a `require` constraint.
    RequireExpression,
    /// Printable name of a composite rule's boolean operator.
    OperatorName,
}

impl Placeholder {
    /// All placeholders, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::FieldPath,
        Self::FieldValue,
        Self::FieldProposedValue,
        Self::FieldType,
        Self::ParentType,
        Self::MinValue,
        Self::MaxValue,
        Self::RangeValues,
        Self::RegexPattern,
        Self::Duplicates,
        Self::GoesCompanion,
        Self::WhenIn,
        Self::GroupPath,
        Self::RequireExpression,
        Self::OperatorName,
    ];

    /// The token as written between `${` and `}`.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Self::FieldPath => "field_path",
            Self::FieldValue => "field_value",
            Self::FieldProposedValue => "field_proposed_value",
            Self::FieldType => "field_type",
            Self::ParentType => "parent_type",
            Self::MinValue => "min_value",
            Self::MaxValue => "max_value",
            Self::RangeValues => "range_values",
            Self::RegexPattern => "regex_pattern",
            Self::Duplicates => "duplicates",
            Self::GoesCompanion => "goes_companion",
            Self::WhenIn => "when_in",
            Self::GroupPath => "group_path",
            Self::RequireExpression => "require_expression",
            Self::OperatorName => "operator_name",
        }
    }

    /// Resolve a written token back into the enum.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.token() == token)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}}}", self.token())
    }
}

/// What a generator substitutes for one placeholder.
pub enum Binding {
    /// The same text for every occurrence; merged into the literal spans.
    Static(String),
    /// A value known only inside generated code; interlaced as an opaque
    /// expression span.
    Dynamic(Expr),
}

/// One span of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Span {
    /// Verbatim text between tokens.
    Literal(String),
    /// A `${token}` occurrence, stored unresolved so that `check` can name
    /// unknown tokens exactly as written.
    Token(String),
}

/// An error-message template: literal text interleaved with `${placeholder}`
/// tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    spans: Vec<Span>,
}

impl Template {
    /// Split `source` into literal and token spans.
    ///
    /// A `${` without a closing `}` is not a token; it stays literal text.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let mut spans = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find("${") {
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find('}') else {
                literal.push_str(rest);
                rest = "";
                break;
            };
            literal.push_str(&rest[..open]);
            if !literal.is_empty() {
                spans.push(Span::Literal(std::mem::take(&mut literal)));
            }
            spans.push(Span::Token(after_open[..close].to_string()));
            rest = &after_open[close + 1..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            spans.push(Span::Literal(literal));
        }

        Self {
            source: source.to_string(),
            spans,
        }
    }

    /// The template text as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Every distinct token appearing in the template, as written.
    #[must_use]
    pub fn extract_placeholders(&self) -> BTreeSet<String> {
        self.spans
            .iter()
            .filter_map(|span| match span {
                Span::Token(token) => Some(token.clone()),
                Span::Literal(_) => None,
            })
            .collect()
    }

    /// Verify that every token is in `supported`.
    ///
    /// Unknown tokens and known-but-unsupported placeholders both fail.
    /// On failure returns the `UnsupportedPlaceholder` diagnostic data with
    /// the offending tokens in template order.
    pub fn check_placeholders(
        &self,
        option: &'static str,
        supported: &[Placeholder],
    ) -> Result<(), DiagnosticKind> {
        let mut offending = Vec::new();
        for span in &self.spans {
            let Span::Token(token) = span else { continue };
            let ok = Placeholder::from_token(token).is_some_and(|p| supported.contains(&p));
            if !ok && !offending.contains(token) {
                offending.push(token.clone());
            }
        }

        if offending.is_empty() {
            Ok(())
        } else {
            Err(DiagnosticKind::UnsupportedPlaceholder {
                option,
                offending,
                supported: supported.iter().map(|p| p.token()).collect(),
            })
        }
    }

    /// Render the template into a concatenation fragment, preserving literal
    /// order and interlacing dynamic expression spans at the split points.
    ///
    /// Placeholders without a binding are kept as their literal `${token}`
    /// text; policies reject them long before rendering, so this only
    /// matters for templates rendered outside a compilation pass.
    #[must_use]
    pub fn render(&self, bindings: &HashMap<Placeholder, Binding>) -> Expr {
        let mut parts: Vec<Expr> = Vec::new();
        let mut literal = String::new();

        for span in &self.spans {
            match span {
                Span::Literal(text) => literal.push_str(text),
                Span::Token(token) => {
                    let binding =
                        Placeholder::from_token(token).and_then(|p: Placeholder| bindings.get(&p));
                    match binding {
                        Some(Binding::Static(text)) => literal.push_str(text),
                        Some(Binding::Dynamic(expr)) => {
                            if !literal.is_empty() {
                                parts.push(Expr::Str(std::mem::take(&mut literal)));
                            }
                            parts.push(expr.clone());
                        }
                        None => {
                            literal.push_str("${");
                            literal.push_str(token);
                            literal.push('}');
                        }
                    }
                }
            }
        }

        if !literal.is_empty() {
            parts.push(Expr::Str(literal));
        }

        match parts.len() {
            0 => Expr::Str(String::new()),
            1 => parts.remove(0),
            _ => Expr::Concat(parts),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::{Binding, Placeholder, Template};
    use crate::compiler::codegen::fragment::Expr;
    use crate::error::DiagnosticKind;

    #[test]
    fn parse_splits_literals_and_tokens_in_order() {
        let template = Template::parse("field ${field_path} must match ${regex_pattern}.");
        assert_eq!(
            template.extract_placeholders().into_iter().collect::<Vec<_>>(),
            vec!["field_path".to_string(), "regex_pattern".to_string()]
        );
    }

    #[test]
    fn unterminated_token_stays_literal() {
        let template = Template::parse("broken ${field_path");
        assert!(template.extract_placeholders().is_empty());
        assert_eq!(
            template.render(&HashMap::new()),
            Expr::Str("broken ${field_path".to_string())
        );
    }

    #[test]
    fn check_accepts_subset_and_rejects_everything_else() {
        let supported = [Placeholder::FieldPath, Placeholder::FieldValue];

        let good = Template::parse("`${field_path}` was `${field_value}`");
        assert!(good.check_placeholders("(range)", &supported).is_ok());

        let bad = Template::parse("${group_path} and ${no_such_token}");
        let err = bad
            .check_placeholders("(range)", &supported)
            .expect_err("unsupported placeholders must be rejected");
        let DiagnosticKind::UnsupportedPlaceholder {
            option, offending, ..
        } = err
        else {
            panic!("unexpected diagnostic kind: {err:?}");
        };
        assert_eq!(option, "(range)");
        assert_eq!(offending, vec!["group_path", "no_such_token"]);
    }

    #[test]
    fn render_merges_static_bindings_into_literals() {
        let template = Template::parse("`${field_path}` must be at least ${min_value}");
        let bindings = HashMap::from([
            (
                Placeholder::FieldPath,
                Binding::Static("order.total".to_string()),
            ),
            (Placeholder::MinValue, Binding::Static("1".to_string())),
        ]);
        assert_eq!(
            template.render(&bindings),
            Expr::Str("`order.total` must be at least 1".to_string())
        );
    }

    #[test]
    fn render_interlaces_dynamic_spans_at_split_points() {
        let template = Template::parse("got ${field_value}, expected at least ${min_value}");
        let bindings = HashMap::from([
            (
                Placeholder::FieldValue,
                Binding::Dynamic(Expr::field_value("total")),
            ),
            (Placeholder::MinValue, Binding::Static("1".to_string())),
        ]);
        assert_eq!(
            template.render(&bindings),
            Expr::Concat(vec![
                Expr::Str("got ".to_string()),
                Expr::field_value("total"),
                Expr::Str(", expected at least 1".to_string()),
            ])
        );
    }

    #[test]
    fn every_placeholder_token_round_trips() {
        for placeholder in Placeholder::ALL {
            assert_eq!(
                Placeholder::from_token(placeholder.token()),
                Some(placeholder)
            );
        }
    }

    proptest! {
        #[test]
        fn token_free_text_renders_to_itself(text in "[^$]{0,64}") {
            let template = Template::parse(&text);
            prop_assert_eq!(template.render(&HashMap::new()), Expr::Str(text));
        }

        #[test]
        fn parse_never_loses_source(source in ".{0,64}") {
            let template = Template::parse(&source);
            prop_assert_eq!(template.source(), source.as_str());
        }
    }
}
