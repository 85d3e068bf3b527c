//! The constraint rule model: pure data, constructed once per discovered
//! constraint, composed into a DAG (operands are owned boxes, so a rule can
//! never reference its own ancestor).

use crate::compiler::bound::BoundValue;
use crate::compiler::codegen::fragment::CmpOp;

/// Boolean operator combining two composite operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    /// Both operands must hold.
    And,
    /// At least one operand must hold.
    Or,
    /// Exactly one operand must hold.
    Xor,
}

impl BoolOp {
    /// The operator symbol as written in combination expressions.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::And => '&',
            Self::Or => '|',
            Self::Xor => '^',
        }
    }

    /// The printable operator name for interpolation into messages.
    #[must_use]
    pub fn printable_name(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "either-or",
        }
    }

    /// Apply the operator to two evaluated operands.
    #[must_use]
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Self::And => left && right,
            Self::Or => left || right,
            Self::Xor => left ^ right,
        }
    }
}

/// The value a simple rule compares its field against.
#[derive(Debug, Clone, PartialEq)]
pub enum OtherValue {
    /// The field type's unset value (empty collection/string, default
    /// instance, zero enum variant).
    Unset,
    /// A numeric threshold.
    Number(BoundValue),
    /// A text value, compared with object equality.
    Text(String),
}

/// One validation rule. Rules own no runtime state; evaluation is the
/// code-generation dispatch's business.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// One field compared against one other value.
    Simple {
        /// Name of the constrained field.
        field: String,
        /// The comparison operator.
        op: CmpOp,
        /// The value compared against.
        other: OtherValue,
        /// Skip the whole check while the field holds its unset value.
        ignored_if_unset: bool,
        /// Apply the comparison to each element of a collection field.
        distribute: bool,
    },
    /// Two rules combined by a boolean operator.
    Composite {
        /// Left operand.
        left: Box<Rule>,
        /// Right operand.
        right: Box<Rule>,
        /// The combining operator.
        op: BoolOp,
        /// The field both operands constrain, when they share one.
        common_field: Option<String>,
    },
    /// A rule over the whole message rather than one field, e.g.
    /// "one field of this oneof group must be set".
    MessageWide {
        /// Name of the oneof group the rule guards.
        group: String,
    },
}

impl Rule {
    /// A presence rule: the field must not hold its unset value.
    #[must_use]
    pub fn is_set(field: impl Into<String>) -> Self {
        Self::Simple {
            field: field.into(),
            op: CmpOp::Ne,
            other: OtherValue::Unset,
            ignored_if_unset: false,
            distribute: false,
        }
    }

    /// Every field name the rule (transitively) constrains, left to right,
    /// without deduplication.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_field_names(&mut names);
        names
    }

    fn collect_field_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Simple { field, .. } => names.push(field),
            Self::Composite { left, right, .. } => {
                left.collect_field_names(names);
                right.collect_field_names(names);
            }
            Self::MessageWide { .. } => {}
        }
    }
}

/// Parse a `(require)` combination expression such as `"first | second"` or
/// `"left ^ right & fallback"` into a rule tree.
///
/// Operands are field names; `&`, `|` and `^` combine left-associatively
/// with equal precedence. The returned error is the detail for the
/// diagnostic.
pub(crate) fn parse_combination(expression: &str) -> Result<Rule, String> {
    let mut rule: Option<Rule> = None;
    let mut pending_op: Option<BoolOp> = None;

    for token in tokenize(expression)? {
        match token {
            Token::Field(name) => {
                let leaf = Rule::is_set(name);
                rule = Some(match (rule.take(), pending_op.take()) {
                    (None, None) => leaf,
                    (Some(left), Some(op)) => Rule::Composite {
                        left: Box::new(left),
                        right: Box::new(leaf),
                        op,
                        common_field: None,
                    },
                    (Some(_), None) => {
                        return Err("expected an operator between field names".to_string());
                    }
                    (None, Some(_)) => unreachable!("operator recorded before any operand"),
                });
            }
            Token::Op(op) => {
                if rule.is_none() {
                    return Err(format!("expression must not start with `{}`", op.symbol()));
                }
                if pending_op.is_some() {
                    return Err(format!("two operators in a row before `{}`", op.symbol()));
                }
                pending_op = Some(op);
            }
        }
    }

    if pending_op.is_some() {
        return Err("expression must not end with an operator".to_string());
    }
    rule.ok_or_else(|| "expression names no fields".to_string())
}

enum Token {
    Field(String),
    Op(BoolOp),
}

fn tokenize(expression: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut field = String::new();

    for ch in expression.chars() {
        match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => field.push(ch),
            '&' | '|' | '^' => {
                if !field.is_empty() {
                    tokens.push(Token::Field(std::mem::take(&mut field)));
                }
                let op = match ch {
                    '&' => BoolOp::And,
                    '|' => BoolOp::Or,
                    _ => BoolOp::Xor,
                };
                tokens.push(Token::Op(op));
            }
            c if c.is_whitespace() => {
                if !field.is_empty() {
                    tokens.push(Token::Field(std::mem::take(&mut field)));
                }
            }
            other => return Err(format!("unexpected character `{other}`")),
        }
    }
    if !field.is_empty() {
        tokens.push(Token::Field(field));
    }
    Ok(tokens)
}
