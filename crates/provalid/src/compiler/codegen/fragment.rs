//! Opaque structured code fragments.
//!
//! Generators emit these instead of raw text; the (external) renderer owns
//! concrete pretty-printing and the physical insertion points. The IR only
//! needs to be rich enough to express every condition, message and
//! declaration the generators produce.

use provalid_options::PatternModifier;

use crate::compiler::OptionKind;
use crate::compiler::fact::SubjectKey;
use crate::compiler::rule::BoolOp;

/// Comparison operator of a simple rule or condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// Object equality for messages/strings/bytes/enums, numeric equality
    /// otherwise.
    Eq,
    /// Negated [`CmpOp::Eq`].
    Ne,
    /// Strictly less than, native numeric ordering.
    Lt,
    /// Less than or equal.
    Le,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

impl CmpOp {
    /// The operator symbol, for renderers and debugging.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// An expression fragment. The renderer decides how each node prints in the
/// target language.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Expr {
    /// A string literal (unescaped; the renderer escapes for its target).
    Str(String),
    /// A signed integer literal.
    Int(i64),
    /// An unsigned integer literal.
    UInt(u64),
    /// A floating point literal.
    Float(f64),
    /// A boolean literal.
    Bool(bool),

    /// The current value of a field of the validated message.
    FieldValue {
        /// Field name in the declaring type.
        field: String,
    },
    /// The value a builder attempts to assign (set-once checks).
    ProposedValue {
        /// Field name in the declaring type.
        field: String,
    },
    /// The element bound by an enclosing collection quantifier.
    Element {
        /// The loop variable's name.
        var: String,
    },
    /// The moment of validation; the renderer supplies the clock.
    CurrentTime,
    /// A reference to a prologue or supporting declaration.
    Ref {
        /// The declaration's name.
        declaration: String,
    },

    /// Presence probe: the field does not hold its type's unset value.
    FieldIsSet {
        /// Field name in the declaring type.
        field: String,
    },
    /// Presence probe over a oneof group: some member field is set.
    OneofIsSet {
        /// The group name.
        group: String,
    },

    /// Binary comparison.
    Compare {
        /// The operator.
        op: CmpOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Boolean combination; operands are independently short-circuit-safe.
    Logical {
        /// The operator.
        op: BoolOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Boolean negation.
    Not(Box<Expr>),

    /// Collection quantifier: true if any element of `field` satisfies
    /// `predicate`, with the element bound to [`Expr::Element`] under `var`.
    /// For map fields the elements are the values.
    AnyElement {
        /// The collection field's name.
        field: String,
        /// The bound variable's name.
        var: String,
        /// The per-element predicate.
        predicate: Box<Expr>,
    },
    /// Regex probe against a compiled-pattern declaration.
    Matches {
        /// Name of the compiled-pattern declaration.
        pattern: String,
        /// The text being probed.
        input: Box<Expr>,
        /// Substring search instead of an anchored full match.
        partial: bool,
    },
    /// A pattern source compiled into a pattern constant; used as the
    /// initializer of a prologue declaration.
    PatternConstant {
        /// The pattern source in literal (re-escaped) form.
        source: String,
        /// The declared matching modifiers.
        modifier: PatternModifier,
    },
    /// Probe for duplicate elements in a collection field.
    HasDuplicates {
        /// The collection field's name.
        field: String,
    },
    /// The duplicate elements of a collection field in first-seen order.
    DuplicatesOf {
        /// The collection field's name.
        field: String,
    },
    /// Probe: a message value fails its own constraints.
    NestedInvalid {
        /// The probed message value.
        value: Box<Expr>,
    },

    /// Ordered concatenation of string-valued fragments (rendered message
    /// templates).
    Concat(Vec<Expr>),
}

impl Expr {
    /// The current value of `field`.
    #[must_use]
    pub fn field_value(field: impl Into<String>) -> Self {
        Self::FieldValue {
            field: field.into(),
        }
    }

    /// Presence probe for `field`.
    #[must_use]
    pub fn field_is_set(field: impl Into<String>) -> Self {
        Self::FieldIsSet {
            field: field.into(),
        }
    }

    /// `lhs <op> rhs`.
    #[must_use]
    pub fn compare(op: CmpOp, lhs: Self, rhs: Self) -> Self {
        Self::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `lhs && rhs`.
    #[must_use]
    pub fn and(lhs: Self, rhs: Self) -> Self {
        Self::Logical {
            op: BoolOp::And,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `lhs || rhs`.
    #[must_use]
    pub fn or(lhs: Self, rhs: Self) -> Self {
        Self::Logical {
            op: BoolOp::Or,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `!expr`.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Self) -> Self {
        Self::Not(Box::new(expr))
    }
}

/// One violation record appended by a generated check.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationFragment {
    /// Dot-separated path of the violated field (or oneof/message name).
    pub field_path: String,
    /// The violated option, e.g. `"(required)"`.
    pub constraint: &'static str,
    /// The rendered error message (literal spans merged, dynamic spans
    /// interlaced).
    pub message: Expr,
    /// The culprit value, when one is attributable.
    pub value: Option<Expr>,
}

/// A named constant emitted ahead of the checks, e.g. a compiled pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The declaration's name, unique within the message's generated scope.
    pub name: String,
    /// Its initializer.
    pub init: Expr,
}

/// Element-distribution metadata for a constraint whose natural unit is a
/// single element of a collection field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// The collection field iterated over.
    pub collection: String,
    /// The variable the element is bound to inside the per-element check.
    pub element_var: String,
}

/// Everything generated for one finalized constraint.
///
/// Generation is a pure function of the constraint state and the field
/// descriptor: repeatable, no input mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedConstraint {
    /// The constrained field/oneof/message.
    pub subject: SubjectKey,
    /// Which option produced this constraint.
    pub kind: OptionKind,
    /// True exactly when the constraint is violated. When `distribution` is
    /// present the condition is a per-element predicate over
    /// [`Expr::Element`]; the renderer evaluates it inside the loop the
    /// distribution describes.
    pub condition: Expr,
    /// The violation records to append when `condition` holds.
    pub violations: Vec<ViolationFragment>,
    /// Setup emitted once per field ahead of the check, if any.
    pub prologue: Option<Declaration>,
    /// Further declarations referenced by the fragments.
    pub supporting: Vec<Declaration>,
    /// Present when the check iterates a collection's elements.
    pub distribution: Option<Distribution>,
}
