//! The compilation pipeline: facts through policies into views, then
//! through the code-generation dispatch into fragments.

pub(crate) mod bound;
pub(crate) mod codegen;
pub(crate) mod fact;
pub(crate) mod pattern;
pub(crate) mod policy;
pub(crate) mod rule;
pub(crate) mod shape;
pub(crate) mod view;

use std::fmt;
use std::sync::Arc;

use prost_reflect::MessageDescriptor;

use crate::error::{CompileError, DiagnosticSink, NullSink};

use codegen::fragment::GeneratedConstraint;
use fact::OptionFact;
use policy::{DeclaredIndex, PolicyContext};
use view::ViewMap;

/// The closed set of options that produce constraints.
///
/// Companion message options are not listed; they customize the constraint
/// of their primary and share its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum OptionKind {
    /// `(required)`
    Required,
    /// `(pattern)`
    Pattern,
    /// `(min)`
    Min,
    /// `(max)`
    Max,
    /// `(range)`
    Range,
    /// `(distinct)`
    Distinct,
    /// `(goes)`
    Goes,
    /// `(set_once)`
    SetOnce,
    /// `(when)`
    When,
    /// `(validate)`
    Validate,
    /// `(choice)`
    Choice,
    /// `(require)`
    Require,
}

impl OptionKind {
    /// The option name as written in schemas.
    #[must_use]
    pub fn option_name(self) -> &'static str {
        match self {
            Self::Required => "(required)",
            Self::Pattern => "(pattern)",
            Self::Min => "(min)",
            Self::Max => "(max)",
            Self::Range => "(range)",
            Self::Distinct => "(distinct)",
            Self::Goes => "(goes)",
            Self::SetOnce => "(set_once)",
            Self::When => "(when)",
            Self::Validate => "(validate)",
            Self::Choice => "(choice)",
            Self::Require => "(require)",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.option_name())
    }
}

/// Options for configuring the [`Compiler`] at construction time.
#[non_exhaustive]
pub enum CompilerOption {
    /// Route diagnostics to this sink instead of discarding them.
    DiagnosticSink(Arc<dyn DiagnosticSink>),
    /// Stop the policy pass at the first fatal diagnostic instead of
    /// collecting all of them.
    FailFast,
}

/// Everything compiled for one message type.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMessage {
    /// Full name of the compiled message type.
    pub message_type: String,
    /// One entry per finalized constraint, in subject order.
    pub constraints: Vec<GeneratedConstraint>,
}

/// Compiles the validation options of one message type at a time.
///
/// A compilation pass is single-threaded and processes its facts strictly
/// in order; only the primary-versus-companion ordering for the same
/// subject is immaterial.
pub struct Compiler {
    sink: Arc<dyn DiagnosticSink>,
    fail_fast: bool,
}

impl Compiler {
    /// A compiler that discards diagnostics and collects every fatal
    /// before giving up.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sink: Arc::new(NullSink),
            fail_fast: false,
        }
    }

    /// A compiler configured with the given options.
    #[must_use]
    pub fn with_options(options: Vec<CompilerOption>) -> Self {
        let mut compiler = Self::new();
        for option in options {
            match option {
                CompilerOption::DiagnosticSink(sink) => compiler.sink = sink,
                CompilerOption::FailFast => compiler.fail_fast = true,
            }
        }
        compiler
    }

    /// Compile every fact discovered for `descriptor`.
    ///
    /// Diagnostics (fatal and warnings) go to the configured sink either
    /// way. When any fatal diagnostic was raised the pass stops before
    /// code generation and reports how many; the host must not emit
    /// artifacts for this message type.
    pub fn compile_message(
        &self,
        descriptor: &MessageDescriptor,
        facts: Vec<OptionFact>,
    ) -> Result<CompiledMessage, CompileError> {
        let index = DeclaredIndex::build(&facts);
        let mut ctx = PolicyContext::new(self.sink.as_ref(), index);
        let mut views = ViewMap::new();

        for fact in &facts {
            for event in policy::apply(&mut ctx, fact) {
                views.apply(event);
            }
            if self.fail_fast && ctx.fatal_count() > 0 {
                break;
            }
        }

        if ctx.fatal_count() > 0 {
            return Err(CompileError::ConstraintsRejected {
                message_type: descriptor.full_name().to_string(),
                count: ctx.fatal_count(),
            });
        }

        let states = views.finalize();
        let mut constraints = Vec::with_capacity(states.len());
        for state in &states {
            constraints.push(codegen::generate(descriptor, state)?);
        }

        Ok(CompiledMessage {
            message_type: descriptor.full_name().to_string(),
            constraints,
        })
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use provalid_options as opts;

    use super::codegen::fragment::{CmpOp, Expr};
    use super::fact::{FieldRef, OptionFact, OptionPayload, SourceOrigin, Subject};
    use super::{Compiler, CompilerOption, OptionKind};
    use crate::error::{CollectingSink, CompileError};
    use crate::testutil::order_schema;

    fn field_fact(field: &str, payload: OptionPayload) -> OptionFact {
        let schema = order_schema();
        OptionFact::new(
            Subject::Field(FieldRef::new(schema.order(), schema.field(field))),
            payload,
            SourceOrigin::new("acme/order.proto", 6, 5),
        )
    }

    /// Evaluates condition fragments against a fixed environment: one
    /// integer field value plus per-field presence flags.
    fn eval(expr: &Expr, value: i64, present: &HashMap<&str, bool>) -> bool {
        match expr {
            Expr::Bool(b) => *b,
            Expr::Not(inner) => !eval(inner, value, present),
            Expr::Logical { op, lhs, rhs } => {
                op.apply(eval(lhs, value, present), eval(rhs, value, present))
            }
            Expr::FieldIsSet { field } => *present.get(field.as_str()).unwrap_or(&false),
            Expr::Compare { op, lhs, rhs } => {
                let (Some(lhs), Some(rhs)) = (as_int(lhs, value), as_int(rhs, value)) else {
                    panic!("non-numeric comparison in test fragment");
                };
                match op {
                    CmpOp::Eq => lhs == rhs,
                    CmpOp::Ne => lhs != rhs,
                    CmpOp::Lt => lhs < rhs,
                    CmpOp::Le => lhs <= rhs,
                    CmpOp::Gt => lhs > rhs,
                    CmpOp::Ge => lhs >= rhs,
                }
            }
            other => panic!("unexpected fragment in test condition: {other:?}"),
        }
    }

    fn as_int(expr: &Expr, value: i64) -> Option<i64> {
        match expr {
            Expr::Int(v) => Some(*v),
            Expr::FieldValue { .. } => Some(value),
            _ => None,
        }
    }

    #[test]
    fn inclusive_min_flags_minus_one_and_accepts_zero() {
        let facts = vec![field_fact(
            "age",
            OptionPayload::Min(opts::MinOption {
                value: "0".to_string(),
                exclusive: false,
                msg_format: String::new(),
            }),
        )];

        let schema = order_schema();
        let compiled = Compiler::new()
            .compile_message(&schema.order(), facts)
            .expect("a well-formed min compiles");

        assert_eq!(compiled.message_type, "acme.Order");
        assert_eq!(compiled.constraints.len(), 1);
        let constraint = &compiled.constraints[0];
        assert_eq!(constraint.kind, OptionKind::Min);

        let present = HashMap::new();
        assert!(eval(&constraint.condition, -1, &present));
        assert!(!eval(&constraint.condition, 0, &present));
    }

    #[test]
    fn primary_and_companion_compile_identically_in_either_order() {
        let primary = field_fact(
            "tracking_id",
            OptionPayload::Required(opts::RequiredOption { value: true }),
        );
        let companion = field_fact(
            "tracking_id",
            OptionPayload::IfMissing(opts::IfMissingOption {
                msg_format: "tracking id is mandatory".to_string(),
            }),
        );

        let schema = order_schema();
        let forward = Compiler::new()
            .compile_message(&schema.order(), vec![primary.clone(), companion.clone()])
            .expect("required compiles");
        let reverse = Compiler::new()
            .compile_message(&schema.order(), vec![companion, primary])
            .expect("required compiles");

        assert_eq!(forward, reverse);
        assert_eq!(
            forward.constraints[0].violations[0].message,
            Expr::Str("tracking id is mandatory".to_string())
        );
    }

    #[test]
    fn companion_of_a_disabled_primary_is_inert() {
        let disabled = field_fact(
            "tracking_id",
            OptionPayload::Required(opts::RequiredOption { value: false }),
        );
        let companion = field_fact(
            "tracking_id",
            OptionPayload::IfMissing(opts::IfMissingOption {
                msg_format: "tracking id is mandatory".to_string(),
            }),
        );

        let schema = order_schema();
        let sink = Arc::new(CollectingSink::new());
        let compiled = Compiler::with_options(vec![CompilerOption::DiagnosticSink(sink.clone())])
            .compile_message(&schema.order(), vec![disabled, companion])
            .expect("a disabled primary with a companion compiles");

        assert_eq!(compiled.constraints, vec![]);
        assert!(sink.is_empty());
    }

    #[test]
    fn require_combination_matches_the_boolean_truth_table() {
        let schema = order_schema();
        for (op, table) in [
            ('&', [true, false, false, false]),
            ('|', [true, true, true, false]),
            ('^', [false, true, true, false]),
        ] {
            let fact = OptionFact::new(
                Subject::Message(schema.order()),
                OptionPayload::Require(opts::RequireOption {
                    fields: format!("card_number {op} iban"),
                    msg_format: String::new(),
                }),
                SourceOrigin::new("acme/order.proto", 2, 1),
            );
            let compiled = Compiler::new()
                .compile_message(&schema.order(), vec![fact])
                .expect("require compiles");
            let condition = &compiled.constraints[0].condition;

            for (satisfied, inputs) in table.iter().zip([
                (true, true),
                (true, false),
                (false, true),
                (false, false),
            ]) {
                let present =
                    HashMap::from([("card_number", inputs.0), ("iban", inputs.1)]);
                // The condition is the violation probe, so it negates
                // rule satisfaction.
                assert_eq!(
                    eval(condition, 0, &present),
                    !*satisfied,
                    "operator {op} with inputs {inputs:?}"
                );
            }
        }
    }

    #[test]
    fn fatal_diagnostics_reject_the_whole_message() {
        let facts = vec![
            field_fact(
                "age",
                OptionPayload::Pattern(opts::PatternOption {
                    regex: "[0-9]+".to_string(),
                    modifier: None,
                    msg_format: String::new(),
                }),
            ),
            field_fact(
                "tracking_id",
                OptionPayload::Required(opts::RequiredOption { value: true }),
            ),
        ];

        let sink = Arc::new(CollectingSink::new());
        let compiler =
            Compiler::with_options(vec![CompilerOption::DiagnosticSink(sink.clone())]);
        let schema = order_schema();
        let err = compiler
            .compile_message(&schema.order(), facts)
            .expect_err("a pattern on a numeric field is fatal");

        let CompileError::ConstraintsRejected {
            message_type,
            count,
        } = err
        else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(message_type, "acme.Order");
        assert_eq!(count, 1);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn repeated_compilation_of_the_same_facts_is_idempotent() {
        let facts = vec![field_fact(
            "tags",
            OptionPayload::Distinct(opts::DistinctOption { value: true }),
        )];

        let schema = order_schema();
        let compiler = Compiler::new();
        let first = compiler
            .compile_message(&schema.order(), facts.clone())
            .expect("distinct compiles");
        let second = compiler
            .compile_message(&schema.order(), facts)
            .expect("distinct compiles");
        assert_eq!(first, second);
    }
}
