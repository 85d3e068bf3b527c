use std::fmt;
use std::sync::Mutex;

use crate::compiler::fact::SourceOrigin;

/// Top-level error type returned by constraint compilation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CompileError {
    /// One or more fatal diagnostics were raised against the message type.
    /// Code generation for the artifact was not attempted; the diagnostics
    /// themselves were delivered to the configured [`DiagnosticSink`].
    #[error("constraints of `{message_type}` rejected: {count} fatal diagnostic(s)")]
    ConstraintsRejected {
        /// Full name of the message type whose constraints were rejected.
        message_type: String,
        /// Number of fatal diagnostics raised during the pass.
        count: usize,
    },

    /// An invariant of the compilation pipeline itself was breached.
    #[error("internal error: {cause}")]
    Internal {
        /// Description of the breached invariant.
        cause: String,
    },
}

/// How severe a diagnostic is, and therefore whether it blocks generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Suspicious but valid; processing continues.
    Warning,
    /// Fatal for the enclosing artifact; no code is generated for it.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// The closed set of conditions a policy can report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticKind {
    /// An option was applied to a field or oneof shape it does not support.
    TypeUnsupported {
        /// The offending option, e.g. `"(required)"`.
        option: &'static str,
        /// Printable description of the subject's actual type.
        actual: String,
        /// Printable description of the shapes the option supports.
        supported: &'static str,
    },

    /// A companion option was used without its primary counterpart.
    CompanionWithoutPrimary {
        /// The companion option, e.g. `"(if_missing)"`.
        companion: &'static str,
        /// The primary option it customizes, e.g. `"(required)"`.
        primary: &'static str,
    },

    /// A custom error message references a placeholder the option does not
    /// declare supported.
    UnsupportedPlaceholder {
        /// The option whose message was checked.
        option: &'static str,
        /// The offending placeholder tokens, in template order.
        offending: Vec<String>,
        /// The tokens the option supports.
        supported: Vec<&'static str>,
    },

    /// A cross-field option names a companion field absent from the
    /// declaring type.
    UnknownCompanionField {
        /// The option that named the field.
        option: &'static str,
        /// The companion field name as written.
        field: String,
        /// Full name of the declaring message type.
        declaring_type: String,
    },

    /// A cross-field option names its own subject as the companion.
    SelfReferencingCompanion {
        /// The offending option.
        option: &'static str,
        /// The field that references itself.
        field: String,
    },

    /// A range option's textual bound does not parse per the bracket
    /// notation `[lo..hi)` / `(lo..hi]`.
    MalformedRangeNotation {
        /// The notation as written.
        notation: String,
        /// What exactly failed to parse.
        detail: String,
    },

    /// A pattern option's regular expression does not compile.
    MalformedPattern {
        /// The pattern as written.
        pattern: String,
        /// What the regex engine rejected.
        detail: String,
    },

    /// A require option's boolean combination expression does not parse.
    MalformedCombination {
        /// The expression as written.
        expression: String,
        /// What exactly failed to parse.
        detail: String,
    },

    /// A superseded option was used. Processing continues with the modern
    /// equivalent's semantics.
    DeprecatedOptionUsed {
        /// The deprecated option.
        option: &'static str,
        /// The option that replaces it.
        replacement: &'static str,
    },

    /// A bound or range targets an unsigned-represented primitive, which
    /// many target languages store as a signed bit pattern.
    UnsignedPrimitiveCaveat {
        /// The field carrying the bound.
        field: String,
        /// The unsigned primitive kind, e.g. `"uint32"`.
        kind: &'static str,
    },
}

impl DiagnosticKind {
    /// The severity this condition is reported at.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::DeprecatedOptionUsed { .. } | Self::UnsignedPrimitiveCaveat { .. } => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeUnsupported {
                option,
                actual,
                supported,
            } => write!(
                f,
                "{option} does not apply to {actual}; supported: {supported}"
            ),
            Self::CompanionWithoutPrimary { companion, primary } => write!(
                f,
                "{companion} requires {primary} to be declared on the same subject"
            ),
            Self::UnsupportedPlaceholder {
                option,
                offending,
                supported,
            } => write!(
                f,
                "message for {option} uses unsupported placeholder(s) {}; supported: {}",
                offending.join(", "),
                supported.join(", ")
            ),
            Self::UnknownCompanionField {
                option,
                field,
                declaring_type,
            } => write!(
                f,
                "{option} names `{field}`, which is not declared in `{declaring_type}`"
            ),
            Self::SelfReferencingCompanion { option, field } => {
                write!(f, "{option} on `{field}` must not reference `{field}` itself")
            }
            Self::MalformedRangeNotation { notation, detail } => {
                write!(f, "malformed range `{notation}`: {detail}")
            }
            Self::MalformedPattern { pattern, detail } => {
                write!(f, "malformed pattern `{pattern}`: {detail}")
            }
            Self::MalformedCombination { expression, detail } => {
                write!(f, "malformed combination `{expression}`: {detail}")
            }
            Self::DeprecatedOptionUsed {
                option,
                replacement,
            } => write!(f, "{option} is deprecated; use {replacement} instead"),
            Self::UnsignedPrimitiveCaveat { field, kind } => write!(
                f,
                "`{field}` is {kind}: bound values are stored as signed bit patterns \
                 and compared with unsigned semantics"
            ),
        }
    }
}

/// A single condition reported against a declared option occurrence.
///
/// Diagnostics carry the source origin of the option declaration so the host
/// can point at the offending schema line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What was reported.
    pub kind: DiagnosticKind,
    /// Where the offending option was declared.
    pub origin: SourceOrigin,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, origin: &SourceOrigin) -> Self {
        Self {
            kind,
            origin: origin.clone(),
        }
    }

    /// The severity of the underlying condition.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Whether this diagnostic blocks code generation for its artifact.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.origin, self.severity(), self.kind)
    }
}

/// Receives diagnostics as the pass produces them.
///
/// The compiler never prints and never aborts the host process; it reports
/// severities here and leaves the abort decision to the host.
pub trait DiagnosticSink: Send + Sync {
    /// Accept one diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// A sink that buffers everything it receives. Suitable for hosts that
/// post-process diagnostics per artifact, and for tests.
#[derive(Default)]
pub struct CollectingSink {
    collected: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything reported so far, in report order.
    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(
            &mut self
                .collected
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        )
    }

    /// Number of diagnostics reported so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collected
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether nothing was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.collected
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(diagnostic);
    }
}

/// A sink that drops everything. Used when the host opts out of diagnostics.
pub(crate) struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}
