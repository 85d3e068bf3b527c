//! Constraint compilation for declarative validation options on
//! protobuf-style message schemas.
//!
//! This crate consumes one *fact* per declared option occurrence (delivered
//! by an external discovery feed), checks each fact against the per-option
//! policy, accumulates the surviving facts into per-field constraint states,
//! and renders every finalized constraint into structured code fragments:
//! a boolean condition, a violation-construction effect, and optional
//! prologue/supporting declarations. An external renderer splices the
//! fragments into real message and builder sources.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use provalid::{Compiler, OptionFact};
//! # fn example(descriptor: prost_reflect::MessageDescriptor, facts: Vec<OptionFact>) {
//! let compiler = Compiler::new();
//! match compiler.compile_message(&descriptor, facts) {
//!     Ok(compiled) => { /* hand compiled.constraints to the renderer */ }
//!     Err(e) => eprintln!("constraints rejected: {e}"),
//! }
//! # }
//! ```
//!
//! Diagnostics (both fatal and warnings) are pushed to a [`DiagnosticSink`]
//! rather than printed; the host decides whether to abort the artifact.
//!
//! # Error types
//!
//! | Type | When |
//! |------|------|
//! | [`CompileError::ConstraintsRejected`] | One or more fatal diagnostics were raised for the message |
//! | [`CompileError::Internal`] | An invariant of the pipeline itself was breached |
//!
//! # Re-exported types
//!
//! The [`options`] module re-exports
//! [`provalid-options`](https://crates.io/crates/provalid-options) so hosts
//! do not need to depend on it directly.

#![warn(missing_docs)]

mod compiler;
mod error;
mod template;

#[cfg(test)]
pub(crate) mod testutil;

/// Re-export of [`provalid-options`](https://crates.io/crates/provalid-options):
/// the typed option payloads consumed by the compiler.
pub use provalid_options as options;

pub use compiler::bound::{Bound, BoundValue, NumericKind, Range};
pub use compiler::codegen::collection::first_seen_duplicates;
pub use compiler::codegen::fragment::{
    CmpOp, Declaration, Distribution, Expr, GeneratedConstraint, ViolationFragment,
};
pub use compiler::fact::{
    FieldRef, OneofRef, OptionFact, OptionPayload, SourceOrigin, Subject, SubjectKey,
};
pub use compiler::pattern::CompiledPattern;
pub use compiler::rule::{BoolOp, OtherValue, Rule};
pub use compiler::shape::FieldShape;
pub use compiler::view::{ConstraintPayload, ConstraintState};
pub use compiler::{CompiledMessage, Compiler, CompilerOption, OptionKind};
pub use error::{
    CollectingSink, CompileError, Diagnostic, DiagnosticKind, DiagnosticSink, Severity,
};
pub use template::{Binding, Placeholder, Template};
