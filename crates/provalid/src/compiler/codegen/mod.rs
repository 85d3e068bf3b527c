//! Code-generation dispatch.
//!
//! Selects a generator per `(option kind, field shape)`, runs it, and
//! assembles the resulting fragments. Constraints whose natural unit is a
//! single element of a collection (pattern, bounds, when, validate) go
//! through [`Distributing`], which re-targets the scalar generator at an
//! element reference and records the iteration for the renderer.

pub(crate) mod bounds;
pub(crate) mod collection;
pub(crate) mod combine;
pub mod fragment;
pub(crate) mod nested;
pub(crate) mod oneof;
pub(crate) mod pattern;
pub(crate) mod presence;
pub(crate) mod temporal;

use std::collections::HashMap;

use prost_reflect::{FieldDescriptor, MessageDescriptor};

use crate::compiler::shape::{self, FieldShape};
use crate::compiler::view::{ConstraintPayload, ConstraintState};
use crate::error::CompileError;
use crate::template::{Binding, Placeholder};

use fragment::{Declaration, Distribution, Expr, GeneratedConstraint, ViolationFragment};

/// The variable a distributing wrapper binds each element to.
pub(crate) const ELEMENT_VAR: &str = "element";

/// One constraint's fragment producer.
///
/// Generation is a pure function of the constraint state and the field
/// descriptor; no method mutates the generator, so re-running one yields
/// identical fragments.
pub(crate) trait Generator {
    /// True exactly when the constraint is violated.
    fn condition(&self) -> Expr;

    /// Append the violation records the renderer emits when
    /// [`Generator::condition`] holds.
    fn violation(&self, out: &mut Vec<ViolationFragment>);

    /// Per-field setup emitted once ahead of the check.
    fn prologue(&self) -> Option<Declaration> {
        None
    }

    /// Further declarations referenced by the fragments.
    fn supporting_declarations(&self) -> Vec<Declaration> {
        Vec::new()
    }
}

/// What a scalar generator's comparisons read: the field itself, or the
/// element bound by an enclosing [`Distributing`] wrapper.
#[derive(Debug, Clone)]
pub(crate) enum Target {
    /// The field's own value.
    Field(String),
    /// The element variable of the surrounding iteration.
    Element,
}

impl Target {
    pub(crate) fn expr(&self) -> Expr {
        match self {
            Self::Field(name) => Expr::field_value(name.clone()),
            Self::Element => Expr::Element {
                var: ELEMENT_VAR.to_string(),
            },
        }
    }
}

/// Re-invokes a scalar generator against each element of a collection
/// field. The inner generator was constructed with [`Target::Element`], so
/// its fragments already read the loop variable; this wrapper contributes
/// the iteration metadata.
pub(crate) struct Distributing<G> {
    inner: G,
    collection: String,
}

impl<G: Generator> Distributing<G> {
    pub(crate) fn new(collection: impl Into<String>, inner: G) -> Self {
        Self {
            inner,
            collection: collection.into(),
        }
    }

    fn distribution(&self) -> Distribution {
        Distribution {
            collection: self.collection.clone(),
            element_var: ELEMENT_VAR.to_string(),
        }
    }
}

impl<G: Generator> Generator for Distributing<G> {
    fn condition(&self) -> Expr {
        self.inner.condition()
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        self.inner.violation(out);
    }

    fn prologue(&self) -> Option<Declaration> {
        self.inner.prologue()
    }

    fn supporting_declarations(&self) -> Vec<Declaration> {
        self.inner.supporting_declarations()
    }
}

/// Generate the fragments for one finalized constraint.
pub(crate) fn generate(
    declaring: &MessageDescriptor,
    state: &ConstraintState,
) -> Result<GeneratedConstraint, CompileError> {
    match &state.payload {
        ConstraintPayload::Required => {
            let field = field_of(declaring, state)?;
            Ok(assemble(state, &presence::Required::new(state, &field), None))
        }
        ConstraintPayload::Goes { companion } => {
            let field = field_of(declaring, state)?;
            Ok(assemble(
                state,
                &presence::Goes::new(state, &field, companion),
                None,
            ))
        }
        ConstraintPayload::SetOnce => {
            let field = field_of(declaring, state)?;
            Ok(assemble(state, &presence::SetOnce::new(state, &field), None))
        }
        ConstraintPayload::Bounds(range) => {
            let field = field_of(declaring, state)?;
            distribute(state, &field, |target| {
                bounds::Bounds::new(state, &field, target, range)
            })
        }
        ConstraintPayload::Pattern(pattern) => {
            let field = field_of(declaring, state)?;
            distribute(state, &field, |target| {
                pattern::Match::new(state, &field, target, pattern)
            })
        }
        ConstraintPayload::When(time) => {
            let field = field_of(declaring, state)?;
            distribute(state, &field, |target| {
                temporal::When::new(state, &field, target, *time)
            })
        }
        ConstraintPayload::Validate => {
            let field = field_of(declaring, state)?;
            distribute(state, &field, |target| {
                nested::Validate::new(state, &field, target)
            })
        }
        ConstraintPayload::Distinct => {
            let field = field_of(declaring, state)?;
            Ok(assemble(
                state,
                &collection::Distinct::new(state, &field),
                None,
            ))
        }
        ConstraintPayload::Choice => Ok(assemble(state, &oneof::Choice::new(state), None)),
        ConstraintPayload::Require { rule, expression } => Ok(assemble(
            state,
            &combine::Require::new(state, rule, expression),
            None,
        )),
    }
}

/// Run a scalar generator directly for singular fields, or under a
/// [`Distributing`] wrapper for collections.
fn distribute<G, F>(
    state: &ConstraintState,
    field: &FieldDescriptor,
    make: F,
) -> Result<GeneratedConstraint, CompileError>
where
    G: Generator,
    F: Fn(Target) -> G,
{
    if FieldShape::of(field).is_collection() {
        let wrapper = Distributing::new(field.name(), make(Target::Element));
        let distribution = wrapper.distribution();
        Ok(assemble(state, &wrapper, Some(distribution)))
    } else {
        Ok(assemble(
            state,
            &make(Target::Field(field.name().to_string())),
            None,
        ))
    }
}

fn assemble(
    state: &ConstraintState,
    generator: &dyn Generator,
    distribution: Option<Distribution>,
) -> GeneratedConstraint {
    let mut violations = Vec::new();
    generator.violation(&mut violations);
    GeneratedConstraint {
        subject: state.subject.clone(),
        kind: state.kind,
        condition: generator.condition(),
        violations,
        prologue: generator.prologue(),
        supporting: generator.supporting_declarations(),
        distribution,
    }
}

fn field_of(
    declaring: &MessageDescriptor,
    state: &ConstraintState,
) -> Result<FieldDescriptor, CompileError> {
    declaring
        .get_field_by_name(&state.subject.name)
        .ok_or_else(|| CompileError::Internal {
            cause: format!(
                "constraint subject `{}` is not a field of `{}`",
                state.subject.name,
                declaring.full_name()
            ),
        })
}

/// The field-identity bindings every field-level message supports.
fn base_bindings(
    state: &ConstraintState,
    field: &FieldDescriptor,
) -> HashMap<Placeholder, Binding> {
    HashMap::from([
        (
            Placeholder::FieldPath,
            Binding::Static(field.name().to_string()),
        ),
        (
            Placeholder::ParentType,
            Binding::Static(state.subject.declaring_type.clone()),
        ),
        (
            Placeholder::FieldType,
            Binding::Static(shape::describe_kind(&field.kind()).to_string()),
        ),
    ])
}
