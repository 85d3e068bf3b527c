//! Discovery facts: one per declared option occurrence.
//!
//! The (external) discovery feed resolves each option declaration into an
//! [`OptionFact`] carrying the subject reference, the typed payload, and the
//! source origin used for diagnostics.

use std::fmt;

use prost_reflect::{FieldDescriptor, MessageDescriptor, OneofDescriptor};

use provalid_options as opts;

/// Identifies a field by its declaring type and descriptor.
///
/// Used as an event-routing key; never reused across unrelated fields.
#[derive(Debug, Clone)]
pub struct FieldRef {
    declaring: MessageDescriptor,
    field: FieldDescriptor,
}

impl FieldRef {
    /// Create a reference to `field` as declared in `declaring`.
    #[must_use]
    pub fn new(declaring: MessageDescriptor, field: FieldDescriptor) -> Self {
        Self { declaring, field }
    }

    /// The field's descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.field
    }

    /// The declaring message type's descriptor.
    #[must_use]
    pub fn declaring_type(&self) -> &MessageDescriptor {
        &self.declaring
    }

    /// The field name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        self.field.name()
    }

    /// The `(declaring type, name)` routing key.
    #[must_use]
    pub fn key(&self) -> SubjectKey {
        SubjectKey {
            declaring_type: self.declaring.full_name().to_string(),
            name: self.field.name().to_string(),
        }
    }
}

/// Identifies a oneof group by its declaring type and descriptor.
#[derive(Debug, Clone)]
pub struct OneofRef {
    declaring: MessageDescriptor,
    oneof: OneofDescriptor,
}

impl OneofRef {
    /// Create a reference to `oneof` as declared in `declaring`.
    #[must_use]
    pub fn new(declaring: MessageDescriptor, oneof: OneofDescriptor) -> Self {
        Self { declaring, oneof }
    }

    /// The oneof's descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &OneofDescriptor {
        &self.oneof
    }

    /// The declaring message type's descriptor.
    #[must_use]
    pub fn declaring_type(&self) -> &MessageDescriptor {
        &self.declaring
    }

    /// The group name as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        self.oneof.name()
    }

    /// The `(declaring type, name)` routing key.
    #[must_use]
    pub fn key(&self) -> SubjectKey {
        SubjectKey {
            declaring_type: self.declaring.full_name().to_string(),
            name: self.oneof.name().to_string(),
        }
    }
}

/// The `(declaring type, name)` pair that routes events for one field or
/// oneof. The whole message uses the declaring type with an empty name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubjectKey {
    /// Full name of the declaring message type.
    pub declaring_type: String,
    /// Field or oneof name; empty for message-wide subjects.
    pub name: String,
}

/// What an option was declared on.
#[derive(Debug, Clone)]
pub enum Subject {
    /// A field declaration.
    Field(FieldRef),
    /// A oneof group declaration.
    Oneof(OneofRef),
    /// The message itself (message-wide options such as `(require)`).
    Message(MessageDescriptor),
}

impl Subject {
    /// The event-routing key for this subject.
    #[must_use]
    pub fn key(&self) -> SubjectKey {
        match self {
            Self::Field(field) => field.key(),
            Self::Oneof(oneof) => oneof.key(),
            Self::Message(message) => SubjectKey {
                declaring_type: message.full_name().to_string(),
                name: String::new(),
            },
        }
    }

    /// The declaring message type.
    #[must_use]
    pub fn declaring_type(&self) -> &MessageDescriptor {
        match self {
            Self::Field(field) => field.declaring_type(),
            Self::Oneof(oneof) => oneof.declaring_type(),
            Self::Message(message) => message,
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Field(field) => super::shape::describe_field(field.descriptor()),
            Self::Oneof(oneof) => format!("oneof `{}`", oneof.name()),
            Self::Message(message) => format!("message `{}`", message.full_name()),
        }
    }
}

/// The file position an option was declared at, threaded into diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOrigin {
    /// Schema file path as reported by the discovery feed.
    pub file: String,
    /// One-based line of the option declaration.
    pub line: u32,
    /// One-based column of the option declaration.
    pub column: u32,
}

impl SourceOrigin {
    /// Create an origin from a file path and position.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// The typed payload of one declared option occurrence.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum OptionPayload {
    /// `(required)`
    Required(opts::RequiredOption),
    /// `(if_missing)`
    IfMissing(opts::IfMissingOption),
    /// `(pattern)`
    Pattern(opts::PatternOption),
    /// `(min)`
    Min(opts::MinOption),
    /// `(max)`
    Max(opts::MaxOption),
    /// `(range)`
    Range(opts::RangeOption),
    /// `(distinct)`
    Distinct(opts::DistinctOption),
    /// `(if_has_duplicates)`
    IfHasDuplicates(opts::IfHasDuplicatesOption),
    /// `(goes)`
    Goes(opts::GoesOption),
    /// `(set_once)`
    SetOnce(opts::SetOnceOption),
    /// `(if_set_again)`
    IfSetAgain(opts::IfSetAgainOption),
    /// `(when)`
    When(opts::WhenOption),
    /// `(validate)`
    Validate(opts::ValidateOption),
    /// `(if_invalid)` — deprecated companion of `(validate)`.
    IfInvalid(opts::IfInvalidOption),
    /// `(choice)`
    Choice(opts::ChoiceOption),
    /// `(is_required)` — deprecated predecessor of `(choice)`.
    IsRequired(opts::IsRequiredOption),
    /// `(require)`
    Require(opts::RequireOption),
}

impl OptionPayload {
    /// The option name as written in schemas, for diagnostics.
    #[must_use]
    pub fn option_name(&self) -> &'static str {
        match self {
            Self::Required(_) => "(required)",
            Self::IfMissing(_) => "(if_missing)",
            Self::Pattern(_) => "(pattern)",
            Self::Min(_) => "(min)",
            Self::Max(_) => "(max)",
            Self::Range(_) => "(range)",
            Self::Distinct(_) => "(distinct)",
            Self::IfHasDuplicates(_) => "(if_has_duplicates)",
            Self::Goes(_) => "(goes)",
            Self::SetOnce(_) => "(set_once)",
            Self::IfSetAgain(_) => "(if_set_again)",
            Self::When(_) => "(when)",
            Self::Validate(_) => "(validate)",
            Self::IfInvalid(_) => "(if_invalid)",
            Self::Choice(_) => "(choice)",
            Self::IsRequired(_) => "(is_required)",
            Self::Require(_) => "(require)",
        }
    }
}

/// One fact from the discovery feed: a single option occurrence on a single
/// subject, with its source origin.
#[derive(Debug, Clone)]
pub struct OptionFact {
    /// What the option was declared on.
    pub subject: Subject,
    /// The option's typed payload.
    pub payload: OptionPayload,
    /// Where the option was declared.
    pub origin: SourceOrigin,
}

impl OptionFact {
    /// Assemble a fact.
    #[must_use]
    pub fn new(subject: Subject, payload: OptionPayload, origin: SourceOrigin) -> Self {
        Self {
            subject,
            payload,
            origin,
        }
    }
}
