//! Typed payloads for the validation options understood by the
//! [`provalid`](https://crates.io/crates/provalid) constraint compiler.
//!
//! Each declared option occurrence in a schema arrives at the compiler as one
//! of these messages, decoded by the (external) discovery feed from the
//! option's wire form. The types mirror the option schema one-to-one:
//!
//! | Option | Payload | Applies to |
//! |--------|---------|------------|
//! | `(required)` | [`RequiredOption`] | field |
//! | `(if_missing)` | [`IfMissingOption`] | field (companion) |
//! | `(pattern)` | [`PatternOption`] | field |
//! | `(min)` / `(max)` | [`MinOption`] / [`MaxOption`] | field |
//! | `(range)` | [`RangeOption`] | field |
//! | `(distinct)` | [`DistinctOption`] | field |
//! | `(if_has_duplicates)` | [`IfHasDuplicatesOption`] | field (companion) |
//! | `(goes)` | [`GoesOption`] | field |
//! | `(set_once)` | [`SetOnceOption`] | field |
//! | `(if_set_again)` | [`IfSetAgainOption`] | field (companion) |
//! | `(when)` | [`WhenOption`] | field |
//! | `(validate)` | [`ValidateOption`] | field |
//! | `(if_invalid)` | [`IfInvalidOption`] | field (deprecated companion) |
//! | `(choice)` | [`ChoiceOption`] | oneof |
//! | `(is_required)` | [`IsRequiredOption`] | oneof (deprecated) |
//! | `(require)` | [`RequireOption`] | message |
//!
//! Most users do not need this crate directly — `provalid` re-exports it via
//! its `options` module.

#![warn(missing_docs)]
#![allow(clippy::must_use_candidate)]

/// Marks a field as mandatory: the field must not hold its type's unset
/// value when the message is validated.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequiredOption {
    /// Whether the constraint is enabled. `false` makes the option inert.
    #[prost(bool, tag = "1")]
    pub value: bool,
}

/// Companion of [`RequiredOption`]: overrides the error message shown when
/// the field is missing.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IfMissingOption {
    /// Custom error message template.
    #[prost(string, tag = "1")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Requires a string field to match a regular expression.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PatternOption {
    /// The regular expression the field value must match.
    #[prost(string, tag = "1")]
    pub regex: ::prost::alloc::string::String,
    /// Matching modifiers.
    #[prost(message, optional, tag = "2")]
    pub modifier: ::core::option::Option<PatternModifier>,
    /// Custom error message template.
    #[prost(string, tag = "3")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Matching modifiers for [`PatternOption`].
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PatternModifier {
    /// Letter-case-insensitive matching.
    #[prost(bool, tag = "1")]
    pub case_insensitive: bool,
    /// `.` also matches line terminators.
    #[prost(bool, tag = "2")]
    pub dot_all: bool,
    /// `^` and `$` match at line boundaries.
    #[prost(bool, tag = "3")]
    pub multiline: bool,
    /// Unicode-aware case folding and character classes.
    #[prost(bool, tag = "4")]
    pub unicode: bool,
    /// The value needs to contain a match rather than match entirely.
    #[prost(bool, tag = "5")]
    pub partial_match: bool,
}

/// Requires a numeric field to stay at or above a threshold.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MinOption {
    /// The threshold, in decimal notation.
    #[prost(string, tag = "1")]
    pub value: ::prost::alloc::string::String,
    /// Whether the threshold itself is out of bounds.
    #[prost(bool, tag = "2")]
    pub exclusive: bool,
    /// Custom error message template.
    #[prost(string, tag = "3")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Requires a numeric field to stay at or below a threshold.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MaxOption {
    /// The threshold, in decimal notation.
    #[prost(string, tag = "1")]
    pub value: ::prost::alloc::string::String,
    /// Whether the threshold itself is out of bounds.
    #[prost(bool, tag = "2")]
    pub exclusive: bool,
    /// Custom error message template.
    #[prost(string, tag = "3")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Requires a numeric field to lie within a bracketed range, e.g. `[0..10)`.
///
/// `[`/`]` make the adjacent bound inclusive, `(`/`)` exclusive.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RangeOption {
    /// The range in bracket notation.
    #[prost(string, tag = "1")]
    pub value: ::prost::alloc::string::String,
    /// Custom error message template.
    #[prost(string, tag = "2")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Forbids duplicate entries in a repeated or map-valued field.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DistinctOption {
    /// Whether the constraint is enabled.
    #[prost(bool, tag = "1")]
    pub value: bool,
}

/// Companion of [`DistinctOption`]: overrides the duplicate-entries message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IfHasDuplicatesOption {
    /// Custom error message template.
    #[prost(string, tag = "1")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Couples a field to a companion field declared in the same message:
/// this field may only be set while the companion is also set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GoesOption {
    /// Name of the companion field.
    #[prost(string, tag = "1")]
    pub with: ::prost::alloc::string::String,
    /// Custom error message template.
    #[prost(string, tag = "2")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Forbids reassigning a field once it holds a non-unset value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetOnceOption {
    /// Whether the constraint is enabled.
    #[prost(bool, tag = "1")]
    pub value: bool,
}

/// Companion of [`SetOnceOption`]: overrides the reassignment message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IfSetAgainOption {
    /// Custom error message template.
    #[prost(string, tag = "1")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Restricts a temporal field to the past or the future relative to the
/// moment of validation.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WhenOption {
    /// Which side of "now" the value must fall on.
    #[prost(enumeration = "Time", tag = "1")]
    pub r#in: i32,
    /// Custom error message template.
    #[prost(string, tag = "2")]
    pub msg_format: ::prost::alloc::string::String,
}

/// A point in time relative to the moment of validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum Time {
    /// No temporal restriction; the option is inert.
    TimeUndefined = 0,
    /// The value must lie strictly in the past.
    Past = 1,
    /// The value must lie strictly in the future.
    Future = 2,
}

/// Validates a message-typed field (or each element of a message-typed
/// collection) against its own constraints, recursively.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidateOption {
    /// Whether the constraint is enabled.
    #[prost(bool, tag = "1")]
    pub value: bool,
}

/// Deprecated companion of [`ValidateOption`]. Superseded; still honored as
/// the custom message source, with a deprecation warning.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IfInvalidOption {
    /// Custom error message template.
    #[prost(string, tag = "1")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Requires one field of a oneof group to be set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChoiceOption {
    /// Whether the constraint is enabled.
    #[prost(bool, tag = "1")]
    pub required: bool,
    /// Custom error message template.
    #[prost(string, tag = "2")]
    pub msg_format: ::prost::alloc::string::String,
}

/// Deprecated predecessor of [`ChoiceOption`]. Honored with a deprecation
/// warning, substituting the modern semantics.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IsRequiredOption {
    /// Whether the constraint is enabled.
    #[prost(bool, tag = "1")]
    pub value: bool,
}

/// Message-wide boolean combination of field presence requirements,
/// e.g. `"first | second"` or `"left ^ right"`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequireOption {
    /// The combination expression over field names declared in the message.
    #[prost(string, tag = "1")]
    pub fields: ::prost::alloc::string::String,
    /// Custom error message template.
    #[prost(string, tag = "2")]
    pub msg_format: ::prost::alloc::string::String,
}
