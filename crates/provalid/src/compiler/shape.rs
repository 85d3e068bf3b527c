//! Field shape and unset-value classification over descriptors.

use prost_reflect::{FieldDescriptor, Kind};

/// The cardinality shape of a field, which decides which generators apply
/// and whether element distribution is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldShape {
    /// A plain, single-valued field.
    Singular,
    /// A repeated (list-valued) field.
    Repeated,
    /// A map field; element constraints apply to the values.
    Map,
}

impl FieldShape {
    /// Classify a field descriptor. Maps are checked first since a map
    /// field also reports as repeated on the wire.
    #[must_use]
    pub fn of(field: &FieldDescriptor) -> Self {
        if field.is_map() {
            Self::Map
        } else if field.is_list() {
            Self::Repeated
        } else {
            Self::Singular
        }
    }

    /// Whether the field holds a collection of elements.
    #[must_use]
    pub fn is_collection(self) -> bool {
        matches!(self, Self::Repeated | Self::Map)
    }
}

impl std::fmt::Display for FieldShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Singular => f.write_str("singular"),
            Self::Repeated => f.write_str("repeated"),
            Self::Map => f.write_str("map"),
        }
    }
}

/// The value a field holds when it was never assigned.
///
/// `required`-style checks compare against this. Singular numerics and bools
/// have no distinguishable unset value at the data level, so
/// [`unset_value`] returns `None` for them and callers must treat that as a
/// constraint-applicability failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnsetValue {
    /// Empty list.
    EmptyList,
    /// Empty map.
    EmptyMap,
    /// Empty string.
    EmptyString,
    /// Empty byte string.
    EmptyBytes,
    /// The default instance of the field's message type.
    DefaultMessage,
    /// The zero-numbered variant of the field's enum type.
    DefaultEnum,
}

/// Determine the unset value for a field, if one is distinguishable.
pub(crate) fn unset_value(field: &FieldDescriptor) -> Option<UnsetValue> {
    if field.is_map() {
        return Some(UnsetValue::EmptyMap);
    }
    if field.is_list() {
        return Some(UnsetValue::EmptyList);
    }
    match field.kind() {
        Kind::String => Some(UnsetValue::EmptyString),
        Kind::Bytes => Some(UnsetValue::EmptyBytes),
        Kind::Message(_) => Some(UnsetValue::DefaultMessage),
        Kind::Enum(_) => Some(UnsetValue::DefaultEnum),
        _ => None,
    }
}

/// Printable name of a field's scalar kind, for diagnostics.
pub(crate) fn describe_kind(kind: &Kind) -> &'static str {
    match kind {
        Kind::Double => "double",
        Kind::Float => "float",
        Kind::Int32 => "int32",
        Kind::Int64 => "int64",
        Kind::Uint32 => "uint32",
        Kind::Uint64 => "uint64",
        Kind::Sint32 => "sint32",
        Kind::Sint64 => "sint64",
        Kind::Fixed32 => "fixed32",
        Kind::Fixed64 => "fixed64",
        Kind::Sfixed32 => "sfixed32",
        Kind::Sfixed64 => "sfixed64",
        Kind::Bool => "bool",
        Kind::String => "string",
        Kind::Bytes => "bytes",
        Kind::Message(_) => "message",
        Kind::Enum(_) => "enum",
    }
}

/// Printable description of a field for `TypeUnsupported` diagnostics,
/// e.g. `repeated string field \`tags\``.
pub(crate) fn describe_field(field: &FieldDescriptor) -> String {
    let shape = FieldShape::of(field);
    let kind = field.kind();
    match shape {
        FieldShape::Singular => format!("{} field `{}`", describe_kind(&kind), field.name()),
        FieldShape::Repeated => {
            format!("repeated {} field `{}`", describe_kind(&kind), field.name())
        }
        FieldShape::Map => format!("map field `{}`", field.name()),
    }
}

/// Whether the field (after element distribution) carries a point in time.
pub(crate) fn is_temporal(field: &FieldDescriptor) -> bool {
    element_kind(field)
        .as_message()
        .is_some_and(|message| message.full_name() == "google.protobuf.Timestamp")
}

/// The kind of a field's natural unit: the element kind for lists, the
/// value kind for maps, the field kind otherwise.
pub(crate) fn element_kind(field: &FieldDescriptor) -> Kind {
    if field.is_map() {
        if let Some(entry) = field.kind().as_message() {
            if let Some(value_field) = entry.get_field_by_name("value") {
                return value_field.kind();
            }
        }
    }
    field.kind()
}
