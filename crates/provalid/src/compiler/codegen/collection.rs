//! Collection generator for `(distinct)`, plus the duplicate extraction
//! hosts use to fold constant collections.

use std::collections::HashSet;

use prost_reflect::FieldDescriptor;

use super::fragment::{Expr, ViolationFragment};
use super::{Generator, base_bindings};
use crate::compiler::view::ConstraintState;
use crate::template::{Binding, Placeholder};

/// `(distinct)`: a repeated field may not contain the same element twice.
pub(crate) struct Distinct<'a> {
    state: &'a ConstraintState,
    field: &'a FieldDescriptor,
}

impl<'a> Distinct<'a> {
    pub(crate) fn new(state: &'a ConstraintState, field: &'a FieldDescriptor) -> Self {
        Self { state, field }
    }
}

impl Generator for Distinct<'_> {
    fn condition(&self) -> Expr {
        Expr::HasDuplicates {
            field: self.field.name().to_string(),
        }
    }

    fn violation(&self, out: &mut Vec<ViolationFragment>) {
        let duplicates = Expr::DuplicatesOf {
            field: self.field.name().to_string(),
        };
        let mut bindings = base_bindings(self.state, self.field);
        bindings.insert(Placeholder::Duplicates, Binding::Dynamic(duplicates.clone()));
        out.push(ViolationFragment {
            field_path: self.field.name().to_string(),
            constraint: self.state.kind.option_name(),
            message: self.state.message.render(&bindings),
            value: Some(duplicates),
        });
    }
}

/// Hashable key extracted from a `prost_reflect::Value` for O(n) duplicate
/// detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ElementKey {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(u32),
    F64(u64),
    String(String),
    Bytes(Vec<u8>),
    Enum(i32),
}

fn element_key(value: &prost_reflect::Value) -> Option<ElementKey> {
    match value {
        prost_reflect::Value::Bool(v) => Some(ElementKey::Bool(*v)),
        prost_reflect::Value::I32(v) => Some(ElementKey::I32(*v)),
        prost_reflect::Value::I64(v) => Some(ElementKey::I64(*v)),
        prost_reflect::Value::U32(v) => Some(ElementKey::U32(*v)),
        prost_reflect::Value::U64(v) => Some(ElementKey::U64(*v)),
        prost_reflect::Value::F32(v) => Some(ElementKey::F32(v.to_bits())),
        prost_reflect::Value::F64(v) => Some(ElementKey::F64(v.to_bits())),
        prost_reflect::Value::String(v) => Some(ElementKey::String(v.clone())),
        prost_reflect::Value::Bytes(v) => Some(ElementKey::Bytes(v.to_vec())),
        prost_reflect::Value::EnumNumber(v) => Some(ElementKey::Enum(*v)),
        // Composite types (Message, List, Map) fall back to O(n²) equality.
        _ => None,
    }
}

/// The duplicated elements of `list`, each reported once, in the order its
/// first repeat was seen.
#[must_use]
pub fn first_seen_duplicates(list: &[prost_reflect::Value]) -> Vec<prost_reflect::Value> {
    let keys: Option<Vec<_>> = list.iter().map(element_key).collect();
    if let Some(keys) = keys {
        let mut seen = HashSet::with_capacity(keys.len());
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for (key, value) in keys.into_iter().zip(list) {
            if !seen.insert(key.clone()) && reported.insert(key) {
                duplicates.push(value.clone());
            }
        }
        return duplicates;
    }

    // Composite elements: pairwise comparison, still first-repeat order.
    let mut duplicates: Vec<prost_reflect::Value> = Vec::new();
    for (i, item) in list.iter().enumerate() {
        let repeats = list.iter().take(i).any(|prev| prev == item);
        if repeats && !duplicates.contains(item) {
            duplicates.push(item.clone());
        }
    }
    duplicates
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Distinct, first_seen_duplicates};
    use crate::compiler::OptionKind;
    use crate::compiler::codegen::Generator;
    use crate::compiler::codegen::fragment::Expr;
    use crate::compiler::fact::SubjectKey;
    use crate::compiler::view::{ConstraintPayload, ConstraintState};
    use crate::template::Template;
    use crate::testutil::order_schema;

    fn string_list(items: &[&str]) -> Vec<prost_reflect::Value> {
        items
            .iter()
            .map(|s| prost_reflect::Value::String((*s).to_string()))
            .collect()
    }

    #[test]
    fn duplicates_come_out_in_first_repeat_order() {
        let list = string_list(&["a", "b", "a", "c", "b"]);
        assert_eq!(first_seen_duplicates(&list), string_list(&["a", "b"]));
    }

    #[test]
    fn triplicates_report_once() {
        let list = string_list(&["x", "x", "x"]);
        assert_eq!(first_seen_duplicates(&list), string_list(&["x"]));
    }

    #[test]
    fn distinct_lists_stay_silent() {
        let list = string_list(&["a", "b", "c"]);
        assert!(first_seen_duplicates(&list).is_empty());
    }

    #[test]
    fn condition_probes_the_whole_collection() {
        let schema = order_schema();
        let field = schema.field("tags");
        let state = ConstraintState {
            subject: SubjectKey {
                declaring_type: "acme.Order".to_string(),
                name: "tags".to_string(),
            },
            kind: OptionKind::Distinct,
            message: Template::parse("`${field_path}` repeats ${duplicates}"),
            custom_message: false,
            payload: ConstraintPayload::Distinct,
        };
        let generator = Distinct::new(&state, &field);

        assert_eq!(
            generator.condition(),
            Expr::HasDuplicates {
                field: "tags".to_string()
            }
        );

        let mut violations = Vec::new();
        generator.violation(&mut violations);
        assert_eq!(
            violations[0].message,
            Expr::Concat(vec![
                Expr::Str("`tags` repeats ".to_string()),
                Expr::DuplicatesOf {
                    field: "tags".to_string()
                },
            ])
        );
    }
}
