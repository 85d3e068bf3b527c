//! Shared test fixtures.
//!
//! Builds a small descriptor pool by hand so tests do not need `protoc` or
//! checked-in descriptor blobs. The `acme.Order` message covers every field
//! shape the compiler distinguishes.

use std::sync::LazyLock;

use prost_reflect::{DescriptorPool, FieldDescriptor, MessageDescriptor, OneofDescriptor};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, FileDescriptorSet, MessageOptions,
    OneofDescriptorProto,
};

static POOL: LazyLock<DescriptorPool> = LazyLock::new(|| {
    let set = FileDescriptorSet {
        file: vec![timestamp_file(), acme_file()],
    };
    DescriptorPool::from_file_descriptor_set(set).expect("fixture descriptors are well formed")
});

/// Handle to the fixture pool.
pub(crate) struct OrderSchema;

/// The fixture: `acme.Order`, `acme.Party` and `google.protobuf.Timestamp`.
pub(crate) fn order_schema() -> OrderSchema {
    OrderSchema
}

impl OrderSchema {
    pub(crate) fn order(&self) -> MessageDescriptor {
        POOL.get_message_by_name("acme.Order")
            .expect("acme.Order is in the fixture pool")
    }

    pub(crate) fn party(&self) -> MessageDescriptor {
        POOL.get_message_by_name("acme.Party")
            .expect("acme.Party is in the fixture pool")
    }

    pub(crate) fn field(&self, name: &str) -> FieldDescriptor {
        self.order()
            .get_field_by_name(name)
            .unwrap_or_else(|| panic!("acme.Order has a field `{name}`"))
    }

    pub(crate) fn oneof(&self, name: &str) -> OneofDescriptor {
        self.order()
            .oneofs()
            .find(|o| o.name() == name)
            .unwrap_or_else(|| panic!("acme.Order has a oneof `{name}`"))
    }
}

fn scalar(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn repeated(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..scalar(name, number, ty)
    }
}

fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar(name, number, Type::Message)
    }
}

fn oneof_member(name: &str, number: i32, ty: Type, oneof_index: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        oneof_index: Some(oneof_index),
        ..scalar(name, number, ty)
    }
}

fn timestamp_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("google/protobuf/timestamp.proto".to_string()),
        package: Some("google.protobuf".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            name: Some("Timestamp".to_string()),
            field: vec![
                scalar("seconds", 1, Type::Int64),
                scalar("nanos", 2, Type::Int32),
            ],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn acme_file() -> FileDescriptorProto {
    let attributes_entry = DescriptorProto {
        name: Some("AttributesEntry".to_string()),
        field: vec![
            scalar("key", 1, Type::String),
            scalar("value", 2, Type::String),
        ],
        options: Some(MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    };

    let order = DescriptorProto {
        name: Some("Order".to_string()),
        field: vec![
            scalar("tracking_id", 1, Type::String),
            scalar("age", 2, Type::Int32),
            scalar("count", 3, Type::Uint32),
            scalar("priority", 4, Type::Bool),
            repeated("tags", 5, Type::String),
            repeated("scores", 6, Type::Int32),
            FieldDescriptorProto {
                label: Some(Label::Repeated as i32),
                ..message_field("attributes", 7, ".acme.Order.AttributesEntry")
            },
            message_field("delivered_at", 8, ".google.protobuf.Timestamp"),
            message_field("payer", 9, ".acme.Party"),
            FieldDescriptorProto {
                label: Some(Label::Repeated as i32),
                ..message_field("parties", 10, ".acme.Party")
            },
            oneof_member("card_number", 11, Type::String, 0),
            oneof_member("iban", 12, Type::String, 0),
        ],
        nested_type: vec![attributes_entry],
        oneof_decl: vec![OneofDescriptorProto {
            name: Some("payment".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };

    let party = DescriptorProto {
        name: Some("Party".to_string()),
        field: vec![
            scalar("name", 1, Type::String),
            scalar("email", 2, Type::String),
        ],
        ..Default::default()
    };

    FileDescriptorProto {
        name: Some("acme/order.proto".to_string()),
        package: Some("acme".to_string()),
        syntax: Some("proto3".to_string()),
        dependency: vec!["google/protobuf/timestamp.proto".to_string()],
        message_type: vec![order, party],
        ..Default::default()
    }
}
