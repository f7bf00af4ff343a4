//! Schema adapter: maps typed, flat records onto positional string rows and back.

mod decoder;
mod encoder;
pub mod naming;
mod record;
mod scalar;
mod types;

pub use decoder::{DecodePolicy, RecordDecoder};
pub use encoder::RecordEncoder;
pub use record::{DecodedFields, DsvEnum, DsvRecord, Scalar};
pub use types::{
    EnumDescriptor, FieldDescriptor, FieldKind, ScalarType, Schema, SchemaBuilder, Value,
};
