use std::collections::HashSet;
use std::fmt;

use crate::error::SchemaError;

/// Scalar column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    String,
    /// Always null; reads only the empty string
    Null,
}

impl ScalarType {
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::Bool => "bool",
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Char => "char",
            ScalarType::String => "string",
            ScalarType::Null => "null",
        }
    }

    /// Check if value is of this type (nulls are checked separately)
    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ScalarType::Bool, Value::Bool(_))
                | (ScalarType::I8, Value::I8(_))
                | (ScalarType::I16, Value::I16(_))
                | (ScalarType::I32, Value::I32(_))
                | (ScalarType::I64, Value::I64(_))
                | (ScalarType::U8, Value::U8(_))
                | (ScalarType::U16, Value::U16(_))
                | (ScalarType::U32, Value::U32(_))
                | (ScalarType::U64, Value::U64(_))
                | (ScalarType::F32, Value::F32(_))
                | (ScalarType::F64, Value::F64(_))
                | (ScalarType::Char, Value::Char(_))
                | (ScalarType::String, Value::String(_))
                | (ScalarType::Null, Value::Null)
        )
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Member names of an enum, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumDescriptor {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Descriptor for a type implementing [`DsvEnum`](crate::DsvEnum).
    pub fn of<E: crate::schema::record::DsvEnum>() -> Self {
        Self::new(E::NAME, E::VARIANTS.iter().copied())
    }

    /// Ordinal of the member with this exact name
    pub fn position(&self, variant: &str) -> Option<usize> {
        self.variants.iter().position(|v| v == variant)
    }
}

/// What a field holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar { ty: ScalarType, nullable: bool },
    Enum { descriptor: EnumDescriptor, nullable: bool },
    /// Records, lists and maps as field values. Never valid in a flat row.
    Nested { type_name: String },
}

impl FieldKind {
    pub fn scalar(ty: ScalarType) -> Self {
        FieldKind::Scalar {
            ty,
            nullable: ty == ScalarType::Null,
        }
    }

    pub fn nullable(ty: ScalarType) -> Self {
        FieldKind::Scalar { ty, nullable: true }
    }

    pub fn enumeration(descriptor: EnumDescriptor) -> Self {
        FieldKind::Enum {
            descriptor,
            nullable: false,
        }
    }

    pub fn nullable_enum(descriptor: EnumDescriptor) -> Self {
        FieldKind::Enum {
            descriptor,
            nullable: true,
        }
    }

    pub fn nested(type_name: impl Into<String>) -> Self {
        FieldKind::Nested {
            type_name: type_name.into(),
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            FieldKind::Scalar { ty, nullable } => *nullable || *ty == ScalarType::Null,
            FieldKind::Enum { nullable, .. } => *nullable,
            FieldKind::Nested { .. } => false,
        }
    }

    /// Same kind with nullability switched on.
    pub fn into_nullable(self) -> Self {
        match self {
            FieldKind::Scalar { ty, .. } => FieldKind::Scalar { ty, nullable: true },
            FieldKind::Enum { descriptor, .. } => FieldKind::Enum {
                descriptor,
                nullable: true,
            },
            nested => nested,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar { ty, nullable } => {
                write!(f, "{}", ty)?;
                if *nullable && *ty != ScalarType::Null {
                    f.write_str("?")?;
                }
                Ok(())
            }
            FieldKind::Enum {
                descriptor,
                nullable,
            } => write!(
                f,
                "enum {}{}",
                descriptor.name,
                if *nullable { "?" } else { "" }
            ),
            FieldKind::Nested { type_name } => write!(f, "nested {}", type_name),
        }
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Position in the schema
    pub index: usize,
    /// Has a default, so may be absent from the input
    pub optional: bool,
    pub kind: FieldKind,
}

/// Ordered field descriptors of one record shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    record_name: String,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn builder(record_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            record_name: record_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn record_name(&self) -> &str {
        &self.record_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldDescriptor> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Rejects shapes that cannot be represented as flat rows.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptySchema {
                record: self.record_name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if let FieldKind::Nested { type_name } = &field.kind {
                return Err(SchemaError::UnsupportedField {
                    field: field.name.clone(),
                    kind: type_name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    record: self.record_name.clone(),
                    field: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Builds a [`Schema`] field by field, in order.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    record_name: String,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Adds a required field.
    pub fn field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(name.into(), kind, false)
    }

    /// Adds a field that has a default and may be missing from the header.
    pub fn optional_field(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(name.into(), kind, true)
    }

    /// Adds a required field whose kind follows from a Rust type.
    pub fn scalar<T: crate::schema::record::Scalar>(self, name: impl Into<String>) -> Self {
        self.push(name.into(), T::field_kind(), false)
    }

    /// Adds an optional field whose kind follows from a Rust type.
    pub fn optional_scalar<T: crate::schema::record::Scalar>(self, name: impl Into<String>) -> Self {
        self.push(name.into(), T::field_kind(), true)
    }

    pub fn build(self) -> Schema {
        Schema {
            record_name: self.record_name,
            fields: self.fields,
        }
    }

    fn push(mut self, name: String, kind: FieldKind, optional: bool) -> Self {
        let index = self.fields.len();
        self.fields.push(FieldDescriptor {
            name,
            index,
            optional,
            kind,
        });
        self
    }
}

/// A decoded or to-be-encoded field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    /// Enum member by ordinal
    Enum(usize),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Char(_) => "char",
            Value::String(_) => "string",
            Value::Enum(_) => "enum",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> SchemaBuilder {
        Schema::builder("Person")
            .field("id", FieldKind::scalar(ScalarType::U32))
            .field("name", FieldKind::scalar(ScalarType::String))
    }

    #[test]
    fn test_builder_assigns_indices() {
        let schema = person()
            .optional_field("nick", FieldKind::nullable(ScalarType::String))
            .build();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.field_index("nick"), Some(2));
        assert_eq!(schema.field(2).map(|f| f.optional), Some(true));
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_nested() {
        let schema = person()
            .field("address", FieldKind::nested("Address"))
            .build();
        assert_eq!(
            schema.validate(),
            Err(SchemaError::UnsupportedField {
                field: "address".to_string(),
                kind: "Address".to_string()
            })
        );
    }

    #[test]
    fn test_validate_rejects_empty_and_duplicates() {
        assert!(matches!(
            Schema::builder("Empty").build().validate(),
            Err(SchemaError::EmptySchema { .. })
        ));
        assert!(matches!(
            person()
                .field("id", FieldKind::scalar(ScalarType::I64))
                .build()
                .validate(),
            Err(SchemaError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_null_type_is_nullable() {
        assert!(FieldKind::scalar(ScalarType::Null).is_nullable());
        assert!(!FieldKind::scalar(ScalarType::I32).is_nullable());
        assert_eq!(FieldKind::nullable(ScalarType::I32).to_string(), "i32?");
    }

    #[test]
    fn test_scalar_type_matches() {
        assert!(ScalarType::U8.matches(&Value::U8(1)));
        assert!(!ScalarType::U8.matches(&Value::I8(1)));
        assert!(ScalarType::Null.matches(&Value::Null));
    }
}
