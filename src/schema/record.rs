//! The seam between Rust types and the schema adapter.
//!
//! A record type describes itself with [`DsvRecord::schema`], flattens itself
//! into one [`Value`] per field, and rebuilds itself from [`DecodedFields`].
//! Implementations are written by hand or generated.
//!
//! ```
//! use dsvkit::{DecodedFields, DsvRecord, Schema, SchemaError, Value};
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//!     label: Option<String>,
//! }
//!
//! impl DsvRecord for Point {
//!     fn schema() -> Schema {
//!         Schema::builder("Point")
//!             .scalar::<i32>("x")
//!             .scalar::<i32>("y")
//!             .optional_scalar::<Option<String>>("label")
//!             .build()
//!     }
//!
//!     fn to_values(&self) -> Vec<Value> {
//!         vec![self.x.into(), self.y.into(), self.label.clone().into()]
//!     }
//!
//!     fn from_values(mut fields: DecodedFields<'_>) -> Result<Self, SchemaError> {
//!         Ok(Point {
//!             x: fields.get(0)?,
//!             y: fields.get(1)?,
//!             label: fields.get_or_default(2)?,
//!         })
//!     }
//! }
//! ```

use super::types::{EnumDescriptor, FieldKind, ScalarType, Schema, Value};
use crate::error::SchemaError;

/// A flat record type that can be written to and read from a row.
pub trait DsvRecord: Sized {
    /// Field descriptors in column order.
    fn schema() -> Schema;

    /// One value per schema field, in schema order.
    fn to_values(&self) -> Vec<Value>;

    /// Rebuilds the record from one decoded row.
    fn from_values(fields: DecodedFields<'_>) -> Result<Self, SchemaError>;
}

/// A fieldless enum stored by member name or by ordinal.
pub trait DsvEnum: Sized {
    const NAME: &'static str;
    /// Member names in declaration order.
    const VARIANTS: &'static [&'static str];

    fn ordinal(&self) -> usize;

    fn from_ordinal(ordinal: usize) -> Option<Self>;
}

/// Typed accessor for one scalar field.
pub trait Scalar: Sized {
    fn field_kind() -> FieldKind;

    fn to_value(&self) -> Value;

    /// Converts back, handing the value back on a type mismatch.
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                fn field_kind() -> FieldKind {
                    FieldKind::scalar(ScalarType::$variant)
                }

                fn to_value(&self) -> Value {
                    Value::$variant(self.to_owned())
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_scalar!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    String => String,
);

impl Scalar for () {
    fn field_kind() -> FieldKind {
        FieldKind::scalar(ScalarType::Null)
    }

    fn to_value(&self) -> Value {
        Value::Null
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(()),
            other => Err(other),
        }
    }
}

impl<T: Scalar> Scalar for Option<T> {
    fn field_kind() -> FieldKind {
        T::field_kind().into_nullable()
    }

    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl Value {
    /// Enum member value for [`DsvRecord::to_values`].
    pub fn enumeration<E: DsvEnum>(member: &E) -> Self {
        Value::Enum(member.ordinal())
    }

    /// Nullable enum member value.
    pub fn optional_enumeration<E: DsvEnum>(member: Option<&E>) -> Self {
        member.map_or(Value::Null, Self::enumeration)
    }
}

impl FieldKind {
    /// Enum field kind for a [`DsvEnum`] type.
    pub fn enum_of<E: DsvEnum>() -> Self {
        FieldKind::enumeration(EnumDescriptor::of::<E>())
    }

    /// Nullable enum field kind for a [`DsvEnum`] type.
    pub fn nullable_enum_of<E: DsvEnum>() -> Self {
        FieldKind::nullable_enum(EnumDescriptor::of::<E>())
    }
}

/// The decoded values of one row, indexed by schema position.
///
/// A slot is empty when an optional field had no column in the header; the
/// typed getters then fall back to the caller's default. Each slot can be taken
/// once.
#[derive(Debug)]
pub struct DecodedFields<'a> {
    schema: &'a Schema,
    slots: Vec<Option<Value>>,
}

impl<'a> DecodedFields<'a> {
    pub(crate) fn new(schema: &'a Schema, slots: Vec<Option<Value>>) -> Self {
        DecodedFields { schema, slots }
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// True if the field had a column in the input (or was synthesized as null).
    pub fn is_present(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Takes a required field's value.
    pub fn get<T: Scalar>(&mut self, index: usize) -> Result<T, SchemaError> {
        match self.take(index)? {
            Some(value) => self.convert(index, value),
            None => Err(SchemaError::MissingColumn {
                field: self.field_name(index),
            }),
        }
    }

    /// Takes a field's value, or `default` if the column was absent.
    pub fn get_or<T: Scalar>(&mut self, index: usize, default: T) -> Result<T, SchemaError> {
        match self.take(index)? {
            Some(value) => self.convert(index, value),
            None => Ok(default),
        }
    }

    pub fn get_or_default<T: Scalar + Default>(&mut self, index: usize) -> Result<T, SchemaError> {
        self.get_or(index, T::default())
    }

    /// Takes a required enum field's value.
    pub fn get_enum<E: DsvEnum>(&mut self, index: usize) -> Result<E, SchemaError> {
        match self.get_enum_opt(index)? {
            Some(member) => Ok(member),
            None => Err(SchemaError::UnexpectedNull {
                field: self.field_name(index),
                expected: format!("enum {}", E::NAME),
            }),
        }
    }

    /// Takes a nullable or optional enum field's value.
    pub fn get_enum_opt<E: DsvEnum>(&mut self, index: usize) -> Result<Option<E>, SchemaError> {
        match self.take(index)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Enum(ordinal)) => E::from_ordinal(ordinal).map(Some).ok_or_else(|| {
                SchemaError::EnumOrdinalOutOfRange {
                    field: self.field_name(index),
                    ordinal: ordinal as i64,
                    enum_name: E::NAME.to_string(),
                }
            }),
            Some(other) => Err(SchemaError::TypeMismatch {
                field: self.field_name(index),
                expected: format!("enum {}", E::NAME),
                found: other.type_name().to_string(),
            }),
        }
    }

    /// Takes an enum field's value, or `default` if the column was absent.
    pub fn get_enum_or<E: DsvEnum>(&mut self, index: usize, default: E) -> Result<E, SchemaError> {
        match self.slots.get(index) {
            Some(None) => Ok(default),
            _ => self.get_enum(index),
        }
    }

    fn take(&mut self, index: usize) -> Result<Option<Value>, SchemaError> {
        self.slots
            .get_mut(index)
            .map(Option::take)
            .ok_or(SchemaError::NoSuchField { index })
    }

    fn convert<T: Scalar>(&self, index: usize, value: Value) -> Result<T, SchemaError> {
        T::from_value(value).map_err(|value| {
            let expected = T::field_kind().to_string();
            if value.is_null() {
                SchemaError::UnexpectedNull {
                    field: self.field_name(index),
                    expected,
                }
            } else {
                SchemaError::TypeMismatch {
                    field: self.field_name(index),
                    expected,
                    found: value.type_name().to_string(),
                }
            }
        })
    }

    fn field_name(&self, index: usize) -> String {
        self.schema
            .field(index)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| format!("#{}", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Color {
        Red,
        Green,
    }

    impl DsvEnum for Color {
        const NAME: &'static str = "Color";
        const VARIANTS: &'static [&'static str] = &["Red", "Green"];

        fn ordinal(&self) -> usize {
            match self {
                Color::Red => 0,
                Color::Green => 1,
            }
        }

        fn from_ordinal(ordinal: usize) -> Option<Self> {
            match ordinal {
                0 => Some(Color::Red),
                1 => Some(Color::Green),
                _ => None,
            }
        }
    }

    fn schema() -> Schema {
        Schema::builder("Row")
            .scalar::<u16>("count")
            .optional_scalar::<String>("label")
            .field("color", FieldKind::enum_of::<Color>())
            .build()
    }

    #[test]
    fn test_option_kind_is_nullable() {
        assert_eq!(
            <Option<i64>>::field_kind(),
            FieldKind::nullable(ScalarType::I64)
        );
        assert_eq!(<()>::field_kind(), FieldKind::scalar(ScalarType::Null));
    }

    #[test]
    fn test_typed_getters() {
        let schema = schema();
        let mut fields = DecodedFields::new(
            &schema,
            vec![Some(Value::U16(7)), None, Some(Value::Enum(1))],
        );
        assert_eq!(fields.get::<u16>(0), Ok(7));
        assert_eq!(fields.get_or(1, "none".to_string()), Ok("none".to_string()));
        assert_eq!(fields.get_enum::<Color>(2), Ok(Color::Green));
    }

    #[test]
    fn test_type_mismatch() {
        let schema = schema();
        let mut fields = DecodedFields::new(&schema, vec![Some(Value::I32(7)), None, None]);
        assert!(matches!(
            fields.get::<u16>(0),
            Err(SchemaError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_null_for_required_scalar() {
        let schema = schema();
        let mut fields = DecodedFields::new(&schema, vec![Some(Value::Null), None, None]);
        assert!(matches!(
            fields.get::<u16>(0),
            Err(SchemaError::UnexpectedNull { .. })
        ));
    }

    #[test]
    fn test_enum_ordinal_out_of_range() {
        let schema = schema();
        let mut fields = DecodedFields::new(&schema, vec![None, None, Some(Value::Enum(5))]);
        assert!(matches!(
            fields.get_enum::<Color>(2),
            Err(SchemaError::EnumOrdinalOutOfRange { ordinal: 5, .. })
        ));
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(Some(3u8)), Value::U8(3));
        assert_eq!(Value::from(None::<u8>), Value::Null);
        assert_eq!(Value::enumeration(&Color::Green), Value::Enum(1));
        assert_eq!(Value::optional_enumeration::<Color>(None), Value::Null);
    }
}
