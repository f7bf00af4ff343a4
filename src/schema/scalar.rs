//! Text <-> value conversion for one cell.
//!
//! Shared by every decode and encode path, eager or lazy.

use std::str::FromStr;

use super::types::{EnumDescriptor, FieldDescriptor, FieldKind, ScalarType, Value};
use crate::error::SchemaError;

/// Parses one cell according to the field's kind.
///
/// An empty cell is null for nullable fields. For a non-nullable string field it
/// is the empty string.
pub(crate) fn parse_cell(field: &FieldDescriptor, text: String) -> Result<Value, SchemaError> {
    match &field.kind {
        FieldKind::Scalar {
            ty: ScalarType::Null,
            ..
        } => {
            if text.is_empty() {
                Ok(Value::Null)
            } else {
                Err(SchemaError::ExpectedNull {
                    field: field.name.clone(),
                    value: text,
                })
            }
        }
        FieldKind::Scalar { nullable: true, .. } | FieldKind::Enum { nullable: true, .. }
            if text.is_empty() =>
        {
            Ok(Value::Null)
        }
        FieldKind::Scalar { ty, .. } => parse_scalar(field, *ty, text),
        FieldKind::Enum { descriptor, .. } => parse_enum(field, descriptor, text),
        FieldKind::Nested { type_name } => Err(SchemaError::UnsupportedField {
            field: field.name.clone(),
            kind: type_name.clone(),
        }),
    }
}

fn parse_scalar(field: &FieldDescriptor, ty: ScalarType, text: String) -> Result<Value, SchemaError> {
    let value = match ty {
        ScalarType::String => return Ok(Value::String(text)),
        ScalarType::Bool => {
            if text.eq_ignore_ascii_case("true") {
                Some(Value::Bool(true))
            } else if text.eq_ignore_ascii_case("false") {
                Some(Value::Bool(false))
            } else {
                None
            }
        }
        ScalarType::Char => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        ScalarType::I8 => parse_num(&text).map(Value::I8),
        ScalarType::I16 => parse_num(&text).map(Value::I16),
        ScalarType::I32 => parse_num(&text).map(Value::I32),
        ScalarType::I64 => parse_num(&text).map(Value::I64),
        ScalarType::U8 => parse_num(&text).map(Value::U8),
        ScalarType::U16 => parse_num(&text).map(Value::U16),
        ScalarType::U32 => parse_num(&text).map(Value::U32),
        ScalarType::U64 => parse_num(&text).map(Value::U64),
        ScalarType::F32 => parse_num(&text).map(Value::F32),
        ScalarType::F64 => parse_num(&text).map(Value::F64),
        ScalarType::Null => None,
    };

    value.ok_or_else(|| SchemaError::InvalidValue {
        field: field.name.clone(),
        value: text,
        expected: ty.name().to_string(),
    })
}

fn parse_num<T: FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

/// Member name first, then ordinal.
fn parse_enum(field: &FieldDescriptor, descriptor: &EnumDescriptor, text: String) -> Result<Value, SchemaError> {
    if let Some(ordinal) = descriptor.position(&text) {
        return Ok(Value::Enum(ordinal));
    }

    match text.parse::<i64>() {
        Ok(ordinal) if ordinal >= 0 && (ordinal as u64) < descriptor.variants.len() as u64 => {
            Ok(Value::Enum(ordinal as usize))
        }
        Ok(ordinal) => Err(SchemaError::EnumOrdinalOutOfRange {
            field: field.name.clone(),
            ordinal,
            enum_name: descriptor.name.clone(),
        }),
        Err(_) => Err(SchemaError::EnumValueNotFound {
            field: field.name.clone(),
            value: text,
            enum_name: descriptor.name.clone(),
        }),
    }
}

/// Renders one value as cell text. Null is the empty string.
pub(crate) fn render_value(
    field: &FieldDescriptor,
    value: &Value,
    enums_by_name: bool,
) -> Result<String, SchemaError> {
    if value.is_null() {
        if field.kind.is_nullable() {
            return Ok(String::new());
        }
        return Err(SchemaError::UnexpectedNull {
            field: field.name.clone(),
            expected: field.kind.to_string(),
        });
    }

    match (&field.kind, value) {
        (FieldKind::Enum { descriptor, .. }, Value::Enum(ordinal)) => {
            match descriptor.variants.get(*ordinal) {
                Some(name) if enums_by_name => Ok(name.clone()),
                Some(_) => Ok(ordinal.to_string()),
                None => Err(SchemaError::EnumOrdinalOutOfRange {
                    field: field.name.clone(),
                    ordinal: *ordinal as i64,
                    enum_name: descriptor.name.clone(),
                }),
            }
        }
        (FieldKind::Scalar { ty, .. }, value) if ty.matches(value) => Ok(render_scalar(value)),
        (FieldKind::Nested { type_name }, _) => Err(SchemaError::UnsupportedField {
            field: field.name.clone(),
            kind: type_name.clone(),
        }),
        (kind, value) => Err(SchemaError::TypeMismatch {
            field: field.name.clone(),
            expected: kind.to_string(),
            found: value.type_name().to_string(),
        }),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(v) => v.to_string(),
        Value::I8(v) => v.to_string(),
        Value::I16(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::U8(v) => v.to_string(),
        Value::U16(v) => v.to_string(),
        Value::U32(v) => v.to_string(),
        Value::U64(v) => v.to_string(),
        // Display is the shortest text that parses back to the same float
        Value::F32(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Char(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Enum(v) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(kind: FieldKind) -> FieldDescriptor {
        FieldDescriptor {
            name: "f".to_string(),
            index: 0,
            optional: false,
            kind,
        }
    }

    fn colors() -> EnumDescriptor {
        EnumDescriptor::new("Color", ["Red", "Green", "Blue"])
    }

    #[test]
    fn test_parse_integers() {
        let f = field(FieldKind::scalar(ScalarType::I16));
        assert_eq!(parse_cell(&f, "-42".into()), Ok(Value::I16(-42)));
        assert!(matches!(
            parse_cell(&f, "40000".into()),
            Err(SchemaError::InvalidValue { .. })
        ));
        assert!(parse_cell(&f, "".into()).is_err());
    }

    #[test]
    fn test_parse_bool_case_insensitive() {
        let f = field(FieldKind::scalar(ScalarType::Bool));
        assert_eq!(parse_cell(&f, "TRUE".into()), Ok(Value::Bool(true)));
        assert_eq!(parse_cell(&f, "False".into()), Ok(Value::Bool(false)));
        assert!(parse_cell(&f, "yes".into()).is_err());
    }

    #[test]
    fn test_parse_char() {
        let f = field(FieldKind::scalar(ScalarType::Char));
        assert_eq!(parse_cell(&f, "é".into()), Ok(Value::Char('é')));
        assert!(parse_cell(&f, "ab".into()).is_err());
        assert!(parse_cell(&f, "".into()).is_err());
    }

    #[test]
    fn test_empty_cell() {
        let string = field(FieldKind::scalar(ScalarType::String));
        assert_eq!(parse_cell(&string, "".into()), Ok(Value::String(String::new())));

        let nullable = field(FieldKind::nullable(ScalarType::I32));
        assert_eq!(parse_cell(&nullable, "".into()), Ok(Value::Null));
        assert_eq!(parse_cell(&nullable, "5".into()), Ok(Value::I32(5)));
    }

    #[test]
    fn test_null_type() {
        let f = field(FieldKind::scalar(ScalarType::Null));
        assert_eq!(parse_cell(&f, "".into()), Ok(Value::Null));
        assert_eq!(
            parse_cell(&f, "x".into()),
            Err(SchemaError::ExpectedNull {
                field: "f".to_string(),
                value: "x".to_string()
            })
        );
    }

    #[test]
    fn test_parse_enum() {
        let f = field(FieldKind::enumeration(colors()));
        assert_eq!(parse_cell(&f, "Blue".into()), Ok(Value::Enum(2)));
        assert_eq!(parse_cell(&f, "1".into()), Ok(Value::Enum(1)));
        assert!(matches!(
            parse_cell(&f, "3".into()),
            Err(SchemaError::EnumOrdinalOutOfRange { ordinal: 3, .. })
        ));
        assert!(matches!(
            parse_cell(&f, "-1".into()),
            Err(SchemaError::EnumOrdinalOutOfRange { ordinal: -1, .. })
        ));
        assert!(matches!(
            parse_cell(&f, "blue".into()),
            Err(SchemaError::EnumValueNotFound { .. })
        ));
    }

    #[test]
    fn test_render_enum() {
        let f = field(FieldKind::enumeration(colors()));
        assert_eq!(render_value(&f, &Value::Enum(1), true), Ok("Green".to_string()));
        assert_eq!(render_value(&f, &Value::Enum(1), false), Ok("1".to_string()));
        assert!(render_value(&f, &Value::Enum(9), true).is_err());
    }

    #[test]
    fn test_render_null() {
        let nullable = field(FieldKind::nullable(ScalarType::F64));
        assert_eq!(render_value(&nullable, &Value::Null, true), Ok(String::new()));

        let required = field(FieldKind::scalar(ScalarType::F64));
        assert!(matches!(
            render_value(&required, &Value::Null, true),
            Err(SchemaError::UnexpectedNull { .. })
        ));
    }

    #[test]
    fn test_render_type_mismatch() {
        let f = field(FieldKind::scalar(ScalarType::U8));
        assert!(matches!(
            render_value(&f, &Value::I8(1), true),
            Err(SchemaError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_float_text_round_trips() {
        let f = field(FieldKind::scalar(ScalarType::F64));
        for v in [0.1, -2.5e-300, 1e21, f64::MAX] {
            let text = render_value(&f, &Value::F64(v), true).unwrap();
            assert_eq!(parse_cell(&f, text), Ok(Value::F64(v)));
        }
    }
}
