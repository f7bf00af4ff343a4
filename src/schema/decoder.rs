use tracing::debug;

use super::naming::NamingStrategy;
use super::record::{DecodedFields, DsvRecord};
use super::scalar::parse_cell;
use super::types::{Schema, Value};
use crate::codec::Row;
use crate::error::SchemaError;

/// Column reconciliation policies applied when a header is matched to a schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodePolicy {
    /// Required nullable fields with no column read as null instead of failing.
    pub missing_columns_as_null: bool,
    /// Columns that map to no field are skipped instead of failing.
    pub ignore_unknown_keys: bool,
}

/// How the columns of one header feed the fields of one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ColumnPlan {
    /// Target field of each header column; `None` for ignored columns.
    columns: Vec<Option<usize>>,
    /// Fields with no column that always read as null.
    implicit_nulls: Vec<usize>,
}

impl ColumnPlan {
    fn new(
        schema: &Schema,
        header: &[String],
        naming: &dyn NamingStrategy,
        policy: DecodePolicy,
    ) -> Result<Self, SchemaError> {
        let mut source: Vec<Option<&str>> = vec![None; schema.len()];
        let mut columns = Vec::with_capacity(header.len());

        for column in header {
            let column = column.trim();
            let field_name = naming.to_field_name(column);
            match schema.field_index(&field_name) {
                Some(index) => {
                    if let Some(first) = source[index] {
                        return Err(SchemaError::DuplicateColumn {
                            field: field_name,
                            first: first.to_string(),
                            second: column.to_string(),
                        });
                    }
                    source[index] = Some(column);
                    columns.push(Some(index));
                }
                None if policy.ignore_unknown_keys => columns.push(None),
                None => {
                    return Err(SchemaError::UnknownColumn {
                        column: column.to_string(),
                    });
                }
            }
        }

        let mut implicit_nulls = Vec::new();
        for field in schema.fields() {
            if source[field.index].is_some() || field.optional {
                continue;
            }
            if policy.missing_columns_as_null && field.kind.is_nullable() {
                implicit_nulls.push(field.index);
            } else {
                return Err(SchemaError::MissingColumn {
                    field: field.name.clone(),
                });
            }
        }

        let plan = ColumnPlan {
            columns,
            implicit_nulls,
        };
        debug!(
            record = schema.record_name(),
            known = plan.columns.iter().filter(|c| c.is_some()).count(),
            ignored = plan.columns.iter().filter(|c| c.is_none()).count(),
            implicit_nulls = plan.implicit_nulls.len(),
            "built column plan"
        );
        Ok(plan)
    }
}

/// Decodes rows of one table into records of one schema.
///
/// The header is matched against the schema once, at construction; each row
/// then only pays for value conversion.
#[derive(Debug, Clone)]
pub struct RecordDecoder {
    schema: Schema,
    plan: ColumnPlan,
}

impl RecordDecoder {
    pub fn new(
        schema: Schema,
        header: &[String],
        naming: &dyn NamingStrategy,
        policy: DecodePolicy,
    ) -> Result<Self, SchemaError> {
        schema.validate()?;
        let plan = ColumnPlan::new(&schema, header, naming, policy)?;
        Ok(RecordDecoder { schema, plan })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Converts one row into per-field values.
    pub fn decode_row(&self, row: Row) -> Result<DecodedFields<'_>, SchemaError> {
        let mut slots: Vec<Option<Value>> = vec![None; self.schema.len()];

        for (cell, target) in row.into_iter().zip(&self.plan.columns) {
            let Some(index) = *target else { continue };
            if let Some(field) = self.schema.field(index) {
                slots[index] = Some(parse_cell(field, cell)?);
            }
        }
        for &index in &self.plan.implicit_nulls {
            slots[index] = Some(Value::Null);
        }

        Ok(DecodedFields::new(&self.schema, slots))
    }

    /// Converts one row into a record.
    pub fn decode<T: DsvRecord>(&self, row: Row) -> Result<T, SchemaError> {
        T::from_values(self.decode_row(row)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::naming::{Identity, SnakeCase};
    use crate::schema::types::{FieldKind, ScalarType};

    fn header(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|s| s.to_string()).collect()
    }

    fn schema() -> Schema {
        Schema::builder("Item")
            .field("id", FieldKind::scalar(ScalarType::U32))
            .field("name", FieldKind::scalar(ScalarType::String))
            .field("description", FieldKind::nullable(ScalarType::String))
            .build()
    }

    #[test]
    fn test_header_cells_are_trimmed_and_renamed() {
        let schema = Schema::builder("Item")
            .field("itemId", FieldKind::scalar(ScalarType::U32))
            .build();
        let decoder = RecordDecoder::new(
            schema,
            &header(&[" item_id "]),
            &SnakeCase,
            DecodePolicy::default(),
        )
        .unwrap();
        let mut fields = decoder.decode_row(header(&["9"])).unwrap();
        assert_eq!(fields.get::<u32>(0), Ok(9));
    }

    #[test]
    fn test_unknown_column() {
        let err = RecordDecoder::new(
            schema(),
            &header(&["id", "name", "description", "extra"]),
            &Identity,
            DecodePolicy::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownColumn {
                column: "extra".to_string()
            }
        );
    }

    #[test]
    fn test_missing_column() {
        let err = RecordDecoder::new(
            schema(),
            &header(&["id", "name"]),
            &Identity,
            DecodePolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn { field } if field == "description"));
    }

    #[test]
    fn test_ignore_unknown_and_synthesize_nulls() {
        let policy = DecodePolicy {
            missing_columns_as_null: true,
            ignore_unknown_keys: true,
        };
        let decoder =
            RecordDecoder::new(schema(), &header(&["id", "name", "extra"]), &Identity, policy).unwrap();
        let mut fields = decoder.decode_row(header(&["1", "ada", "zzz"])).unwrap();
        assert_eq!(fields.get::<u32>(0), Ok(1));
        assert_eq!(fields.get::<String>(1), Ok("ada".to_string()));
        assert_eq!(fields.get::<Option<String>>(2), Ok(None));
    }

    #[test]
    fn test_missing_non_nullable_is_still_an_error() {
        let policy = DecodePolicy {
            missing_columns_as_null: true,
            ignore_unknown_keys: false,
        };
        let err = RecordDecoder::new(schema(), &header(&["name", "description"]), &Identity, policy)
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingColumn { field } if field == "id"));
    }

    #[test]
    fn test_optional_field_may_be_absent() {
        let schema = Schema::builder("Item")
            .field("id", FieldKind::scalar(ScalarType::U32))
            .optional_field("count", FieldKind::scalar(ScalarType::U32))
            .build();
        let decoder =
            RecordDecoder::new(schema, &header(&["id"]), &Identity, DecodePolicy::default()).unwrap();
        let mut fields = decoder.decode_row(header(&["1"])).unwrap();
        assert!(!fields.is_present(1));
        assert_eq!(fields.get_or(1, 10u32), Ok(10));
    }

    #[test]
    fn test_duplicate_column() {
        let err = RecordDecoder::new(
            schema(),
            &header(&["id", "id", "name", "description"]),
            &Identity,
            DecodePolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_columns_in_any_order() {
        let decoder = RecordDecoder::new(
            schema(),
            &header(&["description", "name", "id"]),
            &Identity,
            DecodePolicy::default(),
        )
        .unwrap();
        let mut fields = decoder.decode_row(header(&["", "bob", "2"])).unwrap();
        assert_eq!(fields.get::<u32>(0), Ok(2));
        assert_eq!(fields.get::<Option<String>>(2), Ok(None));
    }

    #[test]
    fn test_value_error_names_field() {
        let decoder = RecordDecoder::new(
            schema(),
            &header(&["id", "name", "description"]),
            &Identity,
            DecodePolicy::default(),
        )
        .unwrap();
        let err = decoder.decode_row(header(&["x", "a", ""])).unwrap_err();
        assert_eq!(err.to_string(), "field 'id': cannot parse 'x' as u32");
    }
}
