use super::naming::NamingStrategy;
use super::record::DsvRecord;
use super::scalar::render_value;
use super::types::{Schema, Value};
use crate::codec::Row;
use crate::error::SchemaError;

/// Encodes records of one schema into rows.
#[derive(Debug, Clone)]
pub struct RecordEncoder {
    schema: Schema,
    header: Row,
    enums_by_name: bool,
}

impl RecordEncoder {
    /// Validates the schema and computes the header once.
    pub fn new(schema: Schema, naming: &dyn NamingStrategy, enums_by_name: bool) -> Result<Self, SchemaError> {
        schema.validate()?;
        let header = schema
            .fields()
            .iter()
            .map(|f| naming.to_column_name(&f.name))
            .collect();
        Ok(RecordEncoder {
            schema,
            header,
            enums_by_name,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Column names in field order.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Renders one value per schema field.
    pub fn encode_values(&self, values: &[Value]) -> Result<Row, SchemaError> {
        if values.len() != self.schema.len() {
            return Err(SchemaError::ValueCount {
                record: self.schema.record_name().to_string(),
                expected: self.schema.len(),
                actual: values.len(),
            });
        }
        self.schema
            .fields()
            .iter()
            .zip(values)
            .map(|(field, value)| render_value(field, value, self.enums_by_name))
            .collect()
    }

    pub fn encode<T: DsvRecord>(&self, record: &T) -> Result<Row, SchemaError> {
        self.encode_values(&record.to_values())
    }
}
